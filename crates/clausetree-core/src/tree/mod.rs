//! Clause tree construction: child links, token coverage, reference integrity.

pub mod builder;
pub mod coverage;
pub mod references;

pub use builder::{build_clauses, DraftClause};
pub use coverage::{validate_coverage, Coverage};
pub use references::{check_references, find_reference_issues, ReferenceIssue};
