//! Raw response handling: sanitization, truncation detection, decoding and
//! top-level structure checks.

pub mod sanitize;
pub mod structure;
pub mod truncation;

pub use sanitize::sanitize_response;
pub use structure::{decode, validate_structure, RawClause, RawResponse};
pub use truncation::{detect_truncation, is_truncated, TruncationReason};
