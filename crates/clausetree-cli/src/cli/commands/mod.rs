use super::args::*;
use crate::exit_codes;

pub mod analyze;
pub mod input;
pub mod kind;
pub mod output;
pub mod validate;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Validate(args) => validate::run(args),
        Command::Kind(args) => kind::run(args),
        Command::Analyze(args) => analyze::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::SUCCESS)
        }
    }
}
