use clap::Parser;
use perm_check::{Args, EXIT_USAGE, logger};
use perm_shared::Validator;
use std::process::ExitCode;

fn main() -> ExitCode {
    // PERM_CHECK_* variables from .env feed the clap env bindings
    dotenvy::dotenv().ok();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logger::init_logger_with_file(Some(&args.log_level), args.log_dir());

    let validator = Validator::new(args.validation_options());
    tracing::debug!(options = ?validator.options(), "validator ready");

    ExitCode::from(perm_check::run(&args.files, &validator, args.tree))
}
