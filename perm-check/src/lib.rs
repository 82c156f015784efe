//! Command-line checker for permission payload files
//!
//! Loads each file as a `UserPermissionSet`, runs the validator and logs
//! one line per issue.

pub mod check;
pub mod cli;
pub mod logger;

pub use check::{EXIT_INVALID, EXIT_OK, EXIT_USAGE, check_file, load_payload, render_menu_tree, run};
pub use cli::Args;
