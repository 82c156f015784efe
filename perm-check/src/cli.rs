//! Command-line arguments
//!
//! Every option can also come from a `PERM_CHECK_*` environment variable
//! (or `.env`); flags on the command line win.

use clap::Parser;
use perm_shared::{Timestamp, ValidationOptions};
use std::path::PathBuf;

/// Validate permission payload files
#[derive(Parser, Debug, Clone)]
#[command(name = "perm-check", version)]
pub struct Args {
    /// Treat warnings as errors
    #[arg(long, env = "PERM_CHECK_STRICT")]
    pub strict: bool,

    /// Log the menu tree of each payload
    #[arg(long)]
    pub tree: bool,

    /// Do not reject expired tokens
    #[arg(long, env = "PERM_CHECK_SKIP_EXPIRY")]
    pub skip_expiry: bool,

    /// Do not resolve role, permission and menu cross-references
    #[arg(long, env = "PERM_CHECK_SKIP_REFERENCES")]
    pub skip_references: bool,

    /// Reference time for expiry checks (Unix milliseconds)
    #[arg(long, env = "PERM_CHECK_NOW_MS")]
    pub now_ms: Option<Timestamp>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "PERM_CHECK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory for daily rolling log files
    #[arg(long, env = "PERM_CHECK_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Payload files, one UserPermissionSet JSON document each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Validation options for this run
    pub fn validation_options(&self) -> ValidationOptions {
        let options = match self.now_ms {
            Some(now) => ValidationOptions::at(now),
            None => ValidationOptions::default(),
        };
        options
            .strict(self.strict)
            .check_expiry(!self.skip_expiry)
            .check_references(!self.skip_references)
    }

    /// Log directory, ignoring an empty value
    pub fn log_dir(&self) -> Option<&str> {
        self.log_dir.as_deref().filter(|d| !d.is_empty())
    }
}
