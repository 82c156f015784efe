//! Payload file checks

use anyhow::Context;
use perm_shared::codec::from_json_reader;
use perm_shared::util::millis_to_rfc3339;
use perm_shared::{Menu, Severity, UserPermissionSet, ValidationReport, Validator, Visibility};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Exit code: every file valid
pub const EXIT_OK: u8 = 0;
/// Exit code: at least one file missing, malformed or invalid
pub const EXIT_INVALID: u8 = 1;
/// Exit code: bad command line
pub const EXIT_USAGE: u8 = 2;

/// Read and decode one payload file
pub fn load_payload(path: &Path) -> anyhow::Result<UserPermissionSet> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let set = from_json_reader(BufReader::new(file))
        .with_context(|| format!("cannot decode {}", path.display()))?;
    Ok(set)
}

/// Load, validate and log one file
pub fn check_file(path: &Path, validator: &Validator, tree: bool) -> anyhow::Result<ValidationReport> {
    let set = load_payload(path)?;
    let report = validator.validate(&set);

    let user = &set.user_auth;
    let expires = millis_to_rfc3339(user.expire_time).unwrap_or_else(|| user.expire_time.to_string());
    tracing::info!(
        file = %path.display(),
        user = %user.display_name(),
        roles = set.roles.len(),
        permissions = set.permissions.len(),
        menus = set.menu_count(),
        scope = %set.data_permission.scope,
        expires = %expires,
        "payload loaded"
    );

    for issue in &report.issues {
        match issue.severity {
            Severity::Error => {
                tracing::error!(code = %issue.code, path = %issue.path, "{}", issue.message)
            }
            Severity::Warning => {
                tracing::warn!(code = %issue.code, path = %issue.path, "{}", issue.message)
            }
        }
    }

    if tree {
        for line in render_menu_tree(&set.menus) {
            tracing::info!("{line}");
        }
    }

    Ok(report)
}

/// One line per menu node, indented two spaces per level
pub fn render_menu_tree(menus: &[Menu]) -> Vec<String> {
    menus
        .iter()
        .flat_map(|root| root.walk())
        .map(|(depth, menu)| {
            let mut line = format!(
                "{}{} [{}] {}",
                "  ".repeat(depth),
                menu.menu_name,
                menu.menu_type,
                menu.path
            );
            if let Some(key) = &menu.permission_key {
                line.push_str(&format!(" ({key})"));
            }
            if menu.visible == Visibility::Hidden {
                line.push_str(" hidden");
            }
            line
        })
        .collect()
}

/// Check every file and return the process exit code
///
/// A file that cannot be read or decoded counts as a failure; the remaining
/// files are still checked.
pub fn run<P: AsRef<Path>>(files: &[P], validator: &Validator, tree: bool) -> u8 {
    let mut failed = 0usize;

    for path in files {
        let path = path.as_ref();
        match check_file(path, validator, tree) {
            Ok(report) if report.is_valid() => {
                tracing::info!(
                    file = %path.display(),
                    warnings = report.warnings().count(),
                    "payload valid"
                );
            }
            Ok(report) => {
                failed += 1;
                tracing::error!(
                    file = %path.display(),
                    errors = report.errors().count(),
                    warnings = report.warnings().count(),
                    "payload invalid"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(file = %path.display(), "{:#}", e);
            }
        }
    }

    tracing::info!(checked = files.len(), failed, "check finished");
    if failed == 0 { EXIT_OK } else { EXIT_INVALID }
}
