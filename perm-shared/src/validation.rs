//! Payload validation
//!
//! Deserialization already enforces the enumerated literals and the 0/1
//! flags. [`Validator`] checks what the types cannot express: non-empty
//! tokens, expiry, unique ids, resolvable references, acyclic hierarchies and
//! the data-scope rules. Every problem is collected into a
//! [`ValidationReport`] instead of stopping at the first one.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::hierarchy::{HierarchyNode, detect_cycle, find_duplicates};
use crate::models::{DataPermission, DataScope, Menu, Permission, Role, UserAuth, UserPermissionSet};
use crate::types::{Identifier, Timestamp};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: user, role, permission, menu, data scope
pub const MAX_NAME_LEN: usize = 200;

/// Route paths, component paths, URLs
pub const MAX_URL_LEN: usize = 2048;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

// ── Text helpers ────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    check_length(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    match value {
        Some(v) => check_length(v, field, max_len),
        None => Ok(()),
    }
}

fn check_length(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long ({len} chars, max {max_len})"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

// ── Report types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found in a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Location in wire names, e.g. `menus[0].children[2].permissionKey`
    pub path: String,
    pub message: String,
}

impl Issue {
    fn to_json(&self) -> Value {
        json!({
            "code": self.code.code(),
            "severity": self.severity,
            "path": self.path,
            "message": self.message,
        })
    }
}

/// Knobs for [`Validator`]
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Reference time for expiry checks (Unix milliseconds)
    pub now: Timestamp,
    /// Report tokens whose `expireTime` is not after `now`
    pub check_expiry: bool,
    /// Resolve role → permission, role → parent and menu → permission links
    pub check_references: bool,
    /// Treat warnings as errors
    pub strict: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            now: now_millis(),
            check_expiry: true,
            check_references: true,
            strict: false,
        }
    }
}

impl ValidationOptions {
    /// Default options evaluated at a fixed time
    pub fn at(now: Timestamp) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn check_expiry(mut self, check: bool) -> Self {
        self.check_expiry = check;
        self
    }

    pub fn check_references(mut self, check: bool) -> Self {
        self.check_references = check;
        self
    }
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// No error-severity issues
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// `Ok` when valid; otherwise the first error, with every issue attached
    /// under the `issues` detail
    pub fn into_result(self) -> AppResult<()> {
        let Some(first) = self.errors().next() else {
            return Ok(());
        };
        let issues: Vec<Value> = self.issues.iter().map(Issue::to_json).collect();
        Err(
            AppError::with_message(first.code, format!("{}: {}", first.path, first.message))
                .with_detail("path", first.path.clone())
                .with_detail("errorCount", self.errors().count())
                .with_detail("issues", issues),
        )
    }
}

// ── Validator ───────────────────────────────────────────────────────

/// Checks a [`UserPermissionSet`] against the rules its types cannot express
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidationOptions,
}

/// Collects issues while a validation pass runs
struct Collector<'o> {
    options: &'o ValidationOptions,
    issues: Vec<Issue>,
}

impl Collector<'_> {
    fn push(&mut self, code: ErrorCode, severity: Severity, path: impl Into<String>, message: impl Into<String>) {
        let severity = if self.options.strict {
            Severity::Error
        } else {
            severity
        };
        self.issues.push(Issue {
            code,
            severity,
            path: path.into(),
            message: message.into(),
        });
    }

    fn error(&mut self, code: ErrorCode, path: impl Into<String>, message: impl Into<String>) {
        self.push(code, Severity::Error, path, message);
    }

    fn warn(&mut self, code: ErrorCode, path: impl Into<String>, message: impl Into<String>) {
        self.push(code, Severity::Warning, path, message);
    }

    /// Text check: over-long values are warnings, a missing value is an error
    fn check(&mut self, result: AppResult<()>, path: impl Into<String>) {
        if let Err(err) = result {
            let severity = match err.code {
                ErrorCode::ValueOutOfRange => Severity::Warning,
                _ => Severity::Error,
            };
            self.push(err.code, severity, path, err.message);
        }
    }

    /// Text check for display labels, where every failure is a warning
    fn check_label(&mut self, result: AppResult<()>, path: impl Into<String>) {
        if let Err(err) = result {
            self.warn(err.code, path, err.message);
        }
    }
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn validate(&self, set: &UserPermissionSet) -> ValidationReport {
        let mut c = Collector {
            options: &self.options,
            issues: Vec::new(),
        };

        self.check_user(&mut c, &set.user_auth);
        self.check_permissions(&mut c, &set.permissions);
        self.check_roles(&mut c, set);
        self.check_menus(&mut c, set);
        self.check_data_permission(&mut c, &set.data_permission);

        let report = ValidationReport { issues: c.issues };
        tracing::debug!(
            user = %set.user_auth.user_id,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "permission payload validated"
        );
        report
    }

    /// Validate and convert the report into a result
    pub fn check(&self, set: &UserPermissionSet) -> AppResult<()> {
        self.validate(set).into_result()
    }

    fn check_user(&self, c: &mut Collector<'_>, user: &UserAuth) {
        if user.user_id.is_empty() {
            c.error(ErrorCode::RequiredField, "userAuth.userId", "userId must not be empty");
        }
        c.check(
            validate_required_text(&user.username, "username", MAX_NAME_LEN),
            "userAuth.username",
        );
        c.check(
            validate_optional_text(&user.real_name, "realName", MAX_NAME_LEN),
            "userAuth.realName",
        );
        c.check(
            validate_optional_text(&user.avatar, "avatar", MAX_URL_LEN),
            "userAuth.avatar",
        );

        if user.access_token.trim().is_empty() {
            c.error(
                ErrorCode::TokenMissing,
                "userAuth.accessToken",
                ErrorCode::TokenMissing.message(),
            );
        }

        if user.expire_time <= 0 {
            c.error(
                ErrorCode::InvalidExpireTime,
                "userAuth.expireTime",
                format!("expireTime {} is not a valid timestamp", user.expire_time),
            );
        } else if self.options.check_expiry && user.is_expired_at(self.options.now) {
            c.error(
                ErrorCode::TokenExpired,
                "userAuth.expireTime",
                format!(
                    "token expired {} ms before {}",
                    self.options.now - user.expire_time,
                    self.options.now
                ),
            );
        }

        if !user.is_active() {
            c.warn(
                ErrorCode::AccountDisabled,
                "userAuth.status",
                ErrorCode::AccountDisabled.message(),
            );
        }
    }

    fn check_permissions(&self, c: &mut Collector<'_>, permissions: &[Permission]) {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();

        for (i, p) in permissions.iter().enumerate() {
            let path = format!("permissions[{i}]");

            if !ids.insert(p.permission_id.normalized()) {
                c.error(
                    ErrorCode::DuplicatePermissionId,
                    format!("{path}.permissionId"),
                    format!("permission id {} is duplicated", p.permission_id),
                );
            }
            if p.permission_key.is_empty() {
                c.error(
                    ErrorCode::RequiredField,
                    format!("{path}.permissionKey"),
                    "permissionKey must not be empty",
                );
            } else if !keys.insert(p.permission_key.as_str()) {
                c.error(
                    ErrorCode::DuplicatePermissionKey,
                    format!("{path}.permissionKey"),
                    format!("permission key {} is duplicated", p.permission_key),
                );
            }
            c.check_label(
                validate_required_text(&p.permission_name, "permissionName", MAX_NAME_LEN),
                format!("{path}.permissionName"),
            );
            c.check(
                validate_optional_text(&p.description, "description", MAX_NOTE_LEN),
                format!("{path}.description"),
            );

            if let Some(method) = p.resource.method
                && !p.method_applies()
            {
                c.warn(
                    ErrorCode::MethodNotApplicable,
                    format!("{path}.resource.method"),
                    format!("method {} is ignored on a {} permission", method, p.kind),
                );
            }
            if p.resource.component.is_some() && !p.component_applies() {
                c.warn(
                    ErrorCode::ComponentNotApplicable,
                    format!("{path}.resource.component"),
                    format!("component is ignored on a {} permission", p.kind),
                );
            }
        }

        if let Some(cycle) = detect_cycle(permissions) {
            c.error(
                ErrorCode::PermissionCycle,
                "permissions",
                format!("parent chain loops: {}", cycle.join(" -> ")),
            );
        }
    }

    fn check_roles(&self, c: &mut Collector<'_>, set: &UserPermissionSet) {
        let roles: &[Role] = &set.roles;

        for dup in find_duplicates(roles) {
            let i = roles
                .iter()
                .rposition(|r| r.role_id.normalized() == dup)
                .unwrap_or_default();
            c.error(
                ErrorCode::DuplicateRoleId,
                format!("roles[{i}].roleId"),
                format!("role id {dup} is duplicated"),
            );
        }

        for (i, role) in roles.iter().enumerate() {
            let path = format!("roles[{i}]");
            c.check_label(
                validate_required_text(&role.role_name, "roleName", MAX_NAME_LEN),
                format!("{path}.roleName"),
            );

            if !self.options.check_references {
                continue;
            }
            for (j, id) in role.permission_ids.iter().enumerate() {
                if set.permission_by_id(id).is_none() {
                    c.error(
                        ErrorCode::PermissionNotFound,
                        format!("{path}.permissionIds[{j}]"),
                        format!("permission {id} is not in the payload"),
                    );
                }
            }
            if let Some(parent) = role.parent()
                && set.role_by_id(parent).is_none()
            {
                c.warn(
                    ErrorCode::RoleNotFound,
                    format!("{path}.parentRoleId"),
                    format!("parent role {parent} is not in the payload"),
                );
            }
        }

        if let Some(cycle) = detect_cycle(roles) {
            c.error(
                ErrorCode::RoleCycle,
                "roles",
                format!("parent chain loops: {}", cycle.join(" -> ")),
            );
        }
    }

    fn check_menus(&self, c: &mut Collector<'_>, set: &UserPermissionSet) {
        let mut seen = HashSet::new();
        for (i, root) in set.menus.iter().enumerate() {
            self.check_menu(c, set, root, None, format!("menus[{i}]"), &mut seen);
        }

        // Parent links that disagree with the nesting can still loop
        let nodes: Vec<&Menu> = set
            .menus
            .iter()
            .flat_map(|root| root.walk())
            .map(|(_, m)| m)
            .collect();
        if let Some(cycle) = detect_cycle(&nodes) {
            c.error(
                ErrorCode::MenuCycle,
                "menus",
                format!("parent chain loops: {}", cycle.join(" -> ")),
            );
        }
    }

    fn check_menu(
        &self,
        c: &mut Collector<'_>,
        set: &UserPermissionSet,
        menu: &Menu,
        enclosing: Option<&Identifier>,
        path: String,
        seen: &mut HashSet<String>,
    ) {
        if !seen.insert(menu.menu_id.normalized()) {
            c.error(
                ErrorCode::DuplicateMenuId,
                format!("{path}.menuId"),
                format!("menu id {} is duplicated", menu.menu_id),
            );
        }
        c.check_label(
            validate_required_text(&menu.menu_name, "menuName", MAX_NAME_LEN),
            format!("{path}.menuName"),
        );

        match enclosing {
            None if !menu.is_root() => c.warn(
                ErrorCode::MenuParentMismatch,
                format!("{path}.parentId"),
                format!("top-level menu has parent {}", menu.parent_id),
            ),
            Some(parent) if !menu.parent_id.same_as(parent) => c.warn(
                ErrorCode::MenuParentMismatch,
                format!("{path}.parentId"),
                format!("parentId {} but nested under {}", menu.parent_id, parent),
            ),
            _ => {}
        }

        if let Some(key) = &menu.permission_key {
            if key.is_empty() {
                c.error(
                    ErrorCode::RequiredField,
                    format!("{path}.permissionKey"),
                    "permissionKey must not be empty",
                );
            } else if self.options.check_references && set.menu_permission(menu).is_none() {
                c.error(
                    ErrorCode::MenuPermissionMissing,
                    format!("{path}.permissionKey"),
                    format!("no permission grants {key}"),
                );
            }
        }

        for (i, child) in menu.children().iter().enumerate() {
            self.check_menu(
                c,
                set,
                child,
                Some(&menu.menu_id),
                format!("{path}.children[{i}]"),
                seen,
            );
        }
    }

    fn check_data_permission(&self, c: &mut Collector<'_>, dp: &DataPermission) {
        if dp.id.is_empty() {
            c.error(
                ErrorCode::RequiredField,
                "dataPermission.dataPermission",
                "dataPermission must not be empty",
            );
        }
        c.check_label(
            validate_required_text(&dp.data_perm_name, "dataPermName", MAX_NAME_LEN),
            "dataPermission.dataPermName",
        );

        match (dp.scope, &dp.custom_ids) {
            (DataScope::Custom, None) => c.error(
                ErrorCode::CustomIdsMissing,
                "dataPermission.customIds",
                ErrorCode::CustomIdsMissing.message(),
            ),
            (DataScope::Custom, Some(ids)) if ids.is_empty() => c.warn(
                ErrorCode::CustomIdsEmpty,
                "dataPermission.customIds",
                "custom scope grants no ids",
            ),
            (scope, Some(_)) if scope != DataScope::Custom => c.warn(
                ErrorCode::CustomIdsIgnored,
                "dataPermission.customIds",
                format!("customIds are ignored for scope {scope}"),
            ),
            _ => {}
        }
    }
}
