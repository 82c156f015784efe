//! Shared types for the permission payload
//!
//! The vocabulary exchanged between an authentication backend and its clients
//! after login: identity, roles, permissions, menus and data scope, plus the
//! validation and hierarchy helpers consumers need to trust that payload.

pub mod codec;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod types;
pub mod util;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    DataPermission, DataScope, ExtInfo, HttpMethod, Menu, MenuType, Permission, PermissionType,
    Resource, Role, UserAuth, UserPermissionSet,
};
pub use types::{ExtMap, ExtValue, Identifier, PermissionKey, Status, Timestamp, Visibility};
pub use validation::{Issue, Severity, ValidationOptions, ValidationReport, Validator};
