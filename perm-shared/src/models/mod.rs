//! Data models
//!
//! Wire types of the permission payload. Field names are camelCase on the
//! wire, identifiers accept strings or integers, optional fields are skipped
//! when absent so a payload round-trips unchanged.

pub mod data_permission;
pub mod menu;
pub mod permission;
pub mod permission_set;
pub mod role;
pub mod user_auth;

// Re-exports
pub use data_permission::*;
pub use menu::*;
pub use permission::*;
pub use permission_set::*;
pub use role::*;
pub use user_auth::*;
