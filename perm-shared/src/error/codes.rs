//! Unified error codes for permission payloads
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Role errors
//! - 4xxx: Menu errors
//! - 5xxx: Data scope errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they travel unchanged
/// between the backend that issues a payload and the clients that check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Payload is not well-formed
    InvalidFormat = 6,
    /// Required field missing or empty
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Literal outside the enumerated set
    InvalidEnumValue = 9,

    // ==================== 1xxx: Auth ====================
    /// Access token missing or blank
    TokenMissing = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Expire time is not a usable timestamp
    InvalidExpireTime = 1008,

    // ==================== 2xxx: Permission ====================
    /// Referenced permission not present in the payload
    PermissionNotFound = 2001,
    /// Two permissions share a permission id
    DuplicatePermissionId = 2002,
    /// Two permissions share a permission key
    DuplicatePermissionKey = 2003,
    /// Permission parent chain loops back on itself
    PermissionCycle = 2004,
    /// Request method on a non-api permission
    MethodNotApplicable = 2005,
    /// Component on a non-menu permission
    ComponentNotApplicable = 2006,

    // ==================== 3xxx: Role ====================
    /// Referenced role not present in the payload
    RoleNotFound = 3001,
    /// Two roles share a role id
    DuplicateRoleId = 3002,
    /// Role parent chain loops back on itself
    RoleCycle = 3003,

    // ==================== 4xxx: Menu ====================
    /// Referenced menu not present
    MenuNotFound = 4001,
    /// Two menu nodes share a menu id
    DuplicateMenuId = 4002,
    /// Menu parent chain loops back on itself
    MenuCycle = 4003,
    /// Menu parent id disagrees with its position in the tree
    MenuParentMismatch = 4004,
    /// Menu parent id points at no known menu
    MenuOrphan = 4005,
    /// Menu gated by a permission key the payload does not grant
    MenuPermissionMissing = 4006,

    // ==================== 5xxx: Data scope ====================
    /// Custom scope without custom ids
    CustomIdsMissing = 5001,
    /// Custom scope with an empty custom id list
    CustomIdsEmpty = 5002,
    /// Custom ids supplied for a non-custom scope
    CustomIdsIgnored = 5003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// I/O error
    IoError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidEnumValue => "Value is not one of the allowed literals",

            // Auth
            ErrorCode::TokenMissing => "Access token is missing",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::InvalidExpireTime => "Expire time is not a valid timestamp",

            // Permission
            ErrorCode::PermissionNotFound => "Permission not found",
            ErrorCode::DuplicatePermissionId => "Permission id is duplicated",
            ErrorCode::DuplicatePermissionKey => "Permission key is duplicated",
            ErrorCode::PermissionCycle => "Permission hierarchy contains a cycle",
            ErrorCode::MethodNotApplicable => "Request method only applies to api permissions",
            ErrorCode::ComponentNotApplicable => "Component only applies to menu permissions",

            // Role
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::DuplicateRoleId => "Role id is duplicated",
            ErrorCode::RoleCycle => "Role hierarchy contains a cycle",

            // Menu
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::DuplicateMenuId => "Menu id is duplicated",
            ErrorCode::MenuCycle => "Menu hierarchy contains a cycle",
            ErrorCode::MenuParentMismatch => "Menu parent id does not match its parent",
            ErrorCode::MenuOrphan => "Menu parent does not exist",
            ErrorCode::MenuPermissionMissing => "Menu permission key is not granted",

            // Data scope
            ErrorCode::CustomIdsMissing => "Custom scope requires custom ids",
            ErrorCode::CustomIdsEmpty => "Custom scope has an empty custom id list",
            ErrorCode::CustomIdsIgnored => "Custom ids only apply to the custom scope",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::IoError => "I/O error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::InvalidEnumValue),

            // Auth
            1001 => Ok(ErrorCode::TokenMissing),
            1003 => Ok(ErrorCode::TokenExpired),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::InvalidExpireTime),

            // Permission
            2001 => Ok(ErrorCode::PermissionNotFound),
            2002 => Ok(ErrorCode::DuplicatePermissionId),
            2003 => Ok(ErrorCode::DuplicatePermissionKey),
            2004 => Ok(ErrorCode::PermissionCycle),
            2005 => Ok(ErrorCode::MethodNotApplicable),
            2006 => Ok(ErrorCode::ComponentNotApplicable),

            // Role
            3001 => Ok(ErrorCode::RoleNotFound),
            3002 => Ok(ErrorCode::DuplicateRoleId),
            3003 => Ok(ErrorCode::RoleCycle),

            // Menu
            4001 => Ok(ErrorCode::MenuNotFound),
            4002 => Ok(ErrorCode::DuplicateMenuId),
            4003 => Ok(ErrorCode::MenuCycle),
            4004 => Ok(ErrorCode::MenuParentMismatch),
            4005 => Ok(ErrorCode::MenuOrphan),
            4006 => Ok(ErrorCode::MenuPermissionMissing),

            // Data scope
            5001 => Ok(ErrorCode::CustomIdsMissing),
            5002 => Ok(ErrorCode::CustomIdsEmpty),
            5003 => Ok(ErrorCode::CustomIdsIgnored),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::IoError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::InvalidFormat.code(), 6);
        assert_eq!(ErrorCode::InvalidEnumValue.code(), 9);
        assert_eq!(ErrorCode::TokenMissing.code(), 1001);
        assert_eq!(ErrorCode::PermissionCycle.code(), 2004);
        assert_eq!(ErrorCode::RoleCycle.code(), 3003);
        assert_eq!(ErrorCode::MenuParentMismatch.code(), 4004);
        assert_eq!(ErrorCode::CustomIdsEmpty.code(), 5002);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::TokenExpired.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1003), Ok(ErrorCode::TokenExpired));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::DuplicateMenuId));
        assert_eq!(ErrorCode::try_from(5001), Ok(ErrorCode::CustomIdsMissing));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(6001), Err(InvalidErrorCode(6001)));
    }

    #[test]
    fn test_try_from_covers_every_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::InvalidEnumValue,
            ErrorCode::TokenMissing,
            ErrorCode::TokenExpired,
            ErrorCode::AccountDisabled,
            ErrorCode::InvalidExpireTime,
            ErrorCode::PermissionNotFound,
            ErrorCode::DuplicatePermissionId,
            ErrorCode::DuplicatePermissionKey,
            ErrorCode::PermissionCycle,
            ErrorCode::MethodNotApplicable,
            ErrorCode::ComponentNotApplicable,
            ErrorCode::RoleNotFound,
            ErrorCode::DuplicateRoleId,
            ErrorCode::RoleCycle,
            ErrorCode::MenuNotFound,
            ErrorCode::DuplicateMenuId,
            ErrorCode::MenuCycle,
            ErrorCode::MenuParentMismatch,
            ErrorCode::MenuOrphan,
            ErrorCode::MenuPermissionMissing,
            ErrorCode::CustomIdsMissing,
            ErrorCode::CustomIdsEmpty,
            ErrorCode::CustomIdsIgnored,
            ErrorCode::InternalError,
            ErrorCode::IoError,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::MenuCycle).unwrap();
        assert_eq!(json, "4003");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::TokenExpired), "1003");
        assert_eq!(
            ErrorCode::CustomIdsMissing.message(),
            "Custom scope requires custom ids"
        );
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
