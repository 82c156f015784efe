//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Used by backends that refuse to issue (or clients that refuse to
    /// accept) a malformed permission payload.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 401 Unauthorized
            Self::TokenMissing | Self::TokenExpired | Self::InvalidExpireTime => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::AccountDisabled | Self::MenuPermissionMissing => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::PermissionNotFound | Self::RoleNotFound | Self::MenuNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::DuplicatePermissionId
            | Self::DuplicatePermissionKey
            | Self::DuplicateRoleId
            | Self::DuplicateMenuId => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (well-formed JSON, broken structure)
            Self::PermissionCycle
            | Self::RoleCycle
            | Self::MenuCycle
            | Self::MenuOrphan
            | Self::MenuParentMismatch
            | Self::CustomIdsMissing
            | Self::CustomIdsEmpty
            | Self::CustomIdsIgnored
            | Self::MethodNotApplicable
            | Self::ComponentNotApplicable => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError | Self::IoError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for format/validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::TokenMissing.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::DuplicateMenuId.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::DuplicatePermissionKey.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_structural_status() {
        assert_eq!(
            ErrorCode::MenuCycle.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::CustomIdsMissing.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::InvalidFormat.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidEnumValue.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::IoError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
