//! JSON encode/decode entry points
//!
//! Thin wrappers over `serde_json` that report failures as [`AppError`]s
//! carrying the offending line and column.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::UserPermissionSet;
use crate::types::FLAG_EXPECTED;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Classify a serde failure into an error code
fn error_code_for(err: &serde_json::Error) -> ErrorCode {
    if err.is_io() {
        return ErrorCode::IoError;
    }
    let msg = err.to_string();
    if msg.contains("unknown variant") || msg.contains(FLAG_EXPECTED) {
        ErrorCode::InvalidEnumValue
    } else if msg.contains("missing field") {
        ErrorCode::RequiredField
    } else {
        ErrorCode::InvalidFormat
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let code = error_code_for(&err);
        tracing::debug!(code = %code, error = %err, "payload decode failed");
        AppError::with_message(code, err.to_string())
            .with_detail("line", err.line())
            .with_detail("column", err.column())
    }
}

/// Decode any payload type from a JSON string
pub fn decode_str<T: DeserializeOwned>(json: &str) -> AppResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a [`UserPermissionSet`] from a JSON string
pub fn from_json_str(json: &str) -> AppResult<UserPermissionSet> {
    decode_str(json)
}

/// Decode a [`UserPermissionSet`] from JSON bytes
pub fn from_json_slice(bytes: &[u8]) -> AppResult<UserPermissionSet> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode a [`UserPermissionSet`] from an already parsed JSON value
pub fn from_json_value(value: serde_json::Value) -> AppResult<UserPermissionSet> {
    Ok(serde_json::from_value(value)?)
}

/// Decode a [`UserPermissionSet`] from a reader
pub fn from_json_reader<R: Read>(reader: R) -> AppResult<UserPermissionSet> {
    Ok(serde_json::from_reader(reader)?)
}

/// Compact JSON encoding
pub fn to_json_string<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|e| AppError::internal(e.to_string()))
}

/// Pretty-printed JSON encoding
pub fn to_json_pretty<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::internal(e.to_string()))
}
