//! User Auth Model

use crate::types::{Identifier, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// Identity and token record issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuth {
    pub user_id: Identifier,
    /// Login account name
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    /// Bearer token for API requests (required, non-empty)
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token expiry (Unix milliseconds), in the future at issuance
    pub expire_time: Timestamp,
    /// Tenant reference for multi-tenant deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Identifier>,
    pub status: Status,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_info: Option<ExtInfo>,
}

/// Organisational placement of the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtInfo {
    pub dept_id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Identifier>,
}

impl UserAuth {
    /// Create an active user record with the mandatory fields
    pub fn new(
        user_id: impl Into<Identifier>,
        username: impl Into<String>,
        access_token: impl Into<String>,
        expire_time: Timestamp,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            real_name: None,
            access_token: access_token.into(),
            refresh_token: None,
            expire_time,
            tenant_id: None,
            status: Status::Active,
            avatar: None,
            ext_info: None,
        }
    }

    pub fn with_real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = Some(real_name.into());
        self
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<Identifier>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar = Some(url.into());
        self
    }

    pub fn with_dept(mut self, dept_id: impl Into<Identifier>, post_id: Option<Identifier>) -> Self {
        self.ext_info = Some(ExtInfo {
            dept_id: dept_id.into(),
            post_id,
        });
        self
    }

    /// Token is expired at `now` (Unix milliseconds)
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expire_time <= now
    }

    /// Milliseconds left before expiry, negative once expired
    pub fn remaining_millis(&self, now: Timestamp) -> i64 {
        self.expire_time.saturating_sub(now)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Display name, falling back to the account name
    pub fn display_name(&self) -> &str {
        self.real_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}
