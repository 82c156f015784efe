//! Role Model

use crate::types::{Identifier, Status};
use serde::{Deserialize, Serialize};

/// Role entity (RBAC 角色)
///
/// `parent_role_id` links roles into a hierarchy. The type does not prevent
/// cycles; see [`crate::hierarchy::role_ancestors`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub role_id: Identifier,
    pub role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Status,
    /// References to `Permission.permission_id`, order preserved
    pub permission_ids: Vec<Identifier>,
    /// Lower sorts first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_role_id: Option<Identifier>,
}

impl Role {
    pub fn new(role_id: impl Into<Identifier>, role_name: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            role_name: role_name.into(),
            description: None,
            status: Status::Active,
            permission_ids: Vec::new(),
            sort: None,
            parent_role_id: None,
        }
    }

    pub fn with_permissions<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        self.permission_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<Identifier>) -> Self {
        self.parent_role_id = Some(parent.into());
        self
    }

    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Whether the role lists the permission id (compared normalized)
    pub fn references_permission(&self, id: &Identifier) -> bool {
        self.permission_ids.iter().any(|p| p.same_as(id))
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
