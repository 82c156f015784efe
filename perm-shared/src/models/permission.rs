//! Permission Model

use crate::types::{Identifier, PermissionKey, Status};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Menu,
    Button,
    Api,
    Data,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Button => "button",
            Self::Api => "api",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request method of an api permission (`*` matches any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "*")]
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Any => "*",
        }
    }

    /// Whether a request with `method` is covered
    pub fn matches(&self, method: &http::Method) -> bool {
        match self {
            Self::Any => true,
            _ => self.as_http().as_ref() == Some(method),
        }
    }

    /// The concrete `http::Method`, `None` for the wildcard
    pub fn as_http(&self) -> Option<http::Method> {
        match self {
            Self::Get => Some(http::Method::GET),
            Self::Post => Some(http::Method::POST),
            Self::Put => Some(http::Method::PUT),
            Self::Delete => Some(http::Method::DELETE),
            Self::Any => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource a permission guards
///
/// `method` only means something for api permissions and `component` only
/// for menu permissions; both are accepted on any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Route path or request path
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Front-end component path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl Resource {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: None,
            component: None,
        }
    }
}

/// Permission entity (atomic access grant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Canonical cross-reference code (`sys:user:list`)
    pub permission_key: PermissionKey,
    pub permission_id: Identifier,
    pub permission_name: String,
    #[serde(rename = "type")]
    pub kind: PermissionType,
    pub resource: Resource,
    /// Parent permission (e.g. the menu a button sits under)
    pub parent_id: Identifier,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    pub fn new(
        permission_key: impl Into<PermissionKey>,
        permission_id: impl Into<Identifier>,
        permission_name: impl Into<String>,
        kind: PermissionType,
        path: impl Into<String>,
    ) -> Self {
        Self {
            permission_key: permission_key.into(),
            permission_id: permission_id.into(),
            permission_name: permission_name.into(),
            kind,
            resource: Resource::path(path),
            parent_id: Identifier::root(),
            status: Status::Active,
            sort: None,
            description: None,
        }
    }

    /// Api permission guarding `method path`
    pub fn api(
        permission_key: impl Into<PermissionKey>,
        permission_id: impl Into<Identifier>,
        permission_name: impl Into<String>,
        path: impl Into<String>,
        method: HttpMethod,
    ) -> Self {
        let mut p = Self::new(
            permission_key,
            permission_id,
            permission_name,
            PermissionType::Api,
            path,
        );
        p.resource.method = Some(method);
        p
    }

    /// Menu permission bound to a front-end component
    pub fn menu(
        permission_key: impl Into<PermissionKey>,
        permission_id: impl Into<Identifier>,
        permission_name: impl Into<String>,
        path: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        let mut p = Self::new(
            permission_key,
            permission_id,
            permission_name,
            PermissionType::Menu,
            path,
        );
        p.resource.component = Some(component.into());
        p
    }

    pub fn with_parent(mut self, parent_id: impl Into<Identifier>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn method_applies(&self) -> bool {
        self.kind == PermissionType::Api
    }

    pub fn component_applies(&self) -> bool {
        self.kind == PermissionType::Menu
    }

    /// Request method, ignored unless this is an api permission
    pub fn effective_method(&self) -> Option<HttpMethod> {
        self.resource.method.filter(|_| self.method_applies())
    }

    /// Component path, ignored unless this is a menu permission
    pub fn effective_component(&self) -> Option<&str> {
        self.resource
            .component
            .as_deref()
            .filter(|_| self.component_applies())
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
