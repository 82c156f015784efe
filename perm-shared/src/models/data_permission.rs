//! Data Permission Model

use crate::types::{ExtMap, ExtValue, Identifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row-level data scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataScope {
    /// Only the user's own records
    #[serde(rename = "self")]
    SelfOnly,
    /// The user's department
    #[serde(rename = "dept")]
    Dept,
    /// The user's department and every sub-department
    #[serde(rename = "deptAndSub")]
    DeptAndSub,
    /// Unrestricted
    #[serde(rename = "all")]
    All,
    /// Explicit id list in `custom_ids`
    #[serde(rename = "custom")]
    Custom,
}

impl DataScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfOnly => "self",
            Self::Dept => "dept",
            Self::DeptAndSub => "deptAndSub",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data permission entity (数据权限)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPermission {
    #[serde(rename = "dataPermission")]
    pub id: Identifier,
    pub data_perm_name: String,
    pub scope: DataScope,
    /// Only meaningful for [`DataScope::Custom`]; an empty list is accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ids: Option<Vec<Identifier>>,
    /// Extra query predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_condition: Option<ExtMap>,
}

impl DataPermission {
    pub fn new(id: impl Into<Identifier>, name: impl Into<String>, scope: DataScope) -> Self {
        Self {
            id: id.into(),
            data_perm_name: name.into(),
            scope,
            custom_ids: None,
            filter_condition: None,
        }
    }

    /// Custom scope over an explicit id list
    pub fn custom<I, T>(id: impl Into<Identifier>, name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        let mut dp = Self::new(id, name, DataScope::Custom);
        dp.custom_ids = Some(ids.into_iter().map(Into::into).collect());
        dp
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<ExtValue>) -> Self {
        self.filter_condition
            .get_or_insert_with(ExtMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Custom ids, ignored unless the scope is custom
    pub fn effective_custom_ids(&self) -> Option<&[Identifier]> {
        match self.scope {
            DataScope::Custom => self.custom_ids.as_deref(),
            _ => None,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.scope == DataScope::All
    }
}
