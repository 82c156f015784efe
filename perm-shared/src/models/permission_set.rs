//! User Permission Set
//!
//! The aggregate a login or session-refresh endpoint returns. Cross-entity
//! references (`Role.permission_ids`, `Menu.permission_key`) are resolved by
//! lookup here; nothing in the payload owns anything else.

use super::{DataPermission, Menu, Permission, Role, UserAuth};
use crate::types::{ExtMap, Identifier};
use serde::{Deserialize, Serialize};

/// Full permission payload for one authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionSet {
    pub user_auth: UserAuth,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    /// Menu tree roots
    pub menus: Vec<Menu>,
    pub data_permission: DataPermission,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_config: Option<ExtMap>,
}

impl UserPermissionSet {
    pub fn new(user_auth: UserAuth, data_permission: DataPermission) -> Self {
        Self {
            user_auth,
            roles: Vec::new(),
            permissions: Vec::new(),
            menus: Vec::new(),
            data_permission,
            ext_config: None,
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_menus(mut self, menus: Vec<Menu>) -> Self {
        self.menus = menus;
        self
    }

    pub fn with_ext_config(mut self, ext_config: ExtMap) -> Self {
        self.ext_config = Some(ext_config);
        self
    }

    pub fn permission_by_id(&self, id: &Identifier) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.permission_id.same_as(id))
    }

    pub fn permission_by_key(&self, key: &str) -> Option<&Permission> {
        self.permissions
            .iter()
            .find(|p| p.permission_key.as_str() == key)
    }

    pub fn role_by_id(&self, id: &Identifier) -> Option<&Role> {
        self.roles.iter().find(|r| r.role_id.same_as(id))
    }

    /// Permissions a role lists, in the role's order; unresolved ids are skipped
    pub fn role_permissions(&self, role: &Role) -> Vec<&Permission> {
        role.permission_ids
            .iter()
            .filter_map(|id| self.permission_by_id(id))
            .collect()
    }

    /// Permission gating a menu: the exact key first, then any wildcard key
    /// that grants it
    pub fn menu_permission(&self, menu: &Menu) -> Option<&Permission> {
        let key = menu.permission_key.as_ref()?;
        self.permission_by_key(key.as_str()).or_else(|| {
            self.permissions
                .iter()
                .find(|p| p.permission_key.grants(key.as_str()))
        })
    }

    /// Search the whole menu tree for a node
    pub fn find_menu(&self, id: &Identifier) -> Option<&Menu> {
        self.menus
            .iter()
            .flat_map(|root| root.walk())
            .map(|(_, m)| m)
            .find(|m| m.menu_id.same_as(id))
    }

    /// Total number of menu nodes across all roots
    pub fn menu_count(&self) -> usize {
        self.menus.iter().map(Menu::node_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataScope, HttpMethod, MenuType, PermissionType};

    fn sample() -> UserPermissionSet {
        UserPermissionSet::new(
            UserAuth::new(1, "alice", "tok", 10_000),
            DataPermission::new(1, "all", DataScope::All),
        )
        .with_permissions(vec![
            Permission::new("sys:user:*", 10, "Users", PermissionType::Menu, "/users"),
            Permission::api("sys:role:list", "20", "Roles", "/api/roles", HttpMethod::Get),
        ])
        .with_roles(vec![Role::new("admin", "Admin").with_permissions([
            Identifier::from("10"),
            Identifier::Int(99),
            Identifier::Int(20),
        ])])
        .with_menus(vec![
            Menu::new(1, "System", 0, "/sys", MenuType::Dir, 0).with_children(vec![
                Menu::new(2, "Users", 1, "users", MenuType::Menu, 0)
                    .with_permission("sys:user:list"),
                Menu::new(3, "Roles", 1, "roles", MenuType::Menu, 1)
                    .with_permission("sys:role:list"),
            ]),
        ])
    }

    #[test]
    fn test_permission_lookup_normalized() {
        let set = sample();
        assert!(set.permission_by_id(&Identifier::Int(20)).is_some());
        assert!(set.permission_by_id(&Identifier::from("10")).is_some());
        assert!(set.permission_by_key("sys:role:list").is_some());
        assert!(set.permission_by_key("sys:role:add").is_none());
    }

    #[test]
    fn test_role_permissions_preserve_order() {
        let set = sample();
        let role = set.role_by_id(&Identifier::from("admin")).unwrap();
        let keys: Vec<&str> = set
            .role_permissions(role)
            .iter()
            .map(|p| p.permission_key.as_str())
            .collect();
        assert_eq!(keys, vec!["sys:user:*", "sys:role:list"]);
    }

    #[test]
    fn test_menu_permission_wildcard() {
        let set = sample();
        let users = set.find_menu(&Identifier::Int(2)).unwrap();
        assert_eq!(
            set.menu_permission(users).unwrap().permission_key.as_str(),
            "sys:user:*"
        );
        let roles = set.find_menu(&Identifier::from("3")).unwrap();
        assert_eq!(
            set.menu_permission(roles).unwrap().permission_key.as_str(),
            "sys:role:list"
        );
        let root = set.find_menu(&Identifier::Int(1)).unwrap();
        assert!(set.menu_permission(root).is_none());
        assert_eq!(set.menu_count(), 3);
    }
}
