//! Menu Model

use crate::types::{Identifier, PermissionKey, Visibility};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Menu node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    /// Grouping directory, no route of its own
    Dir,
    /// Navigable route
    Menu,
    /// Action button inside a menu
    Button,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Menu => "menu",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation node, recursively nested through `children`
///
/// Top-level nodes carry a sentinel `parent_id` (`0` or `""`). Both the
/// nested `children` list and the flat `parent_id` link describe the same
/// hierarchy; [`crate::hierarchy`] converts between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub menu_id: Identifier,
    pub menu_name: String,
    pub parent_id: Identifier,
    /// Route path
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub menu_type: MenuType,
    /// Permission gating visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_key: Option<PermissionKey>,
    pub visible: Visibility,
    /// Cache the routed component
    pub keep_alive: bool,
    /// Lower sorts first
    pub sort: i64,
    /// `None` and `Some(vec![])` both round-trip unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Menu>>,
}

impl Menu {
    pub fn new(
        menu_id: impl Into<Identifier>,
        menu_name: impl Into<String>,
        parent_id: impl Into<Identifier>,
        path: impl Into<String>,
        menu_type: MenuType,
        sort: i64,
    ) -> Self {
        Self {
            menu_id: menu_id.into(),
            menu_name: menu_name.into(),
            parent_id: parent_id.into(),
            path: path.into(),
            redirect: None,
            component: None,
            icon: None,
            menu_type,
            permission_key: None,
            visible: Visibility::Shown,
            keep_alive: false,
            sort,
            children: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Menu>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_permission(mut self, key: impl Into<PermissionKey>) -> Self {
        self.permission_key = Some(key.into());
        self
    }

    pub fn with_visibility(mut self, visible: Visibility) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn push_child(&mut self, child: Menu) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Children as a slice (empty when absent)
    pub fn children(&self) -> &[Menu] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_root_sentinel()
    }

    /// Pre-order walk of this node and every descendant, with depth (self = 0)
    pub fn walk(&self) -> MenuWalk<'_> {
        MenuWalk {
            stack: vec![(0, self)],
        }
    }

    /// Number of nodes in this subtree, self included
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

/// Pre-order iterator returned by [`Menu::walk`]
pub struct MenuWalk<'a> {
    stack: Vec<(usize, &'a Menu)>,
}

impl<'a> Iterator for MenuWalk<'a> {
    type Item = (usize, &'a Menu);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Menu {
        Menu::new(1, "System", 0, "/system", MenuType::Dir, 1).with_children(vec![
            Menu::new(2, "Users", 1, "users", MenuType::Menu, 1).with_children(vec![
                Menu::new(4, "Add", 2, "", MenuType::Button, 1),
            ]),
            Menu::new(3, "Roles", 1, "roles", MenuType::Menu, 2),
        ])
    }

    #[test]
    fn test_menu_walk_preorder() {
        let menu = sample();
        let order: Vec<(usize, String)> = menu
            .walk()
            .map(|(d, m)| (d, m.menu_id.normalized()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "1".to_string()),
                (1, "2".to_string()),
                (2, "4".to_string()),
                (1, "3".to_string()),
            ]
        );
        assert_eq!(menu.node_count(), 4);
    }

    #[test]
    fn test_menu_children_absent_vs_empty() {
        let without = Menu::new(1, "a", 0, "/a", MenuType::Menu, 0);
        let with_empty = without.clone().with_children(vec![]);

        let a = serde_json::to_value(&without).unwrap();
        let b = serde_json::to_value(&with_empty).unwrap();
        assert!(a.get("children").is_none());
        assert_eq!(b["children"], json!([]));

        let back: Menu = serde_json::from_value(b).unwrap();
        assert_eq!(back.children, Some(vec![]));
        assert!(back.is_leaf());
    }

    #[test]
    fn test_menu_wire_fields() {
        let menu: Menu = serde_json::from_value(json!({
            "menuId": "m1",
            "menuName": "Dashboard",
            "parentId": "",
            "path": "/dashboard",
            "menuType": "menu",
            "permissionKey": "dash:view",
            "visible": 0,
            "keepAlive": true,
            "sort": 3
        }))
        .unwrap();

        assert!(menu.is_root());
        assert_eq!(menu.visible, Visibility::Hidden);
        assert!(menu.keep_alive);
        assert_eq!(menu.permission_key, Some(PermissionKey::from("dash:view")));
    }

    #[test]
    fn test_menu_rejects_bad_literals() {
        let base = json!({
            "menuId": 1, "menuName": "x", "parentId": 0, "path": "/x",
            "menuType": "menu", "visible": 1, "keepAlive": false, "sort": 0
        });

        let mut bad_type = base.clone();
        bad_type["menuType"] = json!("page");
        assert!(serde_json::from_value::<Menu>(bad_type).is_err());

        let mut bad_visible = base.clone();
        bad_visible["visible"] = json!(2);
        assert!(serde_json::from_value::<Menu>(bad_visible).is_err());

        let mut missing_sort = base;
        missing_sort.as_object_mut().unwrap().remove("sort");
        assert!(serde_json::from_value::<Menu>(missing_sort).is_err());
    }

    #[test]
    fn test_push_child() {
        let mut menu = Menu::new(1, "a", 0, "/a", MenuType::Dir, 0);
        assert!(menu.children.is_none());
        menu.push_child(Menu::new(2, "b", 1, "b", MenuType::Menu, 0));
        assert_eq!(menu.children().len(), 1);
    }
}
