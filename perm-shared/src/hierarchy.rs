//! Hierarchy helpers
//!
//! The payload carries three independent hierarchies: permissions
//! (`parent_id`), roles (`parent_role_id`) and menus (`parent_id` plus nested
//! `children`). None of the types rule out cycles, so anything that builds a
//! tree from the flat links goes through [`detect_cycle`] first.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{Menu, Permission, Role};
use crate::types::Identifier;
use std::collections::{HashMap, HashSet};

/// A node linked to its parent by identifier
pub trait HierarchyNode {
    fn node_id(&self) -> &Identifier;

    /// Parent link, `None` for top-level nodes
    fn parent(&self) -> Option<&Identifier>;
}

impl<T: HierarchyNode + ?Sized> HierarchyNode for &T {
    fn node_id(&self) -> &Identifier {
        (**self).node_id()
    }

    fn parent(&self) -> Option<&Identifier> {
        (**self).parent()
    }
}

impl HierarchyNode for Permission {
    fn node_id(&self) -> &Identifier {
        &self.permission_id
    }

    fn parent(&self) -> Option<&Identifier> {
        Some(&self.parent_id).filter(|p| !p.is_root_sentinel())
    }
}

impl HierarchyNode for Role {
    fn node_id(&self) -> &Identifier {
        &self.role_id
    }

    fn parent(&self) -> Option<&Identifier> {
        self.parent_role_id
            .as_ref()
            .filter(|p| !p.is_root_sentinel())
    }
}

impl HierarchyNode for Menu {
    fn node_id(&self) -> &Identifier {
        &self.menu_id
    }

    fn parent(&self) -> Option<&Identifier> {
        Some(&self.parent_id).filter(|p| !p.is_root_sentinel())
    }
}

/// Ordering weight; `None` sorts after every weighted item
pub trait Weighted {
    fn weight(&self) -> Option<i64>;
}

impl Weighted for Role {
    fn weight(&self) -> Option<i64> {
        self.sort
    }
}

impl Weighted for Permission {
    fn weight(&self) -> Option<i64> {
        self.sort
    }
}

impl Weighted for Menu {
    fn weight(&self) -> Option<i64> {
        Some(self.sort)
    }
}

/// Normalized ids that appear more than once, in first-repeat order
pub fn find_duplicates<'a, N, I>(nodes: I) -> Vec<String>
where
    N: HierarchyNode + 'a,
    I: IntoIterator<Item = &'a N>,
{
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for node in nodes {
        let id = node.node_id().normalized();
        if !seen.insert(id.clone()) && !dups.contains(&id) {
            dups.push(id);
        }
    }
    dups
}

/// Find the first parent-link cycle
///
/// Returns the cycle as a list of normalized ids that starts and ends with
/// the same id (`["a", "b", "a"]`). Links to unknown parents end a chain
/// without being a cycle. When ids are duplicated the first node wins.
pub fn detect_cycle<N: HierarchyNode>(nodes: &[N]) -> Option<Vec<String>> {
    let mut parents: HashMap<String, Option<String>> = HashMap::with_capacity(nodes.len());
    let mut order = Vec::with_capacity(nodes.len());
    for node in nodes {
        let id = node.node_id().normalized();
        if parents.contains_key(&id) {
            continue;
        }
        parents.insert(id.clone(), node.parent().map(Identifier::normalized));
        order.push(id);
    }

    // Nodes whose chain is known to terminate
    let mut done: HashSet<String> = HashSet::new();
    for start in order {
        if done.contains(&start) {
            continue;
        }
        let mut path: Vec<String> = Vec::new();
        let mut on_path: HashSet<String> = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if done.contains(&id) {
                break;
            }
            if on_path.contains(&id) {
                let from = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle = path[from..].to_vec();
                cycle.push(id);
                return Some(cycle);
            }
            on_path.insert(id.clone());
            path.push(id.clone());
            current = parents
                .get(&id)
                .cloned()
                .flatten()
                .filter(|p| parents.contains_key(p));
        }
        done.extend(path);
    }
    None
}

/// Flatten a nested menu tree into pre-order, clearing `children`
///
/// Parent ids are kept as they are on the wire. Uses an explicit stack, so
/// depth is bounded by memory rather than the call stack.
pub fn flatten_menus(tree: Vec<Menu>) -> Vec<Menu> {
    let mut out = Vec::new();
    let mut stack: Vec<Menu> = tree.into_iter().rev().collect();
    while let Some(mut node) = stack.pop() {
        if let Some(children) = node.children.take() {
            stack.extend(children.into_iter().rev());
        }
        out.push(node);
    }
    out
}

/// Build a nested tree from `parent_id` links
///
/// Nodes that already carry children are flattened first, so mixed input is
/// accepted. Siblings are ordered by `sort` with input position breaking
/// ties. Fails on duplicate ids, cycles and parents that do not exist.
pub fn build_menu_tree(menus: Vec<Menu>) -> AppResult<Vec<Menu>> {
    let flat = flatten_menus(menus);

    if let Some(dup) = find_duplicates(&flat).into_iter().next() {
        return Err(
            AppError::with_message(ErrorCode::DuplicateMenuId, format!("Menu id {} is duplicated", dup))
                .with_detail("menuId", dup),
        );
    }
    if let Some(cycle) = detect_cycle(&flat) {
        return Err(AppError::cycle(ErrorCode::MenuCycle, &cycle));
    }

    let known: HashSet<String> = flat.iter().map(|m| m.menu_id.normalized()).collect();
    let mut root_ids = Vec::new();
    let mut children_of: HashMap<String, Vec<String>> = HashMap::new();
    let mut nodes: HashMap<String, Menu> = HashMap::with_capacity(flat.len());
    for menu in flat {
        let id = menu.menu_id.normalized();
        match menu.parent().map(Identifier::normalized) {
            None => root_ids.push(id.clone()),
            Some(parent) if known.contains(&parent) => {
                children_of.entry(parent).or_default().push(id.clone())
            }
            Some(parent) => {
                return Err(AppError::with_message(
                    ErrorCode::MenuOrphan,
                    format!("Menu {} has unknown parent {}", menu.menu_id, parent),
                )
                .with_detail("menuId", id)
                .with_detail("parentId", parent));
            }
        }
        nodes.insert(id, menu);
    }

    // Breadth-first order from the roots; assembling in reverse attaches
    // every child before its parent without recursion
    let mut order = root_ids.clone();
    let mut i = 0;
    while i < order.len() {
        if let Some(kids) = children_of.get(&order[i]) {
            order.extend(kids.iter().cloned());
        }
        i += 1;
    }

    let mut built: HashMap<String, Menu> = HashMap::with_capacity(order.len());
    for id in order.iter().rev() {
        let Some(mut node) = nodes.remove(id) else {
            continue;
        };
        if let Some(kid_ids) = children_of.remove(id) {
            let mut kids: Vec<Menu> = kid_ids.iter().filter_map(|k| built.remove(k)).collect();
            sort_by_weight(&mut kids);
            node.children = Some(kids);
        }
        built.insert(id.clone(), node);
    }

    let mut roots: Vec<Menu> = root_ids.iter().filter_map(|id| built.remove(id)).collect();
    sort_by_weight(&mut roots);
    tracing::trace!(roots = roots.len(), "menu tree built");
    Ok(roots)
}

/// Stable sort by weight; unweighted items keep their position after the
/// weighted ones
pub fn sort_by_weight<T: Weighted>(items: &mut [T]) {
    items.sort_by_key(|item| {
        let w = item.weight();
        (w.is_none(), w.unwrap_or_default())
    });
}

/// Sort every level of a menu tree by `sort`
pub fn sort_menus(tree: &mut [Menu]) {
    let mut stack: Vec<&mut [Menu]> = vec![tree];
    while let Some(level) = stack.pop() {
        sort_by_weight(level);
        for node in level {
            if let Some(children) = node.children.as_mut() {
                stack.push(children);
            }
        }
    }
}

/// Number of levels in a menu tree (roots alone = 1, empty = 0)
pub fn menu_depth(tree: &[Menu]) -> usize {
    tree.iter()
        .flat_map(|root| root.walk())
        .map(|(depth, _)| depth + 1)
        .max()
        .unwrap_or(0)
}

/// Ancestors of a role, nearest parent first
///
/// The walk stops at a top-level role or at a parent id that is not in
/// `roles`. Fails when the role is unknown or the chain loops.
pub fn role_ancestors<'a>(roles: &'a [Role], role_id: &Identifier) -> AppResult<Vec<&'a Role>> {
    let find = |id: &Identifier| roles.iter().find(|r| r.role_id.same_as(id));

    let start = find(role_id).ok_or_else(|| {
        AppError::with_message(ErrorCode::RoleNotFound, format!("Role {} not found", role_id))
            .with_detail("roleId", role_id.normalized())
    })?;

    let mut path = vec![start.role_id.normalized()];
    let mut ancestors = Vec::new();
    let mut current = start;
    while let Some(parent_id) = current.parent() {
        let Some(parent) = find(parent_id) else {
            break;
        };
        let id = parent.role_id.normalized();
        if path.contains(&id) {
            path.push(id);
            return Err(AppError::cycle(ErrorCode::RoleCycle, &path));
        }
        path.push(id);
        ancestors.push(parent);
        current = parent;
    }
    Ok(ancestors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuType, PermissionType};

    fn menu(id: i64, parent: i64, sort: i64) -> Menu {
        Menu::new(id, format!("m{id}"), parent, format!("/m{id}"), MenuType::Menu, sort)
    }

    fn ids(tree: &[Menu]) -> Vec<String> {
        tree.iter().map(|m| m.menu_id.normalized()).collect()
    }

    #[test]
    fn test_detect_cycle_none() {
        let perms = vec![
            Permission::new("a", 1, "a", PermissionType::Menu, "/a"),
            Permission::new("b", 2, "b", PermissionType::Button, "/b").with_parent(1),
            Permission::new("c", 3, "c", PermissionType::Button, "/c").with_parent(99),
        ];
        assert!(detect_cycle(&perms).is_none());
    }

    #[test]
    fn test_detect_cycle_found() {
        let perms = vec![
            Permission::new("a", 1, "a", PermissionType::Menu, "/a").with_parent(3),
            Permission::new("b", 2, "b", PermissionType::Menu, "/b").with_parent(1),
            Permission::new("c", "3", "c", PermissionType::Menu, "/c").with_parent(2),
        ];
        assert_eq!(
            detect_cycle(&perms),
            Some(vec!["1".into(), "3".into(), "2".into(), "1".into()])
        );
    }

    #[test]
    fn test_detect_self_cycle() {
        let roles = vec![Role::new(5, "loop").with_parent(5)];
        assert_eq!(detect_cycle(&roles), Some(vec!["5".into(), "5".into()]));
    }

    #[test]
    fn test_detect_cycle_reached_from_tail() {
        // 1 -> 2 -> 3 -> 2: the chain from 1 enters the loop
        let menus = vec![menu(1, 2, 0), menu(2, 3, 0), menu(3, 2, 0)];
        assert_eq!(
            detect_cycle(&menus),
            Some(vec!["2".into(), "3".into(), "2".into()])
        );
    }

    #[test]
    fn test_find_duplicates() {
        let menus = vec![menu(1, 0, 0), menu(2, 0, 0), menu(1, 0, 0), menu(1, 0, 0)];
        assert_eq!(find_duplicates(&menus), vec!["1".to_string()]);
    }

    #[test]
    fn test_build_menu_tree() {
        let flat = vec![
            menu(3, 1, 2),
            menu(1, 0, 1),
            menu(2, 1, 1),
            menu(4, 2, 0),
            menu(5, 0, 0),
        ];
        let tree = build_menu_tree(flat).unwrap();
        assert_eq!(ids(&tree), vec!["5", "1"]);
        assert!(tree[0].children.is_none());
        assert_eq!(ids(tree[1].children()), vec!["2", "3"]);
        assert_eq!(ids(tree[1].children()[0].children()), vec!["4"]);
        assert_eq!(menu_depth(&tree), 3);
    }

    #[test]
    fn test_build_menu_tree_errors() {
        let err = build_menu_tree(vec![menu(1, 0, 0), menu(2, 7, 0)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuOrphan);

        let err = build_menu_tree(vec![menu(1, 2, 0), menu(2, 1, 0)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuCycle);

        let err = build_menu_tree(vec![menu(1, 0, 0), menu(1, 0, 1)]).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateMenuId);
    }

    #[test]
    fn test_flatten_then_build_roundtrip() {
        let tree = vec![menu(1, 0, 0).with_children(vec![
            menu(2, 1, 0).with_children(vec![menu(3, 2, 0)]),
            menu(4, 1, 1),
        ])];
        let flat = flatten_menus(tree.clone());
        assert_eq!(ids(&flat), vec!["1", "2", "3", "4"]);
        assert!(flat.iter().all(|m| m.children.is_none()));
        assert_eq!(build_menu_tree(flat).unwrap(), tree);
    }

    #[test]
    fn test_sort_menus_stable() {
        let mut tree = vec![
            menu(1, 0, 2),
            menu(2, 0, 1).with_children(vec![menu(5, 2, 9), menu(3, 2, 1), menu(4, 2, 1)]),
            menu(6, 0, 1),
        ];
        sort_menus(&mut tree);
        assert_eq!(ids(&tree), vec!["2", "6", "1"]);
        assert_eq!(ids(tree[0].children()), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_sort_by_weight_unweighted_last() {
        let mut roles = vec![
            Role::new("a", "a"),
            Role::new("b", "b").with_sort(2),
            Role::new("c", "c"),
            Role::new("d", "d").with_sort(1),
        ];
        sort_by_weight(&mut roles);
        let order: Vec<String> = roles.iter().map(|r| r.role_id.normalized()).collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_role_ancestors() {
        let roles = vec![
            Role::new(1, "root"),
            Role::new(2, "manager").with_parent(1),
            Role::new(3, "clerk").with_parent("2"),
        ];
        let chain: Vec<String> = role_ancestors(&roles, &Identifier::Int(3))
            .unwrap()
            .iter()
            .map(|r| r.role_name.clone())
            .collect();
        assert_eq!(chain, vec!["manager", "root"]);

        let err = role_ancestors(&roles, &Identifier::Int(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
    }

    #[test]
    fn test_role_ancestors_cycle() {
        let roles = vec![
            Role::new(1, "a").with_parent(2),
            Role::new(2, "b").with_parent(1),
        ];
        let err = role_ancestors(&roles, &Identifier::Int(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleCycle);
    }

    #[test]
    fn test_role_ancestors_dangling_parent_stops() {
        let roles = vec![Role::new(1, "a").with_parent(42)];
        assert!(role_ancestors(&roles, &Identifier::Int(1)).unwrap().is_empty());
    }

    #[test]
    fn test_long_parent_chain() {
        const DEPTH: i64 = 2_000;
        // Listed leaf first so every parent appears after its child
        let flat: Vec<Menu> = (1..=DEPTH).rev().map(|id| menu(id, id - 1, 0)).collect();

        let mut tree = build_menu_tree(flat).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(menu_depth(&tree), DEPTH as usize);
        sort_menus(&mut tree);

        let back = flatten_menus(tree);
        assert_eq!(back.len(), DEPTH as usize);
        assert_eq!(back[0].menu_id, Identifier::Int(1));
        assert_eq!(back[back.len() - 1].menu_id, Identifier::Int(DEPTH));
        assert!(back.iter().all(|m| m.children.is_none()));
    }
}
