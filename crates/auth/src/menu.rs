//! Navigation tree pruning.
//!
//! Menu nodes carry requirements in the same `"A | B"` form as operations and
//! are evaluated with [`PermissionExpression::satisfies`], so a visible entry
//! and the operation behind it always agree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AuthzError;
use crate::expression::PermissionExpression;
use crate::permissions::{PermissionCatalog, TokenValidation, admin};
use crate::subject::SubjectPermissionSet;

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Requirement to see this node. `None` means unconditionally visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<PermissionExpression>,
    /// Whether the entry can be navigated to. `false` renders the node
    /// (e.g. a group header) without making it clickable; it does not hide it.
    #[serde(default = "navigable")]
    pub allow: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

fn navigable() -> bool {
    true
}

impl MenuNode {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            icon: None,
            permission: None,
            allow: true,
            children: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_permission(mut self, permission: PermissionExpression) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    pub fn not_navigable(mut self) -> Self {
        self.allow = false;
        self
    }

    pub fn is_navigable(&self) -> bool {
        self.allow
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn walk(&self) -> Vec<&MenuNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Prune `nodes` down to what a subject holding `granted` may see.
///
/// - A node whose requirement fails is dropped with its whole subtree; no
///   descendant is promoted past a hidden ancestor.
/// - A node whose requirement holds is kept, with its children filtered.
/// - A node without requirement is kept if it is a leaf or still has at least
///   one visible child.
///
/// Order is preserved. The input is not modified.
pub fn filter_menu(nodes: &[MenuNode], granted: &SubjectPermissionSet) -> Vec<MenuNode> {
    nodes.iter().filter_map(|node| visible(node, granted)).collect()
}

fn visible(node: &MenuNode, granted: &SubjectPermissionSet) -> Option<MenuNode> {
    if let Some(requirement) = &node.permission {
        if !requirement.satisfies(granted) {
            return None;
        }
    }

    let children = filter_menu(&node.children, granted);
    if node.permission.is_none() && !node.is_leaf() && children.is_empty() {
        return None;
    }

    Some(MenuNode {
        children,
        ..node.clone()
    })
}

#[derive(Debug, Error)]
pub enum MenuConfigError {
    #[error("invalid menu configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("menu entry '{path}': {source}")]
    Permission {
        path: String,
        #[source]
        source: AuthzError,
    },
}

/// The static navigation tree, validated at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    pub fn new(nodes: Vec<MenuNode>, catalog: &PermissionCatalog, mode: TokenValidation) -> Result<Self, MenuConfigError> {
        let tree = Self { nodes };
        tree.validate(catalog, mode)?;
        Ok(tree)
    }

    /// Load a JSON array of nodes. Malformed requirements fail here.
    pub fn from_json(raw: &str, catalog: &PermissionCatalog, mode: TokenValidation) -> Result<Self, MenuConfigError> {
        let nodes: Vec<MenuNode> = serde_json::from_str(raw)?;
        Self::new(nodes, catalog, mode)
    }

    /// The admin console navigation: a non-navigable "Users" group holding
    /// the users, roles and permissions pages.
    pub fn admin_console() -> Result<Self, MenuConfigError> {
        let requirement = |raw: &str, path: &str| {
            PermissionExpression::parse(raw).map_err(|source| MenuConfigError::Permission {
                path: path.to_string(),
                source,
            })
        };

        let nodes = vec![
            MenuNode::new("Users", "_user_group")
                .with_icon("user")
                .with_permission(requirement(admin::USER_GROUP, "_user_group")?)
                .not_navigable()
                .with_children(vec![
                    MenuNode::new("Users", "/users")
                        .with_icon("icon-user")
                        .with_permission(requirement(admin::USER_PAGE, "/users")?),
                    MenuNode::new("Roles", "/roles")
                        .with_icon("icon-role")
                        .with_permission(requirement(admin::ROLE_PAGE, "/roles")?),
                    MenuNode::new("Permissions", "/permissions")
                        .with_icon("icon-permission")
                        .with_permission(requirement(admin::PERMISSION_PAGE, "/permissions")?),
                ]),
        ];

        Self::new(nodes, &PermissionCatalog::admin_console(), TokenValidation::Strict)
    }

    pub fn validate(&self, catalog: &PermissionCatalog, mode: TokenValidation) -> Result<(), MenuConfigError> {
        for node in self.nodes.iter().flat_map(MenuNode::walk) {
            if let Some(requirement) = &node.permission {
                catalog
                    .check(requirement, mode)
                    .map_err(|source| MenuConfigError::Permission {
                        path: node.path.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn visible_to(&self, granted: &SubjectPermissionSet) -> Vec<MenuNode> {
        filter_menu(&self.nodes, granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permission;

    fn granted(tokens: &[&str]) -> SubjectPermissionSet {
        tokens.iter().map(|t| Permission::new(t.to_string())).collect()
    }

    fn expr(raw: &str) -> PermissionExpression {
        PermissionExpression::parse(raw).unwrap()
    }

    fn paths(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().flat_map(MenuNode::walk).map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn child_with_unmet_requirement_is_pruned_from_visible_parent() {
        let tree = vec![
            MenuNode::new("Users", "/users")
                .with_permission(expr("USER_SELECT"))
                .with_children(vec![MenuNode::new("Roles", "/roles").with_permission(expr("ROLE_SELECT"))]),
        ];

        let out = filter_menu(&tree, &granted(&["USER_SELECT"]));
        assert_eq!(paths(&out), vec!["/users"]);
    }

    #[test]
    fn hidden_parent_hides_every_descendant() {
        let tree = vec![
            MenuNode::new("Users", "/users")
                .with_permission(expr("USER_SELECT"))
                .with_children(vec![
                    MenuNode::new("Roles", "/roles")
                        .with_permission(expr("ROLE_SELECT"))
                        .with_children(vec![MenuNode::new("Open", "/open")]),
                ]),
        ];

        let out = filter_menu(&tree, &granted(&["ROLE_SELECT"]));
        assert!(out.is_empty());
    }

    #[test]
    fn unguarded_group_survives_only_with_a_visible_child() {
        let tree = vec![
            MenuNode::new("Admin", "_admin").with_children(vec![
                MenuNode::new("Roles", "/roles").with_permission(expr("ROLE_SELECT")),
            ]),
            MenuNode::new("Home", "/"),
        ];

        assert_eq!(paths(&filter_menu(&tree, &granted(&[]))), vec!["/"]);
        assert_eq!(
            paths(&filter_menu(&tree, &granted(&["ROLE_SELECT"]))),
            vec!["_admin", "/roles", "/"]
        );
    }

    #[test]
    fn guarded_parent_stays_even_if_all_children_are_pruned() {
        let tree = vec![
            MenuNode::new("Users", "/users")
                .with_permission(expr("USER_SELECT"))
                .with_children(vec![MenuNode::new("Roles", "/roles").with_permission(expr("ROLE_SELECT"))]),
        ];

        let out = filter_menu(&tree, &granted(&["USER_SELECT"]));
        assert_eq!(out.len(), 1);
        assert!(out[0].children.is_empty());
    }

    #[test]
    fn non_navigable_nodes_stay_visible() {
        let tree = MenuTree::admin_console().unwrap();
        let out = tree.visible_to(&granted(&["ROLE_SELECT"]));

        assert_eq!(paths(&out), vec!["_user_group", "/roles"]);
        assert!(!out[0].is_navigable());
        assert!(out[0].children[0].is_navigable());
    }

    #[test]
    fn empty_grant_sees_nothing_of_the_admin_console() {
        let tree = MenuTree::admin_console().unwrap();
        assert!(tree.visible_to(&SubjectPermissionSet::empty()).is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let tree = MenuTree::admin_console().unwrap();
        let out = tree.visible_to(&granted(&["USER_SELECT", "ROLE_SELECT", "PERMISSION_SELECT"]));
        assert_eq!(paths(&out), vec!["_user_group", "/users", "/roles", "/permissions"]);
    }

    #[test]
    fn json_configuration_parses_requirements() {
        let raw = r#"[
            {"name": "Users", "path": "_g", "permission": "USER_CREATE | USER_SELECT", "allow": false,
             "children": [{"name": "Users", "path": "/users", "permission": "USER_SELECT"}]}
        ]"#;

        let tree = MenuTree::from_json(raw, &PermissionCatalog::admin_console(), TokenValidation::Strict).unwrap();
        let group = &tree.nodes()[0];
        assert!(!group.allow);
        assert!(group.children[0].allow);
        assert_eq!(group.permission, Some(expr("USER_SELECT|USER_CREATE")));
    }

    #[test]
    fn empty_requirement_in_configuration_is_rejected() {
        let raw = r#"[{"name": "Users", "path": "/users", "permission": "  "}]"#;
        let err = MenuTree::from_json(raw, &PermissionCatalog::admin_console(), TokenValidation::Strict).unwrap_err();
        assert!(matches!(err, MenuConfigError::Json(_)));
    }

    #[test]
    fn unknown_tokens_in_configuration_are_rejected_when_strict() {
        let raw = r#"[{"name": "Audit", "path": "/audit", "permission": "AUDIT_SELECT"}]"#;
        let catalog = PermissionCatalog::admin_console();

        let err = MenuTree::from_json(raw, &catalog, TokenValidation::Strict).unwrap_err();
        assert!(matches!(err, MenuConfigError::Permission { ref path, .. } if path == "/audit"));
        assert!(MenuTree::from_json(raw, &catalog, TokenValidation::Permissive).is_ok());
    }
}
