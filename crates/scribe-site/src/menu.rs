//! Navigation menu nodes.
//!
//! User configuration declares menu items loosely: a bare string, or an
//! object with optional id, link target and children. [`RawMenuItem`] is
//! that wire shape. [`normalize`] converts it into the canonical
//! [`MenuNode`] sum the rest of the pipeline works with, where a leaf
//! (anything carrying a `route` or `href`) structurally cannot hold
//! children. Any children declared on a linked item are dropped at this
//! point: leaf status wins.

use serde::{Deserialize, Serialize};

/// A node of the navigation tree: either a leaf that links somewhere, or a
/// group holding child nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MenuNode {
    /// A linked item. Clicking it navigates away.
    Leaf(Leaf),
    /// A named group of child items.
    Group(Group),
}

/// A linked menu item.
///
/// Carries at least one of `route` (internal) or `href` (external).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Leaf {
    /// Unique identifier, generated when the configuration omits one.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Internal route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// External link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A menu group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Unique identifier, generated when the configuration omits one.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Child items, in order. May be empty for a declared placeholder.
    #[serde(rename = "menu")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Build a leaf with a generated id and an internal route.
    #[must_use]
    pub fn leaf(name: impl Into<String>, route: impl Into<String>) -> Self {
        Self::Leaf(Leaf {
            id: fresh_id(),
            name: name.into(),
            route: Some(route.into()),
            href: None,
        })
    }

    /// Build a group with a generated id.
    #[must_use]
    pub fn group(name: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self::Group(Group {
            id: fresh_id(),
            name: name.into(),
            children,
        })
    }

    /// Display label.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.name,
            Self::Group(group) => &group.name,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.id,
            Self::Group(group) => &group.id,
        }
    }

    /// Child nodes; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[MenuNode] {
        match self {
            Self::Leaf(_) => &[],
            Self::Group(group) => &group.children,
        }
    }
}

/// A menu item as declared in user configuration: a bare name or an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMenuItem {
    /// Shorthand for a group with just a name.
    Name(String),
    /// Full object form.
    Item(RawMenuObject),
}

/// Object form of a configured menu item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMenuObject {
    /// Explicit identifier; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label; the merge key.
    pub name: String,
    /// Internal route. Presence makes the item a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// External link. Presence makes the item a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Declared children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<RawMenuItem>>,
}

impl RawMenuItem {
    /// Convenience constructor for a bare name item.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

/// Convert a configured item into its canonical form.
///
/// - Bare strings become empty groups (declared placeholders).
/// - Items without an id get a generated one.
/// - Items carrying `route` or `href` become leaves; any children they
///   declare are dropped.
/// - Children of groups are normalized recursively.
#[must_use]
pub fn normalize(item: &RawMenuItem) -> MenuNode {
    match item {
        RawMenuItem::Name(name) => MenuNode::Group(Group {
            id: fresh_id(),
            name: name.clone(),
            children: Vec::new(),
        }),
        RawMenuItem::Item(obj) => {
            let id = obj.id.clone().unwrap_or_else(fresh_id);
            if obj.route.is_some() || obj.href.is_some() {
                MenuNode::Leaf(Leaf {
                    id,
                    name: obj.name.clone(),
                    route: obj.route.clone(),
                    href: obj.href.clone(),
                })
            } else {
                MenuNode::Group(Group {
                    id,
                    name: obj.name.clone(),
                    children: obj.menu.iter().flatten().map(normalize).collect(),
                })
            }
        }
    }
}

pub(crate) fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
