//! Navigation tree construction.
//!
//! Builds the sidebar menu from two sources: the flat document entries
//! (grouped by their `menu` field) and the user-declared menu configuration
//! (already normalized to [`MenuNode`]). The user configuration can add
//! placeholder groups, override matched items and dictate sibling order;
//! everything it does not mention keeps its derived position, after the
//! declared items.

use std::collections::HashMap;

use crate::entry::Entries;
use crate::menu::{Group, Leaf, MenuNode};

/// Derive a menu list from document entries.
///
/// Entries without a `menu` field become top-level leaves, in entry order.
/// The rest are grouped by their `menu` value: one group per distinct name,
/// in order of first occurrence, each holding a leaf per member entry in
/// entry order. Ungrouped leaves precede the groups.
#[must_use]
pub fn menus_from_entries(entries: &Entries) -> Vec<MenuNode> {
    let mut items: Vec<MenuNode> = entries
        .iter()
        .filter(|entry| entry.menu.is_none())
        .map(|entry| MenuNode::leaf(&entry.name, &entry.route))
        .collect();

    let mut group_names: Vec<&str> = Vec::new();
    for entry in entries {
        if let Some(menu) = entry.menu.as_deref()
            && !group_names.contains(&menu)
        {
            group_names.push(menu);
        }
    }

    for name in group_names {
        let children = entries
            .iter()
            .filter(|entry| entry.menu.as_deref() == Some(name))
            .map(|entry| MenuNode::leaf(&entry.name, &entry.route))
            .collect();
        items.push(MenuNode::group(name, children));
    }

    items
}

/// Merge the derived menu list with the user-declared one, by name.
///
/// Items present in both are unified: the user item's own fields override,
/// but group children are merged recursively by the same rule rather than
/// replaced. Items only in `derived` are kept; items only in `user` are
/// appended. Positions come from the first occurrence of each name; a later
/// same-name occurrence only contributes its override (stable merge).
#[must_use]
pub fn merge_menus(derived: Vec<MenuNode>, user: Vec<MenuNode>) -> Vec<MenuNode> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, MenuNode> = HashMap::new();

    for item in derived.into_iter().chain(user) {
        let name = item.name().to_owned();
        match by_name.remove(&name) {
            Some(existing) => {
                by_name.insert(name, unify(existing, item));
            }
            None => {
                order.push(name.clone());
                by_name.insert(name, item);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect()
}

/// Unify two same-named items, `over` taking precedence.
fn unify(base: MenuNode, over: MenuNode) -> MenuNode {
    match (base, over) {
        (MenuNode::Group(base), MenuNode::Group(over)) => MenuNode::Group(Group {
            id: over.id,
            name: over.name,
            children: merge_menus(base.children, over.children),
        }),
        // Targets merge field-wise: the override only replaces what it
        // carries, so a user item adding an href keeps the derived route.
        (MenuNode::Leaf(base), MenuNode::Leaf(over)) => MenuNode::Leaf(Leaf {
            id: over.id,
            name: over.name,
            route: over.route.or(base.route),
            href: over.href.or(base.href),
        }),
        // Leaf status wins regardless of which side carries it; a group
        // merged onto a leaf keeps the leaf's target and sheds children.
        (MenuNode::Leaf(base), MenuNode::Group(over)) => MenuNode::Leaf(Leaf {
            id: over.id,
            name: over.name,
            route: base.route,
            href: base.href,
        }),
        (MenuNode::Group(_), over @ MenuNode::Leaf(_)) => over,
    }
}

/// Order sibling items by their position in the user-declared reference
/// list.
///
/// Items whose name appears in `reference` come first, in declared order;
/// the rest keep their relative order after them (the sort is stable).
/// Recursion into group children uses the matching reference item's own
/// children when it has any, else the parent's list (whose names will not
/// match, leaving the children's merge order intact).
#[must_use]
pub fn sort_menus(mut items: Vec<MenuNode>, reference: &[MenuNode]) -> Vec<MenuNode> {
    let names: Vec<&str> = reference.iter().map(MenuNode::name).collect();
    items.sort_by_key(|item| {
        names
            .iter()
            .position(|name| *name == item.name())
            .unwrap_or(usize::MAX)
    });

    items
        .into_iter()
        .map(|item| match item {
            MenuNode::Leaf(_) => item,
            MenuNode::Group(Group { id, name, children }) => {
                let nested = reference
                    .iter()
                    .find(|candidate| {
                        candidate.name() == name && !candidate.children().is_empty()
                    })
                    .map_or(reference, MenuNode::children);
                MenuNode::Group(Group {
                    id,
                    name,
                    children: sort_menus(children, nested),
                })
            }
        })
        .collect()
}
