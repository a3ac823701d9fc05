//! Derived views over the application state.
//!
//! Consumers call these on every state change to re-derive what they
//! render. All three are pure; `menus` and `docs` return `None` until both
//! `entries` and `config` have been loaded, which callers must treat as
//! "not ready" rather than as an error.

use serde_json::Value;

use scribe_site::{
    Entry, MenuNode, menus_from_entries, merge_menus, normalize, search, sort_entries_by_name,
    sort_menus,
};

use crate::state::AppState;

/// Build the navigation menu tree.
///
/// Derives menus from the entries, merges in the user-declared menu
/// configuration, orders siblings by the declared order and, when a
/// non-empty `query` is given, returns the fuzzy-matched subset instead.
///
/// `None` until entries and config are available.
#[must_use]
pub fn menus(state: &AppState, query: Option<&str>) -> Option<Vec<MenuNode>> {
    let entries = state.entries.as_ref()?;
    let config = state.config.as_ref()?;

    let user: Vec<MenuNode> = config.menu.iter().map(normalize).collect();
    let derived = menus_from_entries(entries);
    let sorted = sort_menus(merge_menus(derived, user.clone()), &user);

    match query {
        Some(query) if !query.is_empty() => Some(search(query, &sorted)),
        _ => Some(sorted),
    }
}

/// All document entries sorted by name.
///
/// `None` until entries and config are available.
#[must_use]
pub fn docs(state: &AppState) -> Option<Vec<Entry>> {
    let entries = state.entries.as_ref()?;
    state.config.as_ref()?;

    Some(sort_entries_by_name(entries))
}

/// The effective theme configuration.
///
/// Deep-merges the state-level theme configuration with the one declared in
/// the project config (config side wins), then applies the transform when
/// one is set. Errors raised by the transform propagate to the caller
/// unmodified.
#[must_use]
pub fn themed_config(state: &AppState) -> Value {
    let from_config = state
        .config
        .as_ref()
        .map_or(Value::Null, |config| config.theme_config.clone());
    let merged = deep_merge(state.theme_config.clone(), from_config);

    match &state.transform {
        Some(transform) => transform(merged),
        None => merged,
    }
}

/// Merge two JSON values, `over` taking precedence.
///
/// Objects merge key-wise recursively; any other pairing resolves to
/// `over`, except that a null `over` leaves `base` untouched.
fn deep_merge(base: Value, over: Value) -> Value {
    match (base, over) {
        (base, Value::Null) => base,
        (Value::Object(mut base), Value::Object(over)) => {
            for (key, value) in over {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, over) => over,
    }
}
