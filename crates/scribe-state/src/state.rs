//! Shared application state.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use scribe_site::{Entries, RawMenuItem};
use scribe_store::Store;

/// Theme-configuration transform applied by [`crate::themed_config`].
///
/// Compared by pointer identity in [`AppState`]'s equality; a panic inside
/// the closure propagates to the caller unmodified.
pub type ThemeTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// The store over the application state.
pub type AppStore = Store<AppState>;

/// Process-wide documentation state.
///
/// Written by the external data layer (initial load plus partial updates),
/// read reactively by UI consumers. `entries` and `config` start absent;
/// views treat that as "not ready", not as an error.
#[derive(Clone, Default)]
pub struct AppState {
    /// Loaded document entries.
    pub entries: Option<Entries>,
    /// Loaded project configuration.
    pub config: Option<Config>,
    /// Theme configuration supplied at state level.
    pub theme_config: Value,
    /// Optional transform applied to the merged theme configuration.
    pub transform: Option<ThemeTransform>,
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        // Structural on data; a closure has no structural equality, so the
        // transform compares by pointer identity.
        self.entries == other.entries
            && self.config == other.config
            && self.theme_config == other.theme_config
            && match (&self.transform, &other.transform) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("entries", &self.entries)
            .field("config", &self.config)
            .field("theme_config", &self.theme_config)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Project configuration.
///
/// Only `menu` and `themeConfig` are interpreted; everything else the data
/// layer sends is carried opaquely in `rest`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-declared menu configuration.
    pub menu: Vec<RawMenuItem>,
    /// Theme configuration declared in the project config.
    #[serde(rename = "themeConfig")]
    pub theme_config: Value,
    /// Remaining configuration fields, passed through untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scribe_site::Entry;

    use super::*;

    static_assertions::assert_impl_all!(AppStore: Send, Sync);

    fn loaded_state() -> AppState {
        AppState {
            entries: Some([Entry::new("a", "Alpha", "/alpha")].into_iter().collect()),
            config: Some(Config::default()),
            theme_config: Value::Null,
            transform: None,
        }
    }

    #[test]
    fn test_default_state_is_empty() {
        let state = AppState::default();

        assert!(state.entries.is_none());
        assert!(state.config.is_none());
        assert_eq!(state.theme_config, Value::Null);
        assert!(state.transform.is_none());
    }

    #[test]
    fn test_equality_is_structural_on_data() {
        assert_eq!(loaded_state(), loaded_state());

        let mut changed = loaded_state();
        changed.theme_config = serde_json::json!({"mode": "dark"});
        assert_ne!(loaded_state(), changed);
    }

    #[test]
    fn test_transform_compares_by_identity() {
        let transform: ThemeTransform = Arc::new(|value| value);

        let mut a = loaded_state();
        a.transform = Some(Arc::clone(&transform));
        let mut b = loaded_state();
        b.transform = Some(transform);
        assert_eq!(a, b);

        let mut c = loaded_state();
        c.transform = Some(Arc::new(|value| value));
        assert_ne!(a, c);
    }

    #[test]
    fn test_config_keeps_unknown_fields() {
        let json = serde_json::json!({
            "menu": ["Guides"],
            "themeConfig": {"mode": "light"},
            "title": "My Docs",
            "port": 3000
        });

        let config: Config = serde_json::from_value(json).unwrap();

        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.theme_config["mode"], "light");
        assert_eq!(config.rest["title"], "My Docs");
        assert_eq!(config.rest["port"], 3000);
    }

    #[test]
    fn test_store_deduplicates_equal_states() {
        let store = AppStore::new(AppState::default());
        let seen = Arc::new(std::sync::Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let _sub = store.subscribe(move |_: &AppState| *counter.lock().unwrap() += 1);

        store.set(loaded_state());
        store.set(loaded_state());

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
