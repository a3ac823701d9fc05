//! State update messages from the data layer.
//!
//! The data layer pushes JSON messages of the form
//! `{"type": "state.<prop>", "payload": ...}`; each one replaces a single
//! property of the shared state. Messages with other types are not for this
//! layer and are ignored, as are `state.` messages naming a property we do
//! not track.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::state::{AppStore, Config};

/// A raw message from the data layer.
#[derive(Clone, Debug, Deserialize)]
pub struct StateMessage {
    /// Message type, e.g. `state.entries`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Property payload; shape depends on the property.
    #[serde(default)]
    pub payload: Value,
}

/// Errors raised while handling a [`StateMessage`].
#[derive(Debug, Error)]
pub enum StateMessageError {
    /// The message text was not valid JSON or lacked a `type` field.
    #[error("malformed state message: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload did not match the shape the property expects.
    #[error("invalid payload for state.{prop}: {source}")]
    Payload {
        prop: &'static str,
        source: serde_json::Error,
    },
}

/// Parse a raw message text.
pub fn parse_message(text: &str) -> Result<StateMessage, StateMessageError> {
    Ok(serde_json::from_str(text)?)
}

/// Apply a message to the store.
///
/// Returns `Ok(true)` when the message updated a tracked property,
/// `Ok(false)` when it was ignored (non-`state.` type or unknown property).
/// Subscribers observe updates in message receipt order; a payload that
/// fails to decode leaves the state untouched.
pub fn apply_message(store: &AppStore, message: &StateMessage) -> Result<bool, StateMessageError> {
    let Some(prop) = message.kind.strip_prefix("state.") else {
        return Ok(false);
    };

    match prop {
        "entries" => {
            let entries = decode(&message.payload, "entries")?;
            store.update(move |prev| {
                let mut next = prev.clone();
                next.entries = Some(entries);
                next
            });
            Ok(true)
        }
        "config" => {
            let config: Config = decode(&message.payload, "config")?;
            store.update(move |prev| {
                let mut next = prev.clone();
                next.config = Some(config);
                next
            });
            Ok(true)
        }
        "themeConfig" => {
            let theme_config = message.payload.clone();
            store.update(move |prev| {
                let mut next = prev.clone();
                next.theme_config = theme_config;
                next
            });
            Ok(true)
        }
        other => {
            tracing::debug!(prop = other, "ignoring unknown state property");
            Ok(false)
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    payload: &Value,
    prop: &'static str,
) -> Result<T, StateMessageError> {
    serde_json::from_value(payload.clone())
        .map_err(|source| StateMessageError::Payload { prop, source })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::state::AppState;

    use super::*;

    fn message(kind: &str, payload: Value) -> StateMessage {
        StateMessage {
            kind: kind.to_owned(),
            payload,
        }
    }

    #[test]
    fn test_parse_message_reads_type_and_payload() {
        let message =
            parse_message(r#"{"type": "state.themeConfig", "payload": {"mode": "dark"}}"#).unwrap();

        assert_eq!(message.kind, "state.themeConfig");
        assert_eq!(message.payload["mode"], "dark");
    }

    #[test]
    fn test_parse_message_defaults_missing_payload_to_null() {
        let message = parse_message(r#"{"type": "state.entries"}"#).unwrap();

        assert_eq!(message.payload, Value::Null);
    }

    #[test]
    fn test_parse_message_rejects_invalid_json() {
        let err = parse_message("not json").unwrap_err();

        assert!(matches!(err, StateMessageError::Parse(_)));
    }

    #[test]
    fn test_apply_entries_updates_only_entries() {
        let store = AppStore::new(AppState::default());
        let payload = json!([
            {"id": "a", "filepath": "a.mdx", "route": "/a", "slug": "a", "name": "A"}
        ]);

        let handled = apply_message(&store, &message("state.entries", payload)).unwrap();

        assert!(handled);
        let state = store.get();
        assert_eq!(state.entries.unwrap().len(), 1);
        assert!(state.config.is_none());
    }

    #[test]
    fn test_apply_config_and_theme_config() {
        let store = AppStore::new(AppState::default());

        apply_message(
            &store,
            &message("state.config", json!({"menu": ["Guides"]})),
        )
        .unwrap();
        apply_message(
            &store,
            &message("state.themeConfig", json!({"mode": "dark"})),
        )
        .unwrap();

        let state = store.get();
        assert_eq!(state.config.unwrap().menu.len(), 1);
        assert_eq!(state.theme_config["mode"], "dark");
    }

    #[test]
    fn test_non_state_message_is_ignored() {
        let store = AppStore::new(AppState::default());

        let handled = apply_message(&store, &message("ping", Value::Null)).unwrap();

        assert!(!handled);
        assert_eq!(store.get(), AppState::default());
    }

    #[test]
    fn test_unknown_property_is_ignored() {
        let store = AppStore::new(AppState::default());

        let handled = apply_message(&store, &message("state.colors", json!("red"))).unwrap();

        assert!(!handled);
        assert_eq!(store.get(), AppState::default());
    }

    #[test]
    fn test_bad_payload_leaves_state_untouched() {
        let store = AppStore::new(AppState::default());

        let err = apply_message(&store, &message("state.entries", json!(42))).unwrap_err();

        assert!(matches!(
            err,
            StateMessageError::Payload { prop: "entries", .. }
        ));
        assert_eq!(store.get(), AppState::default());
    }

    #[test]
    fn test_parsed_wire_text_applies_to_store() {
        let store = AppStore::new(AppState::default());
        let texts = [
            r#"{"type": "state.config", "payload": {"menu": ["Guides"], "themeConfig": {"mode": "dark"}}}"#,
            r#"{"type": "state.entries", "payload": {
                "a": {"id": "a", "filepath": "a.mdx", "route": "/a", "slug": "a", "name": "A"}
            }}"#,
        ];

        for text in texts {
            let handled = apply_message(&store, &parse_message(text).unwrap()).unwrap();
            assert!(handled);
        }

        let state = store.get();
        assert_eq!(state.entries.unwrap().len(), 1);
        let config = state.config.unwrap();
        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.theme_config["mode"], "dark");
    }

    #[test]
    fn test_updates_are_observed_in_receipt_order() {
        let store = AppStore::new(AppState::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let _sub = store.subscribe(move |state: &AppState| {
            log.lock().unwrap().push(state.theme_config.clone());
        });

        apply_message(&store, &message("state.themeConfig", json!(1))).unwrap();
        apply_message(&store, &message("state.themeConfig", json!(2))).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![json!(1), json!(2)]);
    }
}
