//! Application state shape and derived views for Scribe.
//!
//! Ties the generic observable store to the documentation domain:
//! - [`AppState`]: the shared state value (`entries`, `config`, theme
//!   configuration and an optional transform)
//! - [`AppStore`]: a [`scribe_store::Store`] over it, constructed explicitly
//!   at application start and handed to whatever needs it
//! - Views: [`menus`], [`docs`] and [`themed_config`], re-derived by
//!   consumers on every state change
//! - [`apply_message`]: applies `state.<prop>` update messages pushed by the
//!   external data layer
//!
//! # Quick Start
//!
//! ```
//! use scribe_state::{AppState, AppStore, docs, menus};
//!
//! let store = AppStore::new(AppState::default());
//!
//! // Nothing loaded yet: views report not-ready.
//! assert!(menus(&store.get(), None).is_none());
//! assert!(docs(&store.get()).is_none());
//! ```

pub(crate) mod message;
pub(crate) mod state;
pub(crate) mod views;

pub use message::{StateMessage, StateMessageError, apply_message, parse_message};
pub use state::{AppState, AppStore, Config, ThemeTransform};
pub use views::{docs, menus, themed_config};
