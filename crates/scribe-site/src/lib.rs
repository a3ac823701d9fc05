//! Document data model and navigation menu building for Scribe.
//!
//! This crate provides:
//! - [`Entry`] / [`Entries`]: document metadata and the ordered, id-keyed
//!   collection the data layer pushes into the store
//! - [`MenuNode`]: the canonical navigation tree node (leaf or group)
//! - The menu pipeline: [`menus_from_entries`], [`normalize`],
//!   [`merge_menus`], [`sort_menus`] and [`search`]
//! - [`extract_headings`] for building an in-page outline from markdown
//!
//! # Quick Start
//!
//! ```
//! use scribe_site::{Entries, Entry, menus_from_entries, merge_menus, sort_menus};
//!
//! let entries: Entries = [
//!     Entry::new("getting-started", "Getting Started", "/"),
//!     Entry::new("button", "Button", "/components/button").with_menu("Components"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let derived = menus_from_entries(&entries);
//! let menu = sort_menus(merge_menus(derived, Vec::new()), &[]);
//! assert_eq!(menu.len(), 2);
//! ```

pub(crate) mod entry;
pub(crate) mod headings;
pub(crate) mod menu;
pub(crate) mod nav;
pub(crate) mod search;

pub use entry::{Entries, Entry, Heading, compare, sort_entries_by_name};
pub use headings::{extract_headings, slugify};
pub use menu::{Group, Leaf, MenuNode, RawMenuItem, RawMenuObject, normalize};
pub use nav::{menus_from_entries, merge_menus, sort_menus};
pub use search::{MatchRank, rank, search};
