//! Document entries.
//!
//! An [`Entry`] is one source document with routing and display metadata.
//! [`Entries`] keeps them in the order the data layer supplied them while
//! enforcing id uniqueness, so menu derivation sees a stable entry order
//! and lookups by id stay cheap to reason about.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::headings::slugify;

/// One source document with routing/display metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, stable across rebuilds.
    pub id: String,
    /// Source file path.
    #[serde(default)]
    pub filepath: String,
    /// Route the document is served under. Unique within a collection.
    pub route: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Menu group this entry belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
    /// In-page outline. Not consulted by the menu builder.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<Heading>,
}

impl Entry {
    /// Create an entry with the given id, display name and route.
    ///
    /// The slug defaults to the slugified name and the filepath to empty;
    /// both can be set directly afterwards.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: id.into(),
            filepath: String::new(),
            route: route.into(),
            slug,
            name,
            menu: None,
            headings: Vec::new(),
        }
    }

    /// Assign the entry to a menu group.
    #[must_use]
    pub fn with_menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = Some(menu.into());
        self
    }

    /// Attach an in-page outline.
    #[must_use]
    pub fn with_headings(mut self, headings: Vec<Heading>) -> Self {
        self.headings = headings;
        self
    }
}

/// One heading of a document's in-page outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor slug, unique within the document.
    pub slug: String,
    /// Heading level, 1 through 6.
    pub depth: u8,
    /// Heading text.
    pub value: String,
}

/// Ordered collection of entries, keyed by id.
///
/// Preserves the order entries were supplied in. Inserting an entry whose id
/// is already present replaces the existing one in place, keeping its
/// position.
///
/// Deserializes from either a JSON array of entries or a JSON map of
/// `id -> entry` (map values are taken in document order, keys are ignored),
/// matching the two shapes the data layer may push.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Entries(Vec<Entry>);

impl Entries {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry by id.
    ///
    /// A replaced entry keeps its original position.
    pub fn upsert(&mut self, entry: Entry) {
        if let Some(existing) = self.0.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.0.push(entry);
        }
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.0.iter().find(|e| e.id == id)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Entry> for Entries {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut entries = Self::new();
        for entry in iter {
            entries.upsert(entry);
        }
        entries
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence or map of document entries")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Entries::new();
                while let Some(entry) = seq.next_element::<Entry>()? {
                    entries.upsert(entry);
                }
                Ok(entries)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Entries::new();
                while let Some((_, entry)) =
                    map.next_entry::<serde::de::IgnoredAny, Entry>()?
                {
                    entries.upsert(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

/// Case-sensitive lexical comparison.
///
/// Total order consistent with equality; used for document lists and as the
/// tie-break comparator in menu sorting.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Entries sorted by display name via [`compare`].
#[must_use]
pub fn sort_entries_by_name(entries: &Entries) -> Vec<Entry> {
    let mut sorted: Vec<Entry> = entries.iter().cloned().collect();
    sorted.sort_by(|a, b| compare(&a.name, &b.name));
    sorted
}
