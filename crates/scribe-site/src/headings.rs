//! Markdown heading extraction.
//!
//! Walks a markdown document with `pulldown-cmark` and collects its
//! headings as an in-page outline, assigning each a GitHub-style anchor
//! slug. Duplicate heading texts get a `-1`, `-2`, ... suffix so anchors
//! stay unique within the document.

use std::collections::HashMap;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::entry::Heading;

/// Extract the heading outline of a markdown document.
///
/// Headings appear in document order with their level (1-6), visible text
/// (inline code included, formatting markers stripped) and a unique slug.
#[must_use]
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;
    let mut seen: HashMap<String, usize> = HashMap::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_depth(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, value)) = current.take() {
                    let slug = unique_slug(&slugify(&value), &mut seen);
                    headings.push(Heading { slug, depth, value });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text);
                }
            }
            _ => {}
        }
    }

    headings
}

/// GitHub-style slug: lowercased, alphanumerics and `-`/`_` kept, spaces
/// and hyphens collapsed to `-`, everything else dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == '_' {
            slug.push(ch);
        } else if (ch == ' ' || ch == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_owned()
}

fn unique_slug(slug: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(slug.to_owned()).or_insert(0);
    let unique = if *count == 0 {
        slug.to_owned()
    } else {
        format!("{slug}-{count}")
    };
    *count += 1;
    unique
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
