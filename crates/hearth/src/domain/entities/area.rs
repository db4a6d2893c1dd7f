//! Area - A room or zone of the home

use serde::{Deserialize, Serialize};

/// Area registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
}

impl Area {
    /// Create an area whose id is derived from its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
        }
    }
}

/// Lowercase, ASCII-alphanumeric slug with single underscores between words.
///
/// Used for area ids and agent entity ids.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}
