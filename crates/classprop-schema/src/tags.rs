//! Tag directives embedded in a property's free-text body.
//!
//! A body such as `Display name @max-length 40 @not-empty` carries the
//! description `Display name` and two tags, `max-length = "40"` and the
//! presence-only `not-empty`.

use serde::Serialize;

///
/// TagMap
///
/// Ordered tag-name to optional-value mapping. Iteration follows first
/// insertion; re-inserting a name overwrites its value in place.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TagMap {
    entries: Vec<(String, Option<String>)>,
}

impl TagMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or overwrite a tag.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Value of a tag; `None` when absent or presence-only.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (name, value) in iter {
            tags.insert(name, value);
        }

        tags
    }
}

/// Split an annotation body into its description and tag map.
///
/// A tag starts at an `@` that opens the body or follows whitespace. Its
/// name runs to the next whitespace; the trimmed rest, up to the next tag,
/// is its value.
#[must_use]
pub fn parse_body(body: &str) -> (String, TagMap) {
    let starts = tag_starts(body);
    let Some(&first) = starts.first() else {
        return (body.trim().to_string(), TagMap::new());
    };

    let description = body[..first].trim().to_string();
    let mut tags = TagMap::new();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(body.len());
        let segment = &body[start + 1..end];

        let (name, value) = match segment.find(char::is_whitespace) {
            Some(split) => (segment[..split].trim(), segment[split..].trim()),
            None => (segment.trim(), ""),
        };

        // blank key
        if name.is_empty() {
            continue;
        }

        let value = (!value.is_empty()).then(|| value.to_string());
        tags.insert(name, value);
    }

    (description, tags)
}

// byte offsets of every '@' that opens a tag
fn tag_starts(body: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_ws = true;

    for (i, c) in body.char_indices() {
        if c == '@' && prev_ws {
            starts.push(i);
        }
        prev_ws = c.is_whitespace();
    }

    starts
}

///
/// TESTS
///
