//! Ordered, multi-valued header collection.

use std::sync::Arc;

/// Header collection shared by requests and responses.
///
/// Lookups are case-insensitive, but the name is stored exactly as it was
/// given. Insertion order is kept, since emitters replay headers in order.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Arc<Vec<(String, Vec<String>)>>,
}

impl Headers {
    /// Create an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Returns true if a header with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All values of a header, empty if missing.
    pub fn get(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(idx) => &self.entries[idx].1,
            None => &[],
        }
    }

    /// Values joined with `", "`.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Replace (or add) a header.
    ///
    /// An existing entry keeps its position but takes the new name casing.
    pub fn with(&self, name: impl Into<String>, values: Vec<String>) -> Self {
        let name = name.into();
        let mut entries = Arc::clone(&self.entries);
        let list = Arc::make_mut(&mut entries);
        match self.position(&name) {
            Some(idx) => list[idx] = (name, values),
            None => list.push((name, values)),
        }
        Self { entries }
    }

    /// Append values to a header, adding it if missing.
    pub fn with_added(&self, name: impl Into<String>, values: Vec<String>) -> Self {
        let name = name.into();
        let mut entries = Arc::clone(&self.entries);
        let list = Arc::make_mut(&mut entries);
        match self.position(&name) {
            Some(idx) => list[idx].1.extend(values),
            None => list.push((name, values)),
        }
        Self { entries }
    }

    /// Remove a header. Returns an unchanged clone when it is missing.
    pub fn without(&self, name: &str) -> Self {
        let Some(idx) = self.position(name) else {
            return self.clone();
        };
        let mut entries = Arc::clone(&self.entries);
        Arc::make_mut(&mut entries).remove(idx);
        Self { entries }
    }

    /// Iterate `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Headers {}
