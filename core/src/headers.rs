//! Ordered multi-value header storage.
//!
//! # Design
//! Headers are kept as a flat list of `(name, value)` entries in insertion
//! order, the same shape the transport types have always used. Lookups filter
//! that list, so values for a key come back in the order they were added and
//! repeated names are never collapsed. Names are compared case-sensitively,
//! exactly as given.
//!
//! Only the operations callers need are exposed: read all values, read the
//! first value, append, replace, and take an immutable snapshot.

use std::sync::Arc;

/// Mutable ordered multimap of header names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values for `key`, in insertion order. Empty if the key is absent.
    pub fn get(&self, key: &str) -> Vec<&str> {
        values_for(&self.entries, key)
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        first_for(&self.entries, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Append `value` after any existing values for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Replace every value for `key` with the single `value`.
    ///
    /// The key keeps the position of its first existing entry; a new key is
    /// appended at the end.
    pub fn put_single(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.entries[first].1 = value;
                let mut index = 0;
                self.entries.retain(|(k, _)| {
                    let keep = index <= first || *k != key;
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((key, value)),
        }
    }

    /// Immutable copy of the current entries. Later mutation of `self` is not
    /// visible through the snapshot.
    pub fn copy(&self) -> HeaderSnapshot {
        HeaderSnapshot {
            entries: self.entries.clone().into(),
        }
    }

    /// Number of entries, counting each value separately.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<Vec<(String, String)>> for Headers {
    fn from(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Read-only snapshot produced by [`Headers::copy`]. Clones share storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSnapshot {
    entries: Arc<[(String, String)]>,
}

impl HeaderSnapshot {
    pub fn get(&self, key: &str) -> Vec<&str> {
        values_for(&self.entries, key)
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        first_for(&self.entries, key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HeaderSnapshot> for Headers {
    fn from(snapshot: HeaderSnapshot) -> Self {
        Self {
            entries: snapshot.entries.to_vec(),
        }
    }
}

fn values_for<'a>(entries: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    entries
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn first_for<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}
