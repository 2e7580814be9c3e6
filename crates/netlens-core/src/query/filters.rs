//! Filter drafts and committed filter sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ResourceKind;
use crate::error::{NetlensError, Result};

/// The authoritative, committed filters of a view.
///
/// Empty values mean "unset" and are never stored, so they can never reach
/// the wire as `key=`. Equality is by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, or removes it when `value` is empty.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

/// Raw filter inputs as the operator is typing them.
///
/// Every field of the resource kind is present, possibly empty. Edits to a
/// draft have no network effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDraft {
    kind: ResourceKind,
    fields: BTreeMap<String, String>,
}

impl FilterDraft {
    pub fn new(kind: ResourceKind) -> Self {
        let fields = kind
            .filter_fields()
            .iter()
            .map(|f| (f.to_string(), String::new()))
            .collect();
        Self { kind, fields }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Updates one input field. Fields the resource does not filter on are
    /// rejected.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(NetlensError::invalid_input(format!(
                "'{}' is not a {} filter (expected one of: {})",
                field,
                self.kind,
                self.kind.filter_fields().join(", ")
            ))),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Drops empty inputs and returns what would be committed.
    pub fn to_filter_set(&self) -> FilterSet {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
