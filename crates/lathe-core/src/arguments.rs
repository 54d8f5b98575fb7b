//! Build script arguments passed on the command line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named arguments forwarded to the build script (`-key=value`).
///
/// Lookup is case-insensitive: `-Target=Build` and `context.arguments().get("target")`
/// refer to the same entry. Keys are stored lowercased so iteration order is
/// stable regardless of the casing used on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    values: BTreeMap<String, String>,
}

impl Arguments {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an argument.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Returns `true` when an argument with this name exists.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_ascii_lowercase())
    }

    /// Looks up an argument value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
