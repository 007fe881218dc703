//! Per-fragment scroll offsets for back-navigation restoration

use std::collections::HashMap;

/// Vertical offsets recorded when the user leaves a fragment.
///
/// Entries live for the whole page session; the map is bounded by the number
/// of distinct fragments ever visited.
#[derive(Debug, Clone, Default)]
pub struct ScrollMemory {
    offsets: HashMap<String, f64>,
}

impl ScrollMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `offset` for `fragment`, replacing any earlier entry
    pub fn record(&mut self, fragment: impl Into<String>, offset: f64) {
        self.offsets.insert(fragment.into(), offset);
    }

    pub fn get(&self, fragment: &str) -> Option<f64> {
        self.offsets.get(fragment).copied()
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.offsets.contains_key(fragment)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
