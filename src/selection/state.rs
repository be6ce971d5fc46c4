use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 10.0;

/// Key used for round-robin history when the caller has no user id
pub const DEFAULT_USER_KEY: &str = "default";

/// Mutable state shared by every caller of a selector.
///
/// Each map has its own lock so a weight update never waits on a round-robin
/// advance. Every read-modify-write happens under a single write guard, which
/// keeps updates to one key sequentially consistent.
#[derive(Debug, Default)]
pub struct SelectorState {
    weights: RwLock<HashMap<String, f64>>,
    cursors: Mutex<HashMap<String, usize>>,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(&self, provider: &str) -> f64 {
        self.weights
            .read()
            .get(provider)
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Apply a signed adjustment and return the clamped result
    pub fn adjust_weight(&self, provider: &str, delta: f64) -> f64 {
        let mut weights = self.weights.write();
        let weight = weights
            .entry(provider.to_string())
            .or_insert(DEFAULT_WEIGHT);
        *weight = (*weight + delta).clamp(MIN_WEIGHT, MAX_WEIGHT);
        *weight
    }

    pub fn weights(&self) -> HashMap<String, f64> {
        self.weights.read().clone()
    }

    pub fn reset_weights(&self) {
        self.weights.write().clear();
    }

    /// Return the cursor for `user_key` bounded to `len`, and store the next one.
    pub fn advance_cursor(&self, user_key: &str, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let mut cursors = self.cursors.lock();
        let cursor = cursors.entry(user_key.to_string()).or_insert(0);
        let current = *cursor % len;
        *cursor = (current + 1) % len;
        current
    }

    pub fn clear_cursors(&self) {
        self.cursors.lock().clear();
    }

    pub fn tracked_users(&self) -> usize {
        self.cursors.lock().len()
    }
}
