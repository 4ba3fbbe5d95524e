//! Output buffer sizing.

use serde::{Deserialize, Serialize};

/// Capacity of the first allocation made by a conversion.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Sizing policy for the conversion buffer.
///
/// The buffer starts empty, is allocated at `initial_capacity` when first
/// needed and doubles after that. Growth that would exceed `max_capacity`
/// fails the conversion with [`crate::Error::OutOfMemory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Size of the first allocation (at least 1)
    pub initial_capacity: usize,
    /// Upper bound on the buffer size, `None` for no bound
    pub max_capacity: Option<usize>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: None,
        }
    }
}

impl ConverterConfig {
    /// Set the size of the first allocation.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Bound the buffer size.
    pub fn with_max_capacity(mut self, capacity: usize) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Capacity after one growth step from `current`.
    pub(crate) fn next_capacity(&self, current: usize) -> usize {
        if current == 0 {
            self.initial_capacity.max(1)
        } else {
            current.saturating_mul(2)
        }
    }
}
