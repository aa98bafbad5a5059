//! Sliding Window Implementation

use crate::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity FIFO of samples
///
/// Invariant: `len() <= capacity()`. Pushing into a full window evicts the
/// oldest sample. Owned by a single writer; no interior mutability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidingWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
    /// Total samples pushed (for statistics)
    total_pushed: u64,
}

impl<T> SlidingWindow<T> {
    /// Create a window holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            total_pushed: 0,
        }
    }

    /// Create a window with the default capacity (8 samples)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a sample, evicting the oldest if full
    pub fn push(&mut self, sample: T) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.total_pushed += 1;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.samples.len() as f64 / self.capacity as f64
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    /// Total samples ever pushed
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Drop every sample, keeping the capacity
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T: Clone> SlidingWindow<T> {
    /// Read the last N samples (most recent first)
    pub fn read_last(&self, count: usize) -> Vec<T> {
        self.samples.iter().rev().take(count).cloned().collect()
    }
}

impl<T: Copy + Into<f64>> SlidingWindow<T> {
    /// Arithmetic mean of the samples, `None` when empty
    ///
    /// Computed as an offset from the oldest sample, so a window filled with
    /// identical samples yields exactly that sample.
    pub fn mean(&self) -> Option<f64> {
        let first: f64 = (*self.samples.front()?).into();
        let offset: f64 = self
            .samples
            .iter()
            .map(|&s| s.into() - first)
            .sum::<f64>();
        Some(first + offset / self.samples.len() as f64)
    }
}

impl<T> Default for SlidingWindow<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
