//! Bounded FIFO storage for accepted samples.

use std::collections::VecDeque;

use crate::sample::{LatLng, Sample};

/// Default number of samples kept in a trail.
pub const DEFAULT_CAPACITY: usize = 100;

/// An insertion-ordered, bounded sequence of samples.
///
/// Pushing past capacity evicts from the front, so the buffer always holds
/// the most recent `capacity` samples in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl TrailBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted oldest sample if the buffer was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        self.samples.push_back(sample);
        let mut evicted = None;
        while self.samples.len() > self.capacity {
            evicted = self.samples.pop_front();
        }
        evicted
    }

    /// Maximum number of retained samples.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest retained sample.
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Most recently accepted sample.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Sample at `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Positions in draw order.
    #[must_use]
    pub fn coordinates(&self) -> Vec<LatLng> {
        self.samples.iter().map(Sample::position).collect()
    }

    /// Drop every retained sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a TrailBuffer {
    type Item = &'a Sample;
    type IntoIter = std::collections::vec_deque::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
