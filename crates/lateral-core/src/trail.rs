//! Bounded history of recent ball positions for trail/effect consumers.

use std::collections::VecDeque;

use crate::constants::TRAIL_CAPACITY;

/// Ring of recent positions, oldest first. Read-only consumers sample it
/// once per frame; the frame loop pushes once per frame.
#[derive(Debug)]
pub struct TrailHistory {
    positions: VecDeque<f32>,
    capacity: usize,
}

impl Default for TrailHistory {
    fn default() -> Self {
        Self::new(TRAIL_CAPACITY)
    }
}

impl TrailHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, position: f32) {
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(position);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Oldest-to-newest iteration; the newest entry is the current position.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions.iter().copied()
    }
}
