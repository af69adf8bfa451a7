//! Fading bob trail: a bounded FIFO of recent positions

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One recorded bob position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Host clock in milliseconds when the point was recorded
    pub time: f64,
}

/// Capacity-bounded trail (oldest first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    capacity: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(crate::consts::TRAIL_CAPACITY)
    }
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once over capacity
    pub fn push(&mut self, pos: Vec2, time: f64) {
        self.points.push_back(TrailPoint { pos, time });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Change the capacity, dropping the oldest samples if it shrank
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }
}
