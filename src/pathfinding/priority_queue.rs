//! Min-priority queue keyed by float priority
//!
//! Each `push` is an independent entry: duplicates are allowed and there is
//! no decrease-key. Equal priorities pop in insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::core::error::{EcoError, Result};

struct Entry<T> {
    priority: OrderedFloat<f32>,
    seq: u64,
    value: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary min-heap over `(value, priority)` pairs
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T, priority: f32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority: OrderedFloat(priority),
            seq,
            value,
        });
    }

    /// Remove and return the lowest-priority value
    pub fn pop_min(&mut self) -> Result<T> {
        self.heap.pop().map(|e| e.value).ok_or(EcoError::EmptyQueue)
    }

    pub fn peek_min(&self) -> Result<&T> {
        self.heap.peek().map(|e| &e.value).ok_or(EcoError::EmptyQueue)
    }

    pub fn peek_min_priority(&self) -> Result<f32> {
        self.heap
            .peek()
            .map(|e| e.priority.into_inner())
            .ok_or(EcoError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}
