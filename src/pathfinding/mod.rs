//! Search primitives: a float-keyed min-queue and a generic A*

pub mod astar;
pub mod priority_queue;

pub use astar::{AStar, SearchState};
pub use priority_queue::PriorityQueue;
