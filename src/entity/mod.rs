//! Creatures: species profiles, instances and their memories

pub mod actor;
pub mod actor_class;
pub mod memory;

pub use actor::{Actor, BehaviorState, MemorySnapshot, Target};
pub use actor_class::ActorClass;
pub use memory::{Memory, MemoryStore};
