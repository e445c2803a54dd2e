//! Persistence layer — durable storage for the active step, keyed by
//! walkthrough name.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::{MemoryStore, NoopStore};
pub use traits::StateStore;
