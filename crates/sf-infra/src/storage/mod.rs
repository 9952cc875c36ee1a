//! Key-value storage adapters.
//!
//! `FileKeyValueStore` backs the long-lived draft area across process runs;
//! `InMemoryKeyValueStore` backs session-scoped state and tests.

mod file_store;
mod memory;

pub use file_store::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
