pub mod config;
pub mod content;
pub mod photos;
pub mod storage;
pub mod time;

pub use config::{load_config, ConfigError};
pub use content::{ContentSnapshot, InMemoryContentRepository};
pub use photos::CachedPhotoLookup;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use time::SystemClock;
