use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage io error: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport not supported in this context")]
    Unsupported,

    #[error("transport closed")]
    Closed,

    #[error("transport error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("invalid update for {kind}: {reason}")]
    InvalidUpdate { kind: String, reason: String },

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory unavailable")]
    DataLocalDirUnavailable,
}
