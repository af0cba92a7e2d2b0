use thiserror::Error;

use crate::engine::EngineError;
use crate::registry::table::Handle;

/// Subsystem-level errors using thiserror for structured error handling.
///
/// None of these conditions are fatal: every operation either succeeds or
/// fails cleanly, leaving the table and the engine in the state they were in
/// before the call. Callers issuing operations with stale handles are an
/// expected, recoverable case.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("invalid music handle: {0}")]
    InvalidHandle(Handle),

    #[error("music table full ({capacity} streams loaded)")]
    TableFull { capacity: usize },

    #[error("failed to load music stream: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: EngineError,
    },

    #[error("audio engine operation failed")]
    Engine(#[from] EngineError),
}

/// Type alias for subsystem Results
pub type Result<T> = std::result::Result<T, AudioError>;
