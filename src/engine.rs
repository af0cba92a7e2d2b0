/// Audio engine boundary
///
/// The registry does not decode or mix audio itself. Everything that touches
/// actual audio data goes through the [`AudioEngine`] trait: an opaque,
/// stream-level surface (open, start, stop, refill buffers, query position)
/// that a backend implements. The crate ships a rodio-backed implementation
/// in [`crate::backend`]; hosts with their own engine implement the trait
/// instead.
use std::fmt;

use thiserror::Error;

/// Opaque identifier for one engine-owned stream.
///
/// Issued by the engine on `open_stream` and meaningless to callers beyond
/// equality comparison. Not to be confused with the caller-visible table
/// handle, which the registry assigns independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures surfaced by an audio engine backend
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to open audio stream: {path}")]
    OpenFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to initialize audio output")]
    OutputUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("unknown stream id: {0}")]
    UnknownStream(StreamId),

    #[error("audio engine failure: {0}")]
    Backend(String),
}

/// Stream-level primitives consumed by the registry.
///
/// All methods are synchronous and non-blocking from the caller's point of
/// view; any real mixing happens on a thread the engine owns internally.
/// Engine setup and teardown are expressed through construction and `Drop`
/// of the implementing type, not through the trait.
pub trait AudioEngine {
    /// Open and prepare a stream for the resource at `path`.
    fn open_stream(&mut self, path: &str) -> Result<StreamId, EngineError>;

    /// Release the stream and everything it holds. The id is dead afterwards.
    fn close_stream(&mut self, stream: StreamId) -> Result<(), EngineError>;

    /// Begin (or restart) playback from the top of the stream.
    fn start(&mut self, stream: StreamId) -> Result<(), EngineError>;

    /// Halt playback and rewind.
    fn stop(&mut self, stream: StreamId) -> Result<(), EngineError>;

    fn pause(&mut self, stream: StreamId) -> Result<(), EngineError>;

    fn resume(&mut self, stream: StreamId) -> Result<(), EngineError>;

    /// Top up the stream's playback buffers. Called once per frame for every
    /// actively playing stream; must be cheap and bounded.
    fn refill_buffers(&mut self, stream: StreamId) -> Result<(), EngineError>;

    fn is_playing(&mut self, stream: StreamId) -> Result<bool, EngineError>;

    /// Per-stream volume, 0.0-1.0.
    fn set_volume(&mut self, stream: StreamId, volume: f32) -> Result<(), EngineError>;

    /// Playback rate multiplier; 1.0 is the recorded rate.
    fn set_pitch(&mut self, stream: StreamId, pitch: f32) -> Result<(), EngineError>;

    /// Number of times the stream repeats after the first play; 0 plays
    /// once, negative values repeat indefinitely.
    fn set_loop_count(&mut self, stream: StreamId, count: i32) -> Result<(), EngineError>;

    /// Total stream length in seconds, 0.0 when the backend cannot tell.
    fn time_length(&mut self, stream: StreamId) -> Result<f32, EngineError>;

    /// Seconds played so far in the current playback.
    fn time_played(&mut self, stream: StreamId) -> Result<f32, EngineError>;

    /// Global output volume applied on top of per-stream volumes.
    fn set_master_volume(&mut self, volume: f32) -> Result<(), EngineError>;
}
