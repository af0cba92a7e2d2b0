/// Per-stream playback states
///
/// Each loaded stream moves through a small state machine:
/// `Stopped -> Playing <-> Paused -> Stopped`. Only `Playing` streams take
/// part in the per-frame buffer refill pass; paused streams keep their
/// position but are skipped until resumed.
use std::fmt;

/// Playback state of one loaded music stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Loaded but not producing audio; playback starts from the top
    Stopped,

    /// Actively streaming; buffers are refilled every tick
    Playing,

    /// Suspended mid-stream; position retained, excluded from ticking
    Paused,
}

impl PlayState {
    /// Whether this stream participates in the per-tick buffer refill pass
    pub fn is_active(&self) -> bool {
        matches!(self, PlayState::Playing)
    }

    /// Whether the engine currently holds a started (possibly paused) voice
    pub fn is_started(&self) -> bool {
        !matches!(self, PlayState::Stopped)
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::Stopped => write!(f, "stopped"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
        }
    }
}
