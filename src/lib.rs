//! modstream — handle-indexed streaming-music subsystem
//!
//! A bounded registry of music streams driven once per frame. A host (game
//! runtime, scripting layer) loads music by path, gets back a small integer
//! handle, and controls playback through that handle; the per-frame `tick`
//! keeps every playing stream's buffers topped up.
//!
//! ## Architecture
//!
//! ```text
//! binding/control layer (host)
//!   └── StreamDriver / SharedStreamDriver
//!         ├── ResourceTable (handle -> StreamEntry)
//!         └── AudioEngine (trait)
//!               └── RodioEngine (built-in backend)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modstream::{AudioConfig, RodioEngine, StreamDriver};
//!
//! let engine = RodioEngine::new()?;
//! let mut driver = StreamDriver::with_config(engine, &AudioConfig::default());
//!
//! let song = driver.load("/music/djb_sdm.xm")?;
//! driver.play(song)?;
//!
//! // once per frame:
//! driver.tick();
//! ```

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod registry;

// Re-export commonly used types
pub use backend::RodioEngine;
pub use config::AudioConfig;
pub use engine::{AudioEngine, EngineError, StreamId};
pub use error::{AudioError, Result};
pub use platform::resolve_base_path;
pub use registry::{Handle, PlayState, ResourceTable, SharedStreamDriver, StreamDriver, StreamEntry};
