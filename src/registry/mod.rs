//! Music registry module
//!
//! The registry is the heart of the subsystem: a bounded table of loaded
//! music streams plus the driver that moves them through their playback
//! state machine and keeps them fed once per frame.
//!
//! ## Architecture
//!
//! ```text
//! StreamDriver (per-frame tick + control surface)
//!   ├── ResourceTable (handle -> StreamEntry, bounded)
//!   │     ├── StreamEntry { handle, stream, state }
//!   │     └── ...
//!   ├── base path (prepended to every relative load path)
//!   └── AudioEngine backend (open/start/stop/refill, opaque)
//! ```
//!
//! Control calls arrive by handle, are validated against the table once, and
//! then delegate to the engine. `tick()` visits the table and refills buffers
//! for exactly the streams currently in the `Playing` state.

pub mod driver;
pub mod shared;
pub mod state;
pub mod table;

// Re-export commonly used types
pub use driver::StreamDriver;
pub use shared::SharedStreamDriver;
pub use state::PlayState;
pub use table::{Handle, ResourceTable, StreamEntry};
