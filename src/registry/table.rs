/// Bounded handle-indexed stream table
///
/// Maps small caller-visible handles to loaded stream entries. Capacity is
/// fixed at construction and the backing map reserves enough slots up front
/// to stay under the configured fill factor, so lookup cost stays flat for
/// the table's whole lifetime.
use std::collections::HashMap;
use std::fmt;

use crate::config::AudioConfig;
use crate::engine::StreamId;
use crate::error::{AudioError, Result};
use crate::registry::state::PlayState;

/// Caller-visible identifier for one table entry.
///
/// Opaque beyond equality comparison. Handles are assigned from a counter
/// scoped to the table's lifetime and are never reissued, so a handle kept
/// across an unload can only ever miss, never alias a newer stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One loaded music stream and its bookkeeping
#[derive(Debug)]
pub struct StreamEntry {
    handle: Handle,
    stream: StreamId,
    state: PlayState,
}

impl StreamEntry {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The engine stream backing this entry. Exclusively owned by the entry;
    /// the driver closes it exactly once, on unload.
    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: PlayState) {
        self.state = state;
    }
}

/// Fixed-capacity mapping from handle to stream entry
pub struct ResourceTable {
    entries: HashMap<Handle, StreamEntry>,
    capacity: usize,
    next_handle: u32,
}

impl ResourceTable {
    /// Create an empty table sized from the configuration. Slots for the
    /// whole capacity are reserved immediately.
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            entries: HashMap::with_capacity(config.table_slots()),
            capacity: config.max_streams,
            next_handle: 1,
        }
    }

    /// Store a new entry for `stream` and return its freshly assigned handle.
    /// New entries always start out stopped.
    pub fn insert(&mut self, stream: StreamId) -> Result<Handle> {
        if self.entries.len() >= self.capacity {
            return Err(AudioError::TableFull {
                capacity: self.capacity,
            });
        }

        let handle = Handle(self.next_handle);
        self.next_handle += 1;

        self.entries.insert(
            handle,
            StreamEntry {
                handle,
                stream,
                state: PlayState::Stopped,
            },
        );

        tracing::debug!("Registered music stream {} as handle {}", stream, handle);
        Ok(handle)
    }

    pub fn lookup(&self, handle: Handle) -> Result<&StreamEntry> {
        self.entries
            .get(&handle)
            .ok_or(AudioError::InvalidHandle(handle))
    }

    pub fn lookup_mut(&mut self, handle: Handle) -> Result<&mut StreamEntry> {
        self.entries
            .get_mut(&handle)
            .ok_or(AudioError::InvalidHandle(handle))
    }

    /// Detach and return the entry. Bookkeeping only: the caller is
    /// responsible for having released the engine stream beforehand.
    pub fn remove(&mut self, handle: Handle) -> Result<StreamEntry> {
        self.entries
            .remove(&handle)
            .ok_or(AudioError::InvalidHandle(handle))
    }

    /// Visit every live entry exactly once. Iteration order is unspecified.
    /// The table must not be mutated from inside the visit callback.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&StreamEntry),
    {
        for entry in self.entries.values() {
            visit(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
