/// Stream driver
///
/// Owns the resource table, the base path and the engine backend, and exposes
/// the whole control surface of the music subsystem: load/unload, the
/// play/pause/stop state machine, per-stream parameters, queries, and the
/// per-frame `tick` pass that keeps playing streams fed with audio data.
///
/// Every operation validates its handle against the table first and fails
/// with a typed error on a miss; a failed operation leaves both the table and
/// the engine exactly as they were.
use crate::config::AudioConfig;
use crate::engine::AudioEngine;
use crate::error::{AudioError, Result};
use crate::platform;
use crate::registry::state::PlayState;
use crate::registry::table::{Handle, ResourceTable};

/// Music subsystem driver, generic over the engine backend
pub struct StreamDriver<E: AudioEngine> {
    engine: E,
    table: ResourceTable,
    base_path: String,
}

impl<E: AudioEngine> StreamDriver<E> {
    /// Create a driver with default configuration and the platform-resolved
    /// base path.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, &AudioConfig::default())
    }

    /// Create a driver from an explicit configuration. When the config
    /// carries no base path the platform-resolved one is used.
    pub fn with_config(engine: E, config: &AudioConfig) -> Self {
        let base_path = config
            .base_path
            .clone()
            .unwrap_or_else(platform::resolve_base_path);

        tracing::info!(
            "Music subsystem ready: capacity {}, base path: {}",
            config.max_streams,
            base_path
        );

        Self {
            engine,
            table: ResourceTable::new(config),
            base_path,
        }
    }

    /// Replace the base path prepended to every relative load path
    pub fn set_base_path<S: Into<String>>(&mut self, path: S) {
        self.base_path = path.into();
        tracing::debug!("Music base path set to: {}", self.base_path);
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of currently loaded music streams
    pub fn loaded_count(&self) -> usize {
        self.table.len()
    }

    /// Load the music resource at `base_path + relative_path` and register it.
    ///
    /// The path is built by literal concatenation; the base path and the
    /// relative path own their separators between them. The new stream starts
    /// out stopped.
    pub fn load(&mut self, relative_path: &str) -> Result<Handle> {
        if self.table.is_full() {
            return Err(AudioError::TableFull {
                capacity: self.table.capacity(),
            });
        }

        let path = format!("{}{}", self.base_path, relative_path);
        tracing::info!("Loading music stream: {}", path);

        let stream = self
            .engine
            .open_stream(&path)
            .map_err(|source| AudioError::LoadFailed {
                path: path.clone(),
                source,
            })?;

        match self.table.insert(stream) {
            Ok(handle) => Ok(handle),
            Err(err) => {
                // Don't leak the freshly opened stream on a bookkeeping miss
                if let Err(close_err) = self.engine.close_stream(stream) {
                    tracing::warn!("Failed to close orphaned stream {}: {}", stream, close_err);
                }
                Err(err)
            }
        }
    }

    /// Stop the stream if needed, release its engine resource and drop the
    /// table entry. The handle is dead afterwards and never reissued.
    pub fn unload(&mut self, handle: Handle) -> Result<()> {
        let entry = self.table.lookup_mut(handle)?;
        let stream = entry.stream();

        if entry.state().is_started() {
            self.engine.stop(stream)?;
            // Record the stop even if the close below fails, so a lingering
            // entry is never ticked against a voice the engine already halted
            entry.set_state(PlayState::Stopped);
        }
        self.engine.close_stream(stream)?;
        self.table.remove(handle)?;

        tracing::info!("Unloaded music handle {}", handle);
        Ok(())
    }

    /// Start playback. A stream already playing is left alone; a paused or
    /// stopped stream restarts from the top.
    pub fn play(&mut self, handle: Handle) -> Result<()> {
        let entry = self.table.lookup_mut(handle)?;
        if entry.state() == PlayState::Playing {
            return Ok(());
        }

        self.engine.start(entry.stream())?;
        entry.set_state(PlayState::Playing);

        tracing::debug!("Playing music handle {}", handle);
        Ok(())
    }

    /// Halt playback and rewind. No-op on a stream that is already stopped.
    pub fn stop(&mut self, handle: Handle) -> Result<()> {
        let entry = self.table.lookup_mut(handle)?;
        if !entry.state().is_started() {
            return Ok(());
        }

        self.engine.stop(entry.stream())?;
        entry.set_state(PlayState::Stopped);

        tracing::debug!("Stopped music handle {}", handle);
        Ok(())
    }

    /// Suspend a playing stream in place. Paused streams keep their position
    /// and are skipped by `tick` until resumed.
    pub fn pause(&mut self, handle: Handle) -> Result<()> {
        let entry = self.table.lookup_mut(handle)?;
        if entry.state() != PlayState::Playing {
            return Ok(());
        }

        self.engine.pause(entry.stream())?;
        entry.set_state(PlayState::Paused);

        tracing::debug!("Paused music handle {}", handle);
        Ok(())
    }

    /// Continue a paused stream from where it left off
    pub fn resume(&mut self, handle: Handle) -> Result<()> {
        let entry = self.table.lookup_mut(handle)?;
        if entry.state() != PlayState::Paused {
            return Ok(());
        }

        self.engine.resume(entry.stream())?;
        entry.set_state(PlayState::Playing);

        tracing::debug!("Resumed music handle {}", handle);
        Ok(())
    }

    /// Set per-stream volume (0.0-1.0)
    pub fn set_volume(&mut self, handle: Handle, volume: f32) -> Result<()> {
        let entry = self.table.lookup(handle)?;
        self.engine.set_volume(entry.stream(), volume)?;
        Ok(())
    }

    /// Set per-stream playback rate (1.0 = recorded rate)
    pub fn set_pitch(&mut self, handle: Handle, pitch: f32) -> Result<()> {
        let entry = self.table.lookup(handle)?;
        self.engine.set_pitch(entry.stream(), pitch)?;
        Ok(())
    }

    /// Set how many times the stream repeats after the first play
    pub fn set_loop_count(&mut self, handle: Handle, count: i32) -> Result<()> {
        let entry = self.table.lookup(handle)?;
        self.engine.set_loop_count(entry.stream(), count)?;
        Ok(())
    }

    /// Whether the engine reports the stream as audibly playing
    pub fn is_playing(&mut self, handle: Handle) -> Result<bool> {
        let entry = self.table.lookup(handle)?;
        Ok(self.engine.is_playing(entry.stream())?)
    }

    /// Total stream length in seconds
    pub fn time_length(&mut self, handle: Handle) -> Result<f32> {
        let entry = self.table.lookup(handle)?;
        Ok(self.engine.time_length(entry.stream())?)
    }

    /// Seconds played in the current playback
    pub fn time_played(&mut self, handle: Handle) -> Result<f32> {
        let entry = self.table.lookup(handle)?;
        Ok(self.engine.time_played(entry.stream())?)
    }

    /// Global output volume. Bypasses the table entirely.
    pub fn set_master_volume(&mut self, volume: f32) -> Result<()> {
        self.engine.set_master_volume(volume)?;
        Ok(())
    }

    /// Per-frame maintenance pass: refill buffers for every playing stream.
    ///
    /// Called once per frame by the host. Safe on an empty table and bounded
    /// by the number of live entries. A refill failure on one stream is
    /// logged and does not abort the pass for the others.
    pub fn tick(&mut self) {
        if self.table.is_empty() {
            return;
        }

        let engine = &mut self.engine;
        self.table.for_each(|entry| {
            if entry.state().is_active() {
                if let Err(err) = engine.refill_buffers(entry.stream()) {
                    tracing::warn!(
                        "Buffer refill failed for music handle {}: {}",
                        entry.handle(),
                        err
                    );
                }
            }
        });
    }
}

impl<E: AudioEngine> Drop for StreamDriver<E> {
    /// Teardown releases every live stream so a subsystem restart always
    /// begins from a clean engine.
    fn drop(&mut self) {
        let mut live = Vec::new();
        self.table
            .for_each(|entry| live.push((entry.handle(), entry.stream(), entry.state())));

        for (handle, stream, state) in live {
            if state.is_started() {
                if let Err(err) = self.engine.stop(stream) {
                    tracing::warn!("Failed to stop stream {} at teardown: {}", stream, err);
                }
            }
            if let Err(err) = self.engine.close_stream(stream) {
                tracing::warn!("Failed to close stream {} at teardown: {}", stream, err);
            }
            let _ = self.table.remove(handle);
        }
    }
}
