/// Thread-shared driver wrapper
///
/// The driver itself assumes single-threaded access (spec'd for a host whose
/// frame thread both ticks and issues control calls). Hosts that route
/// control calls from a script thread while the frame thread runs `tick` use
/// this wrapper instead: one exclusive lock serializing every table and
/// driver operation, so table mutation can never overlap a traversal.
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::AudioEngine;
use crate::error::Result;
use crate::registry::driver::StreamDriver;
use crate::registry::table::Handle;

/// Cloneable, lock-guarded handle to a [`StreamDriver`]
pub struct SharedStreamDriver<E: AudioEngine> {
    inner: Arc<Mutex<StreamDriver<E>>>,
}

impl<E: AudioEngine> Clone for SharedStreamDriver<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: AudioEngine> SharedStreamDriver<E> {
    pub fn new(driver: StreamDriver<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(driver)),
        }
    }

    pub fn load(&self, relative_path: &str) -> Result<Handle> {
        self.inner.lock().load(relative_path)
    }

    pub fn unload(&self, handle: Handle) -> Result<()> {
        self.inner.lock().unload(handle)
    }

    pub fn play(&self, handle: Handle) -> Result<()> {
        self.inner.lock().play(handle)
    }

    pub fn stop(&self, handle: Handle) -> Result<()> {
        self.inner.lock().stop(handle)
    }

    pub fn pause(&self, handle: Handle) -> Result<()> {
        self.inner.lock().pause(handle)
    }

    pub fn resume(&self, handle: Handle) -> Result<()> {
        self.inner.lock().resume(handle)
    }

    pub fn set_volume(&self, handle: Handle, volume: f32) -> Result<()> {
        self.inner.lock().set_volume(handle, volume)
    }

    pub fn set_pitch(&self, handle: Handle, pitch: f32) -> Result<()> {
        self.inner.lock().set_pitch(handle, pitch)
    }

    pub fn set_loop_count(&self, handle: Handle, count: i32) -> Result<()> {
        self.inner.lock().set_loop_count(handle, count)
    }

    pub fn is_playing(&self, handle: Handle) -> Result<bool> {
        self.inner.lock().is_playing(handle)
    }

    pub fn time_length(&self, handle: Handle) -> Result<f32> {
        self.inner.lock().time_length(handle)
    }

    pub fn time_played(&self, handle: Handle) -> Result<f32> {
        self.inner.lock().time_played(handle)
    }

    pub fn set_master_volume(&self, volume: f32) -> Result<()> {
        self.inner.lock().set_master_volume(volume)
    }

    pub fn set_base_path<S: Into<String>>(&self, path: S) {
        self.inner.lock().set_base_path(path)
    }

    pub fn loaded_count(&self) -> usize {
        self.inner.lock().loaded_count()
    }

    pub fn tick(&self) {
        self.inner.lock().tick()
    }
}
