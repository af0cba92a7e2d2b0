// Integration tests for the music subsystem
// These drive the public API end to end against a scripted engine backend,
// the way a host binding layer would call it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use modstream::{
    AudioConfig, AudioEngine, AudioError, EngineError, SharedStreamDriver, StreamDriver, StreamId,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modstream=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Scripted engine: records opened paths and counts refills per stream
struct ScriptedEngine {
    opened_paths: Arc<Mutex<Vec<String>>>,
    refills: Arc<AtomicUsize>,
    next_id: u64,
    playing: Vec<StreamId>,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            opened_paths: Arc::new(Mutex::new(Vec::new())),
            refills: Arc::new(AtomicUsize::new(0)),
            next_id: 1,
            playing: Vec::new(),
        }
    }
}

impl AudioEngine for ScriptedEngine {
    fn open_stream(&mut self, path: &str) -> std::result::Result<StreamId, EngineError> {
        if path.ends_with(".broken") {
            return Err(EngineError::OpenFailed {
                path: path.to_string(),
                source: "unsupported format".into(),
            });
        }
        self.opened_paths.lock().push(path.to_string());
        let id = StreamId::from_raw(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    fn close_stream(&mut self, stream: StreamId) -> std::result::Result<(), EngineError> {
        self.playing.retain(|s| *s != stream);
        Ok(())
    }

    fn start(&mut self, stream: StreamId) -> std::result::Result<(), EngineError> {
        if !self.playing.contains(&stream) {
            self.playing.push(stream);
        }
        Ok(())
    }

    fn stop(&mut self, stream: StreamId) -> std::result::Result<(), EngineError> {
        self.playing.retain(|s| *s != stream);
        Ok(())
    }

    fn pause(&mut self, stream: StreamId) -> std::result::Result<(), EngineError> {
        self.playing.retain(|s| *s != stream);
        Ok(())
    }

    fn resume(&mut self, stream: StreamId) -> std::result::Result<(), EngineError> {
        if !self.playing.contains(&stream) {
            self.playing.push(stream);
        }
        Ok(())
    }

    fn refill_buffers(&mut self, _stream: StreamId) -> std::result::Result<(), EngineError> {
        self.refills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_playing(&mut self, stream: StreamId) -> std::result::Result<bool, EngineError> {
        Ok(self.playing.contains(&stream))
    }

    fn set_volume(
        &mut self,
        _stream: StreamId,
        _volume: f32,
    ) -> std::result::Result<(), EngineError> {
        Ok(())
    }

    fn set_pitch(
        &mut self,
        _stream: StreamId,
        _pitch: f32,
    ) -> std::result::Result<(), EngineError> {
        Ok(())
    }

    fn set_loop_count(
        &mut self,
        _stream: StreamId,
        _count: i32,
    ) -> std::result::Result<(), EngineError> {
        Ok(())
    }

    fn time_length(&mut self, _stream: StreamId) -> std::result::Result<f32, EngineError> {
        Ok(241.0)
    }

    fn time_played(&mut self, _stream: StreamId) -> std::result::Result<f32, EngineError> {
        Ok(12.0)
    }

    fn set_master_volume(&mut self, _volume: f32) -> std::result::Result<(), EngineError> {
        Ok(())
    }
}

fn driver_with_base(base: &str) -> StreamDriver<ScriptedEngine> {
    let config = AudioConfig {
        base_path: Some(base.to_string()),
        ..AudioConfig::default()
    };
    StreamDriver::with_config(ScriptedEngine::new(), &config)
}

#[test]
fn full_lifecycle_through_the_public_api() -> Result<()> {
    init_tracing();
    let mut driver = driver_with_base("/assets/");

    let song = driver.load("djb_sdm.xm")?;
    assert_eq!(driver.loaded_count(), 1);
    assert!(!driver.is_playing(song)?);

    driver.play(song)?;
    assert!(driver.is_playing(song)?);

    driver.set_volume(song, 0.7)?;
    driver.set_pitch(song, 1.0)?;
    driver.set_loop_count(song, -1)?;
    assert_eq!(driver.time_length(song)?, 241.0);
    assert_eq!(driver.time_played(song)?, 12.0);

    driver.stop(song)?;
    assert!(!driver.is_playing(song)?);

    driver.unload(song)?;
    assert_eq!(driver.loaded_count(), 0);
    assert!(matches!(
        driver.play(song),
        Err(AudioError::InvalidHandle(_))
    ));

    Ok(())
}

#[test]
fn loads_resolve_against_the_base_path() -> Result<()> {
    init_tracing();
    let engine = ScriptedEngine::new();
    let opened = Arc::clone(&engine.opened_paths);
    let config = AudioConfig {
        base_path: Some("/assets/".to_string()),
        ..AudioConfig::default()
    };
    let mut driver = StreamDriver::with_config(engine, &config);

    // Literal concatenation: the base path owns its trailing separator
    driver.load("song.xm")?;
    driver.set_base_path("/other");
    driver.load("/b.xm")?;
    assert_eq!(*opened.lock(), vec!["/assets/song.xm", "/other/b.xm"]);

    // Failed loads don't register anything
    let before = driver.loaded_count();
    assert!(matches!(
        driver.load("/tune.broken"),
        Err(AudioError::LoadFailed { .. })
    ));
    assert_eq!(driver.loaded_count(), before);
    Ok(())
}

#[test]
fn tick_only_feeds_playing_streams() -> Result<()> {
    init_tracing();
    let engine = ScriptedEngine::new();
    let refills = Arc::clone(&engine.refills);
    let config = AudioConfig {
        base_path: Some(String::new()),
        ..AudioConfig::default()
    };
    let mut driver = StreamDriver::with_config(engine, &config);

    let a = driver.load("a.xm")?;
    let b = driver.load("b.xm")?;
    let c = driver.load("c.xm")?;

    driver.play(a)?;
    driver.play(b)?;
    driver.play(c)?;
    driver.pause(c)?;

    driver.tick();
    assert_eq!(refills.load(Ordering::SeqCst), 2);

    driver.stop(b)?;
    driver.tick();
    assert_eq!(refills.load(Ordering::SeqCst), 3);

    Ok(())
}

#[test]
fn capacity_is_enforced_and_recoverable() -> Result<()> {
    init_tracing();
    let config = AudioConfig {
        max_streams: 2,
        base_path: Some(String::new()),
        ..AudioConfig::default()
    };
    let mut driver = StreamDriver::with_config(ScriptedEngine::new(), &config);

    let first = driver.load("a.xm")?;
    let _second = driver.load("b.xm")?;
    assert!(matches!(
        driver.load("c.xm"),
        Err(AudioError::TableFull { capacity: 2 })
    ));

    // Unloading frees the slot; the replacement gets a fresh handle
    driver.unload(first)?;
    let third = driver.load("c.xm")?;
    assert_ne!(third, first);

    Ok(())
}

#[test]
fn shared_driver_serializes_script_and_frame_threads() -> Result<()> {
    init_tracing();
    let engine = ScriptedEngine::new();
    let refills = Arc::clone(&engine.refills);
    let config = AudioConfig {
        base_path: Some(String::new()),
        ..AudioConfig::default()
    };
    let shared = SharedStreamDriver::new(StreamDriver::with_config(engine, &config));

    let song = shared.load("song.xm")?;
    shared.play(song)?;

    let frame = {
        let shared = shared.clone();
        std::thread::spawn(move || {
            for _ in 0..50 {
                shared.tick();
            }
        })
    };
    let script = {
        let shared = shared.clone();
        std::thread::spawn(move || {
            shared.set_master_volume(0.6).unwrap();
            shared.set_volume(song, 0.9).unwrap();
        })
    };

    frame.join().unwrap();
    script.join().unwrap();

    assert_eq!(refills.load(Ordering::SeqCst), 50);
    assert!(shared.is_playing(song)?);
    shared.unload(song)?;
    assert_eq!(shared.loaded_count(), 0);

    Ok(())
}
