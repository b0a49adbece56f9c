//! Audio playback and recording state
//!
//! Playback enforces one invariant: at most one handle is playing at any
//! instant within a controller. Starting playback on a new key pauses and
//! rewinds whatever was playing first. The handle itself is a trait so the
//! controller works against any audio backend (or a test double).

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::Error;

/// A live audio playback handle
pub trait AudioHandle {
    fn play(&mut self);
    fn pause(&mut self);
    /// Rewind to the start of the clip
    fn seek_start(&mut self);
}

/// Addresses one audio clip of one entity (e.g. segment 7, suggested slot)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackKey {
    pub entity_id: i64,
    pub slot: String,
}

impl PlaybackKey {
    pub fn new(entity_id: i64, slot: &str) -> Self {
        Self {
            entity_id,
            slot: slot.to_string(),
        }
    }
}

impl fmt::Display for PlaybackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.entity_id, self.slot)
    }
}

/// Single-playback controller: {Idle, Playing(key)}
pub struct Playback<H: AudioHandle> {
    handles: HashMap<PlaybackKey, H>,
    playing: Option<PlaybackKey>,
}

impl<H: AudioHandle> Default for Playback<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: AudioHandle> Playback<H> {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            playing: None,
        }
    }

    /// Register (or replace) the handle for a key
    pub fn register(&mut self, key: PlaybackKey, handle: H) {
        self.handles.insert(key, handle);
    }

    /// Start playback for a key, stopping and rewinding any current playback
    pub fn start(&mut self, key: &PlaybackKey) -> Result<(), Error> {
        if self.playing.as_ref() == Some(key) {
            return Ok(());
        }

        if let Some(previous) = self.playing.take() {
            if let Some(handle) = self.handles.get_mut(&previous) {
                handle.pause();
                handle.seek_start();
            }
        }

        let handle = self
            .handles
            .get_mut(key)
            .ok_or_else(|| Error::general(format!("No audio handle registered for {}", key)))?;
        handle.play();
        debug!("playback start: {}", key);
        self.playing = Some(key.clone());
        Ok(())
    }

    /// Pause the current playback, if any, leaving its position intact
    pub fn stop(&mut self) {
        if let Some(current) = self.playing.take() {
            if let Some(handle) = self.handles.get_mut(&current) {
                handle.pause();
            }
            debug!("playback stop: {}", current);
        }
    }

    /// A clip reached its natural end
    pub fn on_ended(&mut self, key: &PlaybackKey) {
        if self.playing.as_ref() == Some(key) {
            self.playing = None;
        }
    }

    /// Whether this exact key is the one currently playing
    pub fn is_playing(&self, key: &PlaybackKey) -> bool {
        self.playing.as_ref() == Some(key)
    }

    /// The currently playing key, if any
    pub fn current(&self) -> Option<&PlaybackKey> {
        self.playing.as_ref()
    }
}

/// A microphone capture device
pub trait CaptureDevice {
    fn start(&mut self) -> Result<(), Error>;
    /// Release the device; must be safe to call exactly once after `start`
    fn release(&mut self);
}

/// A finished recording, ready for multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedClip {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// Buffers captured audio chunks into one uploadable clip.
///
/// The device is released as soon as recording stops, whatever happens to the
/// clip afterwards (upload success or failure included).
pub struct Recorder<D: CaptureDevice> {
    device: Option<D>,
    chunks: Vec<Vec<u8>>,
    mime_type: String,
}

impl<D: CaptureDevice> Recorder<D> {
    /// Acquire the device and start capturing
    pub fn start(mut device: D, mime_type: &str) -> Result<Self, Error> {
        device.start()?;
        Ok(Self {
            device: Some(device),
            chunks: Vec::new(),
            mime_type: mime_type.to_string(),
        })
    }

    /// Buffer one captured chunk
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    /// Stop capturing: release the device and assemble the buffered chunks
    /// into a single clip. The device is released even when nothing was
    /// captured.
    pub fn finish(mut self, file_name: &str) -> RecordedClip {
        if let Some(mut device) = self.device.take() {
            device.release();
        }

        let mut data = Vec::new();
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }

        RecordedClip {
            data,
            mime_type: self.mime_type.clone(),
            file_name: file_name.to_string(),
        }
    }
}
