//! Audio subsystem for cue playback
//!
//! Consumes cues from the transport and the command handlers and plays the
//! matching sound file through rodio.

mod service;

pub use service::{AudioError, AudioService, default_sounds_dir};
