//! Audio playback service
//!
//! Runs in a background task, receiving cues via channel. Each sound is
//! played on its own thread so overlapping cues do not block the receiver.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;
use tracing::{debug, info, warn};

use matchcue_core::CueReceiver;
use matchcue_core::config::AudioSettings;

/// Sound names ending in one of these are treated as file paths
const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// Extension appended to bare sound names
const DEFAULT_EXTENSION: &str = "mp3";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    Output(#[from] rodio::StreamError),

    #[error("failed to open sound file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode sound file {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("failed to create audio sink")]
    Sink(#[from] rodio::PlayError),
}

/// `<config dir>/matchcue/sounds`
pub fn default_sounds_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join("matchcue").join("sounds"))
}

/// Audio service that plays one sound per received cue
pub struct AudioService {
    cue_rx: CueReceiver,
    settings: AudioSettings,
    sounds_dir: PathBuf,

    /// Sound name -> file known to exist
    resolved: HashMap<String, PathBuf>,
}

impl AudioService {
    pub fn new(cue_rx: CueReceiver, settings: AudioSettings, sounds_dir: PathBuf) -> Self {
        Self {
            cue_rx,
            settings,
            sounds_dir,
            resolved: HashMap::new(),
        }
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    /// Map a sound name to the file it refers to.
    ///
    /// Names with an audio extension are paths (relative ones are resolved
    /// against the sounds directory); anything else is `<sounds dir>/<name>.mp3`.
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        let has_extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                AUDIO_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if has_extension {
            self.sounds_dir.join(name)
        } else {
            self.sounds_dir.join(format!("{name}.{DEFAULT_EXTENSION}"))
        }
    }

    /// Check that every named sound exists on disk.
    ///
    /// Returns the names with no file behind them. Missing sounds are only
    /// warned about; the cue is skipped when it fires.
    pub fn check_sounds<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut missing = Vec::new();
        for name in names {
            if self.lookup(name).is_none() {
                warn!(
                    sound = name,
                    path = %self.resolve_path(name).display(),
                    "Sound file not found"
                );
                missing.push(name.to_string());
            }
        }

        if missing.is_empty() {
            info!(
                sounds_dir = %self.sounds_dir.display(),
                sounds = self.resolved.len(),
                "All sound files found"
            );
        }
        missing
    }

    /// Run the audio service until every cue sender is dropped
    pub async fn run(mut self) {
        while let Some(cue) = self.cue_rx.recv().await {
            debug!(%cue, "Cue received");
            self.play(cue.sound_name());
        }
        info!("Cue channel closed, audio service stopping");
    }

    fn lookup(&mut self, name: &str) -> Option<PathBuf> {
        if let Some(path) = self.resolved.get(name) {
            return Some(path.clone());
        }

        let path = self.resolve_path(name);
        if path.is_file() {
            self.resolved.insert(name.to_string(), path.clone());
            Some(path)
        } else {
            None
        }
    }

    fn play(&mut self, name: &str) {
        if !self.settings.enabled {
            debug!(sound = name, "Audio disabled, cue muted");
            return;
        }

        let Some(path) = self.lookup(name) else {
            warn!(sound = name, "Sound file not found, cue skipped");
            return;
        };

        let volume = self.settings.volume;
        std::thread::spawn(move || {
            if let Err(err) = play_file(&path, volume) {
                warn!(path = %path.display(), error = %err, "Sound playback failed");
            }
        });
    }
}

/// Play a file to completion on the default output device.
fn play_file(path: &Path, volume: u8) -> Result<(), AudioError> {
    let (_stream, stream_handle) = OutputStream::try_default()?;

    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let sink = Sink::try_new(&stream_handle)?;

    sink.set_volume(f32::from(volume.min(100)) / 100.0);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchcue_core::{Cue, LifecycleCue};
    use tokio::sync::mpsc;

    fn make_service(dir: &Path, enabled: bool) -> (AudioService, mpsc::Sender<Cue>) {
        let (tx, rx) = mpsc::channel(8);
        let settings = AudioSettings {
            enabled,
            ..AudioSettings::default()
        };
        (AudioService::new(rx, settings, dir.to_path_buf()), tx)
    }

    #[test]
    fn test_resolve_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, _tx) = make_service(dir.path(), true);

        assert_eq!(
            service.resolve_path("bounty_runes"),
            dir.path().join("bounty_runes.mp3")
        );
        assert_eq!(
            service.resolve_path("custom/horn.WAV"),
            dir.path().join("custom/horn.WAV")
        );
        assert_eq!(
            service.resolve_path("/opt/sounds/gong.ogg"),
            PathBuf::from("/opt/sounds/gong.ogg")
        );
        // Dots in a bare name are not an extension we know
        assert_eq!(
            service.resolve_path("v1.2"),
            dir.path().join("v1.2.mp3")
        );
    }

    #[test]
    fn test_check_sounds_reports_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("horn.mp3"), b"").expect("write");
        std::fs::write(dir.path().join("gong.wav"), b"").expect("write");
        let (mut service, _tx) = make_service(dir.path(), true);

        let missing = service.check_sounds(["horn", "gong.wav", "runes", "bell.ogg"]);

        assert_eq!(missing, vec!["runes", "bell.ogg"]);
        assert_eq!(service.resolved.len(), 2);
    }

    #[tokio::test]
    async fn test_run_stops_when_senders_drop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, tx) = make_service(dir.path(), false);
        let handle = tokio::spawn(service.run());

        tx.send(Cue::from(LifecycleCue::SoundCheck))
            .await
            .expect("send");
        tx.send(Cue::Event {
            name: "Horn".to_string(),
            sound_effect: "horn".to_string(),
        })
        .await
        .expect("send");
        drop(tx);

        tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("audio service did not stop")
            .expect("audio service panicked");
    }
}
