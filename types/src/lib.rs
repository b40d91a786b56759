//! Shared configuration types for matchcue
//!
//! This crate contains the serializable shape of the YAML configuration file.
//! Every duration is kept as the string the user wrote ("3m", "-20s", "90");
//! resolving them to whole seconds and validating the result is done by
//! `matchcue-core` when a profile is activated.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Name of the profile activated when none is given on the command line.
pub const DEFAULT_PROFILE: &str = "default";

// ─────────────────────────────────────────────────────────────────────────────
// Events & Profiles
// ─────────────────────────────────────────────────────────────────────────────

/// One recurring event as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventConfig {
    /// Shift applied to every occurrence (negative values warn ahead of time)
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub offset: String,

    /// Game time of the first occurrence
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub first_happens_at: String,

    /// Time between occurrences
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub interval: String,

    /// Number of occurrences (0 = repeat until the match ends)
    #[serde(default)]
    pub repeats: u32,

    /// Sound name or path to an audio file
    pub sound_effect: String,
}

impl EventConfig {
    pub fn new(
        offset: &str,
        first_happens_at: &str,
        interval: &str,
        repeats: u32,
        sound_effect: &str,
    ) -> Self {
        Self {
            offset: offset.to_string(),
            first_happens_at: first_happens_at.to_string(),
            interval: interval.to_string(),
            repeats,
            sound_effect: sound_effect.to_string(),
        }
    }
}

/// A named set of events plus the match-level timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileConfig {
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub global_offset: String,

    /// Occurrences later than this are dropped and the transport stops here
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub match_length: String,

    /// Time between `start` and the in-game clock reaching 00:00:00
    #[serde(default = "zero_duration", deserialize_with = "duration_text")]
    pub countdown: String,

    #[serde(default)]
    pub events: BTreeMap<String, EventConfig>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Audio playback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioSettings {
    /// Master enable for all audio
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Volume level (0-100)
    #[serde(default = "default_audio_volume")]
    pub volume: u8,

    /// Directory holding `<name>.mp3` files (None = `<config dir>/matchcue/sounds`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sounds_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_audio_volume() -> u8 {
    80
}

fn zero_duration() -> String {
    "0".to_string()
}

/// Durations may be written as plain YAML integers (seconds) or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum DurationText {
    Text(String),
    Seconds(i64),
}

fn duration_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match DurationText::deserialize(deserializer)? {
        DurationText::Text(text) => text,
        DurationText::Seconds(seconds) => seconds.to_string(),
    })
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 80,
            sounds_dir: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config File
// ─────────────────────────────────────────────────────────────────────────────

/// Root of the YAML configuration file.
///
/// Note: Persistence and profile activation are provided by matchcue-core via
/// the `MatchCueConfigExt` trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchCueConfig {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
    #[serde(default)]
    pub audio: AudioSettings,
}

impl Default for MatchCueConfig {
    /// Written to disk on first run.
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), dota_profile());
        Self {
            profiles,
            audio: AudioSettings::default(),
        }
    }
}

/// Standard Dota 2 map objectives, each announced shortly before it happens.
fn dota_profile() -> ProfileConfig {
    let events = [
        ("BountyRunes", EventConfig::new("-20s", "0", "3m", 0, "bounty_runes")),
        ("PowerRunes", EventConfig::new("-20s", "6m", "2m", 0, "power_runes")),
        ("WisdomRunes", EventConfig::new("-30s", "7m", "7m", 0, "wisdom_runes")),
        ("LotusPools", EventConfig::new("-15s", "3m", "3m", 0, "lotus_pools")),
        ("DayNightCycle", EventConfig::new("-10s", "5m", "5m", 0, "day_night_cycle")),
        ("Tormentor", EventConfig::new("-30s", "20m", "0", 1, "tormentor")),
        ("StackCamps", EventConfig::new("0", "45s", "1m", 15, "stack_camps")),
    ];

    ProfileConfig {
        global_offset: "0".to_string(),
        match_length: "1h30m".to_string(),
        countdown: "1m30s".to_string(),
        events: events
            .into_iter()
            .map(|(name, event)| (name.to_string(), event))
            .collect(),
    }
}
