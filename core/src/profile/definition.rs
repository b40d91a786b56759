//! Validated profile types
//!
//! A [`Profile`] is the in-memory, integer-second form of a
//! [`ProfileConfig`] from the config file. Once built it is never mutated.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use matchcue_types::{EventConfig, ProfileConfig};

use super::error::ProfileError;
use crate::duration::parse_seconds;

/// A recurring event with every time field resolved to whole seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub offset: i64,
    pub first_happens_at: i64,
    pub interval: i64,
    /// Number of occurrences (0 = until the match ends)
    pub repeats: u32,
    pub sound_effect: String,
}

impl Event {
    fn from_config(name: &str, config: &EventConfig) -> Result<Self, ProfileError> {
        let field = |field: &'static str, value: &str| {
            parse_seconds(value).map_err(|source| ProfileError::InvalidEventDuration {
                event: name.to_string(),
                field,
                source,
            })
        };

        Ok(Self {
            offset: field("Offset", &config.offset)?,
            first_happens_at: field("FirstHappensAt", &config.first_happens_at)?,
            interval: field("Interval", &config.interval)?,
            repeats: config.repeats,
            sound_effect: config.sound_effect.trim().to_string(),
        })
    }

    /// True if this event keeps repeating until the match ends
    pub fn is_unbounded(&self) -> bool {
        self.repeats == 0
    }
}

/// Match timing plus the set of named events to announce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub global_offset: i64,
    pub match_length: i64,
    pub countdown: i64,
    /// Keyed by event name; ordered so the built timeline is reproducible
    pub events: BTreeMap<String, Event>,
}

impl Profile {
    /// Resolve and validate a profile read from the config file.
    pub fn from_config(config: &ProfileConfig) -> Result<Self, ProfileError> {
        let field = |field: &'static str, value: &str| {
            parse_seconds(value).map_err(|source| ProfileError::InvalidDuration { field, source })
        };

        let events = config
            .events
            .iter()
            .map(|(name, event)| Event::from_config(name, event).map(|ev| (name.clone(), ev)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let profile = Self {
            global_offset: field("GlobalOffset", &config.global_offset)?,
            match_length: field("MatchLength", &config.match_length)?,
            countdown: field("Countdown", &config.countdown)?,
            events,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the invariants the timeline builder relies on.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.events.is_empty() {
            return Err(ProfileError::NoEvents);
        }
        for (field, value) in [
            ("MatchLength", self.match_length),
            ("Countdown", self.countdown),
        ] {
            if value < 0 {
                return Err(ProfileError::NegativeDuration { field, value });
            }
        }

        for (name, event) in &self.events {
            if event.interval < 0 {
                return Err(ProfileError::NegativeInterval {
                    event: name.clone(),
                    value: event.interval,
                });
            }
            if event.is_unbounded() && event.interval == 0 {
                return Err(ProfileError::UnboundedEvent {
                    event: name.clone(),
                });
            }
            if event.sound_effect.is_empty() {
                return Err(ProfileError::MissingSoundEffect {
                    event: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Every distinct sound effect used by this profile
    pub fn sound_effects(&self) -> HashSet<&str> {
        self.events
            .values()
            .map(|event| event.sound_effect.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationError;

    fn profile_config(events: Vec<(&str, EventConfig)>) -> ProfileConfig {
        ProfileConfig {
            global_offset: "0".to_string(),
            match_length: "10m".to_string(),
            countdown: "1m30s".to_string(),
            events: events
                .into_iter()
                .map(|(name, event)| (name.to_string(), event))
                .collect(),
        }
    }

    #[test]
    fn test_from_config_resolves_durations() {
        let config = profile_config(vec![(
            "Runes",
            EventConfig::new("-20s", "6m", "2m", 0, " power_runes "),
        )]);

        let profile = Profile::from_config(&config).expect("valid profile");
        assert_eq!(profile.match_length, 600);
        assert_eq!(profile.countdown, 90);

        let runes = &profile.events["Runes"];
        assert_eq!(runes.offset, -20);
        assert_eq!(runes.first_happens_at, 360);
        assert_eq!(runes.interval, 120);
        assert_eq!(runes.sound_effect, "power_runes");
    }

    #[test]
    fn test_from_config_rejects_empty_events() {
        let config = profile_config(vec![]);
        assert_eq!(Profile::from_config(&config), Err(ProfileError::NoEvents));
    }

    #[test]
    fn test_from_config_rejects_unbounded_event() {
        let config = profile_config(vec![("Loop", EventConfig::new("0", "0", "0", 0, "x"))]);
        assert_eq!(
            Profile::from_config(&config),
            Err(ProfileError::UnboundedEvent {
                event: "Loop".to_string()
            })
        );
    }

    #[test]
    fn test_zero_interval_with_repeats_is_allowed() {
        let config = profile_config(vec![("Once", EventConfig::new("0", "5m", "0", 1, "x"))]);
        assert!(Profile::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_reports_bad_event_duration() {
        let config = profile_config(vec![("Bad", EventConfig::new("soon", "0", "1m", 0, "x"))]);
        assert_eq!(
            Profile::from_config(&config),
            Err(ProfileError::InvalidEventDuration {
                event: "Bad".to_string(),
                field: "Offset",
                source: DurationError::Invalid {
                    input: "soon".to_string()
                },
            })
        );
    }

    #[test]
    fn test_negative_countdown_rejected() {
        let mut config = profile_config(vec![("A", EventConfig::new("0", "0", "1m", 0, "x"))]);
        config.countdown = "-5s".to_string();
        assert_eq!(
            Profile::from_config(&config),
            Err(ProfileError::NegativeDuration {
                field: "Countdown",
                value: -5
            })
        );
    }

    #[test]
    fn test_sound_effects_are_distinct() {
        let config = profile_config(vec![
            ("A", EventConfig::new("0", "0", "1m", 0, "ping")),
            ("B", EventConfig::new("0", "30s", "1m", 0, "ping")),
            ("C", EventConfig::new("0", "0", "0", 1, "horn")),
        ]);
        let profile = Profile::from_config(&config).expect("valid profile");
        let effects = profile.sound_effects();
        assert_eq!(effects.len(), 2);
        assert!(effects.contains("ping"));
        assert!(effects.contains("horn"));
    }
}
