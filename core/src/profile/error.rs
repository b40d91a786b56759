//! Error types for profile validation

use thiserror::Error;

use crate::duration::DurationError;

/// Errors while turning a [`ProfileConfig`](matchcue_types::ProfileConfig)
/// into a usable [`Profile`](super::Profile)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("the profile must have at least one event")]
    NoEvents,

    #[error("invalid {field}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: DurationError,
    },

    #[error("invalid {field} of event {event}")]
    InvalidEventDuration {
        event: String,
        field: &'static str,
        #[source]
        source: DurationError,
    },

    #[error("{field} cannot be negative (got {value}s)")]
    NegativeDuration { field: &'static str, value: i64 },

    #[error("interval of event {event} cannot be negative (got {value}s)")]
    NegativeInterval { event: String, value: i64 },

    #[error("event {event} repeats forever with a zero interval; set Repeats or an Interval above 0")]
    UnboundedEvent { event: String },

    #[error("event {event} has no sound effect")]
    MissingSoundEffect { event: String },
}
