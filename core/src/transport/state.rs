//! Transport state register

use std::fmt;

/// Where the transport is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportState::Stopped => "stopped",
            TransportState::Running => "running",
            TransportState::Paused => "paused",
        })
    }
}

/// The lock-guarded part of the transport
#[derive(Debug, Default)]
pub(crate) struct Clock {
    pub(crate) state: TransportState,
    /// Seconds since the last `start`, countdown included
    pub(crate) seconds_from_start: i64,
}

/// Point-in-time copy of the transport, for status replies and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSnapshot {
    pub state: TransportState,
    pub seconds_from_start: i64,
    /// `seconds_from_start - countdown`
    pub game_time: i64,
}
