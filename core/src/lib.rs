pub mod config;
pub mod duration;
pub mod profile;
pub mod timeline;
pub mod transport;

// Re-exports for convenience
pub use config::{ConfigError, MatchCueConfig, MatchCueConfigExt};
pub use duration::{format_clock, parse_seconds, parse_suffix_amount};
pub use profile::{Event, Profile, ProfileError};
pub use timeline::{Occurrence, Timeline, TimelineError};
pub use transport::{
    Cue, CueReceiver, CueSender, LifecycleCue, Transport, TransportError, TransportSnapshot,
    TransportState, cue_channel,
};
