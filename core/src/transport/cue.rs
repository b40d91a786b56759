//! Cues delivered from the transport to the playback sink

use std::fmt;

use tokio::sync::mpsc;

use crate::timeline::Occurrence;

/// Channel capacity for cue delivery.
///
/// A send waits until the sink has taken the previous cue, so a slow sink
/// holds back the clock instead of cues being dropped.
pub const CUE_CHANNEL_CAPACITY: usize = 1;

/// Sender half handed to the transport (and the server for its own cues)
pub type CueSender = mpsc::Sender<Cue>;

/// Receiver half owned by the playback sink
pub type CueReceiver = mpsc::Receiver<Cue>;

/// Create the cue channel shared by the transport, the server and the sink
pub fn cue_channel() -> (CueSender, CueReceiver) {
    mpsc::channel(CUE_CHANNEL_CAPACITY)
}

/// Built-in cues announcing transport and server state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleCue {
    Started,
    Restarted,
    Stopped,
    Paused,
    Resumed,
    RolledBackward,
    RolledForward,
    ServerOnline,
    ServerShuttingDown,
    SoundCheck,
}

impl LifecycleCue {
    pub const ALL: [LifecycleCue; 10] = [
        LifecycleCue::Started,
        LifecycleCue::Restarted,
        LifecycleCue::Stopped,
        LifecycleCue::Paused,
        LifecycleCue::Resumed,
        LifecycleCue::RolledBackward,
        LifecycleCue::RolledForward,
        LifecycleCue::ServerOnline,
        LifecycleCue::ServerShuttingDown,
        LifecycleCue::SoundCheck,
    ];

    /// Sound name the sink resolves to a file
    pub fn sound_name(self) -> &'static str {
        match self {
            LifecycleCue::Started => "scheduler_started",
            LifecycleCue::Restarted => "scheduler_restarted",
            LifecycleCue::Stopped => "scheduler_stopped",
            LifecycleCue::Paused => "scheduler_paused",
            LifecycleCue::Resumed => "scheduler_resumed",
            LifecycleCue::RolledBackward => "scheduler_rolled_backward",
            LifecycleCue::RolledForward => "scheduler_rolled_forward",
            LifecycleCue::ServerOnline => "matchcue_server_is_online",
            LifecycleCue::ServerShuttingDown => "matchcue_server_is_shutting_down",
            LifecycleCue::SoundCheck => "sound_check",
        }
    }
}

/// A sound the sink should play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Lifecycle(LifecycleCue),
    /// A timeline occurrence that is due now
    Event { name: String, sound_effect: String },
}

impl Cue {
    pub fn sound_name(&self) -> &str {
        match self {
            Cue::Lifecycle(cue) => cue.sound_name(),
            Cue::Event { sound_effect, .. } => sound_effect,
        }
    }
}

impl From<LifecycleCue> for Cue {
    fn from(cue: LifecycleCue) -> Self {
        Cue::Lifecycle(cue)
    }
}

impl From<&Occurrence> for Cue {
    fn from(occurrence: &Occurrence) -> Self {
        Cue::Event {
            name: occurrence.name.clone(),
            sound_effect: occurrence.sound_effect.clone(),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Lifecycle(cue) => f.write_str(cue.sound_name()),
            Cue::Event { name, sound_effect } => write!(f, "{name} ({sound_effect})"),
        }
    }
}
