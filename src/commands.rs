//! Line commands accepted by the server
//!
//! A request is a single line such as `start`, `pause` or `back30`. Parsing
//! and dispatch are kept apart so the parser can be tested without a
//! transport.

use phf::phf_map;
use thiserror::Error;
use tracing::warn;

use matchcue_core::duration::{DurationError, parse_suffix_amount};
use matchcue_core::{Cue, CueSender, LifecycleCue, Transport};

/// Shown when a request is not understood
pub const ALLOWED_COMMANDS: &str =
    "start, stop, pause, back[seconds], forward[seconds], test, shutdown";

/// A parsed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play a sound to check the audio output
    SoundCheck,
    Start,
    Stop,
    Pause,
    Shutdown,
    Back(u32),
    Forward(u32),
}

/// Commands that take no argument
static KEYWORDS: phf::Map<&'static str, Command> = phf_map! {
    "test" => Command::SoundCheck,
    "start" => Command::Start,
    "stop" => Command::Stop,
    "pause" => Command::Pause,
    "shutdown" => Command::Shutdown,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Incorrect input value for {direction} seconds: {source}")]
    InvalidAmount {
        direction: &'static str,
        #[source]
        source: DurationError,
    },

    #[error("Unknown command: {request} Allowed commands: {}", ALLOWED_COMMANDS)]
    Unknown { request: String },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let request = line.trim();

        if let Some(command) = KEYWORDS.get(request) {
            return Ok(*command);
        }

        if request.starts_with("back") {
            return parse_suffix_amount(request, "back")
                .map(Command::Back)
                .map_err(|source| CommandError::InvalidAmount {
                    direction: "backward",
                    source,
                });
        }

        if request.starts_with("forward") {
            return parse_suffix_amount(request, "forward")
                .map(Command::Forward)
                .map_err(|source| CommandError::InvalidAmount {
                    direction: "forward",
                    source,
                });
        }

        Err(CommandError::Unknown {
            request: request.to_string(),
        })
    }
}

/// Text sent back to the client, plus whether the server should exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub shutdown: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shutdown: false,
        }
    }
}

/// Run a parsed command against the transport.
pub async fn dispatch(command: Command, transport: &Transport, cues: &CueSender) -> Reply {
    match command {
        Command::SoundCheck => {
            send_cue(cues, LifecycleCue::SoundCheck).await;
            Reply::text("Test succeeded")
        }
        Command::Start => Reply::text(transport.start().await),
        Command::Stop => Reply::text(transport.stop().await),
        Command::Pause => Reply::text(
            transport
                .pause()
                .await
                .unwrap_or_else(|rejected| rejected.to_string()),
        ),
        Command::Back(seconds) => Reply::text(
            transport
                .back(seconds)
                .await
                .unwrap_or_else(|rejected| rejected.to_string()),
        ),
        Command::Forward(seconds) => Reply::text(
            transport
                .forward(seconds)
                .await
                .unwrap_or_else(|rejected| rejected.to_string()),
        ),
        Command::Shutdown => {
            send_cue(cues, LifecycleCue::ServerShuttingDown).await;
            Reply {
                text: "Server shutting down. gg wp".to_string(),
                shutdown: true,
            }
        }
    }
}

/// Parse and dispatch one request line.
pub async fn respond(line: &str, transport: &Transport, cues: &CueSender) -> Reply {
    match Command::parse(line) {
        Ok(command) => dispatch(command, transport, cues).await,
        Err(err) => Reply::text(err.to_string()),
    }
}

async fn send_cue(cues: &CueSender, cue: LifecycleCue) {
    if let Err(err) = cues.send(Cue::from(cue)).await {
        warn!(cue = %err.0, "Cue sink is gone, cue dropped");
    }
}
