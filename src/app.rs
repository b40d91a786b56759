//! Server-mode startup: config, timeline, audio, transport and listener

use std::path::PathBuf;

use tracing::{debug, info};

use matchcue_core::{
    LifecycleCue, MatchCueConfig, MatchCueConfigExt, Timeline, Transport, cue_channel,
};

use crate::audio::{AudioService, default_sounds_dir};
use crate::error::AppError;
use crate::server::Server;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub config_file: Option<PathBuf>,
    pub profile: String,
    pub port: u16,
}

/// Load the profile, start every background task and serve until shutdown.
pub async fn run_server(options: ServerOptions) -> Result<(), AppError> {
    let config = MatchCueConfig::load_from(options.config_file.as_deref())?;
    let profile = config.activate_profile(&options.profile)?;
    info!(
        profile = %options.profile,
        events = profile.events.len(),
        match_length = profile.match_length,
        countdown = profile.countdown,
        "Profile activated"
    );

    let timeline = Timeline::build(&profile)?;
    info!(occurrences = timeline.len(), "Timeline built");
    debug!("Timeline:\n{timeline}");

    let sounds_dir = config
        .audio
        .sounds_dir
        .as_deref()
        .map(PathBuf::from)
        .or_else(default_sounds_dir)
        .unwrap_or_else(|| PathBuf::from("sounds"));

    let (cue_tx, cue_rx) = cue_channel();
    let mut audio = AudioService::new(cue_rx, config.audio.clone(), sounds_dir);
    let lifecycle = LifecycleCue::ALL.iter().map(|cue| cue.sound_name());
    audio.check_sounds(profile.sound_effects().into_iter().chain(lifecycle));
    tokio::spawn(audio.run());

    let transport = Transport::new(&profile, timeline, cue_tx.clone());
    transport.spawn_ticker();

    let server = Server::bind(options.port, transport, cue_tx).await?;
    server.run().await?;
    Ok(())
}
