//! The transport: clock, state machine and 1 Hz ticker
//!
//! Every operation, including each tick, runs with the clock lock held from
//! start to finish. Cues are sent while the lock is held, so a sink that stops
//! receiving also stops the clock and every control operation that emits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::cue::{Cue, CueSender, LifecycleCue};
use super::error::TransportError;
use super::state::{Clock, TransportSnapshot, TransportState};
use crate::duration::format_clock;
use crate::profile::Profile;
use crate::timeline::Timeline;

/// Time between two ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Game time is logged every this many ticks
const GAME_TIME_LOG_EVERY: i64 = 5;

/// Shared handle to the match transport.
///
/// Cloning is cheap; all clones drive the same clock.
#[derive(Clone)]
pub struct Transport {
    clock: Arc<Mutex<Clock>>,
    timeline: Arc<Timeline>,
    countdown: i64,
    match_length: i64,
    cues: CueSender,
}

impl Transport {
    /// Create a stopped transport for an activated profile.
    pub fn new(profile: &Profile, timeline: Timeline, cues: CueSender) -> Self {
        Self {
            clock: Arc::new(Mutex::new(Clock::default())),
            timeline: Arc::new(timeline),
            countdown: profile.countdown,
            match_length: profile.match_length,
            cues,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub async fn snapshot(&self) -> TransportSnapshot {
        let clock = self.clock.lock().await;
        TransportSnapshot {
            state: clock.state,
            seconds_from_start: clock.seconds_from_start,
            game_time: clock.seconds_from_start - self.countdown,
        }
    }

    // ─── Control Operations ─────────────────────────────────────────────────

    /// Rewind to the beginning of the countdown and run.
    pub async fn start(&self) -> String {
        let mut clock = self.clock.lock().await;

        let (cue, verb) = if clock.state == TransportState::Stopped {
            (LifecycleCue::Started, "started")
        } else {
            (LifecycleCue::Restarted, "restarted")
        };
        clock.state = TransportState::Running;
        clock.seconds_from_start = 0;
        info!(game_time = %self.game_time(0), "Transport {verb}");

        self.emit(cue.into()).await;
        format!("Transport {verb}. {}", self.game_time_label(0))
    }

    /// Stop the transport; it can only be started again from the top.
    pub async fn stop(&self) -> String {
        let mut clock = self.clock.lock().await;

        if clock.state == TransportState::Stopped {
            return "Transport is already stopped".to_string();
        }
        clock.state = TransportState::Stopped;
        info!(game_time = %self.game_time(clock.seconds_from_start), "Transport stopped");

        self.emit(LifecycleCue::Stopped.into()).await;
        format!("Transport stopped. {}", self.game_time_label(clock.seconds_from_start))
    }

    /// Pause a running transport or resume a paused one.
    pub async fn pause(&self) -> Result<String, TransportError> {
        let mut clock = self.clock.lock().await;

        let (next, cue, verb) = match clock.state {
            TransportState::Running => (TransportState::Paused, LifecycleCue::Paused, "paused"),
            TransportState::Paused => (TransportState::Running, LifecycleCue::Resumed, "resumed"),
            TransportState::Stopped => {
                return Err(TransportError::CannotPause { state: clock.state });
            }
        };
        clock.state = next;
        info!(game_time = %self.game_time(clock.seconds_from_start), "Transport {verb}");

        self.emit(cue.into()).await;
        Ok(format!(
            "Transport {verb}. {}",
            self.game_time_label(clock.seconds_from_start)
        ))
    }

    /// Move the clock back, never before the start of the countdown.
    pub async fn back(&self, seconds: u32) -> Result<String, TransportError> {
        let mut clock = self.clock.lock().await;

        if clock.state != TransportState::Running {
            return Err(TransportError::CannotRollBackward { state: clock.state });
        }
        let target = (clock.seconds_from_start - i64::from(seconds)).max(0);
        let moved = clock.seconds_from_start - target;
        clock.seconds_from_start = target;
        info!(moved, game_time = %self.game_time(target), "Transport rolled backward");

        self.emit(LifecycleCue::RolledBackward.into()).await;
        Ok(format!(
            "Transport rolled backward by {moved} seconds. {}",
            self.game_time_label(target)
        ))
    }

    /// Move the clock forward. Occurrences skipped over are not played.
    pub async fn forward(&self, seconds: u32) -> Result<String, TransportError> {
        let mut clock = self.clock.lock().await;

        if clock.state != TransportState::Running {
            return Err(TransportError::CannotRollForward { state: clock.state });
        }
        clock.seconds_from_start += i64::from(seconds);
        let now = clock.seconds_from_start;
        info!(moved = seconds, game_time = %self.game_time(now), "Transport rolled forward");

        self.emit(LifecycleCue::RolledForward.into()).await;
        Ok(format!(
            "Transport rolled forward by {seconds} seconds. {}",
            self.game_time_label(now)
        ))
    }

    // ─── Ticker ─────────────────────────────────────────────────────────────

    /// Advance the clock by one second if running.
    ///
    /// Plays the occurrence due at the current second (if any) before the
    /// clock moves on, and stops the transport once the match length is
    /// reached. The automatic stop emits no cue.
    pub async fn tick(&self) {
        let mut clock = self.clock.lock().await;
        if clock.state != TransportState::Running {
            return;
        }

        let now = clock.seconds_from_start;
        if now.rem_euclid(GAME_TIME_LOG_EVERY) == 0 {
            debug!(game_time = %self.game_time(now), "Tick");
        }

        if let Some(occurrence) = self.timeline.due_at(now) {
            info!(
                event = %occurrence.name,
                game_time = %self.game_time(now),
                "Timeline event"
            );
            self.emit(Cue::from(occurrence)).await;
        }

        if now - self.countdown >= self.match_length {
            clock.state = TransportState::Stopped;
            info!(
                game_time = %self.game_time(now),
                "Match length reached, transport stopped automatically"
            );
        }

        clock.seconds_from_start += 1;
    }

    /// Spawn the ticker task. It runs for as long as the runtime does,
    /// idling while the transport is not running.
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let transport = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                transport.tick().await;
            }
        })
    }

    // ─── Helpers ────────────────────────────────────────────────────────────

    async fn emit(&self, cue: Cue) {
        debug!(cue = %cue, "Emitting cue");
        if let Err(err) = self.cues.send(cue).await {
            warn!(cue = %err.0, "Cue sink is gone, cue dropped");
        }
    }

    fn game_time(&self, seconds_from_start: i64) -> String {
        format_clock(seconds_from_start - self.countdown)
    }

    fn game_time_label(&self, seconds_from_start: i64) -> String {
        format!("GameTime: {}", self.game_time(seconds_from_start))
    }
}
