//! Match transport
//!
//! This module provides:
//! - **Transport**: the match clock with start/stop/pause/back/forward
//! - **Ticker**: the 1 Hz task that advances the clock and plays due occurrences
//! - **Cues**: what the transport hands to the playback sink
//!
//! # States
//!
//! ```text
//! stopped ──start──► running ◄──pause──► paused
//!    ▲                  │                   │
//!    └──stop / match end┴───────stop────────┘
//! ```
//!
//! `start` is accepted in every state and always rewinds to the beginning of
//! the countdown.

mod cue;
mod error;
mod machine;
mod state;


pub use cue::{CUE_CHANNEL_CAPACITY, Cue, CueReceiver, CueSender, LifecycleCue, cue_channel};
pub use error::TransportError;
pub use machine::{TICK_PERIOD, Transport};
pub use state::{TransportSnapshot, TransportState};
