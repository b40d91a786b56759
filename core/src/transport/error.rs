//! Rejected transport operations

use thiserror::Error;

use super::state::TransportState;

/// A control operation whose precondition does not hold.
///
/// Rejections never change state or emit a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("The transport cannot be paused/unpaused in the {state} state")]
    CannotPause { state: TransportState },

    #[error("The transport cannot be rolled backward in the {state} state")]
    CannotRollBackward { state: TransportState },

    #[error("The transport cannot be rolled forward in the {state} state")]
    CannotRollForward { state: TransportState },
}
