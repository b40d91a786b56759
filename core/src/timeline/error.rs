//! Error types for timeline building

use thiserror::Error;

use crate::profile::ProfileError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("invalid profile")]
    Profile(#[from] ProfileError),

    #[error("profile expands to more than {limit} occurrences")]
    TooManyOccurrences { limit: usize },

    #[error("occurrences could not be spaced apart after {shifts} shifts (last moved: {name} at {happens_at}s)")]
    Unresolvable {
        shifts: usize,
        name: String,
        happens_at: i64,
    },
}
