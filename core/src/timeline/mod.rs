//! Timeline of announced moments
//!
//! This module provides:
//! - **Occurrences**: one event instance at an absolute second
//! - **Timeline**: every occurrence of a profile, spaced at least
//!   [`MIN_SPACING_SECS`] apart and sorted by time
//!
//! The timeline is built once per profile activation and only read after that.

mod builder;
mod error;

#[cfg(test)]
mod builder_tests;

pub use builder::{MAX_OCCURRENCES, MIN_SPACING_SECS, Occurrence, Timeline};
pub use error::TimelineError;
