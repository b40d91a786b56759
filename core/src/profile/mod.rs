//! Match profiles
//!
//! A profile is the validated, whole-second version of one entry of the
//! config file's `Profiles` map. It is the only input of the timeline builder.

mod definition;
mod error;

pub use definition::{Event, Profile};
pub use error::ProfileError;
