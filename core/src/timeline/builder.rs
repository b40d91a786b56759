//! Timeline construction
//!
//! Building happens in three passes:
//! 1. **Expand** every event into absolute occurrences
//! 2. **Space out** occurrences closer than [`MIN_SPACING_SECS`]
//! 3. **Sort** by the adjusted time

use std::fmt;

use tracing::debug;

use super::error::TimelineError;
use crate::duration::format_clock;
use crate::profile::Profile;

/// Two cues closer than this would talk over each other
pub const MIN_SPACING_SECS: i64 = 2;

/// Upper bound on the number of expanded occurrences
pub const MAX_OCCURRENCES: usize = 10_000;

/// Extra shifts allowed per occurrence on top of the quadratic allowance
pub const SHIFT_BUDGET_PER_OCCURRENCE: usize = 64;

/// One concrete moment at which an event's sound effect is due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Event name from the profile
    pub name: String,
    /// Seconds after `start`, countdown included
    pub happens_at: i64,
    pub sound_effect: String,
}

/// Ordered, conflict-free list of occurrences for one profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    occurrences: Vec<Occurrence>,
    countdown: i64,
}

impl Timeline {
    /// Build the timeline for a profile.
    pub fn build(profile: &Profile) -> Result<Self, TimelineError> {
        profile.validate()?;

        let mut occurrences = expand(profile)?;
        occurrences.sort_by_key(|occurrence| occurrence.happens_at);

        let shifts = resolve_conflicts(&mut occurrences)?;
        occurrences.sort_by_key(|occurrence| occurrence.happens_at);

        debug!(
            occurrences = occurrences.len(),
            shifts, "Timeline built"
        );

        Ok(Self {
            occurrences,
            countdown: profile.countdown,
        })
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Earliest occurrence at or after `second`
    pub fn next_from(&self, second: i64) -> Option<&Occurrence> {
        let index = self
            .occurrences
            .partition_point(|occurrence| occurrence.happens_at < second);
        self.occurrences.get(index)
    }

    /// The occurrence due exactly at `second`, if any
    pub fn due_at(&self, second: i64) -> Option<&Occurrence> {
        self.next_from(second)
            .filter(|occurrence| occurrence.happens_at == second)
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for occurrence in &self.occurrences {
            writeln!(
                f,
                "Happens at: {} Name: {} SoundEffect: {}",
                format_clock(occurrence.happens_at - self.countdown),
                occurrence.name,
                occurrence.sound_effect
            )?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Passes
// ═══════════════════════════════════════════════════════════════════════════

/// Every occurrence of every event, in event-name order.
///
/// An event stops at its repeat count or at the first occurrence past the
/// match length, whichever comes first.
fn expand(profile: &Profile) -> Result<Vec<Occurrence>, TimelineError> {
    let base = profile.countdown.saturating_add(profile.global_offset);
    let mut occurrences = Vec::new();

    for (name, event) in &profile.events {
        let first = base
            .saturating_add(event.offset)
            .saturating_add(event.first_happens_at);

        let mut occurred: u32 = 0;
        loop {
            if !event.is_unbounded() && occurred == event.repeats {
                break;
            }

            let happens_at =
                first.saturating_add(event.interval.saturating_mul(i64::from(occurred)));
            if happens_at > profile.match_length {
                break;
            }

            if occurrences.len() >= MAX_OCCURRENCES {
                return Err(TimelineError::TooManyOccurrences {
                    limit: MAX_OCCURRENCES,
                });
            }
            occurrences.push(Occurrence {
                name: name.clone(),
                happens_at,
                sound_effect: event.sound_effect.clone(),
            });

            occurred = occurred.saturating_add(1);
        }
    }

    Ok(occurrences)
}

/// Shifts allowed for `len` occurrences before spacing is abandoned.
///
/// A cluster of `n` occurrences on the same second needs `n * (n - 1) / 2`
/// shifts, so the allowance grows with the square of the length.
pub(crate) fn shift_budget(len: usize) -> usize {
    len.saturating_mul(len.saturating_add(SHIFT_BUDGET_PER_OCCURRENCE))
}

/// Move occurrences until no two are closer than [`MIN_SPACING_SECS`].
///
/// Indices are visited in order. When index `i` collides with an earlier
/// index `j`, `i` moves 2 seconds (earlier if its time is above 2, later
/// otherwise), then everything from `j` onwards is visited again before the
/// walk continues after `i`. The stack holds the index each pending walk
/// resumes at; the top is always the innermost walk.
///
/// Returns the number of shifts applied.
pub(crate) fn resolve_conflicts(occurrences: &mut [Occurrence]) -> Result<usize, TimelineError> {
    let budget = shift_budget(occurrences.len());
    let mut shifts = 0;
    let mut pending = vec![0usize];

    while let Some(index) = pending.pop() {
        if index >= occurrences.len() {
            continue;
        }
        pending.push(index + 1);

        let current = occurrences[index].happens_at;
        let conflict = occurrences[..index]
            .iter()
            .position(|earlier| {
                earlier.happens_at.abs_diff(current) < MIN_SPACING_SECS.unsigned_abs()
            });

        if let Some(earlier) = conflict {
            let moved = if current > MIN_SPACING_SECS {
                current - MIN_SPACING_SECS
            } else {
                current + MIN_SPACING_SECS
            };
            occurrences[index].happens_at = moved;

            shifts += 1;
            if shifts > budget {
                return Err(TimelineError::Unresolvable {
                    shifts,
                    name: occurrences[index].name.clone(),
                    happens_at: moved,
                });
            }

            pending.push(earlier);
        }
    }

    Ok(shifts)
}
