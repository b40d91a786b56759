//! Tests for timeline expansion and conflict spacing
//!
//! Verifies that:
//! - Events expand to the right absolute seconds
//! - Repeats and match length bound the expansion
//! - Colliding occurrences are spaced out the expected way

use std::collections::BTreeMap;

use crate::profile::{Event, Profile, ProfileError};

use super::builder::{resolve_conflicts, shift_budget};
use super::{MIN_SPACING_SECS, Occurrence, Timeline, TimelineError};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn event(first_happens_at: i64, interval: i64, repeats: u32, sound: &str) -> Event {
    Event {
        offset: 0,
        first_happens_at,
        interval,
        repeats,
        sound_effect: sound.to_string(),
    }
}

fn make_profile(match_length: i64, countdown: i64, events: Vec<(&str, Event)>) -> Profile {
    Profile {
        global_offset: 0,
        match_length,
        countdown,
        events: events
            .into_iter()
            .map(|(name, ev)| (name.to_string(), ev))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn times(timeline: &Timeline) -> Vec<i64> {
    timeline
        .occurrences()
        .iter()
        .map(|occurrence| occurrence.happens_at)
        .collect()
}

fn assert_spaced(occurrences: &[Occurrence]) {
    for (i, a) in occurrences.iter().enumerate() {
        for b in &occurrences[i + 1..] {
            assert!(
                (a.happens_at - b.happens_at).abs() >= MIN_SPACING_SECS,
                "{} at {} and {} at {} are too close",
                a.name,
                a.happens_at,
                b.name,
                b.happens_at
            );
        }
    }
}

fn assert_sorted(occurrences: &[Occurrence]) {
    assert!(
        occurrences
            .windows(2)
            .all(|pair| pair[0].happens_at <= pair[1].happens_at),
        "timeline is not sorted"
    );
}

/// Small deterministic generator so the property tests need no extra crates
struct Lcg(u64);

impl Lcg {
    fn next_in(&mut self, low: i64, high: i64) -> i64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        low + ((self.0 >> 33) as i64).rem_euclid(high - low + 1)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Expansion
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_event_expands_to_repeats() {
    let profile = make_profile(100, 0, vec![("x", event(0, 10, 3, "x"))]);
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![0, 10, 20]);
    assert!(timeline.occurrences().iter().all(|o| o.sound_effect == "x"));
}

#[test]
fn test_repeats_truncated_by_match_length() {
    let profile = make_profile(100, 0, vec![("x", event(0, 30, 5, "x"))]);
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![0, 30, 60, 90]);
}

#[test]
fn test_unbounded_event_runs_until_match_length() {
    let profile = make_profile(100, 0, vec![("x", event(0, 25, 0, "x"))]);
    let timeline = Timeline::build(&profile).expect("build");

    // An occurrence exactly at the match length still happens
    assert_eq!(times(&timeline), vec![0, 25, 50, 75, 100]);
}

#[test]
fn test_offsets_and_countdown_are_added() {
    let mut runes = event(360, 120, 2, "runes");
    runes.offset = -20;
    let mut profile = make_profile(3600, 90, vec![("runes", runes)]);
    profile.global_offset = 5;

    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![435, 555]);
}

#[test]
fn test_repeat_counts_per_event() {
    let profile = make_profile(
        10_000,
        0,
        vec![
            ("a", event(3, 100, 4, "a")),
            ("b", event(51, 100, 7, "b")),
            ("c", event(77, 100, 1, "c")),
        ],
    );
    let timeline = Timeline::build(&profile).expect("build");

    let count = |name: &str| {
        timeline
            .occurrences()
            .iter()
            .filter(|o| o.name == name)
            .count()
    };
    assert_eq!(count("a"), 4);
    assert_eq!(count("b"), 7);
    assert_eq!(count("c"), 1);
}

#[test]
fn test_unbounded_zero_interval_is_rejected() {
    let profile = make_profile(100, 0, vec![("loop", event(0, 0, 0, "x"))]);
    assert_eq!(
        Timeline::build(&profile),
        Err(TimelineError::Profile(ProfileError::UnboundedEvent {
            event: "loop".to_string()
        }))
    );
}

#[test]
fn test_expansion_is_capped() {
    let profile = make_profile(10, 0, vec![("burst", event(0, 0, u32::MAX, "x"))]);
    assert_eq!(
        Timeline::build(&profile),
        Err(TimelineError::TooManyOccurrences {
            limit: super::MAX_OCCURRENCES
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Conflict Spacing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_second_moves_later_one_back() {
    let profile = make_profile(
        100,
        0,
        vec![("alpha", event(50, 0, 1, "a")), ("beta", event(50, 0, 1, "b"))],
    );
    let timeline = Timeline::build(&profile).expect("build");

    let got: Vec<(&str, i64)> = timeline
        .occurrences()
        .iter()
        .map(|o| (o.name.as_str(), o.happens_at))
        .collect();
    assert_eq!(got, vec![("beta", 48), ("alpha", 50)]);
    assert_spaced(timeline.occurrences());
}

#[test]
fn test_exactly_two_seconds_apart_is_untouched() {
    let profile = make_profile(
        100,
        0,
        vec![("a", event(10, 0, 1, "a")), ("b", event(12, 0, 1, "b"))],
    );
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![10, 12]);
}

#[test]
fn test_conflict_near_zero_moves_forward() {
    let profile = make_profile(
        100,
        0,
        vec![("a", event(0, 0, 1, "a")), ("b", event(1, 0, 1, "b"))],
    );
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![0, 3]);
}

#[test]
fn test_cascading_conflicts_are_resolved() {
    let profile = make_profile(
        100,
        0,
        vec![
            ("a", event(50, 0, 1, "a")),
            ("b", event(50, 0, 1, "b")),
            ("c", event(50, 0, 1, "c")),
        ],
    );
    let timeline = Timeline::build(&profile).expect("build");

    let got: Vec<(&str, i64)> = timeline
        .occurrences()
        .iter()
        .map(|o| (o.name.as_str(), o.happens_at))
        .collect();
    assert_eq!(got, vec![("c", 46), ("b", 48), ("a", 50)]);
}

#[test]
fn test_shift_into_middle_is_rechecked() {
    // b collides with a and moves onto c's neighbourhood
    let profile = make_profile(
        100,
        0,
        vec![
            ("a", event(20, 0, 1, "a")),
            ("b", event(21, 0, 1, "b")),
            ("c", event(18, 0, 1, "c")),
        ],
    );
    let timeline = Timeline::build(&profile).expect("build");

    assert_spaced(timeline.occurrences());
    assert_sorted(timeline.occurrences());
    assert_eq!(timeline.len(), 3);
}

#[test]
fn test_oscillating_conflict_is_unresolvable() {
    // 3 moves to 1, which collides with 2 and moves back to 3, forever
    let profile = make_profile(
        100,
        0,
        vec![("a", event(2, 0, 1, "a")), ("b", event(3, 0, 1, "b"))],
    );
    match Timeline::build(&profile) {
        Err(TimelineError::Unresolvable { shifts, name, .. }) => {
            assert_eq!(shifts, shift_budget(2) + 1);
            assert_eq!(name, "b");
        }
        other => panic!("expected Unresolvable, got {other:?}"),
    }
}

#[test]
fn test_large_same_second_cluster_spreads_downward() {
    let events: Vec<(String, Event)> = (0..140)
        .map(|i| (format!("e{i:03}"), event(5000, 0, 1, "x")))
        .collect();
    let profile = make_profile(
        10_000,
        0,
        events.iter().map(|(name, e)| (name.as_str(), e.clone())).collect(),
    );

    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(timeline.len(), 140);
    assert_spaced(timeline.occurrences());
    assert_sorted(timeline.occurrences());
    let expected: Vec<i64> = (0..140).map(|k| 5000 - 2 * (139 - k)).collect();
    assert_eq!(times(&timeline), expected);
}

#[test]
fn test_cluster_shift_count_is_quadratic() {
    let mut occurrences: Vec<Occurrence> = (0..140)
        .map(|i| Occurrence {
            name: format!("e{i:03}"),
            happens_at: 5000,
            sound_effect: "x".to_string(),
        })
        .collect();

    let shifts = resolve_conflicts(&mut occurrences).expect("resolve");

    assert_eq!(shifts, 140 * 139 / 2);
    assert!(shifts <= shift_budget(140));
}

#[test]
fn test_extreme_times_do_not_overflow() {
    let low = Event {
        offset: i64::MIN,
        ..event(0, 0, 1, "low")
    };
    let high = event(i64::MAX, 0, 1, "high");
    let profile = make_profile(i64::MAX, 0, vec![("a", low), ("b", high)]);

    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(times(&timeline), vec![i64::MIN, i64::MAX]);
}

#[test]
fn test_spacing_is_idempotent() {
    let profile = make_profile(
        600,
        90,
        vec![
            ("a", event(0, 30, 0, "a")),
            ("b", event(1, 45, 0, "b")),
            ("c", event(0, 60, 0, "c")),
        ],
    );
    let timeline = Timeline::build(&profile).expect("build");

    let mut again = timeline.occurrences().to_vec();
    assert_eq!(resolve_conflicts(&mut again), Ok(0));
    assert_eq!(again, timeline.occurrences());
}

#[test]
fn test_random_profiles_are_spaced_and_sorted() {
    let mut rng = Lcg(0x5eed);

    for _ in 0..200 {
        let events = (0..rng.next_in(1, 4))
            .map(|i| {
                let mut ev = event(
                    rng.next_in(0, 120),
                    rng.next_in(30, 150),
                    rng.next_in(0, 8) as u32,
                    "fx",
                );
                ev.offset = rng.next_in(-30, 0);
                (format!("event{i}"), ev)
            })
            .collect::<Vec<_>>();
        let profile = Profile {
            global_offset: 0,
            match_length: 900,
            countdown: 90,
            events: events.into_iter().collect(),
        };

        let timeline = Timeline::build(&profile).expect("build");
        assert_spaced(timeline.occurrences());
        assert_sorted(timeline.occurrences());

        let mut again = timeline.occurrences().to_vec();
        assert_eq!(resolve_conflicts(&mut again), Ok(0));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Lookup & Display
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_next_from_and_due_at() {
    let profile = make_profile(100, 0, vec![("x", event(0, 10, 3, "x"))]);
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(timeline.next_from(0).map(|o| o.happens_at), Some(0));
    assert_eq!(timeline.next_from(1).map(|o| o.happens_at), Some(10));
    assert_eq!(timeline.next_from(20).map(|o| o.happens_at), Some(20));
    assert!(timeline.next_from(21).is_none());

    assert!(timeline.due_at(10).is_some());
    assert!(timeline.due_at(11).is_none());
}

#[test]
fn test_display_uses_game_time() {
    let profile = make_profile(1000, 90, vec![("Horn", event(0, 0, 1, "horn"))]);
    let timeline = Timeline::build(&profile).expect("build");

    assert_eq!(
        timeline.to_string(),
        "Happens at: 00:00:00 Name: Horn SoundEffect: horn\n"
    );
}
