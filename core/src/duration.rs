//! Whole-second durations as written by humans
//!
//! Config files and seek commands use short duration strings such as `90`,
//! `1m30s` or `-20s`. Everything downstream works in whole seconds (`i64`).

use thiserror::Error;

/// Smallest amount accepted by `back`/`forward`
pub const MIN_SEEK_SECONDS: i64 = 1;

/// Largest amount accepted by `back`/`forward` (half an hour)
pub const MAX_SEEK_SECONDS: i64 = 1800;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Errors while turning text into seconds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("invalid duration \"{input}\"")]
    Invalid { input: String },

    #[error("missing unit in duration \"{input}\"")]
    MissingUnit { input: String },

    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit { input: String, unit: String },

    #[error("duration \"{input}\" is out of range")]
    OutOfRange { input: String },

    #[error("prefix {prefix} is missing")]
    MissingPrefix { prefix: String },

    #[error("the amount cannot be less than {min}")]
    AmountTooSmall { min: i64 },

    #[error("the amount cannot be larger than {max}")]
    AmountTooLarge { max: i64 },
}

/// Parse a duration string into whole seconds.
///
/// A bare integer is taken as seconds. Anything else is an optionally signed
/// sequence of `<number><unit>` pairs where the number may carry a fraction
/// and the unit is one of `h`, `m`, `s`, `ms`, `us` (`µs`) or `ns`.
/// Sub-second remainders are truncated toward zero.
pub fn parse_seconds(input: &str) -> Result<i64, DurationError> {
    let text = input.trim();
    if let Ok(seconds) = text.parse::<i64>() {
        return Ok(seconds);
    }

    let invalid = || DurationError::Invalid {
        input: input.to_string(),
    };

    let (negative, mut rest) = if let Some(stripped) = text.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = text.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, text)
    };

    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: i128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid());
        }
        let number = &rest[..number_len];
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let unit_nanos: i128 = match unit {
            "h" => 3600 * NANOS_PER_SECOND,
            "m" => 60 * NANOS_PER_SECOND,
            "s" => NANOS_PER_SECOND,
            "ms" => 1_000_000,
            "us" | "µs" | "μs" => 1_000,
            "ns" => 1,
            "" => {
                return Err(DurationError::MissingUnit {
                    input: input.to_string(),
                });
            }
            other => {
                return Err(DurationError::UnknownUnit {
                    input: input.to_string(),
                    unit: other.to_string(),
                });
            }
        };

        let component = component_nanos(number, unit_nanos).ok_or_else(invalid)?;
        total_nanos = total_nanos
            .checked_add(component)
            .ok_or_else(|| DurationError::OutOfRange {
                input: input.to_string(),
            })?;
    }

    let seconds = i64::try_from(total_nanos / NANOS_PER_SECOND).map_err(|_| {
        DurationError::OutOfRange {
            input: input.to_string(),
        }
    })?;

    Ok(if negative { -seconds } else { seconds })
}

/// `number` is `digits[.digits]`; returns its value scaled by `unit_nanos`
fn component_nanos(number: &str, unit_nanos: i128) -> Option<i128> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.contains('.') {
        return None;
    }

    let whole_value: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let mut nanos = whole_value.checked_mul(unit_nanos)?;

    // Digits beyond nanosecond precision cannot change the result
    let fraction = &fraction[..fraction.len().min(18)];
    if !fraction.is_empty() {
        let fraction_value: i128 = fraction.parse().ok()?;
        let scale = 10i128.checked_pow(fraction.len() as u32)?;
        nanos = nanos.checked_add(fraction_value.checked_mul(unit_nanos)? / scale)?;
    }

    Some(nanos)
}

/// Format seconds as `hh:mm:ss` (e.g. 4374 → `01:12:54`, -1 → `-00:00:01`).
///
/// Hours wrap at 24.
pub fn format_clock(seconds: i64) -> String {
    let prefix = if seconds < 0 { "-" } else { "" };
    let hours = (seconds / 3600 % 24).abs();
    let minutes = (seconds / 60 % 60).abs();
    let secs = (seconds % 60).abs();
    format!("{prefix}{hours:02}:{minutes:02}:{secs:02}")
}

/// Parse the amount following a command word, e.g. `back30` or `forward1m`.
///
/// The bare command word means one second. Amounts are bounded by
/// [`MIN_SEEK_SECONDS`] and [`MAX_SEEK_SECONDS`].
pub fn parse_suffix_amount(text: &str, prefix: &str) -> Result<u32, DurationError> {
    let Some(suffix) = text.strip_prefix(prefix) else {
        return Err(DurationError::MissingPrefix {
            prefix: prefix.to_string(),
        });
    };
    if suffix.is_empty() {
        return Ok(MIN_SEEK_SECONDS as u32);
    }

    let amount = parse_seconds(suffix)?;
    if amount < MIN_SEEK_SECONDS {
        return Err(DurationError::AmountTooSmall {
            min: MIN_SEEK_SECONDS,
        });
    }
    if amount > MAX_SEEK_SECONDS {
        return Err(DurationError::AmountTooLarge {
            max: MAX_SEEK_SECONDS,
        });
    }
    Ok(amount as u32)
}
