/*!
 * Millisecond time labels (`HH:MM:SS.mmm` / `HH:MM:SS,mmm`) for documents
 * that are not frame-based.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::TimecodeError;

static GENERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})(?:[.,](\d{1,3}))?$").expect("Invalid time label regex")
});

/// Separator between seconds and milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenericSeparator {
    /// `00:00:01.500`
    #[default]
    Dot,
    /// `00:00:01,500` (SRT style)
    Comma,
}

impl GenericSeparator {
    pub fn as_char(self) -> char {
        match self {
            GenericSeparator::Dot => '.',
            GenericSeparator::Comma => ',',
        }
    }
}

/// Parse `H:MM:SS`, `HH:MM:SS.m`, `HH:MM:SS,mmm` and similar into seconds
pub fn generic_to_seconds(label: &str) -> Result<f64, TimecodeError> {
    let captures = GENERIC_REGEX
        .captures(label.trim())
        .ok_or_else(|| TimecodeError::MalformedGeneric(label.to_string()))?;

    let number = |index: usize| -> Result<u64, TimecodeError> {
        captures[index]
            .parse::<u64>()
            .map_err(|_| TimecodeError::MalformedGeneric(label.to_string()))
    };

    let hours = number(1)?;
    let minutes = number(2)?;
    let seconds = number(3)?;

    if minutes >= 60 {
        return Err(TimecodeError::FieldOutOfRange {
            label: label.to_string(),
            field: "minutes",
            value: minutes as u32,
        });
    }
    if seconds >= 60 {
        return Err(TimecodeError::FieldOutOfRange {
            label: label.to_string(),
            field: "seconds",
            value: seconds as u32,
        });
    }

    // ".5" is 500 ms, ".05" is 50 ms
    let millis = match captures.get(4) {
        Some(fraction) => {
            let digits = fraction.as_str();
            let value: u64 = digits
                .parse()
                .map_err(|_| TimecodeError::MalformedGeneric(label.to_string()))?;
            value * 10u64.pow(3 - digits.len() as u32)
        }
        None => 0,
    };

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

/// Format seconds as `HH:MM:SS.mmm` (or with a comma), rounded to the millisecond
pub fn seconds_to_generic(seconds: f64, separator: GenericSeparator) -> String {
    let ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        separator.as_char(),
        millis
    )
}
