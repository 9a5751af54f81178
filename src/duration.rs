//! Duration syntax for `--expires-after`/`--after`:
//! a decimal number with suffix `s`, `m`, or `h`, concatenable (`2h3m4s`).
//! Negative durations are accepted and mean "expire immediately".

use chrono::Duration;

use crate::error::{CellarError, Result};

/// Parses e.g. `"2h3m4s"`, `"-1s"`, `"90m"` into a [`chrono::Duration`].
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CellarError::validation("duration must not be empty"));
    }

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut total = Duration::zero();
    let mut chars = rest.char_indices().peekable();
    let mut start = 0usize;
    let mut saw_component = false;

    while let Some(&(idx, ch)) = chars.peek() {
        if ch.is_ascii_digit() || ch == '.' {
            chars.next();
            continue;
        }

        if !matches!(ch, 's' | 'm' | 'h') {
            return Err(CellarError::validation(format!(
                "invalid duration {input:?}: unknown unit {ch:?}"
            )));
        }

        let number_str = &rest[start..idx];
        if number_str.is_empty() {
            return Err(CellarError::validation(format!(
                "invalid duration {input:?}: missing number before unit {ch:?}"
            )));
        }

        let value: f64 = number_str
            .parse()
            .map_err(|_| CellarError::validation(format!("invalid duration {input:?}")))?;

        let millis = (value * 1000.0).round() as i64;
        let component = match ch {
            's' => Duration::milliseconds(millis),
            'm' => Duration::milliseconds(millis * 60),
            'h' => Duration::milliseconds(millis * 3600),
            _ => unreachable!(),
        };

        total += component;
        saw_component = true;
        chars.next();
        start = idx + ch.len_utf8();
    }

    if !saw_component || start != rest.len() {
        return Err(CellarError::validation(format!(
            "invalid duration {input:?}: expected a number followed by s/m/h"
        )));
    }

    Ok(if negative { -total } else { total })
}

/// Renders a non-negative [`chrono::Duration`] as concatenated `h`/`m`/`s`
/// units, e.g. `1h2m3s`, `5m3s`, `10s`, matching `--expires-after`'s syntax.
pub fn format_duration(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format!("{seconds}s"));
    out
}
