//! Duration expressions
//!
//! Parses the `--expires` value, a timestring-style expression made of one
//! or more `<number><unit>` terms: `"1d 2h 10min 30s"` or jammed together
//! as `1d2h10min30s`. The result is a whole number of seconds.

use super::CommandError;

/// Parse a duration expression into seconds.
///
/// Terms may be separated by whitespace or commas. A bare number with no
/// unit, an unknown unit, or a unit with no number is rejected.
pub fn parse_duration(expr: &str) -> Result<u64, CommandError> {
    let invalid = || CommandError::InvalidDuration(expr.to_string());

    let mut total = 0.0_f64;
    let mut chars = expr.chars().peekable();
    let mut seen_term = false;

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut number = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() && c != '.' {
                break;
            }
            number.push(c);
            chars.next();
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let mut unit = String::new();
        while let Some(&c) = chars.peek() {
            if !c.is_alphabetic() {
                break;
            }
            unit.push(c);
            chars.next();
        }
        let factor = unit_seconds(&unit).ok_or_else(invalid)?;

        total += value * factor;
        seen_term = true;
    }

    if !seen_term {
        return Err(invalid());
    }

    Ok(total.round() as u64)
}

/// Seconds per unit, following the timestring unit table.
fn unit_seconds(unit: &str) -> Option<f64> {
    let secs = match unit.to_ascii_lowercase().as_str() {
        "ms" | "milli" | "millisecond" | "milliseconds" => 0.001,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
        "d" | "day" | "days" => 86_400.0,
        "w" | "week" | "weeks" => 604_800.0,
        "mon" | "mth" | "mths" | "month" | "months" => 2_629_800.0,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600.0,
        _ => return None,
    };
    Some(secs)
}
