// src/models/angle.rs
//! Conversions between decimal degrees and the sexagesimal strings used for
//! right ascension (hours) and declination (degrees).

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_DECIMAL_PLACES: usize = 2;

/// Seconds can't be shown with more decimals than an f64 holds.
const MAX_DECIMAL_PLACES: usize = 9;

/// Sign-optional `D[:D[:D[.D]]]`, any of `: ; " '` as separator.
static SEXAGESIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([+-])?(\d{1,2})(?:[:;"'](\d{1,2})(?:[:;"'](\d{1,2}(?:\.\d+)?))?)?$"#)
        .expect("sexagesimal pattern is valid")
});

/// Split a non-negative value into whole units, minutes and rounded seconds,
/// carrying a rounded-up 60 seconds into the minutes and 60 minutes into the units.
fn split_sexagesimal(value: f64, decimal_places: usize) -> (u64, u64, f64) {
    let scale = 10f64.powi(decimal_places as i32);
    let mut units = value.floor();
    let mut minutes = ((value - units) * 60.0).floor();
    let raw = (value - units - minutes / 60.0) * 3600.0;
    let mut seconds = (raw * scale).round() / scale;
    // Also turns -0.0 into 0.0 so it never prints as "-0.00".
    if seconds <= 0.0 {
        seconds = 0.0;
    }
    if seconds >= 60.0 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes = 0.0;
        units += 1.0;
    }
    (units as u64, minutes as u64, seconds)
}

fn format_seconds(seconds: f64, decimal_places: usize) -> String {
    let width = if decimal_places == 0 { 2 } else { decimal_places + 3 };
    format!("{seconds:0width$.decimal_places$}")
}

fn check_decimal_places(decimal_places: usize) -> AppResult<()> {
    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(AppError::InvalidArgument(format!(
            "at most {MAX_DECIMAL_PLACES} decimal places are supported, got {decimal_places}"
        )));
    }
    Ok(())
}

/// Convert a right ascension in degrees to `HH:MM:SS.ss`.
///
/// Right ascension has no sign, so negative input is rejected. Angles of a
/// full circle or more wrap, as does anything rounding up to 24 hours.
pub fn degrees_to_hms(deg: f64, decimal_places: usize) -> AppResult<String> {
    check_decimal_places(decimal_places)?;
    if !deg.is_finite() {
        return Err(AppError::InvalidArgument(format!("{deg} is not a finite angle")));
    }
    if deg < 0.0 {
        return Err(AppError::InvalidArgument(format!(
            "right ascension must be non-negative, got {deg}"
        )));
    }
    let (hours, minutes, seconds) = split_sexagesimal(deg / 15.0, decimal_places);
    let hours = hours % 24;
    Ok(format!(
        "{hours:02}:{minutes:02}:{}",
        format_seconds(seconds, decimal_places)
    ))
}

/// Convert an angle in degrees to `±DD:MM:SS.ss`.
pub fn degrees_to_dms(deg: f64, decimal_places: usize) -> AppResult<String> {
    check_decimal_places(decimal_places)?;
    if !deg.is_finite() {
        return Err(AppError::InvalidArgument(format!("{deg} is not a finite angle")));
    }
    let sign = if deg < 0.0 { '-' } else { '+' };
    let (degrees, minutes, seconds) = split_sexagesimal(deg.abs(), decimal_places);
    Ok(format!(
        "{sign}{degrees:02}:{minutes:02}:{}",
        format_seconds(seconds, decimal_places)
    ))
}

/// `degrees_to_hms` with two decimal places for the seconds.
pub fn to_hms(deg: f64) -> AppResult<String> {
    degrees_to_hms(deg, DEFAULT_DECIMAL_PLACES)
}

/// `degrees_to_dms` with two decimal places for the seconds.
pub fn to_dms(deg: f64) -> AppResult<String> {
    degrees_to_dms(deg, DEFAULT_DECIMAL_PLACES)
}

struct Sexagesimal {
    negative: bool,
    units: f64,
    minutes: f64,
    seconds: f64,
}

fn parse_sexagesimal(input: &str, what: &str) -> AppResult<Sexagesimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(format!("no {what} given")));
    }
    let caps = SEXAGESIMAL.captures(trimmed).ok_or_else(|| {
        AppError::InvalidArgument(format!("\"{trimmed}\" is not a valid {what}"))
    })?;
    let field = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    Ok(Sexagesimal {
        negative: caps.get(1).is_some_and(|m| m.as_str() == "-"),
        units: field(2),
        minutes: field(3),
        seconds: field(4),
    })
}

fn check_minutes_seconds(parsed: &Sexagesimal) -> AppResult<()> {
    if parsed.minutes >= 60.0 {
        return Err(AppError::InvalidArgument(format!(
            "minutes must be less than 60, got {}",
            parsed.minutes
        )));
    }
    if parsed.seconds >= 60.0 {
        return Err(AppError::InvalidArgument(format!(
            "seconds must be less than 60, got {}",
            parsed.seconds
        )));
    }
    Ok(())
}

/// Convert a right ascension like `12:30:15.5` (hours) to degrees.
pub fn convert_right_ascension_hms_to_degrees(input: &str) -> AppResult<f64> {
    let parsed = parse_sexagesimal(input, "right ascension")?;
    if parsed.negative {
        return Err(AppError::InvalidArgument(format!(
            "right ascension can't be negative, got \"{}\"",
            input.trim()
        )));
    }
    let hours = parsed.units;
    if hours >= 24.0 {
        return Err(AppError::InvalidArgument(format!(
            "hours must be less than 24, got {hours}"
        )));
    }
    check_minutes_seconds(&parsed)?;
    Ok((hours + parsed.minutes / 60.0 + parsed.seconds / 3600.0) * 15.0)
}

/// Convert a declination like `-23:07:24.4` to degrees.
///
/// The sign applies to the whole value, so `-00:30:00` is -0.5 degrees.
pub fn convert_declination_dms_to_degrees(input: &str) -> AppResult<f64> {
    let parsed = parse_sexagesimal(input, "declination")?;
    check_minutes_seconds(&parsed)?;
    let magnitude = parsed.units + parsed.minutes / 60.0 + parsed.seconds / 3600.0;
    if magnitude > 90.0 {
        return Err(AppError::InvalidArgument(format!(
            "declination must lie between -90 and 90 degrees, got {}{magnitude}",
            if parsed.negative { "-" } else { "" }
        )));
    }
    Ok(if parsed.negative { -magnitude } else { magnitude })
}
