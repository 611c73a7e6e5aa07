// src/models/semester.rs
//! Observing semesters (`yyyy-n`). Semester 1 runs from 1 May 12:00 UTC to
//! 1 November 12:00 UTC, semester 2 from 1 November to 1 May of the next year.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use regex::Regex;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_START_SEMESTER: &str = "2000-1";
pub const DEFAULT_END_SEMESTER: &str = "2099-1";

static SEMESTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-([12])$").expect("semester pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semester {
    pub year: i32,
    /// 1 or 2.
    pub half: u8,
}

impl Semester {
    pub fn new(year: i32, half: u8) -> AppResult<Self> {
        if !(1..=2).contains(&half) || !(0..=9999).contains(&year) {
            return Err(AppError::Format(format!(
                "Semester {year}-{half} is not of the form yyyy-n (with n being 1 or 2)"
            )));
        }
        Ok(Semester { year, half })
    }

    pub fn next(&self) -> Semester {
        match self.half {
            1 => Semester { year: self.year, half: 2 },
            _ => Semester { year: self.year + 1, half: 1 },
        }
    }

    pub fn previous(&self) -> Semester {
        match self.half {
            1 => Semester { year: self.year - 1, half: 2 },
            _ => Semester { year: self.year, half: 1 },
        }
    }

    /// Noon UTC on 1 May (semester 1) or 1 November (semester 2).
    pub fn start(&self) -> DateTime<Utc> {
        let month = if self.half == 1 { 5 } else { 11 };
        Utc.with_ymd_and_hms(self.year, month, 1, 12, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Exclusive end, which is the start of the following semester.
    pub fn end(&self) -> DateTime<Utc> {
        self.next().start()
    }

    /// The semester an instant falls in, honouring the noon boundaries.
    pub fn containing(instant: DateTime<Utc>) -> Semester {
        let guess = Semester::for_date(instant.date_naive());
        if instant < guess.start() {
            guess.previous()
        } else if instant >= guess.end() {
            guess.next()
        } else {
            guess
        }
    }

    /// Month-based semester of a calendar date: January to April belong to
    /// semester 2 of the previous year.
    pub fn for_date(date: NaiveDate) -> Semester {
        match date.month0() {
            0..=3 => Semester { year: date.year() - 1, half: 2 },
            4..=9 => Semester { year: date.year(), half: 1 },
            _ => Semester { year: date.year(), half: 2 },
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{}", self.year, self.half)
    }
}

impl FromStr for Semester {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SEMESTER.captures(s).ok_or_else(|| format_error(s))?;
        let year = caps[1].parse::<i32>().map_err(|_| format_error(s))?;
        let half = caps[2].parse::<u8>().map_err(|_| format_error(s))?;
        Semester::new(year, half)
    }
}

fn format_error(s: &str) -> AppError {
    AppError::Format(format!(
        "The semester \"{s}\" is not of the form yyyy-n (with n being 1 or 2)"
    ))
}

/// Source of "now" for everything that depends on the current semester.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC of the given date; `None` for an invalid date.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single().map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The semester containing `today`, as `yyyy-n`.
pub fn current_semester(today: NaiveDate) -> String {
    Semester::for_date(today).to_string()
}

/// Validate a semester string, substituting `fallback` for empty input.
pub fn parse_semester(input: &str, fallback: &str) -> AppResult<String> {
    let value = if input.is_empty() { fallback } else { input };
    Ok(value.parse::<Semester>()?.to_string())
}

/// Resolve a start/end pair, filling an empty side with the widest default.
pub fn parse_semester_range(start: &str, end: &str) -> AppResult<(String, String)> {
    if start.is_empty() && end.is_empty() {
        return Err(AppError::Format(
            "Please provide a start and/or end semester.".to_string(),
        ));
    }
    let start = parse_semester(start, DEFAULT_START_SEMESTER)?;
    let end = parse_semester(end, DEFAULT_END_SEMESTER)?;
    // yyyy-n is fixed width, so string order is semester order.
    if start > end {
        return Err(AppError::Range(format!(
            "The start semester ({start}) must not be later than the end semester ({end})."
        )));
    }
    Ok((start, end))
}

pub fn next_semester_of(semester: &str) -> AppResult<String> {
    Ok(semester.parse::<Semester>()?.next().to_string())
}

pub fn previous_semester_of(semester: &str) -> AppResult<String> {
    Ok(semester.parse::<Semester>()?.previous().to_string())
}
