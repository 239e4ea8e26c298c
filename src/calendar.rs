//! The per-dynasty date cursor.
//!
//! `CalendarDate` is a thin, totally-ordered wrapper around [`chrono::NaiveDate`].
//! It is the single representation of "now" for a dynasty; the simulation
//! executor advances it one day at a time and nothing else is permitted to
//! move it backward within a dynasty.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DynastyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DynastyError::InvalidDate {
                message: format!("{year}-{month:02}-{day:02} is not a valid calendar date"),
            })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the date `n` days after this one. Negative `n` moves backward
    /// (used only by the demo CLI for test fixtures; the executor only ever
    /// calls this with `n = 1`).
    pub fn plus_days(&self, n: i64) -> Self {
        Self(self.0 + Duration::days(n))
    }

    pub fn days_until(&self, other: &Self) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The next date on or after `self` that falls on `weekday`.
    pub fn next_weekday(&self, weekday: Weekday) -> Self {
        let mut d = *self;
        while d.weekday() != weekday {
            d = d.plus_days(1);
        }
        d
    }

    pub fn to_iso_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    pub fn parse_iso(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| DynastyError::InvalidDate {
                message: format!("could not parse {s:?} as YYYY-MM-DD: {e}"),
            })
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}
