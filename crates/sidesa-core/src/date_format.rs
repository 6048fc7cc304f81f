//! Indonesian date parsing and formatting.
//!
//! Birth dates are stored as normalized `YYYY-MM-DD` strings. Display
//! strings use Indonesian month names, e.g. `01 Januari 1990`.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use thiserror::Error;

/// Accepted external date layouts, tried in order.
const INPUT_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Storage layout for birth dates.
pub const STORAGE_LAYOUT: &str = "%Y-%m-%d";

const BULAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Error raised when a date string cannot be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("unrecognized date: {0:?}")]
    Unparseable(String),

    #[error("UTC offset out of range: {0} hours")]
    InvalidOffset(i32),
}

/// Parses a date in any accepted external layout.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateFormatError> {
    let trimmed = input.trim();
    INPUT_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(trimmed, layout).ok())
        .ok_or_else(|| DateFormatError::Unparseable(input.to_string()))
}

/// Parses a date and returns it in the storage layout.
pub fn normalize_date(input: &str) -> Result<String, DateFormatError> {
    parse_date(input).map(|date| date.format(STORAGE_LAYOUT).to_string())
}

/// Returns the Indonesian name of a month (1-based).
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    BULAN[((month.clamp(1, 12)) - 1) as usize]
}

/// Renders a date as `DD Bulan YYYY`.
#[must_use]
pub fn indo_date(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_name(date.month()), date.year())
}

/// Formats a stored date string as `DD Bulan YYYY`.
pub fn format_date_indo(stored: &str) -> Result<String, DateFormatError> {
    parse_date(stored).map(indo_date)
}

/// Renders a timestamp as `DD Bulan YYYY HH:MM` in the given offset.
#[must_use]
pub fn format_datetime_indo(at: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!(
        "{} {:02}:{:02}",
        indo_date(local.date_naive()),
        local.hour(),
        local.minute()
    )
}

/// Formats timestamps for display in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct IndoDateFormatter {
    offset: FixedOffset,
}

impl IndoDateFormatter {
    /// Western Indonesia Time, UTC+7.
    pub const WIB_OFFSET_HOURS: i32 = 7;

    /// Creates a formatter for the given offset in whole hours.
    pub fn from_utc_offset_hours(hours: i32) -> Result<Self, DateFormatError> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or(DateFormatError::InvalidOffset(hours))
    }

    /// Returns the configured offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Formats a stored birth date. See [`format_date_indo`].
    pub fn date(&self, stored: &str) -> Result<String, DateFormatError> {
        format_date_indo(stored)
    }

    /// Renders a timestamp as `DD Bulan YYYY HH:MM` in the local offset.
    #[must_use]
    pub fn datetime(&self, at: DateTime<Utc>) -> String {
        format_datetime_indo(at, self.offset)
    }
}

impl Default for IndoDateFormatter {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(Self::WIB_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}
