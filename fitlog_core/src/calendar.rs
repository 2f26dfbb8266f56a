//! Calendar-day helpers.
//!
//! Dates are `chrono::NaiveDate` everywhere inside the crate; the
//! `YYYY-MM-DD` string form only appears at the storage boundary.

use crate::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Longest date window any view or export will build
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Serialize a date to its storage key
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` storage key
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", key, e)))
}

/// The 1st of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `days` consecutive dates ending at `end` inclusive, oldest first
///
/// Windows longer than [`MAX_WINDOW_DAYS`] are clamped, and the window stops
/// at the earliest representable date.
pub fn window_ending(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let days = if days > MAX_WINDOW_DAYS {
        tracing::warn!(
            "Window of {} days clamped to {} days",
            days,
            MAX_WINDOW_DAYS
        );
        MAX_WINDOW_DAYS
    } else {
        days
    };

    let mut window: Vec<NaiveDate> = (0..i64::from(days))
        .map_while(|back| end.checked_sub_signed(Duration::days(back)))
        .collect();
    window.reverse();
    window
}

/// Dates the day view can show: `max_days_back` days before today, then today
pub fn history_days(today: NaiveDate, max_days_back: u32) -> Vec<NaiveDate> {
    window_ending(today, max_days_back.saturating_add(1))
}

pub fn is_within_history(date: NaiveDate, today: NaiveDate, max_days_back: u32) -> bool {
    date <= today && (today - date).num_days() <= i64::from(max_days_back)
}

/// Date the day view should open on
///
/// Future dates and dates older than the history window fall back to today.
pub fn resolve_view_date(requested: NaiveDate, today: NaiveDate, max_days_back: u32) -> NaiveDate {
    if is_within_history(requested, today, max_days_back) {
        requested
    } else {
        tracing::debug!(
            "Requested date {} outside history window, showing {}",
            requested,
            today
        );
        today
    }
}

/// Three-letter upper-case weekday label for graph axes (`MON`, `TUE`, ...)
pub fn short_day_name(date: NaiveDate) -> String {
    date.format("%a").to_string().to_uppercase()
}

/// Day name and date text for a day header, e.g. (`THURSDAY`, `15 OCT 2026`)
pub fn format_long_date(date: NaiveDate) -> (String, String) {
    let day_name = date.format("%A").to_string().to_uppercase();
    let date_text = format!(
        "{} {} {}",
        date.day(),
        date.format("%b").to_string().to_uppercase(),
        date.year()
    );
    (day_name, date_text)
}
