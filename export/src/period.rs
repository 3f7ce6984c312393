//! Export periods: preset lookbacks, selection values, and free-text date ranges.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use dbot_core::{Choice, HandlerError};

/// Inclusive `[start, end]` bounds of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Fixed lookback periods offered by the export prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPeriod {
    Day,
    Week,
    Month,
    AllTime,
}

impl ExportPeriod {
    /// Bounds ending at `now`. A month is 30 days; all time starts at the Unix epoch, before any platform timestamp.
    pub fn resolve(self, now: DateTime<Utc>) -> DateRange {
        let start = match self {
            ExportPeriod::Day => now - Duration::hours(24),
            ExportPeriod::Week => now - Duration::days(7),
            ExportPeriod::Month => now - Duration::days(30),
            ExportPeriod::AllTime => DateTime::<Utc>::UNIX_EPOCH,
        };
        DateRange { start, end: now }
    }
}

/// A pressed option of the export prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Preset(ExportPeriod),
    CustomRange,
}

impl Selection {
    pub const ALL: [Selection; 5] = [
        Selection::Preset(ExportPeriod::Day),
        Selection::Preset(ExportPeriod::Week),
        Selection::Preset(ExportPeriod::Month),
        Selection::Preset(ExportPeriod::AllTime),
        Selection::CustomRange,
    ];

    /// Callback value carried by the button.
    pub fn data(&self) -> &'static str {
        match self {
            Selection::Preset(ExportPeriod::Day) => "day",
            Selection::Preset(ExportPeriod::Week) => "week",
            Selection::Preset(ExportPeriod::Month) => "month",
            Selection::Preset(ExportPeriod::AllTime) => "all_time",
            Selection::CustomRange => "custom_range",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Selection::Preset(ExportPeriod::Day) => "Day",
            Selection::Preset(ExportPeriod::Week) => "Week",
            Selection::Preset(ExportPeriod::Month) => "Month",
            Selection::Preset(ExportPeriod::AllTime) => "All time",
            Selection::CustomRange => "Custom range",
        }
    }

    /// Maps a callback value back to a selection; `None` for anything else.
    pub fn parse(data: &str) -> Option<Selection> {
        Self::ALL.into_iter().find(|s| s.data() == data)
    }
}

/// Prompt layout: Day/Week, Month/All time, Custom range.
pub fn selection_keyboard() -> Vec<Vec<Choice>> {
    let choice = |s: Selection| Choice::new(s.label(), s.data());
    let [day, week, month, all_time, custom] = Selection::ALL;
    vec![
        vec![choice(day), choice(week)],
        vec![choice(month), choice(all_time)],
        vec![choice(custom)],
    ]
}

/// Parses `YYYY-MM-DD YYYY-MM-DD` into bounds at 00:00:00 UTC of each day.
///
/// The end bound is midnight at the start of the end day, so later messages on that day fall outside.
pub fn parse_custom_range(input: &str) -> Result<DateRange, HandlerError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [start, end] = tokens.as_slice() else {
        return Err(HandlerError::InvalidDateRange(format!(
            "expected two dates, got {} token(s)",
            tokens.len()
        )));
    };
    Ok(DateRange {
        start: parse_day(start)?,
        end: parse_day(end)?,
    })
}

fn parse_day(token: &str) -> Result<DateTime<Utc>, HandlerError> {
    let date = NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|e| HandlerError::InvalidDateRange(format!("{token}: {e}")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| HandlerError::InvalidDateRange(format!("{token}: no midnight")))?;
    Ok(Utc.from_utc_datetime(&midnight))
}
