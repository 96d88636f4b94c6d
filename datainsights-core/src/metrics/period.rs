//! Reporting period covered by a file's records.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::SessionRecord;

/// Inclusive range of dates seen in a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Display form, e.g. "2024-01-01 to 2024-01-31" or a single date.
    pub fn display(&self) -> String {
        if self.start == self.end {
            self.start.format("%Y-%m-%d").to_string()
        } else {
            format!(
                "{} to {}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        }
    }
}

/// Parse an export date: `YYYYMMDD` (analytics export form) or `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

/// Earliest and latest parseable record dates, or `None` if no date parses.
pub fn date_span(records: &[SessionRecord]) -> Option<DateSpan> {
    records
        .iter()
        .filter_map(|r| parse_date(&r.date))
        .fold(None, |span, date| match span {
            None => Some(DateSpan {
                start: date,
                end: date,
            }),
            Some(DateSpan { start, end }) => Some(DateSpan {
                start: start.min(date),
                end: end.max(date),
            }),
        })
}
