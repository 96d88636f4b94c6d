//! Metrics engine for datainsights
//!
//! Turns the session records of one export file into a [`UserMetrics`]
//! report:
//! - [`aggregate`] groups records by a [`Breakdown`] and folds each group
//! - [`overall`] computes dataset-wide figures
//! - [`ranking`] sorts groups and slices top/bottom lists
//! - [`report`] wires the above into the fixed report layout
//! - [`period`] finds the date span a file covers
//!
//! Every ratio in this module returns 0.0 when its denominator is zero.
//! Nothing here performs I/O or returns an error.
//!
//! [`UserMetrics`]: crate::types::UserMetrics
//! [`Breakdown`]: crate::types::Breakdown

pub mod aggregate;
pub mod overall;
pub mod period;
pub mod ranking;
pub mod report;

pub use aggregate::aggregate_by_breakdown;
pub use overall::calculate_overall;
pub use period::{date_span, DateSpan};
pub use ranking::{bottom_elements, sort_by_field, sort_by_field_name, top_elements};
pub use report::build_report;

/// Parse a decimal number exported as text.
///
/// Malformed or empty input yields 0.0 so one bad field never drops an
/// otherwise valid record.
pub fn parse_float(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
