//! Report email rendering and delivery.

pub mod render;
mod smtp;

pub use render::{render_html, render_text};
pub use smtp::SmtpMailer;

use crate::error::Result;
use crate::llm::UserMetricsWithInsights;
use crate::metrics::DateSpan;

/// Everything the email templates need.
#[derive(Debug, Clone)]
pub struct EmailData {
    pub recipient_name: String,
    /// Date range of the source file, when its records carry dates
    pub period: Option<DateSpan>,
    pub insights: UserMetricsWithInsights,
}

impl EmailData {
    /// Subject line: the configured base plus the period, if known.
    pub fn subject(&self, base: &str) -> String {
        match &self.period {
            Some(period) => format!("{} ({})", base, period.display()),
            None => base.to_string(),
        }
    }
}

/// Outgoing mail interface.
pub trait Mailer: Send + Sync {
    /// Send a multipart message with HTML and plain-text bodies.
    fn send(&self, to: &str, subject: &str, body_html: &str, body_text: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_subject_with_and_without_period() {
        let mut data = EmailData {
            recipient_name: "Sam".to_string(),
            period: None,
            insights: UserMetricsWithInsights::default(),
        };
        assert_eq!(data.subject("Weekly"), "Weekly");

        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        data.period = Some(DateSpan { start: day, end: day });
        assert_eq!(data.subject("Weekly"), "Weekly (2024-05-01)");
    }
}
