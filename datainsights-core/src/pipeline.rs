//! End-to-end report pipeline
//!
//! Each discovered export file is handled independently:
//!
//! ```text
//! read records -> build report -> prompt LLM -> decode insights -> render -> send
//! ```
//!
//! A failure in any stage fails that file only; the run moves on to the next
//! file and the failure is recorded in the [`RunSummary`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, MetricsConfig};
use crate::email::{render_html, render_text, EmailData, Mailer};
use crate::error::{Error, Result};
use crate::ingest::{discover_files, read_records};
use crate::llm::{get_insights, LlmClient};
use crate::metrics::{build_report, date_span, DateSpan};
use crate::types::UserMetrics;

/// Result of a full run over the source directory.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub reports_sent: usize,
    /// Files that failed, with the error that stopped them
    pub errors: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// True when files were found but none produced a report.
    pub fn all_failed(&self) -> bool {
        self.files_discovered > 0 && self.reports_sent == 0
    }
}

/// A report that was generated and sent.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub record_count: usize,
    pub period: Option<DateSpan>,
    pub subject: String,
}

/// Metrics computed for a file without contacting the LLM or SMTP server.
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    pub path: PathBuf,
    pub record_count: usize,
    pub period: Option<DateSpan>,
    pub metrics: UserMetrics,
}

/// Drives files through the pipeline using the given collaborators.
pub struct Pipeline<'a> {
    config: &'a Config,
    llm: &'a dyn LlmClient,
    mailer: &'a dyn Mailer,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, llm: &'a dyn LlmClient, mailer: &'a dyn Mailer) -> Self {
        Self {
            config,
            llm,
            mailer,
        }
    }

    /// Process every file in the configured source directory.
    ///
    /// Configuration and discovery errors abort the run; per-file errors are
    /// collected in the summary.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.validate_source()?;
        self.delivery()?;

        let dir = self
            .config
            .source
            .directory
            .as_deref()
            .ok_or_else(|| {
                Error::Config("source.directory (or FILE_DIR) is required".to_string())
            })?;
        let files = discover_files(dir, &self.config.source.pattern)?;

        let mut summary = RunSummary {
            files_discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::warn!(dir = %dir.display(), "No source files matched, nothing to send");
            return Ok(summary);
        }

        for path in &files {
            match self.process_file(path) {
                Ok(outcome) => {
                    tracing::info!(
                        path = %outcome.path.display(),
                        records = outcome.record_count,
                        "Report sent"
                    );
                    summary.reports_sent += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to process file");
                    summary.errors.push((path.clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            discovered = summary.files_discovered,
            sent = summary.reports_sent,
            failed = summary.errors.len(),
            "Run complete"
        );

        Ok(summary)
    }

    /// Run one file through every stage and send its report.
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let (to, recipient_name) = self.delivery()?;

        let records = read_records(path)?;
        if records.is_empty() {
            tracing::warn!(path = %path.display(), "File contains no records");
        }

        let period = date_span(&records);
        let metrics = build_report(&records, &self.config.metrics);
        let insights = get_insights(self.llm, &metrics)?;

        let data = EmailData {
            recipient_name: recipient_name.to_string(),
            period,
            insights,
        };
        let subject = data.subject(&self.config.email.subject);
        let html = render_html(&data);
        let text = render_text(&data);

        self.mailer.send(to, &subject, &html, &text)?;

        Ok(FileOutcome {
            path: path.to_path_buf(),
            record_count: records.len(),
            period,
            subject,
        })
    }

    /// Recipient address and display name.
    fn delivery(&self) -> Result<(&str, &str)> {
        let to = self.config.email.to_address.as_deref().ok_or_else(|| {
            Error::Config("email.to_address (or EMAIL_TO) is required".to_string())
        })?;
        let name = self.config.email.recipient_name.as_deref().ok_or_else(|| {
            Error::Config("email.recipient_name (or RECIPIENT_NAME) is required".to_string())
        })?;
        Ok((to, name))
    }
}

/// Compute the report for one file (dry run).
pub fn preview_file(path: &Path, config: &MetricsConfig) -> Result<FilePreview> {
    let records = read_records(path)?;
    Ok(FilePreview {
        path: path.to_path_buf(),
        record_count: records.len(),
        period: date_span(&records),
        metrics: build_report(&records, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct EchoLlm;

    impl LlmClient for EchoLlm {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(r#"{"overall_metrics": {"ai_insight": "Steady."}}"#.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, to: &str, subject: &str, _html: &str, _text: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    fn config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.source.directory = Some(dir.to_path_buf());
        config.email.to_address = Some("owner@example.com".to_string());
        config.email.recipient_name = Some("Sam".to_string());
        config
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_process_file_sends_dated_subject() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "a.json",
            r#"[{"Country": "US", "Sessions": 10, "ScreenPageViews": 20, "date": "20240501"},
                {"Country": "US", "Sessions": 5, "ScreenPageViews": 5, "date": "20240503"}]"#,
        );
        let config = config(tmp.path());
        let mailer = RecordingMailer::default();

        let outcome = Pipeline::new(&config, &EchoLlm, &mailer)
            .process_file(&path)
            .unwrap();

        assert_eq!(outcome.record_count, 2);
        assert_eq!(
            outcome.subject,
            "Website Metrics Insights (2024-05-01 to 2024-05-03)"
        );
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "owner@example.com");
    }

    #[test]
    fn test_run_requires_recipient() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(tmp.path());
        config.email.to_address = None;
        let mailer = RecordingMailer::default();

        let err = Pipeline::new(&config, &EchoLlm, &mailer).run().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_run_with_no_files() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let mailer = RecordingMailer::default();

        let summary = Pipeline::new(&config, &EchoLlm, &mailer).run().unwrap();
        assert_eq!(summary.files_discovered, 0);
        assert!(!summary.all_failed());
    }

    #[test]
    fn test_preview_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "a.json",
            r#"[{"DeviceCategory": "mobile", "Sessions": 4, "ScreenPageViews": 1}]"#,
        );

        let metrics = MetricsConfig {
            threshold: 1,
            top_bottom_count: 5,
        };

        let preview = preview_file(&path, &metrics).unwrap();
        assert_eq!(preview.record_count, 1);
        assert!(preview.period.is_none());
        assert_eq!(preview.metrics.bounce_rates_by_device.len(), 1);
        assert_eq!(preview.metrics.bounce_rates_by_device[0].bounce_rate, 100.0);
    }
}
