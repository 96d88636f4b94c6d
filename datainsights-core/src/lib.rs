//! # datainsights-core
//!
//! Core library for datainsights - LLM-written insight reports from web
//! analytics exports.
//!
//! This library provides:
//! - Domain types for session records and computed metrics
//! - The metrics engine (grouping, ranking, overall statistics)
//! - Prompt construction and decoding of the LLM's reply
//! - Report email rendering and SMTP delivery
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Each export file flows through the same stages:
//! - **Ingest:** JSON export files on disk, decoded into [`SessionRecord`]s
//! - **Metrics:** Grouped and overall statistics ([`UserMetrics`])
//! - **Insights:** The metrics rendered into a prompt, answered by an [`llm::LlmClient`]
//! - **Delivery:** HTML and text bodies sent through an [`email::Mailer`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use datainsights_core::email::SmtpMailer;
//! use datainsights_core::llm::OpenAiClient;
//! use datainsights_core::{Config, Pipeline};
//!
//! let config = Config::load().expect("failed to load config");
//! config.validate().expect("incomplete config");
//!
//! let llm = OpenAiClient::new(&config.llm).expect("failed to create LLM client");
//! let mailer = SmtpMailer::new(&config.email).expect("failed to create mailer");
//!
//! let summary = Pipeline::new(&config, &llm, &mailer).run().expect("run failed");
//! println!("sent {} of {}", summary.reports_sent, summary.files_discovered);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{preview_file, FileOutcome, FilePreview, Pipeline, RunSummary};
pub use types::*;

// Public modules
pub mod config;
pub mod email;
pub mod error;
pub mod format;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;
