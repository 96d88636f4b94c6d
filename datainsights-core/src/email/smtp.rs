//! SMTP delivery via lettre.

use std::time::Duration;

use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::Mailer;
use crate::config::EmailConfig;
use crate::error::{Error, Result};

/// Blocking SMTP mailer.
///
/// lettre's transport is async; the mailer drives it on its own
/// current-thread runtime. The connection is made lazily on first send.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
    runtime: tokio::runtime::Runtime,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let host = config.smtp_host.as_deref().ok_or_else(|| {
            Error::Config("email.smtp_host (or SMTP_HOST) is required".to_string())
        })?;
        let from = config.from_address.as_deref().ok_or_else(|| {
            Error::Config("email.from_address (or EMAIL_FROM) is required".to_string())
        })?;

        let from_mailbox: Mailbox = from
            .parse()
            .map_err(|e| Error::Email(format!("invalid sender address {:?}: {e}", from)))?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| Error::Email(format!("failed to configure SMTP relay: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs.max(1))));

        if let Some(password) = &config.password {
            builder = builder.credentials(Credentials::new(from.to_string(), password.clone()));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Email(format!("failed to build tokio runtime: {e}")))?;

        tracing::debug!(
            host,
            port = config.smtp_port,
            use_tls = config.use_tls,
            authenticated = config.password.is_some(),
            "SMTP mailer initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from_mailbox,
            runtime,
        })
    }
}

/// Build the multipart message (plain text first, HTML preferred).
fn build_message(
    from: &Mailbox,
    to: &str,
    subject: &str,
    body_html: &str,
    body_text: &str,
) -> Result<Message> {
    let to_mailbox: Mailbox = to
        .parse()
        .map_err(|e| Error::Email(format!("invalid recipient address {:?}: {e}", to)))?;

    Message::builder()
        .from(from.clone())
        .to(to_mailbox)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body_text.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(body_html.to_string()),
                ),
        )
        .map_err(|e| Error::Email(format!("failed to build message: {e}")))
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, body_html: &str, body_text: &str) -> Result<()> {
        let message = build_message(&self.from_mailbox, to, subject, body_html, body_text)?;

        self.runtime
            .block_on(self.transport.send(message))
            .map_err(|e| Error::Email(format!("send failed: {e}")))?;

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}
