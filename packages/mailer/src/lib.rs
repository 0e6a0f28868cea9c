//! Minimal SMTP client used for one-time passcode delivery.
//!
//! Wraps lettre's async SMTP transport behind a single `send(to, subject, body)`
//! call so the server can treat mail delivery as an opaque collaborator.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Invalid sender address: {0}")]
    InvalidSender(String),
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("Failed to configure SMTP transport: {0}")]
    Transport(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("Failed to send email: {0}")]
    Send(String),
}

#[derive(Debug, Clone)]
pub struct MailerOptions {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender, either `addr@example.com` or `Name <addr@example.com>`
    pub from: String,
    /// Upgrade the connection with STARTTLS. Disable only for local relays.
    pub starttls: bool,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    /// Build a mailer. No connection is opened until the first `send`.
    pub fn new(options: MailerOptions) -> Result<Self, MailerError> {
        let from: Mailbox = options
            .from
            .parse()
            .map_err(|e| MailerError::InvalidSender(format!("{}: {}", options.from, e)))?;

        let builder = if options.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&options.host)
                .map_err(|e| MailerError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&options.host)
        };

        let mut builder = builder.port(options.port).timeout(Some(options.timeout));

        if let (Some(username), Some(password)) = (options.username, options.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let message = self.build_message(to, subject, body)?;

        debug!(to = %to, subject = %subject, "Sending email");

        self.transport.send(message).await.map_err(|e| {
            error!(to = %to, error = %e, "SMTP delivery failed");
            MailerError::Send(e.to_string())
        })?;

        Ok(())
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, MailerError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| MailerError::InvalidRecipient(format!("{}: {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailerError::Build(e.to_string()))
    }
}
