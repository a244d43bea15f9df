//! The [`Mailer`] trait and its transports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{EmailConfig, EmailTransport};
use crate::error::EmailError;

/// HTTP request timeout for a single API send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Sends a single email. One attempt, no retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// Construct the mailer for the given configuration.
pub fn build_mailer(config: Option<EmailConfig>) -> Result<Arc<dyn Mailer>, EmailError> {
    let Some(config) = config else {
        return Ok(Arc::new(UnconfiguredMailer));
    };
    let mailer: Arc<dyn Mailer> = match config.transport {
        EmailTransport::Smtp {
            host,
            port,
            user,
            password,
        } => Arc::new(SmtpMailer::new(&host, port, user, password, &config.from_address)?),
        EmailTransport::HttpApi { url, api_key } => {
            Arc::new(HttpApiMailer::new(url, api_key, &config.from_address)?)
        }
    };
    Ok(mailer)
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Sends multipart (text + HTML) mail over STARTTLS SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: Option<String>,
        password: Option<String>,
        from_address: &str,
    ) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
        if let (Some(user), Some(pass)) = (user, password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            transport: builder.build(),
            from: from_address.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent via SMTP");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP API
// ---------------------------------------------------------------------------

/// Sends mail through a JSON email API authenticated with a bearer key.
pub struct HttpApiMailer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    from: String,
}

impl HttpApiMailer {
    pub fn new(url: String, api_key: String, from_address: &str) -> Result<Self, EmailError> {
        // Validate the sender up front so a bad EMAIL_FROM fails at startup.
        let _: Mailbox = from_address.parse()?;
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            from: from_address.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": [email.to],
            "subject": email.subject,
            "text": email.text,
            "html": email.html,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent via API");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unconfigured
// ---------------------------------------------------------------------------

/// Stand-in used when no transport is configured.
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), EmailError> {
        Err(EmailError::NotConfigured)
    }
}
