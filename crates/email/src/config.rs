//! Email transport configuration.

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `EMAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "BRNNO <noreply@brnno.io>";

/// Default endpoint for the HTTP email API.
const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

/// Which transport delivers the mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTransport {
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
    HttpApi {
        url: String,
        api_key: String,
    },
}

/// Configuration for outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub transport: EmailTransport,
    /// RFC 5322 "From" address.
    pub from_address: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// The HTTP API wins when `EMAIL_API_KEY` is set; otherwise SMTP is used
    /// when `SMTP_HOST` is set. Returns `None` when neither is present.
    ///
    /// | Variable         | Required | Default                         |
    /// |------------------|----------|---------------------------------|
    /// | `EMAIL_API_KEY`  | no       |                                 |
    /// | `EMAIL_API_URL`  | no       | `https://api.resend.com/emails` |
    /// | `SMTP_HOST`      | no       |                                 |
    /// | `SMTP_PORT`      | no       | `587`                           |
    /// | `SMTP_USER`      | no       |                                 |
    /// | `SMTP_PASSWORD`  | no       |                                 |
    /// | `EMAIL_FROM`     | no       | `BRNNO <noreply@brnno.io>`      |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = if let Some(api_key) = get("EMAIL_API_KEY") {
            EmailTransport::HttpApi {
                url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                api_key,
            }
        } else {
            EmailTransport::Smtp {
                host: get("SMTP_HOST")?,
                port: get("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: get("SMTP_USER"),
                password: get("SMTP_PASSWORD"),
            }
        };

        Some(Self {
            transport,
            from_address: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
        })
    }
}
