//! Confirmation-code delivery via SMTP.
//!
//! [`Mailer`] is the notification collaborator of the signup flow. When
//! `SMTP_HOST` is configured it sends plain-text mail through the `lettre`
//! async transport; otherwise it degrades to a tracing sink so local
//! development works without a mail server. Delivery failures propagate to
//! the signup caller as [`DeliveryError`].

/// Error type for confirmation-code delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@critica.local";

/// Configuration for the SMTP delivery transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that mail
    /// delivery is not configured and the log sink should be used instead.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | --                      |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@critica.local` |
    /// | `SMTP_USER`     | no       | --                      |
    /// | `SMTP_PASSWORD` | no       | --                      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Delivers confirmation codes to users.
pub enum Mailer {
    /// Real SMTP delivery.
    Smtp(EmailConfig),
    /// No SMTP configured: log the code instead of sending it.
    Log,
}

impl Mailer {
    /// Build a mailer from the environment: SMTP when configured, the log
    /// sink otherwise.
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(config) => Self::Smtp(config),
            None => Self::Log,
        }
    }

    /// Deliver a confirmation code to the given address.
    pub async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), DeliveryError> {
        match self {
            Mailer::Smtp(config) => send_via_smtp(config, to_email, username, code).await,
            Mailer::Log => {
                tracing::info!(to = to_email, username, code, "Confirmation code issued (SMTP not configured)");
                Ok(())
            }
        }
    }
}

async fn send_via_smtp(
    config: &EmailConfig,
    to_email: &str,
    username: &str,
    code: &str,
) -> Result<(), DeliveryError> {
    use lettre::{
        message::header::ContentType, transport::smtp::authentication::Credentials,
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    };

    let subject = "Critica confirmation code";
    let body = format!(
        "Hello {username},\n\n\
         Your confirmation code is: {code}\n\n\
         Exchange it for an access token at /api/v1/auth/token."
    );

    let email = Message::builder()
        .from(config.from_address.parse()?)
        .to(to_email.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| DeliveryError::Build(e.to_string()))?;

    let mut transport_builder =
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

    if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
        transport_builder =
            transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    let transport = transport_builder.build();
    transport.send(email).await?;

    tracing::info!(to = to_email, "Confirmation code email sent");
    Ok(())
}
