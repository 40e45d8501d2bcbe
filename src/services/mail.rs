// src/services/mail.rs

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Transactional email relay.
#[async_trait]
pub trait MailGateway: Send + Sync {
  async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

/// Sends through an authenticated SMTP relay.
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: String,
}

impl SmtpMailer {
  pub fn new(config: &AppConfig) -> Result<Self> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
      .map_err(|e| AppError::Config(format!("Invalid SMTP relay '{}': {}", config.smtp_host, e)))?
      .credentials(Credentials::new(config.smtp_user.clone(), config.smtp_password.clone()))
      .build();

    Ok(Self {
      transport,
      from: config.mail_from.clone(),
    })
  }
}

#[async_trait]
impl MailGateway for SmtpMailer {
  #[instrument(skip(self, html), fields(subject = %subject))]
  async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
    let message = Message::builder()
      .from(
        self
          .from
          .parse()
          .map_err(|e| AppError::Mail(format!("Invalid sender address '{}': {}", self.from, e)))?,
      )
      .to(to.parse().map_err(|e| AppError::Mail(format!("Invalid recipient address '{}': {}", to, e)))?)
      .subject(subject)
      .header(ContentType::TEXT_HTML)
      .body(html.to_string())
      .map_err(|e| AppError::Mail(format!("Failed to build email: {}", e)))?;

    self
      .transport
      .send(message)
      .await
      .map_err(|e| AppError::Mail(format!("SMTP delivery failed: {}", e)))?;
    info!("Email delivered to {}", to);
    Ok(())
  }
}
