// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  // Hosted table/object store
  pub storage_url: String,
  pub storage_service_key: String,
  pub proof_bucket: String,

  // Operator chat bot
  pub bot_token: String,
  pub operator_chat_id: String,

  // Buyer email relay
  pub smtp_host: String,
  pub smtp_user: String,
  pub smtp_password: String,
  pub mail_from: String,

  pub shop_name: String,
  pub product_name: String,

  // Notification outbox
  pub outbox_poll_secs: u64,
  pub outbox_max_attempts: i32,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let storage_url = get_env("STORAGE_API_URL")?;
    let storage_service_key = get_env("STORAGE_SERVICE_KEY")?;
    let proof_bucket = get_env("STORAGE_PROOF_BUCKET").unwrap_or_else(|_| "payment-proofs".to_string());

    let bot_token = get_env("TELEGRAM_BOT_TOKEN")?;
    let operator_chat_id = get_env("TELEGRAM_CHAT_ID")?;

    let smtp_host = get_env("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
    let smtp_user = get_env("SMTP_USER")?;
    let smtp_password = get_env("SMTP_PASSWORD")?;

    let shop_name = get_env("SHOP_NAME").unwrap_or_else(|_| "Dire Tracksuit".to_string());
    let product_name = get_env("PRODUCT_NAME").unwrap_or_else(|_| "Dire Khadaffi Track Suit".to_string());
    let mail_from = get_env("MAIL_FROM").unwrap_or_else(|_| format!("{} <{}>", shop_name, smtp_user));

    let outbox_poll_secs = get_env("OUTBOX_POLL_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid OUTBOX_POLL_SECS: {}", e)))?;
    let outbox_max_attempts = get_env("OUTBOX_MAX_ATTEMPTS")
      .unwrap_or_else(|_| "8".to_string())
      .parse::<i32>()
      .map_err(|e| AppError::Config(format!("Invalid OUTBOX_MAX_ATTEMPTS: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      storage_url,
      storage_service_key,
      proof_bucket,
      bot_token,
      operator_chat_id,
      smtp_host,
      smtp_user,
      smtp_password,
      mail_from,
      shop_name,
      product_name,
      outbox_poll_secs,
      outbox_max_attempts,
    })
  }
}
