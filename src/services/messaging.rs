// src/services/messaging.rs

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Operator-facing chat channel with actionable inline controls.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
  /// Sends the new-order announcement to the operator chat with inline
  /// confirm/reject buttons whose callback payloads carry the order number.
  async fn send_order_alert(&self, text: &str, order_number: &str) -> Result<()>;

  /// Rewrites a previously sent operator message in place.
  async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;
}

pub struct TelegramGateway {
  client: reqwest::Client,
  bot_token: String,
  operator_chat_id: String,
}

impl TelegramGateway {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      client: reqwest::Client::new(),
      bot_token: config.bot_token.clone(),
      operator_chat_id: config.operator_chat_id.clone(),
    }
  }

  async fn call(&self, method: &str, payload: serde_json::Value) -> Result<()> {
    let url = format!("{}/bot{}/{}", API_BASE, self.bot_token, method);
    let response = self
      .client
      .post(url)
      .json(&payload)
      .send()
      .await
      .map_err(|e| AppError::Notification(format!("Telegram '{}' request failed: {}", method, e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(AppError::Notification(format!("Telegram '{}' rejected ({}): {}", method, status, body)));
    }
    Ok(())
  }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
  #[instrument(skip(self, text))]
  async fn send_order_alert(&self, text: &str, order_number: &str) -> Result<()> {
    self
      .call(
        "sendMessage",
        json!({
          "chat_id": self.operator_chat_id,
          "text": text,
          "parse_mode": "Markdown",
          "reply_markup": {
            "inline_keyboard": [[
              { "text": "✅ Confirm", "callback_data": format!("confirm_{}", order_number) },
              { "text": "❌ Reject", "callback_data": format!("reject_{}", order_number) },
            ]]
          },
        }),
      )
      .await
  }

  #[instrument(skip(self, text))]
  async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
    self
      .call(
        "editMessageText",
        json!({
          "chat_id": chat_id,
          "message_id": message_id,
          "text": text,
          "parse_mode": "Markdown",
        }),
      )
      .await
  }
}
