// src/models/outbox.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a queued notification does once it is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
  OperatorAlert,
  OperatorEdit,
  BuyerEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
  Pending,
  Delivered,
  Failed,
}

/// One row in the notification outbox.
///
/// Message content is never stored here; it is rendered from the current
/// order row at delivery time, so a retried intent reflects the order's
/// state at the moment it finally goes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationIntent {
  pub id: Uuid,
  pub order_number: String,
  pub kind: IntentKind,
  /// Coordinates of the operator message to edit, for `OperatorEdit` only.
  pub chat_id: Option<i64>,
  pub message_id: Option<i64>,
  pub status: IntentStatus,
  pub attempts: i32,
  pub next_attempt_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl NotificationIntent {
  fn new(order_number: &str, kind: IntentKind) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      order_number: order_number.to_string(),
      kind,
      chat_id: None,
      message_id: None,
      status: IntentStatus::Pending,
      attempts: 0,
      next_attempt_at: now,
      created_at: now,
    }
  }

  pub fn operator_alert(order_number: &str) -> Self {
    Self::new(order_number, IntentKind::OperatorAlert)
  }

  pub fn operator_edit(order_number: &str, chat_id: i64, message_id: i64) -> Self {
    Self {
      chat_id: Some(chat_id),
      message_id: Some(message_id),
      ..Self::new(order_number, IntentKind::OperatorEdit)
    }
  }

  pub fn buyer_email(order_number: &str) -> Self {
    Self::new(order_number, IntentKind::BuyerEmail)
  }
}
