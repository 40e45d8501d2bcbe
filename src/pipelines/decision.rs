// src/pipelines/decision.rs

//! Decision callback flow: parse the operator's button press, flip the
//! order status, then refresh the operator message and email the buyer.
//!
//! There is no idempotency guard: replaying a callback re-runs the update
//! and re-queues both notifications.

use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::order::{Order, OrderStatus};
use crate::models::outbox::NotificationIntent;
use crate::pipelines::outbox;
use crate::state::AppState;

// --- Callback payload (messaging gateway webhook body) ---

#[derive(Debug, Deserialize)]
pub struct CallbackUpdate {
  pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
  pub message: CallbackMessage,
  pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackMessage {
  pub chat: CallbackChat,
  pub message_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackChat {
  pub id: i64,
}

/// The decisions the inline keyboard can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Confirm,
  Reject,
}

impl Decision {
  fn status(self) -> OrderStatus {
    match self {
      Decision::Confirm => OrderStatus::Confirmed,
      Decision::Reject => OrderStatus::Rejected,
    }
  }
}

/// Splits `"confirm_KDF-12345"` into a decision and an order number.
/// Anything that is not exactly a known action plus a non-empty order
/// number is rejected rather than defaulted to a rejection.
pub(crate) fn parse_callback_data(data: &str) -> Result<(Decision, &str)> {
  let (action, order_number) = data
    .split_once('_')
    .ok_or_else(|| AppError::MalformedCallback(format!("Invalid callback data: '{}'", data)))?;
  if order_number.is_empty() {
    return Err(AppError::MalformedCallback(format!("Invalid callback data: '{}'", data)));
  }
  let decision = match action {
    "confirm" => Decision::Confirm,
    "reject" => Decision::Reject,
    other => {
      return Err(AppError::MalformedCallback(format!("Unknown callback action: '{}'", other)));
    }
  };
  Ok((decision, order_number))
}

/// Runs the decision flow and returns the updated order.
#[instrument(name = "pipeline::apply_decision", skip(state, update))]
pub async fn apply_decision(state: &AppState, update: CallbackUpdate) -> Result<Order> {
  let callback = update
    .callback_query
    .ok_or_else(|| AppError::MalformedCallback("No callback query found".to_string()))?;
  let (decision, order_number) = parse_callback_data(&callback.data)?;

  let order = state
    .storage
    .find_order(order_number)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  let new_status = decision.status();
  state.storage.update_order_status(order_number, new_status).await?;
  info!("Order {} marked {}", order_number, new_status.label());

  // Both notifications are queued before the first delivery attempt, so a
  // failure below leaves durable intents for the dispatcher.
  let edit = NotificationIntent::operator_edit(order_number, callback.message.chat.id, callback.message.message_id);
  let email = NotificationIntent::buyer_email(order_number);
  state.storage.insert_intent(&edit).await?;
  state.storage.insert_intent(&email).await?;

  outbox::deliver(state, edit).await?;
  outbox::deliver(state, email).await?;

  Ok(Order {
    status: new_status,
    ..order
  })
}
