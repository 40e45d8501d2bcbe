// src/pipelines/outbox.rs

//! Notification outbox: every outbound message is persisted as an intent
//! before delivery, so a failed send is retried by the background
//! dispatcher instead of being lost with the request that caused it.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::order::OrderStatus;
use crate::models::outbox::{IntentKind, IntentStatus, NotificationIntent};
use crate::pipelines::render;
use crate::state::AppState;

const DISPATCH_BATCH: usize = 32;
/// Base delay of the exponential backoff between attempts.
const RETRY_BASE_SECS: i64 = 30;
/// Backoff stops doubling past this exponent.
const RETRY_CAP_EXPONENT: u32 = 6;

/// Attempts delivery of one intent, updating its outbox row either way.
///
/// Failure increments the attempt count and reschedules the intent (or
/// marks it failed once the attempt budget is spent), then surfaces the
/// delivery error to the caller.
#[instrument(skip(state, intent), fields(intent_id = %intent.id, kind = ?intent.kind, order_number = %intent.order_number))]
pub async fn deliver(state: &AppState, mut intent: NotificationIntent) -> Result<()> {
  match send(state, &intent).await {
    Ok(()) => {
      intent.status = IntentStatus::Delivered;
      state.storage.update_intent(&intent).await?;
      info!("Notification delivered");
      Ok(())
    }
    Err(e) => {
      intent.attempts += 1;
      if intent.attempts >= state.config.outbox_max_attempts {
        intent.status = IntentStatus::Failed;
        warn!("Notification failed permanently after {} attempts: {}", intent.attempts, e);
      } else {
        let exponent = (intent.attempts as u32 - 1).min(RETRY_CAP_EXPONENT);
        intent.next_attempt_at = Utc::now() + ChronoDuration::seconds(RETRY_BASE_SECS << exponent);
        warn!("Notification attempt {} failed, retrying later: {}", intent.attempts, e);
      }
      state.storage.update_intent(&intent).await?;
      Err(e)
    }
  }
}

/// Renders the intent from the current order row and pushes it through the
/// matching gateway.
async fn send(state: &AppState, intent: &NotificationIntent) -> Result<()> {
  let order = state
    .storage
    .find_order(&intent.order_number)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order '{}' vanished before notification", intent.order_number)))?;

  match intent.kind {
    IntentKind::OperatorAlert => {
      let text = render::operator_alert_text(&order);
      state.messaging.send_order_alert(&text, &order.order_number).await
    }
    IntentKind::OperatorEdit => {
      let (chat_id, message_id) = intent
        .chat_id
        .zip(intent.message_id)
        .ok_or_else(|| AppError::Internal("Operator edit intent without message coordinates".to_string()))?;
      let text = render::operator_update_text(&order);
      state.messaging.edit_message(chat_id, message_id, &text).await
    }
    IntentKind::BuyerEmail => {
      let (subject, html) = match order.status {
        OrderStatus::Confirmed => render::confirmation_email(&state.config, &order),
        OrderStatus::Rejected => render::rejection_email(&state.config, &order),
        OrderStatus::Pending => {
          return Err(AppError::Internal(format!(
            "Order '{}' has no decision to email about",
            order.order_number
          )));
        }
      };
      state.mail.send_html(&order.email, &subject, &html).await
    }
  }
}

/// One dispatcher pass: delivers every due pending intent.
pub async fn deliver_due(state: &AppState) -> Result<usize> {
  let due = state.storage.due_intents(DISPATCH_BATCH).await?;
  let total = due.len();
  let mut delivered = 0;
  for intent in due {
    if deliver(state, intent).await.is_ok() {
      delivered += 1;
    }
  }
  if total > 0 {
    info!("Outbox pass delivered {}/{} due notifications", delivered, total);
  }
  Ok(delivered)
}

/// Background loop that keeps retrying undelivered notifications.
pub async fn run_dispatcher(state: AppState) {
  let mut ticker = tokio::time::interval(Duration::from_secs(state.config.outbox_poll_secs));
  ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
  loop {
    ticker.tick().await;
    if let Err(e) = deliver_due(&state).await {
      warn!("Outbox pass failed: {}", e);
    }
  }
}
