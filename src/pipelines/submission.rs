// src/pipelines/submission.rs

//! Order submission flow: validate the form, upload the payment proof,
//! persist the pending order, then announce it to the operator channel
//! through the notification outbox.
//!
//! Side effects run upload → insert → notify. Earlier steps are not
//! compensated when a later one fails: a failed insert leaves the uploaded
//! proof behind, and a failed announcement leaves a durable order plus a
//! pending outbox intent for the dispatcher to retry.

use chrono::Utc;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::order::{Order, OrderStatus};
use crate::models::outbox::NotificationIntent;
use crate::pipelines::outbox;
use crate::state::AppState;

/// Everything the checkout form posts, with the proof image as raw bytes.
/// `amount` stays textual until validation parses it.
#[derive(Debug, Clone)]
pub struct OrderSubmission {
  pub order_number: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub amount: String,
  pub proof_filename: String,
  pub proof_content_type: String,
  pub proof_bytes: Vec<u8>,
}

/// Superficial `local@domain.tld` shape check; no normalization.
pub(crate) fn is_valid_email(email: &str) -> bool {
  if email.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}

fn validate(submission: &OrderSubmission) -> Result<f64> {
  let required = [
    ("orderNumber", &submission.order_number),
    ("firstName", &submission.first_name),
    ("lastName", &submission.last_name),
    ("email", &submission.email),
    ("phone", &submission.phone),
    ("address", &submission.address),
    ("city", &submission.city),
    ("state", &submission.state),
    ("zipCode", &submission.zip_code),
    ("amount", &submission.amount),
  ];
  for (name, value) in required {
    if value.trim().is_empty() {
      return Err(AppError::Validation(format!(
        "All fields are required, including payment proof ('{}' is missing)",
        name
      )));
    }
  }
  if submission.proof_bytes.is_empty() {
    return Err(AppError::Validation(
      "All fields are required, including payment proof".to_string(),
    ));
  }
  if !is_valid_email(&submission.email) {
    return Err(AppError::Validation("Invalid email format".to_string()));
  }
  submission
    .amount
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|a| a.is_finite())
    .ok_or_else(|| AppError::Validation("Amount must be a valid number".to_string()))
}

/// Runs the full submission flow and returns the stored order.
#[instrument(name = "pipeline::submit_order", skip(state, submission), fields(order_number = %submission.order_number))]
pub async fn submit_order(state: &AppState, submission: OrderSubmission) -> Result<Order> {
  let amount = validate(&submission)?;

  let proof_key = format!("{}-{}", submission.order_number, submission.proof_filename);
  state
    .storage
    .upload_payment_proof(&proof_key, &submission.proof_content_type, &submission.proof_bytes)
    .await?;
  let payment_proof_url = state.storage.payment_proof_url(&proof_key);
  info!("Payment proof uploaded, public URL: {}", payment_proof_url);

  let OrderSubmission {
    order_number,
    first_name,
    last_name,
    email,
    phone,
    address,
    city,
    state: region,
    zip_code,
    ..
  } = submission;
  let order = Order {
    order_number,
    first_name,
    last_name,
    email,
    phone,
    address,
    city,
    state: region,
    zip_code,
    amount,
    payment_proof_url,
    status: OrderStatus::Pending,
    created_at: Utc::now(),
  };
  let stored = state.storage.insert_order(&order).await?;
  info!("Order {} persisted as pending", stored.order_number);

  // The alert is queued before the first delivery attempt, so a failure here
  // still leaves a durable intent for the dispatcher.
  let intent = NotificationIntent::operator_alert(&stored.order_number);
  state.storage.insert_intent(&intent).await?;
  outbox::deliver(state, intent).await?;

  Ok(stored)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_submission() -> OrderSubmission {
    OrderSubmission {
      order_number: "KDF-12345".to_string(),
      first_name: "Ana".to_string(),
      last_name: "Putri".to_string(),
      email: "ana@example.com".to_string(),
      phone: "+62 812 0000".to_string(),
      address: "Jl. Merdeka 1".to_string(),
      city: "Jakarta".to_string(),
      state: "DKI".to_string(),
      zip_code: "10110".to_string(),
      amount: "1500000".to_string(),
      proof_filename: "proof.jpg".to_string(),
      proof_content_type: "image/jpeg".to_string(),
      proof_bytes: vec![0xff, 0xd8],
    }
  }

  #[test]
  fn accepts_basic_email_shapes() {
    assert!(is_valid_email("ana@example.com"));
    assert!(is_valid_email("a.b+c@sub.example.co"));
    assert!(!is_valid_email("not-an-email"));
    assert!(!is_valid_email("no@tld"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("two@@example.com"));
    assert!(!is_valid_email("spa ce@example.com"));
  }

  #[test]
  fn validate_parses_amount() {
    assert_eq!(validate(&sample_submission()).unwrap(), 1_500_000.0);
  }

  #[test]
  fn validate_rejects_blank_required_field() {
    let submission = OrderSubmission {
      phone: "  ".to_string(),
      ..sample_submission()
    };
    assert!(matches!(validate(&submission), Err(AppError::Validation(_))));
  }

  #[test]
  fn validate_rejects_non_numeric_amount() {
    let submission = OrderSubmission {
      amount: "a lot".to_string(),
      ..sample_submission()
    };
    assert!(matches!(validate(&submission), Err(AppError::Validation(_))));
  }

  #[test]
  fn validate_rejects_missing_proof() {
    let submission = OrderSubmission {
      proof_bytes: Vec::new(),
      ..sample_submission()
    };
    assert!(matches!(validate(&submission), Err(AppError::Validation(_))));
  }
}
