// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Rejected,
}

impl OrderStatus {
  /// Capitalized form shown in operator messages.
  pub fn label(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "Pending",
      OrderStatus::Confirmed => "Confirmed",
      OrderStatus::Rejected => "Rejected",
    }
  }
}

/// One purchase record. The order number is a client-generated natural key
/// (`PREFIX-NNNNN`); no uniqueness is enforced at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  pub order_number: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub amount: f64,
  pub payment_proof_url: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}
