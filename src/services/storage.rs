// src/services/storage.rs

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde_json::json;
use tracing::instrument;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::order::{Order, OrderStatus};
use crate::models::outbox::NotificationIntent;

/// Durable record store for orders and queued notifications, plus the
/// object store holding payment-proof images.
///
/// Backed by the hosted storage service in production ([`RestStorage`]) and
/// by in-memory doubles in tests.
#[async_trait]
pub trait StorageGateway: Send + Sync {
  /// Inserts the order row and returns the stored representation.
  async fn insert_order(&self, order: &Order) -> Result<Order>;

  /// Looks an order up by its number. Returns the first match; order
  /// numbers are not guaranteed unique at write time.
  async fn find_order(&self, order_number: &str) -> Result<Option<Order>>;

  async fn update_order_status(&self, order_number: &str, status: OrderStatus) -> Result<()>;

  /// Stores the payment proof bytes under `key` in the proof bucket.
  async fn upload_payment_proof(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<()>;

  /// Publicly resolvable URL for an object uploaded under `key`.
  fn payment_proof_url(&self, key: &str) -> String;

  async fn insert_intent(&self, intent: &NotificationIntent) -> Result<()>;

  /// Pending intents whose next attempt is due, oldest first.
  async fn due_intents(&self, limit: usize) -> Result<Vec<NotificationIntent>>;

  /// Persists the intent's current status/attempt bookkeeping.
  async fn update_intent(&self, intent: &NotificationIntent) -> Result<()>;
}

/// Client for a PostgREST-style hosted backend: rows under `/rest/v1`,
/// objects under `/storage/v1`.
pub struct RestStorage {
  client: reqwest::Client,
  base_url: String,
  service_key: String,
  proof_bucket: String,
}

impl RestStorage {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: config.storage_url.trim_end_matches('/').to_string(),
      service_key: config.storage_service_key.clone(),
      proof_bucket: config.proof_bucket.clone(),
    }
  }

  fn table_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, table)
  }

  fn authed(&self, request: RequestBuilder) -> RequestBuilder {
    request.header("apikey", &self.service_key).bearer_auth(&self.service_key)
  }

  /// Maps a non-2xx response into a storage error carrying the body text.
  async fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Storage(format!("{} rejected ({}): {}", what, status, body)))
  }
}

#[async_trait]
impl StorageGateway for RestStorage {
  #[instrument(skip(self, order), fields(order_number = %order.order_number))]
  async fn insert_order(&self, order: &Order) -> Result<Order> {
    let response = self
      .authed(self.client.post(self.table_url("orders")))
      .header("Prefer", "return=representation")
      .json(&[order])
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Order insert request failed: {}", e)))?;
    let response = Self::check(response, "Order insert").await?;

    let rows: Vec<Order> = response
      .json()
      .await
      .map_err(|e| AppError::Storage(format!("Order insert returned an unreadable row: {}", e)))?;
    rows
      .into_iter()
      .next()
      .ok_or_else(|| AppError::Storage("Order insert returned no row".to_string()))
  }

  #[instrument(skip(self))]
  async fn find_order(&self, order_number: &str) -> Result<Option<Order>> {
    let response = self
      .authed(self.client.get(self.table_url("orders")))
      .query(&[("order_number", format!("eq.{}", order_number)), ("select", "*".to_string())])
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Order lookup request failed: {}", e)))?;
    let response = Self::check(response, "Order lookup").await?;

    let rows: Vec<Order> = response
      .json()
      .await
      .map_err(|e| AppError::Storage(format!("Order lookup returned unreadable rows: {}", e)))?;
    Ok(rows.into_iter().next())
  }

  #[instrument(skip(self))]
  async fn update_order_status(&self, order_number: &str, status: OrderStatus) -> Result<()> {
    let response = self
      .authed(self.client.patch(self.table_url("orders")))
      .query(&[("order_number", format!("eq.{}", order_number))])
      .json(&json!({ "status": status }))
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Order status update request failed: {}", e)))?;
    Self::check(response, "Order status update").await?;
    Ok(())
  }

  #[instrument(skip(self, bytes), fields(size = bytes.len()))]
  async fn upload_payment_proof(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
    let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.proof_bucket, key);
    let response = self
      .authed(self.client.post(url))
      .header(CONTENT_TYPE, content_type)
      .body(bytes.to_vec())
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Payment proof upload request failed: {}", e)))?;
    Self::check(response, "Payment proof upload").await?;
    Ok(())
  }

  fn payment_proof_url(&self, key: &str) -> String {
    format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.proof_bucket, key)
  }

  #[instrument(skip(self, intent), fields(intent_id = %intent.id))]
  async fn insert_intent(&self, intent: &NotificationIntent) -> Result<()> {
    let response = self
      .authed(self.client.post(self.table_url("notification_outbox")))
      .json(&[intent])
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Intent insert request failed: {}", e)))?;
    Self::check(response, "Intent insert").await?;
    Ok(())
  }

  #[instrument(skip(self))]
  async fn due_intents(&self, limit: usize) -> Result<Vec<NotificationIntent>> {
    let response = self
      .authed(self.client.get(self.table_url("notification_outbox")))
      .query(&[
        ("status", "eq.pending".to_string()),
        ("next_attempt_at", format!("lte.{}", Utc::now().to_rfc3339())),
        ("order", "next_attempt_at.asc".to_string()),
        ("limit", limit.to_string()),
      ])
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Intent listing request failed: {}", e)))?;
    let response = Self::check(response, "Intent listing").await?;

    response
      .json()
      .await
      .map_err(|e| AppError::Storage(format!("Intent listing returned unreadable rows: {}", e)))
  }

  #[instrument(skip(self, intent), fields(intent_id = %intent.id))]
  async fn update_intent(&self, intent: &NotificationIntent) -> Result<()> {
    let response = self
      .authed(self.client.patch(self.table_url("notification_outbox")))
      .query(&[("id", format!("eq.{}", intent.id))])
      .json(&json!({
        "status": intent.status,
        "attempts": intent.attempts,
        "next_attempt_at": intent.next_attempt_at,
      }))
      .send()
      .await
      .map_err(|e| AppError::Storage(format!("Intent update request failed: {}", e)))?;
    Self::check(response, "Intent update").await?;
    Ok(())
  }
}
