// tests/common/mod.rs
#![allow(dead_code)] // Not every helper is used by every test binary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use storefront::config::AppConfig;
use storefront::errors::{AppError, Result};
use storefront::models::order::{Order, OrderStatus};
use storefront::models::outbox::{IntentStatus, NotificationIntent};
use storefront::services::{MailGateway, MessagingGateway, StorageGateway};
use storefront::state::AppState;

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    storage_url: "http://storage.invalid".to_string(),
    storage_service_key: "test-key".to_string(),
    proof_bucket: "payment-proofs".to_string(),
    bot_token: "test-token".to_string(),
    operator_chat_id: "42".to_string(),
    smtp_host: "smtp.invalid".to_string(),
    smtp_user: "shop@example.com".to_string(),
    smtp_password: "secret".to_string(),
    mail_from: "Shop <shop@example.com>".to_string(),
    shop_name: "Dire Tracksuit".to_string(),
    product_name: "Dire Khadaffi Track Suit".to_string(),
    outbox_poll_secs: 30,
    outbox_max_attempts: 8,
  }
}

/// In-memory stand-in for the hosted table/object store.
#[derive(Default)]
pub struct MemoryStorage {
  pub orders: Mutex<Vec<Order>>,
  pub intents: Mutex<Vec<NotificationIntent>>,
  pub objects: Mutex<HashMap<String, Vec<u8>>>,
  pub fail_uploads: AtomicBool,
  pub fail_inserts: AtomicBool,
}

#[async_trait]
impl StorageGateway for MemoryStorage {
  async fn insert_order(&self, order: &Order) -> Result<Order> {
    if self.fail_inserts.load(Ordering::SeqCst) {
      return Err(AppError::Storage("record store offline".to_string()));
    }
    self.orders.lock().unwrap().push(order.clone());
    Ok(order.clone())
  }

  async fn find_order(&self, order_number: &str) -> Result<Option<Order>> {
    Ok(
      self
        .orders
        .lock()
        .unwrap()
        .iter()
        .find(|o| o.order_number == order_number)
        .cloned(),
    )
  }

  async fn update_order_status(&self, order_number: &str, status: OrderStatus) -> Result<()> {
    for order in self.orders.lock().unwrap().iter_mut() {
      if order.order_number == order_number {
        order.status = status;
      }
    }
    Ok(())
  }

  async fn upload_payment_proof(&self, key: &str, _content_type: &str, bytes: &[u8]) -> Result<()> {
    if self.fail_uploads.load(Ordering::SeqCst) {
      return Err(AppError::Storage("object store offline".to_string()));
    }
    self.objects.lock().unwrap().insert(key.to_string(), bytes.to_vec());
    Ok(())
  }

  fn payment_proof_url(&self, key: &str) -> String {
    format!("http://storage.invalid/storage/v1/object/public/payment-proofs/{}", key)
  }

  async fn insert_intent(&self, intent: &NotificationIntent) -> Result<()> {
    self.intents.lock().unwrap().push(intent.clone());
    Ok(())
  }

  async fn due_intents(&self, limit: usize) -> Result<Vec<NotificationIntent>> {
    let now = Utc::now();
    let mut due: Vec<NotificationIntent> = self
      .intents
      .lock()
      .unwrap()
      .iter()
      .filter(|i| i.status == IntentStatus::Pending && i.next_attempt_at <= now)
      .cloned()
      .collect();
    due.sort_by_key(|i| i.next_attempt_at);
    due.truncate(limit);
    Ok(due)
  }

  async fn update_intent(&self, intent: &NotificationIntent) -> Result<()> {
    for stored in self.intents.lock().unwrap().iter_mut() {
      if stored.id == intent.id {
        *stored = intent.clone();
      }
    }
    Ok(())
  }
}

/// Records operator-channel traffic instead of calling the bot API.
#[derive(Default)]
pub struct RecordingMessaging {
  /// (text, order_number) per alert sent.
  pub alerts: Mutex<Vec<(String, String)>>,
  /// (chat_id, message_id, text) per edit.
  pub edits: Mutex<Vec<(i64, i64, String)>>,
  pub fail: AtomicBool,
}

#[async_trait]
impl MessagingGateway for RecordingMessaging {
  async fn send_order_alert(&self, text: &str, order_number: &str) -> Result<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(AppError::Notification("messaging gateway offline".to_string()));
    }
    self
      .alerts
      .lock()
      .unwrap()
      .push((text.to_string(), order_number.to_string()));
    Ok(())
  }

  async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(AppError::Notification("messaging gateway offline".to_string()));
    }
    self.edits.lock().unwrap().push((chat_id, message_id, text.to_string()));
    Ok(())
  }
}

/// Records outbound email instead of speaking SMTP.
#[derive(Default)]
pub struct RecordingMail {
  /// (to, subject, html) per message.
  pub sent: Mutex<Vec<(String, String, String)>>,
  pub fail: AtomicBool,
}

#[async_trait]
impl MailGateway for RecordingMail {
  async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(AppError::Mail("mail relay offline".to_string()));
    }
    self
      .sent
      .lock()
      .unwrap()
      .push((to.to_string(), subject.to_string(), html.to_string()));
    Ok(())
  }
}

pub struct TestHarness {
  pub state: AppState,
  pub storage: Arc<MemoryStorage>,
  pub messaging: Arc<RecordingMessaging>,
  pub mail: Arc<RecordingMail>,
}

pub fn harness_with_config(config: AppConfig) -> TestHarness {
  let storage = Arc::new(MemoryStorage::default());
  let messaging = Arc::new(RecordingMessaging::default());
  let mail = Arc::new(RecordingMail::default());
  let state = AppState {
    config: Arc::new(config),
    storage: storage.clone(),
    messaging: messaging.clone(),
    mail: mail.clone(),
  };
  TestHarness {
    state,
    storage,
    messaging,
    mail,
  }
}

pub fn harness() -> TestHarness {
  harness_with_config(test_config())
}

pub fn sample_order(order_number: &str) -> Order {
  Order {
    order_number: order_number.to_string(),
    first_name: "Ana".to_string(),
    last_name: "Putri".to_string(),
    email: "ana@example.com".to_string(),
    phone: "+62 812 0000".to_string(),
    address: "Jl. Merdeka 1".to_string(),
    city: "Jakarta".to_string(),
    state: "DKI".to_string(),
    zip_code: "10110".to_string(),
    amount: 1_500_000.0,
    payment_proof_url: "http://storage.invalid/proofs/proof.jpg".to_string(),
    status: OrderStatus::Pending,
    created_at: Utc::now(),
  }
}

pub fn seed_order(harness: &TestHarness, order: Order) {
  harness.storage.orders.lock().unwrap().push(order);
}

/// Makes every stored intent immediately due again, standing in for the
/// passage of backoff time.
pub fn rewind_backoff(harness: &TestHarness) {
  for intent in harness.storage.intents.lock().unwrap().iter_mut() {
    intent.next_attempt_at = Utc::now() - chrono::Duration::seconds(1);
  }
}

pub fn intent_by_id(harness: &TestHarness, id: Uuid) -> NotificationIntent {
  harness
    .storage
    .intents
    .lock()
    .unwrap()
    .iter()
    .find(|i| i.id == id)
    .cloned()
    .expect("intent should be stored")
}

/// Webhook body the messaging gateway posts for an inline button press.
pub fn callback_body(data: &str) -> serde_json::Value {
  json!({
    "callback_query": {
      "message": { "chat": { "id": 99 }, "message_id": 7 },
      "data": data,
    }
  })
}

/// Raw multipart body for the order form, with an optional proof file part.
pub fn multipart_body(boundary: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  if let Some((name, filename, bytes)) = file {
    body.extend_from_slice(
      format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
  body
}

/// The full set of valid form fields for a `KDF-12345` submission.
pub fn valid_form_fields() -> Vec<(&'static str, &'static str)> {
  vec![
    ("orderNumber", "KDF-12345"),
    ("firstName", "Ana"),
    ("lastName", "Putri"),
    ("email", "ana@example.com"),
    ("phone", "+62 812 0000"),
    ("address", "Jl. Merdeka 1"),
    ("city", "Jakarta"),
    ("state", "DKI"),
    ("zipCode", "10110"),
    ("amount", "1500000"),
  ]
}
