// src/web/handlers/order_handlers.rs

use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt as _;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::pipelines::submission::{self, OrderSubmission};
use crate::state::AppState;

/// Upper bound for one uploaded proof image.
const MAX_PROOF_BYTES: usize = 10 * 1024 * 1024;
/// Upper bound for a single text field.
const MAX_TEXT_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
struct OrderFormFields {
  order_number: Option<String>,
  first_name: Option<String>,
  last_name: Option<String>,
  email: Option<String>,
  phone: Option<String>,
  address: Option<String>,
  city: Option<String>,
  state: Option<String>,
  zip_code: Option<String>,
  amount: Option<String>,
  /// Filename, content type, bytes.
  proof: Option<(String, String, Vec<u8>)>,
}

async fn read_field_bytes(field: &mut Field, limit: usize) -> Result<Vec<u8>> {
  let mut bytes = Vec::new();
  while let Some(chunk) = field.next().await {
    let chunk = chunk.map_err(|e| AppError::Validation(format!("Unreadable multipart field: {}", e)))?;
    if bytes.len() + chunk.len() > limit {
      return Err(AppError::Validation("Uploaded part is too large".to_string()));
    }
    bytes.extend_from_slice(&chunk);
  }
  Ok(bytes)
}

async fn read_text_field(field: &mut Field) -> Result<String> {
  let bytes = read_field_bytes(field, MAX_TEXT_BYTES).await?;
  String::from_utf8(bytes).map_err(|_| AppError::Validation("Form fields must be UTF-8 text".to_string()))
}

async fn collect_form(mut payload: Multipart) -> Result<OrderFormFields> {
  let mut form = OrderFormFields::default();
  while let Some(item) = payload.next().await {
    let mut field = item.map_err(|e| AppError::Validation(format!("Malformed multipart payload: {}", e)))?;
    let name = field.name().to_string();
    match name.as_str() {
      "orderNumber" => form.order_number = Some(read_text_field(&mut field).await?),
      "firstName" => form.first_name = Some(read_text_field(&mut field).await?),
      "lastName" => form.last_name = Some(read_text_field(&mut field).await?),
      "email" => form.email = Some(read_text_field(&mut field).await?),
      "phone" => form.phone = Some(read_text_field(&mut field).await?),
      "address" => form.address = Some(read_text_field(&mut field).await?),
      "city" => form.city = Some(read_text_field(&mut field).await?),
      "state" => form.state = Some(read_text_field(&mut field).await?),
      "zipCode" => form.zip_code = Some(read_text_field(&mut field).await?),
      "amount" => form.amount = Some(read_text_field(&mut field).await?),
      "paymentProof" => {
        let filename = field
          .content_disposition()
          .get_filename()
          .unwrap_or("payment-proof")
          .to_string();
        let content_type = field
          .content_type()
          .map(|m| m.to_string())
          .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = read_field_bytes(&mut field, MAX_PROOF_BYTES).await?;
        form.proof = Some((filename, content_type, bytes));
      }
      _ => {
        // Unknown parts are drained and ignored.
        read_field_bytes(&mut field, MAX_PROOF_BYTES).await?;
      }
    }
  }
  Ok(form)
}

#[instrument(name = "handler::submit_order", skip(app_state, payload))]
pub async fn submit_order_handler(app_state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
  let form = collect_form(payload).await?;

  let missing = |name: &str| {
    AppError::Validation(format!(
      "All fields are required, including payment proof ('{}' is missing)",
      name
    ))
  };
  let (proof_filename, proof_content_type, proof_bytes) = form.proof.ok_or_else(|| missing("paymentProof"))?;
  let submission = OrderSubmission {
    order_number: form.order_number.ok_or_else(|| missing("orderNumber"))?,
    first_name: form.first_name.ok_or_else(|| missing("firstName"))?,
    last_name: form.last_name.ok_or_else(|| missing("lastName"))?,
    email: form.email.ok_or_else(|| missing("email"))?,
    phone: form.phone.ok_or_else(|| missing("phone"))?,
    address: form.address.ok_or_else(|| missing("address"))?,
    city: form.city.ok_or_else(|| missing("city"))?,
    state: form.state.ok_or_else(|| missing("state"))?,
    zip_code: form.zip_code.ok_or_else(|| missing("zipCode"))?,
    amount: form.amount.ok_or_else(|| missing("amount"))?,
    proof_filename,
    proof_content_type,
    proof_bytes,
  };

  let order = submission::submit_order(app_state.get_ref(), submission).await?;
  info!("Order {} processed successfully", order.order_number);

  Ok(HttpResponse::Ok().json(json!({ "message": "Order saved successfully", "data": order })))
}
