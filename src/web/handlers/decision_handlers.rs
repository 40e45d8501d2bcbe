// src/web/handlers/decision_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::Result;
use crate::pipelines::decision::{self, CallbackUpdate};
use crate::state::AppState;

#[instrument(name = "handler::decision_callback", skip(app_state, update))]
pub async fn decision_callback_handler(
  app_state: web::Data<AppState>,
  update: web::Json<CallbackUpdate>,
) -> Result<HttpResponse> {
  let order = decision::apply_decision(app_state.get_ref(), update.into_inner()).await?;
  info!("Order {} decision processed", order.order_number);
  Ok(HttpResponse::Ok().json(json!({ "message": "Order status updated and email sent" })))
}

/// Liveness probe for the callback registration.
pub async fn decision_probe_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "message": "Decision callback endpoint is active" }))
}
