// src/web/routes.rs

use actix_web::web;

// Static acknowledgment; downstream gateways are not probed here.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/orders")
        .route(
          "",
          web::post().to(crate::web::handlers::order_handlers::submit_order_handler),
        )
        .route(
          "/decision",
          web::post().to(crate::web::handlers::decision_handlers::decision_callback_handler),
        )
        .route(
          "/decision",
          web::get().to(crate::web::handlers::decision_handlers::decision_probe_handler),
        ),
    );
}
