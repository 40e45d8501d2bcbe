// src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::fmt::format::FmtSpan;

use storefront::config::AppConfig;
use storefront::pipelines::outbox;
use storefront::services::{RestStorage, SmtpMailer, TelegramGateway};
use storefront::state::AppState;
use storefront::web::routes::configure_app_routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront order service...");

  let config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  // Gateway clients are constructed once here and injected through AppState.
  let app_state = AppState {
    storage: Arc::new(RestStorage::new(&config)),
    messaging: Arc::new(TelegramGateway::new(&config)),
    mail: Arc::new(SmtpMailer::new(&config).context("Failed to initialize SMTP transport")?),
    config: config.clone(),
  };

  // Undelivered notifications are retried out of band.
  tokio::spawn(outbox::run_dispatcher(app_state.clone()));

  let server_address = format!("{}:{}", config.server_host, config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
