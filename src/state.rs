// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{MailGateway, MessagingGateway, StorageGateway};

/// Shared request-handling state.
///
/// Gateways are trait objects constructed in `main`, so tests substitute
/// in-memory doubles for the hosted services.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub storage: Arc<dyn StorageGateway>,
  pub messaging: Arc<dyn MessagingGateway>,
  pub mail: Arc<dyn MailGateway>,
}
