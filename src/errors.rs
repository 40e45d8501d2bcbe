// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Malformed Callback: {0}")]
  MalformedCallback(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Storage Error: {0}")]
  Storage(String),

  #[error("Notification Error: {0}")]
  Notification(String),

  #[error("Mail Error: {0}")]
  Mail(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::MalformedCallback(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Storage(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Storage operation failed", "detail": m}))
      }
      AppError::Notification(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Operator notification failed", "detail": m}))
      }
      AppError::Mail(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Email delivery failed", "detail": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
