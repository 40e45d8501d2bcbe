// src/lib.rs

//! Storefront backend for a single-product shop.
//!
//! Orders arrive as multipart submissions with a payment-proof image, are
//! persisted as `pending` through a hosted storage gateway, and are
//! announced to an operator chat with inline confirm/reject controls. The
//! operator's button press comes back as a webhook callback that flips the
//! order status, rewrites the operator message, and emails the buyer the
//! result. Every outbound notification goes through a persisted outbox so
//! a failed delivery is retried instead of dropped.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;
