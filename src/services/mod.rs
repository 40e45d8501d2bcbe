// src/services/mod.rs

//! Clients for the three hosted gateways this service glues together.
//! Each gateway is a trait so the request layer owns injected objects
//! rather than module-level singletons, and tests can swap in doubles.

pub mod mail;
pub mod messaging;
pub mod storage;

pub use mail::{MailGateway, SmtpMailer};
pub use messaging::{MessagingGateway, TelegramGateway};
pub use storage::{RestStorage, StorageGateway};
