// src/models/mod.rs

//! Data structures mirroring the rows kept at the storage gateway.

pub mod order;
pub mod outbox;

pub use order::{Order, OrderStatus};
pub use outbox::{IntentKind, IntentStatus, NotificationIntent};
