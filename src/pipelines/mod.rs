// src/pipelines/mod.rs

//! Request flows, written as explicit step sequences over the injected
//! gateways. Side effects run in a strict order; partial failure after a
//! persist is absorbed by the notification outbox rather than compensated.

pub mod decision;
pub mod outbox;
pub mod render;
pub mod submission;
