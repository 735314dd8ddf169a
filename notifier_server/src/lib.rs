//! Jenkins Notifier — turns Jenkins build notifications into chat messages.
//!
//! Jenkins' Notification Plugin posts every build phase to the webhook.
//! The notifier remembers the last outcome of each job and, following the
//! per-request strategy, decides whether the event is worth a message:
//! a first failure, a job still failing, a restored build, and so on.

pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
