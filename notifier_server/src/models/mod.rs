//! Notifier data models — webhook payloads and per-request options.

pub mod build_event;
pub mod policy;
