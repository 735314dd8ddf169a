//! Notifier services — policy parsing, status tracking, decisions, delivery.

pub mod decision_engine;
pub mod dispatcher;
pub mod policy_service;
pub mod status_store;
