//! Jenkins webhook handler — decodes the notification and runs it through the decision engine.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::{Map, Value};

use crate::error::NotifierError;
use crate::models::build_event::BuildEvent;
use crate::services::decision_engine::{self, Classification};
use crate::services::policy_service;

use super::NotifierState;

const UNPROCESSABLE_BODY: &str = "Unable to process data - data empty or not an object";

/// Handle an incoming Jenkins notification.
///
/// The query string is parsed before the body so a misconfigured request
/// never reaches the status store.
pub async fn handle_webhook(
    state: &NotifierState,
    query: &HashMap<String, String>,
    body: &[u8],
) -> Result<StatusCode, NotifierError> {
    let options = policy_service::parse_options(query, state.config.trace_all)?;
    let event = parse_event(body)?;

    let phase = event.phase().as_str().to_string();
    crate::metrics::webhook_received(&phase);

    if options.trace {
        tracing::info!(
            job = %event.name,
            phase = %phase,
            status = ?event.status(),
            number = %event.build.number,
            policy = ?options.policy,
            "jenkins-notifier: incoming request"
        );
    } else {
        tracing::debug!(job = %event.name, phase = %phase, "jenkins-notifier: incoming request");
    }

    let mut classification = Classification::default();
    let record = state.store.transition(&event.name, &mut |prior| {
        classification = decision_engine::classify(&event, prior, &options.policy);
        classification.update.clone()
    });

    if classification.messages.is_empty() {
        crate::metrics::message_suppressed(&phase);
        if options.trace {
            tracing::info!(
                job = %event.name,
                last_status = ?record.last_status,
                "Not sending message, not necessary"
            );
        }
    }

    for message in &classification.messages {
        match state.dispatcher.send(&options.envelope, message).await {
            Ok(()) => crate::metrics::message_sent(),
            Err(e) => {
                crate::metrics::dispatch_failed();
                tracing::warn!(job = %event.name, "Failed to deliver notification: {e:#}");
            }
        }
    }

    Ok(StatusCode::OK)
}

/// Decode and validate a webhook body.
pub fn parse_event(body: &[u8]) -> Result<BuildEvent, NotifierError> {
    let object = decode_body(body)
        .filter(|object| object.get("build").is_some_and(Value::is_object))
        .ok_or_else(|| NotifierError::Validation(UNPROCESSABLE_BODY.to_string()))?;

    serde_json::from_value(Value::Object(object))
        .map_err(|e| NotifierError::Validation(format!("Invalid build notification: {e}")))
}

/// Body as a JSON object, whatever encoding the sender chose.
///
/// Senders that post JSON with a form content type produce a single form
/// key holding the whole document; that key is parsed a second time.
fn decode_body(body: &[u8]) -> Option<Map<String, Value>> {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return None,
        Err(_) => form_object(body),
    };

    match unwrap_single_key(&object) {
        Ok(Value::Object(inner)) => Some(inner),
        Ok(_) => Some(object),
        Err(e) => {
            tracing::trace!("Body is not double-encoded: {e}");
            Some(object)
        }
    }
}

fn unwrap_single_key(object: &Map<String, Value>) -> Result<Value, NotifierError> {
    let mut keys = object.keys();
    match (keys.next(), keys.next()) {
        (Some(key), None) => Ok(serde_json::from_str(key)?),
        _ => Ok(Value::Null),
    }
}

fn form_object(body: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::build_event::Phase;

    const EVENT: &str = r#"{"name":"JobName","url":"JobUrl","build":{"number":1,"phase":"FINISHED","status":"FAILURE","url":"job/x/5"}}"#;

    #[test]
    fn raw_json_body() {
        let event = parse_event(EVENT.as_bytes()).unwrap();
        assert_eq!(event.name, "JobName");
        assert_eq!(event.build.phase, Phase::Finalized);
    }

    #[test]
    fn json_wrapped_in_a_single_key() {
        let mut wrapper = Map::new();
        wrapper.insert(EVENT.to_string(), Value::String(String::new()));
        let wrapped = Value::Object(wrapper).to_string();
        let event = parse_event(wrapped.as_bytes()).unwrap();
        assert_eq!(event.name, "JobName");
    }

    #[test]
    fn json_posted_as_form() {
        let form: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(EVENT, "")
            .finish();
        let event = parse_event(form.as_bytes()).unwrap();
        assert_eq!(event.display_url(), "job/x/5");
    }

    #[test]
    fn missing_build_is_rejected() {
        for body in ["", "[]", "42", r#"{"name":"JobName"}"#, r#"{"name":"JobName","build":"x"}"#] {
            let err = parse_event(body.as_bytes()).unwrap_err();
            assert!(matches!(err, NotifierError::Validation(_)), "{body}");
            assert_eq!(err.to_string(), UNPROCESSABLE_BODY);
        }
    }

    #[test]
    fn missing_phase_is_rejected() {
        let err = parse_event(br#"{"name":"JobName","build":{"number":1}}"#).unwrap_err();
        assert!(matches!(err, NotifierError::Validation(_)));
        assert!(err.to_string().contains("phase"));
    }
}
