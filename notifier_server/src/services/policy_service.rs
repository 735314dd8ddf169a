//! Query string → notification policy and destination.

use std::collections::HashMap;

use crate::error::NotifierError;
use crate::models::policy::{Envelope, NotificationPolicy, RequestOptions};

/// Strategy used when a request names none at all.
pub const DEFAULT_ON_FINISHED: &str = "Fs";
/// Strategy implied by the legacy `always_notify` flag.
pub const ALWAYS_ON_FINISHED: &str = "FS";

/// Parse the webhook query parameters.
///
/// `trace_override` forces tracing on regardless of the `trace` parameter.
pub fn parse_options(
    query: &HashMap<String, String>,
    trace_override: bool,
) -> Result<RequestOptions, NotifierError> {
    let policy = parse_policy(query);
    let envelope = parse_envelope(query)?;
    let trace = trace_override || is_truthy(query.get("trace"));

    Ok(RequestOptions {
        policy,
        envelope,
        trace,
    })
}

/// `onStart`/`onFinished` win when either is present; otherwise the legacy
/// `notstrat` and `always_notify` aliases decide `onFinished`.
pub fn parse_policy(query: &HashMap<String, String>) -> NotificationPolicy {
    let on_start = query.get("onStart");
    let on_finished = query.get("onFinished");

    if on_start.is_none() && on_finished.is_none() {
        let on_finished = match query.get("notstrat").filter(|s| !s.is_empty()) {
            Some(notstrat) => notstrat.as_str(),
            None if is_truthy(query.get("always_notify")) => ALWAYS_ON_FINISHED,
            None => DEFAULT_ON_FINISHED,
        };
        return NotificationPolicy::new("", on_finished);
    }

    NotificationPolicy::new(
        on_start.cloned().unwrap_or_default(),
        on_finished.cloned().unwrap_or_default(),
    )
}

/// Exactly one of `room` and `user` must be given. `type` rides along on the user payload.
pub fn parse_envelope(query: &HashMap<String, String>) -> Result<Envelope, NotifierError> {
    let room = non_empty(query.get("room"));
    let user = non_empty(query.get("user"));
    let kind = non_empty(query.get("type")).map(str::to_string);

    let envelope = match (room, user) {
        (Some(_), Some(_)) => {
            return Err(NotifierError::Configuration(
                "Cannot use room and user together".to_string(),
            ))
        }
        (None, None) => {
            return Err(NotifierError::Configuration(
                "Must use room or user".to_string(),
            ))
        }
        (Some(room), None) => Envelope::room(room),
        (None, Some(user)) => Envelope::user(user),
    };

    Ok(envelope.with_kind(kind))
}

/// Present, non-empty, and not an explicit "off" value.
pub fn is_truthy(value: Option<&String>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn always_notify_means_fs() {
        let policy = parse_policy(&query(&[("room", "#ci"), ("always_notify", "1")]));
        assert_eq!(policy, NotificationPolicy::new("", "FS"));
    }

    #[test]
    fn notstrat_is_used_verbatim() {
        let policy = parse_policy(&query(&[("room", "#ci"), ("notstrat", "FS")]));
        assert_eq!(policy, NotificationPolicy::new("", "FS"));

        let policy = parse_policy(&query(&[("notstrat", "fs"), ("always_notify", "1")]));
        assert_eq!(policy, NotificationPolicy::new("", "fs"));
    }

    #[test]
    fn default_is_fs_lowercase_success() {
        let policy = parse_policy(&query(&[("room", "#ci")]));
        assert_eq!(policy, NotificationPolicy::new("", "Fs"));

        let policy = parse_policy(&query(&[("always_notify", "0")]));
        assert_eq!(policy, NotificationPolicy::new("", "Fs"));
    }

    #[test]
    fn explicit_strategies_ignore_legacy_aliases() {
        let policy = parse_policy(&query(&[("onStart", "FS"), ("always_notify", "1")]));
        assert_eq!(policy, NotificationPolicy::new("FS", ""));

        let policy = parse_policy(&query(&[("onFinished", "f"), ("notstrat", "FS")]));
        assert_eq!(policy, NotificationPolicy::new("", "f"));

        let policy = parse_policy(&query(&[("onStart", ""), ("notstrat", "FS")]));
        assert_eq!(policy, NotificationPolicy::new("", ""));
    }

    #[test]
    fn room_and_user_are_exclusive() {
        let err = parse_envelope(&query(&[("room", "X"), ("user", "Y")])).unwrap_err();
        assert!(matches!(err, NotifierError::Configuration(_)));
        assert_eq!(err.to_string(), "Cannot use room and user together");

        let err = parse_envelope(&query(&[])).unwrap_err();
        assert!(matches!(err, NotifierError::Configuration(_)));
        assert_eq!(err.to_string(), "Must use room or user");
    }

    #[test]
    fn room_envelope_carries_room_twice() {
        let envelope = parse_envelope(&query(&[("room", "#halkeye")])).unwrap();
        assert_eq!(envelope.room.as_deref(), Some("#halkeye"));
        assert_eq!(envelope.user.room.as_deref(), Some("#halkeye"));
        assert_eq!(envelope.user.user, None);
    }

    #[test]
    fn type_is_attached_to_user_payload() {
        let envelope = parse_envelope(&query(&[("user", "alice"), ("type", "groupchat")])).unwrap();
        assert_eq!(envelope.room, None);
        assert_eq!(envelope.user.user.as_deref(), Some("alice"));
        assert_eq!(envelope.user.kind.as_deref(), Some("groupchat"));

        let envelope = parse_envelope(&query(&[("room", "#ci"), ("type", "groupchat")])).unwrap();
        assert_eq!(envelope.user.kind.as_deref(), Some("groupchat"));
    }

    #[test]
    fn trace_flag_and_override() {
        let q = query(&[("room", "#ci"), ("trace", "1")]);
        assert!(parse_options(&q, false).unwrap().trace);

        let q = query(&[("room", "#ci")]);
        assert!(!parse_options(&q, false).unwrap().trace);
        assert!(parse_options(&q, true).unwrap().trace);
    }
}
