//! notifier.policy — Per-request notification strategy and chat destination.
//!
//! A strategy string is made of `F`/`f`/`S`/`s` flags: `F`ailure and
//! `S`uccess. Upper case means notify always, lower case means notify only
//! when the job's status changed.

use serde::Serialize;

/// Strategy strings for the start and terminal phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationPolicy {
    pub on_start: String,
    pub on_finished: String,
}

impl NotificationPolicy {
    pub fn new(on_start: impl Into<String>, on_finished: impl Into<String>) -> Self {
        Self {
            on_start: on_start.into(),
            on_finished: on_finished.into(),
        }
    }
}

/// Destination handed to the dispatcher alongside each message.
///
/// Serialized as `{ "room": ..., "user": { "user": ..., "room": ..., "type": ... } }`,
/// the shape chat-bot adapters expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub user: EnvelopeUser,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvelopeUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Envelope {
    pub fn room(room: impl Into<String>) -> Self {
        let room = room.into();
        Self {
            room: Some(room.clone()),
            user: EnvelopeUser {
                room: Some(room),
                ..Default::default()
            },
        }
    }

    pub fn user(user: impl Into<String>) -> Self {
        Self {
            room: None,
            user: EnvelopeUser {
                user: Some(user.into()),
                ..Default::default()
            },
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.user.kind = kind;
        self
    }
}

/// Everything the query string of a webhook request decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub policy: NotificationPolicy,
    pub envelope: Envelope,
    pub trace: bool,
}
