//! Notification decisions — which build events become chat messages.
//!
//! `classify` is pure: it reads the job's prior record and the request
//! policy and returns the messages to send plus the status update the
//! caller must write back to the store.

use crate::events::status::{JobStatus, StatusUpdate};
use crate::models::build_event::{BuildEvent, BuildStatus, Outcome, Phase};
use crate::models::policy::NotificationPolicy;

/// Result of classifying one build event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub messages: Vec<String>,
    pub update: Option<StatusUpdate>,
}

type PhaseHandler = fn(&BuildEvent, &JobStatus, &NotificationPolicy) -> Classification;

fn handler_for(phase: &Phase) -> PhaseHandler {
    match phase {
        Phase::Started => on_started,
        Phase::Completed => on_completed,
        Phase::Finalized => on_finalized,
        Phase::Other(_) => ignore,
    }
}

/// Classify `event` against the job's `prior` record.
pub fn classify(
    event: &BuildEvent,
    prior: &JobStatus,
    policy: &NotificationPolicy,
) -> Classification {
    handler_for(event.phase())(event, prior, policy)
}

/// Whether `event` warrants a message given the prior terminal status.
///
/// Upper-case strategy flags notify always, lower-case only when the
/// outcome changed. The start phase only honours upper-case flags.
pub fn should_notify(
    event: &BuildEvent,
    prior: Option<&BuildStatus>,
    policy: &NotificationPolicy,
) -> bool {
    let prior_outcome = prior.and_then(BuildStatus::outcome);

    match event.phase() {
        Phase::Started => match prior_outcome {
            Some(Outcome::Bad) => policy.on_start.contains('F'),
            Some(Outcome::Good) => policy.on_start.contains('S'),
            None => !policy.on_start.is_empty(),
        },
        Phase::Finalized => {
            let Some(outcome) = event.status().and_then(BuildStatus::outcome) else {
                return false;
            };
            let (always, on_change) = match outcome {
                Outcome::Bad => ('F', 'f'),
                Outcome::Good => ('S', 's'),
            };
            let changed = prior_outcome != Some(outcome);
            policy.on_finished.contains(always) || (policy.on_finished.contains(on_change) && changed)
        }
        Phase::Completed | Phase::Other(_) => false,
    }
}

fn on_started(event: &BuildEvent, prior: &JobStatus, policy: &NotificationPolicy) -> Classification {
    let mut messages = Vec::new();
    if should_notify(event, prior.last_status.as_ref(), policy) {
        messages.push(format!(
            "{} build #{} started: {}",
            event.name,
            event.build.number,
            event.display_url()
        ));
    }

    Classification {
        messages,
        update: Some(StatusUpdate::Started {
            number: event.build.number.clone(),
        }),
    }
}

fn on_completed(_: &BuildEvent, _: &JobStatus, _: &NotificationPolicy) -> Classification {
    Classification::default()
}

fn on_finalized(
    event: &BuildEvent,
    prior: &JobStatus,
    policy: &NotificationPolicy,
) -> Classification {
    let Some(status) = event.status().filter(|s| s.outcome().is_some()) else {
        return Classification::default();
    };

    let mut messages = Vec::new();
    if should_notify(event, prior.last_status.as_ref(), policy) {
        messages.push(finished_message(event, status, prior.is_failing()));
    }

    Classification {
        messages,
        update: Some(StatusUpdate::Finished {
            number: event.build.number.clone(),
            status: status.clone(),
        }),
    }
}

fn ignore(_: &BuildEvent, _: &JobStatus, _: &NotificationPolicy) -> Classification {
    Classification::default()
}

fn finished_message(event: &BuildEvent, status: &BuildStatus, was_failing: bool) -> String {
    if status.is_bad() {
        let verb = if was_failing { "is still" } else { "started" };
        let mut message = format!(
            "{} build #{} {} failing: {}",
            event.name,
            event.build.number,
            verb,
            event.display_url()
        );
        if let Some(log) = event.log() {
            message.push_str("\r\n");
            message.push_str(log);
        }
        message
    } else {
        let verb = if was_failing { "was restored" } else { "succeeded" };
        format!(
            "{} build #{} {}: {}",
            event.name,
            event.build.number,
            verb,
            event.display_url()
        )
    }
}
