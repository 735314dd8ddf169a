//! jenkins.notification — A build lifecycle event sent by the Jenkins Notification Plugin.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level webhook payload. Unknown fields (job `url`, build `parameters`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildEvent {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub build: BuildDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildDetails {
    pub phase: Phase,
    #[serde(default)]
    pub status: Option<BuildStatus>,
    #[serde(default)]
    pub number: BuildNumber,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub full_url: Option<String>,
    #[serde(default)]
    pub log: Option<String>,
}

impl BuildEvent {
    pub fn phase(&self) -> &Phase {
        &self.build.phase
    }

    pub fn status(&self) -> Option<&BuildStatus> {
        self.build.status.as_ref()
    }

    /// `full_url` when Jenkins knows its root URL, the relative `url` otherwise.
    pub fn display_url(&self) -> &str {
        self.build
            .full_url
            .as_deref()
            .or(self.build.url.as_deref())
            .unwrap_or_default()
    }

    /// Console log excerpt, only when non-empty.
    pub fn log(&self) -> Option<&str> {
        self.build.log.as_deref().filter(|log| !log.is_empty())
    }
}

/// Build lifecycle phase. Jenkins sends upper-case names; anything unrecognized is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Phase {
    Started,
    Completed,
    /// Sent as `FINALIZED` by current plugin versions and `FINISHED` by older ones.
    Finalized,
    Other(String),
}

impl From<String> for Phase {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "STARTED" => Phase::Started,
            "COMPLETED" => Phase::Completed,
            "FINALIZED" | "FINISHED" => Phase::Finalized,
            _ => Phase::Other(raw),
        }
    }
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Started => "STARTED",
            Phase::Completed => "COMPLETED",
            Phase::Finalized => "FINALIZED",
            Phase::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal build result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    Success,
    Failure,
    Unstable,
    Other(String),
}

/// Decision-relevant view of a status: UNSTABLE counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Good,
    Bad,
}

impl BuildStatus {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            BuildStatus::Success => Some(Outcome::Good),
            BuildStatus::Failure | BuildStatus::Unstable => Some(Outcome::Bad),
            BuildStatus::Other(_) => None,
        }
    }

    pub fn is_bad(&self) -> bool {
        self.outcome() == Some(Outcome::Bad)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::Unstable => "UNSTABLE",
            BuildStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for BuildStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SUCCESS" => BuildStatus::Success,
            "FAILURE" => BuildStatus::Failure,
            "UNSTABLE" => BuildStatus::Unstable,
            _ => BuildStatus::Other(raw),
        }
    }
}

impl From<BuildStatus> for String {
    fn from(status: BuildStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build number as sent by Jenkins. Usually an integer, but only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildNumber {
    Number(serde_json::Number),
    Text(String),
}

impl Default for BuildNumber {
    fn default() -> Self {
        BuildNumber::Text(String::new())
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildNumber::Number(n) => write!(f, "{n}"),
            BuildNumber::Text(s) => f.write_str(s),
        }
    }
}
