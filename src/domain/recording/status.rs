//! Recording transcription status state machine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable prefix shared by every failure status string
pub const FAILED_PREFIX: &str = "Failed: ";

/// Why a transcription attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The audio file was gone before the request could be sent
    FileMissing,
    /// The service answered with a non-success HTTP status
    ServerError(u16),
    /// The request never produced a usable response (kind is a stable
    /// label such as "Timeout" or "Connection Error")
    RequestError(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMissing => write!(f, "File Missing"),
            Self::ServerError(code) => write!(f, "Server Error {}", code),
            Self::RequestError(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for FailureReason {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseStatusError {
                value: s.to_string(),
            });
        }
        if s == "File Missing" {
            return Ok(Self::FileMissing);
        }
        if let Some(code) = s.strip_prefix("Server Error ") {
            if let Ok(code) = code.parse::<u16>() {
                return Ok(Self::ServerError(code));
            }
        }
        Ok(Self::RequestError(s.to_string()))
    }
}

/// Transcription lifecycle states.
///
/// State machine:
///   PENDING NAMING -> PENDING TRANSCRIPTION (naming)
///   PENDING TRANSCRIPTION -> TRANSCRIBING (submit)
///   TRANSCRIBING -> COMPLETED | FAILED
///   FAILED -> RETRYING (user-initiated retry)
///   RETRYING -> COMPLETED | FAILED
///
/// Retrying behaves exactly like Transcribing and exists only so the
/// display can distinguish a repeat attempt from a first one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TranscriptionStatus {
    PendingNaming,
    PendingTranscription,
    Transcribing,
    Retrying,
    Completed,
    Failed(FailureReason),
}

impl TranscriptionStatus {
    /// Check whether this is a terminal state (no attempt in progress)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    /// Check whether this is any failure state
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Check whether an attempt is currently in flight
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Transcribing | Self::Retrying)
    }

    /// Check whether naming the recording again must leave this status
    /// (and its transcript) untouched. Completed results and work that
    /// is already queued or running survive a rename; everything else is
    /// reset to PendingTranscription.
    pub fn preserved_on_rename(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Transcribing | Self::PendingTranscription
        )
    }

    /// The in-flight status a new submission should adopt, given this
    /// status as the prior one. A repeat after a failure shows Retrying;
    /// anything else shows Transcribing.
    pub fn next_attempt(&self) -> Self {
        if self.is_failed() || *self == Self::Retrying {
            Self::Retrying
        } else {
            Self::Transcribing
        }
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingNaming => write!(f, "Pending Naming"),
            Self::PendingTranscription => write!(f, "Pending Transcription"),
            Self::Transcribing => write!(f, "Transcribing"),
            Self::Retrying => write!(f, "Retrying"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed(reason) => write!(f, "{}{}", FAILED_PREFIX, reason),
        }
    }
}

/// Error when a status string is not part of the closed state set
#[derive(Debug, Clone, Error)]
#[error("Unknown transcription status: {value:?}")]
pub struct ParseStatusError {
    pub value: String,
}

impl FromStr for TranscriptionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending Naming" => Ok(Self::PendingNaming),
            "Pending Transcription" => Ok(Self::PendingTranscription),
            "Transcribing" => Ok(Self::Transcribing),
            "Retrying" => Ok(Self::Retrying),
            "Completed" => Ok(Self::Completed),
            other => match other.strip_prefix(FAILED_PREFIX) {
                Some(reason) => Ok(Self::Failed(reason.parse()?)),
                None => Err(ParseStatusError {
                    value: other.to_string(),
                }),
            },
        }
    }
}

// Persisted as the display string so stored data can never carry a status
// outside the closed set.
impl Serialize for TranscriptionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TranscriptionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_are_stable() {
        assert_eq!(TranscriptionStatus::PendingNaming.to_string(), "Pending Naming");
        assert_eq!(
            TranscriptionStatus::PendingTranscription.to_string(),
            "Pending Transcription"
        );
        assert_eq!(TranscriptionStatus::Transcribing.to_string(), "Transcribing");
        assert_eq!(TranscriptionStatus::Retrying.to_string(), "Retrying");
        assert_eq!(TranscriptionStatus::Completed.to_string(), "Completed");
    }

    #[test]
    fn failure_strings_share_the_failed_prefix() {
        let cases = [
            TranscriptionStatus::Failed(FailureReason::FileMissing),
            TranscriptionStatus::Failed(FailureReason::ServerError(500)),
            TranscriptionStatus::Failed(FailureReason::RequestError("Timeout".to_string())),
        ];
        for status in cases {
            assert!(status.to_string().starts_with(FAILED_PREFIX));
        }
    }

    #[test]
    fn failure_display_strings() {
        assert_eq!(
            TranscriptionStatus::Failed(FailureReason::FileMissing).to_string(),
            "Failed: File Missing"
        );
        assert_eq!(
            TranscriptionStatus::Failed(FailureReason::ServerError(500)).to_string(),
            "Failed: Server Error 500"
        );
        assert_eq!(
            TranscriptionStatus::Failed(FailureReason::RequestError(
                "Connection Error".to_string()
            ))
            .to_string(),
            "Failed: Connection Error"
        );
    }

    #[test]
    fn parse_round_trips_every_state() {
        let states = [
            TranscriptionStatus::PendingNaming,
            TranscriptionStatus::PendingTranscription,
            TranscriptionStatus::Transcribing,
            TranscriptionStatus::Retrying,
            TranscriptionStatus::Completed,
            TranscriptionStatus::Failed(FailureReason::FileMissing),
            TranscriptionStatus::Failed(FailureReason::ServerError(503)),
            TranscriptionStatus::Failed(FailureReason::RequestError("Timeout".to_string())),
        ];
        for status in states {
            let parsed: TranscriptionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn parse_rejects_strings_outside_the_set() {
        assert!("Uploading".parse::<TranscriptionStatus>().is_err());
        assert!("completed".parse::<TranscriptionStatus>().is_err());
        assert!("Failed: ".parse::<TranscriptionStatus>().is_err());
        assert!("".parse::<TranscriptionStatus>().is_err());
    }

    #[test]
    fn parse_keeps_unrecognized_failure_detail_as_request_error() {
        let status: TranscriptionStatus = "Failed: Read Error".parse().unwrap();
        assert_eq!(
            status,
            TranscriptionStatus::Failed(FailureReason::RequestError("Read Error".to_string()))
        );
    }

    #[test]
    fn parse_server_error_code() {
        let status: TranscriptionStatus = "Failed: Server Error 502".parse().unwrap();
        assert_eq!(
            status,
            TranscriptionStatus::Failed(FailureReason::ServerError(502))
        );
    }

    #[test]
    fn serde_round_trip_is_the_display_string() {
        let status = TranscriptionStatus::Failed(FailureReason::ServerError(500));
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"Failed: Server Error 500\"");
        let back: TranscriptionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn serde_rejects_unknown_status() {
        let result = serde_json::from_str::<TranscriptionStatus>("\"Queued\"");
        assert!(result.is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(TranscriptionStatus::Completed.is_terminal());
        assert!(TranscriptionStatus::Failed(FailureReason::FileMissing).is_terminal());
        assert!(!TranscriptionStatus::Transcribing.is_terminal());
        assert!(!TranscriptionStatus::Retrying.is_terminal());
        assert!(!TranscriptionStatus::PendingNaming.is_terminal());
        assert!(!TranscriptionStatus::PendingTranscription.is_terminal());
    }

    #[test]
    fn in_flight_states() {
        assert!(TranscriptionStatus::Transcribing.is_in_flight());
        assert!(TranscriptionStatus::Retrying.is_in_flight());
        assert!(!TranscriptionStatus::Completed.is_in_flight());
        assert!(!TranscriptionStatus::PendingTranscription.is_in_flight());
    }

    #[test]
    fn first_attempt_shows_transcribing() {
        assert_eq!(
            TranscriptionStatus::PendingTranscription.next_attempt(),
            TranscriptionStatus::Transcribing
        );
        assert_eq!(
            TranscriptionStatus::PendingNaming.next_attempt(),
            TranscriptionStatus::Transcribing
        );
        assert_eq!(
            TranscriptionStatus::Completed.next_attempt(),
            TranscriptionStatus::Transcribing
        );
    }

    #[test]
    fn attempt_after_failure_shows_retrying() {
        assert_eq!(
            TranscriptionStatus::Failed(FailureReason::ServerError(500)).next_attempt(),
            TranscriptionStatus::Retrying
        );
        assert_eq!(
            TranscriptionStatus::Retrying.next_attempt(),
            TranscriptionStatus::Retrying
        );
    }

    #[test]
    fn rename_preserves_completed_and_queued_work() {
        assert!(TranscriptionStatus::Completed.preserved_on_rename());
        assert!(TranscriptionStatus::Transcribing.preserved_on_rename());
        assert!(TranscriptionStatus::PendingTranscription.preserved_on_rename());
    }

    #[test]
    fn rename_resets_failures_and_placeholders() {
        assert!(!TranscriptionStatus::PendingNaming.preserved_on_rename());
        assert!(!TranscriptionStatus::Retrying.preserved_on_rename());
        assert!(!TranscriptionStatus::Failed(FailureReason::FileMissing).preserved_on_rename());
    }
}
