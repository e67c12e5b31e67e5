//! Failure taxonomy shared by the gateway, orchestrators and bridge
//! session. Display strings carry the markers the embedding UI matches on
//! (`Timeout`, `CANCELLED`, `FAILED`, `Insufficient`), so changing a message
//! here is a breaking change for consumers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Insufficient stable-token balance: have {have}, need {need}. Top up the wallet and retry"
    )]
    InsufficientBalance { have: String, need: String },

    #[error("Timeout {context}")]
    Timeout { context: String },

    #[error("call CANCELLED in the host wallet ({context})")]
    Cancelled { context: String },

    #[error("contract call FAILED ({function}): {detail}")]
    ContractFailed { function: String, detail: String },

    #[error("network error: {detail}")]
    Network { detail: String },

    #[error("host bridge error: {detail}")]
    Bridge { detail: String },

    #[error("cannot {attempted} ({phase})")]
    InvalidDrawTransition {
        attempted: &'static str,
        phase: &'static str,
    },

    #[error("pool state unavailable; refresh before managing the draw")]
    PoolStateUnavailable,
}

impl Error {
    pub fn network(source: impl std::fmt::Display) -> Self {
        Error::Network {
            detail: source.to_string(),
        }
    }

    pub fn bridge(detail: impl Into<String>) -> Self {
        Error::Bridge {
            detail: detail.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::classify(&self.to_string())
    }
}

/// Semantic category recovered from an error message. The UI layer maps
/// these to friendly copy; the substring contract below is part of the
/// crate's public behavior.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    InsufficientBalance,
    Timeout,
    Cancelled,
    ContractFailed,
    Unknown,
}

impl ErrorCategory {
    pub fn classify(message: &str) -> Self {
        if message.contains("Insufficient") {
            ErrorCategory::InsufficientBalance
        } else if message.contains("Timeout") {
            ErrorCategory::Timeout
        } else if message.contains("CANCELLED") {
            ErrorCategory::Cancelled
        } else if message.contains("FAILED") {
            ErrorCategory::ContractFailed
        } else {
            ErrorCategory::Unknown
        }
    }
}

pub const GENERIC_FAILURE_TEXT: &str = "Something went wrong. Please try again.";

/// Pass a raw error message through to the user, substituting the generic
/// fallback when there is nothing to show.
pub fn user_message(raw: &str) -> String {
    if raw.trim().is_empty() {
        GENERIC_FAILURE_TEXT.to_string()
    } else {
        raw.to_string()
    }
}
