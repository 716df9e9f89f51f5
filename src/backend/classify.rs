//! Classification of remote failures
//!
//! The only place that inspects remote error payloads.

use super::RemoteError;

/// Coarse category of a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    InvalidCredentials,
    QuotaExceeded,
    Other,
}

const KEY_INVALID_REASONS: [&str; 2] = ["API_KEY_INVALID", "API_KEY_EXPIRED"];
const KEY_INVALID_MESSAGES: [&str; 3] = ["api key not valid", "api_key_invalid", "invalid api key"];
const QUOTA_REASONS: [&str; 2] = ["RATE_LIMIT_EXCEEDED", "RESOURCE_EXHAUSTED"];

pub fn classify(error: &RemoteError) -> RemoteErrorKind {
    let message = error.message.to_lowercase();
    let provider_status = error.provider_status.as_deref().unwrap_or_default();

    let key_invalid = error.status == Some(401)
        || provider_status == "UNAUTHENTICATED"
        || error.reasons.iter().any(|r| KEY_INVALID_REASONS.contains(&r.as_str()))
        || KEY_INVALID_MESSAGES.iter().any(|m| message.contains(m));
    if key_invalid {
        return RemoteErrorKind::InvalidCredentials;
    }

    let quota = error.status == Some(429)
        || provider_status == "RESOURCE_EXHAUSTED"
        || error.reasons.iter().any(|r| QUOTA_REASONS.contains(&r.as_str()))
        || message.contains("quota");
    if quota {
        return RemoteErrorKind::QuotaExceeded;
    }

    RemoteErrorKind::Other
}
