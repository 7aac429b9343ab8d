//! Response envelope handling
//!
//! The backend wraps most payloads as `{status, title, message, data}`, but a
//! few endpoints return the payload bare. [`Payload`] absorbs both shapes so
//! callers never branch on the transport format.

use serde::Deserialize;

/// The standard response envelope used by the ticket service.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Outcome marker, `"ok"` or `"error"`.
    pub status: String,
    /// Short human-readable title.
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable detail message.
    #[serde(default)]
    pub message: Option<String>,
    /// The wrapped payload, absent on pure status responses.
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Returns `true` if the envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Returns the most descriptive message available.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().or(self.title.as_deref())
    }
}

/// A response body that is either an [`Envelope`] or the bare payload.
///
/// `status` is required on the envelope arm, so a bare record or array never
/// accidentally matches it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    /// Envelope-wrapped payload.
    Wrapped(Envelope<T>),
    /// Bare payload with no envelope.
    Bare(T),
}

impl<T> Payload<T> {
    /// Unwraps the payload, if one is present.
    pub fn into_data(self) -> Option<T> {
        match self {
            Payload::Wrapped(envelope) => envelope.data,
            Payload::Bare(data) => Some(data),
        }
    }
}

/// Extracts `(title, message)` from an error response body, when it parses as
/// an envelope.
pub(crate) fn error_detail(body: &str) -> Option<(Option<String>, String)> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    let message = envelope.message().map(str::to_string)?;
    Some((envelope.title, message))
}
