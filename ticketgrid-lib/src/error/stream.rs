//! Change-channel error types

/// Errors from the server-sent change-event channel.
///
/// Any of these closes the channel; reconnection is a policy decision left to
/// the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The server rejected the subscription request.
    #[error("HTTP {status} while subscribing to change events")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// Transport failure while the channel was open.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
