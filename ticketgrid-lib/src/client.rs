//! Main TicketClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use url::Url;

use crate::error::ApiError;

/// The main client for the ticket service REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use ticketgrid_lib::TicketClient;
///
/// let client = TicketClient::builder()
///     .url("http://localhost:8080")
///     .build()?;
///
/// let tickets = client.list().await?;
/// ```
#[derive(Clone, Debug)]
pub struct TicketClient {
    inner: Arc<TicketClientInner>,
}

#[derive(Debug)]
struct TicketClientInner {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl TicketClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> TicketClientBuilder<Missing> {
        TicketClientBuilder::new()
    }

    /// Returns the base URL of the ticket service.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Builds a full endpoint URL from a path like `"/tickets"`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Starts a request with the configured timeout applied.
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.inner.http_client.request(method, url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    /// Starts a request without the per-request timeout.
    ///
    /// Long-lived subscriptions (the change-event channel) must not be killed
    /// by the ordinary request timeout.
    pub(crate) fn request_untimed(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.http_client.request(method, url)
    }

    /// Maps a transport failure, distinguishing the configured request
    /// timeout from other network errors.
    pub(crate) fn send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`TicketClient`].
///
/// Uses the typestate pattern so the required base URL must be set before
/// `build` is available.
///
/// # Example
///
/// ```ignore
/// let client = TicketClient::builder()
///     .url("http://localhost:8080")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct TicketClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl TicketClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the ticket service base URL.
    pub fn url(self, url: impl Into<String>) -> TicketClientBuilder<Set<String>> {
        TicketClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for TicketClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> TicketClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl TicketClientBuilder<Set<String>> {
    /// Builds the [`TicketClient`].
    ///
    /// Fails with [`ApiError::InvalidUrl`] when the base URL does not parse.
    pub fn build(self) -> Result<TicketClient, ApiError> {
        let raw = self.url.0;
        let parsed = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(raw));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::Network)?
            }
        };

        Ok(TicketClient {
            inner: Arc::new(TicketClientInner {
                base_url: raw.trim_end_matches('/').to_string(),
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_trims_trailing_slash() {
        let client = TicketClient::builder()
            .url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint("/tickets"), "http://localhost:8080/tickets");
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let err = TicketClient::builder().url("not a url").build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
