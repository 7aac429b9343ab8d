//! Ticket CRUD operations
//!
//! All operations go through the `{status, title, message, data}` envelope
//! described in [`crate::response`]. A non-2xx response is mapped to
//! [`ApiError::Http`] carrying the envelope message when one is present.
//!
//! # Example
//!
//! ```ignore
//! let client = TicketClient::builder().url("http://localhost:8080").build()?;
//!
//! let tickets = client.list().await?;
//! let one = client.get_by_id(5).await?;
//! client.delete(5).await?;
//! ```

use log::debug;
use reqwest::Method;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::TicketClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Record;
use crate::response;
use crate::response::Payload;

impl TicketClient {
    /// Fetches the full ticket list.
    pub async fn list(&self) -> Result<Vec<Record>, Error> {
        let url = self.endpoint("/tickets");
        debug!("GET {url}");
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let payload: Payload<Vec<Record>> = parse(response).await?;
        Ok(payload.into_data().unwrap_or_default())
    }

    /// Fetches a single ticket by its ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Record, Error> {
        let url = self.endpoint(&format!("/tickets/{id}"));
        debug!("GET {url}");
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let payload: Payload<Record> = parse(response).await?;
        payload
            .into_data()
            .ok_or_else(|| ApiError::parse(format!("ticket {id} response had no data")).into())
    }

    /// Creates a new ticket. Returns the server's status message.
    pub async fn create(&self, record: &Record) -> Result<String, Error> {
        let url = self.endpoint("/tickets");
        debug!("POST {url}");
        let response = self
            .request(Method::POST, &url)
            .json(record)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        status_message(response).await
    }

    /// Updates an existing ticket. Returns the server's status message.
    pub async fn update(&self, id: i64, record: &Record) -> Result<String, Error> {
        let url = self.endpoint(&format!("/tickets/{id}"));
        debug!("PUT {url}");
        let response = self
            .request(Method::PUT, &url)
            .json(record)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        status_message(response).await
    }

    /// Deletes a ticket by its ID. Returns the server's status message.
    pub async fn delete(&self, id: i64) -> Result<String, Error> {
        let url = self.endpoint(&format!("/tickets/{id}"));
        debug!("DELETE {url}");
        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        status_message(response).await
    }

    /// Bulk-imports a batch of tickets. Returns the server's status message.
    pub async fn import(&self, records: &[Record]) -> Result<String, Error> {
        let url = self.endpoint("/tickets/import");
        debug!("POST {url} ({} records)", records.len());
        let response = self
            .request(Method::POST, &url)
            .json(records)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        status_message(response).await
    }
}

/// Checks the HTTP status and deserializes a successful body.
async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let response = check(response).await?;
    let body = response.text().await.map_err(ApiError::from)?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
}

/// Checks the HTTP status and extracts the envelope message from the body.
async fn status_message(response: Response) -> Result<String, Error> {
    let response = check(response).await?;
    let body = response.text().await.map_err(ApiError::from)?;
    match response::error_detail(&body) {
        Some((_, message)) => Ok(message),
        None => Ok(String::new()),
    }
}

/// Maps non-2xx responses to [`ApiError::Http`], preferring envelope text.
async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let error = match response::error_detail(&body) {
        Some((Some(title), message)) => ApiError::http_with_title(code, message, title),
        Some((None, message)) => ApiError::http(code, message),
        None => ApiError::http(code, body),
    };
    Err(error.into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_request_timeout_maps_to_timeout_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and hold them open without ever answering.
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _socket = socket;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                });
            }
        });

        let timeout = Duration::from_millis(100);
        let client = TicketClient::builder()
            .url(format!("http://{addr}"))
            .timeout(timeout)
            .build()
            .unwrap();

        let err = client.list().await.unwrap_err();
        assert!(
            matches!(err, Error::Api(ApiError::Timeout(d)) if d == timeout),
            "expected a timeout error, got: {err}"
        );
    }
}
