//! http
//!
//! Shared request plumbing for the adapters: issue a GET, map transport
//! failures and non-2xx statuses into [`ForgeError`], decode JSON bodies.
//!
//! No retry, backoff, or timeout lives here; resilience policy belongs to
//! the caller or the transport.

use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::traits::{Credentials, ForgeError};

/// User-Agent header value for all outgoing requests.
const USER_AGENT_VALUE: &str = "upstream-forge";

/// GET a URL and return the response body as text.
///
/// Non-2xx responses become `ForgeError::Http` carrying the status code and
/// whatever body could be read.
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, ForgeError> {
    let response = send(client, url, None).await?;
    let status = response.status();
    response
        .text()
        .await
        .map_err(|e| ForgeError::Http {
            status: status.as_u16(),
            message: format!("failed to read response body: {}", e),
        })
}

/// GET a URL and decode the response body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    auth: Option<&Credentials>,
) -> Result<T, ForgeError> {
    let response = send(client, url, auth).await?;
    let status = response.status();
    response.json().await.map_err(|e| ForgeError::Http {
        status: status.as_u16(),
        message: format!("failed to decode response body: {}", e),
    })
}

/// Issue the request and reject non-2xx statuses.
async fn send(
    client: &Client,
    url: &str,
    auth: Option<&Credentials>,
) -> Result<Response, ForgeError> {
    let mut request = client.get(url).header(USER_AGENT, USER_AGENT_VALUE);
    if let Some((user, token)) = auth {
        request = request.basic_auth(user, Some(token));
    }

    let response = request
        .send()
        .await
        .map_err(|e| ForgeError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ForgeError::Http {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}
