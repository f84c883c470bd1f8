//! HTTP plumbing shared by every call to the wallet risk API.
//!
//! The [`ApiClient`] is built once from [`Settings`] and handed to the
//! service layer. It:
//! - sends JSON requests to the resolved origin with a fixed timeout;
//! - translates HTTP status codes and transport failures into [`Error`];
//! - decodes the `{status, message, data|errors}` envelope.

use crate::common::error::Error;
use crate::common::{ApiEnvelope, ApiError};
use crate::config::Settings;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;

/// A preconfigured client for the wallet risk API
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Construct a new [`ApiClient`] from the loaded settings
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        Self::with_base_url(settings.base_url(), settings.request_timeout)
    }

    /// Construct a new [`ApiClient`] targeting `base_url`
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(ApiClient { client, base_url })
    }

    /// The origin requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET request for `path` and decode the response envelope
    pub async fn get<T>(&self, path: &str) -> Result<ApiEnvelope<T>, Error>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path));
        self.execute(request).await
    }

    /// Issue a POST request for `path` with a JSON `body` and decode the
    /// response envelope
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T>(&self, request: RequestBuilder) -> Result<ApiEnvelope<T>, Error>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(transport_error)?;
        debug!(status = %response.status(), url = %response.url(), "received API response");

        let checked_response = check_api_response(response).await?;
        let resp_result = checked_response.json::<ApiEnvelope<T>>().await;

        match resp_result {
            Ok(envelope) => Ok(envelope),
            Err(e) if e.is_decode() => {
                // Check if the source of the error is serde_json::Error
                if let Some(serde_err) = e
                    .source()
                    .and_then(|cause| cause.downcast_ref::<serde_json::Error>())
                {
                    match serde_err.classify() {
                        serde_json::error::Category::Data => Err(Error::InvalidApiResponse),
                        _ => Err(Error::Serialization(serde_err.to_string())),
                    }
                } else {
                    Err(Error::Network(e))
                }
            }
            Err(e) => Err(transport_error(e)),
        }
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::RequestTimeout
    } else {
        Error::Network(error)
    }
}

/// Evaluates the HTTP response from an API request and translates HTTP status codes into application-specific errors
async fn check_api_response(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Err(Error::RequestTimeout),
        StatusCode::INTERNAL_SERVER_ERROR => Err(Error::InternalServer),
        StatusCode::SERVICE_UNAVAILABLE => Err(Error::ServiceUnavailable),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let message = error_message(response)
                .await
                .unwrap_or_else(|| "Bad request - Invalid parameters or data".to_string());
            Err(Error::HttpRequest(status, message))
        }
        status => {
            let message = error_message(response)
                .await
                .unwrap_or_else(|| "Unhandled status code".to_string());
            Err(Error::HttpRequest(status, message))
        }
    }
}

/// The message of an error envelope, if the body carries one
async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ApiError>()
        .await
        .ok()
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
}
