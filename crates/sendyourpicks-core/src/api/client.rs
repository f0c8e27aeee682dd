//! REST client for the Send Your Picks backend.
//!
//! Every call is timed and produces exactly one API log record: the response
//! outcome or the transport failure.

use std::time::{Duration, Instant};

use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use super::ApiError;
use crate::config::Config;
use crate::logging::{ApiDetails, ApiEvent, Logger};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    logger: Logger,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, logger: Logger) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            logger,
        })
    }

    pub fn from_config(config: &Config, logger: Logger) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, logger)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Send one request to `base_url + endpoint`.
    ///
    /// A missing token is sent as the literal `Bearer undefined`; the backend
    /// rejects it like any other bad token.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let started = Instant::now();

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.unwrap_or("undefined")),
            )
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.api(
                    ApiEvent::NetworkError,
                    ApiDetails {
                        method: Some(method.to_string()),
                        endpoint: Some(endpoint.to_string()),
                        error: Some(e.to_string()),
                        duration_ms: Some(elapsed_ms(started)),
                        ..Default::default()
                    },
                );
                return Err(ApiError::Network(e));
            }
        };

        let status = response.status().as_u16();
        let duration_ms = elapsed_ms(started);

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = ApiError::from_body(status, &text);
            self.logger.api(
                ApiEvent::ResponseError,
                ApiDetails {
                    method: Some(method.to_string()),
                    endpoint: Some(endpoint.to_string()),
                    status: Some(status),
                    error: Some(err.to_string()),
                    duration_ms: Some(duration_ms),
                },
            );
            return Err(err);
        }

        self.logger.api(
            ApiEvent::ResponseSuccess,
            ApiDetails {
                method: Some(method.to_string()),
                endpoint: Some(endpoint.to_string()),
                status: Some(status),
                duration_ms: Some(duration_ms),
                ..Default::default()
            },
        );

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, endpoint, token, None).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, token, Some(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, token, Some(body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, endpoint, token, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, endpoint, token, None).await
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Turn a failed call into a user-facing message, logging it as a response
/// error.
pub fn handle_api_error(err: &ApiError, fallback: &str, logger: &Logger) -> String {
    let message = match err.to_string() {
        m if m.is_empty() => fallback.to_string(),
        m => m,
    };

    logger.api(
        ApiEvent::ResponseError,
        ApiDetails {
            error: Some(message.clone()),
            status: err.status(),
            ..Default::default()
        },
    );

    message
}
