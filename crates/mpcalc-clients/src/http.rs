//! Shared JSON-over-HTTP plumbing for every API client.

use std::time::Duration;

use mpcalc_core::AppConfig;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::retry::retry_with_delay;

const USER_AGENT: &str = "mpcalc/0.1 (profitability-reports)";

/// Timeout and retry settings shared by all clients of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Total attempts per request, the first one included.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.http_timeout_secs),
            max_attempts: config.http_max_retries.max(1),
            retry_delay: Duration::from_secs(config.http_retry_delay_secs),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// A base URL, default headers and the retry policy for one API host.
#[derive(Debug, Clone)]
pub(crate) struct JsonApi {
    client: Client,
    base_url: Url,
    settings: HttpSettings,
}

impl JsonApi {
    pub(crate) fn new(
        base_url: &str,
        headers: HeaderMap,
        settings: HttpSettings,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        // exactly one trailing slash, so joins append instead of replacing
        // the last path segment
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.request::<(), T>(Method::GET, path, query, None).await
    }

    pub(crate) async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ClientError> {
        self.request(Method::POST, path, query, Some(body)).await
    }

    /// Sends one request with retries, maps non-2xx statuses to typed errors
    /// and decodes the body.
    async fn request<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.url(path)?;

        let text = retry_with_delay(self.settings.max_attempts, self.settings.retry_delay, || {
            let mut builder = self.client.request(method.clone(), url.clone()).query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }
            let url = url.to_string();
            async move {
                let response = builder.send().await?;
                let status = response.status();
                if status == StatusCode::NOT_FOUND {
                    tracing::warn!(%url, "endpoint returned 404");
                    return Err(ClientError::NotFound { url });
                }
                if !status.is_success() {
                    return Err(ClientError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: format!("{method} {path}"),
            source: e,
        })
    }
}

/// `Bearer <token>`, unless the token already carries the scheme.
pub(crate) fn bearer(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_owned()
    } else {
        format!("Bearer {token}")
    }
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidCredential(e.to_string()))
}

/// Logs a failed optional fetch and substitutes the empty value, so a report
/// degrades to fewer rows instead of failing.
pub fn or_empty<T: Default>(result: Result<T, ClientError>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(what, error = %err, "fetch failed; continuing without data");
            T::default()
        }
    }
}
