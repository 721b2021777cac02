// GitHub API HTTP client.
// Handles default headers, rate limit tracking, and response status mapping.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FolioError, Result};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Unauthenticated GitHub API client with rate limit tracking.
///
/// Requests take `&self` so a batch of fetches can share one client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client against an alternative API root (GitHub Enterprise, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("folio-site"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Snapshot of the rate limit reported by the last response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|limit| limit.clone())
            .unwrap_or_default()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).send().await.map_err(FolioError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(FolioError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
        if rate_limit.limit > 0 {
            tracing::debug!(
                remaining = rate_limit.remaining,
                limit = rate_limit.limit,
                "github rate limit"
            );
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &url, body, self.rate_limit().reset))
    }
}

/// Map a non-success status to an error. 403 and 429 are both treated as rate limiting.
pub(crate) fn status_error(status: StatusCode, url: &str, body: String, reset: u64) -> FolioError {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            let reset_at = chrono::DateTime::from_timestamp(reset as i64, 0)
                .filter(|_| reset > 0)
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            FolioError::RateLimited { reset_at }
        }
        StatusCode::NOT_FOUND => FolioError::NotFound(url.to_string()),
        status => FolioError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::with_base_url("http://localhost:9/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9");
        assert_eq!(client.rate_limit().remaining, 0);
    }

    #[test]
    fn test_forbidden_and_too_many_requests_are_rate_limits() {
        let err = status_error(StatusCode::FORBIDDEN, "u", String::new(), 0);
        assert!(err.is_rate_limited());

        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "u", String::new(), 1_700_000_000);
        match err {
            FolioError::RateLimited { reset_at } => assert_ne!(reset_at, "unknown"),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_and_other_statuses() {
        let err = status_error(StatusCode::NOT_FOUND, "https://x/repos/a/b", String::new(), 0);
        assert!(matches!(err, FolioError::NotFound(url) if url.ends_with("/repos/a/b")));

        let err = status_error(StatusCode::BAD_GATEWAY, "u", "down".into(), 0);
        assert!(matches!(err, FolioError::Http { status: 502, .. }));
    }
}
