use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{ApiError, ApiResult};
use crate::feed::PostSource;
use crate::signup::AccountService;
use plaza_types::*;

/// API client for the Plaza REST endpoints
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-2xx response into `ApiError::Status`, keeping the `error`
    /// field of a JSON body when there is one
    async fn rejection(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.error)
            .filter(|m| !m.trim().is_empty());

        if message.is_none() && !body.is_empty() {
            log::debug!(target: "api_calls", "Unstructured error body ({}): {}", status, body);
        }

        ApiError::Status { status, message }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        if response.status().is_success() {
            // Read as text first so a malformed body surfaces as a serde error
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::rejection(response).await)
        }
    }

    // Account endpoints

    /// Create an account. Any 2xx counts as success; the body is not interpreted.
    pub async fn create_account(&self, request: &SignUpRequest) -> ApiResult<()> {
        let url = format!("{}{}", self.base_url, SIGNUP_PATH);
        log::debug!(target: "api_calls", "POST {} (demo_user={})", url, request.demo_user);

        let response = self.client.post(&url).json(request).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }

    // Post endpoints

    /// Fetch one page of posts in server order
    pub async fn get_posts(&self, offset: u32, limit: u32) -> ApiResult<Vec<Post>> {
        let url = format!("{}{}", self.base_url, POSTS_PATH);
        log::debug!(target: "api_calls", "GET {}?offset={}&limit={}", url, offset, limit);

        let req = self
            .client
            .get(&url)
            .query(&[("offset", offset), ("limit", limit)]);
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl AccountService for ApiClient {
    async fn create_account(&self, request: &SignUpRequest) -> ApiResult<()> {
        ApiClient::create_account(self, request).await
    }
}

#[async_trait]
impl PostSource for ApiClient {
    async fn fetch_posts(&self, offset: u32, limit: u32) -> ApiResult<Vec<Post>> {
        self.get_posts(offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_a_network_error() {
        let client = ApiClient::new("not a url");
        let err = client.get_posts(0, 20).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(!err.is_rejection());
    }
}
