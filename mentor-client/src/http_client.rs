use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::ErrorResponse;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// REST transport shared by every sub-client. Cloning is cheap and clones see
/// the same bearer token.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeouts(base_url, Duration::from_secs(10), Duration::from_secs(5))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_timeouts(
            config.api_url.clone(),
            config.request_timeout,
            config.connect_timeout,
        )
    }

    fn with_timeouts(base_url: impl Into<String>, timeout: Duration, connect: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    pub async fn get_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Starts a request against `/api/{path}` with the bearer token attached.
    pub(crate) async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(token) = self.token.read().await.as_ref() {
            request = request.bearer_auth(token);
        }
        request
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path).await;
        self.send(request).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).await.json(body);
        self.send(request).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).await.json(body);
        self.send(request).await
    }

    /// Sends the request and decodes a 2xx body as `T`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends the request and discards a 2xx body.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let response = request.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await?;
        let server_message = serde_json::from_str::<ErrorResponse>(&error_text)
            .ok()
            .and_then(ErrorResponse::into_message);

        tracing::warn!(
            "Request failed with HTTP {}: {}",
            status,
            server_message.as_deref().unwrap_or("<no message>")
        );

        Err(ClientError::from_status(status, server_message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_under_api_prefix() {
        let client = HttpClient::new("http://localhost:5000/");
        assert_eq!(
            client.url("/connections/request"),
            "http://localhost:5000/api/connections/request"
        );
        assert_eq!(client.url("posts/feed"), "http://localhost:5000/api/posts/feed");
    }

    #[tokio::test]
    async fn token_is_shared_between_clones() {
        let client = HttpClient::new("http://localhost:5000");
        let clone = client.clone();

        client.set_token("abc".to_string()).await;
        assert_eq!(clone.get_token().await.as_deref(), Some("abc"));

        clone.clear_token().await;
        assert!(client.get_token().await.is_none());
    }
}
