pub mod auth;
pub mod config;
pub mod connections;
pub mod error;
pub mod feed;
pub mod http_client;
pub mod models;
pub mod payments;
pub mod profile;
pub mod refund;
pub mod token_store;
pub mod upload;

pub use config::ClientConfig;
pub use error::ClientError;

use auth::AuthClient;
use connections::ConnectionClient;
use feed::{Feed, FeedClient};
use http_client::HttpClient;
use payments::{PaymentClient, PaymentProcessor};
use profile::ProfileClient;
use upload::UploadClient;

/// Entry point to the platform API. Every sub-client shares one transport and
/// therefore one bearer token.
#[derive(Debug, Clone)]
pub struct MentorClient {
    config: ClientConfig,
    http: HttpClient,
}

impl MentorClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = HttpClient::from_config(&config);
        Self { config, http }
    }

    /// Client for the given backend origin with default settings
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self::new(ClientConfig::new(api_url))
    }

    /// Set the JWT token for authenticated requests
    pub async fn set_token(&self, token: String) {
        self.http.set_token(token).await;
    }

    /// Get the current JWT token
    pub async fn get_token(&self) -> Option<String> {
        self.http.get_token().await
    }

    /// Clear the current JWT token (logout)
    pub async fn clear_token(&self) {
        self.http.clear_token().await;
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone())
    }

    pub fn profile(&self) -> ProfileClient {
        ProfileClient::new(self.http.clone())
    }

    pub fn connections(&self) -> ConnectionClient {
        ConnectionClient::new(self.http.clone())
    }

    pub fn feed_client(&self) -> FeedClient {
        FeedClient::new(self.http.clone())
    }

    /// Feed with empty view state, ready for `refresh`.
    pub fn feed(&self, page_size: u32) -> Feed {
        Feed::new(self.feed_client(), page_size)
    }

    pub fn uploads(&self) -> UploadClient {
        UploadClient::new(self.http.clone(), self.config.upload)
    }

    pub fn payments(&self) -> PaymentClient {
        PaymentClient::new(self.http.clone())
    }

    /// The process-wide payment processor handle.
    pub async fn payment_processor(&self) -> Result<&'static PaymentProcessor, ClientError> {
        payments::processor(&self.config).await
    }
}
