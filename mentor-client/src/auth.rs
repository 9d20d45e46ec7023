use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User, UserEnvelope};

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Registers an account and keeps the returned token for later requests.
    pub async fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Result<AuthResponse, ClientError> {
        let req = RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        };

        tracing::debug!("Register called for email: {}", req.email);
        let response: AuthResponse = self.http.post("/auth/register", &req).await?;
        self.http.set_token(response.token.clone()).await;
        Ok(response)
    }

    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            email: email.into(),
            password: password.into(),
        };

        tracing::debug!("Login called for email: {}", req.email);
        let response: AuthResponse = self.http.post("/auth/login", &req).await?;
        self.http.set_token(response.token.clone()).await;
        Ok(response)
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self.http.get("/auth/me").await?;
        Ok(envelope.user)
    }

    pub async fn logout(&self) {
        self.http.clear_token().await;
    }
}
