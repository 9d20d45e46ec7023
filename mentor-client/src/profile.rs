use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::{ProfileUpdate, User, UserEnvelope};

#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: HttpClient,
}

impl ProfileClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_profile(&self) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self.http.get("/users/profile").await?;
        Ok(envelope.user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self.http.get(&format!("/users/{}", user_id)).await?;
        Ok(envelope.user)
    }

    /// Sends only the fields that are set; an empty update is rejected locally.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        if update.is_empty() {
            return Err(ClientError::Validation(
                "Nothing to update: set at least one profile field".into(),
            ));
        }
        if matches!(update.mentorship_price, Some(price) if price < 0) {
            return Err(ClientError::Validation(
                "Mentorship price cannot be negative".into(),
            ));
        }

        let envelope: UserEnvelope = self.http.put("/users/profile", update).await?;
        Ok(envelope.user)
    }
}
