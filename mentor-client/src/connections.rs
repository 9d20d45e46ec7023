use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::{
    AcceptMentorshipRequest, Connection, ConnectionEnvelope, ConnectionRequest,
    ConnectionStatus, ConnectionType, ConnectionsEnvelope, MentorshipApplication, PaymentDetails,
    PaymentDetailsEnvelope, ReasonRequest,
};
use reqwest::Method;

/// Result of accepting a mentorship request.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    Accepted(Connection),
    /// Paid request with no payment method yet: the card form has to run
    /// first. Nothing was sent to the server.
    PaymentRequired {
        connection_id: String,
        amount: i64,
        currency: String,
    },
}

#[derive(Debug, Clone)]
pub struct ConnectionClient {
    http: HttpClient,
}

impl ConnectionClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        status: Option<ConnectionStatus>,
    ) -> Result<Vec<Connection>, ClientError> {
        let mut request = self.http.request(Method::GET, "/connections").await;
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        let envelope: ConnectionsEnvelope = self.http.send(request).await?;
        Ok(envelope.connections)
    }

    /// Mentorship requests waiting on the current mentor.
    pub async fn pending_mentorship_requests(&self) -> Result<Vec<Connection>, ClientError> {
        let request = self
            .http
            .request(Method::GET, "/connections")
            .await
            .query(&[("status", "pending"), ("type", "student_to_mentor")]);
        let envelope: ConnectionsEnvelope = self.http.send(request).await?;

        Ok(envelope
            .connections
            .into_iter()
            .filter(|c| {
                c.status == ConnectionStatus::Pending
                    && c.connection_type == ConnectionType::StudentToMentor
            })
            .collect())
    }

    pub async fn request_connection(
        &self,
        recipient_id: impl Into<String>,
        message: Option<String>,
    ) -> Result<Connection, ClientError> {
        let req = ConnectionRequest {
            recipient_id: recipient_id.into(),
            message,
        };
        if req.recipient_id.trim().is_empty() {
            return Err(ClientError::Validation("Recipient is required".into()));
        }

        let envelope: ConnectionEnvelope = self.http.post("/connections/request", &req).await?;
        Ok(envelope.connection)
    }

    pub async fn accept(&self, connection_id: &str) -> Result<Connection, ClientError> {
        self.action(connection_id, "accept").await
    }

    pub async fn reject(&self, connection_id: &str) -> Result<Connection, ClientError> {
        self.action(connection_id, "reject").await
    }

    pub async fn cancel(&self, connection_id: &str) -> Result<Connection, ClientError> {
        self.action(connection_id, "cancel").await
    }

    pub async fn block(&self, connection_id: &str) -> Result<Connection, ClientError> {
        self.action(connection_id, "block").await
    }

    async fn action(&self, connection_id: &str, action: &str) -> Result<Connection, ClientError> {
        let path = format!("/connections/{}/{}", connection_id, action);
        let request = self.http.request(Method::POST, &path).await;
        let envelope: ConnectionEnvelope = self.http.send(request).await?;
        tracing::info!("Connection {} -> {}", connection_id, envelope.connection.status.as_str());
        Ok(envelope.connection)
    }

    /// Applies for a mentorship. For a paid mentor the application carries the
    /// id of an already authorized payment intent.
    pub async fn apply_for_mentorship(
        &self,
        application: &MentorshipApplication,
    ) -> Result<Connection, ClientError> {
        if application.mentor_id.trim().is_empty() {
            return Err(ClientError::Validation("Mentor is required".into()));
        }

        let envelope: ConnectionEnvelope = self
            .http
            .post("/connections/mentorship/apply", application)
            .await?;
        Ok(envelope.connection)
    }

    /// Free requests go through the plain accept endpoint and never touch
    /// payments. Paid requests need a payment method id before anything is
    /// sent.
    pub async fn accept_mentorship(
        &self,
        connection: &Connection,
        payment_method_id: Option<&str>,
    ) -> Result<AcceptOutcome, ClientError> {
        if !connection.is_paid {
            return self.accept(&connection.id).await.map(AcceptOutcome::Accepted);
        }

        let Some(payment_method_id) = payment_method_id else {
            return Ok(AcceptOutcome::PaymentRequired {
                connection_id: connection.id.clone(),
                amount: connection.mentorship_price.unwrap_or(0),
                currency: connection
                    .currency
                    .clone()
                    .unwrap_or_else(|| "usd".to_string()),
            });
        };

        if payment_method_id.trim().is_empty() {
            return Err(ClientError::Validation(
                "Card details are incomplete".into(),
            ));
        }

        let path = format!("/connections/{}/accept-mentorship", connection.id);
        let envelope: ConnectionEnvelope = self
            .http
            .post(&path, &AcceptMentorshipRequest { payment_method_id })
            .await?;
        Ok(AcceptOutcome::Accepted(envelope.connection))
    }

    /// The reason is forwarded as given, empty included; the server decides
    /// whether one is needed.
    pub async fn reject_mentorship(
        &self,
        connection_id: &str,
        reason: &str,
    ) -> Result<Connection, ClientError> {
        let path = format!("/connections/{}/reject-mentorship", connection_id);
        let envelope: ConnectionEnvelope = self.http.post(&path, &ReasonRequest { reason }).await?;
        Ok(envelope.connection)
    }

    /// Requests a refund and returns the payment as it stands afterwards.
    pub async fn request_refund(
        &self,
        connection_id: &str,
        reason: &str,
    ) -> Result<PaymentDetails, ClientError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClientError::Validation(
                "Please provide a reason for the refund".into(),
            ));
        }

        let path = format!("/connections/{}/refund", connection_id);
        let request = self
            .http
            .request(Method::POST, &path)
            .await
            .json(&ReasonRequest { reason });
        self.http.send_unit(request).await?;
        tracing::info!("Refund requested for connection {}", connection_id);

        self.payment_details(connection_id).await
    }

    pub async fn payment_details(&self, connection_id: &str) -> Result<PaymentDetails, ClientError> {
        let path = format!("/connections/{}/payment-details", connection_id);
        let envelope: PaymentDetailsEnvelope = self.http.get(&path).await?;
        Ok(envelope.payment_details)
    }
}
