//! Payment processor boundary and price formatting.
//!
//! The client never sees card data: the processor's hosted card element yields
//! a payment method id, the backend yields a client secret, and this module
//! confirms one against the other.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http_client::HttpClient;
use crate::models::{CreateIntentRequest, IntentHandle, PaymentIntent};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

pub const DEFAULT_CURRENCY: &str = "usd";

static PROCESSOR: OnceCell<PaymentProcessor> = OnceCell::const_new();

/// Process-wide processor handle. The first successful call initializes it;
/// concurrent first callers wait on the same initialization and every later
/// call gets the cached handle, whatever config it passes. A failed
/// initialization is not cached.
pub async fn processor(config: &ClientConfig) -> Result<&'static PaymentProcessor, ClientError> {
    PROCESSOR
        .get_or_try_init(|| async { PaymentProcessor::from_config(config) })
        .await
}

#[derive(Debug)]
pub struct PaymentProcessor {
    client: Client,
    api_url: String,
    publishable_key: String,
}

#[derive(Debug, Deserialize)]
struct ProcessorErrorBody {
    error: ProcessorError,
}

#[derive(Debug, Deserialize)]
struct ProcessorError {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PaymentProcessor {
    pub fn new(api_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            publishable_key: publishable_key.into(),
        }
    }

    fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let key = config
            .payment_publishable_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config("MENTOR_PAYMENT_KEY is required for paid mentorships".into())
            })?;

        tracing::info!("Payment processor initialized ({})", config.payment_api_url);
        Ok(Self::new(config.payment_api_url.clone(), key))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Confirms a card payment for the intent behind `client_secret`.
    /// Succeeds only when the intent ends up authorized or captured.
    pub async fn confirm_card_payment(
        &self,
        client_secret: &str,
        payment_method_id: &str,
    ) -> Result<PaymentIntent, ClientError> {
        if payment_method_id.trim().is_empty() {
            return Err(ClientError::Validation("Card details are incomplete".into()));
        }
        let intent_id = intent_id_from_secret(client_secret)?;

        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.api_url.trim_end_matches('/'),
            intent_id
        );
        tracing::debug!("Confirming payment intent {}", intent_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.publishable_key)
            .form(&[
                ("client_secret", client_secret),
                ("payment_method", payment_method_id),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            let message = serde_json::from_str::<ProcessorErrorBody>(&error_text)
                .ok()
                .and_then(|body| {
                    let e = body.error;
                    e.message.or(e.code).or(e.kind)
                })
                .unwrap_or_else(|| format!("HTTP {}", status));

            tracing::warn!("Payment confirmation failed: {}", message);
            return Err(ClientError::Payment(message));
        }

        let intent: PaymentIntent = response.json().await?;
        if !intent.is_authorized() {
            return Err(ClientError::Payment(format!(
                "Payment was not authorized (status: {})",
                intent.status
            )));
        }

        Ok(intent)
    }
}

/// `pi_123_secret_abc` -> `pi_123`
pub fn intent_id_from_secret(client_secret: &str) -> Result<&str, ClientError> {
    match client_secret.split_once("_secret_") {
        Some((id, rest)) if !id.is_empty() && !rest.is_empty() => Ok(id),
        _ => Err(ClientError::Validation("Malformed payment client secret".into())),
    }
}

/// Backend side of a paid mentorship: creates the intent the card is
/// confirmed against.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: HttpClient,
}

impl PaymentClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn create_mentorship_intent(
        &self,
        mentor_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<IntentHandle, ClientError> {
        if amount <= 0 {
            return Err(ClientError::Validation(
                "Mentorship price must be positive".into(),
            ));
        }

        let req = CreateIntentRequest {
            mentor_id,
            amount,
            currency,
        };
        self.http.post("/payments/create-intent", &req).await
    }
}

fn currency_prefix(currency: &str) -> String {
    match currency.to_ascii_lowercase().as_str() {
        "" | "usd" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "inr" => "₹".to_string(),
        "cad" => "CA$".to_string(),
        "aud" => "A$".to_string(),
        other => format!("{} ", other.to_ascii_uppercase()),
    }
}

/// Formats minor currency units for display: `format_price(2599, "usd")`
/// gives `"$25.99"`. An empty currency means usd.
pub fn format_price(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let major = (abs / 100).to_string();
    let minor = abs % 100;

    let mut grouped = String::with_capacity(major.len() + major.len() / 3);
    for (i, digit) in major.chars().enumerate() {
        if i > 0 && (major.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}.{:02}", sign, currency_prefix(currency), grouped, minor)
}
