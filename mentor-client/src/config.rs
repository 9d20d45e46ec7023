//! Client configuration loaded from environment variables (and `.env`).

use crate::error::ClientError;
use crate::upload::UploadPolicy;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAYMENT_API_URL: &str = "https://api.stripe.com";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; `/api` is appended per request
    pub api_url: String,

    /// Publishable key of the payment processor, if paid mentorship is used
    pub payment_publishable_key: Option<String>,

    /// Payment processor API origin
    pub payment_api_url: String,

    /// Request timeout for backend calls
    pub request_timeout: Duration,

    /// Connect timeout for backend calls
    pub connect_timeout: Duration,

    pub upload: UploadPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            payment_publishable_key: None,
            payment_api_url: DEFAULT_PAYMENT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            upload: UploadPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ClientError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("MENTOR_API_URL").unwrap_or(defaults.api_url);

        let payment_publishable_key = lookup("MENTOR_PAYMENT_KEY").filter(|k| !k.is_empty());

        let payment_api_url =
            lookup("MENTOR_PAYMENT_API_URL").unwrap_or(defaults.payment_api_url);

        let request_timeout = match lookup("MENTOR_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number(
                "MENTOR_HTTP_TIMEOUT_SECS",
                &raw,
            )?),
            None => defaults.request_timeout,
        };

        let mut upload = defaults.upload;
        if let Some(raw) = lookup("MENTOR_UPLOAD_MAX_FILES") {
            upload.max_files = parse_number("MENTOR_UPLOAD_MAX_FILES", &raw)? as usize;
        }
        if let Some(raw) = lookup("MENTOR_UPLOAD_MAX_FILE_SIZE") {
            upload.max_file_size = parse_number("MENTOR_UPLOAD_MAX_FILE_SIZE", &raw)?;
        }

        Ok(Self {
            api_url,
            payment_publishable_key,
            payment_api_url,
            request_timeout,
            connect_timeout: defaults.connect_timeout,
            upload,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, ClientError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClientError::Config(format!(
            "{} must be a positive number, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.payment_api_url, DEFAULT_PAYMENT_API_URL);
        assert!(config.payment_publishable_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.upload.max_files, 5);
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("MENTOR_API_URL", "https://mentors.example.com"),
            ("MENTOR_PAYMENT_KEY", "pk_test_123"),
            ("MENTOR_UPLOAD_MAX_FILES", "3"),
            ("MENTOR_UPLOAD_MAX_FILE_SIZE", "1024"),
            ("MENTOR_HTTP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://mentors.example.com");
        assert_eq!(config.payment_publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(config.upload.max_files, 3);
        assert_eq!(config.upload.max_file_size, 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = ClientConfig::from_lookup(lookup_from(&[("MENTOR_UPLOAD_MAX_FILES", "five")]))
            .unwrap_err();
        assert!(err.to_string().contains("MENTOR_UPLOAD_MAX_FILES"));
    }

    #[test]
    fn rejects_zero_limits_and_timeout() {
        for key in [
            "MENTOR_HTTP_TIMEOUT_SECS",
            "MENTOR_UPLOAD_MAX_FILES",
            "MENTOR_UPLOAD_MAX_FILE_SIZE",
        ] {
            let err = ClientConfig::from_lookup(lookup_from(&[(key, "0")])).unwrap_err();
            assert!(err.to_string().contains(key), "{}: {}", key, err);
        }
    }

    #[test]
    fn empty_payment_key_counts_as_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[("MENTOR_PAYMENT_KEY", "")])).unwrap();
        assert!(config.payment_publishable_key.is_none());
    }
}
