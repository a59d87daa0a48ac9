//! HttpRemoteService -- concrete [`RemoteService`] implementation over reqwest.
//!
//! Both exchanges are single JSON POSTs with a fixed request timeout. No
//! retries. The access token is wrapped in [`secrecy::SecretString`] and is
//! only exposed when building the `Authorization` header.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use qualifier_core::service::remote::RemoteService;
use qualifier_types::config::{HttpConfig, QualifierConfig};
use qualifier_types::error::{RegistrationError, SubmissionWarning};
use qualifier_types::registration::{IdentityPayload, RegistrationResponse};
use qualifier_types::submission::SubmissionPayload;

/// Remote qualification service reached over HTTP.
pub struct HttpRemoteService {
    client: reqwest::Client,
    generate_url: String,
    timeout_secs: u64,
}

impl HttpRemoteService {
    /// Create a client that registers against `generate_url`.
    pub fn new(generate_url: String, http: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            generate_url,
            timeout_secs: http.timeout_secs,
        })
    }

    /// Create a client from the run configuration.
    pub fn from_config(config: &QualifierConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.endpoints.generate_url(), &config.http)
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }
}

impl RemoteService for HttpRemoteService {
    async fn register(
        &self,
        payload: &IdentityPayload,
    ) -> Result<RegistrationResponse, RegistrationError> {
        debug!(url = %self.generate_url, "Sending registration request");

        let response = self
            .client
            .post(&self.generate_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RegistrationError::Timeout(self.timeout_secs)
                } else {
                    RegistrationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistrationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RegistrationError::Timeout(self.timeout_secs)
            } else {
                RegistrationError::Transport(format!("failed to read body: {e}"))
            }
        })?;

        parse_registration_body(&body)
    }

    async fn submit(
        &self,
        url: &str,
        payload: &SubmissionPayload,
        token: Option<&SecretString>,
    ) -> Result<String, SubmissionWarning> {
        let mut request = self.client.post(url).json(payload);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SubmissionWarning::Timeout(self.timeout_secs)
            } else {
                SubmissionWarning::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmissionWarning::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SubmissionWarning::Timeout(self.timeout_secs)
            } else {
                SubmissionWarning::Transport(format!("failed to read body: {e}"))
            }
        })
    }
}

/// Parse a 2xx registration body.
///
/// An empty body or a bare JSON `null` is [`RegistrationError::EmptyBody`];
/// an object with blank fields is a valid response.
fn parse_registration_body(body: &str) -> Result<RegistrationResponse, RegistrationError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(RegistrationError::EmptyBody);
    }
    serde_json::from_str(trimmed).map_err(|e| RegistrationError::Parse(e.to_string()))
}
