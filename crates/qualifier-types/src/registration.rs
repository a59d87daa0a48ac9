//! Wire types for the identity registration exchange.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity sent to the registration endpoint.
///
/// Field names on the wire are `name`, `regNo`, `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub name: String,
    #[serde(rename = "regNo")]
    pub reg_no: String,
    pub email: String,
}

/// Body returned by the registration endpoint.
///
/// Either field may be missing, `null`, or blank. Use [`webhook`](Self::webhook)
/// and [`access_token`](Self::access_token) rather than the raw fields: both
/// treat absent and blank the same way.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub webhook: Option<String>,

    #[serde(
        default,
        rename = "accessToken",
        deserialize_with = "deserialize_secret"
    )]
    pub access_token: Option<SecretString>,
}

impl RegistrationResponse {
    pub fn new(webhook: Option<&str>, access_token: Option<&str>) -> Self {
        Self {
            webhook: webhook.map(str::to_string),
            access_token: access_token.map(SecretString::from),
        }
    }

    /// The webhook URL, or `None` when absent or blank.
    pub fn webhook(&self) -> Option<&str> {
        self.webhook.as_deref().filter(|w| !w.trim().is_empty())
    }

    /// The access token, or `None` when absent or blank.
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}
