//! Run configuration for the qualifier flow.
//!
//! `QualifierConfig` mirrors `qualifier.toml`. It is assembled once at startup
//! (file + CLI/env overrides) and treated as immutable afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactChoice;
use crate::error::ConfigError;
use crate::registration::IdentityPayload;

/// Top-level configuration for one flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifierConfig {
    pub endpoints: EndpointsConfig,

    /// May be left out when the identity comes from CLI/env overrides.
    #[serde(default)]
    pub candidate: CandidateConfig,

    #[serde(default)]
    pub sql: SqlConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl QualifierConfig {
    /// Check that every required value is non-empty and the HTTP timeout is
    /// non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("endpoints.generate", self.endpoints.generate.as_str()),
            ("endpoints.submit_fallback", self.endpoints.submit_fallback.as_str()),
            ("candidate.name", self.candidate.name.as_str()),
            ("candidate.reg_no", self.candidate.reg_no.as_str()),
            ("candidate.email", self.candidate.email.as_str()),
            ("submission.query_field", self.submission.query_field.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }
        if self.output.store_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("output.store_file"));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Build the registration payload from the candidate section.
    pub fn identity_payload(&self) -> IdentityPayload {
        IdentityPayload {
            name: self.candidate.name.clone(),
            reg_no: self.candidate.reg_no.clone(),
            email: self.candidate.email.clone(),
        }
    }

    /// Source path of the artifact for a given choice.
    pub fn artifact_path(&self, choice: ArtifactChoice) -> &PathBuf {
        match choice {
            ArtifactChoice::A => &self.sql.q1,
            ArtifactChoice::B => &self.sql.q2,
        }
    }
}

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Prefix for relative endpoint paths. Absolute URLs ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Registration endpoint.
    pub generate: String,

    /// Submission target used when the service returns no webhook.
    pub submit_fallback: String,
}

impl EndpointsConfig {
    /// Resolved registration URL.
    pub fn generate_url(&self) -> String {
        self.resolve(&self.generate)
    }

    /// Resolved fallback submission URL.
    pub fn submit_fallback_url(&self) -> String {
        self.resolve(&self.submit_fallback)
    }

    /// Join a relative path onto `base_url`. Absolute URLs pass through.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match self.base_url.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => path.to_string(),
        }
    }
}

/// Identity sent to the registration endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    pub name: String,
    pub reg_no: String,
    pub email: String,
}

/// Locations of the two precomputed query artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlConfig {
    /// Artifact A, chosen for odd identifiers.
    #[serde(default = "default_q1")]
    pub q1: PathBuf,

    /// Artifact B, chosen for even identifiers.
    #[serde(default = "default_q2")]
    pub q2: PathBuf,
}

fn default_q1() -> PathBuf {
    PathBuf::from("resources/sql/q1.sql")
}

fn default_q2() -> PathBuf {
    PathBuf::from("resources/sql/q2.sql")
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            q1: default_q1(),
            q2: default_q2(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File the selected artifact is written to. Overwritten on every run.
    #[serde(default = "default_store_file")]
    pub store_file: PathBuf,
}

fn default_store_file() -> PathBuf {
    PathBuf::from("final_query.sql")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// JSON field carrying the query in the submission body.
    #[serde(default = "default_query_field")]
    pub query_field: String,
}

fn default_query_field() -> String {
    "finalQuery".to_string()
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            query_field: default_query_field(),
        }
    }
}

/// HTTP client settings shared by both calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("qualifier/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
