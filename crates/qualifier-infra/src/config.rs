//! Configuration loader for the qualifier flow.
//!
//! Reads `qualifier.toml`, deserializes it into [`QualifierConfig`], applies
//! CLI/environment overrides, and validates the result. Unlike optional
//! settings files, a missing or malformed config is fatal: there is no
//! sensible default identity to register.

use std::path::{Path, PathBuf};

use qualifier_types::config::QualifierConfig;
use qualifier_types::error::ConfigError;

/// File name looked up in the working directory and in `~/.qualifier/`.
pub const CONFIG_FILE_NAME: &str = "qualifier.toml";

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub name: Option<String>,
    pub reg_no: Option<String>,
    pub email: Option<String>,
    pub output: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Apply every set override to `config`.
    pub fn apply(&self, config: &mut QualifierConfig) {
        if let Some(name) = &self.name {
            config.candidate.name = name.clone();
        }
        if let Some(reg_no) = &self.reg_no {
            config.candidate.reg_no = reg_no.clone();
        }
        if let Some(email) = &self.email {
            config.candidate.email = email.clone();
        }
        if let Some(output) = &self.output {
            config.output.store_file = output.clone();
        }
    }
}

/// Resolve which config file to load.
///
/// Priority:
/// 1. An explicit path (`--config` / `QUALIFIER_CONFIG`)
/// 2. `./qualifier.toml` if it exists
/// 3. `~/.qualifier/qualifier.toml` if it exists
/// 4. `./qualifier.toml` (so the not-found error names the expected location)
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return local;
    }

    if let Some(home) = dirs::home_dir() {
        let user = home.join(".qualifier").join(CONFIG_FILE_NAME);
        if user.is_file() {
            return user;
        }
    }

    local
}

/// Load, override, and validate the configuration at `path`.
pub async fn load_config(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<QualifierConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    let mut config = toml::from_str::<QualifierConfig>(&content).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    tracing::debug!("Loaded config from {}", path.display());

    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}
