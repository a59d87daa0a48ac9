//! `qualifier config`: print the resolved configuration.

use anyhow::Result;

use qualifier_types::config::QualifierConfig;

pub fn show(config: &QualifierConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
