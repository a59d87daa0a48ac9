//! `qualifier select`: dry run of the parity selector.

use std::path::Path;

use anyhow::Result;
use console::style;

use qualifier_core::selector::explain_selection;
use qualifier_types::artifact::ArtifactChoice;
use qualifier_types::config::QualifierConfig;

use super::{OverrideArgs, load};

/// Identifier to explain, plus the config it came from (if any).
#[derive(Debug)]
pub struct SelectTarget {
    pub identifier: String,
    pub config: Option<QualifierConfig>,
}

/// Pick the identifier for `select`.
///
/// An explicit identifier wins. Otherwise the config is loaded with the same
/// overrides `run` would apply, so both commands agree on `reg_no`.
pub async fn resolve_identifier(
    config_path: Option<&Path>,
    identifier: Option<&str>,
    overrides: &OverrideArgs,
) -> Result<SelectTarget> {
    match identifier {
        Some(identifier) => Ok(SelectTarget {
            identifier: identifier.to_string(),
            config: None,
        }),
        None => {
            let config = load(config_path, overrides).await?;
            Ok(SelectTarget {
                identifier: config.candidate.reg_no.clone(),
                config: Some(config),
            })
        }
    }
}

/// Explain which artifact the target identifier selects.
///
/// When the identifier came from the config, the configured artifact path is
/// shown as well.
pub fn select(target: SelectTarget, json: bool) -> Result<()> {
    let SelectTarget { identifier, config } = target;

    let selection = explain_selection(&identifier)?;
    let source = config
        .as_ref()
        .map(|c| c.artifact_path(selection.choice).display().to_string());
    let parity = if selection.choice == ArtifactChoice::A {
        "odd"
    } else {
        "even"
    };

    if json {
        let out = serde_json::json!({
            "identifier": identifier,
            "digits": selection.digits,
            "suffix": selection.suffix,
            "value": selection.value,
            "parity": parity,
            "choice": selection.choice,
            "source": source,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  Identifier: {}", style(&identifier).bold());
    println!("  Digits:     {}", selection.digits);
    println!("  Suffix:     {} ({parity})", selection.suffix);
    match source {
        Some(source) => println!(
            "  Artifact:   {} ({source})",
            style(selection.choice).cyan().bold()
        ),
        None => println!("  Artifact:   {}", style(selection.choice).cyan().bold()),
    }
    println!();
    Ok(())
}
