//! `qualifier run`: execute the flow against the real service and disk.

use anyhow::{Context, Result};
use console::style;

use qualifier_core::flow::QualifierFlow;
use qualifier_infra::filesystem::LocalFileSystem;
use qualifier_infra::http::HttpRemoteService;
use qualifier_types::config::QualifierConfig;
use qualifier_types::flow::{FlowReport, SubmissionOutcome};

/// Run the flow once and print its report.
///
/// Fatal flow errors are returned; a failed submission is only reported.
pub async fn run(config: QualifierConfig, json: bool, quiet: bool) -> Result<()> {
    let remote = HttpRemoteService::from_config(&config).context("Failed to build HTTP client")?;
    let flow = QualifierFlow::new(remote, LocalFileSystem::new(), config);

    let report = flow.run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &FlowReport) {
    println!();
    println!(
        "  {} Qualifier run {}",
        style("⚡").bold(),
        style(report.run_id).dim()
    );
    println!();
    println!(
        "  Artifact:   {} ({})",
        style(report.choice).cyan().bold(),
        report.artifact_source.display()
    );
    println!("  Stored to:  {}", report.output_path.display());
    println!("  Submitted:  {}", report.target);
    println!(
        "  Auth:       {}",
        if report.authorized {
            style("token attached").green()
        } else {
            style("no token").yellow()
        }
    );

    match &report.submission {
        SubmissionOutcome::Accepted { response } => {
            println!("  Response:   {} {}", style("✓").green(), response);
        }
        SubmissionOutcome::Failed { warning } => {
            println!("  Response:   {} {}", style("✗").red(), style(warning).red());
        }
    }

    let elapsed = report.finished_at - report.started_at;
    println!();
    println!(
        "  {}",
        style(format!("Flow complete in {} ms", elapsed.num_milliseconds())).dim()
    );
    println!();
}
