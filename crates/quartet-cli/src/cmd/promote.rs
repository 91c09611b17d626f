use anyhow::Result;
use serde::Serialize;
use termcolor::Color;

use quartet_core::env::Environment;
use quartet_store::{promote, PromoteOptions, PromoteReport, StoreError};

use crate::args::Cli;
use crate::{output, store};

#[derive(Debug, Serialize)]
pub struct PromoteOut {
    pub ok: bool,
    pub source: Environment,
    pub target: Environment,
    #[serde(flatten)]
    pub report: PromoteReport,
}

pub async fn run(
    cli: &Cli,
    source: Environment,
    target: Environment,
    dry_run: bool,
    overwrite: bool,
) -> Result<()> {
    // Opening an S3 store may already touch the network.
    if source == target {
        return Err(StoreError::SameEnvironment(source).into());
    }
    let (store, config) = store::open(cli).await?;
    let opts = PromoteOptions { dry_run, overwrite };

    let pb = output::spinner("promoting puzzles");
    let result = promote(&*store, &config.namespace(source), &config.namespace(target), opts).await;
    pb.finish_and_clear();
    let report = result?;

    if output::is_json() {
        return output::print(&PromoteOut {
            ok: true,
            source,
            target,
            report,
        });
    }

    let mut out = output::stdout();
    let route = format!(
        "{source} ({}) -> {target} ({})",
        report.source_bucket, report.target_bucket
    );
    output::tagged(&mut out, Color::Cyan, "promote", &route)?;

    let verb = if report.dry_run { "would copy" } else { "copied" };
    for key in &report.copied {
        output::tagged(&mut out, Color::Green, verb, key)?;
    }
    for key in &report.skipped {
        output::tagged(&mut out, Color::Blue, "skipped", key)?;
    }
    for key in &report.remote_only {
        output::tagged(&mut out, Color::Magenta, "target-only", key)?;
    }

    let manifest = if report.manifest_copied {
        "copied"
    } else {
        "not copied (dry run)"
    };
    output::tagged(&mut out, Color::Cyan, "manifest", manifest)?;
    output::tagged(
        &mut out,
        Color::Cyan,
        "summary",
        &format!(
            "{} {}, {} skipped, {} target-only",
            report.copied.len(),
            verb,
            report.skipped.len(),
            report.remote_only.len()
        ),
    )?;
    Ok(())
}
