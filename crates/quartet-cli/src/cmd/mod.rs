use anyhow::{bail, Result};
use serde::Serialize;

use quartet_store::{ContentLayout, FileIssue};

use crate::args::{Cli, Command};
use crate::output;

mod promote;
mod upload;
mod validate;

pub async fn dispatch(cli: Cli) -> Result<()> {
    let layout = ContentLayout::new(&cli.root);
    match &cli.command {
        Command::Validate { files } => validate::run(&layout, files).await,
        Command::Upload {
            env,
            files,
            dry_run,
        } => upload::run(&cli, &layout, *env, files, *dry_run).await,
        Command::Promote {
            source,
            target,
            dry_run,
            overwrite,
        } => promote::run(&cli, *source, *target, *dry_run, *overwrite).await,
    }
}

#[derive(Debug, Serialize)]
struct RejectedOut<'a> {
    ok: bool,
    issues: &'a [FileIssue],
}

/// Report schema issues and fail the command.
fn reject(issues: &[FileIssue]) -> Result<()> {
    if output::is_json() {
        output::print(&RejectedOut { ok: false, issues })?;
    } else {
        output::issues(issues)?;
    }
    bail!("validation failed with {} issue(s)", issues.len())
}
