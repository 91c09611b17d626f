use anyhow::Result;
use serde::Serialize;
use termcolor::Color;

use quartet_core::env::Environment;
use quartet_store::{upload_from_disk, ContentLayout, StoreError, UploadOptions, UploadReport};

use crate::args::Cli;
use crate::{output, store};

#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub ok: bool,
    pub env: Environment,
    #[serde(flatten)]
    pub report: UploadReport,
}

pub async fn run(
    cli: &Cli,
    layout: &ContentLayout,
    env: Environment,
    inputs: &[String],
    dry_run: bool,
) -> Result<()> {
    let (store, config) = store::open(cli).await?;
    let bucket = config.bucket(env);
    let opts = UploadOptions {
        dry_run,
        overwrite: false,
    };

    let pb = output::spinner("uploading puzzles");
    let result = upload_from_disk(&*store, bucket, layout, inputs, opts).await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(StoreError::Validation(issues)) => return super::reject(&issues),
        Err(e) => return Err(e.into()),
    };

    if output::is_json() {
        return output::print(&UploadOut { ok: true, env, report });
    }

    let mut out = output::stdout();
    let target = format!("{env} ({})", report.bucket);
    output::tagged(&mut out, Color::Cyan, "target", &target)?;

    let verb = if report.dry_run { "would upload" } else { "uploaded" };
    for key in &report.uploaded {
        output::tagged(&mut out, Color::Green, verb, key)?;
    }
    for key in &report.skipped {
        output::tagged(&mut out, Color::Blue, "skipped", key)?;
    }
    for key in &report.remote_only {
        output::tagged(&mut out, Color::Magenta, "remote-only", key)?;
    }

    let manifest = if report.manifest_written {
        "written"
    } else if report.dry_run {
        "not written (dry run)"
    } else {
        "not written (no puzzles)"
    };
    output::tagged(&mut out, Color::Cyan, "manifest", manifest)?;
    output::tagged(
        &mut out,
        Color::Cyan,
        "summary",
        &format!(
            "{} {}, {} skipped, {} remote-only",
            report.uploaded.len(),
            verb,
            report.skipped.len(),
            report.remote_only.len()
        ),
    )?;
    Ok(())
}
