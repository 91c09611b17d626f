use anyhow::Result;
use serde::Serialize;
use termcolor::Color;

use quartet_store::local::load_puzzles;
use quartet_store::ContentLayout;

use crate::output;

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub ok: bool,
    pub files: Vec<String>,
}

pub async fn run(layout: &ContentLayout, inputs: &[String]) -> Result<()> {
    let batch = load_puzzles(layout, inputs)?;
    if !batch.is_clean() {
        return super::reject(&batch.issues);
    }

    let files: Vec<String> = batch.files.iter().map(|f| f.display.clone()).collect();
    if output::is_json() {
        return output::print(&ValidateOut { ok: true, files });
    }

    let mut out = output::stdout();
    for file in &files {
        output::tagged(&mut out, Color::Green, "ok", file)?;
    }
    if files.is_empty() {
        output::tagged(&mut out, Color::Yellow, "empty", "no puzzle files found")?;
    } else {
        output::tagged(&mut out, Color::Green, "valid", &format!("{} file(s)", files.len()))?;
    }
    Ok(())
}
