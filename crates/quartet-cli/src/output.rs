use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use quartet_store::FileIssue;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(choice(io::stdout().is_terminal()))
}

pub fn stderr() -> StandardStream {
    StandardStream::stderr(choice(io::stderr().is_terminal()))
}

fn choice(tty: bool) -> ColorChoice {
    if tty {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Write `label` in `color`, padded to a column, followed by `text`.
pub fn tagged(out: &mut StandardStream, color: Color, label: &str, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label:>12}")?;
    out.reset()?;
    writeln!(out, " {text}")
}

/// Print every issue to stderr, one per line.
pub fn issues(list: &[FileIssue]) -> io::Result<()> {
    let mut err = stderr();
    for issue in list {
        tagged(&mut err, Color::Red, "error", &issue.to_string())?;
    }
    Ok(())
}

/// Spinner on stderr; hidden in JSON mode.
pub fn spinner(msg: &'static str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(msg);
    pb
}
