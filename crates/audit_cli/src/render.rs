use std::io::{self, Write};

use audit_core::{AppViewModel, ViewPhase};
use chrono::Local;

/// Writes what changed since the last render: new log lines, then the
/// result or error once the scan is over.
pub(crate) struct Renderer {
    printed_logs: usize,
    json: bool,
}

impl Renderer {
    pub fn new(json: bool) -> Self {
        Self {
            printed_logs: 0,
            json,
        }
    }

    pub fn render(&mut self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        for line in view.logs.iter().skip(self.printed_logs) {
            writeln!(out, "{}", log_line(line))?;
        }
        self.printed_logs = view.logs.len();

        match view.phase {
            ViewPhase::Results => self.render_result(view, out)?,
            ViewPhase::Error => {
                let error = view.error.as_deref().unwrap_or("scan failed");
                writeln!(out, "Scan failed: {error}")?;
            }
            ViewPhase::Idle if view.quota_reached => {
                writeln!(out, "Scan quota reached. Upgrade your plan to run more scans.")?;
            }
            ViewPhase::Idle | ViewPhase::Loading => {}
        }
        out.flush()
    }

    fn render_result(&self, view: &AppViewModel, out: &mut impl Write) -> io::Result<()> {
        let Some(result) = &view.result else {
            return Ok(());
        };
        if self.json {
            let pretty = serde_json::to_string_pretty(result.as_json()).map_err(io::Error::other)?;
            return writeln!(out, "{pretty}");
        }
        writeln!(out, "Scan complete: {}", result.url().unwrap_or("(unknown url)"))?;
        if let Some(score) = result.as_json().get("global_score") {
            writeln!(out, "  global score: {score}")?;
        }
        if let Some(competitor) = result.competitor() {
            let url = competitor.get("url").and_then(|v| v.as_str()).unwrap_or("?");
            writeln!(out, "  competitor: {url}")?;
        }
        if let Some(winner) = result.winner() {
            writeln!(out, "  winner: {winner}")?;
        }
        Ok(())
    }
}

fn log_line(message: &str) -> String {
    format!("[{}] {message}", Local::now().format("%H:%M:%S"))
}
