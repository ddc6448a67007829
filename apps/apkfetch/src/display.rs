//! Output rendering and formatting

use apkfetch_ops::{ImportReport, LockedArtifactSet, OperationResult, ProbeReport};
use console::{style, Term};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            return self.term.write_line(&json);
        }

        match result {
            OperationResult::Import(report) => self.render_import(report),
            OperationResult::Locked(set) => self.render_locked(set),
            OperationResult::Probe(report) => self.render_probe(report),
        }
    }

    fn render_import(&self, report: &ImportReport) -> io::Result<()> {
        self.term.write_line(&format!(
            "{} {} ({} bytes)",
            style(&report.name).bold(),
            report.path.display(),
            report.bytes
        ))?;
        self.term
            .write_line(&format!("  descriptor: {}", report.descriptor.display()))
    }

    fn render_locked(&self, set: &LockedArtifactSet) -> io::Result<()> {
        for (group, files) in set.output_groups() {
            self.term
                .write_line(&format!("{} ({})", style(group).bold(), files.len()))?;
            for file in files {
                self.term.write_line(&format!("  {}", file.display()))?;
            }
        }
        Ok(())
    }

    fn render_probe(&self, report: &ProbeReport) -> io::Result<()> {
        self.term.write_line(&format!(
            "{} {} honours range requests ({} strategy)",
            style("ok").green().bold(),
            report.url,
            report.strategy
        ))
    }
}
