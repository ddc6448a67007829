//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use apkfetch_events::{AppEvent, GeneralEvent, ImportEvent, ImportKind, ProbeEvent};
use console::{style, Term};

/// Event handler for progress display and user feedback
pub struct EventHandler {
    term: Term,
    /// Human-readable lines are suppressed in JSON mode
    json_mode: bool,
    debug_enabled: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(json_mode: bool, debug_enabled: bool) -> Self {
        Self {
            term: Term::stderr(),
            json_mode,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);
        if self.json_mode {
            return;
        }
        if let Some(line) = self.render(&event) {
            let _ = self.term.write_line(&line);
        }
    }

    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::General(GeneralEvent::Warning { message }) => {
                Some(format!("{} {message}", style("warning:").yellow().bold()))
            }
            AppEvent::General(GeneralEvent::DebugLog { message }) if self.debug_enabled => {
                Some(format!("{} {message}", style("debug:").dim()))
            }
            AppEvent::Import(ImportEvent::Started { kind, name, .. }) => Some(format!(
                "{} {} {name}",
                style("fetching").cyan(),
                kind_label(*kind)
            )),
            AppEvent::Import(ImportEvent::SegmentFetched {
                name,
                segment,
                bytes,
                verified,
            }) => {
                let check = if *verified {
                    style("verified").green().to_string()
                } else {
                    style("unchecked").dim().to_string()
                };
                Some(format!("  {name}: {segment} ({bytes} bytes, {check})"))
            }
            AppEvent::Import(ImportEvent::Completed { kind, name, path }) => Some(format!(
                "{} {} {name} -> {}",
                style("done").green().bold(),
                kind_label(*kind),
                path.display()
            )),
            AppEvent::Import(ImportEvent::Failed {
                kind,
                name,
                failure,
            }) => Some(format!(
                "{} {} {name}: {}",
                style("failed").red().bold(),
                kind_label(*kind),
                failure.message
            )),
            AppEvent::Probe(ProbeEvent::Verified { url }) => Some(format!(
                "{} range requests honoured by {url}",
                style("ok").green()
            )),
            AppEvent::Probe(ProbeEvent::Failed { url, .. }) => Some(format!(
                "{} range probe failed for {url}",
                style("failed").red().bold()
            )),
            _ => None,
        }
    }
}

fn kind_label(kind: ImportKind) -> &'static str {
    match kind {
        ImportKind::Package => "package",
        ImportKind::Index => "index",
        ImportKind::Keyring => "keyring",
    }
}
