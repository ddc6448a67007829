#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in apkfetch
//!
//! Library crates never print. They report what they are doing as typed,
//! domain-grouped events on an unbounded channel; the CLI drains the channel
//! and renders or logs each event.

pub mod events;
pub use events::{
    AppEvent, DownloadEvent, FailureContext, GeneralEvent, ImportEvent, ImportKind, ProbeEvent,
};

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout apkfetch
///
/// Implemented for the raw `EventSender` and for any struct that carries
/// one, so call sites look the same either way.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::Warning {
            message: message.into(),
        }));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit a download started event
    fn emit_download_started(&self, url: impl Into<String>, range: Option<String>) {
        self.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.into(),
            range,
        }));
    }

    /// Emit a download completed event
    fn emit_download_completed(&self, url: impl Into<String>, bytes: u64) {
        self.emit(AppEvent::Download(DownloadEvent::Completed {
            url: url.into(),
            bytes,
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
