use serde::{Deserialize, Serialize};

/// General utility events for warnings and operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    Warning { message: String },

    DebugLog { message: String },

    OperationStarted { operation: String },

    OperationCompleted { operation: String, success: bool },
}

impl GeneralEvent {
    /// Create a debug log event
    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
