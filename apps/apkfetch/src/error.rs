//! CLI error handling

use std::fmt;

use apkfetch_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(apkfetch_errors::ConfigError),
    /// Operations error
    Ops(apkfetch_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl CliError {
    /// Stable error code, when there is one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_code(),
            CliError::Ops(e) => e.user_code(),
            CliError::Io(_) => None,
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<apkfetch_errors::ConfigError> for CliError {
    fn from(e: apkfetch_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<apkfetch_errors::Error> for CliError {
    fn from(e: apkfetch_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
