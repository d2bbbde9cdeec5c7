use condo_config::ConfigError;
use condo_domain::ValidationIssue;
use thiserror::Error;

use crate::wizard::DefinitionError;

/// Failures of the wizard engine and of the operations it calls.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The request never produced a response (DNS, connection, timeout).
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Server error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },
    /// The API refused the draft and listed the offending fields.
    #[error("Request rejected with {} issue(s)", issues.len())]
    Rejected {
        message: Option<String>,
        issues: Vec<ValidationIssue>,
    },
    #[error("Unexpected response: {0}")]
    UnexpectedShape(String),
    #[error("Invalid wizard definition: {0}")]
    Definition(#[from] DefinitionError),
    #[error("The {0} form does not accept attachments")]
    AssetUnsupported(&'static str),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    /// Human-readable text sent by the server, when there is any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            WizardError::Server { message, .. } | WizardError::Rejected { message, .. } => message
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty()),
            _ => None,
        }
    }

    /// Message for a notification: the server's own words, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Prompt failed: {0}")]
    Prompt(String),
    #[error("{0}")]
    Usage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status: 2 for usage mistakes, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = WizardError::Server {
            status: 500,
            message: Some("CNPJ already registered".into()),
        };
        assert_eq!(err.user_message("fallback"), "CNPJ already registered");
    }

    #[test]
    fn blank_or_missing_message_uses_fallback() {
        let blank = WizardError::Server {
            status: 502,
            message: Some("   ".into()),
        };
        let transport = WizardError::Transport("connection refused".into());
        assert_eq!(blank.user_message("Try again"), "Try again");
        assert_eq!(transport.user_message("Try again"), "Try again");
    }

    #[test]
    fn server_display_without_message() {
        let err = WizardError::Server {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "Server error (503): no message");
    }
}
