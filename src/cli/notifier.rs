use crate::cli::output;
use crate::wizard::{NotificationSink, Severity};

/// Prints wizard notifications with the CLI output helpers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => output::success(message),
            Severity::Error => output::error(message),
            Severity::Warning => output::warning(message),
            Severity::Info => output::info(message),
        }
    }
}
