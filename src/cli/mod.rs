//! Terminal front end: colored output, a console notification sink and a
//! dialoguer-driven step loop.

pub mod app;
pub mod driver;
pub mod notifier;
pub mod output;
pub mod prompts;

pub use app::run_cli;
pub use driver::{run_wizard, FieldInput, FieldView, StepAction, StepInteraction, StepView, WizardRun};
pub use notifier::ConsoleNotifier;
pub use prompts::DialoguerInteraction;
