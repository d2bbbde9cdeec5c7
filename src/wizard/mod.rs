//! The generic step wizard and its collaborators.
//!
//! Entity modules plug in through [`EntityForm`]; the engine never names a
//! concrete entity.

pub mod coordinator;
pub mod engine;
pub mod field;
pub mod form;
pub mod notify;
pub mod sequencer;
pub mod session;
pub mod steps;
pub mod store;
pub mod validator;

pub use coordinator::{SubmitOutcome, WizardController};
pub use engine::{
    AdvanceOutcome, AdvanceStart, SubmissionResolution, SubmissionTicket, SubmitBlocked,
    ValidationTicket, Wizard,
};
pub use field::{FieldDescriptor, FieldKind, ValidationError, Validator};
pub use form::{DraftError, EntityForm, FormMode};
pub use notify::{NotificationSink, Severity, TracingSink};
pub use sequencer::StepSequencer;
pub use session::SessionContext;
pub use steps::{normalize_field_name, DefinitionError, StepDescriptor, StepFieldMap, WizardDescriptor};
pub use store::{FieldErrors, FieldValues, FormStateStore};
pub use validator::{route_issues, validate_step, IssueRouting};
