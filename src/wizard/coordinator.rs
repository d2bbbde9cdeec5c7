//! Submission Coordinator: drives a [`Wizard`] against an [`EntityBackend`]
//! and reports terminal outcomes to a [`NotificationSink`].

use std::sync::{Arc, Mutex};

use condo_config::{Config, UnroutablePolicy};
use condo_domain::{AssetId, EntityId, ValidationIssue};
use tracing::warn;

use crate::backend::{EntityBackend, SecondaryAsset};
use crate::errors::WizardError;

use super::engine::{AdvanceOutcome, AdvanceStart, SubmissionResolution, SubmitBlocked, Wizard};
use super::form::EntityForm;
use super::notify::{NotificationSink, Severity};

type SavedCallback = Box<dyn Fn(&EntityId) + Send + Sync>;

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Stored. `asset` is `None` when nothing was attached.
    Saved {
        id: EntityId,
        asset: Option<Result<AssetId, String>>,
    },
    /// The API refused the draft. `step` is where the wizard now stands.
    Rejected {
        step: Option<usize>,
        unroutable: Vec<ValidationIssue>,
    },
    Failed(WizardError),
    /// Nothing was sent.
    Blocked(SubmitBlocked),
    /// Another submission was already in flight.
    Ignored,
    /// The wizard was closed before the response arrived.
    Discarded,
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

/// Async front of a wizard. Cheap to share by reference across tasks; the
/// wizard lock is never held across an await point.
pub struct WizardController<F: EntityForm> {
    wizard: Arc<Mutex<Wizard<F>>>,
    backend: Arc<dyn EntityBackend>,
    sink: Arc<dyn NotificationSink>,
    policy: UnroutablePolicy,
    fallback_message: String,
    on_saved: Option<SavedCallback>,
}

impl<F: EntityForm> WizardController<F> {
    pub fn new(
        wizard: Wizard<F>,
        backend: Arc<dyn EntityBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            backend,
            sink,
            policy: UnroutablePolicy::default(),
            fallback_message: Config::default_generic_error_message(),
            on_saved: None,
        }
    }

    /// Takes the unroutable-issue policy and fallback message from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.policy = config.unroutable_issues;
        self.fallback_message = config.generic_error_message.clone();
        self
    }

    pub fn with_policy(mut self, policy: UnroutablePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Called with the stored id after every successful save.
    pub fn on_saved(mut self, callback: impl Fn(&EntityId) + Send + Sync + 'static) -> Self {
        self.on_saved = Some(Box::new(callback));
        self
    }

    /// Runs `f` with the wizard locked.
    pub fn with_wizard<R>(&self, f: impl FnOnce(&mut Wizard<F>) -> R) -> R {
        let mut guard = match self.wizard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn set_field(&self, key: &str, value: impl Into<String>) -> bool {
        self.with_wizard(|wizard| wizard.set_field(key, value))
    }

    pub fn attach_asset(&self, asset: SecondaryAsset) -> Result<(), WizardError> {
        self.with_wizard(|wizard| wizard.attach_asset(asset))
    }

    pub fn back(&self) -> bool {
        self.with_wizard(Wizard::back)
    }

    pub fn close(&self) {
        self.with_wizard(Wizard::close);
    }

    /// Forward navigation, including the remote check when the form asks for one.
    pub async fn next(&self) -> AdvanceOutcome {
        let ticket = match self.with_wizard(Wizard::begin_advance) {
            AdvanceStart::Done(outcome) => return outcome,
            AdvanceStart::NeedsRemote(ticket) => ticket,
        };

        let result = self.backend.validate(ticket.resource, &ticket.payload).await;
        let outcome = self.with_wizard(|wizard| wizard.finish_advance(ticket, result));

        match &outcome {
            AdvanceOutcome::Rerouted { unroutable, .. } => self.warn_unroutable(unroutable),
            AdvanceOutcome::Unrouted(issues) if issues.is_empty() => {
                self.sink.notify(&self.fallback_message, Severity::Error);
            }
            AdvanceOutcome::Unrouted(issues) => self.warn_unroutable(issues),
            AdvanceOutcome::Indeterminate(err) => {
                self.sink
                    .notify(&err.user_message(&self.fallback_message), Severity::Error);
            }
            _ => {}
        }
        outcome
    }

    /// Commits the draft. A call made while another is pending is ignored.
    pub async fn submit(&self) -> SubmitOutcome {
        let ticket = match self.with_wizard(Wizard::begin_submission) {
            Ok(ticket) => ticket,
            Err(SubmitBlocked::Busy) => return SubmitOutcome::Ignored,
            Err(blocked) => {
                if let SubmitBlocked::Encoding(err) = &blocked {
                    warn!(error = %err, "draft could not be encoded");
                    self.sink.notify(&self.fallback_message, Severity::Error);
                }
                return SubmitOutcome::Blocked(blocked);
            }
        };
        let title = self.with_wizard(|wizard| wizard.descriptor().title);

        let result = match &ticket.editing {
            Some(id) => self.backend.update(ticket.resource, id, &ticket.payload).await,
            None => self.backend.create(ticket.resource, &ticket.payload).await,
        };

        // The wizard stays busy until the attachment settles.
        let mut asset = None;
        if let (Ok(id), Some(file)) = (&result, &ticket.asset) {
            if self.with_wizard(|wizard| wizard.is_current(ticket.generation())) {
                let upload = self
                    .backend
                    .upload_secondary_asset(ticket.resource, id, file)
                    .await
                    .map_err(|err| {
                        warn!(submission = %ticket.id(), slot = file.slot, error = %err, "attachment upload failed");
                        err.user_message(&self.fallback_message)
                    });
                asset = Some(upload);
            }
        }

        match self.with_wizard(|wizard| wizard.finish_submission(&ticket, result)) {
            SubmissionResolution::Saved(id) => {
                let verb = if ticket.editing.is_some() { "updated" } else { "created" };
                self.sink
                    .notify(&format!("{} {}.", title, verb), Severity::Success);
                if let (Some(Err(reason)), Some(file)) = (&asset, &ticket.asset) {
                    self.sink.notify(
                        &format!("{} saved, but the {} upload failed: {}", title, file.slot, reason),
                        Severity::Warning,
                    );
                }
                if let Some(callback) = &self.on_saved {
                    callback(&id);
                }
                SubmitOutcome::Saved { id, asset }
            }
            SubmissionResolution::Rejected {
                step,
                message,
                unroutable,
            } => {
                let mut text = message
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| self.fallback_message.clone());
                if self.policy == UnroutablePolicy::Warn && !unroutable.is_empty() {
                    text = format!("{} {}", text, describe_issues(&unroutable));
                }
                self.sink.notify(&text, Severity::Error);
                SubmitOutcome::Rejected { step, unroutable }
            }
            SubmissionResolution::Failed(err) => {
                self.sink
                    .notify(&err.user_message(&self.fallback_message), Severity::Error);
                SubmitOutcome::Failed(err)
            }
            SubmissionResolution::Stale => SubmitOutcome::Discarded,
        }
    }

    fn warn_unroutable(&self, issues: &[ValidationIssue]) {
        if issues.is_empty() || self.policy == UnroutablePolicy::Drop {
            return;
        }
        self.sink.notify(&describe_issues(issues), Severity::Warning);
    }
}

fn describe_issues(issues: &[ValidationIssue]) -> String {
    let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!("Please also check: {}", listed.join("; "))
}
