//! The generic wizard: form state, sequencer and validator composed around an
//! [`EntityForm`].
//!
//! Remote work is split into `begin_*` / `finish_*` pairs. `begin_*` decides
//! synchronously and hands out a ticket carrying the payload to send;
//! `finish_*` applies the response. Nothing here awaits, so the same engine can
//! sit behind a UI event loop or the async [`super::WizardController`].
//!
//! A ticket is bound to the wizard generation it was issued in. Closing the
//! wizard bumps the generation, turning late responses into no-ops.

use condo_domain::{EntityId, ValidationIssue, ValidationReport};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::SecondaryAsset;
use crate::errors::WizardError;

use super::form::{DraftError, EntityForm};
use super::sequencer::StepSequencer;
use super::session::SessionContext;
use super::steps::{DefinitionError, StepFieldMap, WizardDescriptor};
use super::store::{FieldErrors, FieldValues, FormStateStore};
use super::validator::{route_issues, validate_step};

/// Pending non-committing validation request.
#[derive(Debug)]
pub struct ValidationTicket {
    generation: u64,
    pub resource: &'static str,
    pub payload: Value,
}

impl ValidationTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Pending create or update request.
#[derive(Debug)]
pub struct SubmissionTicket {
    id: Uuid,
    generation: u64,
    pub resource: &'static str,
    /// `Some` issues an update, `None` a create.
    pub editing: Option<EntityId>,
    pub payload: Value,
    pub asset: Option<SecondaryAsset>,
}

impl SubmissionTicket {
    /// Correlation id for logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub enum AdvanceStart {
    Done(AdvanceOutcome),
    NeedsRemote(ValidationTicket),
}

#[derive(Debug)]
pub enum AdvanceOutcome {
    /// Now on the contained step.
    Moved(usize),
    /// Forward navigation from the last step is a no-op.
    AtLastStep,
    /// Local validation failed for the active step.
    Blocked(FieldErrors),
    Busy,
    Closed,
    /// Remote validation failed; the sequencer jumped to `step`, the lowest
    /// step owning a failing field.
    Rerouted {
        step: usize,
        unroutable: Vec<ValidationIssue>,
    },
    /// Remote validation failed on fields no step owns; nothing moved.
    Unrouted(Vec<ValidationIssue>),
    /// The validation request itself failed; nothing moved.
    Indeterminate(WizardError),
    /// Response arrived after the wizard was closed.
    Stale,
}

#[derive(Debug)]
pub enum SubmitBlocked {
    Busy,
    Closed,
    NotAtLastStep,
    Invalid(FieldErrors),
    Draft(DraftError),
    Encoding(serde_json::Error),
}

#[derive(Debug)]
pub enum SubmissionResolution {
    Saved(EntityId),
    /// The API refused the draft; matched issues are now inline errors.
    Rejected {
        step: Option<usize>,
        message: Option<String>,
        unroutable: Vec<ValidationIssue>,
    },
    Failed(WizardError),
    Stale,
}

/// Wizard state for one open form.
pub struct Wizard<F: EntityForm> {
    form: F,
    field_map: StepFieldMap,
    sequencer: StepSequencer,
    store: FormStateStore,
    editing: Option<EntityId>,
    session: SessionContext,
    pending_asset: Option<SecondaryAsset>,
    busy: bool,
    closed: bool,
    generation: u64,
}

impl<F: EntityForm> Wizard<F> {
    pub fn new(form: F, session: SessionContext) -> Result<Self, DefinitionError> {
        let field_map = StepFieldMap::from_descriptor(form.descriptor())?;
        let sequencer = StepSequencer::new(field_map.step_count());
        let store = FormStateStore::new(form.defaults());
        let editing = form.mode().editing_id().cloned();
        debug!(
            wizard = form.descriptor().name,
            steps = field_map.step_count(),
            editing = editing.is_some(),
            "wizard opened"
        );
        Ok(Self {
            form,
            field_map,
            sequencer,
            store,
            editing,
            session,
            pending_asset: None,
            busy: false,
            closed: false,
            generation: 0,
        })
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn descriptor(&self) -> &WizardDescriptor {
        self.form.descriptor()
    }

    pub fn field_map(&self) -> &StepFieldMap {
        &self.field_map
    }

    pub fn active_step(&self) -> usize {
        self.sequencer.active()
    }

    pub fn step_count(&self) -> usize {
        self.sequencer.step_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.sequencer.is_last()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn editing_id(&self) -> Option<&EntityId> {
        self.editing.as_ref()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn values(&self) -> &FieldValues {
        self.store.values()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.store.value(key)
    }

    pub fn errors(&self) -> &FieldErrors {
        self.store.errors()
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.store.error(key)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Updates a field and clears its inline error. Unknown keys are refused.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.closed {
            return false;
        }
        if self.form.descriptor().field(key).is_none() {
            warn!(wizard = self.form.descriptor().name, key, "ignoring unknown field");
            return false;
        }
        self.store.set(key, value);
        true
    }

    pub fn attach_asset(&mut self, mut asset: SecondaryAsset) -> Result<(), WizardError> {
        let slot = self
            .form
            .asset_slot()
            .ok_or(WizardError::AssetUnsupported(self.form.descriptor().name))?;
        asset.slot = slot;
        self.pending_asset = Some(asset);
        Ok(())
    }

    /// Moves one step back and drops the errors of the step being left.
    pub fn back(&mut self) -> bool {
        if self.closed || self.busy {
            return false;
        }
        let leaving = self.sequencer.active();
        if !self.sequencer.go_back() {
            return false;
        }
        let keys = self.field_map.fields_of(leaving).to_vec();
        self.store.clear_errors_for(keys);
        debug!(wizard = self.form.descriptor().name, step = self.sequencer.active(), "moved back");
        true
    }

    /// First step, seeded values, no errors.
    pub fn reset(&mut self) {
        self.sequencer.reset();
        self.store.reset();
    }

    /// Tears the wizard down. Responses to tickets issued before are ignored.
    pub fn close(&mut self) {
        self.reset();
        self.pending_asset = None;
        self.busy = false;
        self.closed = true;
        self.generation += 1;
        debug!(wizard = self.form.descriptor().name, "wizard closed");
    }

    pub fn begin_advance(&mut self) -> AdvanceStart {
        if self.closed {
            return AdvanceStart::Done(AdvanceOutcome::Closed);
        }
        if self.busy {
            return AdvanceStart::Done(AdvanceOutcome::Busy);
        }
        if self.sequencer.is_last() {
            return AdvanceStart::Done(AdvanceOutcome::AtLastStep);
        }

        let step = self.sequencer.active();
        if let Err(errors) = self.check_step(step) {
            return AdvanceStart::Done(AdvanceOutcome::Blocked(errors));
        }
        if !self.form.uses_remote_validation() {
            return AdvanceStart::Done(self.move_forward());
        }

        let draft = self.form.to_wire(self.store.values(), &self.session);
        match draft {
            Ok(payload) => match serde_json::to_value(&payload) {
                Ok(payload) => {
                    self.busy = true;
                    AdvanceStart::NeedsRemote(ValidationTicket {
                        generation: self.generation,
                        resource: self.form.descriptor().resource,
                        payload,
                    })
                }
                Err(err) => AdvanceStart::Done(AdvanceOutcome::Indeterminate(err.into())),
            },
            Err(err) => match self.field_map.step_of(err.field) {
                // Later steps have not been filled in yet.
                Some(owner) if owner > step => {
                    debug!(field = err.field, "draft incomplete, remote validation deferred");
                    AdvanceStart::Done(self.move_forward())
                }
                _ => {
                    let errors = self.route_draft_error(&err);
                    AdvanceStart::Done(AdvanceOutcome::Blocked(errors))
                }
            },
        }
    }

    pub fn finish_advance(
        &mut self,
        ticket: ValidationTicket,
        result: Result<ValidationReport, WizardError>,
    ) -> AdvanceOutcome {
        if !self.is_current(ticket.generation) {
            debug!(wizard = self.form.descriptor().name, "discarding stale validation response");
            return AdvanceOutcome::Stale;
        }
        self.busy = false;

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                warn!(wizard = self.form.descriptor().name, error = %err, "remote validation failed");
                return AdvanceOutcome::Indeterminate(err);
            }
        };
        if report.valid {
            return self.move_forward();
        }

        let routing = route_issues(&self.field_map, &report.issues);
        match routing.target_step {
            Some(target) => {
                self.store.extend_errors(routing.errors);
                self.sequencer.jump_to(target);
                info!(
                    wizard = self.form.descriptor().name,
                    step = target,
                    "remote validation rejected draft"
                );
                AdvanceOutcome::Rerouted {
                    step: target,
                    unroutable: routing.unroutable,
                }
            }
            None => {
                warn!(
                    wizard = self.form.descriptor().name,
                    count = routing.unroutable.len(),
                    "validation issues could not be routed to a step"
                );
                AdvanceOutcome::Unrouted(routing.unroutable)
            }
        }
    }

    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, SubmitBlocked> {
        if self.closed {
            return Err(SubmitBlocked::Closed);
        }
        if self.busy {
            return Err(SubmitBlocked::Busy);
        }
        if !self.sequencer.is_last() {
            return Err(SubmitBlocked::NotAtLastStep);
        }

        for step in 0..self.sequencer.step_count() {
            if let Err(errors) = self.check_step(step) {
                self.sequencer.jump_to(step);
                return Err(SubmitBlocked::Invalid(errors));
            }
        }

        let draft = self.form.to_wire(self.store.values(), &self.session);
        let payload = match draft {
            Ok(payload) => payload,
            Err(err) => {
                self.route_draft_error(&err);
                return Err(SubmitBlocked::Draft(err));
            }
        };
        let payload = serde_json::to_value(&payload).map_err(SubmitBlocked::Encoding)?;

        self.busy = true;
        let ticket = SubmissionTicket {
            id: Uuid::new_v4(),
            generation: self.generation,
            resource: self.form.descriptor().resource,
            editing: self.editing.clone(),
            payload,
            asset: self.pending_asset.clone(),
        };
        info!(
            resource = ticket.resource,
            submission = %ticket.id,
            update = ticket.editing.is_some(),
            "submission started"
        );
        Ok(ticket)
    }

    pub fn finish_submission(
        &mut self,
        ticket: &SubmissionTicket,
        result: Result<EntityId, WizardError>,
    ) -> SubmissionResolution {
        if !self.is_current(ticket.generation) {
            info!(submission = %ticket.id, "discarding response for a closed wizard");
            return SubmissionResolution::Stale;
        }
        self.busy = false;

        match result {
            Ok(id) => {
                info!(resource = ticket.resource, submission = %ticket.id, id = %id, "saved");
                self.close();
                SubmissionResolution::Saved(id)
            }
            Err(WizardError::Rejected { message, issues }) => {
                let routing = route_issues(&self.field_map, &issues);
                if let Some(target) = routing.target_step {
                    self.store.extend_errors(routing.errors);
                    self.sequencer.jump_to(target);
                }
                warn!(submission = %ticket.id, issues = issues.len(), "submission rejected");
                SubmissionResolution::Rejected {
                    step: routing.target_step,
                    message,
                    unroutable: routing.unroutable,
                }
            }
            Err(err) => {
                warn!(submission = %ticket.id, error = %err, "submission failed");
                SubmissionResolution::Failed(err)
            }
        }
    }

    fn move_forward(&mut self) -> AdvanceOutcome {
        self.sequencer.go_next();
        debug!(wizard = self.form.descriptor().name, step = self.sequencer.active(), "moved forward");
        AdvanceOutcome::Moved(self.sequencer.active())
    }

    /// Validates `step`, writing normalized values back or replacing the
    /// step's inline errors.
    fn check_step(&mut self, step: usize) -> Result<(), FieldErrors> {
        match validate_step(self.form.descriptor(), step, &self.store) {
            Ok(normalized) => {
                for (key, value) in normalized {
                    self.store.set(&key, value);
                }
                Ok(())
            }
            Err(errors) => {
                let keys = self.field_map.fields_of(step).to_vec();
                self.store.clear_errors_for(keys);
                self.store.extend_errors(errors.clone());
                Err(errors)
            }
        }
    }

    fn route_draft_error(&mut self, err: &DraftError) -> FieldErrors {
        if let Some(owner) = self.field_map.step_of(err.field) {
            self.sequencer.jump_to(owner);
        }
        self.store.set_error(err.field, err.message.clone());
        FieldErrors::from([(err.field.to_string(), err.message.clone())])
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::wizard::field::{FieldDescriptor, FieldKind, Validator};
    use crate::wizard::form::FormMode;
    use crate::wizard::steps::StepDescriptor;

    #[derive(Serialize)]
    struct Draft {
        name: String,
        floors: u32,
    }

    struct TwoStepForm {
        descriptor: WizardDescriptor,
        mode: FormMode,
        remote: bool,
    }

    impl TwoStepForm {
        fn new(remote: bool) -> Self {
            Self {
                descriptor: WizardDescriptor::new(
                    "block",
                    "Block",
                    "blocks",
                    vec![
                        StepDescriptor::new(
                            "Identification",
                            vec![FieldDescriptor::new(
                                "name",
                                "Name",
                                FieldKind::Text,
                                Validator::NonEmpty,
                            )],
                        ),
                        StepDescriptor::new(
                            "Layout",
                            vec![FieldDescriptor::new(
                                "floors",
                                "Floors",
                                FieldKind::Integer,
                                Validator::IntegerRange { min: 1, max: 200 },
                            )],
                        ),
                    ],
                ),
                mode: FormMode::Create,
                remote,
            }
        }
    }

    impl EntityForm for TwoStepForm {
        type Payload = Draft;

        fn descriptor(&self) -> &WizardDescriptor {
            &self.descriptor
        }

        fn mode(&self) -> &FormMode {
            &self.mode
        }

        fn uses_remote_validation(&self) -> bool {
            self.remote
        }

        fn to_wire(&self, values: &FieldValues, _: &SessionContext) -> Result<Draft, DraftError> {
            let floors = values
                .get("floors")
                .and_then(|raw| raw.parse().ok())
                .ok_or_else(|| DraftError::new("floors", "Floors must be a whole number"))?;
            Ok(Draft {
                name: values.get("name").cloned().unwrap_or_default(),
                floors,
            })
        }
    }

    fn wizard(remote: bool) -> Wizard<TwoStepForm> {
        Wizard::new(TwoStepForm::new(remote), SessionContext::new()).unwrap()
    }

    #[test]
    fn local_failure_blocks_and_keeps_step() {
        let mut wizard = wizard(false);

        let AdvanceStart::Done(AdvanceOutcome::Blocked(errors)) = wizard.begin_advance() else {
            panic!("expected local validation to block");
        };

        assert!(errors.contains_key("name"));
        assert_eq!(wizard.active_step(), 0);
        assert!(wizard.error("name").is_some());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut wizard = wizard(false);
        wizard.begin_advance();

        assert!(wizard.set_field("name", "Torre A"));

        assert!(wizard.error("name").is_none());
    }

    #[test]
    fn unknown_fields_are_refused() {
        let mut wizard = wizard(false);
        assert!(!wizard.set_field("colour", "blue"));
        assert!(wizard.values().get("colour").is_none());
    }

    #[test]
    fn deferred_remote_check_when_later_fields_are_blank() {
        let mut wizard = wizard(true);
        wizard.set_field("name", "Torre A");

        let start = wizard.begin_advance();

        assert!(matches!(start, AdvanceStart::Done(AdvanceOutcome::Moved(1))));
        assert!(!wizard.is_busy());
    }

    #[test]
    fn remote_check_holds_busy_until_resolved() {
        let mut wizard = wizard(true);
        wizard.set_field("name", "Torre A");
        wizard.set_field("floors", "12");

        let AdvanceStart::NeedsRemote(ticket) = wizard.begin_advance() else {
            panic!("expected a remote validation ticket");
        };
        assert_eq!(ticket.payload["floors"], 12);
        assert!(wizard.is_busy());
        assert!(matches!(
            wizard.begin_advance(),
            AdvanceStart::Done(AdvanceOutcome::Busy)
        ));
        assert!(!wizard.back());

        let outcome = wizard.finish_advance(ticket, Ok(ValidationReport::valid()));

        assert!(matches!(outcome, AdvanceOutcome::Moved(1)));
        assert!(!wizard.is_busy());
    }

    #[test]
    fn remote_issue_for_a_later_step_is_kept_inline() {
        let mut wizard = wizard(true);
        wizard.set_field("name", "Torre A");
        wizard.set_field("floors", "12");
        let AdvanceStart::NeedsRemote(ticket) = wizard.begin_advance() else {
            panic!("expected a remote validation ticket");
        };

        let report =
            ValidationReport::invalid(vec![ValidationIssue::new("floors", "Too many floors")]);
        let outcome = wizard.finish_advance(ticket, Ok(report));

        assert!(matches!(outcome, AdvanceOutcome::Rerouted { step: 1, .. }));
        assert_eq!(wizard.active_step(), 1);
        assert_eq!(wizard.error("floors"), Some("Too many floors"));
    }

    #[test]
    fn transport_failure_during_validation_does_not_move() {
        let mut wizard = wizard(true);
        wizard.set_field("name", "Torre A");
        wizard.set_field("floors", "12");
        let AdvanceStart::NeedsRemote(ticket) = wizard.begin_advance() else {
            panic!("expected a remote validation ticket");
        };

        let outcome = wizard.finish_advance(ticket, Err(WizardError::Transport("timeout".into())));

        assert!(matches!(outcome, AdvanceOutcome::Indeterminate(_)));
        assert_eq!(wizard.active_step(), 0);
        assert!(!wizard.is_busy());
    }

    #[test]
    fn submission_requires_last_step() {
        let mut wizard = wizard(false);
        assert!(matches!(
            wizard.begin_submission(),
            Err(SubmitBlocked::NotAtLastStep)
        ));
    }

    #[test]
    fn second_submission_is_refused_while_first_is_pending() {
        let mut wizard = wizard(false);
        wizard.set_field("name", "Torre A");
        wizard.begin_advance();
        wizard.set_field("floors", "12");

        let ticket = wizard.begin_submission().unwrap();

        assert!(matches!(wizard.begin_submission(), Err(SubmitBlocked::Busy)));
        let resolution = wizard.finish_submission(&ticket, Ok(EntityId::new("b-1")));
        assert!(matches!(resolution, SubmissionResolution::Saved(_)));
        assert!(wizard.is_closed());
    }

    #[test]
    fn response_after_close_is_stale() {
        let mut wizard = wizard(false);
        wizard.set_field("name", "Torre A");
        wizard.begin_advance();
        wizard.set_field("floors", "12");
        let ticket = wizard.begin_submission().unwrap();

        wizard.close();
        let resolution = wizard.finish_submission(&ticket, Ok(EntityId::new("b-1")));

        assert!(matches!(resolution, SubmissionResolution::Stale));
        assert!(wizard.values().is_empty());
    }

    #[test]
    fn server_rejection_routes_to_owning_step() {
        let mut wizard = wizard(false);
        wizard.set_field("name", "Torre A");
        wizard.begin_advance();
        wizard.set_field("floors", "12");
        let ticket = wizard.begin_submission().unwrap();

        let resolution = wizard.finish_submission(
            &ticket,
            Err(WizardError::Rejected {
                message: None,
                issues: vec![ValidationIssue::new("Name", "Name already taken")],
            }),
        );

        assert!(matches!(
            resolution,
            SubmissionResolution::Rejected { step: Some(0), .. }
        ));
        assert_eq!(wizard.active_step(), 0);
        assert_eq!(wizard.error("name"), Some("Name already taken"));
        assert!(!wizard.is_busy());
    }

    #[test]
    fn back_clears_errors_of_the_step_left() {
        let mut wizard = wizard(false);
        wizard.set_field("name", "Torre A");
        wizard.begin_advance();
        wizard.set_field("floors", "0");
        wizard.begin_submission().unwrap_err();
        assert!(wizard.error("floors").is_some());

        assert!(wizard.back());

        assert!(wizard.error("floors").is_none());
        assert_eq!(wizard.value("floors"), Some("0"));
    }

    #[test]
    fn attachments_need_a_slot() {
        let mut wizard = wizard(false);
        let asset = SecondaryAsset::new("photo", "a.png", "image/png", vec![1]);
        assert!(matches!(
            wizard.attach_asset(asset),
            Err(WizardError::AssetUnsupported("block"))
        ));
    }
}
