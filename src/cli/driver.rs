//! Drives a [`WizardController`] from a step-oriented interaction surface.

use condo_domain::EntityId;

use crate::errors::CliError;
use crate::wizard::{
    AdvanceOutcome, EntityForm, FieldKind, SubmitBlocked, SubmitOutcome, Wizard, WizardController,
};

/// One field as the front end renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub value: Option<String>,
    pub error: Option<String>,
}

/// Snapshot of the active step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub title: &'static str,
    pub index: usize,
    pub total: usize,
    pub label: &'static str,
    pub editing: bool,
    pub is_last: bool,
    pub fields: Vec<FieldView>,
}

impl StepView {
    pub fn heading(&self) -> String {
        format!(
            "{} - Step {} of {} - {}",
            self.title,
            self.index + 1,
            self.total,
            self.label
        )
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|field| field.error.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Next,
    Back,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Value(String),
    Keep,
    Cancel,
}

/// Interaction surface used by [`run_wizard`]. The terminal implementation is
/// [`super::DialoguerInteraction`]; tests script their own.
pub trait StepInteraction {
    fn show_step(&mut self, step: &StepView);

    fn prompt_field(&mut self, field: &FieldView) -> Result<FieldInput, CliError>;

    fn choose_action(&mut self, step: &StepView) -> Result<StepAction, CliError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardRun {
    Saved(EntityId),
    Cancelled,
}

pub fn step_view<F: EntityForm>(wizard: &Wizard<F>) -> StepView {
    let descriptor = wizard.descriptor();
    let index = wizard.active_step();
    let (label, fields) = descriptor
        .steps
        .get(index)
        .map(|step| (step.label, step.fields.as_slice()))
        .unwrap_or_default();

    StepView {
        title: descriptor.title,
        index,
        total: wizard.step_count(),
        label,
        editing: wizard.editing_id().is_some(),
        is_last: wizard.is_last_step(),
        fields: fields
            .iter()
            .map(|field| FieldView {
                key: field.key,
                label: field.label,
                kind: field.kind.clone(),
                required: field.required,
                help: field.help,
                value: wizard
                    .value(field.key)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string),
                error: wizard.error(field.key).map(str::to_string),
            })
            .collect(),
    }
}

/// Runs the wizard until it is saved or cancelled.
///
/// Every pass shows the active step, collects its fields and applies one
/// navigation action. Inline errors show up on the next pass.
pub async fn run_wizard<F, I>(
    controller: &WizardController<F>,
    interaction: &mut I,
) -> Result<WizardRun, CliError>
where
    F: EntityForm,
    I: StepInteraction,
{
    loop {
        let view = controller.with_wizard(|wizard| step_view(wizard));
        interaction.show_step(&view);

        for field in &view.fields {
            match interaction.prompt_field(field)? {
                FieldInput::Value(value) => {
                    controller.set_field(field.key, value);
                }
                FieldInput::Keep => {}
                FieldInput::Cancel => {
                    controller.close();
                    return Ok(WizardRun::Cancelled);
                }
            }
        }

        let view = controller.with_wizard(|wizard| step_view(wizard));
        match interaction.choose_action(&view)? {
            StepAction::Next => match controller.next().await {
                AdvanceOutcome::Closed | AdvanceOutcome::Stale => return Ok(WizardRun::Cancelled),
                _ => {}
            },
            StepAction::Back => {
                controller.back();
            }
            StepAction::Submit => match controller.submit().await {
                SubmitOutcome::Saved { id, .. } => return Ok(WizardRun::Saved(id)),
                SubmitOutcome::Blocked(SubmitBlocked::Closed) | SubmitOutcome::Discarded => {
                    return Ok(WizardRun::Cancelled)
                }
                _ => {}
            },
            StepAction::Cancel => {
                controller.close();
                return Ok(WizardRun::Cancelled);
            }
        }
    }
}
