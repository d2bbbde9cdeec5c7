use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::driver::{FieldInput, FieldView, StepAction, StepInteraction, StepView};
use crate::cli::output;
use crate::errors::CliError;
use crate::wizard::FieldKind;

/// Terminal implementation of [`StepInteraction`] built on dialoguer.
pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_choice(&self, field: &FieldView, options: &[String]) -> Result<FieldInput, CliError> {
        let current = field
            .value
            .as_deref()
            .and_then(|value| options.iter().position(|option| option.eq_ignore_ascii_case(value)))
            .unwrap_or(0);
        let choice = Select::with_theme(&self.theme)
            .with_prompt(field.label)
            .items(options)
            .default(current)
            .interact_opt()?;
        Ok(match choice {
            Some(index) if field.value.as_deref() == Some(options[index].as_str()) => {
                FieldInput::Keep
            }
            Some(index) => FieldInput::Value(options[index].clone()),
            None => FieldInput::Cancel,
        })
    }

    fn prompt_text(&self, field: &FieldView) -> Result<FieldInput, CliError> {
        let prompt = if field.required {
            field.label.to_string()
        } else {
            format!("{} (optional)", field.label)
        };
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(value) = &field.value {
            input = input.default(value.clone());
        }
        let answer = input.interact_text()?;
        if field.value.as_deref() == Some(answer.as_str()) {
            Ok(FieldInput::Keep)
        } else {
            Ok(FieldInput::Value(answer))
        }
    }
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl StepInteraction for DialoguerInteraction {
    fn show_step(&mut self, step: &StepView) {
        output::section(step.heading());
        if step.has_errors() {
            output::warning("Please review the highlighted fields.");
        }
    }

    fn prompt_field(&mut self, field: &FieldView) -> Result<FieldInput, CliError> {
        if let Some(error) = &field.error {
            output::error(format!("{}: {}", field.label, error));
        }
        if let Some(help) = field.help {
            output::info(help);
        }
        match &field.kind {
            FieldKind::Choice(options) => self.prompt_choice(field, options),
            _ => self.prompt_text(field),
        }
    }

    fn choose_action(&mut self, step: &StepView) -> Result<StepAction, CliError> {
        let mut actions = Vec::new();
        if step.is_last {
            actions.push((if step.editing { "Save changes" } else { "Create" }, StepAction::Submit));
        } else {
            actions.push(("Next", StepAction::Next));
        }
        if step.index > 0 {
            actions.push(("Back", StepAction::Back));
        }
        actions.push(("Cancel", StepAction::Cancel));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Continue")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(choice
            .and_then(|index| actions.get(index))
            .map(|(_, action)| *action)
            .unwrap_or(StepAction::Cancel))
    }
}
