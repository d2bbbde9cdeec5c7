use condo_domain::EntityId;
use serde::Serialize;
use thiserror::Error;

use super::session::SessionContext;
use super::steps::WizardDescriptor;
use super::store::FieldValues;

/// Whether the wizard creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

impl FormMode {
    pub fn editing_id(&self) -> Option<&EntityId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

/// A draft value that cannot be expressed in the wire payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct DraftError {
    pub field: &'static str,
    pub message: String,
}

impl DraftError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Entity-specific configuration plugged into the generic wizard.
///
/// Implementations describe their steps and fields, supply defaults (the
/// existing record when editing), and map the collected values into the typed
/// payload the API expects.
pub trait EntityForm: Send + Sync {
    type Payload: Serialize;

    /// Descriptor controlling step order, fields and validators.
    fn descriptor(&self) -> &WizardDescriptor;

    fn mode(&self) -> &FormMode;

    /// Values used to seed the form state.
    fn defaults(&self) -> FieldValues {
        FieldValues::new()
    }

    /// Whether forward navigation asks the API for a non-committing check.
    fn uses_remote_validation(&self) -> bool {
        false
    }

    /// Name of the attachment uploaded after a successful save, if any.
    fn asset_slot(&self) -> Option<&'static str> {
        None
    }

    /// Draft-to-wire mapping. Strips display punctuation and parses numbers.
    fn to_wire(
        &self,
        values: &FieldValues,
        session: &SessionContext,
    ) -> Result<Self::Payload, DraftError>;
}
