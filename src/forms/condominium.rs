use condo_domain::{AddressPayload, CondominiumPayload, EntityId};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, format_cep, format_cnpj, seed};

/// Condominium wizard: general data, address, billing settings.
///
/// Forward navigation is checked by the API, and a facade image can be
/// attached after the record is saved.
pub struct CondominiumForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl CondominiumForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &CondominiumPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&CondominiumPayload>) -> Self {
        let mut defaults = FieldValues::new();
        match initial {
            Some(data) => {
                seed(&mut defaults, "name", Some(&data.name));
                seed(&mut defaults, "doc", Some(format_cnpj(&data.cnpj)));
                seed(&mut defaults, "email", data.email.as_ref());
                seed(&mut defaults, "cep", Some(format_cep(&data.address.cep)));
                seed(&mut defaults, "street", Some(&data.address.street));
                seed(&mut defaults, "number", Some(&data.address.number));
                seed(&mut defaults, "complement", data.address.complement.as_ref());
                seed(&mut defaults, "district", Some(&data.address.district));
                seed(&mut defaults, "city", Some(&data.address.city));
                seed(&mut defaults, "state", Some(&data.address.state));
                seed(&mut defaults, "block_count", Some(data.block_count));
                seed(&mut defaults, "due_day", Some(data.due_day));
                seed(&mut defaults, "notes", data.notes.as_ref());
            }
            None => {
                // Remote validation sends the whole draft, so the numeric
                // settings must parse before the user reaches them.
                seed(&mut defaults, "block_count", Some(1));
                seed(&mut defaults, "due_day", Some(10));
            }
        }

        Self {
            descriptor: descriptor(),
            mode,
            defaults,
        }
    }
}

fn descriptor() -> WizardDescriptor {
    WizardDescriptor::new(
        "condominium",
        "Condominium",
        "condominiums",
        vec![
            StepDescriptor::new(
                "General",
                vec![
                    FieldDescriptor::new("name", "Name", FieldKind::Text, Validator::MaxLength(120)),
                    FieldDescriptor::new("doc", "CNPJ", FieldKind::Text, Validator::Cnpj)
                        .with_alias("cnpj")
                        .with_help("Punctuation is optional, e.g. 11.222.333/0001-81"),
                    FieldDescriptor::new("email", "E-mail", FieldKind::Text, Validator::Email)
                        .with_optional(),
                ],
            ),
            StepDescriptor::new(
                "Address",
                vec![
                    FieldDescriptor::new("cep", "CEP", FieldKind::Text, Validator::Cep)
                        .with_alias("address.cep"),
                    FieldDescriptor::new("street", "Street", FieldKind::Text, Validator::NonEmpty)
                        .with_alias("address.street"),
                    FieldDescriptor::new("number", "Number", FieldKind::Text, Validator::NonEmpty)
                        .with_alias("address.number"),
                    FieldDescriptor::new(
                        "complement",
                        "Complement",
                        FieldKind::Text,
                        Validator::MaxLength(60),
                    )
                    .with_optional()
                    .with_alias("address.complement"),
                    FieldDescriptor::new(
                        "district",
                        "District",
                        FieldKind::Text,
                        Validator::NonEmpty,
                    )
                    .with_alias("address.district"),
                    FieldDescriptor::new("city", "City", FieldKind::Text, Validator::NonEmpty)
                        .with_alias("address.city"),
                    FieldDescriptor::new("state", "State", FieldKind::Text, Validator::StateCode)
                        .with_alias("address.state"),
                ],
            ),
            StepDescriptor::new(
                "Settings",
                vec![
                    FieldDescriptor::new(
                        "block_count",
                        "Number of blocks",
                        FieldKind::Integer,
                        Validator::IntegerRange { min: 1, max: 100 },
                    )
                    .with_alias("blockCount"),
                    FieldDescriptor::new(
                        "due_day",
                        "Invoice due day",
                        FieldKind::Integer,
                        Validator::IntegerRange { min: 1, max: 28 },
                    )
                    .with_alias("dueDay")
                    .with_help("Day of the month, 1 to 28"),
                    FieldDescriptor::new("notes", "Notes", FieldKind::Text, Validator::MaxLength(500))
                        .with_optional(),
                ],
            ),
        ],
    )
}

impl EntityForm for CondominiumForm {
    type Payload = CondominiumPayload;

    fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn defaults(&self) -> FieldValues {
        self.defaults.clone()
    }

    fn uses_remote_validation(&self) -> bool {
        true
    }

    fn asset_slot(&self) -> Option<&'static str> {
        Some("image")
    }

    fn to_wire(
        &self,
        values: &FieldValues,
        session: &SessionContext,
    ) -> Result<CondominiumPayload, DraftError> {
        Ok(CondominiumPayload {
            organization_id: session.organization_id().map(str::to_string),
            name: values::text(values, "name"),
            cnpj: values::digits(values, "doc"),
            email: values::optional_text(values, "email"),
            address: AddressPayload {
                cep: values::digits(values, "cep"),
                street: values::text(values, "street"),
                number: values::text(values, "number"),
                complement: values::optional_text(values, "complement"),
                district: values::text(values, "district"),
                city: values::text(values, "city"),
                state: values::text(values, "state").to_ascii_uppercase(),
            },
            block_count: values::whole(values, "block_count", "Number of blocks")?,
            due_day: values::whole(values, "due_day", "Invoice due day")?,
            notes: values::optional_text(values, "notes"),
        })
    }
}
