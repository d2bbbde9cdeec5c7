use condo_domain::{EntityId, ResidentKind, ResidentPayload};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, format_cpf, seed};

/// Resident wizard. A profile photo may be attached.
pub struct ResidentForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl ResidentForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &ResidentPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&ResidentPayload>) -> Self {
        let mut defaults = FieldValues::new();
        match initial {
            Some(data) => {
                seed(&mut defaults, "name", Some(&data.name));
                seed(&mut defaults, "cpf", Some(format_cpf(&data.cpf)));
                seed(&mut defaults, "birth_date", data.birth_date);
                seed(&mut defaults, "email", data.email.as_ref());
                seed(&mut defaults, "phone", Some(&data.phone));
                seed(&mut defaults, "unit_id", Some(&data.unit_id));
                seed(&mut defaults, "kind", Some(data.kind.label()));
                seed(&mut defaults, "move_in_date", data.move_in_date);
            }
            None => seed(&mut defaults, "kind", Some(ResidentKind::Owner.label())),
        }

        let kinds = ResidentKind::ALL
            .iter()
            .map(|kind| kind.label().to_string())
            .collect();

        Self {
            descriptor: WizardDescriptor::new(
                "resident",
                "Resident",
                "residents",
                vec![
                    StepDescriptor::new(
                        "Personal",
                        vec![
                            FieldDescriptor::new(
                                "name",
                                "Full name",
                                FieldKind::Text,
                                Validator::MaxLength(120),
                            ),
                            FieldDescriptor::new("cpf", "CPF", FieldKind::Text, Validator::Cpf),
                            FieldDescriptor::new(
                                "birth_date",
                                "Birth date",
                                FieldKind::Date,
                                Validator::None,
                            )
                            .with_optional()
                            .with_alias("birthDate")
                            .with_help("YYYY-MM-DD"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Contact",
                        vec![
                            FieldDescriptor::new("email", "E-mail", FieldKind::Text, Validator::Email)
                                .with_optional(),
                            FieldDescriptor::new("phone", "Phone", FieldKind::Text, Validator::Phone)
                                .with_help("Area code included, e.g. (11) 98765-4321"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Residence",
                        vec![
                            FieldDescriptor::new(
                                "unit_id",
                                "Unit",
                                FieldKind::Reference,
                                Validator::NonEmpty,
                            )
                            .with_alias("unitId"),
                            FieldDescriptor::new(
                                "kind",
                                "Resident type",
                                FieldKind::Choice(kinds),
                                Validator::None,
                            ),
                            FieldDescriptor::new(
                                "move_in_date",
                                "Move-in date",
                                FieldKind::Date,
                                Validator::None,
                            )
                            .with_optional()
                            .with_alias("moveInDate"),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for ResidentForm {
    type Payload = ResidentPayload;

    fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn defaults(&self) -> FieldValues {
        self.defaults.clone()
    }

    fn asset_slot(&self) -> Option<&'static str> {
        Some("photo")
    }

    fn to_wire(
        &self,
        values: &FieldValues,
        _: &SessionContext,
    ) -> Result<ResidentPayload, DraftError> {
        let kind = ResidentKind::from_label(&values::text(values, "kind"))
            .ok_or_else(|| DraftError::new("kind", "Choose owner, tenant or dependent"))?;
        Ok(ResidentPayload {
            name: values::text(values, "name"),
            cpf: values::digits(values, "cpf"),
            birth_date: values::optional_date(values, "birth_date")?,
            email: values::optional_text(values, "email"),
            phone: values::digits(values, "phone"),
            unit_id: values::text(values, "unit_id"),
            kind,
            move_in_date: values::optional_date(values, "move_in_date")?,
        })
    }
}
