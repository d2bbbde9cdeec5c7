use condo_domain::{EntityId, OrganizationPayload};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, format_cep, format_cnpj, seed};

/// Management company wizard. Checked remotely on every forward move; a logo
/// may be attached.
pub struct OrganizationForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl OrganizationForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &OrganizationPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&OrganizationPayload>) -> Self {
        let mut defaults = FieldValues::new();
        if let Some(data) = initial {
            seed(&mut defaults, "name", Some(&data.name));
            seed(&mut defaults, "cnpj", Some(format_cnpj(&data.cnpj)));
            seed(&mut defaults, "email", Some(&data.email));
            seed(&mut defaults, "phone", Some(&data.phone));
            seed(&mut defaults, "cep", Some(format_cep(&data.cep)));
            seed(&mut defaults, "city", Some(&data.city));
            seed(&mut defaults, "state", Some(&data.state));
        }
        Self {
            descriptor: WizardDescriptor::new(
                "organization",
                "Organization",
                "organizations",
                vec![
                    StepDescriptor::new(
                        "Company",
                        vec![
                            FieldDescriptor::new(
                                "name",
                                "Company name",
                                FieldKind::Text,
                                Validator::MaxLength(120),
                            )
                            .with_alias("legalName"),
                            FieldDescriptor::new("cnpj", "CNPJ", FieldKind::Text, Validator::Cnpj)
                                .with_alias("doc"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Contact",
                        vec![
                            FieldDescriptor::new("email", "E-mail", FieldKind::Text, Validator::Email),
                            FieldDescriptor::new("phone", "Phone", FieldKind::Text, Validator::Phone),
                        ],
                    ),
                    StepDescriptor::new(
                        "Address",
                        vec![
                            FieldDescriptor::new("cep", "CEP", FieldKind::Text, Validator::Cep),
                            FieldDescriptor::new("city", "City", FieldKind::Text, Validator::NonEmpty),
                            FieldDescriptor::new(
                                "state",
                                "State",
                                FieldKind::Text,
                                Validator::StateCode,
                            ),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for OrganizationForm {
    type Payload = OrganizationPayload;

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
        Some("logo")
    }

    fn to_wire(
        &self,
        values: &FieldValues,
        _: &SessionContext,
    ) -> Result<OrganizationPayload, DraftError> {
        Ok(OrganizationPayload {
            name: values::text(values, "name"),
            cnpj: values::digits(values, "cnpj"),
            email: values::text(values, "email"),
            phone: values::digits(values, "phone"),
            cep: values::digits(values, "cep"),
            city: values::text(values, "city"),
            state: values::text(values, "state").to_ascii_uppercase(),
        })
    }
}
