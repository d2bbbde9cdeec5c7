use condo_domain::{ContactPayload, EntityId};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, seed};

pub struct ContactForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl ContactForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &ContactPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&ContactPayload>) -> Self {
        let mut defaults = FieldValues::new();
        if let Some(data) = initial {
            seed(&mut defaults, "name", Some(&data.name));
            seed(&mut defaults, "role", data.role.as_ref());
            seed(&mut defaults, "email", data.email.as_ref());
            seed(&mut defaults, "phone", data.phone.as_ref());
        }
        Self {
            descriptor: WizardDescriptor::new(
                "contact",
                "Contact",
                "contacts",
                vec![
                    StepDescriptor::new(
                        "Identification",
                        vec![
                            FieldDescriptor::new(
                                "name",
                                "Name",
                                FieldKind::Text,
                                Validator::MaxLength(120),
                            ),
                            FieldDescriptor::new(
                                "role",
                                "Role",
                                FieldKind::Text,
                                Validator::MaxLength(60),
                            )
                            .with_optional()
                            .with_help("e.g. Syndic, Doorman, Accountant"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Channels",
                        vec![
                            FieldDescriptor::new("email", "E-mail", FieldKind::Text, Validator::Email)
                                .with_optional(),
                            FieldDescriptor::new("phone", "Phone", FieldKind::Text, Validator::Phone)
                                .with_optional(),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for ContactForm {
    type Payload = ContactPayload;

    fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn defaults(&self) -> FieldValues {
        self.defaults.clone()
    }

    fn to_wire(
        &self,
        values: &FieldValues,
        session: &SessionContext,
    ) -> Result<ContactPayload, DraftError> {
        let email = values::optional_text(values, "email");
        let phone = values::optional_digits(values, "phone");
        if email.is_none() && phone.is_none() {
            return Err(DraftError::new("email", "Provide an e-mail or a phone number"));
        }
        Ok(ContactPayload {
            organization_id: session.organization_id().map(str::to_string),
            name: values::text(values, "name"),
            role: values::optional_text(values, "role"),
            email,
            phone,
        })
    }
}
