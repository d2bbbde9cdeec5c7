use condo_domain::{BlockPayload, EntityId};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, seed};

pub struct BlockForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl BlockForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &BlockPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&BlockPayload>) -> Self {
        let mut defaults = FieldValues::new();
        if let Some(data) = initial {
            seed(&mut defaults, "condominium_id", Some(&data.condominium_id));
            seed(&mut defaults, "name", Some(&data.name));
            seed(&mut defaults, "floors", Some(data.floors));
            seed(&mut defaults, "units_per_floor", Some(data.units_per_floor));
        }
        Self {
            descriptor: WizardDescriptor::new(
                "block",
                "Block",
                "blocks",
                vec![
                    StepDescriptor::new(
                        "Identification",
                        vec![
                            FieldDescriptor::new(
                                "condominium_id",
                                "Condominium",
                                FieldKind::Reference,
                                Validator::NonEmpty,
                            )
                            .with_alias("condominiumId"),
                            FieldDescriptor::new(
                                "name",
                                "Block name",
                                FieldKind::Text,
                                Validator::MaxLength(60),
                            )
                            .with_help("e.g. Torre A"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Layout",
                        vec![
                            FieldDescriptor::new(
                                "floors",
                                "Floors",
                                FieldKind::Integer,
                                Validator::IntegerRange { min: 1, max: 200 },
                            ),
                            FieldDescriptor::new(
                                "units_per_floor",
                                "Units per floor",
                                FieldKind::Integer,
                                Validator::IntegerRange { min: 1, max: 50 },
                            )
                            .with_alias("unitsPerFloor"),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for BlockForm {
    type Payload = BlockPayload;

    fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn defaults(&self) -> FieldValues {
        self.defaults.clone()
    }

    fn to_wire(&self, values: &FieldValues, _: &SessionContext) -> Result<BlockPayload, DraftError> {
        Ok(BlockPayload {
            condominium_id: values::text(values, "condominium_id"),
            name: values::text(values, "name"),
            floors: values::whole(values, "floors", "Floors")?,
            units_per_floor: values::whole(values, "units_per_floor", "Units per floor")?,
        })
    }
}
