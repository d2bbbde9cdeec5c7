use condo_domain::{EntityId, UnitPayload};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, seed};

pub struct UnitForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl UnitForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &UnitPayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&UnitPayload>) -> Self {
        let mut defaults = FieldValues::new();
        match initial {
            Some(data) => {
                seed(&mut defaults, "block_id", Some(&data.block_id));
                seed(&mut defaults, "number", Some(&data.number));
                seed(&mut defaults, "area_m2", data.area_m2);
                seed(&mut defaults, "bedrooms", Some(data.bedrooms));
                seed(&mut defaults, "parking_spaces", Some(data.parking_spaces));
            }
            None => seed(&mut defaults, "parking_spaces", Some(0)),
        }
        Self {
            descriptor: WizardDescriptor::new(
                "unit",
                "Unit",
                "units",
                vec![
                    StepDescriptor::new(
                        "Identification",
                        vec![
                            FieldDescriptor::new(
                                "block_id",
                                "Block",
                                FieldKind::Reference,
                                Validator::NonEmpty,
                            )
                            .with_alias("blockId"),
                            FieldDescriptor::new(
                                "number",
                                "Unit number",
                                FieldKind::Text,
                                Validator::MaxLength(10),
                            )
                            .with_help("e.g. 101 or 12B"),
                        ],
                    ),
                    StepDescriptor::new(
                        "Details",
                        vec![
                            FieldDescriptor::new(
                                "area_m2",
                                "Private area (m²)",
                                FieldKind::Decimal,
                                Validator::PositiveNumber,
                            )
                            .with_optional()
                            .with_alias("areaM2"),
                            FieldDescriptor::new(
                                "bedrooms",
                                "Bedrooms",
                                FieldKind::Integer,
                                Validator::IntegerRange { min: 0, max: 20 },
                            ),
                            FieldDescriptor::new(
                                "parking_spaces",
                                "Parking spaces",
                                FieldKind::Integer,
                                Validator::IntegerRange { min: 0, max: 10 },
                            )
                            .with_alias("parkingSpaces"),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for UnitForm {
    type Payload = UnitPayload;

    fn descriptor(&self) -> &WizardDescriptor {
        &self.descriptor
    }

    fn mode(&self) -> &FormMode {
        &self.mode
    }

    fn defaults(&self) -> FieldValues {
        self.defaults.clone()
    }

    fn to_wire(&self, values: &FieldValues, _: &SessionContext) -> Result<UnitPayload, DraftError> {
        Ok(UnitPayload {
            block_id: values::text(values, "block_id"),
            number: values::text(values, "number"),
            area_m2: values::optional_decimal(values, "area_m2", "Private area")?,
            bedrooms: values::whole(values, "bedrooms", "Bedrooms")?,
            parking_spaces: values::whole(values, "parking_spaces", "Parking spaces")?,
        })
    }
}
