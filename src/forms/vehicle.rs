use condo_domain::documents::normalize_plate;
use condo_domain::{EntityId, VehicleKind, VehiclePayload};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, seed};

pub struct VehicleForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl VehicleForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &VehiclePayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&VehiclePayload>) -> Self {
        let mut defaults = FieldValues::new();
        match initial {
            Some(data) => {
                seed(&mut defaults, "plate", Some(&data.plate));
                seed(&mut defaults, "kind", Some(data.kind.label()));
                seed(&mut defaults, "brand", Some(&data.brand));
                seed(&mut defaults, "model", Some(&data.model));
                seed(&mut defaults, "color", data.color.as_ref());
                seed(&mut defaults, "year", data.year);
                seed(&mut defaults, "unit_id", Some(&data.unit_id));
                seed(&mut defaults, "parking_space", data.parking_space.as_ref());
            }
            None => seed(&mut defaults, "kind", Some(VehicleKind::Car.label())),
        }

        let kinds = VehicleKind::ALL
            .iter()
            .map(|kind| kind.label().to_string())
            .collect();

        Self {
            descriptor: WizardDescriptor::new(
                "vehicle",
                "Vehicle",
                "vehicles",
                vec![
                    StepDescriptor::new(
                        "Vehicle",
                        vec![
                            FieldDescriptor::new(
                                "plate",
                                "Plate",
                                FieldKind::Text,
                                Validator::custom(|input| {
                                    normalize_plate(input).ok_or_else(|| {
                                        "Use ABC-1234 or the Mercosul ABC1D23 layout".to_string()
                                    })
                                }),
                            ),
                            FieldDescriptor::new(
                                "kind",
                                "Type",
                                FieldKind::Choice(kinds),
                                Validator::None,
                            ),
                            FieldDescriptor::new(
                                "brand",
                                "Brand",
                                FieldKind::Text,
                                Validator::MaxLength(40),
                            ),
                            FieldDescriptor::new(
                                "model",
                                "Model",
                                FieldKind::Text,
                                Validator::MaxLength(60),
                            ),
                            FieldDescriptor::new(
                                "color",
                                "Color",
                                FieldKind::Text,
                                Validator::MaxLength(30),
                            )
                            .with_optional(),
                            FieldDescriptor::new(
                                "year",
                                "Model year",
                                FieldKind::Integer,
                                Validator::IntegerRange {
                                    min: 1950,
                                    max: 2100,
                                },
                            )
                            .with_optional(),
                        ],
                    ),
                    StepDescriptor::new(
                        "Assignment",
                        vec![
                            FieldDescriptor::new(
                                "unit_id",
                                "Unit",
                                FieldKind::Reference,
                                Validator::NonEmpty,
                            )
                            .with_alias("unitId"),
                            FieldDescriptor::new(
                                "parking_space",
                                "Parking space",
                                FieldKind::Text,
                                Validator::MaxLength(10),
                            )
                            .with_optional()
                            .with_alias("parkingSpace"),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

impl EntityForm for VehicleForm {
    type Payload = VehiclePayload;

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
        _: &SessionContext,
    ) -> Result<VehiclePayload, DraftError> {
        let plate = normalize_plate(&values::text(values, "plate"))
            .ok_or_else(|| DraftError::new("plate", "Plate is not valid"))?;
        let kind = VehicleKind::from_label(&values::text(values, "kind"))
            .ok_or_else(|| DraftError::new("kind", "Choose car, motorcycle, truck or other"))?;
        let year = match values::optional_text(values, "year") {
            Some(_) => Some(values::whole(values, "year", "Model year")?),
            None => None,
        };
        Ok(VehiclePayload {
            plate,
            kind,
            brand: values::text(values, "brand"),
            model: values::text(values, "model"),
            color: values::optional_text(values, "color"),
            year,
            unit_id: values::text(values, "unit_id"),
            parking_space: values::optional_text(values, "parking_space"),
        })
    }
}
