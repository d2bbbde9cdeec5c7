use chrono::NaiveDate;
use condo_domain::documents::is_valid_digitable_line;
use condo_domain::{format_amount, parse_amount_cents, EntityId, InvoicePayload};

use crate::wizard::{
    DraftError, EntityForm, FieldDescriptor, FieldKind, FieldValues, FormMode, SessionContext,
    StepDescriptor, Validator, WizardDescriptor,
};

use super::values::{self, seed};

/// Fee slip wizard. The bank-issued PDF may be attached.
pub struct InvoiceForm {
    descriptor: WizardDescriptor,
    mode: FormMode,
    defaults: FieldValues,
}

impl InvoiceForm {
    pub fn new_create() -> Self {
        Self::build(FormMode::Create, None)
    }

    pub fn new_edit(id: EntityId, existing: &InvoicePayload) -> Self {
        Self::build(FormMode::Edit(id), Some(existing))
    }

    fn build(mode: FormMode, initial: Option<&InvoicePayload>) -> Self {
        let mut defaults = FieldValues::new();
        if let Some(data) = initial {
            seed(&mut defaults, "unit_id", Some(&data.unit_id));
            seed(&mut defaults, "reference_month", Some(&data.reference_month));
            seed(&mut defaults, "description", data.description.as_ref());
            seed(&mut defaults, "amount", Some(format_amount(data.amount_cents)));
            seed(&mut defaults, "due_date", Some(data.due_date));
            seed(&mut defaults, "digitable_line", Some(&data.digitable_line));
        }

        Self {
            descriptor: WizardDescriptor::new(
                "invoice",
                "Invoice",
                "invoices",
                vec![
                    StepDescriptor::new(
                        "Billing",
                        vec![
                            FieldDescriptor::new(
                                "unit_id",
                                "Unit",
                                FieldKind::Reference,
                                Validator::NonEmpty,
                            )
                            .with_alias("unitId"),
                            FieldDescriptor::new(
                                "reference_month",
                                "Reference month",
                                FieldKind::Text,
                                Validator::custom(|input| {
                                    reference_month(input)
                                        .ok_or_else(|| "Use YYYY-MM format".to_string())
                                }),
                            )
                            .with_alias("referenceMonth")
                            .with_help("YYYY-MM"),
                            FieldDescriptor::new(
                                "description",
                                "Description",
                                FieldKind::Text,
                                Validator::MaxLength(140),
                            )
                            .with_optional(),
                        ],
                    ),
                    StepDescriptor::new(
                        "Payment",
                        vec![
                            FieldDescriptor::new(
                                "amount",
                                "Amount (R$)",
                                FieldKind::Decimal,
                                Validator::custom(|input| match parse_amount_cents(input) {
                                    Some(0) => Err("Amount must be greater than zero".to_string()),
                                    Some(cents) => Ok(format_amount(cents)),
                                    None => Err("Enter an amount such as 1.234,56".to_string()),
                                }),
                            )
                            .with_alias("amountCents"),
                            FieldDescriptor::new(
                                "due_date",
                                "Due date",
                                FieldKind::Date,
                                Validator::Date,
                            )
                            .with_alias("dueDate")
                            .with_help("YYYY-MM-DD"),
                            FieldDescriptor::new(
                                "digitable_line",
                                "Digitable line",
                                FieldKind::Text,
                                Validator::custom(|input| {
                                    if is_valid_digitable_line(input) {
                                        Ok(input.trim().to_string())
                                    } else {
                                        Err("Digitable line is not valid".to_string())
                                    }
                                }),
                            )
                            .with_alias("digitableLine"),
                        ],
                    ),
                ],
            ),
            mode,
            defaults,
        }
    }
}

/// `YYYY-MM` with a real month.
fn reference_month(input: &str) -> Option<String> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}

impl EntityForm for InvoiceForm {
    type Payload = InvoicePayload;

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
        Some("document")
    }

    fn to_wire(
        &self,
        values: &FieldValues,
        _: &SessionContext,
    ) -> Result<InvoicePayload, DraftError> {
        let reference_month = reference_month(&values::text(values, "reference_month"))
            .ok_or_else(|| DraftError::new("reference_month", "Use YYYY-MM format"))?;
        let amount_cents = parse_amount_cents(&values::text(values, "amount"))
            .ok_or_else(|| DraftError::new("amount", "Amount must be a number"))?;
        let due_date = values::optional_date(values, "due_date")?
            .ok_or_else(|| DraftError::new("due_date", "Due date is required"))?;
        Ok(InvoicePayload {
            unit_id: values::text(values, "unit_id"),
            reference_month,
            description: values::optional_text(values, "description"),
            amount_cents,
            due_date,
            digitable_line: values::digits(values, "digitable_line"),
        })
    }
}
