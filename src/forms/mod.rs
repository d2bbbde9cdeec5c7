//! Entity configurations plugged into the generic wizard.

pub mod block;
pub mod catalog;
pub mod condominium;
pub mod contact;
pub mod invoice;
pub mod organization;
pub mod resident;
pub mod unit;
pub mod vehicle;
mod values;

pub use block::BlockForm;
pub use catalog::{EntityKind, UnknownEntity};
pub use condominium::CondominiumForm;
pub use contact::ContactForm;
pub use invoice::InvoiceForm;
pub use organization::OrganizationForm;
pub use resident::ResidentForm;
pub use unit::UnitForm;
pub use vehicle::VehicleForm;
