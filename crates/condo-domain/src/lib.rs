//! condo-domain
//!
//! Wire-level records exchanged with the condominium administration API.
//! No I/O, no terminal, no wizard state. Only payload types, identifiers and
//! document helpers.

pub mod address;
pub mod block;
pub mod condominium;
pub mod contact;
pub mod documents;
pub mod ids;
pub mod invoice;
pub mod issue;
pub mod organization;
pub mod resident;
pub mod unit;
pub mod vehicle;

pub use address::*;
pub use block::*;
pub use condominium::*;
pub use contact::*;
pub use ids::*;
pub use invoice::*;
pub use issue::*;
pub use organization::*;
pub use resident::*;
pub use unit::*;
pub use vehicle::*;
