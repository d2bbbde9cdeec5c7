#![doc(test(attr(deny(warnings))))]

//! Condo Wizard provides one reusable step-wizard engine for the condominium
//! administration forms (condominiums, blocks, units, residents,
//! organizations, contacts), the external-operation seam it drives, a
//! JSON-over-HTTP implementation of that seam, and a terminal front end.

pub mod backend;
pub mod cli;
pub mod errors;
pub mod forms;
pub mod http;
pub mod utils;
pub mod wizard;

pub use condo_config as config;
pub use condo_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Condo wizard tracing initialized.");
    });
}
