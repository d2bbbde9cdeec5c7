#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use condo_wizard::backend::{EntityBackend, SecondaryAsset};
use condo_wizard::domain::{AssetId, EntityId, ValidationIssue, ValidationReport};
use condo_wizard::errors::{Result, WizardError};
use condo_wizard::wizard::{
    EntityForm, NotificationSink, SessionContext, Severity, Wizard, WizardController,
};
use serde_json::Value;

/// One call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Validate { resource: String, payload: Value },
    Create { resource: String, payload: Value },
    Update { resource: String, id: EntityId, payload: Value },
    Upload { resource: String, id: EntityId, slot: String },
}

/// Scripted in-memory backend. Unscripted validations pass, creates return
/// `new-1`, updates echo the id and uploads succeed.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    reports: Mutex<VecDeque<Result<ValidationReport>>>,
    saves: Mutex<VecDeque<Result<EntityId>>>,
    failing_upload: bool,
    yielding: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(self, report: ValidationReport) -> Self {
        self.push_report(Ok(report));
        self
    }

    pub fn with_validation_error(self, err: WizardError) -> Self {
        self.push_report(Err(err));
        self
    }

    pub fn with_save_error(self, err: WizardError) -> Self {
        lock(&self.saves).push_back(Err(err));
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.failing_upload = true;
        self
    }

    /// Saves yield to the scheduler once before answering.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    fn push_report(&self, report: Result<ValidationReport>) {
        lock(&self.reports).push_back(report);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn validate_calls(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Validate { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn save_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. } | Call::Update { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl EntityBackend for RecordingBackend {
    async fn validate(&self, resource: &str, payload: &Value) -> Result<ValidationReport> {
        self.record(Call::Validate {
            resource: resource.to_string(),
            payload: payload.clone(),
        });
        lock(&self.reports)
            .pop_front()
            .unwrap_or_else(|| Ok(ValidationReport::valid()))
    }

    async fn create(&self, resource: &str, payload: &Value) -> Result<EntityId> {
        self.record(Call::Create {
            resource: resource.to_string(),
            payload: payload.clone(),
        });
        if self.yielding {
            tokio::task::yield_now().await;
        }
        lock(&self.saves)
            .pop_front()
            .unwrap_or_else(|| Ok(EntityId::new("new-1")))
    }

    async fn update(&self, resource: &str, id: &EntityId, payload: &Value) -> Result<EntityId> {
        self.record(Call::Update {
            resource: resource.to_string(),
            id: id.clone(),
            payload: payload.clone(),
        });
        if self.yielding {
            tokio::task::yield_now().await;
        }
        lock(&self.saves).pop_front().unwrap_or_else(|| Ok(id.clone()))
    }

    async fn upload_secondary_asset(
        &self,
        resource: &str,
        id: &EntityId,
        asset: &SecondaryAsset,
    ) -> Result<AssetId> {
        self.record(Call::Upload {
            resource: resource.to_string(),
            id: id.clone(),
            slot: asset.slot.to_string(),
        });
        if self.failing_upload {
            Err(WizardError::Server {
                status: 413,
                message: Some("File too large".into()),
            })
        } else {
            Ok(AssetId::new("asset-1"))
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        lock(&self.messages).clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages()
            .iter()
            .filter(|(_, kind)| *kind == severity)
            .count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, severity: Severity) {
        lock(&self.messages).push((message.to_string(), severity));
    }
}

pub fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn controller<F: EntityForm>(
    form: F,
    backend: &Arc<RecordingBackend>,
    sink: &Arc<RecordingSink>,
) -> WizardController<F> {
    let session = SessionContext::new().with_organization("org-1");
    let wizard = Wizard::new(form, session).expect("valid wizard definition");
    WizardController::new(wizard, backend.clone(), sink.clone())
}

pub fn fill<F: EntityForm>(controller: &WizardController<F>, pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        assert!(controller.set_field(key, *value), "unknown field {}", key);
    }
}

pub const CONDOMINIUM_GENERAL: &[(&str, &str)] = &[
    ("name", "Residencial Aurora"),
    ("doc", "11.222.333/0001-81"),
];

pub const CONDOMINIUM_ADDRESS: &[(&str, &str)] = &[
    ("cep", "01310-100"),
    ("street", "Av. Paulista"),
    ("number", "1000"),
    ("district", "Bela Vista"),
    ("city", "São Paulo"),
    ("state", "SP"),
];

pub fn issue(field: &str, message: &str) -> ValidationIssue {
    ValidationIssue::new(field, message)
}
