mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{
    controller, fill, issue, Call, RecordingBackend, RecordingSink, CONDOMINIUM_ADDRESS,
    CONDOMINIUM_GENERAL,
};
use condo_wizard::backend::SecondaryAsset;
use condo_wizard::config::UnroutablePolicy;
use condo_wizard::domain::{BlockPayload, EntityId, ValidationReport};
use condo_wizard::errors::WizardError;
use condo_wizard::forms::{BlockForm, CondominiumForm, ContactForm, InvoiceForm, ResidentForm};
use condo_wizard::wizard::{AdvanceOutcome, Severity, SubmitBlocked, SubmitOutcome};

fn setup() -> (Arc<RecordingBackend>, Arc<RecordingSink>) {
    (
        Arc::new(RecordingBackend::new()),
        Arc::new(RecordingSink::default()),
    )
}

#[tokio::test]
async fn fresh_wizard_creates() {
    let (backend, sink) = setup();
    let saved = Arc::new(AtomicUsize::new(0));
    let counter = saved.clone();
    let wizard = controller(BlockForm::new_create(), &backend, &sink).on_saved(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    fill(&wizard, &[("condominium_id", "c-1"), ("name", "Torre A")]);
    assert!(matches!(wizard.next().await, AdvanceOutcome::Moved(1)));
    fill(&wizard, &[("floors", "12"), ("units_per_floor", "4")]);

    let outcome = wizard.submit().await;

    match outcome {
        SubmitOutcome::Saved { id, asset } => {
            assert_eq!(id, EntityId::new("new-1"));
            assert!(asset.is_none());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::Create { resource, .. } if resource == "blocks"));
    assert_eq!(
        sink.messages(),
        vec![("Block created.".to_string(), Severity::Success)]
    );
    assert_eq!(saved.load(Ordering::SeqCst), 1);
    wizard.with_wizard(|w| {
        assert!(w.is_closed());
        assert_eq!(w.active_step(), 0);
        assert!(w.values().is_empty());
    });
}

#[tokio::test]
async fn editing_wizard_updates() {
    let (backend, sink) = setup();
    let existing = BlockPayload {
        condominium_id: "c-1".into(),
        name: "Torre A".into(),
        floors: 12,
        units_per_floor: 4,
    };
    let wizard = controller(
        BlockForm::new_edit(EntityId::new("abc"), &existing),
        &backend,
        &sink,
    );

    assert!(matches!(wizard.next().await, AdvanceOutcome::Moved(1)));
    fill(&wizard, &[("floors", "14")]);
    let outcome = wizard.submit().await;

    assert!(outcome.is_saved());
    match &backend.calls()[..] {
        [Call::Update { id, payload, .. }] => {
            assert_eq!(id, &EntityId::new("abc"));
            assert_eq!(payload["floors"], 14);
            assert_eq!(payload["name"], "Torre A");
        }
        other => panic!("unexpected calls: {:?}", other),
    }
    assert_eq!(sink.messages()[0].0, "Block updated.");
}

#[tokio::test]
async fn remote_issue_routes_back_to_owning_step() {
    let backend = Arc::new(
        RecordingBackend::new()
            .with_report(ValidationReport::valid())
            .with_report(ValidationReport::invalid(vec![issue("doc", "CNPJ invalid")])),
    );
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);

    fill(&wizard, CONDOMINIUM_GENERAL);
    assert!(matches!(wizard.next().await, AdvanceOutcome::Moved(1)));
    fill(&wizard, CONDOMINIUM_ADDRESS);

    let outcome = wizard.next().await;

    assert!(matches!(
        outcome,
        AdvanceOutcome::Rerouted { step: 0, ref unroutable } if unroutable.is_empty()
    ));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 0);
        assert_eq!(w.error("doc"), Some("CNPJ invalid"));
        assert!(!w.is_busy());
    });
    assert_eq!(backend.validate_calls().len(), 2);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn validation_payload_is_the_full_wire_draft() {
    let (backend, sink) = setup();
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);

    fill(&wizard, CONDOMINIUM_GENERAL);
    wizard.next().await;

    let payloads = backend.validate_calls();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["cnpj"], "11222333000181");
    assert_eq!(payloads[0]["organizationId"], "org-1");
    assert_eq!(payloads[0]["blockCount"], 1);
    assert_eq!(payloads[0]["dueDay"], 10);
}

#[tokio::test]
async fn failed_upload_still_closes_with_success() {
    let backend = Arc::new(RecordingBackend::new().failing_upload());
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(ResidentForm::new_create(), &backend, &sink);
    wizard
        .attach_asset(SecondaryAsset::new("ignored", "ana.png", "image/png", vec![1, 2, 3]))
        .unwrap();

    fill(
        &wizard,
        &[("name", "Ana Souza"), ("cpf", "529.982.247-25")],
    );
    wizard.next().await;
    fill(&wizard, &[("phone", "(11) 98765-4321")]);
    wizard.next().await;
    fill(&wizard, &[("unit_id", "u-101")]);

    let outcome = wizard.submit().await;

    match outcome {
        SubmitOutcome::Saved { id, asset } => {
            assert_eq!(id, EntityId::new("new-1"));
            assert_eq!(asset, Some(Err("File too large".to_string())));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(matches!(
        &backend.calls()[1],
        Call::Upload { slot, id, .. } if slot == "photo" && id == &EntityId::new("new-1")
    ));
    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], ("Resident created.".to_string(), Severity::Success));
    assert_eq!(messages[1].1, Severity::Warning);
    assert!(messages[1].0.contains("photo"));
    wizard.with_wizard(|w| assert!(w.is_closed()));
}

#[tokio::test]
async fn invoice_is_sent_as_digits_and_uploads_its_slip() {
    let (backend, sink) = setup();
    let wizard = controller(InvoiceForm::new_create(), &backend, &sink);
    wizard
        .attach_asset(SecondaryAsset::new("pdf", "boleto.pdf", "application/pdf", vec![37]))
        .unwrap();

    fill(&wizard, &[("unit_id", "u-101"), ("reference_month", "2026-10")]);
    assert!(matches!(wizard.next().await, AdvanceOutcome::Moved(1)));
    fill(
        &wizard,
        &[
            ("amount", "R$ 1.234,56"),
            ("due_date", "2026-10-10"),
            (
                "digitable_line",
                "23791.23454 67890.123457 67890.123457 1 98760000015075",
            ),
        ],
    );

    let outcome = wizard.submit().await;

    assert!(outcome.is_saved());
    let calls = backend.calls();
    match &calls[0] {
        Call::Create { resource, payload } => {
            assert_eq!(resource, "invoices");
            assert_eq!(payload["amountCents"], 123_456);
            assert_eq!(
                payload["digitableLine"],
                "23791234546789012345767890123457198760000015075"
            );
        }
        other => panic!("unexpected call: {:?}", other),
    }
    assert!(matches!(&calls[1], Call::Upload { slot, .. } if slot == "document"));
    assert_eq!(
        sink.messages(),
        vec![("Invoice created.".to_string(), Severity::Success)]
    );
}

#[tokio::test]
async fn double_submit_sends_one_request() {
    let backend = Arc::new(RecordingBackend::new().yielding());
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(BlockForm::new_create(), &backend, &sink);
    fill(&wizard, &[("condominium_id", "c-1"), ("name", "Torre A")]);
    wizard.next().await;
    fill(&wizard, &[("floors", "12"), ("units_per_floor", "4")]);

    let (first, second) = tokio::join!(wizard.submit(), wizard.submit());

    assert!(first.is_saved());
    assert!(matches!(second, SubmitOutcome::Ignored));
    assert_eq!(backend.save_count(), 1);
    assert_eq!(sink.count(Severity::Success), 1);
}

#[tokio::test]
async fn response_after_close_is_discarded() {
    let backend = Arc::new(RecordingBackend::new().yielding());
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(BlockForm::new_create(), &backend, &sink);
    fill(&wizard, &[("condominium_id", "c-1"), ("name", "Torre A")]);
    wizard.next().await;
    fill(&wizard, &[("floors", "12"), ("units_per_floor", "4")]);

    let (outcome, _) = tokio::join!(wizard.submit(), async { wizard.close() });

    assert!(matches!(outcome, SubmitOutcome::Discarded));
    assert_eq!(backend.save_count(), 1);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn unroutable_issues_warn_once_without_moving() {
    let backend = Arc::new(RecordingBackend::new().with_report(ValidationReport::invalid(vec![
        issue("syndic", "Unknown syndic"),
        issue("plan", "Plan expired"),
    ])));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, CONDOMINIUM_GENERAL);

    let outcome = wizard.next().await;

    assert!(matches!(outcome, AdvanceOutcome::Unrouted(ref issues) if issues.len() == 2));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 0);
        assert!(w.errors().is_empty());
    });
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Warning);
    assert!(messages[0].0.contains("Unknown syndic"));
}

#[tokio::test]
async fn drop_policy_discards_unroutable_issues() {
    let backend = Arc::new(
        RecordingBackend::new()
            .with_report(ValidationReport::invalid(vec![issue("syndic", "Unknown syndic")])),
    );
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink)
        .with_policy(UnroutablePolicy::Drop);
    fill(&wizard, CONDOMINIUM_GENERAL);

    let outcome = wizard.next().await;

    assert!(matches!(outcome, AdvanceOutcome::Unrouted(_)));
    assert!(sink.messages().is_empty());
    wizard.with_wizard(|w| assert_eq!(w.active_step(), 0));
}

#[tokio::test]
async fn issues_for_unreached_steps_land_on_their_step() {
    let backend = Arc::new(RecordingBackend::new().with_report(ValidationReport::invalid(vec![
        issue("dueDay", "Due day conflicts with plan"),
        issue("address.cep", "CEP required"),
    ])));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, CONDOMINIUM_GENERAL);

    let outcome = wizard.next().await;

    assert!(matches!(
        outcome,
        AdvanceOutcome::Rerouted { step: 1, ref unroutable } if unroutable.is_empty()
    ));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 1);
        assert_eq!(w.error("cep"), Some("CEP required"));
        assert_eq!(w.error("due_day"), Some("Due day conflicts with plan"));
    });
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn issue_for_the_last_step_jumps_ahead_and_stays_inline() {
    let backend = Arc::new(RecordingBackend::new().with_report(ValidationReport::invalid(vec![
        issue("dueDay", "Due day conflicts with plan"),
    ])));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, CONDOMINIUM_GENERAL);

    assert!(matches!(wizard.next().await, AdvanceOutcome::Rerouted { step: 2, .. }));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 2);
        assert_eq!(w.error("due_day"), Some("Due day conflicts with plan"));
    });
}

#[tokio::test]
async fn invalid_report_without_issues_uses_fallback_message() {
    let backend =
        Arc::new(RecordingBackend::new().with_report(ValidationReport::invalid(Vec::new())));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink)
        .with_fallback_message("Could not validate the form.");
    fill(&wizard, CONDOMINIUM_GENERAL);

    let outcome = wizard.next().await;

    assert!(matches!(outcome, AdvanceOutcome::Unrouted(ref issues) if issues.is_empty()));
    assert_eq!(
        sink.messages(),
        vec![("Could not validate the form.".to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn validation_transport_failure_keeps_step() {
    let backend = Arc::new(
        RecordingBackend::new().with_validation_error(WizardError::Transport("timeout".into())),
    );
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, CONDOMINIUM_GENERAL);

    let outcome = wizard.next().await;

    assert!(matches!(outcome, AdvanceOutcome::Indeterminate(_)));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 0);
        assert!(!w.is_busy());
    });
    assert_eq!(sink.count(Severity::Error), 1);
}

#[tokio::test]
async fn local_errors_stay_inline() {
    let (backend, sink) = setup();
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, &[("name", "Aurora"), ("doc", "11.111.111/1111-11")]);

    let outcome = wizard.next().await;

    assert!(matches!(outcome, AdvanceOutcome::Blocked(ref errors) if errors.contains_key("doc")));
    assert!(backend.calls().is_empty());
    assert!(sink.messages().is_empty());

    fill(&wizard, &[("doc", "11.222.333/0001-81")]);
    wizard.with_wizard(|w| assert!(w.error("doc").is_none()));
}

#[tokio::test]
async fn commit_rejection_routes_and_reports_once() {
    let backend = Arc::new(RecordingBackend::new().with_save_error(WizardError::Rejected {
        message: Some("Invalid data".into()),
        issues: vec![issue("Name", "Name already taken"), issue("syndic", "Unknown syndic")],
    }));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(BlockForm::new_create(), &backend, &sink);
    fill(&wizard, &[("condominium_id", "c-1"), ("name", "Torre A")]);
    wizard.next().await;
    fill(&wizard, &[("floors", "12"), ("units_per_floor", "4")]);

    let outcome = wizard.submit().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected { step: Some(0), ref unroutable } if unroutable.len() == 1
    ));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 0);
        assert_eq!(w.error("name"), Some("Name already taken"));
        assert!(!w.is_closed());
        assert!(!w.is_busy());
    });
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Error);
    assert!(messages[0].0.starts_with("Invalid data"));
    assert!(messages[0].0.contains("Unknown syndic"));
}

#[tokio::test]
async fn server_failure_reports_server_message() {
    let backend = Arc::new(RecordingBackend::new().with_save_error(WizardError::Server {
        status: 409,
        message: Some("Block already exists".into()),
    }));
    let sink = Arc::new(RecordingSink::default());
    let wizard = controller(BlockForm::new_create(), &backend, &sink);
    fill(&wizard, &[("condominium_id", "c-1"), ("name", "Torre A")]);
    wizard.next().await;
    fill(&wizard, &[("floors", "12"), ("units_per_floor", "4")]);

    let outcome = wizard.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(WizardError::Server { status: 409, .. })));
    assert_eq!(
        sink.messages(),
        vec![("Block already exists".to_string(), Severity::Error)]
    );
    wizard.with_wizard(|w| {
        assert!(!w.is_closed());
        assert_eq!(w.value("name"), Some("Torre A"));
    });

    // The draft survives, so a retry goes through.
    assert!(wizard.submit().await.is_saved());
    assert_eq!(backend.save_count(), 2);
}

#[tokio::test]
async fn draft_mapping_errors_land_on_their_field() {
    let (backend, sink) = setup();
    let wizard = controller(ContactForm::new_create(), &backend, &sink);
    fill(&wizard, &[("name", "Carlos")]);
    wizard.next().await;

    let outcome = wizard.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Blocked(SubmitBlocked::Draft(_))));
    wizard.with_wizard(|w| {
        assert_eq!(w.active_step(), 1);
        assert!(w.error("email").is_some());
    });
    assert!(backend.calls().is_empty());
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn attachments_are_refused_without_a_slot() {
    let (backend, sink) = setup();
    let wizard = controller(BlockForm::new_create(), &backend, &sink);

    let result = wizard.attach_asset(SecondaryAsset::new("image", "a.png", "image/png", vec![0]));

    assert!(matches!(result, Err(WizardError::AssetUnsupported("block"))));
}

#[test]
fn reset_is_idempotent() {
    let (backend, sink) = setup();
    let wizard = controller(CondominiumForm::new_create(), &backend, &sink);
    fill(&wizard, CONDOMINIUM_GENERAL);

    let once = wizard.with_wizard(|w| {
        w.reset();
        (w.active_step(), w.values().clone(), w.errors().clone())
    });
    let twice = wizard.with_wizard(|w| {
        w.reset();
        (w.active_step(), w.values().clone(), w.errors().clone())
    });

    assert_eq!(once, twice);
    assert_eq!(once.0, 0);
    assert_eq!(once.1["due_day"], "10");
    assert!(once.1.get("name").is_none());
}
