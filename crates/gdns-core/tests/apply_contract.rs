//! Contract Test: Create/Update
//!
//! Verifies the write path from declarative input to the pushed record set.
//!
//! Constraints verified:
//! - Explicit records come first, then addresses, then nameservers
//! - The domain identity is resolved and becomes the resource identifier
//! - Undeclared nameservers are preserved from the remote record set
//! - Invalid input never reaches the registrar
//! - Registrar failures are propagated, except nameserver refusals,
//!   which are logged as warnings
//! - Shorthand entries already in the record set are not pushed twice

mod common;

use common::*;
use gdns_core::{ApplyOutcome, Error, LifecycleController, RecordSpec, ResourceData};
use serde_json::json;

fn controller_for(registrar: &MockRegistrar) -> LifecycleController {
    LifecycleController::new(Box::new(MockRegistrar::sharing_state_with(registrar)))
}

#[tokio::test]
async fn create_pushes_explicit_then_addresses_then_nameservers() {
    let registrar = MockRegistrar::new(1234);
    let controller = controller_for(&registrar);

    let mut data = ResourceData::from_value(&json!({
        "domain": "example.com",
        "addresses": ["1.2.3.4"],
        "nameservers": ["ns1.example.com", "ns2.example.com"],
        "record": [
            { "name": "www", "type": "CNAME", "data": "example.com", "ttl": 600, "priority": 0 }
        ]
    }))
    .expect("valid description");

    let outcome = controller.create(&mut data).await.expect("create succeeds");
    assert_eq!(outcome, ApplyOutcome::Applied { records: 4 });

    assert_eq!(
        registrar.last_written().expect("records written"),
        vec![
            record("www", "CNAME", "example.com", 600, 0),
            a("1.2.3.4"),
            ns("ns1.example.com"),
            ns("ns2.example.com"),
        ]
    );
    assert_eq!(data.id(), Some("1234"));
}

#[tokio::test]
async fn create_makes_no_fetch_when_nameservers_declared() {
    let registrar = MockRegistrar::new(7);
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("example.com");
    data.customer = Some("cust-1".to_string());
    data.nameservers = Some(vec!["ns1.example.com".to_string()]);

    controller.create(&mut data).await.expect("create succeeds");

    let customer = Some("cust-1".to_string());
    assert_eq!(
        registrar.calls(),
        vec![
            Call::Resolve {
                customer: customer.clone(),
                domain: "example.com".to_string(),
            },
            Call::Write {
                customer,
                domain: "example.com".to_string(),
                records: vec![ns("ns1.example.com")],
            },
        ]
    );
}

#[tokio::test]
async fn update_without_nameservers_keeps_remote_nameservers() {
    let registrar = MockRegistrar::new(1234).with_records(vec![
        ns("ns51.domaincontrol.com"),
        a("9.9.9.9"),
        record("old", "TXT", "stale", 3600, 0),
        ns("ns52.domaincontrol.com"),
    ]);
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("example.com");
    data.addresses = Some(vec!["1.2.3.4".to_string()]);

    controller.update(&mut data).await.expect("update succeeds");

    assert_eq!(
        registrar.last_written().expect("records written"),
        vec![
            a("1.2.3.4"),
            ns("ns51.domaincontrol.com"),
            ns("ns52.domaincontrol.com"),
        ]
    );
    assert_eq!(
        data.nameservers,
        Some(vec![
            "ns51.domaincontrol.com".to_string(),
            "ns52.domaincontrol.com".to_string()
        ])
    );
    assert!(matches!(registrar.calls()[0], Call::Fetch { .. }));
}

#[tokio::test]
async fn update_preservation_fetch_failure_is_fatal() {
    let registrar = MockRegistrar::with_failing_fetch(1);
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("example.com");
    let err = controller.update(&mut data).await.unwrap_err();

    assert!(matches!(err, Error::RecordsNotFound { ref domain, .. } if domain == "example.com"));
    assert_eq!(registrar.write_count(), 0);
}

#[tokio::test]
async fn invalid_input_never_reaches_registrar() {
    let registrar = MockRegistrar::new(1);
    let controller = controller_for(&registrar);

    let mut bad_address = ResourceData::new("example.com");
    bad_address.addresses = Some(vec!["not-an-ip".to_string()]);

    let mut bad_nameserver = ResourceData::new("example.com");
    bad_nameserver.nameservers = Some(vec!["".to_string(), "ns1.example.com".to_string()]);

    let mut bad_record = ResourceData::new("example.com");
    bad_record.record = vec![RecordSpec::new("@", "A", "example.com")];

    for mut data in [bad_address, bad_nameserver, bad_record] {
        let err = controller.update(&mut data).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
        assert_eq!(data.id, None);
    }

    assert!(registrar.calls().is_empty(), "no remote call expected");
}

#[tokio::test]
async fn unresolvable_domain_aborts_before_write() {
    let registrar = MockRegistrar::without_domain();
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("missing.example");
    data.nameservers = Some(vec!["ns1.example.com".to_string()]);

    let err = controller.create(&mut data).await.unwrap_err();
    assert!(matches!(err, Error::DomainNotFound { ref domain, .. } if domain == "missing.example"));
    assert!(err.to_string().starts_with("couldn't find domain (missing.example)"));
    assert_eq!(registrar.write_count(), 0);
    assert_eq!(data.id, None);
}

#[tokio::test]
async fn nameserver_validation_refusal_reports_success() {
    let registrar = MockRegistrar::new(1234);
    registrar.fail_next_write(WriteFailure::Registrar {
        status: 422,
        code: "FAILED_NAME_SERVER_VALIDATION".to_string(),
        message: "Unable to update nameservers".to_string(),
    });
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("example.com");
    data.nameservers = Some(vec!["ns1.example.com".to_string()]);

    let (_guard, logs) = capture_warnings();
    let outcome = controller.update(&mut data).await.expect("soft failure");
    match outcome {
        ApplyOutcome::NameserversRejected { message } => {
            assert!(message.contains("422:FAILED_NAME_SERVER_VALIDATION"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(data.id(), Some("1234"));

    let logged = logs.contents();
    assert!(logged.contains("WARN"), "no warning logged: {}", logged);
    assert!(logged.contains("Nameservers were not changed"));
    assert!(logged.contains("FAILED_NAME_SERVER_VALIDATION"));
}

#[tokio::test]
async fn other_registrar_failures_are_propagated() {
    let registrar = MockRegistrar::new(1234);
    registrar.fail_next_write(WriteFailure::Registrar {
        status: 422,
        code: "INVALID_BODY".to_string(),
        message: "FAILED_NAME_SERVER_VALIDATION mentioned in passing".to_string(),
    });
    let controller = controller_for(&registrar);

    let mut data = ResourceData::new("example.com");
    data.nameservers = Some(vec!["ns1.example.com".to_string()]);

    let err = controller.update(&mut data).await.unwrap_err();
    match err {
        Error::Registrar(inner) => {
            assert_eq!(inner.status, 422);
            assert_eq!(inner.code, "INVALID_BODY");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    registrar.fail_next_write(WriteFailure::Http("connection reset".to_string()));
    let err = controller.update(&mut data).await.unwrap_err();
    assert!(matches!(err, Error::Http(ref m) if m == "connection reset"));
}

#[tokio::test]
async fn repeated_apply_pushes_equal_record_sets() {
    let registrar = MockRegistrar::new(1);
    let controller = controller_for(&registrar);

    let description = json!({
        "domain": "example.com",
        "addresses": ["1.2.3.4", "5.6.7.8"],
        "nameservers": ["ns1.example.com"],
        "record": [{ "name": "www", "type": "CNAME", "data": "example.com" }]
    });

    let mut first = ResourceData::from_value(&description).unwrap();
    controller.update(&mut first).await.unwrap();
    let pushed_first = registrar.last_written().unwrap();

    let mut second = ResourceData::from_value(&description).unwrap();
    controller.update(&mut second).await.unwrap();
    let pushed_second = registrar.last_written().unwrap();

    assert_eq!(pushed_first, pushed_second);
    assert_eq!(pushed_first.len(), 4);
    assert_eq!(writes(&registrar.calls()), 2);
}

#[tokio::test]
async fn overlapping_shorthand_and_explicit_records_are_pushed_once() {
    let registrar = MockRegistrar::new(1);
    let controller = controller_for(&registrar);

    let mut data = ResourceData::from_value(&json!({
        "domain": "example.com",
        "addresses": ["1.2.3.4", "1.2.3.4"],
        "nameservers": ["ns1.example.com"],
        "record": [
            { "name": "@", "type": "A", "data": "1.2.3.4" },
            { "name": "@", "type": "NS", "data": "ns1.example.com" }
        ]
    }))
    .unwrap();

    let outcome = controller.update(&mut data).await.unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied { records: 2 });
    assert_eq!(
        registrar.last_written().unwrap(),
        vec![a("1.2.3.4"), ns("ns1.example.com")]
    );
}
