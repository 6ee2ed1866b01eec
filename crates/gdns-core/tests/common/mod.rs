//! Test doubles and common utilities for lifecycle contract tests
//!
//! This module provides a scripted registrar that records every call so the
//! tests can assert exactly what would have reached the remote API.

#![allow(dead_code)]

use gdns_core::error::{Error, Result};
use gdns_core::record::{DomainRecord, new_a_record, new_domain_record, new_ns_record};
use gdns_core::traits::{Domain, Registrar};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// One recorded registrar call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve {
        customer: Option<String>,
        domain: String,
    },
    Fetch {
        customer: Option<String>,
        domain: String,
    },
    Write {
        customer: Option<String>,
        domain: String,
        records: Vec<DomainRecord>,
    },
}

/// Scripted failure for the next write
#[derive(Debug, Clone)]
pub enum WriteFailure {
    Registrar { status: u16, code: String, message: String },
    Http(String),
}

/// A mock Registrar that tracks calls
///
/// Clones made with [`MockRegistrar::sharing_state_with`] share the call log
/// and remote records, so a test can hand one to the controller and inspect
/// the other.
pub struct MockRegistrar {
    domain_id: i64,
    remote_records: Arc<Mutex<Vec<DomainRecord>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    write_count: Arc<AtomicUsize>,
    write_failure: Arc<Mutex<Option<WriteFailure>>>,
    missing_domain: bool,
    fetch_fails: bool,
}

impl MockRegistrar {
    pub fn new(domain_id: i64) -> Self {
        Self {
            domain_id,
            remote_records: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            write_count: Arc::new(AtomicUsize::new(0)),
            write_failure: Arc::new(Mutex::new(None)),
            missing_domain: false,
            fetch_fails: false,
        }
    }

    /// Registrar that knows no domain at all
    pub fn without_domain() -> Self {
        Self {
            missing_domain: true,
            ..Self::new(0)
        }
    }

    /// Registrar whose record fetches fail
    pub fn with_failing_fetch(domain_id: i64) -> Self {
        Self {
            fetch_fails: true,
            ..Self::new(domain_id)
        }
    }

    /// Seed the remote record set
    pub fn with_records(self, records: Vec<DomainRecord>) -> Self {
        *self.remote_records.lock().unwrap() = records;
        self
    }

    /// Fail the next write
    pub fn fail_next_write(&self, failure: WriteFailure) {
        *self.write_failure.lock().unwrap() = Some(failure);
    }

    /// Create a new MockRegistrar that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            domain_id: other.domain_id,
            remote_records: Arc::clone(&other.remote_records),
            calls: Arc::clone(&other.calls),
            write_count: Arc::clone(&other.write_count),
            write_failure: Arc::clone(&other.write_failure),
            missing_domain: other.missing_domain,
            fetch_fails: other.fetch_fails,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Records pushed by the last successful write
    pub fn remote_records(&self) -> Vec<DomainRecord> {
        self.remote_records.lock().unwrap().clone()
    }

    /// Records sent with the last write attempt
    pub fn last_written(&self) -> Option<Vec<DomainRecord>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::Write { records, .. } => Some(records),
            _ => None,
        })
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Registrar for MockRegistrar {
    async fn resolve_domain(&self, customer: Option<&str>, domain: &str) -> Result<Domain> {
        self.record_call(Call::Resolve {
            customer: customer.map(str::to_string),
            domain: domain.to_string(),
        });

        if self.missing_domain {
            return Err(Error::not_found(format!("Domain not found: {}", domain)));
        }

        Ok(Domain {
            id: self.domain_id,
            name: domain.to_string(),
        })
    }

    async fn fetch_records(
        &self,
        customer: Option<&str>,
        domain: &str,
    ) -> Result<Vec<DomainRecord>> {
        self.record_call(Call::Fetch {
            customer: customer.map(str::to_string),
            domain: domain.to_string(),
        });

        if self.missing_domain || self.fetch_fails {
            return Err(Error::not_found(format!("Domain not found: {}", domain)));
        }

        Ok(self.remote_records())
    }

    async fn write_records(
        &self,
        customer: Option<&str>,
        domain: &str,
        records: &[DomainRecord],
    ) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.record_call(Call::Write {
            customer: customer.map(str::to_string),
            domain: domain.to_string(),
            records: records.to_vec(),
        });

        match self.write_failure.lock().unwrap().take() {
            Some(WriteFailure::Registrar {
                status,
                code,
                message,
            }) => Err(Error::registrar(status, code, message)),
            Some(WriteFailure::Http(message)) => Err(Error::http(message)),
            None => {
                *self.remote_records.lock().unwrap() = records.to_vec();
                Ok(())
            }
        }
    }

    fn registrar_name(&self) -> &'static str {
        "mock"
    }
}

pub fn a(address: &str) -> DomainRecord {
    new_a_record(address).expect("valid address")
}

pub fn ns(host: &str) -> DomainRecord {
    new_ns_record(host).expect("valid nameserver")
}

pub fn record(name: &str, record_type: &str, data: &str, ttl: u32, priority: u32) -> DomainRecord {
    new_domain_record(name, record_type, data, ttl, priority).expect("valid record")
}

/// Log output captured from the current thread
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture WARN and above until the guard is dropped
///
/// The subscriber is thread-local, so use it from a current-thread runtime
/// (the `#[tokio::test]` default).
pub fn capture_warnings() -> (DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}

/// Writes recorded in `calls`
pub fn writes(calls: &[Call]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, Call::Write { .. }))
        .count()
}
