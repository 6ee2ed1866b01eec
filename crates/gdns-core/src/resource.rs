//! Managed domain record set
//!
//! A [`DomainRecordResource`] is the desired record set of one domain. It is
//! rebuilt from declarative input on every lifecycle call and never persisted.
//!
//! The `a_records` and `ns_records` shorthand lists are folded into `records`
//! by [`DomainRecordResource::converge`] right before the set is pushed.

use tracing::debug;

use crate::error::Result;
use crate::record::{self, DomainRecord};

/// Kind of shorthand list being merged into the record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// Apex A records built from bare addresses
    Address,
    /// Apex NS records built from bare hostnames
    Nameserver,
}

impl Shorthand {
    /// Build the record for one shorthand entry
    pub fn build(self, data: &str) -> Result<DomainRecord> {
        match self {
            Shorthand::Address => record::new_a_record(data),
            Shorthand::Nameserver => record::new_ns_record(data),
        }
    }
}

/// Desired record set of one managed domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRecordResource {
    /// Sub-account owning the domain
    pub customer: Option<String>,
    /// Apex domain name
    pub domain: String,
    /// Explicit records, followed by shorthand records once converged
    pub records: Vec<DomainRecord>,
    /// Apex addresses
    pub a_records: Vec<String>,
    /// Apex nameservers
    pub ns_records: Vec<String>,
    converged: bool,
}

impl DomainRecordResource {
    /// Create an empty resource for `domain`
    pub fn new(domain: impl Into<String>, customer: Option<String>) -> Self {
        Self {
            customer,
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Fold the shorthand lists into `records`
    ///
    /// Addresses are appended first, then nameservers, each in input order,
    /// after the explicit records. A shorthand record equal to one already in
    /// the set is skipped. The merge happens once per instance; later calls
    /// leave `records` untouched, and a failed merge leaves it as it was.
    pub fn converge(&mut self) -> Result<()> {
        if self.converged {
            debug!("Records for {} already converged", self.domain);
            return Ok(());
        }

        let mut merged = self.records.clone();
        merge_records(&mut merged, &self.a_records, Shorthand::Address)?;
        merge_records(&mut merged, &self.ns_records, Shorthand::Nameserver)?;
        self.records = merged;

        self.converged = true;
        debug!(
            "Converged {} records for {}",
            self.records.len(),
            self.domain
        );
        Ok(())
    }

    /// Replace the record set with the teardown placeholder
    ///
    /// The result is the default record set followed by one NS record per
    /// declared nameserver, so the domain keeps its delegation.
    pub fn restore_defaults(&mut self) -> Result<()> {
        let mut merged = record::default_records();
        merge_records(&mut merged, &self.ns_records, Shorthand::Nameserver)?;
        self.records = merged;
        self.converged = true;
        Ok(())
    }

    /// Whether the shorthand lists have been merged
    pub fn is_converged(&self) -> bool {
        self.converged
    }
}

fn merge_records(
    records: &mut Vec<DomainRecord>,
    list: &[String],
    kind: Shorthand,
) -> Result<()> {
    for data in list {
        let record = kind.build(data)?;
        if records.contains(&record) {
            debug!("Skipping duplicate {}", record);
            continue;
        }
        records.push(record);
    }
    Ok(())
}
