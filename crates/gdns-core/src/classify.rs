//! Classification of remote record lists
//!
//! The registrar returns one flat record list. Reading state back splits it
//! into the same three buckets the declarative input uses: apex addresses,
//! apex nameservers and every other record.

use crate::desired::{RecordSpec, ResourceData};
use crate::record::{APEX, DomainRecord, RecordType};

/// Whether `record` is an apex NS record
pub fn is_default_ns_record(record: &DomainRecord) -> bool {
    record.record_type() == RecordType::Ns && record.name() == APEX
}

/// Whether `record` is an apex A record
pub fn is_default_a_record(record: &DomainRecord) -> bool {
    record.record_type() == RecordType::A && record.name() == APEX
}

/// A remote record list split into declarative buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub addresses: Vec<String>,
    pub nameservers: Vec<String>,
    pub records: Vec<DomainRecord>,
}

impl Classified {
    /// Write all three buckets into the declarative output
    pub fn apply_to(&self, data: &mut ResourceData) {
        data.addresses = Some(self.addresses.clone());
        data.nameservers = Some(self.nameservers.clone());
        data.record = self.records.iter().map(RecordSpec::from).collect();
    }
}

/// Split `records` into addresses, nameservers and other records
///
/// Each bucket keeps the order of the input list.
pub fn classify(records: &[DomainRecord]) -> Classified {
    let mut classified = Classified::default();

    for record in records {
        if is_default_ns_record(record) {
            classified.nameservers.push(record.data().to_string());
        } else if is_default_a_record(record) {
            classified.addresses.push(record.data().to_string());
        } else {
            classified.records.push(record.clone());
        }
    }

    classified
}

/// Extract only the apex nameservers from `records`
pub fn classify_nameservers(records: &[DomainRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| is_default_ns_record(r))
        .map(|r| r.data().to_string())
        .collect()
}
