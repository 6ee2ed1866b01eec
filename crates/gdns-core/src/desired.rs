//! Declarative description of a managed domain
//!
//! [`ResourceData`] is the typed form of the declarative input:
//!
//! ```json
//! {
//!   "domain": "example.com",
//!   "customer": "12345",
//!   "addresses": ["1.2.3.4"],
//!   "nameservers": ["ns1.example.com", "ns2.example.com"],
//!   "record": [
//!     { "name": "www", "type": "CNAME", "data": "example.com", "ttl": 600 }
//!   ]
//! }
//! ```
//!
//! It is parsed once through checked accessors, so a field of the wrong
//! shape is a validation error rather than a panic. The same struct carries
//! the declarative output of a read and is what the state store persists.
//!
//! [`build_resource`] turns it into a [`DomainRecordResource`], validating
//! every value before anything touches the network.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::{
    self, DEFAULT_PRIORITY, DEFAULT_TTL, DomainRecord, RecordType, new_domain_record,
};
use crate::resource::DomainRecordResource;

/// One explicit record in the declarative description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub priority: u32,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl RecordSpec {
    /// Create a record description with default TTL and priority
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            data: data.into(),
            ttl: DEFAULT_TTL,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Build the validated record
    pub fn to_record(&self) -> Result<DomainRecord> {
        new_domain_record(
            &self.name,
            &self.record_type,
            &self.data,
            self.ttl,
            self.priority,
        )
    }
}

impl From<&DomainRecord> for RecordSpec {
    fn from(record: &DomainRecord) -> Self {
        Self {
            name: record.name().to_string(),
            record_type: record.record_type().to_string(),
            data: record.data().to_string(),
            ttl: record.ttl(),
            priority: record.priority(),
        }
    }
}

/// Declarative state of one managed domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Persisted identifier (the registrar's numeric domain ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Apex domain name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Sub-account owning the domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Apex addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,

    /// Apex nameservers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,

    /// Explicit records
    #[serde(default)]
    pub record: Vec<RecordSpec>,
}

impl ResourceData {
    /// Create a description for `domain`
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }

    /// Description holding only a persisted identifier (import)
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Parse a declarative JSON object
    ///
    /// Unknown fields are ignored. A field present with the wrong shape is
    /// a validation error.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::validation("resource description must be a JSON object"))?;

        let record = match object.get("record") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| record_spec_from_value(i, item))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::validation("field 'record' must be a list")),
        };

        Ok(Self {
            id: get_string(object, "id")?,
            domain: get_string(object, "domain")?,
            customer: get_string(object, "customer")?,
            addresses: get_string_list(object, "addresses")?,
            nameservers: get_string_list(object, "nameservers")?,
            record,
        })
    }

    /// Declared domain name, if non-empty
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|d| !d.is_empty())
    }

    /// Declared customer, if non-empty
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref().filter(|c| !c.is_empty())
    }

    /// Persisted identifier, if non-empty
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Declared nameservers; `None` when absent or empty
    pub fn nameservers(&self) -> Option<&[String]> {
        self.nameservers.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Declared addresses; `None` when absent or empty
    pub fn addresses(&self) -> Option<&[String]> {
        self.addresses.as_deref().filter(|a| !a.is_empty())
    }
}

fn get_string(object: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::validation(format!(
            "field '{}' must be a string, got {}",
            field, other
        ))),
    }
}

fn get_string_list(object: &Map<String, Value>, field: &str) -> Result<Option<Vec<String>>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::validation(format!(
                        "field '{}' must contain only strings, got {}",
                        field, item
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(other) => Err(Error::validation(format!(
            "field '{}' must be a list of strings, got {}",
            field, other
        ))),
    }
}

fn get_u32(object: &Map<String, Value>, field: &str, default: u32) -> Result<u32> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                Error::validation(format!(
                    "field '{}' must be a non-negative integer, got {}",
                    field, value
                ))
            }),
    }
}

fn record_spec_from_value(index: usize, value: &Value) -> Result<RecordSpec> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::validation(format!("record #{} must be an object", index)))?;

    let required = |field: &str| -> Result<String> {
        get_string(object, field)?.ok_or_else(|| {
            Error::validation(format!("record #{} is missing '{}'", index, field))
        })
    };

    Ok(RecordSpec {
        name: required("name")?,
        record_type: required("type")?,
        data: required("data")?,
        ttl: get_u32(object, "ttl", DEFAULT_TTL)?,
        priority: get_u32(object, "priority", DEFAULT_PRIORITY)?,
    })
}

/// Build the desired record set from a declarative description
///
/// Explicit records are constructed immediately; addresses and nameservers
/// are validated now and turned into records by
/// [`DomainRecordResource::converge`]. The first invalid value aborts the
/// build. Exact duplicate records collapse to their first occurrence.
pub fn build_resource(data: &ResourceData) -> Result<DomainRecordResource> {
    let domain = data
        .domain()
        .ok_or_else(|| Error::validation("field 'domain' is required"))?;

    let mut resource = DomainRecordResource::new(domain, data.customer().map(str::to_string));

    for spec in &data.record {
        let record = spec.to_record()?;
        if !resource.records.contains(&record) {
            resource.records.push(record);
        }
    }

    if let Some(nameservers) = data.nameservers() {
        for ns in nameservers {
            record::validate_data(RecordType::Ns, ns)?;
        }
        resource.ns_records = nameservers.to_vec();
    }

    if let Some(addresses) = data.addresses() {
        for address in addresses {
            record::validate_data(RecordType::A, address)?;
        }
        resource.a_records = addresses.to_vec();
    }

    Ok(resource)
}
