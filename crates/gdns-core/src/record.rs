// # DNS Records
//
// Typed DNS records as the registrar stores them, plus the factory
// functions that build them from bare values.
//
// ## Validation
//
// Every constructor validates `data` against the record type before a
// record exists, so a malformed value is rejected long before any network
// call is made:
//
// - `A`: an IP literal (v4 or v6)
// - `AAAA`: an IPv6 literal
// - `NS`, `MX`: a hostname
// - `CNAME`: a hostname or `@`
// - `TXT`, `SRV`, `SOA`, `CAA`: any non-empty value
//
// ## Wire Format
//
// ```json
// { "type": "A", "name": "@", "data": "1.2.3.4", "ttl": 3600, "priority": 0 }
// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default time-to-live applied by the registrar (seconds)
pub const DEFAULT_TTL: u32 = 3600;

/// Default record priority
pub const DEFAULT_PRIORITY: u32 = 0;

/// Highest priority the registrar accepts
pub const MAX_PRIORITY: u32 = 65535;

/// Record name denoting the domain apex
pub const APEX: &str = "@";

/// Data of the placeholder record left behind on teardown
pub const DELETED_PLACEHOLDER: &str = "Domain Deleted :)";

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 (or IPv6) address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Mail exchanger
    Mx,
    /// Nameserver
    Ns,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Free text
    Txt,
    /// Certification authority authorization
    Caa,
}

impl RecordType {
    /// All record types the registrar accepts
    pub const ALL: [RecordType; 9] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Soa,
        RecordType::Srv,
        RecordType::Txt,
        RecordType::Caa,
    ];

    /// Registrar spelling of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
            RecordType::Caa => "CAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("unsupported record type: '{}'", s)))
    }
}

/// A single DNS record
///
/// Records are immutable once built. Use [`DomainRecord::new`] or one of the
/// shorthand factories so that `data` is always valid for its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    data: String,
    #[serde(default = "default_ttl")]
    ttl: u32,
    #[serde(default)]
    priority: u32,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl DomainRecord {
    /// Build a validated record
    ///
    /// # Errors
    ///
    /// `Error::Validation` if the name is empty, `data` does not match
    /// `record_type`, the TTL is zero or the priority is out of range.
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        data: impl Into<String>,
        ttl: u32,
        priority: u32,
    ) -> Result<Self> {
        let name = name.into();
        let data = data.into();

        if name.trim().is_empty() {
            return Err(Error::validation(format!(
                "{} record name cannot be empty",
                record_type
            )));
        }
        validate_data(record_type, &data)?;
        if ttl == 0 {
            return Err(Error::validation(format!(
                "TTL for {} record '{}' must be positive",
                record_type, name
            )));
        }
        if priority > MAX_PRIORITY {
            return Err(Error::validation(format!(
                "priority {} for {} record '{}' exceeds {}",
                priority, record_type, name, MAX_PRIORITY
            )));
        }

        Ok(Self {
            record_type,
            name,
            data,
            ttl,
            priority,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether the record sits at the domain apex
    pub fn is_apex(&self) -> bool {
        self.name == APEX
    }
}

impl fmt::Display for DomainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} (ttl={}, priority={})",
            self.record_type, self.name, self.data, self.ttl, self.priority
        )
    }
}

/// Build a record from loosely typed parts
///
/// The type is parsed from its registrar spelling; unknown types are rejected.
pub fn new_domain_record(
    name: &str,
    record_type: &str,
    data: &str,
    ttl: u32,
    priority: u32,
) -> Result<DomainRecord> {
    let record_type = record_type.parse::<RecordType>()?;
    DomainRecord::new(name, record_type, data, ttl, priority)
}

/// Build an apex A record for `address`
pub fn new_a_record(address: &str) -> Result<DomainRecord> {
    DomainRecord::new(APEX, RecordType::A, address, DEFAULT_TTL, DEFAULT_PRIORITY)
}

/// Build an apex NS record for `hostname`
pub fn new_ns_record(hostname: &str) -> Result<DomainRecord> {
    DomainRecord::new(APEX, RecordType::Ns, hostname, DEFAULT_TTL, DEFAULT_PRIORITY)
}

/// Records pushed when a managed domain is torn down
///
/// The registrar refuses an empty record set, so this list is never empty.
pub fn default_records() -> Vec<DomainRecord> {
    vec![DomainRecord {
        record_type: RecordType::Txt,
        name: APEX.to_string(),
        data: DELETED_PLACEHOLDER.to_string(),
        ttl: DEFAULT_TTL,
        priority: DEFAULT_PRIORITY,
    }]
}

/// Check that `data` is syntactically valid for `record_type`
pub fn validate_data(record_type: RecordType, data: &str) -> Result<()> {
    match record_type {
        RecordType::A => data.parse::<IpAddr>().map(|_| ()).map_err(|_| {
            Error::validation(format!("'{}' is not a valid IP address", data))
        }),
        RecordType::Aaaa => data.parse::<Ipv6Addr>().map(|_| ()).map_err(|_| {
            Error::validation(format!("'{}' is not a valid IPv6 address", data))
        }),
        RecordType::Cname if data == APEX => Ok(()),
        RecordType::Ns | RecordType::Cname | RecordType::Mx => validate_hostname(data),
        RecordType::Txt | RecordType::Srv | RecordType::Soa | RecordType::Caa => {
            if data.is_empty() {
                Err(Error::validation(format!(
                    "{} record data cannot be empty",
                    record_type
                )))
            } else {
                Ok(())
            }
        }
    }
}

/// Validate a hostname
///
/// Basic RFC 1035 checks: total length, label length, label characters and
/// hyphen placement. A single trailing dot is accepted.
pub fn validate_hostname(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(Error::validation("hostname cannot be empty"));
    }

    let name = hostname.strip_suffix('.').unwrap_or(hostname);

    if name.len() > 253 {
        return Err(Error::validation(format!(
            "hostname too long: {} chars (max 253). Got: {}",
            name.len(),
            hostname
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(Error::validation(format!(
                "hostname has empty label: '{}'",
                hostname
            )));
        }

        if label.len() > 63 {
            return Err(Error::validation(format!(
                "hostname label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::validation(format!(
                "hostname label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::validation(format!(
                "hostname label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
