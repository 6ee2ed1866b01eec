//! Domain identity resolution
//!
//! Resolves the registrar's numeric identity for a domain and records it as
//! the resource identifier. Which name gets resolved is decided by an
//! explicit policy: the declared `domain` when present, otherwise the
//! persisted identifier (the import flow, where the caller supplies only an
//! identifier).

use tracing::info;

use crate::desired::ResourceData;
use crate::error::{Error, Result};
use crate::traits::{Domain, Registrar};

/// Name used to address a domain at the registrar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupName {
    /// Taken from the declared `domain` field
    Declared(String),
    /// Taken from the persisted identifier (import)
    Imported(String),
}

impl LookupName {
    /// Pick the lookup name for `data`
    ///
    /// # Errors
    ///
    /// `Error::Validation` when neither a domain nor an identifier is set.
    pub fn for_data(data: &ResourceData) -> Result<Self> {
        match (data.domain(), data.id()) {
            (Some(domain), _) => Ok(LookupName::Declared(domain.to_string())),
            (None, Some(id)) => Ok(LookupName::Imported(id.to_string())),
            (None, None) => Err(Error::validation(
                "either 'domain' or a persisted identifier is required",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LookupName::Declared(name) | LookupName::Imported(name) => name,
        }
    }
}

/// Resolve the domain identity and record it as the resource identifier
///
/// On success `data.id` holds the decimal domain ID. A failure is wrapped
/// with the domain name and leaves `data` untouched.
pub async fn resolve_domain_info(
    registrar: &dyn Registrar,
    customer: Option<&str>,
    domain: &str,
    data: &mut ResourceData,
) -> Result<Domain> {
    info!("Fetching {} info...", domain);

    let resolved = registrar
        .resolve_domain(customer, domain)
        .await
        .map_err(|e| Error::domain_not_found(domain, e))?;

    data.id = Some(resolved.id.to_string());
    Ok(resolved)
}
