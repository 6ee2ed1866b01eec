// # Registrar Trait
//
// Defines the interface to the registrar's remote domain API.
//
// ## Implementations
//
// - GoDaddy: `gdns-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use gdns_core::Registrar;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let registrar = /* Registrar implementation */;
//
//     let domain = registrar.resolve_domain(None, "example.com").await?;
//     let records = registrar.fetch_records(None, "example.com").await?;
//     registrar.write_records(None, "example.com", &records).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::record::DomainRecord;

/// A domain as known to the registrar
///
/// Resolved remotely, never constructed from declarative input. The `id` is
/// the stable identifier of the managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Registrar's numeric domain identity
    #[serde(rename = "domainId")]
    pub id: i64,
    /// Domain name
    #[serde(rename = "domain")]
    pub name: String,
}

/// Trait for registrar API clients
///
/// # Contract
///
/// - One remote request per call; no retries, no backoff, no caching.
///   Transient failures are returned to the caller.
/// - `write_records` replaces the whole record set in one request. The
///   registrar either accepts all records or none.
/// - Registrar-reported failures are returned as
///   [`crate::Error::Registrar`] so the machine-readable code survives.
///
/// The optional `customer` scopes every request to a sub-account.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Resolve a domain name to the registrar's domain entity
    ///
    /// # Returns
    ///
    /// - `Ok(Domain)`: The domain and its numeric ID
    /// - `Err(Error::NotFound)`: The registrar does not know the domain
    /// - `Err(Error)`: Any other failure
    async fn resolve_domain(
        &self,
        customer: Option<&str>,
        domain: &str,
    ) -> Result<Domain, crate::Error>;

    /// Fetch the full record set of a domain
    async fn fetch_records(
        &self,
        customer: Option<&str>,
        domain: &str,
    ) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Replace the full record set of a domain
    async fn write_records(
        &self,
        customer: Option<&str>,
        domain: &str,
        records: &[DomainRecord],
    ) -> Result<(), crate::Error>;

    /// Get the registrar name (for logging/debugging)
    fn registrar_name(&self) -> &'static str;
}
