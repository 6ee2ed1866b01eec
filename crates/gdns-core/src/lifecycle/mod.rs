//! Resource lifecycle controller
//!
//! The LifecycleController is responsible for:
//! - Building the desired record set from declarative input
//! - Resolving the domain identity at the registrar
//! - Pushing the full record set (create/update) or the teardown
//!   placeholder (delete)
//! - Reading the remote record set back into declarative form
//!
//! ## Architecture
//!
//! ```text
//!  ResourceData ──build──▶ DomainRecordResource ──converge──▶ records
//!                                                               │
//!                                                               ▼
//!                       ┌──────────────────────┐        ┌──────────────┐
//!                       │ LifecycleController  │──────▶ │  Registrar   │
//!                       └──────────────────────┘        └──────────────┘
//!                                   ▲                           │
//!  ResourceData ◀──classify─────────┴──────── fetch_records ◀───┘
//! ```
//!
//! ## Call Flow
//!
//! Every call is one short, sequential transaction with the registrar:
//! at most one domain lookup, one record fetch and one record write. Nothing
//! is retried and no state survives between calls except what the caller
//! keeps in [`ResourceData`].

use tracing::{debug, info, warn};

use crate::classify::{classify, classify_nameservers};
use crate::desired::{ResourceData, build_resource};
use crate::error::{Error, Result};
use crate::resolver::{LookupName, resolve_domain_info};
use crate::resource::DomainRecordResource;
use crate::traits::Registrar;

/// Result of a call that writes records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The registrar accepted the record set
    Applied {
        /// Number of records pushed
        records: usize,
    },
    /// The registrar refused the nameserver change
    ///
    /// Reported as success. The record set may not have been changed.
    NameserversRejected {
        /// Registrar message
        message: String,
    },
}

/// Lifecycle controller for one registrar client
///
/// The client is constructed once by the caller and injected here; every
/// lifecycle call borrows it.
pub struct LifecycleController {
    /// Registrar API client
    registrar: Box<dyn Registrar>,
}

impl LifecycleController {
    /// Create a new controller around a registrar client
    pub fn new(registrar: Box<dyn Registrar>) -> Self {
        Self { registrar }
    }

    /// The injected registrar client
    pub fn registrar(&self) -> &dyn Registrar {
        self.registrar.as_ref()
    }

    /// Create the managed record set
    ///
    /// Same routine as [`LifecycleController::update`].
    pub async fn create(&self, data: &mut ResourceData) -> Result<ApplyOutcome> {
        self.apply(data).await
    }

    /// Update the managed record set
    pub async fn update(&self, data: &mut ResourceData) -> Result<ApplyOutcome> {
        self.apply(data).await
    }

    /// Read the remote record set into `data`
    ///
    /// The domain is addressed by the declared name or, on import, by the
    /// persisted identifier. `addresses`, `nameservers` and `record` are
    /// overwritten with what the registrar reports. An import that succeeds
    /// adopts the identifier as `domain`, so later updates and teardown can
    /// address the domain.
    pub async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let lookup = LookupName::for_data(data)?;
        let domain = lookup.as_str();
        let imported = matches!(lookup, LookupName::Imported(_));
        if imported {
            debug!("No domain declared, reading by identifier {}", domain);
        }

        info!("Fetching {} records...", domain);
        let records = self
            .registrar
            .fetch_records(data.customer(), domain)
            .await
            .map_err(|e| Error::records_not_found(domain, e))?;

        let classified = classify(&records);
        debug!(
            "Read {} records for {}: {} addresses, {} nameservers, {} other",
            records.len(),
            domain,
            classified.addresses.len(),
            classified.nameservers.len(),
            classified.records.len()
        );
        classified.apply_to(data);
        if imported {
            data.domain = Some(domain.to_string());
        }

        Ok(())
    }

    /// Tear down the managed record set
    ///
    /// The domain is restored to the default placeholder records plus the
    /// declared nameservers; the registrar does not allow an empty set.
    pub async fn delete(&self, data: &mut ResourceData) -> Result<ApplyOutcome> {
        let mut resource = build_resource(data)?;
        self.resolve(&resource, data).await?;

        resource.restore_defaults()?;

        info!("Restoring {} domain records...", resource.domain);
        self.push(&resource).await
    }

    /// Shared create/update routine
    async fn apply(&self, data: &mut ResourceData) -> Result<ApplyOutcome> {
        let mut resource = build_resource(data)?;

        // Keep the current nameservers when none are declared
        if data.nameservers().is_none() {
            let domain = resource.domain.clone();
            info!("Fetching {} records...", domain);
            let records = self
                .registrar
                .fetch_records(resource.customer.as_deref(), &domain)
                .await
                .map_err(|e| Error::records_not_found(&domain, e))?;

            let nameservers = classify_nameservers(&records);
            debug!("Preserving {} existing nameservers for {}", nameservers.len(), domain);
            resource.ns_records = nameservers.clone();
            data.nameservers = Some(nameservers);
        }

        self.resolve(&resource, data).await?;

        resource.converge()?;

        info!("Updating {} domain records...", resource.domain);
        self.push(&resource).await
    }

    async fn resolve(&self, resource: &DomainRecordResource, data: &mut ResourceData) -> Result<()> {
        let domain = resolve_domain_info(
            self.registrar.as_ref(),
            resource.customer.as_deref(),
            &resource.domain,
            data,
        )
        .await?;
        debug!("Resolved {} to domain ID {}", domain.name, domain.id);
        Ok(())
    }

    /// Write the full record set, downgrading nameserver refusals
    async fn push(&self, resource: &DomainRecordResource) -> Result<ApplyOutcome> {
        for record in &resource.records {
            debug!("  {}", record);
        }

        match self
            .registrar
            .write_records(
                resource.customer.as_deref(),
                &resource.domain,
                &resource.records,
            )
            .await
        {
            Ok(()) => Ok(ApplyOutcome::Applied {
                records: resource.records.len(),
            }),
            // Known risk: this also hides nameserver changes the registrar
            // rejects for good, not just ones still propagating.
            Err(Error::Registrar(err)) if err.is_nameserver_validation() => {
                warn!("Warning: Nameservers were not changed: {}", err);
                Ok(ApplyOutcome::NameserversRejected {
                    message: err.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}
