// # gdns-core
//
// Reconciliation engine for DNS records managed through GoDaddy.
//
// ## Architecture Overview
//
// A managed domain is described declaratively (explicit records plus
// shorthand address and nameserver lists). This library turns that
// description into the full record set pushed to the registrar, and turns
// the registrar's record set back into the same description:
// - **record**: Typed DNS records and their validating factories
// - **desired**: Declarative input and the desired-state builder
// - **resource**: The desired record set and its convergence
// - **classify**: Splitting remote records back into declarative buckets
// - **resolver**: Domain identity resolution
// - **lifecycle**: Create/Read/Update/Delete against a `Registrar`
// - **Registrar** / **StateStore**: Traits at the remote API and
//   persistence seams
//
// ## Design Principles
//
// 1. **Validate first**: Malformed input never reaches the registrar
// 2. **Whole-set writes**: Every write replaces the full record set
// 3. **Never empty**: Teardown leaves a placeholder record behind
// 4. **Injected client**: The registrar client is passed in, never global

pub mod classify;
pub mod config;
pub mod desired;
pub mod error;
pub mod lifecycle;
pub mod record;
pub mod resolver;
pub mod resource;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use classify::{Classified, classify, classify_nameservers};
pub use config::{GdnsConfig, RegistrarConfig, StateStoreConfig};
pub use desired::{RecordSpec, ResourceData, build_resource};
pub use error::{Error, RegistrarError, Result};
pub use lifecycle::{ApplyOutcome, LifecycleController};
pub use record::{DomainRecord, RecordType};
pub use resource::DomainRecordResource;
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{Domain, Registrar, StateRecord, StateStore};
