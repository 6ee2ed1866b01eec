//! Core traits for the GDNS system
//!
//! This module defines the abstract interfaces at the system's seams.
//!
//! - [`Registrar`]: Resolve domains and read/write their record sets
//! - [`StateStore`]: Persist managed resources between calls

pub mod registrar;
pub mod state_store;

pub use registrar::{Domain, Registrar};
pub use state_store::{StateRecord, StateStore};
