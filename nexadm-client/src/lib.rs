//! nexadm-client: declarative administration of a Sonatype Nexus instance.
//!
//! The engine converges remote administrative resources (repositories, blob
//! stores, roles, users, routing rules, LDAP bindings, scripts, scheduled
//! tasks, capabilities, cleanup policies, email settings) toward declared
//! specs using only
//! the REST administrative API:
//! - [`transport::HttpClient`] issues authenticated requests with bounded
//!   connection retry,
//! - [`canonical`] and [`diff`] decide whether remote state already matches
//!   intent,
//! - [`reconcile::Reconciler`] applies the minimal create/update/delete,
//! - [`kinds`] supplies the per-kind wire adapters the reconciler consumes.

pub mod canonical;
pub mod config;
pub mod diff;
pub mod endpoints;
pub mod error;
pub mod kinds;
pub mod reconcile;
pub mod transport;

pub use config::{ClientConfig, RetryPolicy};
pub use error::{Error, Result};
pub use kinds::{descriptor_for, known_kinds, ResourceDescriptor};
pub use reconcile::{Intent, Outcome, Reconciler};
pub use transport::HttpClient;
