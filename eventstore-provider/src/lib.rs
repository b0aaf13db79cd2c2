//! eventstore-provider: declarative-state reconciler for EventStore.
//!
//! Given the desired attributes of a user or persistent subscription and the
//! identifier stored by the orchestrator, the reconcilers in this crate:
//! - Create, read, update and delete the remote entity
//! - Project the observed entity back onto the attribute bag
//! - Drop resources from state when they disappear remotely (users)
//! - Report failures as diagnostics rather than errors

pub mod attrs;
pub mod clients;
pub mod config;
pub mod diag;
pub mod id;
pub mod provider;
pub mod reconciler;

pub use attrs::{AttrValue, AttributeBag, ChangedFields, ResourceData};
pub use clients::{ClientError, EventStoreApi, HttpClient};
pub use config::ProviderConfig;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use provider::{connect, Provider};
pub use reconciler::{DataSource, Resource, SubscriptionReconciler, UserLookup, UserReconciler};
