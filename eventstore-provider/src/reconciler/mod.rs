//! Reconcilers for the EventStore resource kinds.
//!
//! Each reconciler compares the desired attribute bag with the state reported
//! by EventStore and issues the calls needed to converge. The identifier in
//! `ResourceData` is how the orchestrator correlates the two across runs.

pub mod project;
pub mod subscription;
pub mod user;
pub mod user_lookup;

use async_trait::async_trait;

use crate::attrs::{ChangedFields, ResourceData};
use crate::diag::Diagnostics;

pub use subscription::SubscriptionReconciler;
pub use user::UserReconciler;
pub use user_lookup::UserLookup;

/// Lifecycle contract for a managed resource kind.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource kind name, e.g. `eventstore_user`.
    fn kind(&self) -> &'static str;

    /// Create the remote entity and record its identifier.
    async fn create(&self, data: &mut ResourceData) -> Diagnostics;

    /// Refresh the bag from remote state. Drift handling is per kind.
    async fn read(&self, data: &mut ResourceData) -> Diagnostics;

    /// Apply in-place changes, then refresh.
    async fn update(&self, data: &mut ResourceData, changed: &ChangedFields) -> Diagnostics;

    /// Delete the remote entity and clear the identifier.
    async fn delete(&self, data: &mut ResourceData) -> Diagnostics;

    /// Seed resource data from an existing identifier. The orchestrator
    /// follows up with `read`.
    fn import(&self, id: &str) -> ResourceData {
        ResourceData::with_id(id, Default::default())
    }
}

/// Read-only lookup kind.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn read(&self, data: &mut ResourceData) -> Diagnostics;
}
