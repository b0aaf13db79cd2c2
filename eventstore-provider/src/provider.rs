//! Provider entry point: builds the client once per run and hands it to the
//! reconcilers for each resource kind.

use std::sync::Arc;

use tracing::{error, info};

use crate::clients::{EventStoreApi, HttpClient};
use crate::config::ProviderConfig;
use crate::diag::{Diagnostic, Diagnostics};
use crate::reconciler::{
    subscription, user, user_lookup, DataSource, Resource, SubscriptionReconciler, UserLookup,
    UserReconciler,
};

pub const CLIENT_ERROR: &str = "Unable to create Eventstore client";

/// Build the shared EventStore client. Failure is terminal for the run.
pub fn connect(config: &ProviderConfig) -> Result<Arc<dyn EventStoreApi>, Diagnostics> {
    match HttpClient::new(&config.url, &config.username, &config.password) {
        Ok(client) => {
            info!(endpoint = %client.endpoint(), "Created EventStore client");
            Ok(Arc::new(client))
        }
        Err(e) => {
            error!("{}: {}", CLIENT_ERROR, e);
            Err(Diagnostic::error(CLIENT_ERROR)
                .with_detail(e.to_string())
                .into())
        }
    }
}

/// All resource kinds, sharing one client.
pub struct Provider {
    users: UserReconciler,
    subscriptions: SubscriptionReconciler,
    user_lookup: UserLookup,
}

impl Provider {
    pub fn configure(config: &ProviderConfig) -> Result<Self, Diagnostics> {
        Ok(Self::with_client(connect(config)?))
    }

    pub fn with_client(client: Arc<dyn EventStoreApi>) -> Self {
        Self {
            users: UserReconciler::new(Arc::clone(&client)),
            subscriptions: SubscriptionReconciler::new(Arc::clone(&client)),
            user_lookup: UserLookup::new(client),
        }
    }

    /// Managed resource by kind name.
    pub fn resource(&self, kind: &str) -> Option<&dyn Resource> {
        match kind {
            user::KIND => Some(&self.users),
            subscription::KIND => Some(&self.subscriptions),
            _ => None,
        }
    }

    /// Read-only lookup by kind name.
    pub fn data_source(&self, kind: &str) -> Option<&dyn DataSource> {
        match kind {
            user_lookup::KIND => Some(&self.user_lookup),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_fails_with_single_diagnostic() {
        let diags = match connect(&ProviderConfig::default()) {
            Ok(_) => panic!("empty url must not produce a client"),
            Err(diags) => diags,
        };
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, CLIENT_ERROR);
        assert!(diag.detail.contains("empty"));
    }

    #[test]
    fn test_kinds_are_registered() {
        let provider =
            Provider::configure(&ProviderConfig::new("http://localhost:2113", "admin", "changeit"))
                .unwrap();
        assert_eq!(
            provider.resource("eventstore_user").map(|r| r.kind()),
            Some("eventstore_user")
        );
        assert_eq!(
            provider.resource("eventstore_subscription").map(|r| r.kind()),
            Some("eventstore_subscription")
        );
        assert!(provider.resource("eventstore_stream").is_none());
        assert!(provider.data_source("eventstore_user").is_some());
        assert!(provider.data_source("eventstore_subscription").is_none());
    }
}
