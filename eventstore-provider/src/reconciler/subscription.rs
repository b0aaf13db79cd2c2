//! Subscription reconciler - manages persistent subscriptions.
//!
//! The (stream_name, subscription_name) pair is the key and cannot change in
//! place; the orchestrator replaces the resource instead. All thirteen
//! tunables are resent on every update.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::project::{self, *};
use super::Resource;
use crate::attrs::{AttributeBag, ChangedFields, ResourceData};
use crate::clients::{EventStoreApi, Subscription, SubscriptionSettings};
use crate::diag::Diagnostics;
use crate::id;

pub const KIND: &str = "eventstore_subscription";

const DELETE_FAILED: &str = "Subscription Delete Failed";

/// Build the settings from the bag, defaulting every unset tunable.
pub fn settings_from_bag(bag: &AttributeBag) -> SubscriptionSettings {
    let d = SubscriptionSettings::default();
    SubscriptionSettings {
        min_checkpoint_count: bag.get_int(MIN_CHECKPOINT_COUNT).unwrap_or(d.min_checkpoint_count),
        start_from: bag.get_int(START_FROM).unwrap_or(d.start_from),
        resolve_link_tos: bag.get_bool(RESOLVE_LINK_TOS).unwrap_or(d.resolve_link_tos),
        read_batch_size: bag.get_int(READ_BATCH_SIZE).unwrap_or(d.read_batch_size),
        named_consumer_strategy: bag
            .get_str(NAMED_CONSUMER_STRATEGY)
            .map(str::to_string)
            .unwrap_or(d.named_consumer_strategy),
        extra_statistics: bag.get_bool(EXTRA_STATISTICS).unwrap_or(d.extra_statistics),
        max_retry_count: bag.get_int(MAX_RETRY_COUNT).unwrap_or(d.max_retry_count),
        live_buffer_size: bag.get_int(LIVE_BUFFER_SIZE).unwrap_or(d.live_buffer_size),
        message_timeout_milliseconds: bag
            .get_int(MESSAGE_TIMEOUT_MILLISECONDS)
            .unwrap_or(d.message_timeout_milliseconds),
        max_checkpoint_count: bag.get_int(MAX_CHECKPOINT_COUNT).unwrap_or(d.max_checkpoint_count),
        max_subscriber_count: bag.get_int(MAX_SUBSCRIBER_COUNT).unwrap_or(d.max_subscriber_count),
        checkpoint_after_milliseconds: bag
            .get_int(CHECKPOINT_AFTER_MILLISECONDS)
            .unwrap_or(d.checkpoint_after_milliseconds),
        buffer_size: bag.get_int(BUFFER_SIZE).unwrap_or(d.buffer_size),
    }
}

/// Key pair as declared in the bag.
fn key_from_bag(bag: &AttributeBag) -> Result<(String, String), Diagnostics> {
    let stream = bag.get_str(STREAM_NAME).unwrap_or_default();
    let name = bag.get_str(SUBSCRIPTION_NAME).unwrap_or_default();
    if stream.is_empty() || name.is_empty() {
        return Err(Diagnostics::error(
            "stream_name and subscription_name are required",
        ));
    }
    Ok((stream.to_string(), name.to_string()))
}

/// Key pair of an existing resource: decoded from the identifier if set.
fn key_of(data: &ResourceData) -> Result<(String, String), Diagnostics> {
    if data.is_absent() {
        return key_from_bag(&data.attributes);
    }
    let (stream, name) =
        id::decode_subscription(&data.id).map_err(|e| Diagnostics::from_err(&e))?;
    Ok((stream.to_string(), name.to_string()))
}

/// Subscription reconciler backed by an EventStore client.
pub struct SubscriptionReconciler {
    client: Arc<dyn EventStoreApi>,
}

impl SubscriptionReconciler {
    pub fn new(client: Arc<dyn EventStoreApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for SubscriptionReconciler {
    fn kind(&self) -> &'static str {
        KIND
    }

    async fn create(&self, data: &mut ResourceData) -> Diagnostics {
        let (stream, name) = match key_from_bag(&data.attributes) {
            Ok(key) => key,
            Err(diags) => return diags,
        };
        if stream.contains(id::DELIMITER) {
            return Diagnostics::error(format!(
                "stream_name {:?} must not contain {:?}",
                stream,
                id::DELIMITER
            ));
        }

        let subscription = Subscription {
            stream_name: stream.clone(),
            subscription_name: name.clone(),
            settings: settings_from_bag(&data.attributes),
        };

        info!(stream = %stream, group = %name, "Creating subscription");
        match self.client.create_subscription(&subscription).await {
            Ok(created) => {
                data.set_id(id::encode_subscription(&stream, &name));
                project::project_subscription(&stream, &name, &created, &mut data.attributes);
                Diagnostics::new()
            }
            Err(e) => {
                error!(stream = %stream, group = %name, "Failed to create subscription: {}", e);
                Diagnostics::from_err(&e)
            }
        }
    }

    async fn read(&self, data: &mut ResourceData) -> Diagnostics {
        let (stream, name) = match id::decode_subscription(&data.id) {
            Ok((s, n)) => (s.to_string(), n.to_string()),
            Err(e) => {
                error!(id = %data.id, "{}", e);
                return Diagnostics::from_err(&e);
            }
        };

        match self.client.get_subscription(&stream, &name).await {
            Ok(sub) => {
                project::project_subscription(&stream, &name, &sub, &mut data.attributes);
                Diagnostics::new()
            }
            Err(e) => {
                error!(stream = %stream, group = %name, "Failed to read subscription: {}", e);
                Diagnostics::from_err(&e)
            }
        }
    }

    async fn update(&self, data: &mut ResourceData, _changed: &ChangedFields) -> Diagnostics {
        let (stream, name) = match key_of(data) {
            Ok(key) => key,
            Err(diags) => return diags,
        };
        let subscription = Subscription {
            stream_name: stream.clone(),
            subscription_name: name.clone(),
            settings: settings_from_bag(&data.attributes),
        };

        info!(stream = %stream, group = %name, "Updating subscription");
        if let Err(e) = self.client.update_subscription(&subscription).await {
            error!(stream = %stream, group = %name, "Failed to update subscription: {}", e);
            return Diagnostics::from_err(&e);
        }

        self.read(data).await
    }

    async fn delete(&self, data: &mut ResourceData) -> Diagnostics {
        let (stream, name) = match key_of(data) {
            Ok(key) => key,
            Err(diags) => return diags,
        };

        info!(stream = %stream, group = %name, "Deleting subscription");
        match self.client.delete_subscription(&stream, &name).await {
            Ok(true) => {
                data.clear_id();
                Diagnostics::new()
            }
            Ok(false) => {
                error!(stream = %stream, group = %name, "Subscription delete reported failure");
                Diagnostics::error(DELETE_FAILED)
            }
            Err(e) => {
                error!(stream = %stream, group = %name, "Failed to delete subscription: {}", e);
                Diagnostics::from_err(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_when_bag_empty() {
        assert_eq!(
            settings_from_bag(&AttributeBag::new()),
            SubscriptionSettings::default()
        );
    }

    #[test]
    fn test_settings_take_declared_values() {
        let bag = AttributeBag::new()
            .with(START_FROM, -1i64)
            .with(RESOLVE_LINK_TOS, false)
            .with(NAMED_CONSUMER_STRATEGY, "Pinned");
        let s = settings_from_bag(&bag);
        assert_eq!(s.start_from, -1);
        assert!(!s.resolve_link_tos);
        assert_eq!(s.named_consumer_strategy, "Pinned");
        assert_eq!(s.buffer_size, 500);
    }

    #[test]
    fn test_key_of_prefers_identifier() {
        let data = ResourceData::with_id(
            "orders/billing",
            AttributeBag::new()
                .with(STREAM_NAME, "other")
                .with(SUBSCRIPTION_NAME, "x"),
        );
        assert_eq!(
            key_of(&data).unwrap(),
            ("orders".to_string(), "billing".to_string())
        );
    }

    #[test]
    fn test_key_from_bag_requires_both_fields() {
        let bag = AttributeBag::new().with(STREAM_NAME, "orders");
        let diags = key_from_bag(&bag).unwrap_err();
        assert!(diags.has_error());
    }
}
