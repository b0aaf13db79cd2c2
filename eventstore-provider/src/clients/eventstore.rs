//! EventStore management API as seen by the reconcilers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by an EventStore client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

/// User account as reported by EventStore. The password is write-only and
/// never part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub full_name: String,
    pub groups: Vec<String>,
    pub disabled: bool,
}

/// Tunables of a persistent subscription, in the order EventStore takes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSettings {
    #[serde(rename = "minCheckPointCount")]
    pub min_checkpoint_count: i64,
    #[serde(rename = "startFrom")]
    pub start_from: i64,
    #[serde(rename = "resolveLinktos")]
    pub resolve_link_tos: bool,
    #[serde(rename = "readBatchSize")]
    pub read_batch_size: i64,
    #[serde(rename = "namedConsumerStrategy")]
    pub named_consumer_strategy: String,
    #[serde(rename = "extraStatistics")]
    pub extra_statistics: bool,
    #[serde(rename = "maxRetryCount")]
    pub max_retry_count: i64,
    #[serde(rename = "liveBufferSize")]
    pub live_buffer_size: i64,
    #[serde(rename = "messageTimeoutMilliseconds")]
    pub message_timeout_milliseconds: i64,
    #[serde(rename = "maxCheckPointCount")]
    pub max_checkpoint_count: i64,
    #[serde(rename = "maxSubscriberCount")]
    pub max_subscriber_count: i64,
    #[serde(rename = "checkPointAfterMilliseconds")]
    pub checkpoint_after_milliseconds: i64,
    #[serde(rename = "bufferSize")]
    pub buffer_size: i64,
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        Self {
            min_checkpoint_count: 10,
            start_from: 0,
            resolve_link_tos: true,
            read_batch_size: 20,
            named_consumer_strategy: "RoundRobin".to_string(),
            extra_statistics: false,
            max_retry_count: 10,
            live_buffer_size: 500,
            message_timeout_milliseconds: 10000,
            max_checkpoint_count: 500,
            max_subscriber_count: 10,
            checkpoint_after_milliseconds: 1000,
            buffer_size: 500,
        }
    }
}

/// Persistent subscription keyed by (stream, group name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub stream_name: String,
    pub subscription_name: String,
    pub settings: SubscriptionSettings,
}

/// Operations the reconcilers need from EventStore.
///
/// Password changes and deletions report success as a plain `bool`; callers
/// turn `false` into their own diagnostic since no cause is available.
#[async_trait]
pub trait EventStoreApi: Send + Sync {
    /// Fetch a user; `Ok(None)` if it does not exist.
    async fn get_user(&self, username: &str) -> Result<Option<User>, ClientError>;

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError>;

    /// Replace full name and groups together.
    async fn update_user(
        &self,
        username: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError>;

    async fn set_user_password(&self, username: &str, password: &str) -> bool;

    async fn disable_user(&self, username: &str) -> Result<User, ClientError>;

    async fn enable_user(&self, username: &str) -> Result<User, ClientError>;

    async fn delete_user(&self, username: &str) -> bool;

    /// Fetch a subscription; a missing one is `ClientError::NotFound`.
    async fn get_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<Subscription, ClientError>;

    async fn create_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError>;

    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError>;

    async fn delete_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<bool, ClientError>;
}
