//! Clients for the remote EventStore.
//!
//! - `eventstore`: the `EventStoreApi` trait the reconcilers depend on
//! - `http`: default implementation over the HTTP management API

pub mod eventstore;
pub mod http;

pub use eventstore::{ClientError, EventStoreApi, Subscription, SubscriptionSettings, User};
pub use http::HttpClient;
