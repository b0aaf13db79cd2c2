//! Read-only user lookup by username.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};

use super::project::{self, USERNAME};
use super::DataSource;
use crate::attrs::ResourceData;
use crate::clients::EventStoreApi;
use crate::diag::Diagnostics;

pub const KIND: &str = "eventstore_user";

/// Looks up an existing user. The identifier is a fresh timestamp on every
/// read and does not correlate with the user.
pub struct UserLookup {
    client: Arc<dyn EventStoreApi>,
}

impl UserLookup {
    pub fn new(client: Arc<dyn EventStoreApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for UserLookup {
    fn kind(&self) -> &'static str {
        KIND
    }

    async fn read(&self, data: &mut ResourceData) -> Diagnostics {
        let username = match data.attributes.get_str(USERNAME) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => return Diagnostics::error("username is required"),
        };
        debug!(username = %username, "Looking up user");

        match self.client.get_user(&username).await {
            Ok(Some(user)) => project::project_user(&user, &mut data.attributes),
            Ok(None) => return Diagnostics::error(format!("User {} not found", username)),
            Err(e) => {
                error!(username = %username, "Failed to look up user: {}", e);
                return Diagnostics::from_err(&e);
            }
        }

        data.set_id(Utc::now().timestamp().to_string());
        Diagnostics::new()
    }
}
