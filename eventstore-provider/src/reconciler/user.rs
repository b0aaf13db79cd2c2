//! User reconciler - manages EventStore user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::project::{self, DISABLED, FULLNAME, GROUPS, PASSWORD, USERNAME};
use super::Resource;
use crate::attrs::{ChangedFields, ResourceData};
use crate::clients::EventStoreApi;
use crate::diag::Diagnostics;
use crate::id;

pub const KIND: &str = "eventstore_user";

const PASSWORD_UPDATE_FAILED: &str = "Failed to update password";
const TOGGLE_FAILED: &str = "Failed to Disable/Enable User";
const DELETE_FAILED: &str = "Failed to delete user";

/// User reconciler backed by an EventStore client.
pub struct UserReconciler {
    client: Arc<dyn EventStoreApi>,
}

impl UserReconciler {
    pub fn new(client: Arc<dyn EventStoreApi>) -> Self {
        Self { client }
    }

    /// Username for an existing resource: the identifier if set, else the bag.
    fn username(data: &ResourceData) -> String {
        if data.is_absent() {
            data.attributes.get_str(USERNAME).unwrap_or_default().to_string()
        } else {
            id::decode_user(&data.id).to_string()
        }
    }

    fn groups(data: &ResourceData) -> Vec<String> {
        data.attributes
            .get_list(GROUPS)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Resource for UserReconciler {
    fn kind(&self) -> &'static str {
        KIND
    }

    async fn create(&self, data: &mut ResourceData) -> Diagnostics {
        let bag = &data.attributes;
        let username = match bag.get_str(USERNAME) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => return Diagnostics::error("username is required"),
        };
        let password = bag.get_str(PASSWORD).unwrap_or_default().to_string();
        let full_name = match bag.get_str(FULLNAME) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => username.clone(),
        };
        let groups = Self::groups(data);
        let disabled = bag.get_bool(DISABLED).unwrap_or(false);

        info!(username = %username, "Creating user");
        let result = self
            .client
            .create_user(&username, &password, &full_name, &groups)
            .await;

        // Identity and password are recorded even when create fails.
        data.set_id(id::encode_user(&username));
        data.attributes.set(PASSWORD, password);

        let user = match result {
            Ok(user) => user,
            Err(e) => {
                error!(username = %username, "Failed to create user: {}", e);
                return Diagnostics::from_err(&e);
            }
        };
        project::project_user(&user, &mut data.attributes);

        if disabled {
            match self.client.disable_user(&username).await {
                Ok(user) => project::project_user(&user, &mut data.attributes),
                Err(e) => warn!(username = %username, "Failed to disable new user: {}", e),
            }
        }

        Diagnostics::new()
    }

    async fn read(&self, data: &mut ResourceData) -> Diagnostics {
        if data.is_absent() {
            return Diagnostics::new();
        }
        let username = id::decode_user(&data.id).to_string();

        match self.client.get_user(&username).await {
            Ok(Some(user)) => {
                project::project_user(&user, &mut data.attributes);
                Diagnostics::new()
            }
            Ok(None) => {
                warn!(username = %username, "User no longer exists, dropping from state");
                data.clear_id();
                Diagnostics::new()
            }
            Err(e) => {
                error!(username = %username, "Failed to read user: {}", e);
                Diagnostics::from_err(&e)
            }
        }
    }

    async fn update(&self, data: &mut ResourceData, changed: &ChangedFields) -> Diagnostics {
        let username = Self::username(data);
        info!(username = %username, "Updating user");

        if changed.has(FULLNAME) || changed.has(GROUPS) {
            let full_name = data.attributes.get_str(FULLNAME).unwrap_or_default();
            let groups = Self::groups(data);
            if let Err(e) = self.client.update_user(&username, full_name, &groups).await {
                error!(username = %username, "Failed to update user: {}", e);
                return Diagnostics::from_err(&e);
            }
        }

        if changed.has(PASSWORD) {
            let password = data.attributes.get_str(PASSWORD).unwrap_or_default();
            if !self.client.set_user_password(&username, password).await {
                error!(username = %username, "Failed to set password");
                return Diagnostics::error(PASSWORD_UPDATE_FAILED);
            }
        }

        if changed.has(DISABLED) {
            let result = if data.attributes.get_bool(DISABLED).unwrap_or(false) {
                self.client.disable_user(&username).await
            } else {
                self.client.enable_user(&username).await
            };
            if let Err(e) = result {
                error!(username = %username, "Failed to toggle user: {}", e);
                return Diagnostics::error(TOGGLE_FAILED);
            }
        }

        self.read(data).await
    }

    async fn delete(&self, data: &mut ResourceData) -> Diagnostics {
        let username = Self::username(data);
        info!(username = %username, "Deleting user");

        if !self.client.delete_user(&username).await {
            error!(username = %username, "Failed to delete user");
            return Diagnostics::error(DELETE_FAILED);
        }

        data.clear_id();
        Diagnostics::new()
    }
}
