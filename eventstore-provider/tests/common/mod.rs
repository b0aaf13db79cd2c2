//! Shared test utilities: an in-memory EventStore that records every call.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use eventstore_provider::clients::{ClientError, EventStoreApi, Subscription, User};

/// A call made against the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetUser(String),
    CreateUser {
        username: String,
        password: String,
        full_name: String,
        groups: Vec<String>,
    },
    UpdateUser {
        username: String,
        full_name: String,
        groups: Vec<String>,
    },
    SetUserPassword {
        username: String,
        password: String,
    },
    DisableUser(String),
    EnableUser(String),
    DeleteUser(String),
    GetSubscription(String, String),
    CreateSubscription(Subscription),
    UpdateSubscription(Subscription),
    DeleteSubscription(String, String),
}

/// In-memory EventStore with failure injection.
#[derive(Default)]
pub struct MockEventStore {
    users: Mutex<HashMap<String, User>>,
    subscriptions: Mutex<HashMap<(String, String), Subscription>>,
    calls: Mutex<Vec<Call>>,
    /// Operations that fail: `Err` for fallible calls, `false` for boolean ones.
    failing: Mutex<HashSet<&'static str>>,
    /// Subscription deletes answer `Ok(false)`.
    refuse_subscription_delete: Mutex<bool>,
}

impl MockEventStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the named operation fail from now on.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn refuse_subscription_delete(&self) {
        *self.refuse_subscription_delete.lock().unwrap() = true;
    }

    pub fn insert_user(&self, user: User) {
        self.users
            .lock()
            .unwrap()
            .insert(user.username.clone(), user);
    }

    pub fn insert_subscription(&self, sub: Subscription) {
        self.subscriptions.lock().unwrap().insert(
            (sub.stream_name.clone(), sub.subscription_name.clone()),
            sub,
        );
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.users.lock().unwrap().get(username).cloned()
    }

    pub fn subscription(&self, stream: &str, name: &str) -> Option<Subscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .get(&(stream.to_string(), name.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fails(&self, op: &str) -> bool {
        self.failing.lock().unwrap().contains(op)
    }

    fn injected() -> ClientError {
        ClientError::Status {
            status: 500,
            body: "injected".to_string(),
        }
    }

    fn set_disabled(&self, username: &str, disabled: bool) -> Result<User, ClientError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(username)
            .ok_or_else(|| ClientError::NotFound(format!("user {}", username)))?;
        user.disabled = disabled;
        Ok(user.clone())
    }
}

#[async_trait]
impl EventStoreApi for MockEventStore {
    async fn get_user(&self, username: &str) -> Result<Option<User>, ClientError> {
        self.record(Call::GetUser(username.to_string()));
        if self.fails("get_user") {
            return Err(Self::injected());
        }
        Ok(self.user(username))
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError> {
        self.record(Call::CreateUser {
            username: username.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            groups: groups.to_vec(),
        });
        if self.fails("create_user") {
            return Err(Self::injected());
        }
        let user = User {
            username: username.to_string(),
            full_name: full_name.to_string(),
            groups: groups.to_vec(),
            disabled: false,
        };
        self.insert_user(user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        username: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError> {
        self.record(Call::UpdateUser {
            username: username.to_string(),
            full_name: full_name.to_string(),
            groups: groups.to_vec(),
        });
        if self.fails("update_user") {
            return Err(Self::injected());
        }
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(username)
            .ok_or_else(|| ClientError::NotFound(format!("user {}", username)))?;
        user.full_name = full_name.to_string();
        user.groups = groups.to_vec();
        Ok(user.clone())
    }

    async fn set_user_password(&self, username: &str, password: &str) -> bool {
        self.record(Call::SetUserPassword {
            username: username.to_string(),
            password: password.to_string(),
        });
        !self.fails("set_user_password") && self.user(username).is_some()
    }

    async fn disable_user(&self, username: &str) -> Result<User, ClientError> {
        self.record(Call::DisableUser(username.to_string()));
        if self.fails("disable_user") {
            return Err(Self::injected());
        }
        self.set_disabled(username, true)
    }

    async fn enable_user(&self, username: &str) -> Result<User, ClientError> {
        self.record(Call::EnableUser(username.to_string()));
        if self.fails("enable_user") {
            return Err(Self::injected());
        }
        self.set_disabled(username, false)
    }

    async fn delete_user(&self, username: &str) -> bool {
        self.record(Call::DeleteUser(username.to_string()));
        if self.fails("delete_user") {
            return false;
        }
        self.users.lock().unwrap().remove(username).is_some()
    }

    async fn get_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<Subscription, ClientError> {
        self.record(Call::GetSubscription(
            stream_name.to_string(),
            subscription_name.to_string(),
        ));
        if self.fails("get_subscription") {
            return Err(Self::injected());
        }
        self.subscription(stream_name, subscription_name)
            .ok_or_else(|| {
                ClientError::NotFound(format!("{}/{}", stream_name, subscription_name))
            })
    }

    async fn create_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError> {
        self.record(Call::CreateSubscription(subscription.clone()));
        if self.fails("create_subscription") {
            return Err(Self::injected());
        }
        self.insert_subscription(subscription.clone());
        Ok(subscription.clone())
    }

    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError> {
        self.record(Call::UpdateSubscription(subscription.clone()));
        if self.fails("update_subscription") {
            return Err(Self::injected());
        }
        if self
            .subscription(&subscription.stream_name, &subscription.subscription_name)
            .is_none()
        {
            return Err(ClientError::NotFound(format!(
                "{}/{}",
                subscription.stream_name, subscription.subscription_name
            )));
        }
        self.insert_subscription(subscription.clone());
        Ok(subscription.clone())
    }

    async fn delete_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<bool, ClientError> {
        self.record(Call::DeleteSubscription(
            stream_name.to_string(),
            subscription_name.to_string(),
        ));
        if self.fails("delete_subscription") {
            return Err(Self::injected());
        }
        if *self.refuse_subscription_delete.lock().unwrap() {
            return Ok(false);
        }
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .remove(&(stream_name.to_string(), subscription_name.to_string()))
            .is_some())
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
