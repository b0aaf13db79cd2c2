//! HTTP client for the EventStore management API.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::eventstore::{ClientError, EventStoreApi, Subscription, SubscriptionSettings, User};

/// `GET /users/{login}` envelope.
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    data: UserDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDetails {
    login_name: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    disabled: bool,
}

impl From<UserDetails> for User {
    fn from(d: UserDetails) -> Self {
        User {
            username: d.login_name,
            full_name: d.full_name,
            groups: d.groups,
            disabled: d.disabled,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserBody<'a> {
    login_name: &'a str,
    full_name: &'a str,
    groups: &'a [String],
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserBody<'a> {
    full_name: &'a str,
    groups: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    new_password: &'a str,
}

/// `GET /subscriptions/{stream}/{group}/info` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionInfo {
    event_stream_id: String,
    group_name: String,
    config: SubscriptionSettings,
}

/// EventStore client speaking the HTTP management API with basic auth.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    http: reqwest::Client,
    username: String,
    password: String,
}

impl HttpClient {
    pub fn new(url: &str, username: &str, password: &str) -> Result<Self, ClientError> {
        if url.trim().is_empty() {
            return Err(ClientError::InvalidEndpoint("endpoint url is empty".to_string()));
        }
        let base = Url::parse(url)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(format!(
                "{}: not a base url",
                url
            )));
        }
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            base,
            http,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// Build a url below the base, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url).header(ACCEPT, "application/json");
        if self.username.is_empty() {
            req
        } else {
            req.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Map non-success statuses to errors; 404 becomes `NotFound`.
    async fn check(resp: Response) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(resp.url().path().to_string()));
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let resp = req.send().await?;
        Self::check(resp).await
    }

    /// Fetch a user that must exist.
    async fn require_user(&self, username: &str) -> Result<User, ClientError> {
        self.get_user(username)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("user {}", username)))
    }

    async fn user_command(&self, username: &str, command: &str) -> Result<User, ClientError> {
        let url = self.url(&["users", username, "command", command])?;
        self.send(self.request(Method::POST, url)).await?;
        self.require_user(username).await
    }
}

#[async_trait]
impl EventStoreApi for HttpClient {
    async fn get_user(&self, username: &str) -> Result<Option<User>, ClientError> {
        debug!(username = %username, "GET user");
        let url = self.url(&["users", username])?;
        match self.send(self.request(Method::GET, url)).await {
            Ok(resp) => {
                let envelope: UserEnvelope = resp
                    .json()
                    .await
                    .map_err(|e| ClientError::Decode(e.to_string()))?;
                Ok(Some(envelope.data.into()))
            }
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError> {
        debug!(username = %username, "POST user");
        let url = self.url(&["users", ""])?;
        let body = CreateUserBody {
            login_name: username,
            full_name,
            groups,
            password,
        };
        self.send(self.request(Method::POST, url).json(&body)).await?;

        Ok(User {
            username: username.to_string(),
            full_name: full_name.to_string(),
            groups: groups.to_vec(),
            disabled: false,
        })
    }

    async fn update_user(
        &self,
        username: &str,
        full_name: &str,
        groups: &[String],
    ) -> Result<User, ClientError> {
        debug!(username = %username, "PUT user");
        let url = self.url(&["users", username])?;
        let body = UpdateUserBody { full_name, groups };
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        self.require_user(username).await
    }

    async fn set_user_password(&self, username: &str, password: &str) -> bool {
        debug!(username = %username, "POST reset-password");
        let url = match self.url(&["users", username, "command", "reset-password"]) {
            Ok(url) => url,
            Err(_) => return false,
        };
        let body = ResetPasswordBody {
            new_password: password,
        };
        match self.send(self.request(Method::POST, url).json(&body)).await {
            Ok(_) => true,
            Err(e) => {
                debug!(username = %username, error = %e, "reset-password failed");
                false
            }
        }
    }

    async fn disable_user(&self, username: &str) -> Result<User, ClientError> {
        debug!(username = %username, "POST disable");
        self.user_command(username, "disable").await
    }

    async fn enable_user(&self, username: &str) -> Result<User, ClientError> {
        debug!(username = %username, "POST enable");
        self.user_command(username, "enable").await
    }

    async fn delete_user(&self, username: &str) -> bool {
        debug!(username = %username, "DELETE user");
        let url = match self.url(&["users", username]) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.send(self.request(Method::DELETE, url)).await {
            Ok(_) => true,
            Err(e) => {
                debug!(username = %username, error = %e, "delete user failed");
                false
            }
        }
    }

    async fn get_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<Subscription, ClientError> {
        debug!(stream = %stream_name, group = %subscription_name, "GET subscription info");
        let url = self.url(&["subscriptions", stream_name, subscription_name, "info"])?;
        let info: SubscriptionInfo = self
            .send(self.request(Method::GET, url))
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(Subscription {
            stream_name: info.event_stream_id,
            subscription_name: info.group_name,
            settings: info.config,
        })
    }

    async fn create_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError> {
        debug!(
            stream = %subscription.stream_name,
            group = %subscription.subscription_name,
            "PUT subscription"
        );
        let url = self.url(&[
            "subscriptions",
            &subscription.stream_name,
            &subscription.subscription_name,
        ])?;
        self.send(self.request(Method::PUT, url).json(&subscription.settings))
            .await?;
        Ok(subscription.clone())
    }

    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, ClientError> {
        debug!(
            stream = %subscription.stream_name,
            group = %subscription.subscription_name,
            "POST subscription"
        );
        let url = self.url(&[
            "subscriptions",
            &subscription.stream_name,
            &subscription.subscription_name,
        ])?;
        self.send(self.request(Method::POST, url).json(&subscription.settings))
            .await?;
        Ok(subscription.clone())
    }

    async fn delete_subscription(
        &self,
        stream_name: &str,
        subscription_name: &str,
    ) -> Result<bool, ClientError> {
        debug!(stream = %stream_name, group = %subscription_name, "DELETE subscription");
        let url = self.url(&["subscriptions", stream_name, subscription_name])?;
        match self.send(self.request(Method::DELETE, url)).await {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
