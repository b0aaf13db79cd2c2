//! Provider configuration.

use clap::Args;

/// Connection settings for the EventStore cluster.
///
/// Every value may be left empty; unset flags fall back to the environment.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// EventStore HTTP endpoint (e.g., http://localhost:2113)
    #[arg(long, env = "EVENTSTORE_URL", default_value = "")]
    pub url: String,

    /// Username used to authenticate against EventStore
    #[arg(long, env = "EVENTSTORE_USERNAME", default_value = "")]
    pub username: String,

    /// Password used to authenticate against EventStore
    #[arg(long, env = "EVENTSTORE_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
}

impl ProviderConfig {
    pub fn new(url: &str, username: &str, password: &str) -> Self {
        Self {
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}
