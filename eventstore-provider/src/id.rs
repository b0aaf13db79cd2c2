//! Resource identifier encoding.
//!
//! Users are keyed by username. Subscriptions are keyed by
//! `stream_name/subscription_name`; decoding splits on the first `/`, so only
//! the subscription name may itself contain the delimiter.

use thiserror::Error;

/// Delimiter between the components of a composite identifier.
pub const DELIMITER: char = '/';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("malformed subscription id {0:?}: expected \"stream_name/subscription_name\"")]
    Malformed(String),
}

pub fn encode_user(username: &str) -> String {
    username.to_string()
}

pub fn decode_user(id: &str) -> &str {
    id
}

pub fn encode_subscription(stream: &str, name: &str) -> String {
    format!("{}{}{}", stream, DELIMITER, name)
}

pub fn decode_subscription(id: &str) -> Result<(&str, &str), IdError> {
    id.split_once(DELIMITER)
        .ok_or_else(|| IdError::Malformed(id.to_string()))
}
