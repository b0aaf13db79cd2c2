//! Read-back projection of remote entities onto attribute bags.

use crate::attrs::AttributeBag;
use crate::clients::{Subscription, SubscriptionSettings, User};

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const FULLNAME: &str = "fullname";
pub const GROUPS: &str = "groups";
pub const DISABLED: &str = "disabled";

pub const STREAM_NAME: &str = "stream_name";
pub const SUBSCRIPTION_NAME: &str = "subscription_name";
pub const MIN_CHECKPOINT_COUNT: &str = "min_checkpoint_count";
pub const START_FROM: &str = "start_from";
pub const RESOLVE_LINK_TOS: &str = "resolve_link_tos";
pub const READ_BATCH_SIZE: &str = "read_batch_size";
pub const NAMED_CONSUMER_STRATEGY: &str = "named_consumer_strategy";
pub const EXTRA_STATISTICS: &str = "extra_statistics";
pub const MAX_RETRY_COUNT: &str = "max_retry_count";
pub const LIVE_BUFFER_SIZE: &str = "live_buffer_size";
pub const MESSAGE_TIMEOUT_MILLISECONDS: &str = "message_timeout_milliseconds";
pub const MAX_CHECKPOINT_COUNT: &str = "max_checkpoint_count";
pub const MAX_SUBSCRIBER_COUNT: &str = "max_subscriber_count";
pub const CHECKPOINT_AFTER_MILLISECONDS: &str = "checkpoint_after_milliseconds";
pub const BUFFER_SIZE: &str = "buffer_size";

/// Copy the readable user fields. Username and password are left alone.
pub fn project_user(user: &User, bag: &mut AttributeBag) {
    bag.set(FULLNAME, user.full_name.as_str());
    bag.set(GROUPS, user.groups.clone());
    bag.set(DISABLED, user.disabled);
}

/// Copy the key pair and all thirteen tunables.
pub fn project_subscription(stream: &str, name: &str, sub: &Subscription, bag: &mut AttributeBag) {
    bag.set(STREAM_NAME, stream);
    bag.set(SUBSCRIPTION_NAME, name);
    project_settings(&sub.settings, bag);
}

fn project_settings(s: &SubscriptionSettings, bag: &mut AttributeBag) {
    bag.set(MIN_CHECKPOINT_COUNT, s.min_checkpoint_count);
    bag.set(START_FROM, s.start_from);
    bag.set(RESOLVE_LINK_TOS, s.resolve_link_tos);
    bag.set(READ_BATCH_SIZE, s.read_batch_size);
    bag.set(NAMED_CONSUMER_STRATEGY, s.named_consumer_strategy.as_str());
    bag.set(EXTRA_STATISTICS, s.extra_statistics);
    bag.set(MAX_RETRY_COUNT, s.max_retry_count);
    bag.set(LIVE_BUFFER_SIZE, s.live_buffer_size);
    bag.set(MESSAGE_TIMEOUT_MILLISECONDS, s.message_timeout_milliseconds);
    bag.set(MAX_CHECKPOINT_COUNT, s.max_checkpoint_count);
    bag.set(MAX_SUBSCRIBER_COUNT, s.max_subscriber_count);
    bag.set(CHECKPOINT_AFTER_MILLISECONDS, s.checkpoint_after_milliseconds);
    bag.set(BUFFER_SIZE, s.buffer_size);
}
