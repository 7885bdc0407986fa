//! Storage layer: key-value substrates and typed access.

mod dir_store;
mod key_value;
mod persisted_store;

pub use dir_store::DirKeyValueStore;
pub use key_value::{KeyValueError, KeyValueStore, MemoryKeyValueStore, UpdateFn, validate_key};
pub use persisted_store::PersistedStore;

/// Storage keys. The version of each document's schema is carried by its
/// key: changing a schema means changing the key, and data under the old
/// key is abandoned.
pub mod keys {
    pub const ENTRIES: &str = "haru_tweet_entries";
    pub const AGENT_SETTINGS: &str = "haru_tweet_ai_config_v2";
    pub const MESSAGES: &str = "haru_tweet_messages";
    pub const PROFILE: &str = "haru_tweet_user";

    /// Every key covered by export/import.
    pub const ALL: [&str; 4] = [ENTRIES, AGENT_SETTINGS, MESSAGES, PROFILE];
}
