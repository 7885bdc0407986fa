//! Persistence and configuration for haru.
//!
//! Storage is a set of JSON documents, one per key, behind a
//! [`PersistedStore`]. The JSON repositories translate between those
//! documents and the domain models of `haru-core`.

pub mod config_service;
pub mod dto;
pub mod json_agent_settings_repository;
pub mod json_entry_repository;
pub mod json_message_repository;
pub mod json_profile_repository;
pub mod paths;
pub mod storage;
pub mod sync_codec;

pub use crate::config_service::{ConfigService, GeminiCredentials};
pub use crate::json_agent_settings_repository::JsonAgentSettingsRepository;
pub use crate::json_entry_repository::JsonEntryRepository;
pub use crate::json_message_repository::JsonMessageRepository;
pub use crate::json_profile_repository::JsonProfileRepository;
pub use crate::paths::HaruPaths;
pub use crate::storage::PersistedStore;
pub use crate::sync_codec::{ImportSummary, SyncCodec};
