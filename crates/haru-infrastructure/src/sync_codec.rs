//! Whole-store export and import.
//!
//! The export document bundles every collection:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": [ ... ],
//!   "aiSettings": { "ais": [ ... ], "activeAiIds": [1] },
//!   "messages": [ ... ],
//!   "userProfile": { "name": "User", ... }
//! }
//! ```
//!
//! Each section uses the same wire shape as its storage key, so legacy
//! entries survive a round trip unchanged.

use crate::dto::{
    AgentSettingsRecord, EntryRecord, MessageRecord, ProfileRecord, decode_entries,
    decode_messages, encode_entries, encode_messages,
};
use crate::storage::{PersistedStore, keys};
use haru_core::agent::AgentSettings;
use haru_core::{HaruError, Result};
use serde::{Deserialize, Serialize};

pub const SYNC_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SyncDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entries: Option<Vec<EntryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ai_settings: Option<AgentSettingsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<MessageRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_profile: Option<ProfileRecord>,
}

fn default_version() -> u32 {
    SYNC_FORMAT_VERSION
}

/// Storage keys an import rewrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub keys_written: Vec<&'static str>,
}

/// Serializes the whole store to one transportable blob and back.
pub struct SyncCodec {
    store: PersistedStore,
}

impl SyncCodec {
    pub fn new(store: PersistedStore) -> Self {
        Self { store }
    }

    /// Exports every collection as one JSON document.
    ///
    /// Collections are read the same way the repositories read them, so
    /// unreadable records are left out and missing agent settings export
    /// as the defaults.
    pub fn export(&self) -> Result<String> {
        let entries = decode_entries(self.store.read_value(keys::ENTRIES));
        let settings = self
            .store
            .read::<AgentSettingsRecord>(keys::AGENT_SETTINGS)
            .map(AgentSettings::from)
            .unwrap_or_default();
        let messages = decode_messages(self.store.read_value(keys::MESSAGES));
        let profile = self
            .store
            .read_or(keys::PROFILE, ProfileRecord::default);

        let document = SyncDocument {
            version: SYNC_FORMAT_VERSION,
            entries: Some(encode_entries(&entries)),
            ai_settings: Some(AgentSettingsRecord::from(&settings)),
            messages: Some(encode_messages(&messages)),
            user_profile: Some(profile),
        };

        tracing::info!(
            entries = entries.len(),
            messages = messages.len(),
            "Exported store"
        );
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Imports a blob produced by [`export`](Self::export).
    ///
    /// Returns `false` and leaves the store untouched when the blob is
    /// malformed or a write fails.
    pub fn import(&self, blob: &str) -> bool {
        match self.try_import(blob) {
            Ok(summary) => {
                tracing::info!(keys = ?summary.keys_written, "Imported store");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Import rejected");
                false
            }
        }
    }

    /// Like [`import`](Self::import), reporting why an import failed.
    ///
    /// Sections absent from the blob leave their key unchanged. The whole
    /// blob is validated before anything is written; if a write fails part
    /// way, keys already written are restored to their previous content.
    pub fn try_import(&self, blob: &str) -> Result<ImportSummary> {
        let value: serde_json::Value = serde_json::from_str(blob)?;
        if !value.is_object() {
            return Err(HaruError::validation("sync document must be a JSON object"));
        }
        let document: SyncDocument = serde_json::from_value(value)?;
        if document.version > SYNC_FORMAT_VERSION {
            return Err(HaruError::validation(format!(
                "sync document version {} is newer than supported version {}",
                document.version, SYNC_FORMAT_VERSION
            )));
        }

        let mut writes: Vec<(&'static str, String)> = Vec::new();
        if let Some(entries) = &document.entries {
            writes.push((keys::ENTRIES, serde_json::to_string(entries)?));
        }
        if let Some(record) = document.ai_settings {
            // Normalize through the domain so an imported registry obeys the
            // same invariants as a stored one.
            let settings = AgentSettings::from(record);
            let normalized = AgentSettingsRecord::from(&settings);
            writes.push((keys::AGENT_SETTINGS, serde_json::to_string(&normalized)?));
        }
        if let Some(messages) = &document.messages {
            writes.push((keys::MESSAGES, serde_json::to_string(messages)?));
        }
        if let Some(profile) = &document.user_profile {
            writes.push((keys::PROFILE, serde_json::to_string(profile)?));
        }

        let snapshot: Vec<(&'static str, Option<String>)> = writes
            .iter()
            .map(|(key, _)| (*key, self.store.read_raw(key)))
            .collect();

        for (index, (key, document)) in writes.iter().enumerate() {
            if let Err(e) = self.store.write_raw(key, document) {
                self.restore(&snapshot[..index]);
                return Err(e);
            }
        }

        Ok(ImportSummary {
            keys_written: writes.into_iter().map(|(key, _)| key).collect(),
        })
    }

    fn restore(&self, snapshot: &[(&'static str, Option<String>)]) {
        for (key, previous) in snapshot.iter().rev() {
            let restored = match previous {
                Some(raw) => self.store.write_raw(key, raw),
                None => self.store.remove(key),
            };
            if let Err(e) = restored {
                tracing::warn!(key, error = %e, "Failed to restore key after aborted import");
            }
        }
    }
}
