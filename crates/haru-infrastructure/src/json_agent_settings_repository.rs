//! JSON-document AgentSettingsRepository implementation

use crate::dto::AgentSettingsRecord;
use crate::storage::{PersistedStore, keys};
use haru_core::Result;
use haru_core::agent::{AgentSettings, AgentSettingsRepository};

/// Persists the agent registry.
///
/// Loading migrates older documents (single `activeAiId`, missing agent
/// list) and restores the registry invariants; it never writes.
pub struct JsonAgentSettingsRepository {
    store: PersistedStore,
}

impl JsonAgentSettingsRepository {
    pub fn new(store: PersistedStore) -> Self {
        Self { store }
    }
}

impl AgentSettingsRepository for JsonAgentSettingsRepository {
    fn load(&self) -> AgentSettings {
        match self.store.read::<AgentSettingsRecord>(keys::AGENT_SETTINGS) {
            Some(record) => AgentSettings::from(record),
            None => AgentSettings::defaults(),
        }
    }

    fn save(&self, settings: &AgentSettings) -> Result<()> {
        self.store
            .write(keys::AGENT_SETTINGS, &AgentSettingsRecord::from(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haru_core::agent::{Agent, AgentId, RegistryPolicy};

    #[test]
    fn test_missing_document_loads_defaults_without_writing() {
        let store = PersistedStore::in_memory();
        let repo = JsonAgentSettingsRepository::new(store.clone());

        assert_eq!(repo.load(), AgentSettings::defaults());
        assert_eq!(store.read_raw(keys::AGENT_SETTINGS), None);
    }

    #[test]
    fn test_save_and_reload() {
        let repo = JsonAgentSettingsRepository::new(PersistedStore::in_memory());
        let mut settings = AgentSettings::from_parts(
            vec![Agent::new(AgentId(1), "A", "@a", "p")],
            vec![AgentId(1)],
        );
        settings
            .upsert(
                Agent::new(AgentId(5), "E", "@e", "q"),
                &RegistryPolicy::default(),
            )
            .unwrap();
        settings.set_active(AgentId(5), true).unwrap();
        repo.save(&settings).unwrap();

        let reloaded = repo.load();
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.active_ids(), &[AgentId(1), AgentId(5)]);
    }
}
