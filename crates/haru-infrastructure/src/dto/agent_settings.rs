//! Agent settings DTOs.

use super::ids;
use haru_core::agent::{Agent, AgentId, AgentSettings};
use serde::{Deserialize, Serialize};

/// Stored form of one agent. An empty `avatarUrl` means "no avatar".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    #[serde(deserialize_with = "ids::agent_id")]
    pub id: AgentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub avatar_url: String,
}

impl From<&Agent> for AgentRecord {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            handle: agent.handle.clone(),
            persona: agent.persona.clone(),
            avatar_url: agent.avatar_url.clone().unwrap_or_default(),
        }
    }
}

impl From<AgentRecord> for Agent {
    fn from(record: AgentRecord) -> Self {
        let avatar_url = Some(record.avatar_url).filter(|url| !url.is_empty());
        Agent {
            id: record.id,
            name: record.name,
            handle: record.handle,
            persona: record.persona,
            avatar_url,
        }
    }
}

/// Root of the agent settings document.
///
/// Older documents carry a single `activeAiId`; it is read as a one-element
/// active set and never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettingsRecord {
    #[serde(default)]
    pub ais: Option<Vec<AgentRecord>>,
    #[serde(default, deserialize_with = "ids::agent_id_list")]
    pub active_ai_ids: Option<Vec<AgentId>>,
    #[serde(
        default,
        deserialize_with = "ids::optional_agent_id",
        skip_serializing
    )]
    pub active_ai_id: Option<AgentId>,
}

impl From<AgentSettingsRecord> for AgentSettings {
    fn from(record: AgentSettingsRecord) -> Self {
        let Some(ais) = record.ais else {
            return AgentSettings::defaults();
        };

        let agents: Vec<Agent> = ais.into_iter().map(Agent::from).collect();
        let active_ids = match (record.active_ai_ids, record.active_ai_id) {
            (Some(ids), _) => ids,
            (None, Some(id)) => vec![id],
            (None, None) => Vec::new(),
        };

        AgentSettings::from_parts(agents, active_ids)
    }
}

impl From<&AgentSettings> for AgentSettingsRecord {
    fn from(settings: &AgentSettings) -> Self {
        Self {
            ais: Some(settings.agents().iter().map(AgentRecord::from).collect()),
            active_ai_ids: Some(settings.active_ids().to_vec()),
            active_ai_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> AgentSettings {
        AgentSettings::from(serde_json::from_value::<AgentSettingsRecord>(value).unwrap())
    }

    #[test]
    fn test_single_active_id_migrated() {
        let settings = decode(json!({
            "ais": [
                { "id": 1, "name": "A", "handle": "@a", "persona": "p", "avatarUrl": "" },
                { "id": 2, "name": "B", "handle": "@b", "persona": "q", "avatarUrl": "x.png" }
            ],
            "activeAiId": 2
        }));

        assert_eq!(settings.active_ids(), &[AgentId(2)]);
        assert_eq!(settings.agents()[0].avatar_url, None);
        assert_eq!(settings.agents()[1].avatar_url.as_deref(), Some("x.png"));
    }

    #[test]
    fn test_active_ids_wins_over_legacy_field() {
        let settings = decode(json!({
            "ais": [
                { "id": 1, "name": "A", "handle": "@a", "persona": "p" },
                { "id": 2, "name": "B", "handle": "@b", "persona": "q" }
            ],
            "activeAiIds": ["1", 2],
            "activeAiId": 2
        }));
        assert_eq!(settings.active_ids(), &[AgentId(1), AgentId(2)]);
    }

    #[test]
    fn test_missing_agents_reads_defaults() {
        assert_eq!(decode(json!({ "activeAiIds": [5] })), AgentSettings::defaults());
    }

    #[test]
    fn test_empty_active_set_promotes_first_agent() {
        let settings = decode(json!({
            "ais": [{ "id": 4, "name": "D", "handle": "@d", "persona": "" }],
            "activeAiIds": []
        }));
        assert_eq!(settings.active_ids(), &[AgentId(4)]);
    }

    #[test]
    fn test_written_form_has_no_legacy_field() {
        let written = serde_json::to_value(AgentSettingsRecord::from(&AgentSettings::defaults())).unwrap();
        assert!(written.get("activeAiId").is_none());
        assert_eq!(written["activeAiIds"], json!([1]));
        assert_eq!(written["ais"].as_array().map(Vec::len), Some(2));
    }
}
