//! Agent configuration and the active set.
//!
//! [`AgentSettings`] owns the registry invariants:
//! - there is always at least one agent;
//! - the active set only names configured agents and is never empty;
//! - the number of agents never grows beyond [`RegistryPolicy::max_agents`].
//!
//! Every mutation either applies completely or is rejected with a
//! [`RegistryRejection`] and leaves the settings untouched.

use super::model::{Agent, AgentDisplay, AgentId};
use thiserror::Error;

/// Default ceiling on concurrently configured agents.
pub const DEFAULT_MAX_AGENTS: usize = 2;

/// Limits applied to registry mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryPolicy {
    pub max_agents: usize,
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self {
            max_agents: DEFAULT_MAX_AGENTS,
        }
    }
}

/// Reasons a registry mutation was turned into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryRejection {
    #[error("agent ceiling of {max} reached")]
    CeilingReached { max: usize },

    #[error("cannot remove the last remaining agent")]
    LastAgent,

    #[error("cannot deactivate the last active agent")]
    LastActiveAgent,

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("agent id {0} belonged to a removed agent")]
    RetiredId(AgentId),
}

/// Whether an upsert replaced an existing agent or appended a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Replaced,
    Appended,
}

/// The configured agents plus the ids that auto-reply to new posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    agents: Vec<Agent>,
    active_ids: Vec<AgentId>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl AgentSettings {
    /// Seeded configuration: the default agents, first one active.
    pub fn defaults() -> Self {
        Self {
            agents: Agent::defaults(),
            active_ids: vec![AgentId::PRIMARY],
        }
    }

    /// Builds settings from stored parts, restoring the invariants.
    ///
    /// - No agents → the defaults.
    /// - Duplicate agent ids keep their first occurrence.
    /// - Active ids naming unknown agents (or repeated) are dropped.
    /// - An empty active set promotes the first agent.
    pub fn from_parts(agents: Vec<Agent>, active_ids: Vec<AgentId>) -> Self {
        let mut unique: Vec<Agent> = Vec::with_capacity(agents.len());
        for agent in agents {
            if !unique.iter().any(|a| a.id == agent.id) {
                unique.push(agent);
            }
        }

        if unique.is_empty() {
            return Self::defaults();
        }

        let mut active: Vec<AgentId> = Vec::new();
        for id in active_ids {
            if unique.iter().any(|a| a.id == id) && !active.contains(&id) {
                active.push(id);
            }
        }
        if active.is_empty() {
            active.push(unique[0].id);
        }

        Self {
            agents: unique,
            active_ids: active,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn active_ids(&self) -> &[AgentId] {
        &self.active_ids
    }

    pub fn find(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn is_active(&self, id: AgentId) -> bool {
        self.active_ids.contains(&id)
    }

    /// Agents whose id is in the active set, in registry order.
    pub fn active_agents(&self) -> Vec<Agent> {
        self.agents
            .iter()
            .filter(|a| self.active_ids.contains(&a.id))
            .cloned()
            .collect()
    }

    /// Display info for an agent id, falling back for deleted agents.
    pub fn display_agent(&self, id: AgentId) -> AgentDisplay {
        self.find(id)
            .map(AgentDisplay::from)
            .unwrap_or_else(AgentDisplay::fallback)
    }

    /// Highest id currently configured.
    pub fn max_id(&self) -> AgentId {
        self.agents
            .iter()
            .map(|a| a.id)
            .max()
            .unwrap_or(AgentId(0))
    }

    /// Replaces the agent with the same id, or appends it.
    ///
    /// Appending is rejected once `policy.max_agents` agents are configured.
    /// Replacing is always allowed.
    pub fn upsert(
        &mut self,
        agent: Agent,
        policy: &RegistryPolicy,
    ) -> Result<UpsertKind, RegistryRejection> {
        if let Some(existing) = self.agents.iter_mut().find(|a| a.id == agent.id) {
            *existing = agent;
            return Ok(UpsertKind::Replaced);
        }

        if self.agents.len() >= policy.max_agents {
            return Err(RegistryRejection::CeilingReached {
                max: policy.max_agents,
            });
        }

        self.agents.push(agent);
        Ok(UpsertKind::Appended)
    }

    /// Removes an agent.
    ///
    /// Rejected when it is the last agent. The id leaves the active set; if
    /// that empties the set, the first remaining agent is promoted.
    pub fn remove(&mut self, id: AgentId) -> Result<Agent, RegistryRejection> {
        let index = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or(RegistryRejection::UnknownAgent(id))?;

        if self.agents.len() <= 1 {
            return Err(RegistryRejection::LastAgent);
        }

        let removed = self.agents.remove(index);
        self.active_ids.retain(|active| *active != id);
        if self.active_ids.is_empty() {
            self.active_ids.push(self.agents[0].id);
        }

        Ok(removed)
    }

    /// Adds or removes an agent from the active set.
    ///
    /// Activating an already-active agent and deactivating an inactive one
    /// are accepted without change.
    pub fn set_active(&mut self, id: AgentId, active: bool) -> Result<(), RegistryRejection> {
        if self.find(id).is_none() {
            return Err(RegistryRejection::UnknownAgent(id));
        }

        if active {
            if !self.active_ids.contains(&id) {
                self.active_ids.push(id);
            }
            return Ok(());
        }

        if !self.active_ids.contains(&id) {
            return Ok(());
        }
        if self.active_ids.len() == 1 {
            return Err(RegistryRejection::LastActiveAgent);
        }
        self.active_ids.retain(|active| *active != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: u64, name: &str) -> Agent {
        Agent::new(AgentId(id), name, format!("@{}", name.to_lowercase()), "persona")
    }

    #[test]
    fn test_defaults_have_one_active_agent() {
        let settings = AgentSettings::defaults();
        assert_eq!(settings.agents().len(), 2);
        assert_eq!(settings.active_ids(), &[AgentId(1)]);
    }

    #[test]
    fn test_from_parts_restores_invariants() {
        let settings = AgentSettings::from_parts(
            vec![agent(3, "A"), agent(3, "Dup"), agent(4, "B")],
            vec![AgentId(9), AgentId(9)],
        );
        assert_eq!(settings.agents().len(), 2);
        assert_eq!(settings.agents()[0].name, "A");
        assert_eq!(settings.active_ids(), &[AgentId(3)]);

        let empty = AgentSettings::from_parts(Vec::new(), vec![AgentId(1)]);
        assert_eq!(empty, AgentSettings::defaults());
    }

    #[test]
    fn test_upsert_respects_ceiling() {
        let mut settings = AgentSettings::defaults();
        let policy = RegistryPolicy::default();

        let result = settings.upsert(agent(3, "Third"), &policy);
        assert_eq!(result, Err(RegistryRejection::CeilingReached { max: 2 }));
        assert_eq!(settings.agents().len(), 2);

        let replaced = settings.upsert(agent(2, "Renamed"), &policy);
        assert_eq!(replaced, Ok(UpsertKind::Replaced));
        assert_eq!(settings.find(AgentId(2)).unwrap().name, "Renamed");

        let roomy = RegistryPolicy { max_agents: 3 };
        assert_eq!(settings.upsert(agent(3, "Third"), &roomy), Ok(UpsertKind::Appended));
    }

    #[test]
    fn test_remove_last_agent_rejected() {
        let mut settings = AgentSettings::from_parts(vec![agent(1, "Only")], vec![AgentId(1)]);
        let before = settings.clone();
        assert_eq!(settings.remove(AgentId(1)), Err(RegistryRejection::LastAgent));
        assert_eq!(settings, before);
    }

    #[test]
    fn test_remove_promotes_first_remaining() {
        let mut settings = AgentSettings::defaults();
        settings.remove(AgentId(1)).unwrap();
        assert_eq!(settings.active_ids(), &[AgentId(2)]);
        assert!(settings.find(AgentId(1)).is_none());
    }

    #[test]
    fn test_remove_unknown_is_rejected() {
        let mut settings = AgentSettings::defaults();
        assert_eq!(
            settings.remove(AgentId(42)),
            Err(RegistryRejection::UnknownAgent(AgentId(42)))
        );
        assert_eq!(settings.agents().len(), 2);
    }

    #[test]
    fn test_set_active_never_empties() {
        let mut settings = AgentSettings::defaults();
        assert_eq!(
            settings.set_active(AgentId(1), false),
            Err(RegistryRejection::LastActiveAgent)
        );
        assert_eq!(settings.active_ids(), &[AgentId(1)]);

        settings.set_active(AgentId(2), true).unwrap();
        settings.set_active(AgentId(1), false).unwrap();
        assert_eq!(settings.active_ids(), &[AgentId(2)]);

        // deactivating an inactive agent is accepted as-is
        settings.set_active(AgentId(1), false).unwrap();
        assert_eq!(settings.active_ids(), &[AgentId(2)]);
    }

    #[test]
    fn test_display_agent_falls_back_for_stale_id() {
        let settings = AgentSettings::defaults();
        assert_eq!(settings.display_agent(AgentId(1)).name, "Gemini");
        assert_eq!(settings.display_agent(AgentId(7)), AgentDisplay::fallback());
    }
}
