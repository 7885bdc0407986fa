//! Agent registry service.
//!
//! Wraps the stored [`AgentSettings`] with id allocation, persistence and
//! change notification. The invariants themselves live in `AgentSettings`;
//! this service only decides when to save and whom to tell.

use haru_core::Result;
use haru_core::agent::{
    Agent, AgentDisplay, AgentId, AgentSettings, AgentSettingsRepository, RegistryPolicy,
    RegistryRejection, UpsertKind,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Result of a registry mutation that storage accepted.
///
/// A rejection is a normal outcome, not an error: nothing was changed and
/// nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum RegistryOutcome<T> {
    Applied(T),
    Rejected(RegistryRejection),
}

impl<T> RegistryOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, RegistryOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            RegistryOutcome::Applied(value) => Some(value),
            RegistryOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RegistryRejection> {
        match self {
            RegistryOutcome::Applied(_) => None,
            RegistryOutcome::Rejected(reason) => Some(reason),
        }
    }
}

/// Fields of a new agent; the registry assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentDraft {
    pub name: String,
    pub handle: String,
    pub persona: String,
    pub avatar_url: Option<String>,
}

/// Owns the agent configuration.
///
/// Every applied mutation is saved before it is broadcast to subscribers.
pub struct AgentRegistry {
    repository: Arc<dyn AgentSettingsRepository>,
    policy: RegistryPolicy,
    /// Lowest id that has never been handed out in this session
    next_id: AtomicU64,
    /// Ids removed this session. The lock also serializes read-modify-write
    /// cycles.
    retired: Mutex<HashSet<AgentId>>,
    events: broadcast::Sender<AgentSettings>,
}

impl AgentRegistry {
    pub fn new(repository: Arc<dyn AgentSettingsRepository>, policy: RegistryPolicy) -> Self {
        let next_id = repository.load().max_id().next();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            repository,
            policy,
            next_id: AtomicU64::new(next_id.0),
            retired: Mutex::new(HashSet::new()),
            events,
        }
    }

    pub fn policy(&self) -> RegistryPolicy {
        self.policy
    }

    /// Current settings; the defaults if nothing is stored yet.
    pub fn settings(&self) -> AgentSettings {
        self.repository.load()
    }

    /// Configured agents in display order.
    pub fn list(&self) -> Vec<Agent> {
        self.settings().agents().to_vec()
    }

    /// Agents that auto-reply to new posts.
    pub fn active_agents(&self) -> Vec<Agent> {
        self.settings().active_agents()
    }

    pub fn find(&self, id: AgentId) -> Option<Agent> {
        self.settings().find(id).cloned()
    }

    /// Name and handle to show for a reply, with a placeholder for agents
    /// that no longer exist.
    pub fn display_agent(&self, id: AgentId) -> AgentDisplay {
        self.settings().display_agent(id)
    }

    /// Receives the full settings after every applied mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<AgentSettings> {
        self.events.subscribe()
    }

    /// Replaces the agent with the same id or appends it.
    ///
    /// Appending under the id of an agent removed this session is rejected,
    /// so its old replies never show a stranger's name.
    pub fn upsert(&self, agent: Agent) -> Result<RegistryOutcome<UpsertKind>> {
        let id = agent.id;
        let outcome = self.mutate(|settings, retired| {
            if settings.find(id).is_none() && retired.contains(&id) {
                return Err(RegistryRejection::RetiredId(id));
            }
            settings.upsert(agent, &self.policy)
        })?;
        if outcome.is_applied() {
            self.next_id.fetch_max(id.next().0, Ordering::SeqCst);
        }
        Ok(outcome)
    }

    /// Adds a new agent under a fresh id.
    pub fn create(&self, draft: AgentDraft) -> Result<RegistryOutcome<Agent>> {
        self.mutate(|settings, _| {
            let floor = settings.max_id().next().0;
            let id = AgentId(self.next_id.fetch_max(floor, Ordering::SeqCst).max(floor));
            let mut agent = Agent::new(id, draft.name, draft.handle, draft.persona);
            agent.avatar_url = draft.avatar_url.filter(|url| !url.is_empty());

            settings.upsert(agent.clone(), &self.policy)?;
            self.next_id.store(id.next().0, Ordering::SeqCst);
            Ok(agent)
        })
    }

    /// Removes an agent. Rejected for the last remaining agent.
    pub fn remove(&self, id: AgentId) -> Result<RegistryOutcome<Agent>> {
        self.mutate(|settings, retired| {
            let removed = settings.remove(id)?;
            retired.insert(id);
            Ok(removed)
        })
    }

    /// Adds or removes an agent from the active set. Rejected if it would
    /// leave the set empty.
    pub fn set_active(&self, id: AgentId, active: bool) -> Result<RegistryOutcome<()>> {
        self.mutate(|settings, _| settings.set_active(id, active))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(
            &mut AgentSettings,
            &mut HashSet<AgentId>,
        ) -> std::result::Result<T, RegistryRejection>,
    ) -> Result<RegistryOutcome<T>> {
        let mut retired = self
            .retired
            .lock()
            .map_err(|e| haru_core::HaruError::internal(format!("registry lock poisoned: {}", e)))?;

        let mut settings = self.repository.load();
        let mut newly_retired = retired.clone();
        match f(&mut settings, &mut newly_retired) {
            Ok(value) => {
                self.repository.save(&settings)?;
                *retired = newly_retired;
                tracing::info!(
                    agents = settings.agents().len(),
                    active = settings.active_ids().len(),
                    "Agent settings updated"
                );
                // No subscribers is fine.
                let _ = self.events.send(settings);
                Ok(RegistryOutcome::Applied(value))
            }
            Err(reason) => {
                tracing::info!(%reason, "Agent settings change rejected");
                Ok(RegistryOutcome::Rejected(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haru_infrastructure::{JsonAgentSettingsRepository, PersistedStore};

    fn registry(max_agents: usize) -> AgentRegistry {
        let repository = JsonAgentSettingsRepository::new(PersistedStore::in_memory());
        AgentRegistry::new(Arc::new(repository), RegistryPolicy { max_agents })
    }

    fn draft(name: &str) -> AgentDraft {
        AgentDraft {
            name: name.to_string(),
            handle: format!("@{}", name.to_lowercase()),
            persona: String::new(),
            avatar_url: None,
        }
    }

    #[test]
    fn test_defaults_seeded() {
        let registry = registry(2);
        let names: Vec<String> = registry.list().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Gemini", "Bestie"]);
        assert_eq!(registry.active_agents().len(), 1);
    }

    #[test]
    fn test_ceiling_rejects_create() {
        let registry = registry(2);
        let outcome = registry.create(draft("Third")).unwrap();
        assert_eq!(
            outcome,
            RegistryOutcome::Rejected(RegistryRejection::CeilingReached { max: 2 })
        );
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let registry = registry(3);
        let third = registry.create(draft("Third")).unwrap().applied().unwrap();
        assert_eq!(third.id, AgentId(3));

        assert!(registry.remove(third.id).unwrap().is_applied());
        let fourth = registry.create(draft("Fourth")).unwrap().applied().unwrap();
        assert_eq!(fourth.id, AgentId(4));
    }

    #[test]
    fn test_upsert_cannot_revive_removed_id() {
        let registry = registry(2);
        assert!(registry.remove(AgentId(2)).unwrap().is_applied());

        let stranger = Agent::new(AgentId(2), "Stranger", "@stranger", "");
        let outcome = registry.upsert(stranger).unwrap();
        assert_eq!(
            outcome.rejection(),
            Some(&RegistryRejection::RetiredId(AgentId(2)))
        );
        assert_eq!(registry.list().len(), 1);
        // replies by the removed agent keep the placeholder author
        assert_eq!(registry.display_agent(AgentId(2)), AgentDisplay::fallback());

        // a fresh agent still gets a fresh id
        let created = registry.create(draft("Newcomer")).unwrap().applied().unwrap();
        assert_eq!(created.id, AgentId(3));
    }

    #[test]
    fn test_upsert_of_unused_id_still_appends() {
        let registry = registry(3);
        let agent = Agent::new(AgentId(7), "Seven", "@seven", "");
        assert_eq!(
            registry.upsert(agent).unwrap(),
            RegistryOutcome::Applied(UpsertKind::Appended)
        );
        assert_eq!(registry.display_agent(AgentId(7)).name, "Seven");
    }

    #[test]
    fn test_removing_only_agent_is_rejected() {
        let registry = registry(2);
        assert!(registry.remove(AgentId(2)).unwrap().is_applied());

        let before = registry.settings();
        let outcome = registry.remove(AgentId(1)).unwrap();
        assert_eq!(outcome.rejection(), Some(&RegistryRejection::LastAgent));
        assert_eq!(registry.settings(), before);
    }

    #[test]
    fn test_set_active_never_empties() {
        let registry = registry(2);
        let outcome = registry.set_active(AgentId(1), false).unwrap();
        assert_eq!(outcome.rejection(), Some(&RegistryRejection::LastActiveAgent));

        assert!(registry.set_active(AgentId(2), true).unwrap().is_applied());
        assert!(registry.set_active(AgentId(1), false).unwrap().is_applied());
        assert_eq!(registry.settings().active_ids(), &[AgentId(2)]);
    }

    #[test]
    fn test_stale_id_displays_fallback() {
        let registry = registry(2);
        assert_eq!(registry.display_agent(AgentId(99)), AgentDisplay::fallback());
        assert_eq!(registry.display_agent(AgentId(1)).name, "Gemini");
    }

    #[tokio::test]
    async fn test_subscribers_see_applied_changes_only() {
        let registry = registry(2);
        let mut events = registry.subscribe();

        let _ = registry.set_active(AgentId(1), false).unwrap();
        let _ = registry.set_active(AgentId(2), true).unwrap();

        let settings = events.recv().await.unwrap();
        assert_eq!(settings.active_ids(), &[AgentId(1), AgentId(2)]);
        assert!(events.try_recv().is_err());
    }
}
