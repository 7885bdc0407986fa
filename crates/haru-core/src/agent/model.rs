//! Agent domain model.
//!
//! An agent is a configured AI persona that replies to posts and chats with
//! the user. Agents are identified by a small numeric id that stays stable
//! for the agent's lifetime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Id of the first seeded agent; implicit owner of legacy replies
    /// stored without an agent id.
    pub const PRIMARY: AgentId = AgentId(1);

    /// Returns the next id after this one.
    pub fn next(self) -> AgentId {
        AgentId(self.0 + 1)
    }
}

impl From<u64> for AgentId {
    fn from(value: u64) -> Self {
        AgentId(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configured AI persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Unique identifier, never reused within a session
    pub id: AgentId,
    /// Display name
    pub name: String,
    /// Handle shown next to the name (e.g. "@gemini_official")
    pub handle: String,
    /// Free-text instruction prepended to every prompt
    pub persona: String,
    /// Optional avatar image reference
    pub avatar_url: Option<String>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        handle: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            handle: handle.into(),
            persona: persona.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// The seeded default agents.
    pub fn defaults() -> Vec<Agent> {
        vec![
            Agent::new(
                AgentId(1),
                "Gemini",
                "@gemini_official",
                "You are a helpful and intelligent AI assistant provided by Google. You are polite, concise, and informative.",
            ),
            Agent::new(
                AgentId(2),
                "Bestie",
                "@your_bestie",
                "You are an empathetic, cheerful, and casual close friend. You use emojis often, speak informally, and always cheer the user up.",
            ),
        ]
    }
}

/// Name and handle used to display a reply or message author.
///
/// Replies keep the id of the agent that wrote them even after that agent is
/// deleted; such replies display with [`AgentDisplay::fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDisplay {
    pub name: String,
    pub handle: String,
    pub avatar_url: Option<String>,
}

impl AgentDisplay {
    pub fn fallback() -> Self {
        Self {
            name: "AI".to_string(),
            handle: "@ai".to_string(),
            avatar_url: None,
        }
    }
}

impl From<&Agent> for AgentDisplay {
    fn from(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            handle: agent.handle.clone(),
            avatar_url: agent.avatar_url.clone(),
        }
    }
}
