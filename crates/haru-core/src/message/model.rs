//! Chat message domain model.

use crate::agent::AgentId;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

/// One turn in a chat thread with a single agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    /// Thread the message belongs to
    pub agent_id: AgentId,
    pub sender: Sender,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Message {
    fn now(agent_id: AgentId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id,
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// A message the user sends to an agent.
    pub fn from_user(agent_id: AgentId, text: impl Into<String>) -> Self {
        Self::now(agent_id, Sender::User, text)
    }

    /// An agent's answer.
    pub fn from_agent(agent_id: AgentId, text: impl Into<String>) -> Self {
        Self::now(agent_id, Sender::Agent, text)
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Messages of one agent's thread, ordered by timestamp.
///
/// Equal timestamps keep storage order.
pub fn thread_of(messages: &[Message], agent_id: AgentId) -> Vec<Message> {
    let mut thread: Vec<Message> = messages
        .iter()
        .filter(|m| m.agent_id == agent_id)
        .cloned()
        .collect();
    thread.sort_by_key(|m| m.timestamp);
    thread
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_filters_and_orders() {
        let mut late = Message::from_user(AgentId(1), "late");
        late.timestamp = 30;
        let mut early = Message::from_agent(AgentId(1), "early");
        early.timestamp = 10;
        let mut other = Message::from_user(AgentId(2), "other");
        other.timestamp = 20;

        let thread = thread_of(&[late, other, early], AgentId(1));
        let texts: Vec<&str> = thread.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["early", "late"]);
        assert!(!thread[0].is_from_user());
    }
}
