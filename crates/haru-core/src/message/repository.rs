//! Message repository trait.

use super::model::{Message, thread_of};
use crate::agent::AgentId;
use crate::error::Result;

/// Persistence for chat messages of all agents.
///
/// Messages are stored as one collection in insertion order.
pub trait MessageRepository: Send + Sync {
    /// Retrieves all messages. Missing or corrupt data reads as empty.
    fn get_all(&self) -> Vec<Message>;

    /// Replaces the whole collection.
    fn save_all(&self, messages: &[Message]) -> Result<()>;

    /// Appends one message and returns the updated collection.
    fn append(&self, message: Message) -> Result<Vec<Message>> {
        let mut messages = self.get_all();
        messages.push(message);
        self.save_all(&messages)?;
        Ok(messages)
    }

    /// Removes a message; no-op if absent.
    fn delete(&self, id: &str) -> Result<Vec<Message>> {
        let mut messages = self.get_all();
        messages.retain(|m| m.id != id);
        self.save_all(&messages)?;
        Ok(messages)
    }

    /// The complete conversation with one agent, oldest first.
    fn thread(&self, agent_id: AgentId) -> Vec<Message> {
        thread_of(&self.get_all(), agent_id)
    }
}
