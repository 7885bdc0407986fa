//! Chat message DTOs.

use super::ids;
use haru_core::agent::AgentId;
use haru_core::message::{Message, Sender};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRecord {
    User,
    #[serde(alias = "agent")]
    Ai,
}

impl From<Sender> for SenderRecord {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => SenderRecord::User,
            Sender::Agent => SenderRecord::Ai,
        }
    }
}

impl From<SenderRecord> for Sender {
    fn from(record: SenderRecord) -> Self {
        match record {
            SenderRecord::User => Sender::User,
            SenderRecord::Ai => Sender::Agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "ids::agent_id")]
    pub ai_id: AgentId,
    pub sender: SenderRecord,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            ai_id: message.agent_id,
            sender: message.sender.into(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Message {
            id: record.id,
            agent_id: record.ai_id,
            sender: record.sender.into(),
            text: record.text,
            timestamp: record.timestamp,
        }
    }
}

/// Decodes the stored message collection, skipping unreadable elements.
pub fn decode_messages(value: Option<JsonValue>) -> Vec<Message> {
    let Some(JsonValue::Array(items)) = value else {
        if value.is_some() {
            tracing::warn!("Messages document is not an array; reading as empty");
        }
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<MessageRecord>(item) {
            Ok(record) => Some(Message::from(record)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable message record");
                None
            }
        })
        .collect()
}

pub fn encode_messages(messages: &[Message]) -> Vec<MessageRecord> {
    messages.iter().map(MessageRecord::from).collect()
}
