//! JSON-document MessageRepository implementation

use crate::dto::{decode_messages, encode_messages};
use crate::storage::{PersistedStore, keys};
use haru_core::Result;
use haru_core::message::{Message, MessageRepository};

/// Stores every chat thread in one message collection document.
pub struct JsonMessageRepository {
    store: PersistedStore,
}

impl JsonMessageRepository {
    pub fn new(store: PersistedStore) -> Self {
        Self { store }
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<Message>)) -> Result<Vec<Message>> {
        self.store.modify_value(keys::MESSAGES, |current| {
            let mut messages = decode_messages(current);
            f(&mut messages);
            let document = serde_json::to_value(encode_messages(&messages))?;
            Ok((document, messages))
        })
    }
}

impl MessageRepository for JsonMessageRepository {
    fn get_all(&self) -> Vec<Message> {
        decode_messages(self.store.read_value(keys::MESSAGES))
    }

    fn save_all(&self, messages: &[Message]) -> Result<()> {
        self.store.write(keys::MESSAGES, &encode_messages(messages))
    }

    fn append(&self, message: Message) -> Result<Vec<Message>> {
        self.modify(|messages| messages.push(message))
    }

    fn delete(&self, id: &str) -> Result<Vec<Message>> {
        self.modify(|messages| messages.retain(|m| m.id != id))
    }
}
