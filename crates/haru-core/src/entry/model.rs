//! Entry (diary post) domain model.
//!
//! An entry is one user post. AI agents attach at most one reply each; the
//! reply list is kept unique by agent id at every mutation point.

use super::tags::extract_tags;
use crate::agent::AgentId;
use crate::error::{HaruError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

/// Optional mood the user attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Angry,
    Excited,
}

/// One agent's reply to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub agent_id: AgentId,
    pub text: String,
    pub is_liked: bool,
    pub is_bookmarked: bool,
}

impl Reply {
    pub fn new(agent_id: AgentId, text: impl Into<String>) -> Self {
        Self {
            agent_id,
            text: text.into(),
            is_liked: false,
            is_bookmarked: false,
        }
    }
}

/// A successful generation result waiting to be merged into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub agent_id: AgentId,
    pub text: String,
}

impl GeneratedReply {
    pub fn new(agent_id: AgentId, text: impl Into<String>) -> Self {
        Self {
            agent_id,
            text: text.into(),
        }
    }
}

/// The on-disk shape an entry's replies were decoded from.
///
/// Only the storage layer reads this; it writes an entry back in the shape it
/// was read in so that reading never rewrites a legacy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyLayout {
    /// `aiResponses: [...]`
    #[default]
    Multi,
    /// Flat `aiResponse` / `aiId` / `aiIsLiked` / `aiIsBookmarked` fields
    LegacySingle,
}

/// A user post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub mood: Option<Mood>,
    /// Inline `data:` URL or external reference
    pub image_url: Option<String>,
    tags: Vec<String>,
    pub is_liked: bool,
    pub is_bookmarked: bool,
    replies: Vec<Reply>,
    layout: ReplyLayout,
}

impl Entry {
    /// Rebuilds an entry from stored parts.
    ///
    /// Replies repeating an agent id are dropped (first one wins).
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        content: String,
        created_at: i64,
        mood: Option<Mood>,
        image_url: Option<String>,
        tags: Vec<String>,
        is_liked: bool,
        is_bookmarked: bool,
        replies: Vec<Reply>,
        layout: ReplyLayout,
    ) -> Self {
        let mut entry = Self {
            id,
            content,
            created_at,
            mood,
            image_url,
            tags,
            is_liked,
            is_bookmarked,
            replies: Vec::new(),
            layout,
        };
        for reply in replies {
            if entry.reply(reply.agent_id).is_none() {
                entry.replies.push(reply);
            }
        }
        entry
    }

    /// Opaque unique id, fixed at creation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Hashtags extracted from `content` at creation.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    pub fn reply(&self, agent_id: AgentId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.agent_id == agent_id)
    }

    pub fn layout(&self) -> ReplyLayout {
        self.layout
    }

    pub fn toggle_like(&mut self) {
        self.is_liked = !self.is_liked;
    }

    pub fn toggle_bookmark(&mut self) {
        self.is_bookmarked = !self.is_bookmarked;
    }

    /// Flips the like flag of one reply. Returns `false` if there is none.
    pub fn toggle_reply_like(&mut self, agent_id: AgentId) -> bool {
        match self.replies.iter_mut().find(|r| r.agent_id == agent_id) {
            Some(reply) => {
                reply.is_liked = !reply.is_liked;
                true
            }
            None => false,
        }
    }

    /// Flips the bookmark flag of one reply. Returns `false` if there is none.
    pub fn toggle_reply_bookmark(&mut self, agent_id: AgentId) -> bool {
        match self.replies.iter_mut().find(|r| r.agent_id == agent_id) {
            Some(reply) => {
                reply.is_bookmarked = !reply.is_bookmarked;
                true
            }
            None => false,
        }
    }

    /// Removes the reply of one agent. Returns `false` if there is none.
    pub fn remove_reply(&mut self, agent_id: AgentId) -> bool {
        let before = self.replies.len();
        self.replies.retain(|r| r.agent_id != agent_id);
        self.replies.len() != before
    }

    /// Merges generated replies.
    ///
    /// A result for an agent that already replied replaces that reply (flags
    /// reset); replies of agents absent from `results` are kept. A legacy
    /// entry that ends up with more than one reply switches to the multi
    /// layout.
    pub fn merge_replies<'a>(&mut self, results: impl IntoIterator<Item = &'a GeneratedReply>) {
        for result in results {
            let reply = Reply::new(result.agent_id, result.text.clone());
            match self.replies.iter_mut().find(|r| r.agent_id == result.agent_id) {
                Some(existing) => *existing = reply,
                None => self.replies.push(reply),
            }
        }
        if self.replies.len() > 1 {
            self.layout = ReplyLayout::Multi;
        }
    }

    /// True if the entry or any of its replies is bookmarked.
    pub fn has_bookmark(&self) -> bool {
        self.is_bookmarked || self.replies.iter().any(|r| r.is_bookmarked)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A post as submitted by the user, before it gets an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub content: String,
    pub image_url: Option<String>,
    pub mood: Option<Mood>,
}

impl NewEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Attaches an image as an inline `data:` URL.
    pub fn with_image_bytes(self, mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = BASE64_STANDARD.encode(bytes);
        self.with_image_url(format!("data:{mime_type};base64,{encoded}"))
    }

    /// Validates the draft and turns it into an entry with a fresh id,
    /// the current timestamp and the hashtags found in the content.
    ///
    /// Content may be blank only when an image is attached.
    pub fn into_entry(self) -> Result<Entry> {
        let has_image = self
            .image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.content.trim().is_empty() && !has_image {
            return Err(HaruError::validation(
                "entry content may be empty only when an image is attached",
            ));
        }

        let tags = extract_tags(&self.content);
        Ok(Entry::restore(
            uuid::Uuid::new_v4().to_string(),
            self.content,
            chrono::Utc::now().timestamp_millis(),
            self.mood,
            self.image_url,
            tags,
            false,
            false,
            Vec::new(),
            ReplyLayout::Multi,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_replies(replies: Vec<Reply>) -> Entry {
        Entry::restore(
            "e1".into(),
            "hello".into(),
            0,
            None,
            None,
            Vec::new(),
            false,
            false,
            replies,
            ReplyLayout::Multi,
        )
    }

    #[test]
    fn test_restore_drops_duplicate_agent_replies() {
        let entry = entry_with_replies(vec![
            Reply::new(AgentId(1), "first"),
            Reply::new(AgentId(1), "second"),
            Reply::new(AgentId(2), "other"),
        ]);
        assert_eq!(entry.replies().len(), 2);
        assert_eq!(entry.reply(AgentId(1)).unwrap().text, "first");
    }

    #[test]
    fn test_merge_keeps_unrelated_replies() {
        let mut entry = entry_with_replies(vec![Reply::new(AgentId(1), "old")]);
        entry.merge_replies(&[GeneratedReply::new(AgentId(2), "new")]);
        assert_eq!(entry.replies().len(), 2);
        assert_eq!(entry.reply(AgentId(1)).unwrap().text, "old");

        entry.merge_replies(&[GeneratedReply::new(AgentId(1), "fresh")]);
        assert_eq!(entry.replies().len(), 2);
        assert_eq!(entry.reply(AgentId(1)).unwrap().text, "fresh");
    }

    #[test]
    fn test_merge_switches_legacy_layout_when_growing() {
        let mut entry = Entry::restore(
            "e1".into(),
            "x".into(),
            0,
            None,
            None,
            Vec::new(),
            false,
            false,
            vec![Reply::new(AgentId(7), "hi")],
            ReplyLayout::LegacySingle,
        );
        entry.merge_replies(&[GeneratedReply::new(AgentId(7), "again")]);
        assert_eq!(entry.layout(), ReplyLayout::LegacySingle);

        entry.merge_replies(&[GeneratedReply::new(AgentId(8), "more")]);
        assert_eq!(entry.layout(), ReplyLayout::Multi);
    }

    #[test]
    fn test_reply_toggles_report_missing_reply() {
        let mut entry = entry_with_replies(vec![Reply::new(AgentId(1), "hi")]);
        assert!(entry.toggle_reply_like(AgentId(1)));
        assert!(entry.reply(AgentId(1)).unwrap().is_liked);
        assert!(!entry.toggle_reply_like(AgentId(9)));
        assert!(!entry.toggle_reply_bookmark(AgentId(9)));
        assert!(!entry.remove_reply(AgentId(9)));
    }

    #[test]
    fn test_has_bookmark_includes_replies() {
        let mut entry = entry_with_replies(vec![Reply::new(AgentId(1), "hi")]);
        assert!(!entry.has_bookmark());
        entry.toggle_reply_bookmark(AgentId(1));
        assert!(entry.has_bookmark());
    }

    #[test]
    fn test_new_entry_requires_content_or_image() {
        let err = NewEntry::new("   ").into_entry().unwrap_err();
        assert!(err.is_validation());

        let entry = NewEntry::new("")
            .with_image_bytes("image/png", &[0x89, 0x50])
            .into_entry()
            .unwrap();
        assert_eq!(entry.image_url.as_deref(), Some("data:image/png;base64,iVA="));
    }

    #[test]
    fn test_new_entry_extracts_tags() {
        let entry = NewEntry::new("Hello #world").with_mood(Mood::Happy).into_entry().unwrap();
        assert_eq!(entry.tags, vec!["#world".to_string()]);
        assert_eq!(entry.mood, Some(Mood::Happy));
        assert!(entry.replies().is_empty());
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_id_and_tags_survive_mutations() {
        let mut entry = NewEntry::new("day one #diary #rust").into_entry().unwrap();
        let id = entry.id().to_string();
        let tags = entry.tags().to_vec();

        entry.toggle_like();
        entry.toggle_bookmark();
        entry.merge_replies(&[GeneratedReply::new(AgentId(1), "nice")]);
        entry.toggle_reply_like(AgentId(1));
        entry.remove_reply(AgentId(1));

        assert_eq!(entry.id(), id);
        assert_eq!(entry.tags(), ["#diary".to_string(), "#rust".to_string()]);
        assert_eq!(entry.tags(), tags.as_slice());
    }
}
