//! Entry DTOs.
//!
//! Two reply shapes exist on disk:
//!
//! ```text
//! current: { ..., "aiResponses": [{ "aiId": 1, "reply": "..", "isLiked": false, "isBookmarked": false }] }
//! legacy:  { ..., "aiResponse": "..", "aiId": 7, "aiIsLiked": true, "aiIsBookmarked": false }
//! ```
//!
//! Both decode into the canonical `Entry::replies()`; the entry remembers
//! which shape it came from so it is written back the same way.
//!
//! Writes go through [`StoredEntries`]: a record is re-encoded only when an
//! operation changed its entry, and then only its mutable fields are
//! replaced. Everything else goes back as it was read.

use super::ids;
use haru_core::agent::AgentId;
use haru_core::entry::{Entry, Mood, Reply, ReplyLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet, VecDeque};

/// Stored fields an entry operation may change. The rest are fixed when the
/// entry is created.
const MUTABLE_FIELDS: [&str; 7] = [
    "isLiked",
    "isBookmarked",
    "aiResponses",
    "aiResponse",
    "aiId",
    "aiIsLiked",
    "aiIsBookmarked",
];

fn is_false(value: &bool) -> bool {
    !*value
}

/// One reply in the current multi-reply shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRecord {
    #[serde(deserialize_with = "ids::agent_id")]
    pub ai_id: AgentId,
    #[serde(alias = "text")]
    pub reply: String,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
}

impl From<&Reply> for ReplyRecord {
    fn from(reply: &Reply) -> Self {
        Self {
            ai_id: reply.agent_id,
            reply: reply.text.clone(),
            is_liked: reply.is_liked,
            is_bookmarked: reply.is_bookmarked,
        }
    }
}

impl From<ReplyRecord> for Reply {
    fn from(record: ReplyRecord) -> Self {
        Reply {
            agent_id: record.ai_id,
            text: record.reply,
            is_liked: record.is_liked,
            is_bookmarked: record.is_bookmarked,
        }
    }
}

/// Stored form of one entry, covering both reply shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, deserialize_with = "ids::lenient", skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "aiAnalysisTags", deserialize_with = "ids::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_bookmarked: bool,

    // Current shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_responses: Option<Vec<ReplyRecord>>,

    // Legacy single-reply shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(
        default,
        deserialize_with = "ids::optional_agent_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_id: Option<AgentId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ai_is_liked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ai_is_bookmarked: bool,
}

impl EntryRecord {
    /// Decodes the reply list and the shape it came from.
    ///
    /// `aiResponses` wins when both shapes are present. A legacy reply exists
    /// only if `aiResponse` is non-empty; a missing `aiId` belongs to the
    /// primary agent.
    fn replies(&self) -> (Vec<Reply>, ReplyLayout) {
        if let Some(responses) = &self.ai_responses {
            let replies = responses.iter().cloned().map(Reply::from).collect();
            return (replies, ReplyLayout::Multi);
        }

        match self.ai_response.as_deref() {
            Some(text) if !text.is_empty() => {
                let reply = Reply {
                    agent_id: self.ai_id.unwrap_or(AgentId::PRIMARY),
                    text: text.to_string(),
                    is_liked: self.ai_is_liked,
                    is_bookmarked: self.ai_is_bookmarked,
                };
                (vec![reply], ReplyLayout::LegacySingle)
            }
            _ if self.ai_id.is_some() => (Vec::new(), ReplyLayout::LegacySingle),
            _ => (Vec::new(), ReplyLayout::Multi),
        }
    }
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        let (replies, layout) = record.replies();
        Entry::restore(
            record.id,
            record.content,
            record.created_at,
            record.mood,
            record.image_url,
            record.tags,
            record.is_liked,
            record.is_bookmarked,
            replies,
            layout,
        )
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        let mut record = EntryRecord {
            id: entry.id().to_string(),
            content: entry.content.clone(),
            created_at: entry.created_at,
            mood: entry.mood,
            image_url: entry.image_url.clone(),
            tags: entry.tags().to_vec(),
            is_liked: entry.is_liked,
            is_bookmarked: entry.is_bookmarked,
            ai_responses: None,
            ai_response: None,
            ai_id: None,
            ai_is_liked: false,
            ai_is_bookmarked: false,
        };

        match (entry.layout(), entry.replies()) {
            (ReplyLayout::LegacySingle, []) => {}
            (ReplyLayout::LegacySingle, [reply]) => {
                record.ai_response = Some(reply.text.clone());
                record.ai_id = Some(reply.agent_id);
                record.ai_is_liked = reply.is_liked;
                record.ai_is_bookmarked = reply.is_bookmarked;
            }
            (_, replies) => {
                record.ai_responses = Some(replies.iter().map(ReplyRecord::from).collect());
            }
        }

        record
    }
}

/// One stored record and the entry decoded from it, if it decoded.
#[derive(Debug, Clone)]
struct StoredRecord {
    raw: JsonValue,
    entry: Option<Entry>,
}

/// A decoded entry collection that keeps the records it was read from.
#[derive(Debug, Clone, Default)]
pub struct StoredEntries {
    records: Vec<StoredRecord>,
}

impl StoredEntries {
    /// Anything but an array reads as empty. Elements that do not decode
    /// are hidden from [`entries`](Self::entries) but kept for writing.
    pub fn decode(value: Option<JsonValue>) -> Self {
        let items = match value {
            Some(JsonValue::Array(items)) => items,
            Some(_) => {
                tracing::warn!("Entries document is not an array; reading as empty");
                Vec::new()
            }
            None => Vec::new(),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let entry = match serde_json::from_value::<EntryRecord>(raw.clone()) {
                    Ok(record) => Some(Entry::from(record)),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "Unreadable entry record kept as stored");
                        None
                    }
                };
                StoredRecord { raw, entry }
            })
            .collect();

        Self { records }
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.records.iter().filter_map(|r| r.entry.clone()).collect()
    }

    /// Builds the document for `updated`, the collection after an operation.
    ///
    /// - Entries equal to what was read are written as their original record.
    /// - Changed entries keep their original record with the mutable fields
    ///   replaced.
    /// - New entries are encoded in full.
    /// - Unreadable records stay behind the closest readable record that
    ///   preceded them and still exists, or lead the document.
    pub fn encode(&self, updated: &[Entry]) -> serde_json::Result<JsonValue> {
        let surviving: HashSet<&str> = updated.iter().map(Entry::id).collect();
        let mut originals: HashMap<&str, VecDeque<&StoredRecord>> = HashMap::new();
        let mut leading: Vec<&JsonValue> = Vec::new();
        let mut following: HashMap<&str, Vec<&JsonValue>> = HashMap::new();
        let mut anchor: Option<&str> = None;

        for record in &self.records {
            match &record.entry {
                Some(entry) => {
                    originals.entry(entry.id()).or_default().push_back(record);
                    if surviving.contains(entry.id()) {
                        anchor = Some(entry.id());
                    }
                }
                None => match anchor {
                    Some(id) => following.entry(id).or_default().push(&record.raw),
                    None => leading.push(&record.raw),
                },
            }
        }

        let mut document: Vec<JsonValue> = leading.into_iter().cloned().collect();
        for entry in updated {
            let original = originals.get_mut(entry.id()).and_then(VecDeque::pop_front);
            let value = match original {
                Some(StoredRecord {
                    raw,
                    entry: Some(read),
                }) if read == entry => raw.clone(),
                Some(stored) => patch_record(&stored.raw, entry)?,
                None => serde_json::to_value(EntryRecord::from(entry))?,
            };
            document.push(value);
            if let Some(kept) = following.remove(entry.id()) {
                document.extend(kept.into_iter().cloned());
            }
        }

        Ok(JsonValue::Array(document))
    }
}

/// Replaces the mutable fields of a stored record with those of `entry`.
fn patch_record(raw: &JsonValue, entry: &Entry) -> serde_json::Result<JsonValue> {
    let encoded = serde_json::to_value(EntryRecord::from(entry))?;
    match (raw, encoded) {
        (JsonValue::Object(stored), JsonValue::Object(mut fresh)) => {
            let mut record = stored.clone();
            for field in MUTABLE_FIELDS {
                match fresh.remove(field) {
                    Some(value) => {
                        record.insert(field.to_string(), value);
                    }
                    None => {
                        record.remove(field);
                    }
                }
            }
            Ok(JsonValue::Object(record))
        }
        (_, encoded) => Ok(encoded),
    }
}

/// Decodes a stored entry collection.
///
/// Anything but an array reads as empty. Elements that do not decode are
/// skipped so one damaged record does not hide the rest.
pub fn decode_entries(value: Option<JsonValue>) -> Vec<Entry> {
    StoredEntries::decode(value).entries()
}

/// Encodes entries in full, preserving each entry's reply shape.
pub fn encode_entries(entries: &[Entry]) -> Vec<EntryRecord> {
    entries.iter().map(EntryRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use haru_core::entry::NewEntry;
    use serde_json::json;

    #[test]
    fn test_legacy_single_reply_normalized() {
        let value = json!([{
            "id": "1",
            "content": "x",
            "aiResponse": "hi",
            "aiId": 7,
            "aiIsLiked": true
        }]);

        let entries = decode_entries(Some(value));

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].replies(),
            &[Reply {
                agent_id: AgentId(7),
                text: "hi".into(),
                is_liked: true,
                is_bookmarked: false,
            }]
        );
        assert_eq!(entries[0].layout(), ReplyLayout::LegacySingle);
    }

    #[test]
    fn test_legacy_entry_written_back_in_legacy_shape() {
        let original = json!({
            "id": "1",
            "content": "x",
            "createdAt": 5,
            "tags": [],
            "isLiked": false,
            "isBookmarked": false,
            "aiResponse": "hi",
            "aiId": 7,
            "aiIsLiked": true
        });
        let record: EntryRecord = serde_json::from_value(original.clone()).unwrap();
        let entry = Entry::from(record);

        let written = serde_json::to_value(EntryRecord::from(&entry)).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_current_shape_round_trip() {
        let value = json!({
            "id": "2",
            "content": "Hello #world",
            "createdAt": 1700000000000i64,
            "tags": ["#world"],
            "isLiked": true,
            "isBookmarked": false,
            "aiResponses": [
                { "aiId": 1, "reply": "hi", "isLiked": false, "isBookmarked": true },
                { "aiId": 2, "reply": "yo", "isLiked": false, "isBookmarked": false }
            ]
        });
        let entry = Entry::from(serde_json::from_value::<EntryRecord>(value.clone()).unwrap());
        assert_eq!(entry.replies().len(), 2);
        assert!(entry.reply(AgentId(1)).unwrap().is_bookmarked);

        assert_eq!(serde_json::to_value(EntryRecord::from(&entry)).unwrap(), value);
    }

    #[test]
    fn test_legacy_reply_deleted_clears_legacy_fields() {
        let value = json!({ "id": "1", "content": "x", "aiResponse": "hi", "aiId": 7 });
        let mut entry = Entry::from(serde_json::from_value::<EntryRecord>(value).unwrap());
        assert!(entry.remove_reply(AgentId(7)));

        let record = EntryRecord::from(&entry);
        assert_eq!(record.ai_response, None);
        assert_eq!(record.ai_id, None);
        assert_eq!(record.ai_responses, None);
        assert_eq!(record.content, "x");
    }

    #[test]
    fn test_lenient_fields() {
        let value = json!([
            { "id": 1700000000000u64, "content": "old", "aiAnalysisTags": ["#a"], "mood": "Happy" },
            { "id": "b", "content": "odd mood", "mood": "Confused" },
            { "content": "no id" },
            { "id": "c", "aiResponses": [{ "aiId": "3", "text": "string id" }] }
        ]);

        let entries = decode_entries(Some(value));

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id(), "1700000000000");
        assert_eq!(entries[0].tags(), ["#a".to_string()]);
        assert_eq!(entries[0].mood, Some(Mood::Happy));
        assert_eq!(entries[1].mood, None);
        assert_eq!(entries[2].reply(AgentId(3)).unwrap().text, "string id");
    }

    #[test]
    fn test_null_tags_read_as_empty() {
        let entries = decode_entries(Some(json!([{ "id": "odd", "aiAnalysisTags": null }])));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].tags().is_empty());
    }

    #[test]
    fn test_encode_rewrites_only_changed_records() {
        let stored = json!([
            { "id": "good", "content": "a" },
            { "content": "no id, unreadable" },
            { "id": "odd", "aiAnalysisTags": null, "extra": 1 },
            { "id": 1700000000000u64, "aiAnalysisTags": ["#x"], "mood": "Confused" }
        ]);
        let decoded = StoredEntries::decode(Some(stored.clone()));
        let mut entries = decoded.entries();
        assert_eq!(entries.len(), 3);
        entries[0].toggle_like();

        let written = decoded.encode(&entries).unwrap();

        let expected = json!([
            { "id": "good", "content": "a", "isLiked": true, "isBookmarked": false, "aiResponses": [] },
            { "content": "no id, unreadable" },
            { "id": "odd", "aiAnalysisTags": null, "extra": 1 },
            { "id": 1700000000000u64, "aiAnalysisTags": ["#x"], "mood": "Confused" }
        ]);
        assert_eq!(written, expected);
    }

    #[test]
    fn test_encode_keeps_unreadable_records_across_delete_and_create() {
        let stored = json!([
            { "id": "a" },
            { "broken": true },
            { "id": "b" }
        ]);
        let decoded = StoredEntries::decode(Some(stored));
        let mut entries = decoded.entries();
        entries.retain(|e| e.id() != "a");
        entries.insert(0, NewEntry::new("fresh").into_entry().unwrap());

        let written = decoded.encode(&entries).unwrap();
        let items = written.as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0], json!({ "broken": true }));
        assert_eq!(items[1]["content"], "fresh");
        assert_eq!(items[2], json!({ "id": "b" }));
    }

    #[test]
    fn test_patched_legacy_record_drops_cleared_fields() {
        let stored = json!([{ "id": "1", "content": "x", "aiResponse": "hi", "aiId": 7, "note": "kept" }]);
        let decoded = StoredEntries::decode(Some(stored));
        let mut entries = decoded.entries();
        entries[0].remove_reply(AgentId(7));

        let written = decoded.encode(&entries).unwrap();

        assert_eq!(
            written,
            json!([{ "id": "1", "content": "x", "note": "kept", "isLiked": false, "isBookmarked": false }])
        );
    }

    #[test]
    fn test_non_array_reads_empty() {
        assert!(decode_entries(Some(json!({ "not": "a list" }))).is_empty());
        assert!(decode_entries(None).is_empty());
    }

    #[test]
    fn test_missing_legacy_agent_defaults_to_primary() {
        let value = json!([{ "id": "1", "content": "x", "aiResponse": "hi" }]);
        let entries = decode_entries(Some(value));
        assert_eq!(entries[0].replies()[0].agent_id, AgentId::PRIMARY);
    }
}
