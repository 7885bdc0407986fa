//! Derived views over the entry collection.
//!
//! All views take the canonical most-recent-first list and preserve its
//! order.

use super::model::Entry;

/// A hashtag and the number of entries carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Number of tags shown in the trending list.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Entries that are bookmarked themselves or have a bookmarked reply.
pub fn bookmarked(entries: &[Entry]) -> Vec<Entry> {
    entries.iter().filter(|e| e.has_bookmark()).cloned().collect()
}

/// Entries carrying the given tag.
pub fn with_tag(entries: &[Entry], tag: &str) -> Vec<Entry> {
    entries.iter().filter(|e| e.has_tag(tag)).cloned().collect()
}

/// Most used tags, highest count first.
///
/// Ties keep the order in which the tags are first met while walking the
/// collection.
pub fn trending_tags(entries: &[Entry], limit: usize) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in entries.iter().flat_map(|e| e.tags().iter()) {
        match counts.iter_mut().find(|c| &c.tag == tag) {
            Some(existing) => existing.count += 1,
            None => counts.push(TagCount {
                tag: tag.clone(),
                count: 1,
            }),
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
