//! Entry repository trait.
//!
//! Defines the interface for entry persistence and the whole-collection
//! mutation operations built on top of it.

use super::model::{Entry, GeneratedReply};
use crate::agent::AgentId;
use crate::error::Result;

/// An abstract repository for the entry collection.
///
/// The collection is stored as one unit, most recent entry first. Every
/// mutation is a read-modify-write of the whole collection and returns the
/// full updated list so callers can refresh derived views without a second
/// read.
///
/// # Implementation Notes
///
/// Implementations provide [`get_all`](Self::get_all) and
/// [`save_all`](Self::save_all); they may override
/// [`modify`](Self::modify) to hold a lock across the read and the write.
/// Mutations that target an unknown entry or reply are no-ops, not errors.
pub trait EntryRepository: Send + Sync {
    /// Retrieves all entries, most recent first.
    ///
    /// Never fails: missing or corrupt data reads as an empty collection.
    fn get_all(&self) -> Vec<Entry>;

    /// Replaces the whole collection.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Collection committed
    /// - `Err(HaruError)`: The write failed (e.g. storage full)
    fn save_all(&self, entries: &[Entry]) -> Result<()>;

    /// Applies `f` to the collection and commits the result.
    fn modify(&self, f: &mut dyn FnMut(&mut Vec<Entry>)) -> Result<Vec<Entry>> {
        let mut entries = self.get_all();
        f(&mut entries);
        self.save_all(&entries)?;
        Ok(entries)
    }

    /// Looks up a single entry.
    fn find(&self, id: &str) -> Option<Entry> {
        self.get_all().into_iter().find(|e| e.id() == id)
    }

    /// Prepends a new entry.
    fn create(&self, entry: Entry) -> Result<Vec<Entry>> {
        let mut pending = Some(entry);
        self.modify(&mut |entries| {
            if let Some(entry) = pending.take() {
                entries.insert(0, entry);
            }
        })
    }

    /// Removes an entry.
    fn delete(&self, id: &str) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| entries.retain(|e| e.id() != id))
    }

    /// Flips the entry's like flag.
    fn toggle_like(&self, id: &str) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.id() == id) {
                entry.toggle_like();
            }
        })
    }

    /// Flips the entry's bookmark flag.
    fn toggle_bookmark(&self, id: &str) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.id() == id) {
                entry.toggle_bookmark();
            }
        })
    }

    /// Flips the like flag of one agent's reply.
    fn toggle_reply_like(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.id() == entry_id) {
                entry.toggle_reply_like(agent_id);
            }
        })
    }

    /// Flips the bookmark flag of one agent's reply.
    fn toggle_reply_bookmark(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.id() == entry_id) {
                entry.toggle_reply_bookmark(agent_id);
            }
        })
    }

    /// Removes exactly one agent's reply. The entry itself is kept.
    fn delete_reply(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| {
            if let Some(entry) = entries.iter_mut().find(|e| e.id() == entry_id) {
                entry.remove_reply(agent_id);
            }
        })
    }

    /// Merges generated replies into an entry.
    ///
    /// If the entry was deleted while generation was in flight this is a
    /// no-op and the results are discarded.
    fn attach_replies(&self, entry_id: &str, results: &[GeneratedReply]) -> Result<Vec<Entry>> {
        self.modify(&mut |entries| match entries.iter_mut().find(|e| e.id() == entry_id) {
            Some(entry) => entry.merge_replies(results),
            None => tracing::debug!(entry_id, "attach_replies target no longer exists"),
        })
    }
}
