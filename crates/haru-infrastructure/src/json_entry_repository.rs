//! JSON-document EntryRepository implementation

use crate::dto::{StoredEntries, decode_entries};
use crate::storage::{PersistedStore, keys};
use haru_core::Result;
use haru_core::entry::{Entry, EntryRepository};

/// Stores the whole entry collection as one document.
///
/// Responsibilities:
/// - Decode stored records (both reply shapes) into entries
/// - Write back only the records an operation changed; untouched and
///   unreadable records keep their stored form
/// - Run every mutation as one locked read-modify-write
///
/// Does NOT:
/// - Know where the document lives (delegated to PersistedStore)
pub struct JsonEntryRepository {
    store: PersistedStore,
}

impl JsonEntryRepository {
    pub fn new(store: PersistedStore) -> Self {
        Self { store }
    }
}

impl EntryRepository for JsonEntryRepository {
    fn get_all(&self) -> Vec<Entry> {
        decode_entries(self.store.read_value(keys::ENTRIES))
    }

    fn save_all(&self, entries: &[Entry]) -> Result<()> {
        self.store.modify_value(keys::ENTRIES, |current| {
            let document = StoredEntries::decode(current).encode(entries)?;
            Ok((document, ()))
        })
    }

    fn modify(&self, f: &mut dyn FnMut(&mut Vec<Entry>)) -> Result<Vec<Entry>> {
        self.store.modify_value(keys::ENTRIES, |current| {
            let stored = StoredEntries::decode(current);
            let mut entries = stored.entries();
            f(&mut entries);
            let document = stored.encode(&entries)?;
            Ok((document, entries))
        })
    }
}
