//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs are the on-disk JSON shapes. They are decoded into domain
//! models immediately on read and encoded from them on write; nothing outside
//! this module sees a wire shape.
//!
//! ## Schema versions
//!
//! A document's schema version is carried by its storage key (see
//! [`crate::storage::keys`]). Within the current key, the following older
//! shapes are still accepted on read:
//!
//! - **Entries**: the single-reply fields `aiResponse` / `aiId` /
//!   `aiIsLiked` / `aiIsBookmarked` (decoded into a one-element reply list;
//!   the entry is written back in the same shape), and `aiAnalysisTags` as
//!   the tag list.
//! - **Agent settings**: a single `activeAiId` instead of `activeAiIds`,
//!   and documents without an `ais` array (read as the defaults).
//! - **Ids**: numeric ids where strings are expected and vice versa.

mod agent_settings;
mod entry;
mod ids;
mod message;
mod profile;

pub use agent_settings::{AgentRecord, AgentSettingsRecord};
pub use entry::{EntryRecord, ReplyRecord, StoredEntries, decode_entries, encode_entries};
pub use message::{MessageRecord, SenderRecord, decode_messages, encode_messages};
pub use profile::ProfileRecord;
