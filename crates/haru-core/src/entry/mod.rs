//! Entry (diary post) domain.

pub mod model;
pub mod repository;
pub mod tags;
pub mod views;

pub use model::{Entry, GeneratedReply, Mood, NewEntry, Reply, ReplyLayout};
pub use repository::EntryRepository;
pub use tags::extract_tags;
pub use views::{DEFAULT_TRENDING_LIMIT, TagCount, bookmarked, trending_tags, with_tag};
