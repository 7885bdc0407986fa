//! Per-agent chat threads.

pub mod model;
pub mod repository;

pub use model::{Message, Sender, thread_of};
pub use repository::MessageRepository;
