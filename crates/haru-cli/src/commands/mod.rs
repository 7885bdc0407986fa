pub mod agents;
pub mod chat;
pub mod feed;
pub mod profile;
pub mod render;
pub mod sync;
