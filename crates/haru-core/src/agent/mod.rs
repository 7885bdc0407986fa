//! Agent (AI persona) domain.

pub mod model;
pub mod repository;
pub mod settings;

pub use model::{Agent, AgentDisplay, AgentId};
pub use repository::AgentSettingsRepository;
pub use settings::{AgentSettings, DEFAULT_MAX_AGENTS, RegistryPolicy, RegistryRejection, UpsertKind};
