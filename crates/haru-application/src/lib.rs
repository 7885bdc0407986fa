//! Application layer for haru.
//!
//! This crate provides the services that coordinate the domain, storage and
//! transport layers: the agent registry, the profile service, the reply
//! orchestrator and the [`HaruApp`] facade over all of them.

pub mod agent_registry;
pub mod haru_app;
pub mod profile_service;
pub mod reply_orchestrator;

pub use agent_registry::{AgentDraft, AgentRegistry, RegistryOutcome};
pub use haru_app::{ChatExchange, HaruApp, PostOutcome, build_transport_chain};
pub use profile_service::ProfileService;
pub use reply_orchestrator::ReplyOrchestrator;
