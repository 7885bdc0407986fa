//! Application facade.
//!
//! `HaruApp` wires the repositories, the agent registry, the profile service
//! and the reply orchestrator over one [`PersistedStore`], and exposes the
//! use cases the front ends call.

use crate::agent_registry::AgentRegistry;
use crate::profile_service::ProfileService;
use crate::reply_orchestrator::ReplyOrchestrator;
use haru_core::agent::{AgentId, RegistryPolicy};
use haru_core::config::HaruConfig;
use haru_core::entry::{
    DEFAULT_TRENDING_LIMIT, Entry, EntryRepository, NewEntry, TagCount, bookmarked,
    trending_tags, with_tag,
};
use haru_core::message::{Message, MessageRepository};
use haru_core::{HaruError, Result};
use haru_infrastructure::{
    ConfigService, GeminiCredentials, ImportSummary, JsonAgentSettingsRepository,
    JsonEntryRepository, JsonMessageRepository, JsonProfileRepository, PersistedStore, SyncCodec,
};
use haru_interaction::{GeminiApiTransport, RemoteEndpointTransport, TransportChain};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Result of publishing a post.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub entry_id: String,
    /// Agents asked to reply
    pub requested: usize,
    /// Replies that were generated
    pub replied: usize,
    /// The whole collection after the replies were merged
    pub entries: Vec<Entry>,
}

impl PostOutcome {
    /// The new entry; `None` if it was deleted while replies were pending.
    pub fn entry(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == self.entry_id)
    }
}

/// Result of one chat exchange.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user_message: Message,
    /// The agent's answer; `None` if every transport failed
    pub reply: Option<Message>,
}

/// Builds the transport chain from configuration.
///
/// The hosted endpoint comes first when a URL is configured; the Gemini API
/// follows when credentials exist.
pub fn build_transport_chain(
    config: &HaruConfig,
    gemini: Option<&GeminiCredentials>,
) -> TransportChain {
    let timeout = Duration::from_secs(config.generation.timeout_secs.max(1));
    let mut chain = TransportChain::default();

    match RemoteEndpointTransport::new(config.generation.endpoint_url.clone(), timeout) {
        Ok(remote) => chain = chain.with_link(Arc::new(remote)),
        Err(e) => tracing::info!(error = %e, "Remote endpoint disabled"),
    }

    match gemini {
        Some(creds) => match GeminiApiTransport::new(creds.api_key.clone(), creds.model.clone(), timeout) {
            Ok(gemini) => chain = chain.with_link(Arc::new(gemini)),
            Err(e) => tracing::warn!(error = %e, "Gemini transport unavailable"),
        },
        None => tracing::debug!("No Gemini API key; fallback transport disabled"),
    }

    chain
}

pub struct HaruApp {
    store: PersistedStore,
    entries: Arc<dyn EntryRepository>,
    messages: Arc<dyn MessageRepository>,
    registry: Arc<AgentRegistry>,
    profile: Arc<ProfileService>,
    orchestrator: Arc<ReplyOrchestrator>,
    sync: SyncCodec,
}

impl HaruApp {
    /// Wires the application over an existing store.
    pub fn new(store: PersistedStore, chain: TransportChain, policy: RegistryPolicy) -> Self {
        let registry = AgentRegistry::new(
            Arc::new(JsonAgentSettingsRepository::new(store.clone())),
            policy,
        );
        let profile = ProfileService::new(Arc::new(JsonProfileRepository::new(store.clone())));

        Self {
            entries: Arc::new(JsonEntryRepository::new(store.clone())),
            messages: Arc::new(JsonMessageRepository::new(store.clone())),
            registry: Arc::new(registry),
            profile: Arc::new(profile),
            orchestrator: Arc::new(ReplyOrchestrator::new(chain)),
            sync: SyncCodec::new(store.clone()),
            store,
        }
    }

    /// Opens the on-disk store described by the configuration.
    ///
    /// `data_dir` overrides `[storage] data_dir`.
    pub fn open(config_service: &ConfigService, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = config_service.get_config()?;
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config_service.data_dir()?,
        };
        let store = PersistedStore::open_dir(data_dir.clone())?;
        let credentials = config_service.gemini_credentials()?;
        let chain = build_transport_chain(&config, credentials.as_ref());

        tracing::debug!(
            data_dir = %data_dir.display(),
            transports = ?chain.link_names(),
            "Opened haru store"
        );
        Ok(Self::new(store, chain, config.registry.policy()))
    }

    pub fn store(&self) -> &PersistedStore {
        &self.store
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }

    pub fn orchestrator(&self) -> &ReplyOrchestrator {
        &self.orchestrator
    }

    // ---- Feed ----

    /// Saves a post, then asks every active agent for a reply and merges the
    /// replies that arrive.
    ///
    /// The post is committed before any request starts, so it survives even
    /// if every agent fails.
    pub async fn post(&self, draft: NewEntry) -> Result<PostOutcome> {
        let entry = draft.into_entry()?;
        let entry_id = entry.id().to_string();
        let content = entry.content.clone();
        self.entries.create(entry)?;

        let agents = self.registry.active_agents();
        tracing::info!(entry_id = %entry_id, agents = agents.len(), "Post created");

        let replies = self.orchestrator.feed_replies(&content, &agents).await;
        let entries = self.entries.attach_replies(&entry_id, &replies)?;

        Ok(PostOutcome {
            entry_id,
            requested: agents.len(),
            replied: replies.len(),
            entries,
        })
    }

    /// All entries, most recent first.
    pub fn feed(&self) -> Vec<Entry> {
        self.entries.get_all()
    }

    pub fn find_entry(&self, id: &str) -> Option<Entry> {
        self.entries.find(id)
    }

    pub fn delete_entry(&self, id: &str) -> Result<Vec<Entry>> {
        self.entries.delete(id)
    }

    pub fn toggle_like(&self, id: &str) -> Result<Vec<Entry>> {
        self.entries.toggle_like(id)
    }

    pub fn toggle_bookmark(&self, id: &str) -> Result<Vec<Entry>> {
        self.entries.toggle_bookmark(id)
    }

    pub fn toggle_reply_like(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.entries.toggle_reply_like(entry_id, agent_id)
    }

    pub fn toggle_reply_bookmark(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.entries.toggle_reply_bookmark(entry_id, agent_id)
    }

    pub fn delete_reply(&self, entry_id: &str, agent_id: AgentId) -> Result<Vec<Entry>> {
        self.entries.delete_reply(entry_id, agent_id)
    }

    /// Entries bookmarked themselves or through one of their replies.
    pub fn bookmarked(&self) -> Vec<Entry> {
        bookmarked(&self.entries.get_all())
    }

    pub fn with_tag(&self, tag: &str) -> Vec<Entry> {
        with_tag(&self.entries.get_all(), tag)
    }

    pub fn trending_tags(&self, limit: Option<usize>) -> Vec<TagCount> {
        trending_tags(&self.entries.get_all(), limit.unwrap_or(DEFAULT_TRENDING_LIMIT))
    }

    // ---- Chat ----

    /// Sends a message to one agent and waits for its answer.
    ///
    /// The user's message is saved first. The agent's answer is saved only
    /// if some transport produced one.
    pub async fn chat(&self, agent_id: AgentId, text: &str) -> Result<ChatExchange> {
        let agent = self
            .registry
            .find(agent_id)
            .ok_or_else(|| HaruError::not_found("agent", agent_id.to_string()))?;
        if text.trim().is_empty() {
            return Err(HaruError::validation("chat message may not be empty"));
        }

        let user_message = Message::from_user(agent_id, text.trim());
        self.messages.append(user_message.clone())?;

        let history = self.messages.thread(agent_id);
        let reply = match self.orchestrator.chat_reply(&agent, &history).await {
            Ok(answer) => {
                let message = Message::from_agent(agent_id, answer);
                self.messages.append(message.clone())?;
                Some(message)
            }
            Err(e) => {
                tracing::warn!(agent_id = %agent_id, error = %e, "Chat reply failed");
                None
            }
        };

        Ok(ChatExchange {
            user_message,
            reply,
        })
    }

    /// One agent's conversation, oldest first.
    pub fn messages_for(&self, agent_id: AgentId) -> Vec<Message> {
        self.messages.thread(agent_id)
    }

    pub fn delete_message(&self, id: &str) -> Result<Vec<Message>> {
        self.messages.delete(id)
    }

    // ---- Sync ----

    pub fn export(&self) -> Result<String> {
        self.sync.export()
    }

    /// Replaces the stored collections with those in `blob`.
    ///
    /// Returns `false` and changes nothing if the blob is malformed.
    pub fn import(&self, blob: &str) -> bool {
        self.sync.import(blob)
    }

    pub fn try_import(&self, blob: &str) -> Result<ImportSummary> {
        self.sync.try_import(blob)
    }
}
