//! Post and chat flows through the whole stack with scripted transports.

use async_trait::async_trait;
use haru_application::HaruApp;
use haru_core::agent::{Agent, AgentId, RegistryPolicy};
use haru_core::entry::{EntryRepository, NewEntry, Reply};
use haru_core::generation::{GenerationError, TextGenerator};
use haru_infrastructure::{JsonEntryRepository, PersistedStore};
use haru_interaction::TransportChain;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const PERSONA_A: &str = "Persona A";
const PERSONA_B: &str = "Persona B";

/// Primary link: fails for agent A, answers plain text for agent B.
struct Primary;

#[async_trait]
impl TextGenerator for Primary {
    fn name(&self) -> &str {
        "primary"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.starts_with(PERSONA_A) {
            Err(GenerationError::Status {
                status_code: 500,
                message: "boom".into(),
            })
        } else {
            Ok("yo".into())
        }
    }
}

/// Fallback link: always answers with a reply object.
struct Fallback {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for Fallback {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(r#"{"reply":"hi"}"#.into())
    }
}

struct AlwaysFails;

#[async_trait]
impl TextGenerator for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Request("offline".into()))
    }
}

/// Deletes every entry while "generating", as a user would mid-request.
struct DeletesEntries {
    store: PersistedStore,
}

#[async_trait]
impl TextGenerator for DeletesEntries {
    fn name(&self) -> &str {
        "deletes-entries"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        JsonEntryRepository::new(self.store.clone())
            .modify(&mut |entries| entries.clear())
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        Ok("too late".into())
    }
}

fn app_with_two_agents(chain: TransportChain) -> HaruApp {
    let app = HaruApp::new(PersistedStore::in_memory(), chain, RegistryPolicy::default());
    let registry = app.registry();
    assert!(
        registry
            .upsert(Agent::new(AgentId(1), "A", "@a", PERSONA_A))
            .unwrap()
            .is_applied()
    );
    assert!(
        registry
            .upsert(Agent::new(AgentId(2), "B", "@b", PERSONA_B))
            .unwrap()
            .is_applied()
    );
    assert!(registry.set_active(AgentId(2), true).unwrap().is_applied());
    app
}

#[tokio::test]
async fn hello_world_post_collects_both_replies() {
    let fallback = Arc::new(Fallback {
        calls: AtomicUsize::new(0),
    });
    let chain = TransportChain::default()
        .with_link(Arc::new(Primary))
        .with_link(fallback.clone());
    let app = app_with_two_agents(chain);

    let outcome = app.post(NewEntry::new("Hello #world")).await.unwrap();

    let entry = outcome.entry().unwrap();
    assert_eq!(entry.tags(), ["#world".to_string()]);
    assert_eq!(
        entry.replies(),
        &[Reply::new(AgentId(1), "hi"), Reply::new(AgentId(2), "yo")]
    );
    assert_eq!((outcome.requested, outcome.replied), (2, 2));
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);

    // persisted, not just returned
    assert_eq!(app.find_entry(&outcome.entry_id).unwrap().replies().len(), 2);
}

#[tokio::test]
async fn post_survives_when_every_agent_fails() {
    let app = app_with_two_agents(TransportChain::default().with_link(Arc::new(AlwaysFails)));

    let outcome = app.post(NewEntry::new("quiet day")).await.unwrap();

    assert_eq!(outcome.replied, 0);
    let stored = app.find_entry(&outcome.entry_id).unwrap();
    assert!(stored.replies().is_empty());
    assert_eq!(stored.content, "quiet day");
}

#[tokio::test]
async fn reply_for_deleted_entry_is_discarded() {
    let store = PersistedStore::in_memory();
    let chain = TransportChain::default().with_link(Arc::new(DeletesEntries {
        store: store.clone(),
    }));
    let app = HaruApp::new(store, chain, RegistryPolicy::default());

    let outcome = app.post(NewEntry::new("gone soon")).await.unwrap();

    assert_eq!(outcome.replied, 1);
    assert!(outcome.entry().is_none());
    assert!(app.feed().is_empty());
}

#[tokio::test]
async fn blank_post_without_image_is_rejected() {
    let app = HaruApp::new(
        PersistedStore::in_memory(),
        TransportChain::default(),
        RegistryPolicy::default(),
    );

    let err = app.post(NewEntry::new("   ")).await.unwrap_err();
    assert!(err.is_validation());
    assert!(app.feed().is_empty());

    let outcome = app
        .post(NewEntry::new("").with_image_bytes("image/png", &[0x89, 0x50]))
        .await
        .unwrap();
    let entry = outcome.entry().unwrap();
    assert!(entry.image_url.as_deref().unwrap().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn chat_keeps_threads_per_agent() {
    let app = app_with_two_agents(TransportChain::default().with_link(Arc::new(Primary)));

    let exchange = app.chat(AgentId(2), "hey B").await.unwrap();
    assert_eq!(exchange.reply.map(|m| m.text), Some("yo".to_string()));

    // agent A's only link fails: the user turn is kept, no agent turn
    let exchange = app.chat(AgentId(1), "hey A").await.unwrap();
    assert!(exchange.reply.is_none());

    let thread_b: Vec<String> = app.messages_for(AgentId(2)).into_iter().map(|m| m.text).collect();
    assert_eq!(thread_b, vec!["hey B".to_string(), "yo".to_string()]);
    assert_eq!(app.messages_for(AgentId(1)).len(), 1);

    let user_turn = exchange.user_message.id;
    assert!(app.delete_message(&user_turn).unwrap().iter().all(|m| m.id != user_turn));
    assert!(app.messages_for(AgentId(1)).is_empty());
}

#[tokio::test]
async fn chat_with_unknown_agent_is_not_found() {
    let app = HaruApp::new(
        PersistedStore::in_memory(),
        TransportChain::default(),
        RegistryPolicy::default(),
    );
    let err = app.chat(AgentId(42), "hello?").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn export_import_round_trip_between_apps() {
    let fallback = Arc::new(Fallback {
        calls: AtomicUsize::new(0),
    });
    let source = app_with_two_agents(TransportChain::default().with_link(fallback));
    let outcome = source.post(NewEntry::new("sync #me")).await.unwrap();
    source.toggle_bookmark(&outcome.entry_id).unwrap();

    let target = HaruApp::new(
        PersistedStore::in_memory(),
        TransportChain::default(),
        RegistryPolicy::default(),
    );
    assert!(target.import(&source.export().unwrap()));

    assert_eq!(target.feed(), source.feed());
    assert_eq!(target.registry().settings(), source.registry().settings());
    assert_eq!(target.bookmarked().len(), 1);
    assert_eq!(target.trending_tags(None)[0].tag, "#me");

    assert!(!target.import("not json"));
    assert_eq!(target.feed(), source.feed());
}
