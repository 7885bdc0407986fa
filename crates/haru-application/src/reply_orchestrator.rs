//! Reply orchestration.
//!
//! Turns one post into one request per active agent, runs them all at once
//! through the transport chain, and collects whatever succeeded.

use futures::future::join_all;
use haru_core::agent::Agent;
use haru_core::entry::GeneratedReply;
use haru_core::generation::GenerationError;
use haru_core::message::Message;
use haru_interaction::TransportChain;
use haru_interaction::prompt::{chat_prompt, feed_prompt};
use haru_interaction::response::{parse_chat_text, parse_feed_reply};
use tracing::Instrument;

pub struct ReplyOrchestrator {
    chain: TransportChain,
}

impl ReplyOrchestrator {
    pub fn new(chain: TransportChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &TransportChain {
        &self.chain
    }

    /// Generates one reply per agent for a post.
    ///
    /// Requests run concurrently. An agent whose chain is exhausted is left
    /// out of the result; it never affects the others.
    pub async fn feed_replies(&self, content: &str, agents: &[Agent]) -> Vec<GeneratedReply> {
        let requests = agents.iter().map(|agent| {
            let prompt = feed_prompt(&agent.persona, content);
            let agent_id = agent.id;
            let span = tracing::info_span!("feed_reply", agent_id = %agent_id);
            async move {
                match self.chain.run(&prompt, parse_feed_reply).await {
                    Ok(text) => Some(GeneratedReply::new(agent_id, text)),
                    Err(e) => {
                        tracing::warn!(error = %e, "No reply from agent");
                        None
                    }
                }
            }
            .instrument(span)
        });

        join_all(requests).await.into_iter().flatten().collect()
    }

    /// Generates the agent's next chat turn from its whole thread.
    ///
    /// `history` must already contain the user's latest message.
    pub async fn chat_reply(&self, agent: &Agent, history: &[Message]) -> Result<String, GenerationError> {
        let prompt = chat_prompt(&agent.persona, history);
        let span = tracing::info_span!("chat_reply", agent_id = %agent.id);
        self.chain
            .run(&prompt, parse_chat_text)
            .instrument(span)
            .await
    }
}
