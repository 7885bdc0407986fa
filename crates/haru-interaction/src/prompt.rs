//! Prompt construction for feed replies and chat turns.

use haru_core::message::{Message, Sender};

/// Persona used when an agent has none configured.
pub const FALLBACK_PERSONA: &str = "You are a helpful AI.";

fn persona_or_fallback(persona: &str) -> &str {
    if persona.trim().is_empty() {
        FALLBACK_PERSONA
    } else {
        persona
    }
}

/// Builds the prompt asking an agent to reply to a diary post.
///
/// The model is asked for a `{"reply": "..."}` object; see
/// [`parse_feed_reply`](crate::response::parse_feed_reply).
pub fn feed_prompt(persona: &str, content: &str) -> String {
    format!(
        "{persona}\n\n\
         User's Diary Entry:\n\
         \"{content}\"\n\n\
         Task:\n\
         1. Write a reply (mention) to this entry based on your persona.\n\n\
         Response Format:\n\
         Return ONLY a valid JSON object with the following structure:\n\
         {{\n  \"reply\": \"Your reply here\"\n}}\n\
         Do not include markdown formatting.\n",
        persona = persona_or_fallback(persona),
        content = content,
    )
}

/// Builds a chat prompt from the agent's whole thread, oldest first.
///
/// ```text
/// {persona}
///
/// User: ...
/// Model: ...
/// Model:
/// ```
pub fn chat_prompt(persona: &str, history: &[Message]) -> String {
    let mut prompt = format!("{}\n\n", persona_or_fallback(persona));
    for message in history {
        let role = match message.sender {
            Sender::User => "User",
            Sender::Agent => "Model",
        };
        prompt.push_str(role);
        prompt.push_str(": ");
        prompt.push_str(&message.text);
        prompt.push('\n');
    }
    prompt.push_str("Model: ");
    prompt
}
