//! Terminal formatting shared by the commands.

use chrono::{Local, TimeZone};
use colored::Colorize;
use haru_application::AgentRegistry;
use haru_core::entry::{Entry, Mood};

/// Formats epoch milliseconds in local time.
pub fn timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "happy",
        Mood::Neutral => "neutral",
        Mood::Sad => "sad",
        Mood::Angry => "angry",
        Mood::Excited => "excited",
    }
}

fn flags(liked: bool, bookmarked: bool) -> String {
    let mut out = String::new();
    if liked {
        out.push_str(" ♥");
    }
    if bookmarked {
        out.push_str(" ★");
    }
    out
}

/// Prints one entry with its replies.
pub fn entry(entry: &Entry, registry: &AgentRegistry) {
    let mut header = format!("{}  {}", timestamp(entry.created_at), entry.id());
    if let Some(mood) = entry.mood {
        header.push_str(&format!("  [{}]", mood_label(mood)));
    }
    println!(
        "{}{}",
        header.dimmed(),
        flags(entry.is_liked, entry.is_bookmarked).yellow()
    );

    if !entry.content.is_empty() {
        println!("{}", entry.content);
    }
    if let Some(url) = &entry.image_url {
        let shown = if url.starts_with("data:") {
            "(attached image)"
        } else {
            url.as_str()
        };
        println!("{}", shown.cyan());
    }

    for reply in entry.replies() {
        let author = registry.display_agent(reply.agent_id);
        println!(
            "  {} {} {}{}",
            "↳".dimmed(),
            format!("{} {} #{}", author.name, author.handle, reply.agent_id).bright_blue(),
            reply.text,
            flags(reply.is_liked, reply.is_bookmarked).yellow()
        );
    }
    println!();
}

pub fn entries(entries: &[Entry], registry: &AgentRegistry) {
    if entries.is_empty() {
        println!("{}", "No entries.".dimmed());
        return;
    }
    for item in entries {
        entry(item, registry);
    }
}
