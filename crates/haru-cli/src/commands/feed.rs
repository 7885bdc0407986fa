use super::render;
use anyhow::{Context, Result};
use colored::Colorize;
use haru_application::HaruApp;
use haru_core::agent::AgentId;
use haru_core::entry::{Entry, Mood, NewEntry};
use std::fs;
use std::path::PathBuf;

pub async fn post(
    app: &HaruApp,
    content: String,
    mood: Option<Mood>,
    image: Option<PathBuf>,
) -> Result<()> {
    let mut draft = NewEntry::new(content);
    if let Some(mood) = mood {
        draft = draft.with_mood(mood);
    }
    if let Some(path) = image {
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        draft = draft.with_image_bytes(mime.essence_str(), &bytes);
    }

    let outcome = app.post(draft).await?;
    match outcome.entry() {
        Some(entry) => render::entry(entry, app.registry()),
        None => println!("{}", "Entry was deleted before replies arrived.".dimmed()),
    }
    if outcome.replied < outcome.requested {
        println!(
            "{}",
            format!(
                "{} of {} agents replied",
                outcome.replied, outcome.requested
            )
            .yellow()
        );
    }
    Ok(())
}

pub fn list(app: &HaruApp, bookmarked: bool, tag: Option<String>) {
    let tag = tag.map(|t| if t.starts_with('#') { t } else { format!("#{t}") });
    let entries = match (bookmarked, tag) {
        (false, None) => app.feed(),
        (false, Some(tag)) => app.with_tag(&tag),
        (true, None) => app.bookmarked(),
        (true, Some(tag)) => app
            .bookmarked()
            .into_iter()
            .filter(|e| e.has_tag(&tag))
            .collect(),
    };
    render::entries(&entries, app.registry());
}

/// Prints the entry after a mutation, or reports that it does not exist.
fn show_updated(app: &HaruApp, entries: &[Entry], entry_id: &str) -> Result<()> {
    let entry = entries
        .iter()
        .find(|e| e.id() == entry_id)
        .with_context(|| format!("No entry with id {entry_id}"))?;
    render::entry(entry, app.registry());
    Ok(())
}

pub fn like(app: &HaruApp, entry_id: &str) -> Result<()> {
    let entries = app.toggle_like(entry_id)?;
    show_updated(app, &entries, entry_id)
}

pub fn bookmark(app: &HaruApp, entry_id: &str) -> Result<()> {
    let entries = app.toggle_bookmark(entry_id)?;
    show_updated(app, &entries, entry_id)
}

pub fn reply_like(app: &HaruApp, entry_id: &str, agent_id: u64) -> Result<()> {
    let entries = app.toggle_reply_like(entry_id, AgentId(agent_id))?;
    show_updated(app, &entries, entry_id)
}

pub fn reply_bookmark(app: &HaruApp, entry_id: &str, agent_id: u64) -> Result<()> {
    let entries = app.toggle_reply_bookmark(entry_id, AgentId(agent_id))?;
    show_updated(app, &entries, entry_id)
}

pub fn delete(app: &HaruApp, entry_id: &str) -> Result<()> {
    if app.find_entry(entry_id).is_none() {
        anyhow::bail!("No entry with id {entry_id}");
    }
    app.delete_entry(entry_id)?;
    println!("{}", format!("Deleted {entry_id}").green());
    Ok(())
}

pub fn delete_reply(app: &HaruApp, entry_id: &str, agent_id: u64) -> Result<()> {
    let entries = app.delete_reply(entry_id, AgentId(agent_id))?;
    show_updated(app, &entries, entry_id)
}

pub fn tags(app: &HaruApp, limit: Option<usize>) {
    let tags = app.trending_tags(limit);
    if tags.is_empty() {
        println!("{}", "No tags yet.".dimmed());
    }
    for (rank, tag) in tags.iter().enumerate() {
        println!("{:>2}. {} {}", rank + 1, tag.tag.bright_cyan(), format!("({})", tag.count).dimmed());
    }
}
