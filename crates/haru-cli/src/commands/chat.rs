use super::render;
use anyhow::Result;
use colored::Colorize;
use haru_application::HaruApp;
use haru_core::agent::AgentId;
use haru_core::message::Message;

fn print_message(app: &HaruApp, message: &Message) {
    let when = render::timestamp(message.timestamp).dimmed();
    if message.is_from_user() {
        let profile = app.profile().get();
        println!("{} {} {}", when, format!("{}:", profile.name).green(), message.text);
    } else {
        let author = app.registry().display_agent(message.agent_id);
        println!("{} {} {}", when, format!("{}:", author.name).bright_blue(), message.text);
    }
}

pub async fn send(app: &HaruApp, agent_id: u64, text: &str) -> Result<()> {
    let exchange = app.chat(AgentId(agent_id), text).await?;
    print_message(app, &exchange.user_message);
    match &exchange.reply {
        Some(reply) => print_message(app, reply),
        None => println!("{}", "No reply; every transport failed.".yellow()),
    }
    Ok(())
}

pub fn history(app: &HaruApp, agent_id: u64) {
    let thread = app.messages_for(AgentId(agent_id));
    if thread.is_empty() {
        println!("{}", "No messages.".dimmed());
    }
    for message in &thread {
        print_message(app, message);
        println!("  {}", message.id.dimmed());
    }
}

pub fn delete(app: &HaruApp, message_id: &str) -> Result<()> {
    app.delete_message(message_id)?;
    println!("{}", format!("Deleted message {message_id}").green());
    Ok(())
}
