use anyhow::Result;
use colored::Colorize;
use haru_application::{AgentDraft, HaruApp, RegistryOutcome};
use haru_core::agent::AgentId;

/// Prints an applied change, or the reason the registry turned it down.
fn report<T>(outcome: RegistryOutcome<T>, applied: &str) {
    match outcome {
        RegistryOutcome::Applied(_) => println!("{}", applied.green()),
        RegistryOutcome::Rejected(reason) => println!("{}", format!("Unchanged: {reason}").yellow()),
    }
}

pub fn list(app: &HaruApp) {
    let settings = app.registry().settings();
    for agent in settings.agents() {
        let marker = if settings.is_active(agent.id) {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "{} {:>3}  {} {}",
            marker,
            agent.id.to_string(),
            agent.name.bold(),
            agent.handle.bright_blue()
        );
        println!("        {}", agent.persona.dimmed());
    }
    println!(
        "{}",
        format!(
            "{} of at most {} agents",
            settings.agents().len(),
            app.registry().policy().max_agents
        )
        .dimmed()
    );
}

pub fn add(
    app: &HaruApp,
    name: String,
    handle: String,
    persona: String,
    avatar_url: Option<String>,
) -> Result<()> {
    let outcome = app.registry().create(AgentDraft {
        name,
        handle,
        persona,
        avatar_url,
    })?;
    match outcome {
        RegistryOutcome::Applied(agent) => {
            println!("{}", format!("Added {} as #{}", agent.name, agent.id).green())
        }
        RegistryOutcome::Rejected(reason) => println!("{}", format!("Unchanged: {reason}").yellow()),
    }
    Ok(())
}

pub fn remove(app: &HaruApp, agent_id: u64) -> Result<()> {
    let outcome = app.registry().remove(AgentId(agent_id))?;
    report(outcome, &format!("Removed agent #{agent_id}"));
    Ok(())
}

pub fn set_active(app: &HaruApp, agent_id: u64, active: bool) -> Result<()> {
    let outcome = app.registry().set_active(AgentId(agent_id), active)?;
    let verb = if active { "Activated" } else { "Deactivated" };
    report(outcome, &format!("{verb} agent #{agent_id}"));
    Ok(())
}
