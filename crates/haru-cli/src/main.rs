use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use haru_application::HaruApp;
use haru_core::entry::Mood;
use haru_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "HARU_LOG";

#[derive(Parser)]
#[command(name = "haru")]
#[command(about = "Haru - a local-first diary where AI friends reply to your posts", long_about = None)]
struct Cli {
    /// Directory holding the stored collections
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a post and collect replies from the active agents
    Post {
        content: String,
        #[arg(long, value_enum)]
        mood: Option<MoodArg>,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show the feed, most recent first
    Feed {
        /// Only entries bookmarked themselves or through a reply
        #[arg(long)]
        bookmarked: bool,
        /// Only entries carrying this hashtag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Toggle the like flag of an entry
    Like { entry_id: String },
    /// Toggle the bookmark flag of an entry
    Bookmark { entry_id: String },
    /// Toggle the like flag of one agent's reply
    ReplyLike { entry_id: String, agent_id: u64 },
    /// Toggle the bookmark flag of one agent's reply
    ReplyBookmark { entry_id: String, agent_id: u64 },
    /// Delete an entry
    Delete { entry_id: String },
    /// Delete one agent's reply, keeping the entry
    DeleteReply { entry_id: String, agent_id: u64 },
    /// Show the most used hashtags
    Tags {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage agents
    Agents {
        #[command(subcommand)]
        action: AgentsAction,
    },
    /// Send a chat message to one agent
    Chat { agent_id: u64, text: String },
    /// Show the chat thread with one agent
    History { agent_id: u64 },
    /// Delete one chat message
    DeleteMessage { message_id: String },
    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Write every collection as one JSON document
    Export {
        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the stored collections with an exported document
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum AgentsAction {
    /// List agents and whether they are active
    List,
    /// Add an agent under a new id
    Add {
        name: String,
        handle: String,
        persona: String,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Remove an agent
    Remove { agent_id: u64 },
    /// Make an agent reply to new posts
    Activate { agent_id: u64 },
    /// Stop an agent from replying to new posts
    Deactivate { agent_id: u64 },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Update the given fields
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        handle: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MoodArg {
    Happy,
    Neutral,
    Sad,
    Angry,
    Excited,
}

impl From<MoodArg> for Mood {
    fn from(arg: MoodArg) -> Self {
        match arg {
            MoodArg::Happy => Mood::Happy,
            MoodArg::Neutral => Mood::Neutral,
            MoodArg::Sad => Mood::Sad,
            MoodArg::Angry => Mood::Angry,
            MoodArg::Excited => Mood::Excited,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config_service = ConfigService::new(None);
    if let Some(path) = cli.config {
        config_service = config_service.with_config_file(path);
    }
    let app = HaruApp::open(&config_service, cli.data_dir).context("Failed to open haru store")?;

    match cli.command {
        Commands::Post {
            content,
            mood,
            image,
        } => commands::feed::post(&app, content, mood.map(Mood::from), image).await?,
        Commands::Feed { bookmarked, tag } => commands::feed::list(&app, bookmarked, tag),
        Commands::Like { entry_id } => commands::feed::like(&app, &entry_id)?,
        Commands::Bookmark { entry_id } => commands::feed::bookmark(&app, &entry_id)?,
        Commands::ReplyLike { entry_id, agent_id } => {
            commands::feed::reply_like(&app, &entry_id, agent_id)?
        }
        Commands::ReplyBookmark { entry_id, agent_id } => {
            commands::feed::reply_bookmark(&app, &entry_id, agent_id)?
        }
        Commands::Delete { entry_id } => commands::feed::delete(&app, &entry_id)?,
        Commands::DeleteReply { entry_id, agent_id } => {
            commands::feed::delete_reply(&app, &entry_id, agent_id)?
        }
        Commands::Tags { limit } => commands::feed::tags(&app, limit),
        Commands::Agents { action } => match action {
            AgentsAction::List => commands::agents::list(&app),
            AgentsAction::Add {
                name,
                handle,
                persona,
                avatar_url,
            } => commands::agents::add(&app, name, handle, persona, avatar_url)?,
            AgentsAction::Remove { agent_id } => commands::agents::remove(&app, agent_id)?,
            AgentsAction::Activate { agent_id } => {
                commands::agents::set_active(&app, agent_id, true)?
            }
            AgentsAction::Deactivate { agent_id } => {
                commands::agents::set_active(&app, agent_id, false)?
            }
        },
        Commands::Chat { agent_id, text } => commands::chat::send(&app, agent_id, &text).await?,
        Commands::History { agent_id } => commands::chat::history(&app, agent_id),
        Commands::DeleteMessage { message_id } => commands::chat::delete(&app, &message_id)?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&app),
            ProfileAction::Set {
                name,
                handle,
                avatar_url,
                bio,
            } => commands::profile::set(&app, name, handle, avatar_url, bio)?,
        },
        Commands::Export { output } => commands::sync::export(&app, output)?,
        Commands::Import { file } => commands::sync::import(&app, &file)?,
    }

    Ok(())
}
