use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lodge_client::api::ApiClient;
use lodge_client::api::logs::{self, UploadFile};
use lodge_client::config::ClientConfig;
use lodge_client::local::LocalStore;
use lodge_client::store::{AppState, StateStore};

#[derive(Parser)]
#[command(name = "lodge", about = "Client for the Lodge notes service")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "lodge.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load everything and print the guild/channel/log tree.
    Tree,
    /// Create a guild.
    CreateGuild { name: String },
    /// Delete a guild by id.
    DeleteGuild { id: i64 },
    /// Create a channel in a guild.
    CreateChannel { guild_id: i64, name: String },
    /// Delete a channel by id.
    DeleteChannel { id: i64 },
    /// Post a log to a channel.
    Post {
        channel_id: i64,
        content: String,
        /// File to attach; repeatable.
        #[arg(long)]
        file: Vec<PathBuf>,
    },
    /// Replace a log's content.
    Edit { log_id: i64, content: String },
    /// Delete a log by id.
    DeleteLog { id: i64 },
    /// Offline store operations.
    #[command(subcommand)]
    Local(LocalCommand),
}

#[derive(Subcommand)]
enum LocalCommand {
    /// Seed the offline store with starter guilds if it is empty.
    Init,
    /// List offline guilds and their channels.
    Guilds,
    /// Export the offline document to a file.
    Export {
        #[arg(default_value = "lodge-backup.json")]
        path: PathBuf,
    },
    /// Import an offline document, replacing the current one.
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(&cli.config);

    match cli.command {
        Command::Local(cmd) => run_local(cmd, &config),
        cmd => run_api(cmd, &config).await,
    }
}

async fn run_api(cmd: Command, config: &ClientConfig) -> Result<()> {
    let store = StateStore::new(ApiClient::new(config.api.base_url.clone()));

    match cmd {
        Command::Tree => {
            store.load_initial_data().await?;
            print_tree(&store.state());
        }
        Command::CreateGuild { name } => {
            let guild = store.create_guild(&name).await?;
            println!("created guild {} (#{})", guild.name, guild.id);
        }
        Command::DeleteGuild { id } => {
            store.delete_guild(id).await?;
            println!("deleted guild #{id}");
        }
        Command::CreateChannel { guild_id, name } => {
            let channel = store.create_channel(guild_id, &name).await?;
            println!("created channel {} (#{})", channel.name, channel.id);
        }
        Command::DeleteChannel { id } => {
            store.delete_channel(id).await?;
            println!("deleted channel #{id}");
        }
        Command::Post {
            channel_id,
            content,
            file,
        } => {
            let mut files = Vec::new();
            for path in file {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("attachment")
                    .to_string();
                files.push(UploadFile {
                    name,
                    mime_type: None,
                    bytes,
                });
            }
            let log = store.create_log(channel_id, &content, files).await?;
            println!("posted log #{} ({} attachments)", log.id, log.files.len());
        }
        Command::Edit { log_id, content } => {
            // The state store has no update operation; edit goes straight
            // through the resource API.
            let log = logs::update(store.api(), log_id, &content).await?;
            println!("updated log #{}", log.id);
        }
        Command::DeleteLog { id } => {
            store.delete_log(id).await?;
            println!("deleted log #{id}");
        }
        Command::Local(_) => unreachable!("local commands are dispatched in main"),
    }
    Ok(())
}

fn run_local(cmd: LocalCommand, config: &ClientConfig) -> Result<()> {
    let local = LocalStore::new(config.local.data_path.clone());

    match cmd {
        LocalCommand::Init => {
            if local.seed_defaults()? {
                println!("seeded starter guilds into {}", local.path().display());
            } else {
                println!("{} already has data, nothing to do", local.path().display());
            }
        }
        LocalCommand::Guilds => {
            for name in local.guild_names()? {
                let channels = local.channel_names(&name)?;
                println!("{name} ({} channels)", channels.len());
                for channel in channels {
                    println!("  #{channel}");
                }
            }
        }
        LocalCommand::Export { path } => {
            local.export_to(&path)?;
            println!("exported to {}", path.display());
        }
        LocalCommand::Import { path } => {
            let doc = local.import_from(&path)?;
            println!("imported {} guilds", doc.guilds.len());
        }
    }
    Ok(())
}

fn print_tree(state: &AppState) {
    if state.guilds.is_empty() {
        println!("no guilds");
        return;
    }

    for guild in &state.guilds {
        let active = state
            .current_guild
            .as_ref()
            .is_some_and(|g| g.id == guild.id);
        println!("{} {} (#{})", if active { "*" } else { " " }, guild.name, guild.id);

        if !active {
            continue;
        }
        for channel in &state.channels {
            let current = state
                .current_channel
                .as_ref()
                .is_some_and(|c| c.id == channel.id);
            println!("    {} #{} ({})", if current { "*" } else { " " }, channel.name, channel.id);
            if !current {
                continue;
            }
            for log in &state.logs {
                println!(
                    "        [{}] {}",
                    log.created_at.format("%Y-%m-%d %H:%M"),
                    log.content
                );
            }
        }
    }
}
