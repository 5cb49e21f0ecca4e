//! flash - Local flashcard groups from the terminal
//!
//! One JSON file in the data directory holds every group and card.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "flash")]
#[command(about = "Flashcard groups, study sessions and templated card generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding saved groups
    #[arg(long, global = true, env = "FLASH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "FLASH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List groups
    #[command(alias = "ls")]
    Groups,

    /// Create or delete groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// List the cards in a group
    Cards {
        /// Group ID
        group: u64,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a card to a group
    Add {
        /// Group ID
        group: u64,

        /// Question text
        #[arg(short, long)]
        question: String,

        /// Answer text
        #[arg(short, long)]
        answer: String,

        /// Existing category
        #[arg(short, long, default_value = "")]
        category: String,

        /// New category (takes precedence over --category)
        #[arg(short, long, default_value = "")]
        new_category: String,
    },

    /// Mark a card as recalled
    Recall {
        /// Group ID
        group: u64,

        /// Card ID
        card: u64,
    },

    /// Generate cards from a topic
    Generate {
        /// Topic of the cards
        topic: String,

        /// Extra focus within the topic
        #[arg(short, long, default_value = "")]
        detail: String,

        /// Number of cards, at most 50 (defaults to generation.default_count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Append to this existing group instead of creating one
        #[arg(short, long, conflicts_with = "name")]
        group: Option<u64>,

        /// Name for the new group
        #[arg(long)]
        name: Option<String>,
    },

    /// Generate a small starter group
    Demo,

    /// Study a group interactively
    Study {
        /// Group ID
        group: u64,

        /// Only study this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show totals across all groups
    Stats,

    /// Output JSON schema for config file
    Schema,

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// Create an empty group
    Create {
        /// Group name
        name: String,
    },

    /// Delete a group and all its cards
    #[command(alias = "rm")]
    Delete {
        /// Group ID
        id: u64,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file path
    Path,
    /// Reset to default configuration
    Reset,
    /// Get a specific config value
    Get {
        /// Config key (e.g., "storage_key", "generation.latency_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config, cli.data_dir)?;
    let json = cli.json;

    match cli.command {
        Commands::Groups => commands::groups(&ctx, json),
        Commands::Group { command } => match command {
            GroupCommands::Create { name } => commands::group_create(&ctx, &name, json),
            GroupCommands::Delete { id } => commands::group_delete(&ctx, id, json),
        },
        Commands::Cards { group, category } => commands::cards(&ctx, group, category, json),
        Commands::Add {
            group,
            question,
            answer,
            category,
            new_category,
        } => commands::add(&ctx, group, question, answer, category, new_category, json),
        Commands::Recall { group, card } => commands::recall(&ctx, group, card, json),
        Commands::Generate {
            topic,
            detail,
            count,
            group,
            name,
        } => commands::generate(&ctx, topic, detail, count, group, name, json).await,
        Commands::Demo => commands::demo(&ctx, json).await,
        Commands::Study { group, category } => commands::study(&ctx, group, category),
        Commands::Stats => commands::stats(&ctx, json),
        Commands::Schema => commands::schema(),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(&ctx, json),
            Some(ConfigCommands::Path) => commands::config_path(&ctx),
            Some(ConfigCommands::Reset) => commands::config_reset(&ctx),
            Some(ConfigCommands::Get { key }) => commands::config_get(&ctx, &key, json),
            Some(ConfigCommands::Set { key, value }) => commands::config_set(&ctx, &key, &value),
        },
    }
}
