//! CLI command implementations

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use flash_core::study::{self, GroupStats};
use flash_core::{
    Card, Config, FileStorage, GenerateRequest, GenerateTarget, GenerationSummary, Group, NewCard,
    Recall, SeedData, Session, StudyCursor,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tabled::{Table, Tabled, settings::Style};

/// Resolved config plus the overrides given on the command line
pub struct Context {
    config: Config,
    config_path: PathBuf,
    data_dir: PathBuf,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Config::default_path().context("No config directory available")?,
        };
        let config = Config::load(&config_path)?;
        let data_dir = config.resolve_data_dir(data_dir.as_deref())?;

        if !config.display.colors {
            colored::control::set_override(false);
        }

        Ok(Self {
            config,
            config_path,
            data_dir,
        })
    }

    fn open(&self) -> Result<Session<FileStorage>> {
        let storage = FileStorage::open(&self.data_dir)?;
        let seed = SeedData::load_or_bundled(self.config.seed_path.as_deref())?;
        let session = Session::open(storage, &self.config.storage_key, &seed)?
            .with_latency(Duration::from_millis(self.config.generation.latency_ms));
        Ok(session)
    }
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cards")]
    cards: usize,
    #[tabled(rename = "Mastered")]
    mastered: usize,
    #[tabled(rename = "Categories")]
    categories: String,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        let stats = GroupStats::from(group);
        Self {
            id: group.id,
            name: group.name.clone(),
            cards: stats.cards,
            mastered: stats.mastered,
            categories: study::categories(&group.cards).join(", "),
        }
    }
}

fn find_group(session: &Session<FileStorage>, id: u64) -> Result<&Group> {
    session
        .store()
        .group(id)
        .ok_or_else(|| anyhow::anyhow!("Group not found: {}", id))
}

pub fn groups(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.open()?;
    let groups: Vec<_> = session.store().groups().collect();

    if json {
        println!("{}", serde_json::to_string(&groups)?);
    } else if groups.is_empty() {
        println!("No groups yet. Create one with 'flash group create <name>' or try 'flash demo'.");
    } else {
        let rows: Vec<GroupRow> = groups.into_iter().map(GroupRow::from).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    Ok(())
}

pub fn group_create(ctx: &Context, name: &str, json: bool) -> Result<()> {
    let mut session = ctx.open()?;
    let id = session.create_group(name)?;
    let group = find_group(&session, id)?;

    if json {
        println!("{}", serde_json::to_string(group)?);
    } else {
        println!("{} Created group {}: {}", "✓".green(), id, group.name);
    }

    Ok(())
}

pub fn group_delete(ctx: &Context, id: u64, json: bool) -> Result<()> {
    let mut session = ctx.open()?;
    let existed = session.store().group(id).is_some();
    session.delete_group(id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": existed }));
    } else if existed {
        println!("{} Deleted group {}", "✓".green(), id);
    } else {
        println!("No group {}", id);
    }

    Ok(())
}

pub fn cards(ctx: &Context, group: u64, category: Option<String>, json: bool) -> Result<()> {
    let session = ctx.open()?;
    let group = find_group(&session, group)?;
    let mut cursor = StudyCursor::new(group.id);
    cursor.select_category(category);
    let cards = cursor.filtered(group);

    if json {
        println!("{}", serde_json::to_string(&cards)?);
        return Ok(());
    }

    println!("{} {}", group.id.to_string().cyan().bold(), group.name.bold());
    if cards.is_empty() {
        println!("  No cards");
    }
    for card in cards {
        print_card_line(card);
    }

    Ok(())
}

fn print_card_line(card: &Card) {
    println!(
        "  {} [{}] {} {}",
        format!("#{}", card.id).cyan(),
        card.category.blue(),
        card.question,
        format!("(easy x{})", card.easy_count).dimmed()
    );
}

pub fn add(
    ctx: &Context,
    group: u64,
    question: String,
    answer: String,
    category: String,
    new_category: String,
    json: bool,
) -> Result<()> {
    let mut session = ctx.open()?;
    let input = NewCard {
        question,
        answer,
        category,
        new_category,
    };
    let id = session.add_card(group, &input)?;
    let card = find_group(&session, group)?
        .card(id)
        .ok_or_else(|| anyhow::anyhow!("Card not found: {}", id))?;

    if json {
        println!("{}", serde_json::to_string(card)?);
    } else {
        println!("{} Added card {} to group {}", "✓".green(), id, group);
        println!("  Category: {}", card.category);
    }

    Ok(())
}

pub fn recall(ctx: &Context, group: u64, card: u64, json: bool) -> Result<()> {
    let mut session = ctx.open()?;
    session.mark_recalled(group, card)?;
    let updated = session.store().group(group).and_then(|g| g.card(card));

    match (updated, json) {
        (Some(card), true) => println!("{}", serde_json::to_string(card)?),
        (Some(card), false) => println!(
            "{} Card {} recalled {} time(s)",
            "✓".green(),
            card.id,
            card.easy_count
        ),
        (None, true) => println!("null"),
        (None, false) => println!("No card {} in group {}", card, group),
    }

    Ok(())
}

pub async fn generate(
    ctx: &Context,
    topic: String,
    detail: String,
    count: Option<usize>,
    group: Option<u64>,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    let target = match group {
        Some(id) => GenerateTarget::Existing(Some(id)),
        None => GenerateTarget::NewGroup { name },
    };
    let request = GenerateRequest::new(topic, count.unwrap_or(ctx.config.generation.default_count))
        .with_detail(detail)
        .with_target(target);
    run_generation(ctx, request, json).await
}

pub async fn demo(ctx: &Context, json: bool) -> Result<()> {
    run_generation(ctx, GenerateRequest::demo(), json).await
}

async fn run_generation(ctx: &Context, request: GenerateRequest, json: bool) -> Result<()> {
    let mut session = ctx.open()?;
    let ticket = session.begin_generation(request)?;
    if !json {
        println!("{}", "Generating...".dimmed());
    }
    ticket.ready().await;
    let summary = session.finish_generation(ticket)?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &GenerationSummary) {
    println!(
        "{} Added {} cards to {} ({})",
        "✓".green(),
        summary.card_count,
        summary.group_name.bold(),
        summary.group_id
    );
    if summary.detail.trim().is_empty() {
        println!("  Topic: {}", summary.topic);
    } else {
        println!("  Topic: {} | Detail: {}", summary.topic, summary.detail);
    }
}

pub fn study(ctx: &Context, group_id: u64, category: Option<String>) -> Result<()> {
    let mut session = ctx.open()?;
    let mut cursor = StudyCursor::new(group_id);
    {
        let group = find_group(&session, group_id)?;
        if let Some(ref cat) = category
            && !study::categories(&group.cards).contains(cat)
        {
            bail!("No category '{}' in group {}", cat, group.id);
        }
    }
    cursor.select_category(category);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(group) = session.store().group(group_id) else {
            bail!("Group not found: {}", group_id);
        };
        let Some(card) = cursor.current(group) else {
            println!("No cards to study");
            return Ok(());
        };
        let (position, total) = cursor.position(group);

        println!();
        println!(
            "{} {}  {}",
            format!("{}/{}", position, total).cyan(),
            card.category.blue(),
            format!("easy x{}", card.easy_count).dimmed()
        );
        println!("{}", card.question.bold());
        prompt("[enter] flip  [q] quit")?;
        match lines.next().transpose()? {
            None => break,
            Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => cursor.flip(),
        }

        println!("{}", card.answer);
        prompt("[y] got it  [n] again  [q] quit")?;
        let recall = match lines.next().transpose()? {
            None => break,
            Some(line) => match line.trim().to_lowercase().as_str() {
                "q" => break,
                "y" | "yes" => Recall::Easy,
                _ => Recall::Again,
            },
        };
        cursor.answer(&mut session, recall)?;
    }

    if let Some(group) = session.store().group(group_id) {
        let stats = GroupStats::from(group);
        println!();
        println!(
            "Mastered {}/{} cards, {} recalls in total",
            stats.mastered, stats.cards, stats.total_easy
        );
    }
    Ok(())
}

fn prompt(text: &str) -> Result<()> {
    print!("{} ", text.dimmed());
    std::io::stdout().flush()?;
    Ok(())
}

pub fn stats(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.open()?;
    let store = session.store();
    let groups = store.groups().count();
    let cards = store.card_count();
    let categories = store.category_count();

    if json {
        let value = serde_json::json!({
            "groups": groups,
            "cards": cards,
            "categories": categories,
            "next_group_id": store.next_group_id(),
            "next_card_id": store.next_card_id(),
        });
        println!("{}", serde_json::to_string(&value)?);
    } else {
        println!("Groups:     {}", groups);
        println!("Cards:      {}", cards);
        println!("Categories: {}", categories);
        if let Some(recent) = store.groups().next() {
            println!("First group: {} {}", recent.id, recent.name);
        }
    }

    Ok(())
}

/// Output JSON schema for config file
pub fn schema() -> Result<()> {
    let schema = serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "flash Configuration",
        "description": "Configuration file for the flash flashcard tool",
        "type": "object",
        "properties": {
            "data_dir": {
                "type": ["string", "null"],
                "description": "Directory holding saved groups (defaults to the platform data directory)"
            },
            "storage_key": {
                "type": "string",
                "description": "Storage key of the saved group mapping",
                "default": flash_core::storage::DEFAULT_STORAGE_KEY
            },
            "seed_path": {
                "type": ["string", "null"],
                "description": "Seed file used instead of the bundled sample groups"
            },
            "generation": {
                "type": "object",
                "properties": {
                    "latency_ms": {
                        "type": "integer",
                        "description": "Delay before generated cards are placed, in milliseconds",
                        "minimum": 0,
                        "default": 700
                    },
                    "default_count": {
                        "type": "integer",
                        "description": "Cards per request when no count is given",
                        "minimum": 0,
                        "default": 5
                    }
                }
            },
            "display": {
                "type": "object",
                "properties": {
                    "colors": {
                        "type": "boolean",
                        "description": "Use colors in output",
                        "default": true
                    }
                }
            }
        }
    });
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Show current configuration
pub fn config_show(ctx: &Context, json: bool) -> Result<()> {
    let config = &ctx.config;

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", "Current configuration:".bold());
        println!();
        println!("data_dir = \"{}\"", ctx.data_dir.display());
        println!("storage_key = \"{}\"", config.storage_key);
        if let Some(ref seed) = config.seed_path {
            println!("seed_path = \"{}\"", seed.display());
        }
        println!();
        println!("[generation]");
        println!("latency_ms = {}", config.generation.latency_ms);
        println!("default_count = {}", config.generation.default_count);
        println!();
        println!("[display]");
        println!("colors = {}", config.display.colors);
    }

    Ok(())
}

pub fn config_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path.display());
    Ok(())
}

/// Reset configuration to defaults
pub fn config_reset(ctx: &Context) -> Result<()> {
    if let Some(parent) = ctx.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&ctx.config_path, Config::default_with_comments())?;

    println!("{} Configuration reset to defaults", "✓".green());
    Ok(())
}

/// Get a specific config value
pub fn config_get(ctx: &Context, key: &str, json: bool) -> Result<()> {
    // Convert config to JSON for key lookup
    let config_json = serde_json::to_value(&ctx.config)?;

    let mut value = &config_json;
    for part in key.split('.') {
        value = value
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Config key not found: {}", key))?;
    }

    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Bool(b) => println!("{}", b),
            serde_json::Value::Number(n) => println!("{}", n),
            serde_json::Value::Null => println!("null"),
            _ => println!("{}", serde_json::to_string_pretty(value)?),
        }
    }

    Ok(())
}

/// Set a config value
pub fn config_set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    config.set(key, value)?;
    config.save(&ctx.config_path)?;
    println!("{} Set {} = {}", "✓".green(), key, value);

    Ok(())
}
