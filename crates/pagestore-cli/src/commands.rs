use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use pagestore_server::{PagestoreServer, RuntimeMode, ServerConfig};
use pagestore_store::{Document, DocumentKey, DocumentStore, FsDocumentStore};
use serde_json::{json, Value};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::List(args) => cmd_list(args, &cli.format).await,
        Command::Get(args) => cmd_get(args, &cli.format).await,
        Command::Put(args) => cmd_put(args, &cli.format).await,
    }
}

fn build_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides();

    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if args.production {
        config.mode = RuntimeMode::Production;
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    println!(
        "pagestore on {} (data: {}, mode: {})",
        config.bind_addr.to_string().bold(),
        config.data_root().display(),
        config.mode.to_string().yellow()
    );
    PagestoreServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_list(args: ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = FsDocumentStore::new(args.store.data_root());
    let documents = store.load_all().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&documents)?),
        OutputFormat::Text if documents.is_empty() => {
            println!("No documents in {}.", store.root().display());
        }
        OutputFormat::Text => {
            for doc in &documents {
                if args.long {
                    println!("{}  {}", doc.filename.cyan(), doc.content.dimmed());
                } else {
                    println!("{}", doc.filename.cyan());
                }
            }
            println!("{} document(s)", documents.len().to_string().bold());
        }
    }
    Ok(())
}

async fn cmd_get(args: GetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = FsDocumentStore::new(args.store.data_root());
    let key = DocumentKey::parse(&args.key)?;
    let Some(content) = store.read(&key).await? else {
        anyhow::bail!("no document at {}", key);
    };
    println!("{}", render_document(&key, content, format)?);
    Ok(())
}

async fn cmd_put(args: PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = FsDocumentStore::new(args.store.data_root());
    let key = DocumentKey::parse(&args.key)?;
    let payload = parse_payload(&args.data)?;
    store.upsert(&key, &payload).await?;
    println!("{}", render_saved(&key, format)?);
    Ok(())
}

/// `get` output: the raw text, or a snapshot entry in JSON mode.
fn render_document(
    key: &DocumentKey,
    content: String,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&Document::new(key, content))?,
        OutputFormat::Text => content,
    })
}

fn render_saved(key: &DocumentKey, format: &OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&json!({"filename": key.to_filename(), "saved": true}))?
        }
        OutputFormat::Text => format!("{} Saved {}", "✓".green().bold(), key.to_string().yellow()),
    })
}

/// Parse a JSON argument, reading it from a file when prefixed with `@`.
fn parse_payload(arg: &str) -> anyhow::Result<Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("reading {path}"))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("payload is not valid JSON")
}
