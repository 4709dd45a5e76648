use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pagestore",
    about = "pagestore — file-backed JSON document store for page builders",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the editor API server
    Serve(ServeArgs),
    /// List every stored document
    List(ListArgs),
    /// Print one document
    Get(GetArgs),
    /// Create or overwrite a document
    Put(PutArgs),
}

/// Location of the data root shared by the document commands.
#[derive(Args)]
pub struct StoreArgs {
    /// Project root; documents live under `<root>/data`
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Data directory relative to the project root
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

impl StoreArgs {
    pub fn data_root(&self) -> PathBuf {
        self.root.join(&self.data_dir)
    }
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Refuse all editor requests
    #[arg(long)]
    pub production: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Print document contents as well as names
    #[arg(short, long)]
    pub long: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    /// JSON value, or `@file` to read it from a file
    pub data: String,
    #[command(flatten)]
    pub store: StoreArgs,
}
