//! Clap derive structures for the `flaresync` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// flaresync -- Cloudflare DNS records as code
#[derive(Debug, Parser)]
#[command(
    name = "flaresync",
    version,
    about = "Keep Cloudflare DNS zones in sync with version-controlled record files",
    long_about = "Reconciles the DNS records declared in per-domain JSON files with the\n\
        live records of Cloudflare zones.\n\n\
        Run `flaresync diff` to preview, `flaresync sync` to apply.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (default: ./flaresync.toml, ./flaresync.json, then the user config dir)
    #[arg(long, env = "FLARESYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Only act on these domains (repeatable or comma-separated)
    #[arg(long, short = 'd', value_delimiter = ',', global = true)]
    pub domain: Vec<String>,

    /// Output format (default: config `defaults.output`, else table)
    #[arg(long, short = 'o', env = "FLARESYNC_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (default: config `defaults.color`, else auto)
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default: config `defaults.timeout`)
    #[arg(
        long,
        env = "FLARESYNC_TIMEOUT",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Cloudflare API base URL
    #[arg(long, env = "FLARESYNC_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one record per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what `sync` would change, without touching the zone
    Diff(DiffArgs),

    /// Apply the declared records to the zone
    Sync(SyncArgs),

    /// Format records files (proxy flags, TTLs, restricted entries)
    #[command(alias = "format")]
    Fmt(FmtArgs),

    /// List live or declared records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Snapshot live records into a records file
    Backup(BackupArgs),

    /// Create a config file and starter records files interactively
    Init,

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Process domains concurrently
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Report what would change without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Process domains concurrently
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Validate records files without writing; fails on restricted entries
    #[arg(long, short = 'c')]
    pub check: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// List the records file instead of the live zone
    #[arg(long, short = 'l')]
    pub local: bool,

    /// Record types, comma-separated, or `all` (default: all live types, or the domain's types with --local)
    #[arg(long = "type", short = 't', value_delimiter = ',')]
    pub types: Vec<String>,
}

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Record types, comma-separated, or `all` (default: the domain's types)
    #[arg(long = "type", short = 't', value_delimiter = ',')]
    pub types: Vec<String>,

    /// File name label (default: current UTC timestamp)
    #[arg(long)]
    pub label: Option<String>,

    /// Directory to write backups into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration (tokens redacted)
    Show,

    /// Print the config file path in use
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
