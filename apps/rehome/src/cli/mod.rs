//! CLI command handling for rehome

mod output;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rehome_config::AppConfig;
use rehome_services::{MoveOptions, MoveService, ScanService};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "rehome")]
#[command(about = "Move files in a front-end project and rewrite the imports that point at them")]
#[command(version)]
pub struct Cli {
    /// Project root; relative sources and destinations are read against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Debug logging and per-line change listings
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Move files or directories and update every import that refers to them
    ///
    /// Examples:
    ///   rehome move src/components/Button.vue src/shared/
    ///   rehome move "src/services/*.ts" src/core --dry-run
    Move {
        /// Files, directories or glob patterns to move
        #[arg(required = true, num_args = 1..)]
        sources: Vec<String>,

        /// Destination path; a directory when several sources are given
        destination: String,

        /// Compute and report the changes without touching disk
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// List every import in the project and whether it resolves
    Scan {
        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Only report imports that do not resolve to an existing path
        #[arg(long)]
        unresolved_only: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

/// Flags shared by commands that walk the project
#[derive(clap::Args)]
pub struct DiscoveryArgs {
    /// File extensions to scan for imports (e.g. ts,tsx,vue)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Do not honour .gitignore and .ignore files
    #[arg(long)]
    pub no_ignore: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Main CLI entry point
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = absolute_root(&cli.root)?;
    let mut config = AppConfig::load(&root)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    match cli.command {
        Commands::Move {
            sources,
            destination,
            dry_run,
            discovery,
            format,
        } => {
            apply_discovery_args(&mut config, &discovery)?;
            rehome_config::logging::initialize(&config);
            debug!(root = %root.display(), "Project root");

            let service = MoveService::new(&root, &config);
            let report = service
                .move_paths(&sources, &destination, &MoveOptions { dry_run })
                .await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Pretty => print!("{}", output::render_move(&report, &root, cli.verbose)),
            }
        }
        Commands::Scan {
            discovery,
            unresolved_only,
            format,
        } => {
            apply_discovery_args(&mut config, &discovery)?;
            rehome_config::logging::initialize(&config);

            let service = ScanService::new(&root, &config);
            let entries = service.scan(unresolved_only).await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Pretty => print!("{}", output::render_scan(&entries, &root)),
            }
        }
    }

    Ok(())
}

fn absolute_root(root: &Path) -> anyhow::Result<PathBuf> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
    Ok(cwd.join(root))
}

fn apply_discovery_args(config: &mut AppConfig, args: &DiscoveryArgs) -> anyhow::Result<()> {
    if let Some(extensions) = &args.extensions {
        config.project.extensions = extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
    }
    if args.no_ignore {
        config.project.respect_ignore = false;
    }
    config.validate()?;
    Ok(())
}
