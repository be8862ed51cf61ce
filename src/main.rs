use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use uuid::Uuid;

use handoff::bundle::load_bundle;
use handoff::clipboard::copy_to_clipboard;
use handoff::config::{format_config, Config};
use handoff::export::{export, export_size, suggested_filename, ExportOptions};
use handoff::history::{ExportRecord, HistoryDb};
use handoff::logging::{init_logging, LogConfig, Verbosity};

#[derive(Parser)]
#[command(name = "handoff")]
#[command(version)]
#[command(about = "Export AI chat history and hand conversations off between providers")]
#[command(
    long_about = "A CLI tool for exporting imported AI chat history (OpenAI, Anthropic, Google, Mistral) as JSON, markdown, or a context prompt that primes another provider with prior conversations."
)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file in addition to stderr
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a project bundle in a given format
    Export {
        /// Path to the project bundle (JSON)
        bundle: PathBuf,

        /// Export format: json, markdown, context_prompt
        #[arg(short, long)]
        format: Option<String>,

        /// Target provider for context prompts (openai, anthropic, google, mistral, generic)
        #[arg(short, long)]
        provider: Option<String>,

        /// Compression level for context prompts (low, medium, high)
        #[arg(short, long)]
        compression: Option<String>,

        /// Omit message metadata from the output
        #[arg(long)]
        no_metadata: bool,

        /// Write the artifact to this file (or into this directory) instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the artifact to the system clipboard
        #[arg(long)]
        copy: bool,

        /// Don't record this export in the history database
        #[arg(long)]
        no_save: bool,
    },
    /// Inspect previously recorded exports
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Show the current configuration
    Config,
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recorded exports, newest first
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Number of entries to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// Print a recorded export's content
    Show {
        /// Export record id
        id: Uuid,
    },
    /// Delete a recorded export
    Delete {
        /// Export record id
        id: Uuid,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&LogConfig {
        verbosity: Verbosity::from_occurrences(cli.verbose),
        log_file: cli.log_file.clone(),
    });

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {}", e);
        Config::default()
    });

    match cli.command {
        Commands::Export {
            bundle,
            format,
            provider,
            compression,
            no_metadata,
            output,
            copy,
            no_save,
        } => run_export(
            &config,
            ExportArgs {
                bundle,
                format,
                provider,
                compression,
                no_metadata,
                output,
                copy,
                no_save,
            },
        ),
        Commands::History { command } => run_history(&config, command),
        Commands::Config => {
            println!("{}", format_config(&config));
            Ok(())
        }
    }
}

struct ExportArgs {
    bundle: PathBuf,
    format: Option<String>,
    provider: Option<String>,
    compression: Option<String>,
    no_metadata: bool,
    output: Option<PathBuf>,
    copy: bool,
    no_save: bool,
}

fn run_export(config: &Config, args: ExportArgs) -> Result<()> {
    let format = config.effective_format(args.format.as_deref())?;
    let options = ExportOptions {
        target_provider: config.effective_provider(args.provider.as_deref()),
        compression_level: config.effective_compression(args.compression.as_deref()),
        include_metadata: !args.no_metadata,
    };

    let bundle = load_bundle(&args.bundle)
        .with_context(|| format!("failed to load bundle: {}", args.bundle.display()))?;

    tracing::info!(
        project = %bundle.project.name,
        conversations = bundle.conversations.len(),
        %format,
        "exporting project"
    );

    let content = export(&bundle.project, &bundle.conversations, format, &options)?;

    if !args.no_save {
        let record = ExportRecord::new(
            &bundle.project.name,
            format,
            &options,
            bundle.conversations.len(),
            &content,
        );
        let db = HistoryDb::open(&config.effective_history_db())?;
        db.insert(&record)?;
        tracing::info!(id = %record.id, "recorded export in history");
    }

    if args.copy {
        copy_to_clipboard(&content).context("failed to copy export to clipboard")?;
        eprintln!("Copied export to clipboard ({} bytes)", export_size(&content));
    }

    match args.output {
        Some(path) => {
            // Writing into a directory picks a filename from the project
            // name and format.
            let target = if path.is_dir() {
                path.join(suggested_filename(&bundle.project.name, format))
            } else {
                path
            };
            fs::write(&target, &content)
                .with_context(|| format!("failed to write export to {}", target.display()))?;
            println!(
                "Exported '{}' as {} ({} bytes) to {}",
                bundle.project.name,
                format,
                export_size(&content),
                target.display()
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}

fn run_history(config: &Config, command: HistoryCommands) -> Result<()> {
    let db = HistoryDb::open(&config.effective_history_db())?;

    match command {
        HistoryCommands::List { limit, offset } => {
            let entries = db.list(limit, offset)?;
            if entries.is_empty() {
                println!("No recorded exports.");
                return Ok(());
            }

            for entry in entries {
                println!(
                    "{}  {}  {:<14} {:<9} {:>8} bytes  {}",
                    entry.id,
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.format,
                    entry.target_provider,
                    entry.size_bytes,
                    entry.project_name,
                );
            }
        }
        HistoryCommands::Show { id } => {
            let record = db
                .get(id)?
                .with_context(|| format!("no export record with id {}", id))?;
            print!("{}", record.content);
        }
        HistoryCommands::Delete { id } => {
            if db.delete(id)? {
                println!("Deleted export record {}", id);
            } else {
                anyhow::bail!("no export record with id {}", id);
            }
        }
    }

    Ok(())
}
