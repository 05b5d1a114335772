use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use hashkit_cli::config::{AppConfig, ConfigManager, get_config};
use hashkit_cli::input::{self, Source};
use hashkit_cli::output::{OutputFormat, create_formatter};
use hashkit_cli::terminal;
use hashkit_core::{Algorithm, AlgorithmRegistry, MatchOutcome};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hashkit")]
#[command(author, version, about = "Multi-algorithm 512-bit hashing and digest matching", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every digest of a file, stdin (`-`), or the files in a directory
    Hash {
        /// File, directory, or `-` for stdin
        path: PathBuf,

        /// Algorithm to run (repeatable, defaults to the full bank)
        #[arg(short, long = "algorithm", value_name = "ALGO")]
        algorithms: Vec<Algorithm>,

        /// Output format (defaults to output.default_format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Process recursively (for directories)
        #[arg(short, long)]
        recursive: bool,
    },

    /// Check whether any digest of the input equals a target digest
    ///
    /// Exits 0 on a match and 1 otherwise.
    Check {
        /// File or `-` for stdin
        path: PathBuf,

        /// Target digest in hex (repeatable, defaults to matching.targets)
        #[arg(short, long = "target", value_name = "HEX")]
        targets: Vec<String>,

        /// Algorithm to run (repeatable, defaults to the full bank)
        #[arg(short, long = "algorithm", value_name = "ALGO")]
        algorithms: Vec<Algorithm>,
    },

    /// List the available algorithms in engine order
    Algorithms,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., engine.chunk_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., matching.targets)
        key: String,

        /// Value to set (comma-separated for lists)
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Warn)
            .filter_module("hashkit_core", log::LevelFilter::Debug)
            .filter_module("hashkit_cli", log::LevelFilter::Debug)
            .filter_module("hashkit", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Commands::Hash {
            path,
            algorithms,
            format,
            recursive,
        } => {
            let config = get_config().context("Failed to load configuration")?;
            hash_command(config, path, algorithms, format, recursive).await?;
        }
        Commands::Check {
            path,
            targets,
            algorithms,
        } => {
            let config = get_config().context("Failed to load configuration")?;
            check_command(config, path, targets, algorithms).await?;
        }
        Commands::Algorithms => {
            algorithms_command();
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

async fn hash_command(
    config: AppConfig,
    path: PathBuf,
    algorithms: Vec<Algorithm>,
    format: Option<OutputFormat>,
    recursive: bool,
) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_string(&config.output.default_format)?,
    };
    let engine_config = config.engine_config(&algorithms);

    let sources = if path.is_dir() {
        let files = input::discover_files(&path, recursive);
        if files.is_empty() {
            eprintln!("{}", "No files found.".yellow());
            return Ok(());
        }
        log::debug!("Found {} file(s) under {}", files.len(), path.display());
        files.into_iter().map(Source::File).collect()
    } else {
        let source = Source::from_arg(&path);
        if let Source::File(file) = &source {
            if !file.exists() {
                anyhow::bail!("Path not found: {}", file.display());
            }
        }
        vec![source]
    };

    let start = Instant::now();
    let mut reports = Vec::with_capacity(sources.len());
    for source in &sources {
        let report = input::hash_source(source, &engine_config)
            .await
            .with_context(|| format!("Failed to hash {source}"))?;
        reports.push(report);
    }
    log::debug!(
        "Hashed {} source(s) in {:.2}s",
        reports.len(),
        start.elapsed().as_secs_f64()
    );

    let formatter = create_formatter(format, terminal::use_color(config.output.color_enabled));
    let rendered = formatter.format_batch(&reports)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}

async fn check_command(
    config: AppConfig,
    path: PathBuf,
    targets: Vec<String>,
    algorithms: Vec<Algorithm>,
) -> Result<()> {
    let policy = config.target_policy(&targets)?;
    let engine_config = config.engine_config(&algorithms);
    let source = Source::from_arg(&path);

    let outcome = input::check_source(&source, &engine_config, &policy)
        .await
        .with_context(|| format!("Failed to check {source}"))?;
    let use_color = terminal::use_color(config.output.color_enabled);

    match outcome {
        MatchOutcome::Matched(algorithm) => {
            let line = format!("match: {algorithm} (code {})", outcome.code());
            if use_color {
                println!("{}", line.green().bold());
            } else {
                println!("{line}");
            }
            Ok(())
        }
        MatchOutcome::NoMatch => {
            if use_color {
                println!("{}", "no match".red());
            } else {
                println!("no match");
            }
            std::process::exit(1);
        }
    }
}

fn algorithms_command() {
    for adapter in AlgorithmRegistry::global().iter() {
        let algorithm = adapter.algorithm();
        println!(
            "{:>2}  {:<12} {:<24} {} bits",
            algorithm.position(),
            algorithm.id(),
            adapter.display_name(),
            adapter.digest_len() * 8
        );
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => match manager.get(&key) {
            Ok(value) => {
                println!("{value}");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::Set { key, value } => match manager.set(&key, &value) {
            Ok(()) => {
                eprintln!("{}", format!("Set {key} = {value}").green());
                eprintln!(
                    "Configuration saved to: {}",
                    manager.get_config_path().display()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:#}").red());
                std::process::exit(1);
            }
        },
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("Config file: {}", manager.get_config_path().display());

            // Group items by section
            let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (key, value) in items {
                let (section, rest) = key.split_once('.').unwrap_or(("general", key.as_str()));
                sections
                    .entry(section.to_string())
                    .or_default()
                    .push((rest.to_string(), value));
            }

            for (section, items) in sections {
                println!("[{}]", section.yellow());
                for (key, value) in items {
                    println!("  {} = {}", key.cyan(), value);
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
