//! # encgen
//!
//! CLI tool for generating order-enforcing streaming JSON encoders from Rust
//! structs.
//!
//! ## Usage
//!
//! ```bash
//! # Generate src/encoders/parcel_encoder.rs from the Parcel struct under src/
//! encgen generate --name Parcel --input src --output src/encoders
//!
//! # Preview without writing
//! encgen generate --name Parcel --dry-run
//!
//! # Generated code reaches the runtime through a re-export
//! encgen generate --name Parcel --runtime crate::runtime --suffix _stream
//!
//! # Show the resolved fields and the planned phase chain
//! encgen inspect --name Parcel
//!
//! # Check a generated file is up to date
//! encgen validate --name Parcel --path src/encoders/parcel_encoder.rs
//!
//! # Initialize configuration
//! encgen init
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use encgen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    logging, planner,
    writer::{FileWriter, WriteResult},
    SchemaTree,
};

#[derive(Parser)]
#[command(name = "encgen")]
#[command(author, version, about = "Generate order-enforcing streaming JSON encoders from Rust structs", long_about = None)]
struct Cli {
    /// Log filter directive (e.g. "debug", "encgen_cli=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the encoder for one struct
    Generate {
        /// Name of the root struct
        #[arg(short, long)]
        name: String,

        /// Directory (or file) containing the declarations
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory for the generated file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suffix appended to the snake_case file name (default "_encoder")
        #[arg(long)]
        suffix: Option<String>,

        /// Path through which generated code reaches the runtime crate
        #[arg(long)]
        runtime: Option<String>,

        /// Preview the generated code without writing it
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only scan files whose relative path matches this glob
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print the resolved field model and phase chain as JSON
    Inspect {
        /// Name of the root struct
        #[arg(short, long)]
        name: String,

        /// Directory (or file) containing the declarations
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Only scan files whose relative path matches this glob
        #[arg(long)]
        filter: Option<String>,
    },

    /// Validate that a generated encoder is up to date
    Validate {
        /// Name of the root struct
        #[arg(short, long)]
        name: String,

        /// Path to the generated encoder file
        #[arg(short, long)]
        path: PathBuf,

        /// Directory (or file) containing the declarations
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Path through which generated code reaches the runtime crate
        #[arg(long)]
        runtime: Option<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new encgen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "encgen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let log_level = cli.log_level;

    match cli.command {
        Commands::Generate {
            name,
            input,
            output,
            suffix,
            runtime,
            dry_run,
            config,
            filter,
        } => {
            let overrides = CliArgs {
                output,
                suffix,
                runtime_crate: runtime,
                log_level,
            };
            let config = load_config(config.as_deref(), overrides)?;
            cmd_generate(&name, &input, &config, filter.as_deref(), dry_run)
        }

        Commands::Inspect {
            name,
            input,
            filter,
        } => {
            load_config(
                None,
                CliArgs {
                    log_level,
                    ..Default::default()
                },
            )?;
            cmd_inspect(&name, &input, filter.as_deref())
        }

        Commands::Validate {
            name,
            path,
            input,
            runtime,
            config,
        } => {
            let overrides = CliArgs {
                runtime_crate: runtime,
                log_level,
                ..Default::default()
            };
            let config = load_config(config.as_deref(), overrides)?;
            cmd_validate(&name, &path, &input, &config)
        }

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

/// Load configuration, apply CLI overrides and start logging.
fn load_config(path: Option<&Path>, mut overrides: CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(path)?;
    let level =
        logging::effective_level(overrides.log_level.as_deref(), &config.logging.level).to_string();
    logging::init_logging(&level)?;

    overrides.log_level = Some(level);
    let config = ConfigManager::merge_cli_args(config, &overrides);
    config.validate()?;

    Ok(config)
}

/// Generate command implementation.
fn cmd_generate(
    name: &str,
    input: &Path,
    config: &Config,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    println!("{} {}", "Resolving".cyan(), name.bold());

    let tree = encgen_cli::resolve_schema(input, name, filter)?;
    print_warnings(&tree);
    println!("  Resolved {} field(s)", tree.fields.len().to_string().green());

    let encoder = encgen_cli::render_encoder(&tree, config)?;
    println!(
        "  Planned {} phase type(s)",
        encoder.type_names.len().to_string().green()
    );

    let path = encgen_cli::output_path(&encoder, config);
    match FileWriter::new(dry_run).write(&path, &encoder.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is up to date", "✓".green(), path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Inspect command implementation.
fn cmd_inspect(name: &str, input: &Path, filter: Option<&str>) -> Result<(), CliError> {
    let tree = encgen_cli::resolve_schema(input, name, filter)?;
    let plan = planner::plan(&tree.name, &tree.fields)?;

    let report = serde_json::json!({
        "schema": tree,
        "plan": plan,
    });
    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    println!("{}", rendered);
    Ok(())
}

/// Validate command implementation.
fn cmd_validate(name: &str, path: &Path, input: &Path, config: &Config) -> Result<(), CliError> {
    println!("{}", "Validating encoder...".cyan());

    if !path.exists() {
        return Err(CliError::Validation(format!(
            "Encoder file not found: {}",
            path.display()
        )));
    }

    let existing = std::fs::read_to_string(path)?;

    let tree = encgen_cli::resolve_schema(input, name, None)?;
    print_warnings(&tree);
    let encoder = encgen_cli::render_encoder(&tree, config)?;

    if existing.trim() == encoder.content.trim() {
        println!("{} Encoder is up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Encoder is out of date", "✗".red());
        println!("  Run 'encgen generate --name {}' to update", name);
        Err(CliError::Validation("Encoder is out of date".to_string()))
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

fn print_warnings(tree: &SchemaTree) {
    for warning in &tree.warnings {
        println!("  {} {}", "Warning:".yellow(), warning);
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
