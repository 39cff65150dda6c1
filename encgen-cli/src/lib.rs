//! # encgen-cli
//!
//! Generator for order-enforcing streaming JSON encoders.
//!
//! Given the name of a Rust struct, the generator finds its declaration among
//! a tree of source files, resolves its fields (recursing into nested
//! structs), plans a chain of phase types with one step per field, and renders
//! that chain as Rust source built on the `encgen` runtime.
//!
//! ## Architecture
//!
//! - [`scanner`] - Source file discovery and filtering
//! - [`resolver`] - Declaration index and field model resolution
//! - [`ir`] - Field model and phase chain types
//! - [`planner`] - Phase chain planning
//! - [`generator`] - Rust source rendering
//! - [`writer`] - File output and dry-run support
//! - [`config`] - Configuration management and TOML parsing
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types and handling
//!
//! ## Build scripts
//!
//! ```no_run
//! use std::path::Path;
//!
//! let out_dir = std::env::var("OUT_DIR").unwrap();
//! let mut config = encgen_cli::Config::default();
//! config.output.dir = out_dir.into();
//!
//! encgen_cli::generate_file(Path::new("src"), "Parcel", &config).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod ir;
pub mod logging;
pub mod planner;
pub mod resolver;
pub mod scanner;
pub mod writer;

use std::path::{Path, PathBuf};

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{EncoderGenerator, GeneratedEncoder};
pub use ir::{EncoderPlan, FieldDescriptor, FieldKind, Phase, ResolveWarning, SchemaTree};
pub use resolver::SchemaResolver;
pub use scanner::{SourceFile, SourceScanner};
pub use writer::{FileWriter, WriteResult};

/// Scan `input` and resolve the struct called `name`.
pub fn resolve_schema(input: &Path, name: &str, filter: Option<&str>) -> CliResult<SchemaTree> {
    let mut scanner = SourceScanner::new(input);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }

    let files = scanner.scan()?;
    let tree = SchemaResolver::new()
        .with_search_path(input)
        .resolve(name, &files)?;

    Ok(tree)
}

/// Plan and render the encoder for a resolved schema.
pub fn render_encoder(tree: &SchemaTree, config: &Config) -> CliResult<GeneratedEncoder> {
    let plan = planner::plan(&tree.name, &tree.fields)?;
    let encoder = EncoderGenerator::new(config.clone()).generate(&plan)?;
    Ok(encoder)
}

/// Destination of a rendered encoder under the configured output directory.
pub fn output_path(encoder: &GeneratedEncoder, config: &Config) -> PathBuf {
    config.output.dir.join(&encoder.file_name)
}

/// Resolve, render and write the encoder for `name` in one step.
///
/// Nothing is written unless resolution and rendering both succeed. Returns
/// the path of the generated file.
pub fn generate_file(input: &Path, name: &str, config: &Config) -> CliResult<PathBuf> {
    config.validate()?;

    let tree = resolve_schema(input, name, None)?;
    let encoder = render_encoder(&tree, config)?;
    let result = FileWriter::new(false).write(&output_path(&encoder, config), &encoder.content)?;

    Ok(result.path().to_path_buf())
}
