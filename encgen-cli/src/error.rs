//! Error types for the CLI.
//!
//! Every stage of a generation run has its own error enum. All of them are
//! terminal for the current invocation: nothing is retried, and no artifact is
//! written once resolution has failed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during source file scanning.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error resolving the root record type.
    #[error("Failed to resolve schema: {0}")]
    Resolve(#[from] ResolveError),

    /// Error rendering the encoder source.
    #[error("Failed to generate encoder: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Validation failed (encoder out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during source file scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No Rust files found in directory.
    #[error("No Rust files found in: {path}")]
    NoRustFiles { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error resolving a record type into a field model.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Syntax error in a declaration source.
    #[error("Syntax error in {file}:{line}:{column}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// No declaration with the requested name.
    #[error("Struct '{name}' was not found in {path}")]
    NotFound { name: String, path: PathBuf },

    /// The name resolves to something other than a struct with named fields.
    #[error("'{name}' is not a struct with named fields (found {found})")]
    NotAStruct { name: String, found: String },

    /// The struct has no fields to encode.
    #[error("Struct '{name}' has no fields")]
    EmptyStruct { name: String },
}

/// Error rendering encoder source text.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A name could not be turned into a Rust identifier.
    #[error("Invalid identifier '{name}': {message}")]
    InvalidIdent { name: String, message: String },

    /// A field type could not be re-parsed for emission.
    #[error("Invalid type '{ty}' for field '{field}': {message}")]
    InvalidType {
        field: String,
        ty: String,
        message: String,
    },

    /// Two fields map to the same generated type name.
    #[error("Fields '{first}' and '{second}' both generate type '{identity}'")]
    DuplicateIdentity {
        identity: String,
        first: String,
        second: String,
    },

    /// A configured path (runtime crate or import) is not a valid Rust path.
    #[error("Invalid path '{path}' in configuration: {message}")]
    InvalidPath { path: String, message: String },

    /// The rendered tokens did not form a valid Rust file.
    #[error("Failed to format generated code: {0}")]
    Format(String),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Create a parse error with location information.
    pub fn parse(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(name: impl Into<String>, path: PathBuf) -> Self {
        Self::NotFound {
            name: name.into(),
            path,
        }
    }

    /// Create a not-a-struct error.
    pub fn not_a_struct(name: impl Into<String>, found: impl Into<String>) -> Self {
        Self::NotAStruct {
            name: name.into(),
            found: found.into(),
        }
    }

    /// Create an empty struct error.
    pub fn empty_struct(name: impl Into<String>) -> Self {
        Self::EmptyStruct { name: name.into() }
    }
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no Rust files error.
    pub fn no_rust_files(path: PathBuf) -> Self {
        Self::NoRustFiles { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl GenerateError {
    /// Create an invalid type error.
    pub fn invalid_type(
        field: impl Into<String>,
        ty: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            ty: ty.into(),
            message: message.into(),
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
