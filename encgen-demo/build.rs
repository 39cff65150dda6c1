use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use encgen_cli::Config;

/// Structs that get a generated encoder.
const ROOTS: &[&str] = &["Parcel", "Event", "Reply", "Node"];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=src/model.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR is not set")?);

    let mut config = Config::default();
    config.output.dir = out_dir;

    for root in ROOTS {
        encgen_cli::generate_file(Path::new("src/model.rs"), root, &config)
            .with_context(|| format!("generating encoder for {root}"))?;
    }

    Ok(())
}
