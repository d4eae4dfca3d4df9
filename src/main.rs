//! r12-asm – R12 assembler (CLI)

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

use r12_asm::{assemble, Emitter};

#[derive(Parser, Debug)]
#[command(author, version, about = "R12 Assembler")]
struct Cli {
    /// R12 assembly source
    input: PathBuf,
}

fn main() -> Result<()> {
    // stdout carries only the memory image
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;
    tracing::debug!(input = %cli.input.display(), "assembling");

    let program = assemble(&src, &mut Emitter::stderr());
    let mut out = io::stdout().lock();
    out.write_all(program.render().as_bytes())
        .and_then(|()| out.flush())
        .context("cannot write memory image")?;
    Ok(())
}
