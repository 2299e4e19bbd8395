//! chapterdoc CLI — documentation generator for annotated test suites.
//!
//! Turns `@title` / `@notice` / `@dev` / `@chapter` doc comments above
//! `describe(...)` groups into an overview, chapter pages, and a table of contents.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
