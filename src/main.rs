//! CLI entry point for seeded self-play sessions of the tile-matching engine

use clap::Parser;
use tilematch::io::cli::{Cli, SessionRunner, init_logging};

fn main() -> tilematch::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    let mut runner = SessionRunner::new(cli);
    runner.run()
}
