//! Interactive resource planner for Oxygen Not Included colonies.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
