use clap::Parser;
use salesviz::cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
