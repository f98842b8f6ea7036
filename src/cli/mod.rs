mod render;

pub use render::{RenderAllArgs, RenderArgs, SummaryArgs};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::reports::ReportId;
use crate::services::{init_logging, Config};

/// Sales CSV reports as standalone SVG charts
#[derive(Parser)]
#[command(name = "salesviz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.salesviz/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive report picker (default)
    Tui,

    /// List the available reports
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render one report
    Render(RenderArgs),

    /// Render all twelve reports
    RenderAll(RenderAllArgs),

    /// Show customer purchase and spending statistics
    Summary(SummaryArgs),
}

#[derive(Serialize)]
struct ReportEntry {
    number: usize,
    slug: &'static str,
    title: &'static str,
    file: String,
}

fn list_reports(json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<ReportEntry> = ReportId::all()
            .iter()
            .map(|id| ReportEntry {
                number: id.number(),
                slug: id.slug(),
                title: id.title(),
                file: id.file_name(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for id in ReportId::all() {
            println!("{:>2}  {:<22} {}", id.number(), id.slug(), id.title());
        }
    }
    Ok(())
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let interactive = matches!(self.command, None | Some(Commands::Tui));
        init_logging(self.verbose, interactive);
        let config = Config::load(self.config.as_deref())?;

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(config),
            Some(Commands::List { json }) => list_reports(json),
            Some(Commands::Render(args)) => Ok(args.run(&config)?),
            Some(Commands::RenderAll(args)) => Ok(args.run(&config)?),
            Some(Commands::Summary(args)) => Ok(args.run(&config)?),
        }
    }
}
