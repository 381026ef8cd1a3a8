mod cli;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use import_graph::build_graph;
use import_graph::config::ImportGraphConfig;
use import_graph::output::{self, GraphJson, GraphStats};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Graph {
            path,
            pretty,
            verbose,
        } => {
            let config = ImportGraphConfig::load(&path);
            let build = build_graph(&path, &config)?;
            output::report_diagnostics(&build, verbose);

            let json = GraphJson::from_build(&build);
            let rendered = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            };
            println!("{rendered}");
        }

        Commands::Cycles { path, json } => {
            let config = ImportGraphConfig::load(&path);
            let build = build_graph(&path, &config)?;
            output::report_diagnostics(&build, false);
            output::print_cycles(&build, json);
        }

        Commands::Stats { path, json } => {
            let started = Instant::now();
            let config = ImportGraphConfig::load(&path);
            let build = build_graph(&path, &config)?;
            let stats = GraphStats::from_build(&build, started.elapsed().as_secs_f64());
            output::print_stats(&stats, json);
        }
    }

    Ok(())
}
