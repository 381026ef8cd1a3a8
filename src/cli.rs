use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Builds a file-level import dependency graph for JavaScript/TypeScript
/// projects and detects circular dependencies.
///
/// import-graph statically parses each source file's import/require
/// statements, resolves them to files on disk, and reports the resulting
/// graph as JSON suitable for visualization.
#[derive(Parser, Debug)]
#[command(
    name = "import-graph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph and print it as JSON (nodes, links, cycles).
    Graph {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,

        /// List each per-file diagnostic on stderr instead of a summary count.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Detect circular dependencies, one reported line per cycle.
    Cycles {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Output cycles as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print summary statistics for a graph build.
    Stats {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Output statistics as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
