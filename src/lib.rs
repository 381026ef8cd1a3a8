pub mod config;
pub mod graph;
pub mod output;
pub mod parser;
pub mod processor;
pub mod resolver;
pub mod walker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use config::ImportGraphConfig;
use graph::cycles::{Cycle, detect_cycles};
use graph::{AssemblyDiagnostics, DependencyGraph};
use processor::process_file;

/// The complete result of one graph build.
pub struct GraphBuild {
    /// The assembled dependency graph. Always well-formed, even with diagnostics.
    pub graph: DependencyGraph,
    /// All simple import cycles, each reported once in canonical form.
    pub cycles: Vec<Cycle>,
    /// Per-file failures and dropped-import counts, reported separately
    /// rather than by corrupting the graph shape.
    pub diagnostics: AssemblyDiagnostics,
}

/// Build the dependency graph for a project directory: discover candidate
/// files, process them, assemble, and detect cycles.
///
/// Fails only when the candidate file list itself cannot be obtained;
/// everything per-file is contained as a diagnostic.
pub fn build_graph(root: &Path, config: &ImportGraphConfig) -> Result<GraphBuild> {
    let root = std::path::absolute(root)
        .with_context(|| format!("cannot resolve project root {}", root.display()))?;
    let files = walker::discover_files(&root, config)?;
    Ok(build_graph_from_files(&root, &files))
}

/// Build a graph from an already-discovered candidate file list.
///
/// This is the pure core boundary: a function from a set of source files to
/// graph + cycles. Files are processed in parallel; `collect()` is the
/// barrier that lets every invocation settle (success or failure) before
/// assembly starts, so the node/edge set is deterministic.
pub fn build_graph_from_files(project_root: &Path, files: &[PathBuf]) -> GraphBuild {
    let outcomes: Vec<_> = files
        .par_iter()
        .map(|path| process_file(project_root, path))
        .collect();

    let (graph, diagnostics) = DependencyGraph::from_outcomes(outcomes);
    let cycles = detect_cycles(&graph);

    GraphBuild {
        graph,
        cycles,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Fixture: a imports b imports c imports a, plus an isolated d.
    fn triangle_fixture(root: &Path) -> Vec<PathBuf> {
        vec![
            write(root, "a.ts", "import { b } from './b';"),
            write(root, "b.ts", "import { c } from './c';"),
            write(root, "c.ts", "import { a } from './a';"),
            write(root, "d.ts", "export const d = 1;"),
        ]
    }

    #[test]
    fn triangle_and_isolated_node() {
        let dir = tempfile::tempdir().unwrap();
        let files = triangle_fixture(dir.path());

        let build = build_graph_from_files(dir.path(), &files);
        assert_eq!(build.graph.node_count(), 4);
        assert_eq!(build.graph.edge_count(), 3);
        assert_eq!(build.cycles.len(), 1);

        let mut cycle_nodes = build.cycles[0].nodes.clone();
        cycle_nodes.sort();
        assert_eq!(cycle_nodes, vec!["a.ts", "b.ts", "c.ts"]);
    }

    #[test]
    fn file_order_does_not_change_node_or_edge_sets() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = triangle_fixture(dir.path());

        let forward = build_graph_from_files(dir.path(), &files);
        files.reverse();
        let backward = build_graph_from_files(dir.path(), &files);

        let mut n1: Vec<_> = forward.graph.node_ids().collect();
        let mut n2: Vec<_> = backward.graph.node_ids().collect();
        n1.sort();
        n2.sort();
        assert_eq!(n1, n2);

        let mut e1: Vec<_> = forward.graph.edges().map(|(s, t, _)| (s, t)).collect();
        let mut e2: Vec<_> = backward.graph.edges().map(|(s, t, _)| (s, t)).collect();
        e1.sort();
        e2.sort();
        assert_eq!(e1, e2);
    }

    #[test]
    fn broken_file_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = triangle_fixture(dir.path());
        files.push(write(dir.path(), "broken.ts", "import { from ';;; ==="));

        let build = build_graph_from_files(dir.path(), &files);
        // The broken file contributes no node and no edges; everything else
        // is untouched and the failure is surfaced.
        assert_eq!(build.graph.node_count(), 4);
        assert_eq!(build.graph.edge_count(), 3);
        assert_eq!(build.diagnostics.failures.len(), 1);
        assert_eq!(build.cycles.len(), 1);
    }

    #[test]
    fn vendor_imports_mint_no_nodes() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "node_modules/react/index.js",
            "module.exports = {};",
        );
        let files = vec![write(
            dir.path(),
            "app.ts",
            "import React from 'react';\nimport './local';",
        )];

        let build = build_graph_from_files(dir.path(), &files);
        assert_eq!(build.graph.node_count(), 1, "only app.ts itself");
        assert_eq!(build.graph.edge_count(), 0);
        assert_eq!(build.diagnostics.unresolved_imports, 1, "./local is missing");
    }
}
