use serde::Serialize;

use crate::GraphBuild;
use crate::graph::cycles::{Cycle, CycleEdge};

// ---------------------------------------------------------------------------
// JSON model
// ---------------------------------------------------------------------------
//
// This is the wire contract with any serving or visualization layer; field
// names and shape are stable. `specifiers` is omitted entirely (not null)
// when an edge carries no binding names.

#[derive(Debug, Serialize)]
pub struct NodeJson {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkJson {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifiers: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CycleJson {
    pub nodes: Vec<String>,
    pub links: Vec<LinkJson>,
}

#[derive(Debug, Serialize)]
pub struct GraphJson {
    pub nodes: Vec<NodeJson>,
    pub links: Vec<LinkJson>,
    pub cycles: Vec<CycleJson>,
}

fn specifiers_field(specifiers: &[String]) -> Option<Vec<String>> {
    (!specifiers.is_empty()).then(|| specifiers.to_vec())
}

fn cycle_to_json(cycle: &Cycle) -> CycleJson {
    CycleJson {
        nodes: cycle.nodes.clone(),
        links: cycle
            .links
            .iter()
            .map(|CycleEdge { source, target, specifiers }| LinkJson {
                source: source.clone(),
                target: target.clone(),
                specifiers: specifiers_field(specifiers),
            })
            .collect(),
    }
}

impl GraphJson {
    pub fn from_build(build: &GraphBuild) -> Self {
        Self {
            nodes: build
                .graph
                .node_ids()
                .map(|id| NodeJson { id: id.to_owned() })
                .collect(),
            links: build
                .graph
                .edges()
                .map(|(source, target, edge)| LinkJson {
                    source: source.to_owned(),
                    target: target.to_owned(),
                    specifiers: specifiers_field(&edge.specifiers),
                })
                .collect(),
            cycles: build.cycles.iter().map(cycle_to_json).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Aggregate statistics for one graph build.
#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub file_count: usize,
    pub import_count: usize,
    pub cycle_count: usize,
    /// Import specifiers that resolved to nothing and were dropped.
    pub unresolved_imports: usize,
    /// Files skipped due to read or parse errors.
    pub skipped: usize,
    /// Wall-clock time for the build in seconds.
    pub elapsed_secs: f64,
}

impl GraphStats {
    pub fn from_build(build: &GraphBuild, elapsed_secs: f64) -> Self {
        Self {
            file_count: build.graph.node_count(),
            import_count: build.graph.edge_count(),
            cycle_count: build.cycles.len(),
            unresolved_imports: build.diagnostics.unresolved_imports,
            skipped: build.diagnostics.failures.len(),
            elapsed_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

/// Print build statistics.
///
/// - `json = true`: pretty-printed JSON object on stdout.
/// - `json = false`: human-readable cargo-style summary on stdout.
///
/// Skipped-file warnings always go to **stderr**, keeping stdout clean for
/// downstream JSON consumers.
pub fn print_stats(stats: &GraphStats, json: bool) {
    if json {
        match serde_json::to_string_pretty(stats) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("error serialising stats: {e}"),
        }
        return;
    }

    println!(
        "Graphed {} files in {:.2}s",
        stats.file_count, stats.elapsed_secs
    );
    println!(
        "  {} imports, {} cycles, {} unresolved import(s) dropped",
        stats.import_count, stats.cycle_count, stats.unresolved_imports
    );
    if stats.skipped > 0 {
        eprintln!("  {} file(s) skipped (read or parse errors)", stats.skipped);
    }
}

/// Print detected cycles, one per line, each closed back to its first node:
/// `a.ts -> b.ts -> a.ts`.
pub fn print_cycles(build: &GraphBuild, json: bool) {
    if json {
        let cycles: Vec<CycleJson> = build.cycles.iter().map(cycle_to_json).collect();
        match serde_json::to_string_pretty(&cycles) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("error serialising cycles: {e}"),
        }
        return;
    }

    if build.cycles.is_empty() {
        println!("No circular dependencies found.");
        return;
    }
    for cycle in &build.cycles {
        let mut walk = cycle.nodes.clone();
        walk.push(cycle.nodes[0].clone());
        println!("cycle: {}", walk.join(" -> "));
    }
}

/// Report per-file diagnostics on stderr. With `verbose`, each failure is
/// listed; otherwise only a count.
pub fn report_diagnostics(build: &GraphBuild, verbose: bool) {
    let failures = &build.diagnostics.failures;
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            eprintln!("warning: {failure}");
        }
    } else {
        eprintln!(
            "warning: {} file(s) skipped (read or parse errors); rerun with --verbose for details",
            failures.len()
        );
    }
}
