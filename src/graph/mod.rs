pub mod cycles;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use crate::processor::{FileImports, ProcessError};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A source file node. Identity is the project-root-relative path with `/`
/// separators; there is no other payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub id: String,
}

/// A directed import edge between two file nodes.
///
/// Parallel edges between the same pair are allowed, one per distinct import
/// statement, and each keeps its own specifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// Binding names introduced by the originating import statement.
    pub specifiers: Vec<String>,
}

/// Diagnostics accumulated while assembling a graph.
#[derive(Debug, Default)]
pub struct AssemblyDiagnostics {
    /// Per-file failures (read or parse). The files contributed no edges.
    pub failures: Vec<ProcessError>,
    /// Count of import specifiers that resolved to nothing and were dropped.
    pub unresolved_imports: usize,
}

/// The file-level dependency graph: a directed petgraph `StableGraph` with an
/// O(1) identity index.
///
/// Node and edge enumeration follow insertion order; nothing is ever removed,
/// so repeated runs over the same input enumerate identically.
pub struct DependencyGraph {
    graph: StableGraph<FileNode, ImportEdge, Directed>,
    node_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Add a file node. Returns the existing index if the identity is already
    /// present; a path appears once no matter how many files reference it.
    pub fn add_file(&mut self, id: &str) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(id) {
            return existing;
        }
        let idx = self.graph.add_node(FileNode { id: id.to_owned() });
        self.node_index.insert(id.to_owned(), idx);
        idx
    }

    /// Append one import edge. Both endpoints must already be nodes of this
    /// graph, so an edge can never dangle.
    pub fn add_import(&mut self, source: NodeIndex, target: NodeIndex, specifiers: Vec<String>) {
        self.graph.add_edge(source, target, ImportEdge { specifiers });
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node identities in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|i| self.graph[i].id.as_str())
    }

    /// Edges as `(source id, target id, edge)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &ImportEdge)> {
        self.graph.edge_indices().map(|e| {
            let (s, t) = self
                .graph
                .edge_endpoints(e)
                .expect("edge endpoints are never removed");
            (
                self.graph[s].id.as_str(),
                self.graph[t].id.as_str(),
                &self.graph[e],
            )
        })
    }

    /// Assemble one graph from the complete set of per-file outcomes.
    ///
    /// Successes contribute their source node, target nodes, and edges;
    /// failures contribute nothing to the graph but are surfaced in the
    /// returned diagnostics rather than swallowed. The caller must only
    /// invoke this once every in-flight file has settled.
    pub fn from_outcomes(
        outcomes: Vec<Result<FileImports, ProcessError>>,
    ) -> (Self, AssemblyDiagnostics) {
        let mut graph = Self::new();
        let mut diagnostics = AssemblyDiagnostics::default();

        for outcome in outcomes {
            let result = match outcome {
                Ok(result) => result,
                Err(failure) => {
                    diagnostics.failures.push(failure);
                    continue;
                }
            };

            diagnostics.unresolved_imports += result.unresolved.len();
            let source_idx = graph.add_file(&result.source);
            for import in result.imports {
                let target_idx = graph.add_file(&import.target);
                graph.add_import(source_idx, target_idx, import.specifiers);
            }
        }

        (graph, diagnostics)
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
