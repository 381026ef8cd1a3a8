use std::collections::{HashMap, HashSet};

use crate::graph::DependencyGraph;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// One edge of a reported cycle, carrying the specifiers of the original
/// import statement it was matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleEdge {
    pub source: String,
    pub target: String,
    pub specifiers: Vec<String>,
}

/// A simple cycle: `nodes[i] → nodes[i+1]`, closed by `nodes[last] → nodes[0]`.
///
/// Cycles are derived, read-only output: computed fresh from a graph
/// snapshot and never fed back into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<String>,
    pub links: Vec<CycleEdge>,
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Enumerate every simple cycle in the graph, each reported exactly once.
///
/// From each node, in node order, a fresh depth-first search runs with an
/// on-path marker set and an explicit path stack. Hitting an on-path neighbor
/// closes a cycle: the path is sliced from that neighbor's first occurrence,
/// and a canonical key (the sorted node identities, joined) deduplicates
/// rotations and traversal-order permutations of the same node set. Finding a
/// cycle does not stop the scan; remaining neighbors are still explored.
///
/// The traversal is iterative (frame = node + next-neighbor cursor) so deep
/// import chains cannot overflow the call stack, and neighbors are visited in
/// edge insertion order, keeping discovery order deterministic. Worst-case
/// cost is exponential in overlapping cycles, which is acceptable at
/// dependency-graph sizes.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let ids: Vec<&str> = graph.node_ids().collect();
    let node_count = ids.len();
    let position: HashMap<&str, usize> =
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // Adjacency and edge table in insertion order. Parallel edges contribute
    // one adjacency entry each, exactly as they appear in the edge list.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut edge_table: Vec<(usize, usize, &[String])> = Vec::new();
    for (source, target, edge) in graph.edges() {
        let s = position[source];
        let t = position[target];
        adjacency[s].push(t);
        edge_table.push((s, t, edge.specifiers.as_slice()));
    }

    let mut seen = HashSet::new();
    let mut cycles = Vec::new();

    let mut on_path = vec![false; node_count];
    let mut path: Vec<usize> = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..node_count {
        on_path[start] = true;
        path.push(start);
        stack.push((start, 0));

        while let Some(&(node, cursor)) = stack.last() {
            if cursor < adjacency[node].len() {
                stack.last_mut().expect("stack is non-empty").1 = cursor + 1;
                let neighbor = adjacency[node][cursor];
                if on_path[neighbor] {
                    // Back-edge to the current path: the slice from the
                    // neighbor's first occurrence to the path tip is a cycle.
                    let from = path.iter().position(|&p| p == neighbor).unwrap_or(0);
                    record(&path[from..], &ids, &edge_table, &mut seen, &mut cycles);
                } else {
                    on_path[neighbor] = true;
                    path.push(neighbor);
                    stack.push((neighbor, 0));
                }
            } else {
                stack.pop();
                path.pop();
                on_path[node] = false;
            }
        }
    }

    cycles
}

/// Canonicalize, deduplicate, and materialize one discovered cycle.
fn record(
    cycle: &[usize],
    ids: &[&str],
    edge_table: &[(usize, usize, &[String])],
    seen: &mut HashSet<String>,
    cycles: &mut Vec<Cycle>,
) {
    let mut sorted: Vec<&str> = cycle.iter().map(|&p| ids[p]).collect();
    sorted.sort_unstable();
    let key = sorted.join(",");
    if !seen.insert(key) {
        return;
    }

    let mut links = Vec::with_capacity(cycle.len());
    for i in 0..cycle.len() {
        let s = cycle[i];
        let t = cycle[(i + 1) % cycle.len()];
        // First matching (source, target) edge supplies the specifiers; with
        // parallel edges the earliest-inserted one wins.
        let specifiers = edge_table
            .iter()
            .find(|(es, et, _)| *es == s && *et == t)
            .map(|(_, _, sp)| sp.to_vec())
            .unwrap_or_default();
        links.push(CycleEdge {
            source: ids[s].to_owned(),
            target: ids[t].to_owned(),
            specifiers,
        });
    }

    cycles.push(Cycle {
        nodes: cycle.iter().map(|&p| ids[p].to_owned()).collect(),
        links,
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
