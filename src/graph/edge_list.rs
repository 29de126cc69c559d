use std::{collections::HashMap, fs::read_to_string, path::Path};

use anyhow::Context;
use petgraph::graph::NodeIndex;

use super::dot::{parse_dot, DotGraph};

/// Edge between two raw node labels, as written in the graph description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub source: String,
    pub destination: String,
}

impl RawEdge {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }
}

/// Graph of raw node labels. Parallel edges are kept, one graph edge per edge of the description.
/// Edges of undirected descriptions are stored in the direction they were written.
pub type EdgeGraph = petgraph::Graph<String, ()>;

/// Build an `EdgeGraph` from a parsed DOT document, preserving edge order.
pub fn build_edge_graph(dot_graph: &DotGraph) -> EdgeGraph {
    let mut graph = EdgeGraph::new();
    let mut node_indices: HashMap<&str, NodeIndex> = HashMap::new();
    for node in &dot_graph.nodes {
        node_indices.insert(node.as_str(), graph.add_node(node.clone()));
    }
    for (source, destination) in &dot_graph.edges {
        let source_idx = *node_indices
            .entry(source.as_str())
            .or_insert_with(|| graph.add_node(source.clone()));
        let destination_idx = *node_indices
            .entry(destination.as_str())
            .or_insert_with(|| graph.add_node(destination.clone()));
        graph.add_edge(source_idx, destination_idx, ());
    }
    graph
}

pub fn read_edge_graph_from_file(filepath: &Path) -> anyhow::Result<EdgeGraph> {
    let contents = read_to_string(filepath)
        .with_context(|| format!("Could not read graph description {:?}", filepath))?;
    let dot_graph = parse_dot(&contents)
        .with_context(|| format!("Could not parse graph description {:?}", filepath))?;
    if !dot_graph.directed {
        log::debug!("Undirected graph, edges keep the direction they are written in");
    }
    Ok(build_edge_graph(&dot_graph))
}

/// Edges of the graph in the order they were added.
pub fn raw_edges(graph: &EdgeGraph) -> Vec<RawEdge> {
    graph
        .raw_edges()
        .iter()
        .map(|edge| RawEdge {
            source: graph[edge.source()].clone(),
            destination: graph[edge.target()].clone(),
        })
        .collect()
}
