//! JSON emission (SPEC_FULL.md §6's JSON output schema).

use serde::Serialize;

use crate::shared::models::CallGraph;

use super::{node_kind, ordered_view, NodeKind};

#[derive(Serialize)]
struct JsonNode {
    uid: String,
    name: String,
    label: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct JsonEdge {
    source: String,
    target: String,
}

#[derive(Serialize)]
struct JsonGraph {
    directed: bool,
    nodes: std::collections::BTreeMap<String, JsonNode>,
    edges: Vec<JsonEdge>,
}

#[derive(Serialize)]
struct JsonRoot {
    graph: JsonGraph,
}

/// `{"graph":{"directed":true,"nodes":{uid: node_dict},"edges":[edge_dict]}}`.
pub fn render_json(graph: &CallGraph) -> String {
    let (nodes, edges) = ordered_view(graph);

    let mut json_nodes = std::collections::BTreeMap::new();
    for &id in &nodes {
        let uid = id.to_string();
        let node = graph.node(id).unwrap();
        let label = graph.token_with_ownership(id);
        let kind = match node_kind(graph, id) {
            NodeKind::Node => "node",
            NodeKind::Trunk => "trunk",
            NodeKind::Leaf => "leaf",
        };
        json_nodes.insert(
            uid.clone(),
            JsonNode {
                uid,
                name: graph.name(id),
                label,
                kind,
            },
        );
    }

    let json_edges = edges
        .iter()
        .map(|e| JsonEdge {
            source: e.source.to_string(),
            target: e.target.to_string(),
        })
        .collect();

    let root = JsonRoot {
        graph: JsonGraph {
            directed: true,
            nodes: json_nodes,
            edges: json_edges,
        },
    };

    serde_json::to_string_pretty(&root).expect("graph serialization cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Edge, Group, GroupType, Node};

    #[test]
    fn renders_trunk_and_leaf_types() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let a = graph.push_node(Node::new("a", 1, file));
        let b = graph.push_node(Node::new("b", 2, file));
        graph.group_mut(file).unwrap().nodes.extend([a, b]);
        graph.edges.push(Edge::new(a, b, 1));

        let out = render_json(&graph);
        assert!(out.contains("\"trunk\""));
        assert!(out.contains("\"leaf\""));
        assert!(out.contains("\"directed\": true"));
    }
}
