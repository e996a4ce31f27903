//! Call linking (SPEC_FULL.md §4.3.3, §4.3.4).

use rustc_hash::FxHashMap;
use tracing::info;

use crate::shared::models::{Call, CallGraph, Edge, GroupId, GroupType, NodeId, VariablePointee};

/// Links every Call on every Node to zero or one target Node and appends the
/// resulting Edges to `graph.edges`. Must run after inheritance wiring and
/// variable resolution, since it consults both.
pub fn link_calls(graph: &mut CallGraph) {
    let index = GlobalIndex::build(graph);
    let mut ambiguous = Vec::new();
    let mut new_edges = Vec::new();

    for node_id in graph.node_ids().collect::<Vec<_>>() {
        let node = graph.node(node_id).unwrap();
        let n_file = graph.node_file(node_id);
        let calls = node.calls.clone();
        let variables = node.variables.clone();

        for call in &calls {
            if let Some(target) =
                find_link_for_call(graph, &index, n_file, &variables, call, &mut ambiguous)
            {
                new_edges.push(Edge::new(node_id, target, call.line_number));
            }
        }
    }

    graph.edges.extend(new_edges);

    if !ambiguous.is_empty() {
        info!(
            count = ambiguous.len(),
            calls = %ambiguous.join(", "),
            "ambiguous calls resolved to no edge"
        );
    }
}

/// Per §4.3.3: variable-based resolution first (silent drop on `UnknownModule`
/// or an unresolved match), then a global-candidate fallback with an
/// exactly-one-match rule.
fn find_link_for_call(
    graph: &CallGraph,
    index: &GlobalIndex,
    n_file: Option<GroupId>,
    variables: &[crate::shared::models::Variable],
    call: &Call,
    ambiguous: &mut Vec<String>,
) -> Option<NodeId> {
    for variable in variables.iter().filter(|v| v.line_number <= call.line_number) {
        let matches = if call.is_attr() {
            call.owner_token.as_deref() == Some(variable.token.as_str())
        } else {
            call.token == variable.token
        };
        if !matches {
            continue;
        }
        return match variable.points_to {
            Some(VariablePointee::UnknownModule) | None => None,
            Some(VariablePointee::Node(id)) => Some(id),
            Some(VariablePointee::Group(gid)) => find_node_in_group(graph, gid, &call.token),
        };
    }

    let mut candidates: Vec<NodeId> = if call.is_attr() {
        index
            .by_token
            .get(&call.token)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|&id| Some(graph.node(id).unwrap().parent) != n_file)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        let mut c = index.top_level.get(&call.token).cloned().unwrap_or_default();
        if let Some(ctors) = index.constructors.get(&call.token) {
            c.extend(ctors.iter().copied());
        }
        c
    };
    candidates.sort_unstable();
    candidates.dedup();

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        _ => {
            let label = match &call.owner_token {
                Some(owner) => format!("{owner}.{}", call.token),
                None => call.token.clone(),
            };
            ambiguous.push(label);
            None
        }
    }
}

fn find_node_in_group(graph: &CallGraph, group: GroupId, token: &str) -> Option<NodeId> {
    let group = graph.group(group)?;
    let mut matches = group.nodes.iter().copied().filter(|&id| graph.node(id).unwrap().token == token);
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

struct GlobalIndex {
    /// token -> top-level (file-group-parented) Nodes with that token.
    top_level: FxHashMap<String, Vec<NodeId>>,
    /// class token -> that class's constructor Node.
    constructors: FxHashMap<String, Vec<NodeId>>,
    /// token -> every Node with that token, any parent (for attr calls).
    by_token: FxHashMap<String, Vec<NodeId>>,
}

impl GlobalIndex {
    fn build(graph: &CallGraph) -> Self {
        let mut top_level: FxHashMap<String, Vec<NodeId>> = FxHashMap::default();
        let mut constructors: FxHashMap<String, Vec<NodeId>> = FxHashMap::default();
        let mut by_token: FxHashMap<String, Vec<NodeId>> = FxHashMap::default();

        for node_id in graph.node_ids() {
            let node = graph.node(node_id).unwrap();
            if node.is_root {
                continue;
            }
            by_token.entry(node.token.clone()).or_default().push(node_id);

            let parent = graph.group(node.parent).unwrap();
            if parent.group_type == GroupType::File {
                top_level.entry(node.token.clone()).or_default().push(node_id);
            }
            if node.is_constructor {
                constructors.entry(parent.token.clone()).or_default().push(node_id);
            }
        }

        GlobalIndex { top_level, constructors, by_token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Group, Node, Variable};

    #[test]
    fn plain_call_resolves_to_unique_top_level_function() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let entry = graph.push_node(Node::new("entry", 1, file));
        let target = graph.push_node(Node::new("handle", 3, file));
        graph.node_mut(entry).unwrap().calls.push(Call::new("handle", None, 2));

        link_calls(&mut graph);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, entry);
        assert_eq!(graph.edges[0].target, target);
    }

    #[test]
    fn ambiguous_plain_call_produces_no_edge() {
        let mut graph = CallGraph::new();
        let a = graph.push_group(Group::new(GroupType::File, "a", None));
        let b = graph.push_group(Group::new(GroupType::File, "b", None));
        let caller = graph.push_node(Node::new("entry", 1, a));
        graph.push_node(Node::new("handle", 1, a));
        graph.push_node(Node::new("handle", 1, b));
        graph.node_mut(caller).unwrap().calls.push(Call::new("handle", None, 2));

        link_calls(&mut graph);

        assert!(graph.edges.is_empty());
    }

    #[test]
    fn unknown_module_variable_silently_drops_call() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let entry = graph.push_node(Node::new("entry", 1, file));
        graph.push_node(Node::new("run", 2, file));
        graph
            .node_mut(entry)
            .unwrap()
            .variables
            .push(Variable::pointing_to("pkg", 1, VariablePointee::UnknownModule));
        graph
            .node_mut(entry)
            .unwrap()
            .calls
            .push(Call::new("run", Some("pkg".to_string()), 2));

        link_calls(&mut graph);

        assert!(graph.edges.is_empty());
    }

    #[test]
    fn attr_call_suppresses_same_file_top_level_function() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let class = graph.push_group(Group::new(GroupType::Class, "Obj", Some(file)));
        let entry = graph.push_node(Node::new("entry", 1, file));
        graph.push_node(Node::new("run", 5, file)); // same-file top-level "run"
        let method = graph.push_node(Node::new("run", 2, class));
        graph.group_mut(class).unwrap().nodes.push(method);
        graph
            .node_mut(entry)
            .unwrap()
            .calls
            .push(Call::new("run", Some("obj".to_string()), 3));

        link_calls(&mut graph);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].target, method);
    }
}
