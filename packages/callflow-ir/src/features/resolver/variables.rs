//! Variable resolution (SPEC_FULL.md §4.3.2).

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::shared::models::{CallGraph, GroupId, GroupType, NodeId, VariablePointee};

/// Resolves every Node's Variables that the Builder and inheritance wiring left
/// untouched: construction hints against known classes, plain tokens against
/// file Groups or unique exported top-level symbols. Everything else is left
/// unresolved and ignored, per §4.3.2's third bullet.
pub fn resolve_variables(graph: &mut CallGraph) {
    let class_by_token = class_group_by_token(graph);
    let file_by_token = file_group_by_token(graph);
    let exported = exported_symbol_index(graph);

    let node_ids: Vec<NodeId> = graph.node_ids().collect();
    for node_id in node_ids {
        let count = graph.node(node_id).unwrap().variables.len();
        for idx in 0..count {
            resolve_one(graph, node_id, idx, &class_by_token, &file_by_token, &exported);
        }
    }
}

fn resolve_one(
    graph: &mut CallGraph,
    node_id: NodeId,
    idx: usize,
    class_by_token: &FxHashMap<String, GroupId>,
    file_by_token: &FxHashMap<String, GroupId>,
    exported: &FxHashMap<String, NodeId>,
) {
    let variable = graph.node(node_id).unwrap().variables[idx].clone();
    if variable.points_to.is_some() {
        return;
    }

    let resolved = if let Some(class_name) = &variable.construction_hint {
        match class_by_token.get(class_name) {
            Some(&gid) => Some(VariablePointee::Group(gid)),
            None => Some(VariablePointee::UnknownModule),
        }
    } else if let Some(&gid) = file_by_token.get(&variable.token) {
        Some(VariablePointee::Group(gid))
    } else if let Some(&nid) = exported.get(&variable.token) {
        Some(VariablePointee::Node(nid))
    } else {
        None
    };

    if let Some(pointee) = resolved {
        graph.node_mut(node_id).unwrap().variables[idx].points_to = Some(pointee);
    }
}

/// Class token -> Group id, for tokens that name exactly one class. A token
/// shared by more than one class can't be a reliable construction target;
/// construction hints referencing it fall back to `UnknownModule`.
fn class_group_by_token(graph: &CallGraph) -> FxHashMap<String, GroupId> {
    let mut multi: FxHashMap<String, Vec<GroupId>> = FxHashMap::default();
    for gid in graph.group_ids() {
        let group = graph.group(gid).unwrap();
        if group.group_type == GroupType::Class {
            multi.entry(group.token.clone()).or_default().push(gid);
        }
    }
    multi
        .into_iter()
        .filter_map(|(token, ids)| {
            if ids.len() == 1 {
                Some((token, ids[0]))
            } else {
                warn!(class = %token, count = ids.len(), "token names more than one class; construction hints resolve to UnknownModule");
                None
            }
        })
        .collect()
}

fn file_group_by_token(graph: &CallGraph) -> FxHashMap<String, GroupId> {
    graph
        .file_groups()
        .map(|gid| (graph.group(gid).unwrap().token.clone(), gid))
        .collect()
}

/// Top-level function token -> Node id, for tokens exported by exactly one file.
fn exported_symbol_index(graph: &CallGraph) -> FxHashMap<String, NodeId> {
    let mut multi: FxHashMap<String, Vec<NodeId>> = FxHashMap::default();
    for nid in graph.node_ids() {
        let node = graph.node(nid).unwrap();
        if node.is_root {
            continue;
        }
        let parent = graph.group(node.parent).unwrap();
        if parent.group_type == GroupType::File {
            multi.entry(node.token.clone()).or_default().push(nid);
        }
    }
    multi
        .into_iter()
        .filter_map(|(token, ids)| if ids.len() == 1 { Some((token, ids[0])) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Group, Node, Variable};

    #[test]
    fn construction_hint_resolves_to_known_class() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let class = graph.push_group(Group::new(GroupType::Class, "Obj", Some(file)));
        let entry = graph.push_node(Node::new("entry", 1, file));
        graph.node_mut(entry).unwrap().variables.push(Variable::from_construction("b", 2, "Obj"));

        resolve_variables(&mut graph);

        assert_eq!(
            graph.node(entry).unwrap().variables[0].points_to,
            Some(VariablePointee::Group(class))
        );
    }

    #[test]
    fn construction_hint_for_unknown_class_is_unknown_module() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let entry = graph.push_node(Node::new("entry", 1, file));
        graph.node_mut(entry).unwrap().variables.push(Variable::from_construction("b", 2, "Ghost"));

        resolve_variables(&mut graph);

        assert!(graph.node(entry).unwrap().variables[0].is_unknown_module());
    }

    #[test]
    fn import_token_resolves_to_file_group() {
        let mut graph = CallGraph::new();
        let a = graph.push_group(Group::new(GroupType::File, "a", None));
        let b = graph.push_group(Group::new(GroupType::File, "b", None));
        let entry = graph.push_node(Node::new("entry", 1, a));
        graph.node_mut(entry).unwrap().variables.push(Variable::unresolved("b", 1));

        resolve_variables(&mut graph);

        assert_eq!(
            graph.node(entry).unwrap().variables[0].points_to,
            Some(VariablePointee::Group(b))
        );
    }

    #[test]
    fn unresolvable_token_is_left_alone() {
        let mut graph = CallGraph::new();
        let a = graph.push_group(Group::new(GroupType::File, "a", None));
        let entry = graph.push_node(Node::new("entry", 1, a));
        graph.node_mut(entry).unwrap().variables.push(Variable::unresolved("mystery", 1));

        resolve_variables(&mut graph);

        assert!(graph.node(entry).unwrap().variables[0].points_to.is_none());
    }
}
