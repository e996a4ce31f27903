//! Inheritance wiring (SPEC_FULL.md §4.3.1).

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::shared::models::{CallGraph, GroupId, GroupType, NodeId, Variable, VariablePointee};

/// Resolves every class Group's `inherits_names` into `inherits` (Node lists),
/// and injects each base's direct Nodes as Variables into every Node of the
/// inheriting class, so `self.m()` can resolve to an inherited method.
pub fn wire_inheritance(graph: &mut CallGraph) {
    let by_token = class_nodes_by_token(graph);

    let class_groups: Vec<GroupId> = graph
        .group_ids()
        .filter(|&id| graph.group(id).unwrap().group_type == GroupType::Class)
        .collect();

    for class_id in class_groups {
        let base_names = graph.group(class_id).unwrap().inherits_names.clone();
        let mut resolved: Vec<Vec<NodeId>> = Vec::new();
        let mut injected: Vec<NodeId> = Vec::new();

        for base_name in &base_names {
            match by_token.get(base_name) {
                Some(nodes) if nodes.len() > 1 => {
                    warn!(
                        base = %base_name,
                        count = nodes.len(),
                        "multiple classes share this base-class token; inheritance wiring is ambiguous"
                    );
                    resolved.push(nodes.clone());
                    injected.extend(nodes.iter().copied());
                }
                Some(nodes) => {
                    resolved.push(nodes.clone());
                    injected.extend(nodes.iter().copied());
                }
                None => {
                    warn!(base = %base_name, "base class not found; dropping from inheritance chain");
                }
            }
        }

        graph.group_mut(class_id).unwrap().inherits = resolved;

        let member_nodes = graph.group(class_id).unwrap().nodes.clone();
        for &member in &member_nodes {
            for &inherited in &injected {
                let inherited_node = graph.node(inherited).unwrap();
                let token = inherited_node.token.clone();
                let line_number = inherited_node.line_number;
                if let Some(node) = graph.node_mut(member) {
                    node.variables.push(Variable::pointing_to(
                        token,
                        line_number,
                        VariablePointee::Node(inherited),
                    ));
                }
            }
        }
    }
}

/// Maps each class-group token to the Nodes directly declared in that class
/// (not inherited, not in subclasses).
fn class_nodes_by_token(graph: &CallGraph) -> FxHashMap<String, Vec<NodeId>> {
    let mut table: FxHashMap<String, Vec<NodeId>> = FxHashMap::default();
    for group_id in graph.group_ids() {
        let group = graph.group(group_id).unwrap();
        if group.group_type != GroupType::Class {
            continue;
        }
        table
            .entry(group.token.clone())
            .or_default()
            .extend(group.nodes.iter().copied());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Group, Node};

    #[test]
    fn subclass_member_gains_base_method_as_variable() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));

        let base = graph.push_group(Group::new(GroupType::Class, "Base", Some(file)));
        let step = graph.push_node(Node::new("step", 2, base));
        graph.group_mut(base).unwrap().nodes.push(step);

        let mut sub_group = Group::new(GroupType::Class, "Sub", Some(file));
        sub_group.inherits_names.push("Base".to_string());
        let sub = graph.push_group(sub_group);
        let sub_init = graph.push_node(Node::new("initialize", 5, sub));
        graph.group_mut(sub).unwrap().nodes.push(sub_init);

        wire_inheritance(&mut graph);

        assert_eq!(graph.group(sub).unwrap().inherits, vec![vec![step]]);
        let injected = &graph.node(sub_init).unwrap().variables;
        assert!(injected.iter().any(|v| v.token == "step"));
    }

    #[test]
    fn missing_base_is_dropped_not_fatal() {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let mut sub_group = Group::new(GroupType::Class, "Sub", Some(file));
        sub_group.inherits_names.push("Ghost".to_string());
        let sub = graph.push_group(sub_group);

        wire_inheritance(&mut graph);

        assert!(graph.group(sub).unwrap().inherits.is_empty());
    }
}
