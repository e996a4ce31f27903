//! Resolver: the algorithmic heart of the pipeline (SPEC_FULL.md §4.3).
//!
//! Runs in three ordered passes over the whole graph — inheritance wiring,
//! variable resolution, call linking — each consuming the previous pass's
//! output. Never touches Builder's parse results or the Projector's emission
//! order.

mod calls;
mod inheritance;
mod variables;

use crate::shared::models::CallGraph;

/// Runs every resolution pass in the required order and appends the resulting
/// Edges to `graph.edges`.
pub fn resolve(graph: &mut CallGraph) {
    inheritance::wire_inheritance(graph);
    variables::resolve_variables(graph);
    calls::link_calls(graph);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Call, Group, GroupType, Node};

    #[test]
    fn inherited_method_resolves_via_injected_variable_on_bare_call() {
        // Covers call styles where an inherited method is invoked without an
        // explicit receiver (e.g. Ruby's bare `method_call`): the injected
        // Variable matches on token alone, ahead of any global fallback.
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));

        let base = graph.push_group(Group::new(GroupType::Class, "Base", Some(file)));
        let step = graph.push_node(Node::new("step", 2, base));
        graph.group_mut(base).unwrap().nodes.push(step);

        let mut sub_group = Group::new(GroupType::Class, "Sub", Some(file));
        sub_group.inherits_names.push("Base".to_string());
        let sub = graph.push_group(sub_group);
        let run = graph.push_node(Node::new("run", 5, sub));
        graph.group_mut(sub).unwrap().nodes.push(run);
        graph.node_mut(run).unwrap().calls.push(Call::new("step", None, 6));

        resolve(&mut graph);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, run);
        assert_eq!(graph.edges[0].target, step);
    }

    #[test]
    fn inherited_method_resolves_via_global_fallback_on_self_dot_call() {
        // Covers Python-style `self.step()`: the attr-call global fallback
        // finds `step` in Base (a different Group than the caller's file).
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));

        let base = graph.push_group(Group::new(GroupType::Class, "Base", Some(file)));
        let step = graph.push_node(Node::new("step", 2, base));
        graph.group_mut(base).unwrap().nodes.push(step);

        let mut sub_group = Group::new(GroupType::Class, "Sub", Some(file));
        sub_group.inherits_names.push("Base".to_string());
        let sub = graph.push_group(sub_group);
        let run = graph.push_node(Node::new("run", 5, sub));
        graph.group_mut(sub).unwrap().nodes.push(run);
        graph
            .node_mut(run)
            .unwrap()
            .calls
            .push(Call::new("step", Some("self".to_string()), 6));

        resolve(&mut graph);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, run);
        assert_eq!(graph.edges[0].target, step);
    }
}
