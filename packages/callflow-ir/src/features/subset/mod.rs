//! Subset and trimming (SPEC_FULL.md §4.5).

use std::collections::{HashSet, VecDeque};

use tracing::warn;

use crate::errors::{CallflowError, Result};
use crate::shared::models::{CallGraph, GroupId, NodeId};

#[derive(Debug, Clone, Default)]
pub struct SubsetParams {
    pub target_function: Option<String>,
    pub upstream_depth: u32,
    pub downstream_depth: u32,
}

impl SubsetParams {
    /// Validates the flag combination before any file I/O, per §4.5/§7.
    pub fn validate(&self) -> Result<()> {
        if self.target_function.is_none() && (self.upstream_depth > 0 || self.downstream_depth > 0) {
            return Err(CallflowError::config(
                "--upstream-depth/--downstream-depth require --target-function",
            ));
        }
        if self.target_function.is_some() && self.upstream_depth == 0 && self.downstream_depth == 0 {
            return Err(CallflowError::config(
                "--target-function requires a positive --upstream-depth or --downstream-depth",
            ));
        }
        Ok(())
    }

    pub fn is_noop(&self) -> bool {
        self.target_function.is_none()
    }
}

/// Restricts `graph` to the upstream/downstream neighborhood of the target
/// function named by `params`, then prunes emptied Groups. A no-op when no
/// target is configured.
pub fn apply_subset(graph: &mut CallGraph, params: &SubsetParams) -> Result<()> {
    params.validate()?;
    let Some(target_name) = &params.target_function else {
        return Ok(());
    };

    let target = find_target(graph, target_name)?;

    let downstream = bfs(graph, target, params.downstream_depth, Direction::Downstream);
    let upstream = bfs(graph, target, params.upstream_depth, Direction::Upstream);

    let mut keep: HashSet<NodeId> = HashSet::new();
    keep.insert(target);
    keep.extend(downstream);
    keep.extend(upstream);

    graph.edges.retain(|e| keep.contains(&e.source) && keep.contains(&e.target));

    let all_nodes: Vec<NodeId> = graph.node_ids().collect();
    for node_id in all_nodes {
        if !keep.contains(&node_id) {
            graph.remove_node(node_id);
        }
    }

    prune_empty_groups(graph);
    Ok(())
}

/// Removes every Node with no incident Edge, then prunes emptied Groups. The
/// default post-resolution step, skipped when `--no-trimming` is set.
pub fn trim_orphans(graph: &mut CallGraph) {
    let connected: HashSet<NodeId> = graph
        .edges
        .iter()
        .flat_map(|e| [e.source, e.target])
        .collect();

    let all_nodes: Vec<NodeId> = graph.node_ids().collect();
    for node_id in all_nodes {
        if !connected.contains(&node_id) {
            graph.remove_node(node_id);
        }
    }

    prune_empty_groups(graph);

    if graph.node_ids().next().is_none() {
        warn!("trimming removed every node; the emitted graph is empty");
    }
}

fn prune_empty_groups(graph: &mut CallGraph) {
    loop {
        let empties: Vec<GroupId> = graph
            .group_ids()
            .filter(|&id| graph.group(id).unwrap().is_empty())
            .collect();
        if empties.is_empty() {
            break;
        }
        for id in empties {
            graph.remove_group(id);
        }
    }
}

fn find_target(graph: &CallGraph, name: &str) -> Result<NodeId> {
    let matches: Vec<NodeId> = graph
        .node_ids()
        .filter(|&id| {
            let node = graph.node(id).unwrap();
            node.token == name || graph.token_with_ownership(id) == name || graph.name(id) == name
        })
        .collect();

    match matches.len() {
        0 => Err(CallflowError::config(format!(
            "no function matches target `{name}`"
        ))),
        1 => Ok(matches[0]),
        _ => Err(CallflowError::config(format!(
            "target `{name}` matches more than one function; use a more qualified name (e.g. `file::Class.method`)"
        ))),
    }
}

enum Direction {
    Upstream,
    Downstream,
}

fn bfs(graph: &CallGraph, start: NodeId, max_depth: u32, direction: Direction) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    if max_depth == 0 {
        return seen;
    }
    let mut frontier = VecDeque::new();
    frontier.push_back((start, 0u32));

    while let Some((node, depth)) = frontier.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let neighbors = graph.edges.iter().filter_map(|e| match direction {
            Direction::Downstream if e.source == node => Some(e.target),
            Direction::Upstream if e.target == node => Some(e.source),
            _ => None,
        });
        for next in neighbors {
            if seen.insert(next) {
                frontier.push_back((next, depth + 1));
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Edge, Group, GroupType, Node};
    use pretty_assertions::assert_eq;

    fn chain_graph() -> (CallGraph, NodeId, NodeId, NodeId) {
        let mut graph = CallGraph::new();
        let file = graph.push_group(Group::new(GroupType::File, "app", None));
        let a = graph.push_node(Node::new("a", 1, file));
        let b = graph.push_node(Node::new("b", 2, file));
        let c = graph.push_node(Node::new("c", 3, file));
        graph.group_mut(file).unwrap().nodes.extend([a, b, c]);
        graph.edges.push(Edge::new(a, b, 1));
        graph.edges.push(Edge::new(b, c, 2));
        (graph, a, b, c)
    }

    #[test]
    fn validate_rejects_depth_without_target() {
        let params = SubsetParams { upstream_depth: 1, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_target_with_zero_depths() {
        let params = SubsetParams { target_function: Some("x".to_string()), ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_accepts_no_target_and_no_depths() {
        assert!(SubsetParams::default().validate().is_ok());
    }

    #[test]
    fn downstream_depth_one_keeps_direct_callee_only() {
        let (mut graph, a, b, c) = chain_graph();
        let params = SubsetParams {
            target_function: Some("a".to_string()),
            upstream_depth: 0,
            downstream_depth: 1,
        };
        apply_subset(&mut graph, &params).unwrap();

        let mut remaining: Vec<NodeId> = graph.node_ids().collect();
        remaining.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn zero_matches_is_config_error() {
        let (mut graph, _a, _b, _c) = chain_graph();
        let params = SubsetParams {
            target_function: Some("ghost".to_string()),
            downstream_depth: 1,
            ..Default::default()
        };
        assert!(apply_subset(&mut graph, &params).is_err());
    }

    #[test]
    fn trim_orphans_drops_disconnected_node() {
        let (mut graph, a, b, _c) = chain_graph();
        graph.edges.retain(|e| e.source == a && e.target == b);
        trim_orphans(&mut graph);
        assert!(graph.node(a).is_some());
        assert!(graph.node(b).is_some());
    }
}
