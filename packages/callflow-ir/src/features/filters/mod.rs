//! Namespace/function include/exclude filters (SPEC_FULL.md §4.4).
//!
//! Runs after Builder, before Resolver, so excluded entities never contribute
//! candidates to call linking.

use tracing::warn;

use crate::shared::models::{CallGraph, GroupId, NodeId};

#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub exclude_namespaces: Vec<String>,
    pub exclude_functions: Vec<String>,
    pub include_only_namespaces: Vec<String>,
    pub include_only_functions: Vec<String>,
}

impl FilterParams {
    pub fn is_noop(&self) -> bool {
        self.exclude_namespaces.is_empty()
            && self.exclude_functions.is_empty()
            && self.include_only_namespaces.is_empty()
            && self.include_only_functions.is_empty()
    }
}

/// Applies every configured filter to `graph`, removing Nodes (and the Groups
/// that consequently become empty) in place.
pub fn apply_filters(graph: &mut CallGraph, params: &FilterParams) {
    if params.is_noop() {
        return;
    }

    let mut matched_namespace_exclude = vec![false; params.exclude_namespaces.len()];
    let mut matched_namespace_include = vec![false; params.include_only_namespaces.len()];
    let mut matched_function_exclude = vec![false; params.exclude_functions.len()];
    let mut matched_function_include = vec![false; params.include_only_functions.len()];

    let group_ids: Vec<GroupId> = graph.group_ids().collect();
    for group_id in group_ids {
        let ancestor_tokens: Vec<String> = graph
            .ancestors(group_id)
            .into_iter()
            .map(|g| graph.group(g).unwrap().token.clone())
            .collect();

        let excluded = params.exclude_namespaces.iter().enumerate().find_map(|(i, ns)| {
            ancestor_tokens.iter().any(|t| t == ns).then_some(i)
        });
        if let Some(i) = excluded {
            matched_namespace_exclude[i] = true;
            remove_all_nodes_in(graph, group_id);
            continue;
        }

        if !params.include_only_namespaces.is_empty() {
            let included = params.include_only_namespaces.iter().enumerate().find_map(|(i, ns)| {
                ancestor_tokens.iter().any(|t| t == ns).then_some(i)
            });
            match included {
                Some(i) => matched_namespace_include[i] = true,
                // Direct members only: a nested subgroup gets its own ancestor-chain
                // pass and can independently match, per `engine.py`'s `_limit_namespaces`.
                None => remove_direct_nodes_in(graph, group_id),
            }
        }
    }

    let node_ids: Vec<NodeId> = graph.node_ids().collect();
    for node_id in node_ids {
        let Some(node) = graph.node(node_id) else { continue };
        let token = node.token.clone();

        let excluded = params.exclude_functions.iter().enumerate().find_map(|(i, f)| (*f == token).then_some(i));
        if let Some(i) = excluded {
            matched_function_exclude[i] = true;
            graph.remove_node(node_id);
            continue;
        }

        if !params.include_only_functions.is_empty() {
            let included = params
                .include_only_functions
                .iter()
                .enumerate()
                .find_map(|(i, f)| (*f == token).then_some(i));
            match included {
                Some(i) => matched_function_include[i] = true,
                None => graph.remove_node(node_id),
            }
        }
    }

    warn_unmatched(&params.exclude_namespaces, &matched_namespace_exclude, "exclude-namespace");
    warn_unmatched(&params.include_only_namespaces, &matched_namespace_include, "include-only-namespace");
    warn_unmatched(&params.exclude_functions, &matched_function_exclude, "exclude-function");
    warn_unmatched(&params.include_only_functions, &matched_function_include, "include-only-function");
}

fn remove_all_nodes_in(graph: &mut CallGraph, group: GroupId) {
    for node_id in graph.all_nodes_in(group) {
        graph.remove_node(node_id);
    }
}

fn remove_direct_nodes_in(graph: &mut CallGraph, group: GroupId) {
    let nodes = graph.group(group).unwrap().nodes.clone();
    for node_id in nodes {
        graph.remove_node(node_id);
    }
}

fn warn_unmatched(entries: &[String], matched: &[bool], kind: &str) {
    for (entry, hit) in entries.iter().zip(matched) {
        if !hit {
            warn!(entry = %entry, filter = kind, "filter entry matched nothing in the graph");
        }
    }
}
