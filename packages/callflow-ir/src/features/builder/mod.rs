//! Builder: walks one file's AST into a Group/Node forest (SPEC_FULL.md §4.2).
//!
//! Builder never links anything across files — every cross-file concern
//! (imports, inheritance, call resolution) is the Resolver's job.

use std::path::Path;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::features::parsing::{LanguageAdapter, LanguageParams};
use crate::shared::models::{CallGraph, Group, GroupId, GroupType};

/// Parses and builds one file's Group/Node forest into `graph`, returning the
/// new file Group's id. Returns `Ok(None)` when the file was a parse error
/// that `skip_parse_errors` allows skipping.
pub fn build_file_group(
    graph: &mut CallGraph,
    adapter: &dyn LanguageAdapter,
    path: &Path,
    params: &LanguageParams,
    skip_parse_errors: bool,
) -> Result<Option<GroupId>> {
    let parsed = match adapter.get_tree(path, params) {
        Ok(p) => p,
        Err(e) if skip_parse_errors => {
            warn!(path = %path.display(), error = %e, "skipping file that failed to parse");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let token = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    debug!(file = %token, "building file group");

    let import_vars = adapter.file_import_tokens(&parsed);

    let mut file_group = Group::new(GroupType::File, token, None);
    file_group.import_tokens = import_vars.iter().map(|v| v.token.clone()).collect();
    let file_id = graph.push_group(file_group);

    build_subtree(graph, adapter, parsed.tree.root_node(), &parsed.source, file_id);

    // Imports are module-scoped: every Node in the file (including nested class
    // methods), not just the root, can reference an imported name.
    if !import_vars.is_empty() {
        for node_id in graph.all_nodes_in(file_id) {
            if let Some(node) = graph.node_mut(node_id) {
                node.variables.extend(import_vars.iter().cloned());
            }
        }
    }

    Ok(Some(file_id))
}

/// Recursively populates `group_id` from a body root (a file's root node, or a
/// class's own body when recursing into a nested class). Shared by every
/// adapter since `separate_namespaces` is the one AST-shaped operation this
/// function calls through.
fn build_subtree(
    graph: &mut CallGraph,
    adapter: &dyn LanguageAdapter,
    root: tree_sitter::Node<'_>,
    source: &str,
    group_id: GroupId,
) {
    let ns = adapter.separate_namespaces(root);

    let root_node = adapter.make_root_node(&ns.body, source, group_id);
    let root_node_id = graph.push_node(root_node);
    graph.group_mut(group_id).unwrap().nodes.push(root_node_id);

    for node_tree in ns.nodes {
        for node in adapter.make_nodes(node_tree, source, group_id) {
            let id = graph.push_node(node);
            graph.group_mut(group_id).unwrap().nodes.push(id);
        }
    }

    for subgroup_tree in ns.subgroups {
        let (group, body) = adapter.make_class_group(subgroup_tree, source, Some(group_id));
        let sub_id = graph.push_group(group);
        graph.group_mut(group_id).unwrap().subgroups.push(sub_id);
        build_subtree(graph, adapter, body, source, sub_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::adapter_for;
    use crate::shared::ports::LanguageId;
    use std::io::Write;

    #[test]
    fn builds_root_node_class_and_method() {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        write!(
            file,
            "class Obj:\n    def a(self):\n        pass\n\n\ndef entry():\n    b = Obj()\n    b.a()\n"
        )
        .unwrap();

        let adapter = adapter_for(LanguageId::Python);
        let mut graph = CallGraph::new();
        let params = LanguageParams::default();
        let file_id = build_file_group(&mut graph, adapter.as_ref(), file.path(), &params, false)
            .unwrap()
            .unwrap();

        let file_group = graph.group(file_id).unwrap();
        assert_eq!(file_group.subgroups.len(), 1);
        // root node + `entry`
        assert_eq!(file_group.nodes.len(), 2);

        let class_id = file_group.subgroups[0];
        let class_group = graph.group(class_id).unwrap();
        assert_eq!(class_group.nodes.len(), 2); // synthetic root + `a`
    }
}
