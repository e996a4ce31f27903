//! Projector: deterministic ordering and emission (SPEC_FULL.md §4.6).

mod dot;
mod json;

use std::path::Path;
use std::process::Command;

use tracing::warn;

use crate::errors::{CallflowError, Result};
use crate::shared::models::{CallGraph, Edge, GroupId, NodeId};

pub use dot::render_dot;
pub use json::render_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Dot,
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(OutputFormat::Json),
            Some("dot") | Some("gv") => Ok(OutputFormat::Dot),
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            other => Err(CallflowError::config(format!(
                "unrecognized output extension {:?}; expected one of json, dot, gv, png, svg",
                other.unwrap_or("")
            ))),
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Svg)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectorOptions {
    pub hide_legend: bool,
    pub no_grouping: bool,
}

/// Trunk node: no incoming edges. Leaf node: no outgoing edges. Plain node:
/// both in-degree and out-degree are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Node,
    Trunk,
    Leaf,
}

pub fn node_kind(graph: &CallGraph, node: NodeId) -> NodeKind {
    let has_incoming = graph.edges.iter().any(|e| e.target == node);
    let has_outgoing = graph.edges.iter().any(|e| e.source == node);
    match (has_incoming, has_outgoing) {
        (false, _) => NodeKind::Trunk,
        (_, false) => NodeKind::Leaf,
        _ => NodeKind::Node,
    }
}

/// Sorted node/edge ordering shared by both text emitters: file Groups by
/// token, Nodes by `(file token, qualified name, line_number)`, Edges by
/// `(source uid, target uid, call-site line)`. Distinct call-sites to the same
/// target keep their own edge — no deduplication, matching the original's
/// never-collapsed edge list.
pub fn ordered_view(graph: &CallGraph) -> (Vec<NodeId>, Vec<Edge>) {
    let mut nodes: Vec<NodeId> = graph.node_ids().collect();
    nodes.sort_by(|&a, &b| {
        let fa = graph.node_file(a).map(|g| graph.group(g).unwrap().token.clone()).unwrap_or_default();
        let fb = graph.node_file(b).map(|g| graph.group(g).unwrap().token.clone()).unwrap_or_default();
        (fa, graph.name(a), graph.node(a).unwrap().line_number)
            .cmp(&(fb, graph.name(b), graph.node(b).unwrap().line_number))
    });

    let mut edges = graph.edges.clone();
    edges.sort_by_key(|e| (e.source, e.target, e.call_line));

    (nodes, edges)
}

pub fn sorted_file_groups(graph: &CallGraph) -> Vec<GroupId> {
    let mut groups: Vec<GroupId> = graph.file_groups().collect();
    groups.sort_by_key(|&g| graph.group(g).unwrap().token.clone());
    groups
}

/// Writes `graph` to `output_path` in the format implied by its suffix.
/// Image formats are produced by rendering DOT to a sibling `.gv` file and
/// shelling out to the `dot` binary; its absence must already have been
/// checked by `assert_dot_available` at startup (§4.6/§7).
pub fn emit(
    graph: &CallGraph,
    output_path: &Path,
    options: &ProjectorOptions,
) -> Result<()> {
    let format = OutputFormat::from_path(output_path)?;
    match format {
        OutputFormat::Json => {
            std::fs::write(output_path, render_json(graph))?;
        }
        OutputFormat::Dot => {
            std::fs::write(output_path, render_dot(graph, options))?;
        }
        OutputFormat::Png | OutputFormat::Svg => {
            let gv_path = output_path.with_extension("gv");
            std::fs::write(&gv_path, render_dot(graph, options))?;
            let fmt = if format == OutputFormat::Png { "png" } else { "svg" };
            let status = Command::new("dot")
                .arg(format!("-T{fmt}"))
                .arg(&gv_path)
                .arg("-o")
                .arg(output_path)
                .status();
            match status {
                Ok(s) if s.success() => {}
                Ok(s) => warn!(
                    code = ?s.code(),
                    gv = %gv_path.display(),
                    "dot exited non-zero rendering the image; inspect the .gv file directly"
                ),
                Err(e) => warn!(
                    error = %e,
                    gv = %gv_path.display(),
                    "failed to invoke dot; inspect the .gv file directly"
                ),
            }
        }
    }
    Ok(())
}

/// Fails fast at startup when an image format was requested but the `dot`
/// binary isn't on PATH (§4.6/§7's `DependencyError`).
pub fn assert_dot_available() -> Result<()> {
    match Command::new("dot").arg("-V").output() {
        Ok(_) => Ok(()),
        Err(e) => Err(CallflowError::dependency(format!(
            "the `dot` binary is required for image output but was not found: {e}"
        ))),
    }
}
