//! DOT emission (SPEC_FULL.md §6's DOT output, §9's splines threshold).

use std::fmt::Write as _;

use crate::shared::models::{CallGraph, GroupId};

use super::{node_kind, ordered_view, sorted_file_groups, NodeKind, ProjectorOptions};

const LEGEND: &str = r#"subgraph cluster_legend {
  label="Legend";
  Legend [shape=none, margin=0, label=<
    <table border="0" cellborder="1" cellspacing="0" cellpadding="4">
      <tr><td bgcolor="#FFFFFF">Regular function</td></tr>
      <tr><td bgcolor="#E6F5FF">Trunk (no incoming calls)</td></tr>
      <tr><td bgcolor="#FFF3E6">Leaf (no outgoing calls)</td></tr>
      <tr><td>A -&gt; B means A calls B</td></tr>
    </table>
  >];
}
"#;

fn fill_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Node => "#FFFFFF",
        NodeKind::Trunk => "#E6F5FF",
        NodeKind::Leaf => "#FFF3E6",
    }
}

/// `digraph G { concentrate=true; splines=...; rankdir="LR"; [legend] <nodes>
/// <edges> [cluster per top-level Group] }`.
pub fn render_dot(graph: &CallGraph, options: &ProjectorOptions) -> String {
    let (nodes, edges) = ordered_view(graph);
    let splines = if edges.len() >= 500 { "polyline" } else { "ortho" };

    let mut out = String::new();
    writeln!(out, "digraph G {{").unwrap();
    writeln!(out, "concentrate=true;").unwrap();
    writeln!(out, "splines=\"{splines}\";").unwrap();
    writeln!(out, "rankdir=\"LR\";").unwrap();

    if !options.hide_legend {
        out.push_str(LEGEND);
    }

    for &id in &nodes {
        let uid = id.to_string();
        let label = graph.token_with_ownership(id);
        let color = fill_color(node_kind(graph, id));
        writeln!(
            out,
            "{uid} [label=\"{label}\", style=filled, fillcolor=\"{color}\"];"
        )
        .unwrap();
    }

    for edge in &edges {
        writeln!(out, "{} -> {};", edge.source, edge.target).unwrap();
    }

    if !options.no_grouping {
        for group_id in sorted_file_groups(graph) {
            write_cluster(graph, group_id, &mut out);
        }
    }

    writeln!(out, "}}").unwrap();
    out
}

fn write_cluster(graph: &CallGraph, group: GroupId, out: &mut String) {
    let g = graph.group(group).unwrap();
    writeln!(out, "subgraph cluster_{group} {{").unwrap();
    writeln!(out, "label=\"{}\";", g.display_name).unwrap();
    for &node in &g.nodes {
        writeln!(out, "{node};").unwrap();
    }
    for &sub in &g.subgroups {
        write_cluster(graph, sub, out);
    }
    writeln!(out, "}}").unwrap();
}
