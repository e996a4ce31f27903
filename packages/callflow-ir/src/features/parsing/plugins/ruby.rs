//! Ruby `LanguageAdapter`.

use std::fs;
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser};

use crate::errors::{CallflowError, Result};
use crate::features::parsing::adapter::{LanguageAdapter, LanguageParams, Namespaces, ParsedFile};
use crate::shared::models::{Call, Group, GroupId, GroupType, Node, Variable};
use crate::shared::ports::LanguageId;
use crate::shared::utils::tree_sitter::node_line_number;

pub struct RubyAdapter;

impl LanguageAdapter for RubyAdapter {
    fn language_id(&self) -> LanguageId {
        LanguageId::Ruby
    }

    fn assert_dependencies(&self) -> Result<()> {
        Ok(())
    }

    fn is_library_file(&self, path: &Path, _params: &LanguageParams) -> bool {
        let s = path.to_string_lossy();
        s.contains("/vendor/") || s.contains("/gems/")
    }

    fn get_tree(&self, path: &Path, _params: &LanguageParams) -> Result<ParsedFile> {
        let source = fs::read_to_string(path)?;
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::language())
            .map_err(|e| CallflowError::parse(path, e.to_string()))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| CallflowError::parse(path, "tree-sitter returned no tree"))?;
        Ok(ParsedFile { tree, source })
    }

    fn separate_namespaces<'a>(&self, root: TsNode<'a>) -> Namespaces<'a> {
        let mut ns = Namespaces {
            subgroups: Vec::new(),
            nodes: Vec::new(),
            body: Vec::new(),
        };
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "method" | "singleton_method" => ns.nodes.push(child),
                "class" | "module" => ns.subgroups.push(child),
                _ => ns.body.push(child),
            }
        }
        ns
    }

    fn make_nodes(&self, node_tree: TsNode<'_>, source: &str, parent: GroupId) -> Vec<Node> {
        let Some(name_node) = node_tree.child_by_field_name("name") else {
            return Vec::new();
        };
        let token = text(name_node, source);
        let mut node = Node::new(&token, node_line_number(&node_tree), parent);
        node.is_constructor = token == "initialize";
        if let Some(body) = node_tree.child_by_field_name("body") {
            collect_calls(body, source, &mut node.calls);
        }
        vec![node]
    }

    fn make_root_node(&self, body: &[TsNode<'_>], source: &str, parent: GroupId) -> Node {
        let mut node = Node::root(parent);
        for &stmt in body {
            collect_calls(stmt, source, &mut node.calls);
        }
        node
    }

    fn make_class_group<'a>(
        &self,
        subgroup_tree: TsNode<'a>,
        source: &str,
        parent: Option<GroupId>,
    ) -> (Group, TsNode<'a>) {
        let name = subgroup_tree
            .child_by_field_name("name")
            .map(|n| text(n, source))
            .unwrap_or_default();
        let group_type = if subgroup_tree.kind() == "module" {
            GroupType::Namespace
        } else {
            GroupType::Class
        };
        let mut group = Group::new(group_type, name, parent);
        if let Some(superclass) = subgroup_tree.child_by_field_name("superclass") {
            group.inherits_names.push(text(superclass, source));
        }
        let body = subgroup_tree
            .child_by_field_name("body")
            .unwrap_or(subgroup_tree);
        (group, body)
    }

    fn file_import_tokens(&self, parsed: &ParsedFile) -> Vec<Variable> {
        // Ruby has no static import-binding syntax comparable to Python/JS:
        // `require`/`require_relative` load a file for its side effects and
        // bind nothing into scope. There is nothing to extract here.
        let _ = parsed;
        Vec::new()
    }
}

fn text(node: TsNode<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default()
        .to_string()
}

fn collect_calls(node: TsNode<'_>, source: &str, out: &mut Vec<Call>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "method" | "singleton_method" | "class" | "module" => continue,
            "call" => {
                if let Some(c) = make_call_with_receiver(child, source) {
                    out.push(c);
                }
                if let Some(args) = child.child_by_field_name("arguments") {
                    collect_calls(args, source, out);
                }
            }
            "method_call" => {
                if let Some(c) = make_bare_call(child, source) {
                    out.push(c);
                }
                if let Some(args) = child.child_by_field_name("arguments") {
                    collect_calls(args, source, out);
                }
            }
            _ => collect_calls(child, source, out),
        }
    }
}

fn make_call_with_receiver(call_node: TsNode<'_>, source: &str) -> Option<Call> {
    let method = call_node.child_by_field_name("method")?;
    let receiver = call_node.child_by_field_name("receiver");
    let line = node_line_number(&call_node);
    Some(Call::new(
        text(method, source),
        receiver.map(|r| text(r, source)),
        line,
    ))
}

fn make_bare_call(call_node: TsNode<'_>, source: &str) -> Option<Call> {
    let method = call_node.child_by_field_name("method")?;
    Some(Call::new(text(method, source), None, node_line_number(&call_node)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_ruby::language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        ParsedFile {
            tree,
            source: source.to_string(),
        }
    }

    #[test]
    fn separates_method_and_class() {
        let parsed = parse("def entry\n  handle\nend\nclass Obj\nend\n");
        let adapter = RubyAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        assert_eq!(ns.nodes.len(), 1);
        assert_eq!(ns.subgroups.len(), 1);
    }

    #[test]
    fn initialize_is_constructor() {
        let parsed = parse("class Obj\n  def initialize\n  end\nend\n");
        let adapter = RubyAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let (_group, body) = adapter.make_class_group(ns.subgroups[0], &parsed.source, None);
        let inner = adapter.separate_namespaces(body);
        let nodes = adapter.make_nodes(inner.nodes[0], &parsed.source, GroupId(0));
        assert!(nodes[0].is_constructor);
    }
}
