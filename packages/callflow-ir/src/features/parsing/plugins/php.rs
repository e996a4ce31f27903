//! PHP `LanguageAdapter`.

use std::fs;
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser};

use crate::errors::{CallflowError, Result};
use crate::features::parsing::adapter::{LanguageAdapter, LanguageParams, Namespaces, ParsedFile};
use crate::shared::models::{Call, Group, GroupId, GroupType, Node, Variable};
use crate::shared::ports::LanguageId;
use crate::shared::utils::tree_sitter::node_line_number;

pub struct PhpAdapter;

impl LanguageAdapter for PhpAdapter {
    fn language_id(&self) -> LanguageId {
        LanguageId::Php
    }

    fn assert_dependencies(&self) -> Result<()> {
        Ok(())
    }

    fn is_library_file(&self, path: &Path, _params: &LanguageParams) -> bool {
        path.to_string_lossy().contains("/vendor/")
    }

    fn get_tree(&self, path: &Path, _params: &LanguageParams) -> Result<ParsedFile> {
        let source = fs::read_to_string(path)?;
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::language_php())
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
                "function_definition" | "method_declaration" => ns.nodes.push(child),
                "class_declaration" => ns.subgroups.push(child),
                "php_tag" | "text" => {}
                _ => ns.body.push(child),
            }
        }
        ns
    }

    fn make_nodes(&self, node_tree: TsNode<'_>, source: &str, parent: GroupId) -> Vec<Node> {
        let method_kind = node_tree.kind() == "method_declaration";
        let Some(name_node) = node_tree.child_by_field_name("name") else {
            return Vec::new();
        };
        let token = text(name_node, source);
        let mut node = Node::new(&token, node_line_number(&node_tree), parent);
        if method_kind {
            node.is_constructor = token == "__construct";
        }
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
        let mut group = Group::new(GroupType::Class, name, parent);
        if let Some(base) = subgroup_tree.child_by_field_name("base_clause") {
            let mut cursor = base.walk();
            for child in base.children(&mut cursor) {
                if child.kind() == "name" {
                    group.inherits_names.push(text(child, source));
                }
            }
        }
        let body = subgroup_tree
            .child_by_field_name("body")
            .unwrap_or(subgroup_tree);
        (group, body)
    }

    fn file_import_tokens(&self, parsed: &ParsedFile) -> Vec<Variable> {
        let root = parsed.tree.root_node();
        let mut out = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if matches!(child.kind(), "namespace_use_declaration") {
                collect_use_names(child, &parsed.source, &mut out);
            }
        }
        out
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
            "function_definition" | "class_declaration" | "method_declaration" => continue,
            "function_call_expression" => {
                if let Some(func) = child.child_by_field_name("function") {
                    if func.kind() == "name" {
                        out.push(Call::new(text(func, source), None, node_line_number(&child)));
                    }
                }
                if let Some(args) = child.child_by_field_name("arguments") {
                    collect_calls(args, source, out);
                }
            }
            "member_call_expression" => {
                if let (Some(object), Some(name)) = (
                    child.child_by_field_name("object"),
                    child.child_by_field_name("name"),
                ) {
                    out.push(Call::new(
                        text(name, source),
                        Some(text(object, source)),
                        node_line_number(&child),
                    ));
                }
                if let Some(args) = child.child_by_field_name("arguments") {
                    collect_calls(args, source, out);
                }
            }
            _ => collect_calls(child, source, out),
        }
    }
}

fn collect_use_names(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "namespace_use_clause" {
            let token = child
                .child_by_field_name("alias")
                .or_else(|| child.child_by_field_name("name"))
                .map(|n| text(n, source));
            if let Some(token) = token {
                out.push(Variable::unresolved(token, node_line_number(&node)));
            }
        }
    }
}
