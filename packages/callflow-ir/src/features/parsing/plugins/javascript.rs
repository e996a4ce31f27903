//! JavaScript `LanguageAdapter` (also handles `.mjs`, per the closed language
//! mapping in SPEC_FULL.md §4.1).

use std::fs;
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser};

use crate::errors::{CallflowError, Result};
use crate::features::parsing::adapter::{LanguageAdapter, LanguageParams, Namespaces, ParsedFile};
use crate::shared::models::{Call, Group, GroupId, GroupType, Node, Variable};
use crate::shared::ports::LanguageId;
use crate::shared::utils::tree_sitter::node_line_number;

pub struct JavaScriptAdapter;

impl LanguageAdapter for JavaScriptAdapter {
    fn language_id(&self) -> LanguageId {
        LanguageId::JavaScript
    }

    fn assert_dependencies(&self) -> Result<()> {
        Ok(())
    }

    fn is_library_file(&self, path: &Path, _params: &LanguageParams) -> bool {
        path.to_string_lossy().contains("node_modules")
    }

    fn get_tree(&self, path: &Path, _params: &LanguageParams) -> Result<ParsedFile> {
        let source = fs::read_to_string(path)?;
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::language())
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
                "function_declaration" => ns.nodes.push(child),
                "class_declaration" => ns.subgroups.push(child),
                // `const f = function() {}` / `const f = () => {}`
                "lexical_declaration" | "variable_declaration" => {
                    if is_function_assignment(child) {
                        ns.nodes.push(child);
                    } else {
                        ns.body.push(child);
                    }
                }
                _ => ns.body.push(child),
            }
        }
        ns
    }

    fn make_nodes(&self, node_tree: TsNode<'_>, source: &str, parent: GroupId) -> Vec<Node> {
        let (name, body) = match node_tree.kind() {
            "function_declaration" => (
                node_tree
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or_default(),
                node_tree.child_by_field_name("body"),
            ),
            _ => {
                let Some(decl) = find_variable_declarator(node_tree) else {
                    return Vec::new();
                };
                let name = decl
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                let func = decl.child_by_field_name("value");
                (name, func.and_then(|f| f.child_by_field_name("body")))
            }
        };
        let mut node = Node::new(name, node_line_number(&node_tree), parent);
        if let Some(body) = body {
            collect_calls(body, source, &mut node.calls);
            collect_constructor_assignments(body, source, &mut node.variables);
        }
        vec![node]
    }

    fn make_root_node(&self, body: &[TsNode<'_>], source: &str, parent: GroupId) -> Node {
        let mut node = Node::root(parent);
        for &stmt in body {
            collect_calls(stmt, source, &mut node.calls);
            collect_constructor_assignments(stmt, source, &mut node.variables);
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
        if let Some(heritage) = subgroup_tree.child_by_field_name("superclass") {
            group.inherits_names.push(text(heritage, source));
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
            if child.kind() == "import_statement" {
                extract_import(child, &parsed.source, &mut out);
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

fn is_function_assignment(decl: TsNode<'_>) -> bool {
    find_variable_declarator(decl).is_some()
}

fn find_variable_declarator(decl: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut cursor = decl.walk();
    decl.children(&mut cursor).find(|c| {
        c.kind() == "variable_declarator"
            && matches!(
                c.child_by_field_name("value").map(|v| v.kind()),
                Some("function_expression") | Some("arrow_function")
            )
    })
}

/// Skips nested function/class subtrees — at file/class level those get their own
/// Node via `separate_namespaces`. A closure nested inside another function's body
/// is the exception: it never gets a Node, so this drops its calls entirely (see
/// `python.rs`'s `nested_closure_calls_are_dropped`, same limitation here).
fn collect_calls(node: TsNode<'_>, source: &str, out: &mut Vec<Call>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_declaration" | "class_declaration" | "function_expression"
            | "arrow_function" => continue,
            "call_expression" => {
                if let Some(call) = make_call(child, source) {
                    out.push(call);
                }
                if let Some(args) = child.child_by_field_name("arguments") {
                    collect_calls(args, source, out);
                }
            }
            _ => collect_calls(child, source, out),
        }
    }
}

fn make_call(call_node: TsNode<'_>, source: &str) -> Option<Call> {
    let func = call_node.child_by_field_name("function")?;
    let line = node_line_number(&call_node);
    match func.kind() {
        "identifier" => Some(Call::new(text(func, source), None, line)),
        "member_expression" => {
            let owner = func.child_by_field_name("object")?;
            let prop = func.child_by_field_name("property")?;
            Some(Call::new(text(prop, source), Some(text(owner, source)), line))
        }
        _ => None,
    }
}

fn collect_constructor_assignments(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_declaration" | "class_declaration" | "function_expression"
            | "arrow_function" => continue,
            "variable_declarator" => {
                if let (Some(name), Some(value)) = (
                    child.child_by_field_name("name"),
                    child.child_by_field_name("value"),
                ) {
                    if name.kind() == "identifier" && value.kind() == "new_expression" {
                        if let Some(ctor) = value.child_by_field_name("constructor") {
                            out.push(Variable::from_construction(
                                text(name, source),
                                node_line_number(&child),
                                text(ctor, source),
                            ));
                        }
                    }
                }
                collect_constructor_assignments(child, source, out);
            }
            _ => collect_constructor_assignments(child, source, out),
        }
    }
}

fn extract_import(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    if let Some(clause) = node.child_by_field_name("import") {
        collect_import_identifiers(clause, source, out, node_line_number(&node));
    }
}

fn collect_import_identifiers(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>, line: u32) {
    match node.kind() {
        "identifier" => out.push(Variable::unresolved(text(node, source), line)),
        "import_specifier" => {
            let token = node
                .child_by_field_name("alias")
                .or_else(|| node.child_by_field_name("name"))
                .map(|n| text(n, source));
            if let Some(token) = token {
                out.push(Variable::unresolved(token, line));
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_import_identifiers(child, source, out, line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::language())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        ParsedFile {
            tree,
            source: source.to_string(),
        }
    }

    #[test]
    fn separates_function_declaration() {
        let parsed = parse("function entry() { handle(); }\nclass Obj {}\n");
        let adapter = JavaScriptAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        assert_eq!(ns.nodes.len(), 1);
        assert_eq!(ns.subgroups.len(), 1);
    }

    #[test]
    fn member_call_captures_owner() {
        let parsed = parse("function entry() { obj.run(); }\n");
        let adapter = JavaScriptAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let nodes = adapter.make_nodes(ns.nodes[0], &parsed.source, GroupId(0));
        assert_eq!(nodes[0].calls[0].token, "run");
        assert_eq!(nodes[0].calls[0].owner_token.as_deref(), Some("obj"));
    }
}
