//! Python `LanguageAdapter`.
//!
//! Node-kind matching follows the shape of `extractors/call.rs` and
//! `extractors/import.rs` in the codegraph-ir parsing feature: walk by
//! tree-sitter field name where the grammar exposes one, fall back to a
//! positional child scan otherwise.

use std::fs;
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser};

use crate::errors::{CallflowError, Result};
use crate::features::parsing::adapter::{LanguageAdapter, LanguageParams, Namespaces, ParsedFile};
use crate::shared::models::{Call, Group, GroupId, GroupType, Node, Variable};
use crate::shared::ports::LanguageId;
use crate::shared::utils::tree_sitter::node_line_number;

pub struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language_id(&self) -> LanguageId {
        LanguageId::Python
    }

    fn assert_dependencies(&self) -> Result<()> {
        Ok(())
    }

    fn is_library_file(&self, path: &Path, _params: &LanguageParams) -> bool {
        let s = path.to_string_lossy();
        s.contains("site-packages") || s.contains(".venv") || s.contains("/venv/")
    }

    fn get_tree(&self, path: &Path, _params: &LanguageParams) -> Result<ParsedFile> {
        let source = fs::read_to_string(path)?;
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
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
            classify_statement(child, &mut ns);
        }
        ns
    }

    fn make_nodes(&self, node_tree: TsNode<'_>, source: &str, parent: GroupId) -> Vec<Node> {
        let def = unwrap_decorated(node_tree);
        let Some(name_node) = def.child_by_field_name("name") else {
            return Vec::new();
        };
        let token = text(name_node, source);
        let mut node = Node::new(&token, node_line_number(&def), parent);
        node.is_constructor = token == "__init__";
        if let Some(body) = def.child_by_field_name("body") {
            collect_calls(body, source, &mut node.calls);
            collect_assignment_variables(body, source, &mut node.variables);
        }
        vec![node]
    }

    fn make_root_node(&self, body: &[TsNode<'_>], source: &str, parent: GroupId) -> Node {
        let mut node = Node::root(parent);
        for &stmt in body {
            collect_calls(stmt, source, &mut node.calls);
            collect_assignment_variables(stmt, source, &mut node.variables);
        }
        node
    }

    fn make_class_group<'a>(
        &self,
        subgroup_tree: TsNode<'a>,
        source: &str,
        parent: Option<GroupId>,
    ) -> (Group, TsNode<'a>) {
        let def = unwrap_decorated(subgroup_tree);
        let name = def
            .child_by_field_name("name")
            .map(|n| text(n, source))
            .unwrap_or_default();
        let mut group = Group::new(GroupType::Class, name, parent);
        if let Some(bases) = def.child_by_field_name("superclasses") {
            let mut cursor = bases.walk();
            for arg in bases.children(&mut cursor) {
                match arg.kind() {
                    "identifier" | "attribute" => {
                        group.inherits_names.push(text(arg, source));
                    }
                    _ => {}
                }
            }
        }
        let body = def.child_by_field_name("body").unwrap_or(def);
        (group, body)
    }

    fn file_import_tokens(&self, parsed: &ParsedFile) -> Vec<Variable> {
        let root = parsed.tree.root_node();
        let mut out = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "import_statement" => extract_import_statement(child, &parsed.source, &mut out),
                "import_from_statement" => {
                    extract_import_from_statement(child, &parsed.source, &mut out)
                }
                _ => {}
            }
        }
        out
    }
}

fn classify_statement<'a>(child: TsNode<'a>, ns: &mut Namespaces<'a>) {
    match child.kind() {
        "function_definition" => ns.nodes.push(child),
        "class_definition" => ns.subgroups.push(child),
        "decorated_definition" => match unwrap_decorated(child).kind() {
            "class_definition" => ns.subgroups.push(child),
            _ => ns.nodes.push(child),
        },
        _ => ns.body.push(child),
    }
}

fn unwrap_decorated(node: TsNode<'_>) -> TsNode<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn text(node: TsNode<'_>, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or_default()
        .to_string()
}

/// Depth-first collection of `call` expressions inside a subtree, in source order.
/// Does not descend into nested `function_definition`/`class_definition` bodies:
/// at the top level of a file or class body those get their own Node/Group via
/// `separate_namespaces`, so their calls belong there, not here. A function
/// nested inside another function's body is a different case — `separate_namespaces`
/// is never re-run on a function body, so a closure gets no Node of its own and
/// this skip drops its calls/variables entirely rather than misattributing them
/// to the enclosing function. Known limitation; see `nested_closure_calls_are_dropped`.
fn collect_calls(node: TsNode<'_>, source: &str, out: &mut Vec<Call>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" | "decorated_definition" => continue,
            "call" => {
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
        "attribute" => {
            let owner = func.child_by_field_name("object")?;
            let attr = func.child_by_field_name("attribute")?;
            Some(Call::new(text(attr, source), Some(text(owner, source)), line))
        }
        _ => None,
    }
}

/// `x = ClassName(...)` assignments — the one variable-producing pattern the
/// resolver's class-instantiation rule (§4.3.2) needs from the Builder.
fn collect_assignment_variables(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" | "decorated_definition" => continue,
            "assignment" => {
                if let (Some(left), Some(right)) = (
                    child.child_by_field_name("left"),
                    child.child_by_field_name("right"),
                ) {
                    if left.kind() == "identifier" && right.kind() == "call" {
                        if let Some(func) = right.child_by_field_name("function") {
                            if func.kind() == "identifier" {
                                out.push(Variable::from_construction(
                                    text(left, source),
                                    node_line_number(&child),
                                    text(func, source),
                                ));
                            }
                        }
                    }
                }
                collect_assignment_variables(child, source, out);
            }
            _ => collect_assignment_variables(child, source, out),
        }
    }
}

fn extract_import_statement(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => out.push(Variable::unresolved(
                text(child, source),
                node_line_number(&node),
            )),
            "aliased_import" => {
                if let Some(alias) = child.child_by_field_name("alias") {
                    out.push(Variable::unresolved(
                        text(alias, source),
                        node_line_number(&node),
                    ));
                }
            }
            _ => {}
        }
    }
}

fn extract_import_from_statement(node: TsNode<'_>, source: &str, out: &mut Vec<Variable>) {
    let module_name_node = node.child_by_field_name("module_name");
    let module_name = module_name_node
        .map(|n| text(n, source))
        .unwrap_or_default();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let is_module_name = module_name_node.map(|m| m == child).unwrap_or(false);
        match child.kind() {
            "dotted_name" if !is_module_name => {
                out.push(Variable::unresolved(
                    text(child, source),
                    node_line_number(&node),
                ));
            }
            "aliased_import" => {
                if let Some(alias) = child.child_by_field_name("alias") {
                    out.push(Variable::unresolved(
                        text(alias, source),
                        node_line_number(&node),
                    ));
                }
            }
            "wildcard_import" => out.push(Variable::unresolved(
                format!("{module_name}.*"),
                node_line_number(&node),
            )),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        ParsedFile {
            tree,
            source: source.to_string(),
        }
    }

    #[test]
    fn separates_function_and_class() {
        let parsed = parse("def a():\n    pass\nclass B:\n    pass\nx = 1\n");
        let adapter = PythonAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        assert_eq!(ns.nodes.len(), 1);
        assert_eq!(ns.subgroups.len(), 1);
        assert_eq!(ns.body.len(), 1);
    }

    #[test]
    fn plain_call_has_no_owner() {
        let parsed = parse("def entry():\n    handle()\n");
        let adapter = PythonAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let nodes = adapter.make_nodes(ns.nodes[0], &parsed.source, GroupId(0));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].calls.len(), 1);
        assert!(!nodes[0].calls[0].is_attr());
        assert_eq!(nodes[0].calls[0].token, "handle");
    }

    #[test]
    fn attr_call_captures_owner() {
        let parsed = parse("def entry():\n    b = Obj()\n    b.a()\n");
        let adapter = PythonAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let nodes = adapter.make_nodes(ns.nodes[0], &parsed.source, GroupId(0));
        let calls = &nodes[0].calls;
        assert!(calls.iter().any(|c| c.token == "Obj" && !c.is_attr()));
        assert!(calls
            .iter()
            .any(|c| c.token == "a" && c.owner_token.as_deref() == Some("b")));
        assert_eq!(nodes[0].variables.len(), 1);
        assert_eq!(nodes[0].variables[0].construction_hint.as_deref(), Some("Obj"));
    }

    #[test]
    fn class_group_collects_base_names() {
        let parsed = parse("class Sub(Base):\n    def step(self):\n        pass\n");
        let adapter = PythonAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let (group, _body) = adapter.make_class_group(ns.subgroups[0], &parsed.source, None);
        assert_eq!(group.token, "Sub");
        assert_eq!(group.inherits_names, vec!["Base".to_string()]);
    }

    /// Known limitation: a function nested inside another function's body (a
    /// closure) never gets its own Node — `separate_namespaces` only runs on
    /// file/class bodies — so its calls are dropped rather than attributed to
    /// either the closure or the enclosing function.
    #[test]
    fn nested_closure_calls_are_dropped() {
        let parsed = parse("def outer():\n    def inner():\n        helper()\n    inner()\n");
        let adapter = PythonAdapter;
        let ns = adapter.separate_namespaces(parsed.tree.root_node());
        let nodes = adapter.make_nodes(ns.nodes[0], &parsed.source, GroupId(0));
        let calls: Vec<_> = nodes[0].calls.iter().map(|c| c.token.as_str()).collect();
        assert_eq!(calls, vec!["inner"]);
        assert!(!calls.contains(&"helper"));
    }

    #[test]
    fn import_from_statement_collects_names() {
        let parsed = parse("from pkg import run, helper as h\n");
        let adapter = PythonAdapter;
        let imports = adapter.file_import_tokens(&parsed);
        let tokens: Vec<_> = imports.iter().map(|v| v.token.as_str()).collect();
        assert!(tokens.contains(&"run"));
        assert!(tokens.contains(&"h"));
    }
}
