//! The `LanguageAdapter` trait: the substitution boundary that keeps the
//! Builder/Resolver/Projector language-agnostic (SPEC_FULL.md §4.1).
//!
//! Every AST-shaped operation goes through here. Nothing outside `features::parsing`
//! is allowed to match on a tree-sitter node kind directly.

use std::path::Path;

use tree_sitter::{Node as TsNode, Tree};

use crate::errors::Result;
use crate::shared::models::{Group, GroupId, Node, Variable};
use crate::shared::ports::LanguageId;

/// Per-language knobs threaded through from the CLI (`--source-type`,
/// `--ruby-version`), plus the `exclude_lib_files` switch the adapter consults
/// when classifying a path.
#[derive(Debug, Clone)]
pub struct LanguageParams {
    pub source_type: SourceType,
    pub ruby_version: String,
    pub exclude_lib_files: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

impl Default for LanguageParams {
    fn default() -> Self {
        LanguageParams {
            source_type: SourceType::Script,
            ruby_version: "27".to_string(),
            exclude_lib_files: false,
        }
    }
}

/// A parsed file: the tree plus the source text it was parsed from (tree-sitter
/// nodes only carry byte ranges, so the text has to travel alongside).
pub struct ParsedFile {
    pub tree: Tree,
    pub source: String,
}

/// The three AST partitions `separate_namespaces` produces for one "body root" —
/// either a whole file's root node, or a class's body block when the Builder
/// recurses into a nested class.
pub struct Namespaces<'a> {
    /// Class/module subtrees: each becomes a recursive CLASS/NAMESPACE subgroup.
    pub subgroups: Vec<TsNode<'a>>,
    /// Function/method subtrees: each becomes one or more Nodes.
    pub nodes: Vec<TsNode<'a>>,
    /// Residual top-level statements, folded into the synthetic root Node.
    pub body: Vec<TsNode<'a>>,
}

pub trait LanguageAdapter: Send + Sync {
    fn language_id(&self) -> LanguageId;

    /// Fails fast if the grammar this adapter links against cannot be loaded.
    /// Grammars are compiled in, so in practice this only guards a version
    /// mismatch between the `tree-sitter` core crate and the grammar crate.
    fn assert_dependencies(&self) -> Result<()>;

    /// Heuristic third-party classification (vendored/installed dependency
    /// roots). Only consulted when `exclude_lib_files` is set.
    fn is_library_file(&self, path: &Path, params: &LanguageParams) -> bool;

    fn get_tree(&self, path: &Path, params: &LanguageParams) -> Result<ParsedFile>;

    /// Partitions a body root (a file's root node, or a class's body block) into
    /// nested classes, function-like definitions, and residual statements.
    fn separate_namespaces<'a>(&self, root: TsNode<'a>) -> Namespaces<'a>;

    /// One function-like tree may become more than one Node (e.g. a decorated
    /// definition producing both the wrapper and the wrapped), so this returns a
    /// `Vec`; in practice every adapter shipped here returns exactly one.
    fn make_nodes(&self, node_tree: TsNode<'_>, source: &str, parent: GroupId) -> Vec<Node>;

    fn make_root_node(&self, body: &[TsNode<'_>], source: &str, parent: GroupId) -> Node;

    /// Produces the class/module Group for a subgroup tree, with `inherits`
    /// populated as raw name strings (resolved to Node lists later by the
    /// Resolver, §4.3.1) and a reference to the subgroup's own body root so the
    /// Builder can recurse into it.
    fn make_class_group<'a>(
        &self,
        subgroup_tree: TsNode<'a>,
        source: &str,
        parent: Option<GroupId>,
    ) -> (Group, TsNode<'a>);

    fn file_import_tokens(&self, parsed: &ParsedFile) -> Vec<Variable>;
}
