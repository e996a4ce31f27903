//! Small tree-sitter helper shared by every language adapter.

use tree_sitter::Node;

/// A node's 1-indexed starting line. The data model tracks only `line_number`
/// (no column/range), so this is the one conversion the rest of the crate needs.
#[inline]
pub fn node_line_number(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    #[test]
    fn test_node_line_number() {
        let code = "x = 1\ndef foo():\n    pass";
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::language()).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let root = tree.root_node();
        let func = root.child(1).unwrap();

        assert_eq!(node_line_number(&func), 2);
    }
}
