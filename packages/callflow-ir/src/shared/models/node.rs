//! A function-like entity: the call graph's vertex type.

use super::call::Call;
use super::ids::GroupId;
use super::variable::Variable;

#[derive(Debug, Clone)]
pub struct Node {
    pub token: String,
    pub line_number: u32,
    pub is_constructor: bool,
    /// Calls made inside this node's body, in source order.
    pub calls: Vec<Call>,
    /// Variables visible inside this node's body; grows during resolution
    /// (inheritance injection, import resolution).
    pub variables: Vec<Variable>,
    pub parent: GroupId,
    /// True for the synthetic node standing in for a file's top-level statements.
    pub is_root: bool,
}

impl Node {
    pub fn new(token: impl Into<String>, line_number: u32, parent: GroupId) -> Self {
        Node {
            token: token.into(),
            line_number,
            is_constructor: false,
            calls: Vec::new(),
            variables: Vec::new(),
            parent,
            is_root: false,
        }
    }

    pub fn root(parent: GroupId) -> Self {
        let mut n = Node::new("(root)", 0, parent);
        n.is_root = true;
        n
    }

    /// Variables in scope at `line_number`: everything assigned/imported on or
    /// before that line. The source-order invariant on `calls`/`variables` makes
    /// this a simple prefix filter rather than a true scope walk.
    pub fn variables_in_scope(&self, line_number: u32) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(move |v| v.line_number <= line_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_node_is_marked() {
        let n = Node::root(GroupId(0));
        assert!(n.is_root);
        assert_eq!(n.line_number, 0);
    }

    #[test]
    fn variables_in_scope_filters_by_line() {
        let mut n = Node::new("handler", 10, GroupId(0));
        n.variables.push(Variable::unresolved("a", 11));
        n.variables.push(Variable::unresolved("b", 15));
        let visible: Vec<_> = n.variables_in_scope(12).map(|v| v.token.as_str()).collect();
        assert_eq!(visible, vec!["a"]);
    }
}
