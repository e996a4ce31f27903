//! A namespace container: file, class, or module.

use super::ids::{GroupId, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupType {
    File,
    Class,
    Namespace,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub group_type: GroupType,
    pub token: String,
    pub display_name: String,
    /// For file groups: names imported into this file.
    pub import_tokens: Vec<String>,
    /// For class groups: base-class names as written in source, before the
    /// Resolver's inheritance wiring (§4.3.1) turns them into Node lists.
    pub inherits_names: Vec<String>,
    /// For class groups: resolved base-class node lists, one per base that was
    /// found by name; bases that didn't resolve to a known class are dropped.
    pub inherits: Vec<Vec<NodeId>>,
    pub nodes: Vec<NodeId>,
    pub subgroups: Vec<GroupId>,
    pub parent: Option<GroupId>,
}

impl Group {
    pub fn new(group_type: GroupType, token: impl Into<String>, parent: Option<GroupId>) -> Self {
        let token = token.into();
        Group {
            group_type,
            display_name: token.clone(),
            token,
            import_tokens: Vec::new(),
            inherits_names: Vec::new(),
            inherits: Vec::new(),
            nodes: Vec::new(),
            subgroups: Vec::new(),
            parent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.subgroups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_group_has_no_children() {
        let g = Group::new(GroupType::File, "app", None);
        assert!(g.is_empty());
        assert_eq!(g.parent, None);
    }
}
