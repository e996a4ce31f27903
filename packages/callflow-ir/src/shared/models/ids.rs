//! Arena indices for the Group/Node containment tree.
//!
//! The tree is stored flat (`Vec<Group>` / `Vec<Node>` in the builder's arena) and
//! addressed by these small integer ids rather than by reference, so a Node's parent
//! pointer and a Group's child lists are plain `Copy` values instead of borrows into
//! a self-referential structure.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}
