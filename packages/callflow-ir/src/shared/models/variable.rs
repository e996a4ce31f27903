//! A named reference visible inside a function body.

use super::ids::{GroupId, NodeId};

/// What a Variable's token resolves to, once the resolver has run.
///
/// `UnknownModule` is the sentinel for a receiver known not to resolve further
/// (e.g. an import from a third-party package) — distinct from simply not yet
/// having been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariablePointee {
    Node(NodeId),
    Group(GroupId),
    UnknownModule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub token: String,
    pub points_to: Option<VariablePointee>,
    pub line_number: u32,
    /// Set by the Builder for an assignment like `x = ClassName(...)`; the name
    /// the Resolver should look up against known class Groups (§4.3.2). Cleared
    /// (left `None`) for every other kind of Variable, including import-derived
    /// ones, which instead carry their lookup key in `token` directly.
    pub construction_hint: Option<String>,
}

impl Variable {
    pub fn unresolved(token: impl Into<String>, line_number: u32) -> Self {
        Variable {
            token: token.into(),
            points_to: None,
            line_number,
            construction_hint: None,
        }
    }

    pub fn from_construction(
        token: impl Into<String>,
        line_number: u32,
        class_name: impl Into<String>,
    ) -> Self {
        Variable {
            token: token.into(),
            points_to: None,
            line_number,
            construction_hint: Some(class_name.into()),
        }
    }

    pub fn pointing_to(
        token: impl Into<String>,
        line_number: u32,
        pointee: VariablePointee,
    ) -> Self {
        Variable {
            token: token.into(),
            points_to: Some(pointee),
            line_number,
            construction_hint: None,
        }
    }

    pub fn is_unknown_module(&self) -> bool {
        matches!(self.points_to, Some(VariablePointee::UnknownModule))
    }
}
