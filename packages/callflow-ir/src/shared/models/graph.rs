//! The arena owning every Group and Node produced for a run, plus the Edge list
//! the resolver fills in. Builder owns creation, Filters own removal, Resolver
//! owns variable/edge mutation, Subset/Trimmer own detachment — see SPEC_FULL.md §5.

use super::edge::Edge;
use super::group::{Group, GroupType};
use super::ids::{GroupId, NodeId};
use super::node::Node;

#[derive(Debug, Default)]
pub struct CallGraph {
    groups: Vec<Option<Group>>,
    nodes: Vec<Option<Node>>,
    pub edges: Vec<Edge>,
}

impl CallGraph {
    pub fn new() -> Self {
        CallGraph::default()
    }

    pub fn push_group(&mut self, group: Group) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(Some(group));
        id
    }

    pub fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0 as usize).and_then(|g| g.as_ref())
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.0 as usize).and_then(|g| g.as_mut())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(|n| n.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(|n| n.as_mut())
    }

    /// Detach a node from its parent group and the arena. Idempotent: removing an
    /// already-removed node is a no-op, matching the Group/Node removal invariant
    /// in SPEC_FULL.md §3.
    pub fn remove_node(&mut self, id: NodeId) {
        let parent = match self.node(id) {
            Some(n) => n.parent,
            None => return,
        };
        if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
            *slot = None;
        }
        if let Some(group) = self.group_mut(parent) {
            group.nodes.retain(|&n| n != id);
        }
    }

    /// Detach a group from its parent's subgroup list and the arena. Any nodes or
    /// subgroups still owned by it are orphaned (callers are expected to have
    /// already trimmed them, as trimming always removes children before parents).
    pub fn remove_group(&mut self, id: GroupId) {
        let parent = match self.group(id) {
            Some(g) => g.parent,
            None => return,
        };
        if let Some(slot) = self.groups.get_mut(id.0 as usize) {
            *slot = None;
        }
        if let Some(parent_id) = parent {
            if let Some(group) = self.group_mut(parent_id) {
                group.subgroups.retain(|&g| g != id);
            }
        }
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|_| NodeId(i as u32)))
    }

    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|_| GroupId(i as u32)))
    }

    pub fn file_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.group_ids()
            .filter(move |&id| self.group(id).unwrap().parent.is_none())
    }

    pub fn all_nodes_in(&self, group: GroupId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_nodes(group, &mut out);
        out
    }

    fn collect_nodes(&self, group: GroupId, out: &mut Vec<NodeId>) {
        let Some(g) = self.group(group) else {
            return;
        };
        out.extend(g.nodes.iter().copied());
        for &sub in &g.subgroups {
            self.collect_nodes(sub, out);
        }
    }

    pub fn all_groups_in(&self, group: GroupId) -> Vec<GroupId> {
        let mut out = vec![group];
        let Some(g) = self.group(group) else {
            return out;
        };
        for &sub in &g.subgroups {
            out.extend(self.all_groups_in(sub));
        }
        out
    }

    /// Ancestor chain starting at `group` and walking up to (and including) its
    /// root file group.
    pub fn ancestors(&self, group: GroupId) -> Vec<GroupId> {
        let mut chain = Vec::new();
        let mut cur = Some(group);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.group(id).and_then(|g| g.parent);
        }
        chain
    }

    pub fn node_file(&self, node: NodeId) -> Option<GroupId> {
        let n = self.node(node)?;
        self.ancestors(n.parent).into_iter().last()
    }

    /// `<class_token>.<func_token>` for a method, or just `<func_token>` for a
    /// top-level function or the root node (§9: fixed with no file prefix).
    pub fn token_with_ownership(&self, node: NodeId) -> String {
        let n = match self.node(node) {
            Some(n) => n,
            None => return String::new(),
        };
        match self.group(n.parent) {
            Some(parent) if parent.group_type == GroupType::Class => {
                format!("{}.{}", parent.token, n.token)
            }
            _ => n.token.clone(),
        }
    }

    /// `<file_token>::<token_with_ownership>`, the fully-qualified form used by
    /// subset-target matching and the JSON schema's `name` field.
    pub fn name(&self, node: NodeId) -> String {
        let file_token = self
            .node_file(node)
            .and_then(|g| self.group(g))
            .map(|g| g.token.as_str())
            .unwrap_or("");
        format!("{}::{}", file_token, self.token_with_ownership(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::group::GroupType;

    #[test]
    fn remove_node_detaches_from_parent() {
        let mut g = CallGraph::new();
        let file = g.push_group(Group::new(GroupType::File, "app", None));
        let node = g.push_node(Node::new("run", 1, file));
        g.group_mut(file).unwrap().nodes.push(node);

        g.remove_node(node);

        assert!(g.node(node).is_none());
        assert!(g.group(file).unwrap().nodes.is_empty());
    }

    #[test]
    fn remove_node_is_idempotent() {
        let mut g = CallGraph::new();
        let file = g.push_group(Group::new(GroupType::File, "app", None));
        let node = g.push_node(Node::new("run", 1, file));
        g.remove_node(node);
        g.remove_node(node);
        assert!(g.node(node).is_none());
    }

    #[test]
    fn all_nodes_in_walks_subgroups() {
        let mut g = CallGraph::new();
        let file = g.push_group(Group::new(GroupType::File, "app", None));
        let class = g.push_group(Group::new(GroupType::Class, "Obj", Some(file)));
        g.group_mut(file).unwrap().subgroups.push(class);
        let method = g.push_node(Node::new("run", 2, class));
        g.group_mut(class).unwrap().nodes.push(method);

        let all = g.all_nodes_in(file);
        assert_eq!(all, vec![method]);
    }
}
