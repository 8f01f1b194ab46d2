//! This module implements the rooted phylogenetic trees the clade search works on.  Nodes live in
//! an arena owned by the tree and refer to their parent and children by index, so cloning a tree
//! produces a fully independent copy that can be rerooted and relabelled without affecting the
//! original.
//!
//! Trees are normally built by the Newick parser through a `TreeBuilder`.

use slab::Slab;
use std::collections::VecDeque;
use thiserror::Error;

/// The error raised when a structural operation cannot be applied to the tree
#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {

    /// The root was given as the outgroup of a reroot
    #[error("cannot reroot a tree on its own root")]
    RootAsOutgroup,

    /// The node has no path to the root of the tree
    #[error("node {0} is not attached to the tree")]
    Detached(usize),
}

/// The type used to represent tree nodes
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Node(usize);

impl Node {
    /// Access the ID of this node
    pub fn id(&self) -> usize {
        self.0
    }
}

/// The info stored for every node
#[derive(Clone, Debug)]
struct NodeData {

    /// The node's name; leaves always have one
    name: Option<String>,

    /// Parent
    parent: Option<Node>,

    /// Children, in input order
    children: Vec<Node>,
}

/// A rooted, ordered phylogenetic tree
#[derive(Clone, Debug)]
pub struct Tree {

    /// The set of nodes in the tree
    nodes: Slab<NodeData>,

    /// The root of the tree
    root: Node,
}

/// Add a node with the given name and children to the arena and make it the parent of its children
fn insert_node(nodes: &mut Slab<NodeData>, name: Option<String>, children: Vec<Node>) -> Node {
    let node = Node(nodes.insert(NodeData {
        name,
        parent: None,
        children: vec![],
    }));
    for &child in &children {
        nodes[child.0].parent = Some(node);
    }
    nodes[node.0].children = children;
    node
}

impl Tree {

    /// The number of nodes in this tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node of this tree
    pub fn root(&self) -> Node {
        self.root
    }

    /// The name of a node, if it has one
    pub fn name(&self, node: Node) -> Option<&str> {
        self.nodes[node.0].name.as_ref().map(String::as_str)
    }

    /// Overwrite the name of a node
    pub fn rename<S: Into<String>>(&mut self, node: Node, name: S) {
        self.nodes[node.0].name = Some(name.into());
    }

    /// The parent of a node; `None` for the root
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.nodes[node.0].parent
    }

    /// The children of a node in order
    pub fn children(&self, node: Node) -> &[Node] {
        &self.nodes[node.0].children
    }

    /// Is the given node a leaf?
    pub fn is_leaf(&self, node: Node) -> bool {
        self.nodes[node.0].children.is_empty()
    }

    /// All nodes of the tree in level order, starting at the root.  Every search over the whole
    /// tree uses this order, so "first found" is well defined.
    pub fn traverse(&self) -> Vec<Node> {
        let mut order = Vec::with_capacity(self.node_count());
        let mut queue = VecDeque::new();
        queue.push_back(self.root);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            queue.extend(self.children(node).iter().copied());
        }
        order
    }

    /// The leaves in the subtree rooted at `node`, left to right
    pub fn leaves(&self, node: Node) -> Vec<Node> {
        let mut leaves = vec![];
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if self.is_leaf(node) {
                leaves.push(node);
            } else {
                stack.extend(self.children(node).iter().rev().copied());
            }
        }
        leaves
    }

    /// The number of leaves in the subtree rooted at `node`
    pub fn leaf_count(&self, node: Node) -> usize {
        self.leaves(node).len()
    }

    /// The names of the leaves in the subtree rooted at `node`, left to right
    pub fn leaf_names(&self, node: Node) -> impl Iterator<Item = &str> + '_ {
        self.leaves(node).into_iter().filter_map(move |leaf| self.name(leaf))
    }

    /// The first node in level order with the given name
    pub fn find_by_name(&self, name: &str) -> Option<Node> {
        self.traverse().into_iter().find(|&node| self.name(node) == Some(name))
    }

    /// The leaf with the given name, ignoring internal nodes that carry the same label
    pub fn find_leaf(&self, name: &str) -> Option<Node> {
        self.leaves(self.root).into_iter().find(|&leaf| self.name(leaf) == Some(name))
    }

    /// Check whether a leaf with the given name belongs to the subtree rooted at `node`
    pub fn subtree_contains(&self, node: Node, name: &str) -> bool {
        self.leaf_names(node).any(|leaf| leaf == name)
    }

    /// Reroot the tree on the edge above `outgroup`.
    ///
    /// The root node stays the root.  Afterwards its children are `outgroup` followed by a single
    /// node holding the rest of the tree: the path from `outgroup`'s former parent up to the old
    /// root is reversed, and if the old root had more than two children, the ones not on that path
    /// are grouped under a new unnamed node.
    pub fn reroot(&mut self, outgroup: Node) -> Result<(), Error> {
        let root = self.root;
        let outgroup_parent = match self.parent(outgroup) {
            Some(parent) => parent,
            None if outgroup == root => return Err(Error::RootAsOutgroup),
            None => return Err(Error::Detached(outgroup.0)),
        };

        // Find the child of the root whose subtree contains the outgroup
        let mut top = outgroup;
        while self.parent(top) != Some(root) {
            top = self.parent(top).ok_or(Error::Detached(outgroup.0))?;
        }

        // Everything hanging off the root besides `top` is joined into one branch
        self.detach(top);
        let rest = std::mem::replace(&mut self.nodes[root.0].children, vec![]);
        let down = match rest.len() {
            0 => None,
            1 => Some(rest[0]),
            _ => Some(insert_node(&mut self.nodes, None, rest)),
        };

        let sibling = if outgroup_parent == root {
            down
        } else {
            // Turn the path from the outgroup's parent up to `top` upside down
            let mut node = outgroup_parent;
            let mut new_parent = None;
            while node != top {
                let up = self.parent(node).ok_or(Error::Detached(node.0))?;
                self.nodes[up.0].children.retain(|&child| child != node);
                self.nodes[node.0].children.push(up);
                self.nodes[node.0].parent = new_parent;
                new_parent = Some(node);
                node = up;
            }
            if let Some(down) = down {
                self.nodes[top.0].children.push(down);
                self.nodes[down.0].parent = Some(top);
            }
            self.nodes[top.0].parent = new_parent;

            self.nodes[outgroup_parent.0].children.retain(|&child| child != outgroup);
            Some(outgroup_parent)
        };

        let mut children = vec![outgroup];
        children.extend(sibling);
        for &child in &children {
            self.nodes[child.0].parent = Some(root);
        }
        self.nodes[root.0].children = children;
        Ok(())
    }

    /// Remove a node from its parent's list of children
    fn detach(&mut self, node: Node) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }
}

/// Builder used by the Newick parser to assemble a tree bottom-up
pub struct TreeBuilder {

    /// The nodes created so far
    nodes: Slab<NodeData>,
}

impl TreeBuilder {

    /// Create a new builder with no nodes
    pub fn new() -> Self {
        TreeBuilder { nodes: Slab::new() }
    }

    /// Create a new leaf with the given name
    pub fn new_leaf(&mut self, name: String) -> Node {
        insert_node(&mut self.nodes, Some(name), vec![])
    }

    /// Create a new internal node with the given children and optional name
    pub fn new_node(&mut self, children: Vec<Node>, name: Option<String>) -> Node {
        insert_node(&mut self.nodes, name, children)
    }

    /// Finish the tree, making `root` its root
    pub fn finish(self, root: Node) -> Tree {
        Tree {
            nodes: self.nodes,
            root,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
