// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tree traversal and queries.
//!
//! Every traversal is a plain [`Iterator`] over [`Node`] handles: elements
//! are produced on demand, entirely on the caller's stack. A traversal value
//! is single-pass — consuming it advances it, and an exhausted traversal
//! stays exhausted — while calling the traversal method again starts a fresh
//! walk. Stopping consumption at any point is safe; no external resources
//! are held.
//!
//! # Orders
//!
//! - [`Node::walk`] — depth-first **pre-order**: a node before any of its
//!   descendants, children left to right in structural order.
//! - [`Node::walk_leaves_first`] — **post-order**: a node's entire subtree
//!   before the node itself; the traversal root comes last.
//!
//! Both visit every node of a finite tree exactly once and neither recurses,
//! so tree depth is bounded by the heap, not the call stack.

use crate::node::Node;
use crate::property::NodeData;

// ============================================================================
// Traversal orders
// ============================================================================

/// Which traversal strategy an order-parameterized query should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    /// Depth-first pre-order.
    PreOrder,
    /// Post-order, leaves first, root last.
    LeavesFirst,
}

/// Pre-order traversal. Created by [`Node::walk`].
pub struct Walk {
    stack: Vec<Node>,
}

impl Iterator for Walk {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        // Push children in reverse so the first child is popped next.
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

struct Frame {
    node: Node,
    children: Vec<Node>,
    cursor: usize,
}

/// Post-order traversal. Created by [`Node::walk_leaves_first`].
///
/// Keeps one frame per depth holding the current sibling list and a cursor
/// into it: descend to the leftmost unvisited leaf, yield it, and pop back
/// up through fully consumed sibling lists, yielding each owner on the way.
pub struct LeavesFirst {
    frames: Vec<Frame>,
}

impl Iterator for LeavesFirst {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        loop {
            let frame = self.frames.last_mut()?;
            if frame.cursor < frame.children.len() {
                let child = frame.children[frame.cursor].clone();
                frame.cursor += 1;
                let children = child.children();
                self.frames.push(Frame {
                    node: child,
                    children,
                    cursor: 0,
                });
            } else {
                let frame = self.frames.pop()?;
                return Some(frame.node);
            }
        }
    }
}

/// Parent-chain traversal. Created by [`Node::walk_ancestors`].
pub struct Ancestors {
    current: Option<Node>,
}

impl Iterator for Ancestors {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.current.take()?;
        self.current = node.parent();
        self.current.clone()
    }
}

/// An order-selected traversal. Created by [`Node::walk_in`].
pub enum OrderedWalk {
    /// Pre-order strategy.
    PreOrder(Walk),
    /// Leaves-first strategy.
    LeavesFirst(LeavesFirst),
}

impl Iterator for OrderedWalk {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        match self {
            OrderedWalk::PreOrder(walk) => walk.next(),
            OrderedWalk::LeavesFirst(walk) => walk.next(),
        }
    }
}

/// A traversal with the root filtered out. Created by
/// [`Node::walk_descendants`].
pub struct Descendants {
    root: Node,
    inner: OrderedWalk,
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        loop {
            let node = self.inner.next()?;
            // Filtered by identity: a descendant that happens to equal the
            // root structurally still comes through.
            if !node.ptr_eq(&self.root) {
                return Some(node);
            }
        }
    }
}

// ============================================================================
// Traversal and query surface
// ============================================================================

impl Node {
    /// Depth-first pre-order traversal of this node and its descendants.
    ///
    /// ```
    /// use arbor::{Node, NodeData};
    ///
    /// #[derive(Debug, Clone, PartialEq, NodeData)]
    /// struct Tree {
    ///     pub tag: String,
    ///     pub children: Vec<Node>,
    /// }
    ///
    /// fn tree(tag: &str, children: Vec<Node>) -> Node {
    ///     Node::new(Tree { tag: tag.to_string(), children })
    /// }
    ///
    /// let root = tree("root", vec![tree("a", vec![tree("c", vec![])]), tree("b", vec![])]);
    ///
    /// let pre: Vec<String> = root
    ///     .walk()
    ///     .map(|n| n.with_data::<Tree, _>(|t| t.tag.clone()).unwrap())
    ///     .collect();
    /// assert_eq!(pre, ["root", "a", "c", "b"]);
    ///
    /// let post: Vec<String> = root
    ///     .walk_leaves_first()
    ///     .map(|n| n.with_data::<Tree, _>(|t| t.tag.clone()).unwrap())
    ///     .collect();
    /// assert_eq!(post, ["c", "a", "b", "root"]);
    /// ```
    pub fn walk(&self) -> Walk {
        Walk {
            stack: vec![self.clone()],
        }
    }

    /// Post-order traversal: every node after its entire subtree, this node
    /// last.
    pub fn walk_leaves_first(&self) -> LeavesFirst {
        LeavesFirst {
            frames: vec![Frame {
                node: self.clone(),
                children: self.children(),
                cursor: 0,
            }],
        }
    }

    /// The parent chain, nearest first, ending at the root.
    ///
    /// Requires parent references to have been assigned; ancestors above the
    /// point where assignment stopped are simply absent, not an error.
    pub fn walk_ancestors(&self) -> Ancestors {
        Ancestors {
            current: Some(self.clone()),
        }
    }

    /// The traversal selected by `order`.
    pub fn walk_in(&self, order: WalkOrder) -> OrderedWalk {
        match order {
            WalkOrder::PreOrder => OrderedWalk::PreOrder(self.walk()),
            WalkOrder::LeavesFirst => OrderedWalk::LeavesFirst(self.walk_leaves_first()),
        }
    }

    /// Pre-order traversal of the descendants, excluding this node itself.
    pub fn walk_descendants(&self) -> Descendants {
        self.walk_descendants_in(WalkOrder::PreOrder)
    }

    /// The traversal selected by `order`, excluding this node itself.
    pub fn walk_descendants_in(&self, order: WalkOrder) -> Descendants {
        Descendants {
            root: self.clone(),
            inner: self.walk_in(order),
        }
    }

    /// The first node in pre-order satisfying `predicate`.
    ///
    /// Short-circuits: no further nodes are visited once a match is found.
    pub fn find(&self, predicate: impl FnMut(&Node) -> bool) -> Option<Node> {
        self.walk().find(predicate)
    }

    /// The first node in the given order satisfying `predicate`.
    pub fn find_in(
        &self,
        order: WalkOrder,
        predicate: impl FnMut(&Node) -> bool,
    ) -> Option<Node> {
        self.walk_in(order).find(predicate)
    }

    /// Every node in pre-order whose concrete variant is `T`.
    pub fn collect_by_type<T: NodeData>(&self) -> Vec<Node> {
        self.collect_by_type_in::<T>(WalkOrder::PreOrder)
    }

    /// Every node in the given order whose concrete variant is `T`.
    pub fn collect_by_type_in<T: NodeData>(&self, order: WalkOrder) -> Vec<Node> {
        self.walk_in(order).filter(|node| node.is::<T>()).collect()
    }

    /// Invoke `op` for every node in pre-order whose concrete variant is `T`.
    pub fn process_nodes_of_type<T: NodeData>(&self, mut op: impl FnMut(&Node)) {
        for node in self.walk() {
            if node.is::<T>() {
                op(&node);
            }
        }
    }

    /// Pre-order structural recursion invoking `op(node, immediate_parent)`.
    ///
    /// The parent handed to `op` is the one threaded through the recursion
    /// from the direct caller — the root gets `None` — independent of
    /// whether parent back-references have been assigned. Only the direct
    /// parent is available, no deeper ancestors.
    pub fn process_considering_direct_parent(&self, mut op: impl FnMut(&Node, Option<&Node>)) {
        fn go(node: &Node, parent: Option<&Node>, op: &mut dyn FnMut(&Node, Option<&Node>)) {
            op(node, parent);
            for child in node.children() {
                go(&child, Some(node), op);
            }
        }
        go(self, None, &mut op);
    }
}
