// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Copy-rebuild editing for trees treated as immutable.
//!
//! Both operations here produce a new tree reflecting a per-node callback
//! while *sharing* every unchanged subtree with the original by handle. A
//! node is only reconstructed — through
//! [`NodeData::with_overrides`](crate::NodeData::with_overrides) — when at
//! least one of its structural values actually changed by value equality;
//! otherwise the original handle is returned untouched.
//!
//! Rebuilding never maintains parent back-references: shared subtrees keep
//! pointing at their original parents until
//! [`Node::assign_parents`](crate::Node::assign_parents) runs on the new
//! root.
//!
//! [`Node::map_tree`] is the single-level primitive: the callback runs once
//! per direct structural value and is itself responsible for any recursion.
//! [`Node::transform`] is the whole-subtree form, recursing bottom-up before
//! applying the callback to the (possibly rebuilt) node.

use tracing::trace;

use crate::error::TreeError;
use crate::node::Node;
use crate::property::PropertyValue;

impl Node {
    /// Apply `op` to each direct structural child value and rebuild this
    /// node if any of them changed.
    ///
    /// For a single-valued slot the callback receives the child; for a
    /// collection-valued slot it receives each element. If every result is
    /// value-equal to the original, the node itself is returned — same
    /// handle, no rebuild. Otherwise a new node of the same concrete variant
    /// is constructed with the changed values, every other field copied
    /// verbatim.
    ///
    /// The callback is **not** applied to this node, and the engine does not
    /// recurse: a deep rewrite either recurses inside the callback or uses
    /// [`Node::transform`].
    ///
    /// ```
    /// use arbor::{Node, NodeData};
    ///
    /// #[derive(Debug, Clone, PartialEq, NodeData)]
    /// struct List {
    ///     pub items: Vec<Node>,
    /// }
    ///
    /// #[derive(Debug, Clone, PartialEq, NodeData)]
    /// struct Num {
    ///     pub value: i64,
    /// }
    ///
    /// let list = Node::new(List {
    ///     items: vec![Node::new(Num { value: 1 }), Node::new(Num { value: 2 })],
    /// });
    ///
    /// // Nothing changes: the original handle comes back.
    /// let same = list.map_tree(|child| child.clone()).unwrap();
    /// assert!(same.ptr_eq(&list));
    ///
    /// // Bump every number: the list is rebuilt.
    /// let bumped = list
    ///     .map_tree(|child| {
    ///         let value = child.with_data::<Num, _>(|n| n.value).unwrap();
    ///         Node::new(Num { value: value + 1 })
    ///     })
    ///     .unwrap();
    /// assert!(!bumped.ptr_eq(&list));
    /// assert_eq!(
    ///     bumped.children()[0].with_data::<Num, _>(|n| n.value),
    ///     Some(2)
    /// );
    /// ```
    pub fn map_tree(&self, mut op: impl FnMut(&Node) -> Node) -> Result<Node, TreeError> {
        self.map_tree_with(&mut op)
    }

    fn map_tree_with(&self, op: &mut dyn FnMut(&Node) -> Node) -> Result<Node, TreeError> {
        let mut overrides: Vec<(&str, PropertyValue)> = Vec::new();
        for spec in self.specs() {
            if !spec.kind.provides_nodes() {
                continue;
            }
            match self.get_property(spec.name) {
                Some(PropertyValue::Node(child)) => {
                    let mapped = op(&child);
                    if mapped != child {
                        overrides.push((spec.name, PropertyValue::Node(mapped)));
                    }
                }
                Some(PropertyValue::Nodes(children)) => {
                    let mut changed = false;
                    let mapped: Vec<Node> = children
                        .iter()
                        .map(|child| {
                            let mapped = op(child);
                            if mapped != *child {
                                changed = true;
                            }
                            mapped
                        })
                        .collect();
                    if changed {
                        overrides.push((spec.name, PropertyValue::Nodes(mapped)));
                    }
                }
                _ => {}
            }
        }
        self.rebuild_with(overrides)
    }

    /// Rebuild the whole subtree bottom-up, then apply `op` to the (possibly
    /// rebuilt) node to produce the result.
    ///
    /// Children are transformed before their parent, with the same change
    /// detection and structural sharing as [`Node::map_tree`]: a subtree
    /// nothing changed in is shared by handle, and a node whose children all
    /// came back equal is not reconstructed.
    ///
    /// The callback additionally runs once against each *original* node with
    /// its result dropped, so callbacks with side effects observe every node
    /// twice. This mirrors the engine's long-standing observable behavior;
    /// the test suite pins it down.
    pub fn transform(&self, mut op: impl FnMut(&Node) -> Node) -> Result<Node, TreeError> {
        self.transform_with(&mut op)
    }

    fn transform_with(&self, op: &mut dyn FnMut(&Node) -> Node) -> Result<Node, TreeError> {
        // First invocation, result dropped.
        let _ = op(self);
        let mut overrides: Vec<(&str, PropertyValue)> = Vec::new();
        for spec in self.specs() {
            if !spec.kind.provides_nodes() {
                continue;
            }
            match self.get_property(spec.name) {
                Some(PropertyValue::Node(child)) => {
                    let transformed = child.transform_with(op)?;
                    if transformed != child {
                        overrides.push((spec.name, PropertyValue::Node(transformed)));
                    }
                }
                Some(PropertyValue::Nodes(children)) => {
                    let mut changed = false;
                    let mut transformed = Vec::with_capacity(children.len());
                    for child in &children {
                        let result = child.transform_with(op)?;
                        if result != *child {
                            changed = true;
                        }
                        transformed.push(result);
                    }
                    if changed {
                        overrides.push((spec.name, PropertyValue::Nodes(transformed)));
                    }
                }
                _ => {}
            }
        }
        let rebuilt = self.rebuild_with(overrides)?;
        Ok(op(&rebuilt))
    }

    fn rebuild_with(&self, overrides: Vec<(&str, PropertyValue)>) -> Result<Node, TreeError> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        trace!(
            node = self.kind(),
            slots = overrides.len(),
            "rebuilding node with changed slots"
        );
        let rebuilt = self.data().with_overrides(&overrides)?;
        Ok(Node::from_boxed(rebuilt))
    }
}
