// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! In-place editing for trees whose structural slots are mutable.
//!
//! These operations mutate the targeted slot directly instead of rebuilding
//! ancestors, and they are the only edits (besides
//! [`Node::assign_parents`](crate::Node::assign_parents)) that maintain
//! parent back-references: nodes written out of a slot become detached,
//! nodes written in become attached to the owning node.
//!
//! All operations are single-level. [`Node::transform_tree`] rewrites the
//! direct child slots of one node; the `replace`/`add`/`remove` family
//! locates the target in a mutable child list of its *immediate* parent —
//! never transitively further up — and edits that one list. Operations that
//! navigate via the parent back-reference require it to be assigned and fail
//! with [`TreeError::ParentNotSet`] otherwise.
//!
//! A failing edit never leaves a half-written slot: validation happens
//! before the write, and a single slot write either fully succeeds or the
//! operation returns an error with the tree untouched.

use tracing::trace;

use crate::error::TreeError;
use crate::node::Node;
use crate::property::PropertyValue;

impl Node {
    /// Apply `op` to each direct structural child and write changed results
    /// back into their slots.
    ///
    /// Change detection is value equality; returning an equal node leaves
    /// the slot alone. Writing a single-valued slot with no write accessor
    /// fails with [`TreeError::ImmutableProperty`]; a collection-valued slot
    /// that does not support in-place element replacement fails with
    /// [`TreeError::UnsupportedShape`]. Grandchildren are never visited —
    /// combine with a traversal for deep edits.
    pub fn transform_tree(&self, mut op: impl FnMut(&Node) -> Node) -> Result<(), TreeError> {
        for spec in self.specs() {
            if !spec.kind.provides_nodes() {
                continue;
            }
            match self.get_property(spec.name) {
                Some(PropertyValue::Node(child)) => {
                    let mapped = op(&child);
                    if mapped == child {
                        continue;
                    }
                    if !spec.mutable {
                        return Err(TreeError::immutable(self.kind(), spec.name));
                    }
                    trace!(node = self.kind(), slot = spec.name, "replacing child");
                    self.set_property(spec.name, PropertyValue::Node(mapped.clone()))?;
                    child.set_parent(None);
                    mapped.set_parent(Some(self));
                }
                Some(PropertyValue::Nodes(children)) => {
                    let mut mapped = children.clone();
                    let mut changed_at = Vec::new();
                    for (index, child) in children.iter().enumerate() {
                        let result = op(child);
                        if result != *child {
                            mapped[index] = result;
                            changed_at.push(index);
                        }
                    }
                    if changed_at.is_empty() {
                        continue;
                    }
                    if !spec.mutable {
                        return Err(TreeError::unsupported_shape(
                            self.kind(),
                            spec.name,
                            "child list does not support in-place element replacement",
                        ));
                    }
                    trace!(
                        node = self.kind(),
                        slot = spec.name,
                        replaced = changed_at.len(),
                        "replacing list elements"
                    );
                    self.set_property(spec.name, PropertyValue::Nodes(mapped.clone()))?;
                    for index in changed_at {
                        children[index].set_parent(None);
                        mapped[index].set_parent(Some(self));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Find the first mutable child list containing `target` (by value
    /// equality), let `edit` rework it, and write it back.
    ///
    /// Scanning stops at the first list containing the target. A length
    /// change on a fixed-size list fails before anything is written.
    fn with_mutable_list_containing(
        &self,
        target: &Node,
        edit: impl FnOnce(&mut Vec<Node>, usize),
    ) -> Result<(), TreeError> {
        for spec in self.specs() {
            if !spec.kind.multiple() || !spec.mutable {
                continue;
            }
            let Some(PropertyValue::Nodes(list)) = self.get_property(spec.name) else {
                continue;
            };
            let Some(index) = list.iter().position(|child| child == target) else {
                continue;
            };
            let original_len = list.len();
            let mut edited = list;
            edit(&mut edited, index);
            if edited.len() != original_len && !spec.kind.growable() {
                return Err(TreeError::unsupported_shape(
                    self.kind(),
                    spec.name,
                    format!(
                        "fixed-size child list holds {original_len} nodes, cannot resize to {}",
                        edited.len()
                    ),
                ));
            }
            trace!(node = self.kind(), slot = spec.name, index, "editing child list");
            return self.set_property(spec.name, PropertyValue::Nodes(edited));
        }
        Err(TreeError::target_not_found(self.kind()))
    }

    /// Replace this node with `other` in its parent's structural slot.
    ///
    /// Works for single-valued and collection-valued slots alike. Fails with
    /// [`TreeError::ParentNotSet`] when detached. Afterwards this node is
    /// detached and `other` is attached to the parent.
    pub fn replace_with(&self, other: &Node) -> Result<(), TreeError> {
        let parent = self
            .parent()
            .ok_or_else(|| TreeError::parent_not_set("replace_with"))?;
        parent.transform_tree(|child| {
            if child.ptr_eq(self) {
                other.clone()
            } else {
                child.clone()
            }
        })
    }

    /// Replace this node with `replacements`, in order, at its position in
    /// its parent's mutable child list.
    pub fn replace_with_several(&self, replacements: &[Node]) -> Result<(), TreeError> {
        let parent = self
            .parent()
            .ok_or_else(|| TreeError::parent_not_set("replace_with_several"))?;
        parent.replace_child_with_several(self, replacements)
    }

    /// Replace `target` with `replacements`, in order, at its position in
    /// one of this node's mutable child lists.
    ///
    /// `target` becomes detached; each replacement becomes attached to this
    /// node.
    pub fn replace_child_with_several(
        &self,
        target: &Node,
        replacements: &[Node],
    ) -> Result<(), TreeError> {
        self.with_mutable_list_containing(target, |list, index| {
            list.remove(index);
            for (offset, node) in replacements.iter().enumerate() {
                list.insert(index + offset, node.clone());
            }
        })?;
        target.set_parent(None);
        for node in replacements {
            node.set_parent(Some(self));
        }
        Ok(())
    }

    /// Insert `new_nodes` immediately before this node in its parent's
    /// mutable child list.
    pub fn add_several_before(&self, new_nodes: &[Node]) -> Result<(), TreeError> {
        let parent = self
            .parent()
            .ok_or_else(|| TreeError::parent_not_set("add_several_before"))?;
        parent.insert_several_before(self, new_nodes)
    }

    /// Insert `new_nodes` immediately after this node in its parent's
    /// mutable child list.
    pub fn add_several_after(&self, new_nodes: &[Node]) -> Result<(), TreeError> {
        let parent = self
            .parent()
            .ok_or_else(|| TreeError::parent_not_set("add_several_after"))?;
        parent.insert_several_after(self, new_nodes)
    }

    /// Insert `new_nodes` immediately before `target` in one of this node's
    /// mutable child lists. The inserted nodes become attached to this node.
    pub fn insert_several_before(&self, target: &Node, new_nodes: &[Node]) -> Result<(), TreeError> {
        self.with_mutable_list_containing(target, |list, index| {
            for (offset, node) in new_nodes.iter().enumerate() {
                list.insert(index + offset, node.clone());
            }
        })?;
        for node in new_nodes {
            node.set_parent(Some(self));
        }
        Ok(())
    }

    /// Insert `new_nodes` immediately after `target` in one of this node's
    /// mutable child lists. The inserted nodes become attached to this node.
    pub fn insert_several_after(&self, target: &Node, new_nodes: &[Node]) -> Result<(), TreeError> {
        self.with_mutable_list_containing(target, |list, index| {
            for (offset, node) in new_nodes.iter().enumerate() {
                list.insert(index + 1 + offset, node.clone());
            }
        })?;
        for node in new_nodes {
            node.set_parent(Some(self));
        }
        Ok(())
    }

    /// Remove this node from its parent's mutable child list and detach it.
    pub fn remove_from_list(&self) -> Result<(), TreeError> {
        let parent = self
            .parent()
            .ok_or_else(|| TreeError::parent_not_set("remove_from_list"))?;
        parent.remove_child_from_list(self)
    }

    /// Remove `target` from one of this node's mutable child lists and
    /// detach it.
    pub fn remove_child_from_list(&self, target: &Node) -> Result<(), TreeError> {
        self.with_mutable_list_containing(target, |list, index| {
            list.remove(index);
        })?;
        target.set_parent(None);
        Ok(())
    }
}
