// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A generic traversal, query, and editing engine for typed syntax trees.
//!
//! Arbor works uniformly over an open set of node variants: given any tree
//! whose variants describe their *structural properties* (the slots holding
//! owned child nodes), it can enumerate children, walk the tree in several
//! orders, locate or collect nodes, and apply structural edits — without a
//! line of hand-written traversal code per variant.
//!
//! # Overview
//!
//! - **Structural model**: each variant implements [`NodeData`] — usually
//!   via `#[derive(NodeData)]` — exposing an ordered property schema.
//!   Derived values, cross-references ([`Link`]), and non-public fields stay
//!   outside the model; child order is declaration order.
//! - **Traversal**: [`Node::walk`] (pre-order), [`Node::walk_leaves_first`]
//!   (post-order), [`Node::walk_ancestors`], [`Node::walk_descendants`], and
//!   the query layer ([`Node::find`], [`Node::collect_by_type`], …) — all
//!   lazy, single-pass iterators.
//! - **Copy-rebuild editing**: [`Node::map_tree`] and [`Node::transform`]
//!   produce a new tree, sharing every unchanged subtree with the original.
//! - **In-place editing**: [`Node::transform_tree`] and the
//!   [`Node::replace_with`] family mutate structural slots directly and keep
//!   parent back-references consistent.
//! - **Parent maintenance**: [`Node::assign_parents`] rewires parent
//!   references after any edit made outside the in-place operations.
//!
//! # Quick start
//!
//! ```
//! use arbor::{Node, NodeData, WalkOrder};
//!
//! #[derive(Debug, Clone, PartialEq, NodeData)]
//! struct Block {
//!     pub stmts: Vec<Node>,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, NodeData)]
//! struct Word {
//!     pub text: String,
//! }
//!
//! let hello = Node::new(Word { text: "hello".to_string() });
//! let world = Node::new(Word { text: "world".to_string() });
//! let block = Node::new(Block {
//!     stmts: vec![hello.clone(), world.clone()],
//! });
//! block.assign_parents();
//!
//! // Traverse lazily, in either order.
//! assert_eq!(block.walk().count(), 3);
//! let last = block.walk_in(WalkOrder::LeavesFirst).last().unwrap();
//! assert_eq!(last.kind(), "Block");
//!
//! // Edit in place; parent links follow.
//! let there = Node::new(Word { text: "there".to_string() });
//! world.replace_with(&there).unwrap();
//! assert!(there.parent().unwrap().ptr_eq(&block));
//! assert!(world.parent().is_none());
//! ```
//!
//! # Two editing strategies
//!
//! Copy-rebuild treats the tree as immutable: a callback maps child values,
//! changed ancestors are reconstructed, untouched subtrees are shared by
//! handle, and the original tree stays valid. In-place mutation writes the
//! one affected slot and leaves every ancestor alone. They fail differently
//! too: rebuilds only need reconstruction to succeed, while in-place edits
//! require a write accessor on the slot ([`TreeError::ImmutableProperty`]),
//! a growable list for insertions and removals
//! ([`TreeError::UnsupportedShape`]), and an assigned parent for the
//! operations that navigate upwards ([`TreeError::ParentNotSet`]).
//!
//! # Single-threaded by design
//!
//! Trees are `Rc`-based and meant for one logical owner at a time; there is
//! no internal locking or parallel traversal. Traversals run entirely on the
//! caller's stack and can be dropped at any point.

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Error types for structural edits.
pub mod error;
pub use error::TreeError;

/// Node handles, child derivation, and parent maintenance.
pub mod node;
pub use node::{Link, Node};

/// The structural property model and the per-variant provider contract.
pub mod property;
pub use property::{NodeData, PropertyDescription, PropertySpec, PropertyValue, SlotKind};

/// Tree traversal and queries.
pub mod walk;
pub use walk::{Ancestors, Descendants, LeavesFirst, OrderedWalk, Walk, WalkOrder};

mod mutate;
mod rebuild;

#[cfg(test)]
mod fixtures;

/// Derives [`NodeData`] for a non-generic struct with named fields.
///
/// Public fields are classified by declared type — `Node`, `Option<Node>`,
/// `Vec<Node>`, and `Box<[Node]>` become structural slots, everything else
/// is leaf data — with `#[ast(readonly)]`, `#[ast(derived)]`, and
/// `#[ast(link)]` adjusting the classification. Requires `Clone`,
/// `PartialEq`, and `Debug` on the struct.
pub use arbor_derive::NodeData;
