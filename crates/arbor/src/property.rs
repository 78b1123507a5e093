// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The structural property model.
//!
//! Every node variant declares an ordered schema of *properties*. A property
//! is either **structural** — its value is, or contains, owned child nodes —
//! or plain **data** carried by the node (leaf values such as names and
//! literals). Structural properties are what traversal and editing operate
//! on; declaration order defines child order.
//!
//! Three kinds of attribute never appear in the schema:
//!
//! - *derived* attributes, computed from other state rather than being an
//!   independent source of truth,
//! - *link* attributes, non-owning references to nodes owned elsewhere in
//!   the tree (see [`Link`](crate::Link)),
//! - the parent back-reference itself, which lives on the node handle and is
//!   not a field of any variant.
//!
//! Non-public fields are likewise excluded.
//!
//! The [`NodeData`] trait is the per-variant contract the engine consumes.
//! It is usually generated with `#[derive(NodeData)]`, but can be written by
//! hand when a variant needs a registration-table style schema (the unit
//! tests of this crate do exactly that).

use std::any::Any;
use std::fmt;

use crate::error::TreeError;
use crate::node::Node;

// ============================================================================
// Schema
// ============================================================================

/// The declared shape of one property slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A required single child (`Node`).
    Child,
    /// An optional single child (`Option<Node>`).
    OptionalChild,
    /// A growable ordered child collection (`Vec<Node>`).
    ChildList,
    /// A fixed-size ordered child collection (`Box<[Node]>`). Elements may
    /// be replaced in place, but the list cannot change length.
    FixedChildList,
    /// Non-structural leaf data. Never contributes children.
    Data,
}

impl SlotKind {
    /// Whether the declared type would hold nodes.
    pub fn provides_nodes(self) -> bool {
        !matches!(self, SlotKind::Data)
    }

    /// Whether the slot is collection-valued.
    pub fn multiple(self) -> bool {
        matches!(self, SlotKind::ChildList | SlotKind::FixedChildList)
    }

    /// Whether the slot supports insertions and removals, not just element
    /// replacement.
    pub fn growable(self) -> bool {
        matches!(self, SlotKind::ChildList)
    }
}

/// One entry of a variant's static schema.
///
/// Schema order is declaration order and is stable for a given variant; the
/// engine relies on it for deterministic child order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    /// Property name, unique within the variant.
    pub name: &'static str,
    /// Declared slot shape.
    pub kind: SlotKind,
    /// Whether the slot has a write accessor. Immutable slots can still be
    /// overridden during copy-rebuild, which constructs a fresh variant.
    pub mutable: bool,
}

// ============================================================================
// Runtime values
// ============================================================================

/// The runtime value of one property slot.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// An empty optional child slot.
    Empty,
    /// A single child node.
    Node(Node),
    /// An ordered run of child nodes.
    Nodes(Vec<Node>),
    /// Non-structural leaf data, rendered with `Debug`.
    Data(String),
}

impl PropertyValue {
    /// Short human-readable name of the value's shape, for error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            PropertyValue::Empty => "an empty slot",
            PropertyValue::Node(_) => "a single child",
            PropertyValue::Nodes(_) => "a child list",
            PropertyValue::Data(_) => "leaf data",
        }
    }
}

/// A snapshot of one property at a point in time: its name, its declared
/// classification, and its current value.
///
/// Produced by [`Node::properties`](crate::Node::properties) for consumers
/// that need to reason about a node's shape without knowing its concrete
/// variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescription {
    /// Property name.
    pub name: &'static str,
    /// Whether the declared type would hold nodes.
    pub provides_nodes: bool,
    /// Whether the property is collection-valued.
    pub multiple: bool,
    /// The current runtime value.
    pub value: PropertyValue,
}

// ============================================================================
// The per-variant contract
// ============================================================================

/// The capability a node variant supplies to the engine: an ordered property
/// schema, by-name slot access, and reconstruction with overrides.
///
/// Implementations must be deterministic and order-stable: `specs()` returns
/// the same slice for every instance of the variant, in field declaration
/// order, and `get`/`set`/`with_overrides` accept exactly the names listed
/// there.
///
/// # Contract
///
/// - `get(name)` returns the current value of the named slot, or `None` for
///   a name the schema does not declare.
/// - `set(name, value)` writes a structural slot in place. It fails with
///   [`TreeError::ImmutableProperty`] for slots without a write accessor
///   (including data fields), [`TreeError::UnsupportedShape`] when the value
///   shape does not match the declared slot or a fixed-size list would change
///   length, and [`TreeError::UnknownProperty`] for undeclared names. It
///   does **not** maintain parent back-references; callers that use it
///   directly follow up with [`Node::assign_parents`](crate::Node::assign_parents).
/// - `with_overrides(overrides)` builds a fresh instance of the same
///   concrete variant with the overridden structural values applied and every
///   other field copied verbatim. Overrides may target immutable slots: this
///   is constructor semantics, not slot mutation. No transformation logic
///   runs; the instance is built directly from already-computed values.
/// - `eq_data(other)` is deep value equality against another variant
///   instance (false when the concrete types differ).
///
/// # Example (hand-written provider)
///
/// ```
/// use std::any::Any;
/// use arbor::{Node, NodeData, PropertySpec, PropertyValue, SlotKind, TreeError};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Cell {
///     next: Option<Node>,
/// }
///
/// impl NodeData for Cell {
///     fn kind(&self) -> &'static str {
///         "Cell"
///     }
///
///     fn specs(&self) -> &'static [PropertySpec] {
///         const SPECS: &[PropertySpec] = &[PropertySpec {
///             name: "next",
///             kind: SlotKind::OptionalChild,
///             mutable: true,
///         }];
///         SPECS
///     }
///
///     fn get(&self, name: &str) -> Option<PropertyValue> {
///         match name {
///             "next" => Some(match &self.next {
///                 Some(node) => PropertyValue::Node(node.clone()),
///                 None => PropertyValue::Empty,
///             }),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), TreeError> {
///         if name != "next" {
///             return Err(TreeError::unknown_property("Cell", name));
///         }
///         match value {
///             PropertyValue::Node(node) => self.next = Some(node),
///             PropertyValue::Empty => self.next = None,
///             other => {
///                 return Err(TreeError::unsupported_shape(
///                     "Cell",
///                     "next",
///                     format!("cannot write {} into a single-child slot", other.shape_name()),
///                 ))
///             }
///         }
///         Ok(())
///     }
///
///     fn with_overrides(
///         &self,
///         overrides: &[(&str, PropertyValue)],
///     ) -> Result<Box<dyn NodeData>, TreeError> {
///         let mut next = self.clone();
///         for (name, value) in overrides {
///             next.set(name, value.clone())?;
///         }
///         Ok(Box::new(next))
///     }
///
///     fn eq_data(&self, other: &dyn NodeData) -> bool {
///         other.as_any().downcast_ref::<Cell>().is_some_and(|o| self == o)
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
///
/// let tail = Node::new(Cell { next: None });
/// let head = Node::new(Cell { next: Some(tail) });
/// assert_eq!(head.children().len(), 1);
/// assert!(head.children()[0].children().is_empty());
/// ```
pub trait NodeData: Any + fmt::Debug {
    /// Name of the concrete variant.
    fn kind(&self) -> &'static str;

    /// The variant's schema, in declaration order.
    fn specs(&self) -> &'static [PropertySpec];

    /// Read the named slot.
    fn get(&self, name: &str) -> Option<PropertyValue>;

    /// Write the named structural slot in place.
    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), TreeError>;

    /// Build a fresh instance of this variant with overrides applied and all
    /// other fields copied verbatim.
    fn with_overrides(
        &self,
        overrides: &[(&str, PropertyValue)],
    ) -> Result<Box<dyn NodeData>, TreeError>;

    /// Deep value equality against another variant instance.
    fn eq_data(&self, other: &dyn NodeData) -> bool;

    /// Upcast for downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete variant.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Wrap this variant in a fresh, detached [`Node`] handle.
    fn into_node(self) -> Node
    where
        Self: Sized,
    {
        Node::new(self)
    }
}
