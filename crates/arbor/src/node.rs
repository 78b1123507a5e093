// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node handles, child derivation, and parent maintenance.
//!
//! A [`Node`] is a cheap, clonable handle to one tree element. The cell
//! behind the handle holds the variant payload (a [`NodeData`] value) and
//! the parent back-reference. The parent reference is non-owning: a root or
//! detached node has none, and dropping the last owning handle of a subtree
//! drops the subtree regardless of how many parents once pointed at it.
//!
//! # Identity vs. equality
//!
//! Two handles are *the same node* when [`Node::ptr_eq`] holds. `==` is deep
//! structural equality: same concrete variant, equal leaf data, pairwise
//! equal children. Identity implies equality and is used as a fast path.
//!
//! # Parent discipline
//!
//! Only the in-place editing operations (see the `replace_with` family and
//! `transform_tree`) and [`Node::assign_parents`] maintain parent
//! back-references. Any other structural mutation — including the raw
//! [`Node::set_property`] accessor — leaves them stale until
//! `assign_parents` runs on an ancestor.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::TreeError;
use crate::property::{NodeData, PropertyDescription, PropertySpec, PropertyValue};

// ============================================================================
// Node
// ============================================================================

pub(crate) struct NodeCell {
    parent: RefCell<Option<Weak<NodeCell>>>,
    data: RefCell<Box<dyn NodeData>>,
}

/// A handle to one syntax tree element.
///
/// Cloning a `Node` clones the handle, not the element.
///
/// # Example
///
/// ```
/// use arbor::{Node, NodeData};
///
/// #[derive(Debug, Clone, PartialEq, NodeData)]
/// struct Call {
///     pub callee: Node,
///     pub args: Vec<Node>,
/// }
///
/// #[derive(Debug, Clone, PartialEq, NodeData)]
/// struct Ident {
///     pub name: String,
/// }
///
/// let callee = Node::new(Ident { name: "print".to_string() });
/// let arg = Node::new(Ident { name: "x".to_string() });
/// let call = Node::new(Call {
///     callee: callee.clone(),
///     args: vec![arg.clone()],
/// });
/// call.assign_parents();
///
/// assert_eq!(call.kind(), "Call");
/// assert_eq!(call.children().len(), 2);
/// assert!(arg.parent().unwrap().ptr_eq(&call));
/// assert!(call.parent().is_none());
/// ```
#[derive(Clone)]
pub struct Node {
    cell: Rc<NodeCell>,
}

impl Node {
    /// Wrap a variant payload in a fresh, detached handle.
    pub fn new(data: impl NodeData) -> Node {
        Node::from_boxed(Box::new(data))
    }

    pub(crate) fn from_boxed(data: Box<dyn NodeData>) -> Node {
        Node {
            cell: Rc::new(NodeCell {
                parent: RefCell::new(None),
                data: RefCell::new(data),
            }),
        }
    }

    /// Name of the node's concrete variant.
    pub fn kind(&self) -> &'static str {
        self.cell.data.borrow().kind()
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    // ------------------------------------------------------------------------
    // Parent
    // ------------------------------------------------------------------------

    /// The node that currently structurally contains this one, if any.
    ///
    /// Returns `None` for roots, detached nodes, and nodes whose parents
    /// have not been assigned yet (see [`Node::assign_parents`]).
    pub fn parent(&self) -> Option<Node> {
        self.cell
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|cell| Node { cell })
    }

    pub(crate) fn set_parent(&self, parent: Option<&Node>) {
        *self.cell.parent.borrow_mut() = parent.map(|p| Rc::downgrade(&p.cell));
    }

    /// Recursively (re)set every descendant's parent back-reference to match
    /// the current structural shape.
    ///
    /// Must be invoked after any structural edit performed outside the
    /// dedicated in-place operations. Idempotent: running it on an already
    /// consistent tree changes nothing. The receiver's own parent reference
    /// is left untouched.
    pub fn assign_parents(&self) {
        for child in self.children() {
            child.set_parent(Some(self));
            child.assign_parents();
        }
    }

    // ------------------------------------------------------------------------
    // Structural properties
    // ------------------------------------------------------------------------

    /// The variant's property schema, in declaration order.
    pub fn specs(&self) -> &'static [PropertySpec] {
        self.cell.data.borrow().specs()
    }

    /// Snapshot of every registered property: name, classification, and
    /// current value, in declaration order.
    pub fn properties(&self) -> Vec<PropertyDescription> {
        let data = self.cell.data.borrow();
        data.specs()
            .iter()
            .map(|spec| PropertyDescription {
                name: spec.name,
                provides_nodes: spec.kind.provides_nodes(),
                multiple: spec.kind.multiple(),
                value: data.get(spec.name).unwrap_or(PropertyValue::Empty),
            })
            .collect()
    }

    /// The ordered list of direct child nodes.
    ///
    /// Order is structural-property declaration order, then list order
    /// within each collection-valued property. Empty optional slots
    /// contribute nothing.
    pub fn children(&self) -> Vec<Node> {
        let data = self.cell.data.borrow();
        let mut children = Vec::new();
        for spec in data.specs() {
            if !spec.kind.provides_nodes() {
                continue;
            }
            match data.get(spec.name) {
                Some(PropertyValue::Node(node)) => children.push(node),
                Some(PropertyValue::Nodes(nodes)) => children.extend(nodes),
                _ => {}
            }
        }
        children
    }

    /// Read the named property slot.
    pub fn get_property(&self, name: &str) -> Option<PropertyValue> {
        self.cell.data.borrow().get(name)
    }

    /// Write the named structural slot in place.
    ///
    /// This is the raw accessor: parent back-references are **not**
    /// maintained. Follow up with [`Node::assign_parents`] on the nearest
    /// stable ancestor.
    pub fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), TreeError> {
        self.cell.data.borrow_mut().set(name, value)
    }

    // ------------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------------

    /// Whether the node's concrete variant is `T`.
    pub fn is<T: NodeData>(&self) -> bool {
        self.cell.data.borrow().as_any().is::<T>()
    }

    /// Run `f` against the node's payload downcast to `T`.
    ///
    /// Returns `None` when the variant is not `T`. The payload stays
    /// borrowed for the duration of `f`; do not start edits of the same
    /// node inside the closure.
    pub fn with_data<T: NodeData, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let data = self.cell.data.borrow();
        let typed = data.as_any().downcast_ref::<T>()?;
        Some(f(typed))
    }

    /// Run `f` against the node's payload downcast mutably to `T`.
    ///
    /// Structural changes made this way do not maintain parent
    /// back-references; follow up with [`Node::assign_parents`].
    pub fn with_data_mut<T: NodeData, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut data = self.cell.data.borrow_mut();
        let typed = data.as_any_mut().downcast_mut::<T>()?;
        Some(f(typed))
    }

    pub(crate) fn data(&self) -> Ref<'_, Box<dyn NodeData>> {
        self.cell.data.borrow()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.cell, &other.cell) {
            return true;
        }
        let a = self.cell.data.borrow();
        let b = other.cell.data.borrow();
        a.eq_data(b.as_ref())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.data.try_borrow() {
            Ok(data) => fmt::Debug::fmt(&**data, f),
            Err(_) => f.write_str("<node in use>"),
        }
    }
}

// ============================================================================
// Link
// ============================================================================

/// A non-owning cross-reference to a node owned elsewhere in the tree.
///
/// Links never contribute to [`Node::children`] or parent computation: the
/// target keeps its own, independent parent. A link does not keep its target
/// alive; [`Link::target`] returns `None` once the target's tree is dropped,
/// and for links that were never resolved.
///
/// Equality is target *identity*, not structural equality, so cross-linked
/// trees compare without recursing through the link.
#[derive(Clone, Default)]
pub struct Link {
    target: Option<Weak<NodeCell>>,
}

impl Link {
    /// A link that does not point anywhere yet.
    pub fn unresolved() -> Link {
        Link { target: None }
    }

    /// A link to the given node.
    pub fn to(node: &Node) -> Link {
        Link {
            target: Some(Rc::downgrade(&node.cell)),
        }
    }

    /// The link's target, if resolved and still alive.
    pub fn target(&self) -> Option<Node> {
        self.target
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|cell| Node { cell })
    }

    /// Whether the link currently points at a live node.
    pub fn is_resolved(&self) -> bool {
        self.target().is_some()
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (None, None) => true,
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(node) => write!(f, "Link({})", node.kind()),
            None => f.write_str("Link(?)"),
        }
    }
}
