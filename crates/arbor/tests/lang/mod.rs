// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A small toy language used by the integration tests.
//!
//! The variants deliberately cover every slot shape: growable and fixed
//! child lists, required and optional single children, readonly slots,
//! derived and link exclusions, and a non-public field.

// Shared by several test binaries; each uses a subset.
#![allow(dead_code)]

use arbor::{Link, Node, NodeData};

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Module {
    pub name: String,
    pub items: Vec<Node>,
    pub(crate) line_count: u32,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct FnDef {
    pub name: String,
    pub params: Vec<Node>,
    pub body: Node,
    #[ast(readonly)]
    pub decorators: Vec<Node>,
    #[ast(readonly)]
    pub doc: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Param {
    pub name: String,
    pub default: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Block {
    pub stmts: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Let {
    pub target: Node,
    pub value: Node,
    /// Expansion cache, not a source of truth.
    #[ast(derived)]
    pub expanded: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Call {
    pub callee: Node,
    pub args: Vec<Node>,
    #[ast(link)]
    pub resolved: Link,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct BinOp {
    pub op: String,
    pub operands: Box<[Node]>,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Name {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, NodeData)]
pub struct Num {
    pub value: i64,
}

pub fn module(name: &str, items: Vec<Node>) -> Node {
    Node::new(Module {
        name: name.to_string(),
        items,
        line_count: 0,
    })
}

pub fn fn_def(name: &str, params: Vec<Node>, body: Node) -> Node {
    Node::new(FnDef {
        name: name.to_string(),
        params,
        body,
        decorators: Vec::new(),
        doc: None,
    })
}

pub fn fn_def_with_doc(name: &str, params: Vec<Node>, body: Node, doc: Node) -> Node {
    Node::new(FnDef {
        name: name.to_string(),
        params,
        body,
        decorators: Vec::new(),
        doc: Some(doc),
    })
}

pub fn fn_def_decorated(name: &str, decorators: Vec<Node>, body: Node) -> Node {
    Node::new(FnDef {
        name: name.to_string(),
        params: Vec::new(),
        body,
        decorators,
        doc: None,
    })
}

pub fn param(name: &str) -> Node {
    Node::new(Param {
        name: name.to_string(),
        default: None,
    })
}

pub fn block(stmts: Vec<Node>) -> Node {
    Node::new(Block { stmts })
}

pub fn let_stmt(target: Node, value: Node) -> Node {
    Node::new(Let {
        target,
        value,
        expanded: None,
    })
}

pub fn call(callee: Node, args: Vec<Node>) -> Node {
    Node::new(Call {
        callee,
        args,
        resolved: Link::unresolved(),
    })
}

pub fn bin_op(op: &str, lhs: Node, rhs: Node) -> Node {
    Node::new(BinOp {
        op: op.to_string(),
        operands: vec![lhs, rhs].into_boxed_slice(),
    })
}

pub fn name(text: &str) -> Node {
    Node::new(Name {
        text: text.to_string(),
    })
}

pub fn num(value: i64) -> Node {
    Node::new(Num { value })
}

/// Variant names of the given nodes, in order.
pub fn kinds(nodes: impl IntoIterator<Item = Node>) -> Vec<&'static str> {
    nodes.into_iter().map(|node| node.kind()).collect()
}
