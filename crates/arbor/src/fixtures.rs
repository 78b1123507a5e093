// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Hand-written node variants shared by the unit tests.
//!
//! These implement [`NodeData`] manually, registration-table style, so the
//! unit tests double as coverage of the provider contract without going
//! through the derive macro (the integration tests cover that side).

use std::any::Any;

use crate::error::TreeError;
use crate::node::Node;
use crate::property::{NodeData, PropertySpec, PropertyValue, SlotKind};

/// Interior node: a label, an ordered child list, and an optional extra child.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Branch {
    pub(crate) label: String,
    pub(crate) items: Vec<Node>,
    pub(crate) extra: Option<Node>,
}

impl NodeData for Branch {
    fn kind(&self) -> &'static str {
        "Branch"
    }

    fn specs(&self) -> &'static [PropertySpec] {
        const SPECS: &[PropertySpec] = &[
            PropertySpec {
                name: "label",
                kind: SlotKind::Data,
                mutable: false,
            },
            PropertySpec {
                name: "items",
                kind: SlotKind::ChildList,
                mutable: true,
            },
            PropertySpec {
                name: "extra",
                kind: SlotKind::OptionalChild,
                mutable: true,
            },
        ];
        SPECS
    }

    fn get(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "label" => Some(PropertyValue::Data(format!("{:?}", self.label))),
            "items" => Some(PropertyValue::Nodes(self.items.clone())),
            "extra" => Some(match &self.extra {
                Some(node) => PropertyValue::Node(node.clone()),
                None => PropertyValue::Empty,
            }),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), TreeError> {
        match name {
            "label" => Err(TreeError::immutable("Branch", "label")),
            "items" => match value {
                PropertyValue::Nodes(nodes) => {
                    self.items = nodes;
                    Ok(())
                }
                other => Err(TreeError::unsupported_shape(
                    "Branch",
                    "items",
                    format!("cannot write {} into a child list slot", other.shape_name()),
                )),
            },
            "extra" => match value {
                PropertyValue::Node(node) => {
                    self.extra = Some(node);
                    Ok(())
                }
                PropertyValue::Empty => {
                    self.extra = None;
                    Ok(())
                }
                other => Err(TreeError::unsupported_shape(
                    "Branch",
                    "extra",
                    format!("cannot write {} into a single-child slot", other.shape_name()),
                )),
            },
            _ => Err(TreeError::unknown_property("Branch", name)),
        }
    }

    fn with_overrides(
        &self,
        overrides: &[(&str, PropertyValue)],
    ) -> Result<Box<dyn NodeData>, TreeError> {
        let mut next = self.clone();
        for (name, value) in overrides {
            next.set(name, value.clone())?;
        }
        Ok(Box::new(next))
    }

    fn eq_data(&self, other: &dyn NodeData) -> bool {
        other
            .as_any()
            .downcast_ref::<Branch>()
            .is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Leaf node carrying a single value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Leaf {
    pub(crate) value: i64,
}

impl NodeData for Leaf {
    fn kind(&self) -> &'static str {
        "Leaf"
    }

    fn specs(&self) -> &'static [PropertySpec] {
        const SPECS: &[PropertySpec] = &[PropertySpec {
            name: "value",
            kind: SlotKind::Data,
            mutable: false,
        }];
        SPECS
    }

    fn get(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "value" => Some(PropertyValue::Data(format!("{:?}", self.value))),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, _value: PropertyValue) -> Result<(), TreeError> {
        match name {
            "value" => Err(TreeError::immutable("Leaf", "value")),
            _ => Err(TreeError::unknown_property("Leaf", name)),
        }
    }

    fn with_overrides(
        &self,
        overrides: &[(&str, PropertyValue)],
    ) -> Result<Box<dyn NodeData>, TreeError> {
        match overrides.first() {
            None => Ok(Box::new(self.clone())),
            Some((name, _)) => Err(TreeError::unknown_property("Leaf", *name)),
        }
    }

    fn eq_data(&self, other: &dyn NodeData) -> bool {
        other
            .as_any()
            .downcast_ref::<Leaf>()
            .is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Node whose child slots have no write accessor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sealed {
    pub(crate) body: Node,
    pub(crate) notes: Vec<Node>,
}

impl NodeData for Sealed {
    fn kind(&self) -> &'static str {
        "Sealed"
    }

    fn specs(&self) -> &'static [PropertySpec] {
        const SPECS: &[PropertySpec] = &[
            PropertySpec {
                name: "body",
                kind: SlotKind::Child,
                mutable: false,
            },
            PropertySpec {
                name: "notes",
                kind: SlotKind::ChildList,
                mutable: false,
            },
        ];
        SPECS
    }

    fn get(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "body" => Some(PropertyValue::Node(self.body.clone())),
            "notes" => Some(PropertyValue::Nodes(self.notes.clone())),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, _value: PropertyValue) -> Result<(), TreeError> {
        match name {
            "body" | "notes" => Err(TreeError::immutable("Sealed", name.to_string())),
            _ => Err(TreeError::unknown_property("Sealed", name)),
        }
    }

    fn with_overrides(
        &self,
        overrides: &[(&str, PropertyValue)],
    ) -> Result<Box<dyn NodeData>, TreeError> {
        // Reconstruction may override slots that cannot be written in place.
        let mut next = self.clone();
        for (name, value) in overrides {
            match (*name, value) {
                ("body", PropertyValue::Node(node)) => next.body = node.clone(),
                ("notes", PropertyValue::Nodes(nodes)) => next.notes = nodes.clone(),
                ("body" | "notes", other) => {
                    return Err(TreeError::unsupported_shape(
                        "Sealed",
                        name.to_string(),
                        format!("override value is {}", other.shape_name()),
                    ))
                }
                _ => return Err(TreeError::unknown_property("Sealed", *name)),
            }
        }
        Ok(Box::new(next))
    }

    fn eq_data(&self, other: &dyn NodeData) -> bool {
        other
            .as_any()
            .downcast_ref::<Sealed>()
            .is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Node holding a fixed-size child list: elements can be replaced, but the
/// list cannot change length in place.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fixed {
    pub(crate) slots: Box<[Node]>,
}

impl NodeData for Fixed {
    fn kind(&self) -> &'static str {
        "Fixed"
    }

    fn specs(&self) -> &'static [PropertySpec] {
        const SPECS: &[PropertySpec] = &[PropertySpec {
            name: "slots",
            kind: SlotKind::FixedChildList,
            mutable: true,
        }];
        SPECS
    }

    fn get(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "slots" => Some(PropertyValue::Nodes(self.slots.to_vec())),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), TreeError> {
        match name {
            "slots" => match value {
                PropertyValue::Nodes(nodes) if nodes.len() == self.slots.len() => {
                    self.slots = nodes.into_boxed_slice();
                    Ok(())
                }
                PropertyValue::Nodes(nodes) => Err(TreeError::unsupported_shape(
                    "Fixed",
                    "slots",
                    format!(
                        "fixed-size child list holds {} nodes, cannot resize to {}",
                        self.slots.len(),
                        nodes.len()
                    ),
                )),
                other => Err(TreeError::unsupported_shape(
                    "Fixed",
                    "slots",
                    format!("cannot write {} into a child list slot", other.shape_name()),
                )),
            },
            _ => Err(TreeError::unknown_property("Fixed", name)),
        }
    }

    fn with_overrides(
        &self,
        overrides: &[(&str, PropertyValue)],
    ) -> Result<Box<dyn NodeData>, TreeError> {
        let mut next = self.clone();
        for (name, value) in overrides {
            match (*name, value) {
                ("slots", PropertyValue::Nodes(nodes)) => {
                    next.slots = nodes.clone().into_boxed_slice();
                }
                ("slots", other) => {
                    return Err(TreeError::unsupported_shape(
                        "Fixed",
                        "slots",
                        format!("override value is {}", other.shape_name()),
                    ))
                }
                _ => return Err(TreeError::unknown_property("Fixed", *name)),
            }
        }
        Ok(Box::new(next))
    }

    fn eq_data(&self, other: &dyn NodeData) -> bool {
        other
            .as_any()
            .downcast_ref::<Fixed>()
            .is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) fn branch(label: &str, items: Vec<Node>) -> Node {
    Node::new(Branch {
        label: label.to_string(),
        items,
        extra: None,
    })
}

pub(crate) fn leaf(value: i64) -> Node {
    Node::new(Leaf { value })
}

pub(crate) fn sealed(body: Node, notes: Vec<Node>) -> Node {
    Node::new(Sealed { body, notes })
}

pub(crate) fn fixed(slots: Vec<Node>) -> Node {
    Node::new(Fixed {
        slots: slots.into_boxed_slice(),
    })
}
