// Copyright (c) the Arbor contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for structural edits.
//!
//! Every variant of [`TreeError`] is a precondition violation: the caller
//! asked for an edit the tree's shape or schema cannot perform. Errors are
//! raised synchronously at the point of violation and are never caught or
//! retried inside the engine. A failing slot edit leaves the tree unmodified.

use thiserror::Error;

/// Error raised by the editing engines and the property accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An in-place edit targeted a single-valued child slot that has no
    /// write accessor.
    #[error("cannot write property `{property}` of {node}: no write accessor")]
    ImmutableProperty {
        node: &'static str,
        property: String,
    },

    /// A child-position operation could not find the target node in any
    /// mutable child list of the given node.
    #[error("no mutable child list of {node} contains the target node")]
    TargetNotFound { node: &'static str },

    /// An operation that navigates via the parent back-reference was invoked
    /// on a detached node.
    #[error("{operation} requires an assigned parent, but the node is detached")]
    ParentNotSet { operation: &'static str },

    /// A slot's runtime shape does not support the requested edit, e.g. a
    /// fixed-size child list asked to change length, or a value whose shape
    /// does not match the declared slot.
    #[error("property `{property}` of {node} does not support this edit: {detail}")]
    UnsupportedShape {
        node: &'static str,
        property: String,
        detail: String,
    },

    /// A property name the variant's schema does not declare.
    #[error("{node} declares no structural property named `{property}`")]
    UnknownProperty {
        node: &'static str,
        property: String,
    },
}

impl TreeError {
    /// Create an immutable-slot error.
    pub fn immutable(node: &'static str, property: impl Into<String>) -> Self {
        TreeError::ImmutableProperty {
            node,
            property: property.into(),
        }
    }

    /// Create a target-not-found error.
    pub fn target_not_found(node: &'static str) -> Self {
        TreeError::TargetNotFound { node }
    }

    /// Create a parent-not-set error for the named operation.
    pub fn parent_not_set(operation: &'static str) -> Self {
        TreeError::ParentNotSet { operation }
    }

    /// Create an unsupported-shape error.
    pub fn unsupported_shape(
        node: &'static str,
        property: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        TreeError::UnsupportedShape {
            node,
            property: property.into(),
            detail: detail.into(),
        }
    }

    /// Create an unknown-property error.
    pub fn unknown_property(node: &'static str, property: impl Into<String>) -> Self {
        TreeError::UnknownProperty {
            node,
            property: property.into(),
        }
    }
}
