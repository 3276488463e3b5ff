/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The typed view over trait payloads.

use crate::node::{Node, NodeType, ObjectNode};

/// A trait that can be read from (and written back to) its node payload.
///
/// Traits are stored on shapes as raw nodes (see [`TraitMap`](crate::TraitMap)); a `Trait`
/// implementation is the schema that gives that node a typed shape.
pub trait Trait: Sized {
    /// Absolute shape id of the trait, e.g. `smithy.api#error`.
    const ID: &'static str;

    /// Parses the trait from its node value.
    fn from_node(node: &Node) -> Result<Self, TraitError>;

    /// Converts the trait back into its node value.
    fn to_node(&self) -> Node;
}

/// A trait payload that does not match the trait's schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraitError {
    #[error("expected {expected} at `{path}` of `{trait_id}` but found {found}")]
    UnexpectedNodeType {
        trait_id: &'static str,
        path: String,
        expected: NodeType,
        found: NodeType,
    },
    #[error("`{trait_id}` is missing required property `{path}`")]
    MissingProperty { trait_id: &'static str, path: String },
    #[error("invalid value at `{path}` of `{trait_id}`: {message}")]
    InvalidValue {
        trait_id: &'static str,
        path: String,
        message: String,
    },
}

impl TraitError {
    pub fn trait_id(&self) -> &'static str {
        match self {
            TraitError::UnexpectedNodeType { trait_id, .. }
            | TraitError::MissingProperty { trait_id, .. }
            | TraitError::InvalidValue { trait_id, .. } => trait_id,
        }
    }
}

/// Helpers for reading trait payloads. `path` is a JSON-pointer-like location used in errors.
pub mod node_reader {
    use super::*;

    fn unexpected(trait_id: &'static str, path: &str, expected: NodeType, node: &Node) -> TraitError {
        TraitError::UnexpectedNodeType {
            trait_id,
            path: path.into(),
            expected,
            found: NodeType::of(node),
        }
    }

    pub fn expect_object<'a>(
        trait_id: &'static str,
        path: &str,
        node: &'a Node,
    ) -> Result<&'a ObjectNode, TraitError> {
        node.as_object()
            .ok_or_else(|| unexpected(trait_id, path, NodeType::Object, node))
    }

    pub fn expect_array<'a>(
        trait_id: &'static str,
        path: &str,
        node: &'a Node,
    ) -> Result<&'a Vec<Node>, TraitError> {
        node.as_array()
            .ok_or_else(|| unexpected(trait_id, path, NodeType::Array, node))
    }

    pub fn expect_string<'a>(
        trait_id: &'static str,
        path: &str,
        node: &'a Node,
    ) -> Result<&'a str, TraitError> {
        node.as_str()
            .ok_or_else(|| unexpected(trait_id, path, NodeType::String, node))
    }

    pub fn expect_u16(trait_id: &'static str, path: &str, node: &Node) -> Result<u16, TraitError> {
        let number = node
            .as_u64()
            .ok_or_else(|| unexpected(trait_id, path, NodeType::Number, node))?;
        u16::try_from(number).map_err(|_| TraitError::InvalidValue {
            trait_id,
            path: path.into(),
            message: format!("{number} is out of range"),
        })
    }

    pub fn expect_member<'a>(
        trait_id: &'static str,
        path: &str,
        object: &'a ObjectNode,
        member: &str,
    ) -> Result<&'a Node, TraitError> {
        object.get(member).ok_or_else(|| TraitError::MissingProperty {
            trait_id,
            path: join(path, member),
        })
    }

    pub fn join(path: &str, member: &str) -> String {
        format!("{}/{member}", path.trim_end_matches('/'))
    }
}
