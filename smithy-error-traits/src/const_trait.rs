/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use smithy_error_model::{Node, Trait, TraitError};

/// Indicates that a member has a constant value that cannot change.
///
/// The trait comes in two forms:
/// - `@const` (an empty object): the member's `@default` value is the constant.
/// - `@const(value)`: the given value is the constant.
///
/// Either way the OpenAPI conversion emits `const` instead of `default` for the member.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstTrait {
    value: Option<Node>,
}

impl ConstTrait {
    /// The marker form, which defers to the member's `@default`.
    pub fn marker() -> Self {
        Self { value: None }
    }

    pub fn with_value(value: Node) -> Self {
        Self { value: Some(value) }
    }

    /// The explicit constant, or `None` for the marker form.
    pub fn value(&self) -> Option<&Node> {
        self.value.as_ref()
    }

    pub fn is_marker(&self) -> bool {
        self.value.is_none()
    }
}

impl Trait for ConstTrait {
    const ID: &'static str = "com.example#const";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        match node {
            Node::Object(object) if object.is_empty() => Ok(Self::marker()),
            Node::Null => Err(TraitError::InvalidValue {
                trait_id: Self::ID,
                path: "/".into(),
                message: "a constant cannot be null".into(),
            }),
            value => Ok(Self::with_value(value.clone())),
        }
    }

    fn to_node(&self) -> Node {
        match &self.value {
            Some(value) => value.clone(),
            None => Node::Object(Default::default()),
        }
    }
}
