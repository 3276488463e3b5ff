/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use smithy_error_model::{Node, Trait, TraitError};

/// Defines an example value for a structure member.
///
/// Used to build component-level OpenAPI examples for error structures. When the member also
/// has `@const`, the constant takes precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExampleTrait {
    pub value: Node,
}

impl Trait for MemberExampleTrait {
    const ID: &'static str = "com.example#memberExample";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        if node.is_null() {
            return Err(TraitError::InvalidValue {
                trait_id: Self::ID,
                path: "/".into(),
                message: "an example cannot be null".into(),
            });
        }
        Ok(Self {
            value: node.clone(),
        })
    }

    fn to_node(&self) -> Node {
        self.value.clone()
    }
}
