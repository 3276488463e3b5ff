/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Node values: the untyped payload of traits, metadata and examples.

use std::fmt;

/// A Smithy node value. Nodes are JSON values.
pub type Node = serde_json::Value;

/// A JSON object node.
pub type ObjectNode = serde_json::Map<String, Node>;

/// The kind of a [`Node`], used when reporting payload mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl NodeType {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Null => NodeType::Null,
            Node::Bool(_) => NodeType::Boolean,
            Node::Number(_) => NodeType::Number,
            Node::String(_) => NodeType::String,
            Node::Array(_) => NodeType::Array,
            Node::Object(_) => NodeType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Null => "null",
            NodeType::Boolean => "boolean",
            NodeType::Number => "number",
            NodeType::String => "string",
            NodeType::Array => "array",
            NodeType::Object => "object",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merges `other` into `base`, with members of `other` replacing members of `base`.
pub fn merge_objects(base: &ObjectNode, other: &ObjectNode) -> ObjectNode {
    let mut merged = base.clone();
    for (key, value) in other {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
