/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// A Smithy Shape ID.
///
/// Shape IDs uniquely identify shapes in a Smithy model.
/// Format: `namespace#shapeName` or `namespace#shapeName$memberName`
///
/// A `ShapeId` can only be created through [`ShapeId::parse`] (or one of the helpers
/// that derive a new id from an existing one), so every instance is syntactically valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId {
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid shape id `{value}`: {reason}")]
pub struct ShapeIdSyntaxError {
    value: String,
    reason: &'static str,
}

impl ShapeIdSyntaxError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

impl ShapeId {
    /// Parses and validates a shape id.
    ///
    /// # Examples
    /// ```
    /// use smithy_error_model::ShapeId;
    ///
    /// let shape_id = ShapeId::parse("com.example#MyStruct$member").unwrap();
    /// assert_eq!(shape_id.namespace(), "com.example");
    /// assert_eq!(shape_id.shape_name(), "MyStruct");
    /// assert_eq!(shape_id.member_name(), Some("member"));
    /// ```
    pub fn parse(value: &str) -> Result<Self, ShapeIdSyntaxError> {
        let (namespace, rest) = value
            .split_once('#')
            .ok_or_else(|| ShapeIdSyntaxError::new(value, "missing `#` separator"))?;
        if namespace.is_empty() || !namespace.split('.').all(is_identifier) {
            return Err(ShapeIdSyntaxError::new(value, "invalid namespace"));
        }
        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };
        if !is_identifier(name) {
            return Err(ShapeIdSyntaxError::new(value, "invalid shape name"));
        }
        if let Some(member) = member {
            if !is_identifier(member) {
                return Err(ShapeIdSyntaxError::new(value, "invalid member name"));
            }
        }
        Ok(Self {
            value: value.into(),
        })
    }

    /// Creates a shape id from a namespace and a shape name.
    pub fn from_parts(namespace: &str, name: &str) -> Result<Self, ShapeIdSyntaxError> {
        Self::parse(&format!("{namespace}#{name}"))
    }

    /// Returns the string representation of this ShapeId.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the namespace portion of the ShapeId.
    pub fn namespace(&self) -> &str {
        self.split().0
    }

    /// Returns the shape name portion of the ShapeId.
    pub fn shape_name(&self) -> &str {
        self.split().1
    }

    /// Returns the member name if this is a member shape ID.
    pub fn member_name(&self) -> Option<&str> {
        self.split().2
    }

    /// Returns a member id of this shape, e.g. `ns#Shape` + `foo` -> `ns#Shape$foo`.
    pub fn with_member(&self, member: &str) -> Result<Self, ShapeIdSyntaxError> {
        Self::parse(&format!("{}${member}", self.without_member().as_str()))
    }

    /// Returns the id of the containing shape, dropping any member name.
    pub fn without_member(&self) -> ShapeId {
        match self.value.split_once('$') {
            Some((root, _)) => ShapeId { value: root.into() },
            None => self.clone(),
        }
    }

    /// Returns a shape id in the same namespace with a different name.
    pub fn sibling(&self, name: &str) -> Result<Self, ShapeIdSyntaxError> {
        Self::from_parts(self.namespace(), name)
    }

    fn split(&self) -> (&str, &str, Option<&str>) {
        // The id was validated on construction, so both separators are well-formed.
        let (namespace, rest) = self.value.split_once('#').unwrap_or(("", &self.value));
        match rest.split_once('$') {
            Some((name, member)) => (namespace, name, Some(member)),
            None => (namespace, rest, None),
        }
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for ShapeId {
    type Err = ShapeIdSyntaxError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for ShapeId {
    type Error = ShapeIdSyntaxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

// Lets maps keyed by `ShapeId` be queried with a plain `&str`.
impl Borrow<str> for ShapeId {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ShapeId::parse(&value).map_err(D::Error::custom)
    }
}
