/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::node::Node;
use crate::prelude::{ErrorTrait, HttpErrorTrait};
use crate::traits::Trait;
use crate::{ShapeId, TraitMap};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The type of a Smithy shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeType {
    Blob,
    Boolean,
    String,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Timestamp,
    Document,
    Enum,
    IntEnum,
    List,
    Set,
    Map,
    Structure,
    Union,
    Operation,
    Resource,
    Service,
    Member,
}

impl ShapeType {
    /// The name used for this type in the JSON AST.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Document => "document",
            ShapeType::Enum => "enum",
            ShapeType::IntEnum => "intEnum",
            ShapeType::List => "list",
            ShapeType::Set => "set",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Operation => "operation",
            ShapeType::Resource => "resource",
            ShapeType::Service => "service",
            ShapeType::Member => "member",
        }
    }

    pub fn is_simple(&self) -> bool {
        !self.is_aggregate() && !self.is_service_shape() && !self.is_member()
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ShapeType::List | ShapeType::Set | ShapeType::Map | ShapeType::Structure | ShapeType::Union
        )
    }

    pub fn is_service_shape(&self) -> bool {
        matches!(
            self,
            ShapeType::Operation | ShapeType::Resource | ShapeType::Service
        )
    }

    pub fn is_member(&self) -> bool {
        *self == ShapeType::Member
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            ShapeType::Byte
                | ShapeType::Short
                | ShapeType::Integer
                | ShapeType::Long
                | ShapeType::Float
                | ShapeType::Double
                | ShapeType::BigInteger
                | ShapeType::BigDecimal
                | ShapeType::IntEnum
        )
    }

    /// Shapes whose members live in a named `members` map.
    pub fn has_named_members(&self) -> bool {
        matches!(
            self,
            ShapeType::Structure | ShapeType::Union | ShapeType::Enum | ShapeType::IntEnum
        )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shape type `{0}`")]
pub struct UnknownShapeType(pub String);

impl FromStr for ShapeType {
    type Err = UnknownShapeType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "blob" => ShapeType::Blob,
            "boolean" => ShapeType::Boolean,
            "string" => ShapeType::String,
            "byte" => ShapeType::Byte,
            "short" => ShapeType::Short,
            "integer" => ShapeType::Integer,
            "long" => ShapeType::Long,
            "float" => ShapeType::Float,
            "double" => ShapeType::Double,
            "bigInteger" => ShapeType::BigInteger,
            "bigDecimal" => ShapeType::BigDecimal,
            "timestamp" => ShapeType::Timestamp,
            "document" => ShapeType::Document,
            "enum" => ShapeType::Enum,
            "intEnum" => ShapeType::IntEnum,
            "list" => ShapeType::List,
            "set" => ShapeType::Set,
            "map" => ShapeType::Map,
            "structure" => ShapeType::Structure,
            "union" => ShapeType::Union,
            "operation" => ShapeType::Operation,
            "resource" => ShapeType::Resource,
            "service" => ShapeType::Service,
            other => return Err(UnknownShapeType(other.into())),
        })
    }
}

/// A member of a structure, union, enum, list (`member`) or map (`key`/`value`).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShape {
    pub id: ShapeId,
    pub target: ShapeId,
    pub traits: TraitMap,
}

impl MemberShape {
    pub fn new(id: ShapeId, target: ShapeId) -> Self {
        Self {
            id,
            target,
            traits: TraitMap::new(),
        }
    }

    pub fn member_name(&self) -> &str {
        self.id.member_name().unwrap_or_default()
    }

    /// The id of the shape that contains this member.
    pub fn container(&self) -> ShapeId {
        self.id.without_member()
    }
}

/// A shape in the model graph.
///
/// Only the properties relevant to the shape's [`ShapeType`] are populated. Properties this
/// crate doesn't interpret (resource identifiers, service renames, ...) are kept in `extra`
/// so they survive a round trip through the JSON AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub shape_type: ShapeType,
    pub traits: TraitMap,
    /// Named members, or `member` for lists and `key`/`value` for maps.
    pub members: BTreeMap<String, MemberShape>,
    pub version: Option<String>,
    pub input: Option<ShapeId>,
    pub output: Option<ShapeId>,
    pub errors: Vec<ShapeId>,
    pub operations: Vec<ShapeId>,
    pub collection_operations: Vec<ShapeId>,
    pub resources: Vec<ShapeId>,
    /// Resource lifecycle operations (`create`, `read`, ...).
    pub lifecycle: BTreeMap<String, ShapeId>,
    pub extra: BTreeMap<String, Node>,
}

impl Shape {
    pub fn new(id: ShapeId, shape_type: ShapeType) -> Self {
        Self {
            id,
            shape_type,
            traits: TraitMap::new(),
            members: BTreeMap::new(),
            version: None,
            input: None,
            output: None,
            errors: Vec::new(),
            operations: Vec::new(),
            collection_operations: Vec::new(),
            resources: Vec::new(),
            lifecycle: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.id.shape_name()
    }

    pub fn is_structure(&self) -> bool {
        self.shape_type == ShapeType::Structure
    }

    pub fn is_union(&self) -> bool {
        self.shape_type == ShapeType::Union
    }

    pub fn is_operation(&self) -> bool {
        self.shape_type == ShapeType::Operation
    }

    pub fn member(&self, name: &str) -> Option<&MemberShape> {
        self.members.get(name)
    }

    /// Adds a member targeting `target`. The member id is derived from this shape's id.
    pub fn add_member(
        &mut self,
        name: &str,
        target: ShapeId,
    ) -> Result<&mut MemberShape, crate::ShapeIdSyntaxError> {
        let id = self.id.with_member(name)?;
        Ok(self
            .members
            .entry(name.to_string())
            .or_insert_with(|| MemberShape::new(id, target)))
    }

    /// The `@error` trait, if this shape is an error structure.
    pub fn error_trait(&self) -> Option<ErrorTrait> {
        if self.is_structure() {
            self.traits.find::<ErrorTrait>()
        } else {
            None
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_structure() && self.traits.contains(ErrorTrait::ID)
    }

    /// The HTTP status code of an error structure: `@httpError` if present, otherwise
    /// 400 for client errors and 500 for server errors.
    pub fn error_status_code(&self) -> Option<u16> {
        if !self.is_error() {
            return None;
        }
        Some(match self.traits.find::<HttpErrorTrait>() {
            Some(http_error) => http_error.code,
            None => self
                .error_trait()
                .map(|error| error.kind.default_status_code())
                .unwrap_or(500),
        })
    }
}
