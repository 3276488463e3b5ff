/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Traits and shapes from the `smithy.api` prelude that the pipeline relies on.

use crate::node::Node;
use crate::shape::ShapeType;
use crate::traits::node_reader::*;
use crate::traits::{Trait, TraitError};
use crate::ShapeId;
use serde_json::json;

pub const PRELUDE_NAMESPACE: &str = "smithy.api";

/// Resolves the type of an implicit prelude shape such as `smithy.api#String`.
pub fn prelude_shape_type(id: &ShapeId) -> Option<ShapeType> {
    if id.namespace() != PRELUDE_NAMESPACE || id.member_name().is_some() {
        return None;
    }
    let shape_type = match id.shape_name() {
        "Blob" => ShapeType::Blob,
        "Boolean" | "PrimitiveBoolean" => ShapeType::Boolean,
        "String" => ShapeType::String,
        "Byte" | "PrimitiveByte" => ShapeType::Byte,
        "Short" | "PrimitiveShort" => ShapeType::Short,
        "Integer" | "PrimitiveInteger" => ShapeType::Integer,
        "Long" | "PrimitiveLong" => ShapeType::Long,
        "Float" | "PrimitiveFloat" => ShapeType::Float,
        "Double" | "PrimitiveDouble" => ShapeType::Double,
        "BigInteger" => ShapeType::BigInteger,
        "BigDecimal" => ShapeType::BigDecimal,
        "Timestamp" => ShapeType::Timestamp,
        "Document" => ShapeType::Document,
        "Unit" => ShapeType::Structure,
        _ => return None,
    };
    Some(shape_type)
}

/// `smithy.api#Unit`, the empty structure used for operations without input or output.
pub fn is_unit(id: &ShapeId) -> bool {
    id.as_str() == "smithy.api#Unit"
}

/// Whether an error is the fault of the client or of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    Server,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Client => "client",
            ErrorKind::Server => "server",
        }
    }

    /// The status code used when an error has no `@httpError` trait.
    pub fn default_status_code(&self) -> u16 {
        match self {
            ErrorKind::Client => 400,
            ErrorKind::Server => 500,
        }
    }
}

/// `@error("client" | "server")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTrait {
    pub kind: ErrorKind,
}

impl Trait for ErrorTrait {
    const ID: &'static str = "smithy.api#error";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        let kind = match expect_string(Self::ID, "/", node)? {
            "client" => ErrorKind::Client,
            "server" => ErrorKind::Server,
            other => {
                return Err(TraitError::InvalidValue {
                    trait_id: Self::ID,
                    path: "/".into(),
                    message: format!("expected `client` or `server` but found `{other}`"),
                })
            }
        };
        Ok(Self { kind })
    }

    fn to_node(&self) -> Node {
        Node::String(self.kind.as_str().into())
    }
}

/// `@httpError(code)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpErrorTrait {
    pub code: u16,
}

impl Trait for HttpErrorTrait {
    const ID: &'static str = "smithy.api#httpError";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        let code = expect_u16(Self::ID, "/", node)?;
        if !(400..=599).contains(&code) {
            return Err(TraitError::InvalidValue {
                trait_id: Self::ID,
                path: "/".into(),
                message: format!("{code} is not an error status code"),
            });
        }
        Ok(Self { code })
    }

    fn to_node(&self) -> Node {
        json!(self.code)
    }
}

/// `@http(method: "...", uri: "...", code: 200)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTrait {
    pub method: String,
    pub uri: String,
    pub code: u16,
}

impl HttpTrait {
    /// The URI pattern without its query string literals.
    pub fn path(&self) -> &str {
        match self.uri.split_once('?') {
            Some((path, _)) => path,
            None => &self.uri,
        }
    }
}

impl Trait for HttpTrait {
    const ID: &'static str = "smithy.api#http";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        let object = expect_object(Self::ID, "/", node)?;
        let method = expect_string(
            Self::ID,
            "/method",
            expect_member(Self::ID, "/", object, "method")?,
        )?;
        let uri = expect_string(Self::ID, "/uri", expect_member(Self::ID, "/", object, "uri")?)?;
        let code = match object.get("code") {
            Some(code) => expect_u16(Self::ID, "/code", code)?,
            None => 200,
        };
        Ok(Self {
            method: method.into(),
            uri: uri.into(),
            code,
        })
    }

    fn to_node(&self) -> Node {
        json!({ "method": self.method, "uri": self.uri, "code": self.code })
    }
}

/// `@default(value)`
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTrait {
    pub value: Node,
}

impl Trait for DefaultTrait {
    const ID: &'static str = "smithy.api#default";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        Ok(Self {
            value: node.clone(),
        })
    }

    fn to_node(&self) -> Node {
        self.value.clone()
    }
}

/// `@documentation("...")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationTrait {
    pub value: String,
}

impl Trait for DocumentationTrait {
    const ID: &'static str = "smithy.api#documentation";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        Ok(Self {
            value: expect_string(Self::ID, "/", node)?.into(),
        })
    }

    fn to_node(&self) -> Node {
        Node::String(self.value.clone())
    }
}

/// `@httpQuery("name")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpQueryTrait {
    pub name: String,
}

impl Trait for HttpQueryTrait {
    const ID: &'static str = "smithy.api#httpQuery";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        Ok(Self {
            name: expect_string(Self::ID, "/", node)?.into(),
        })
    }

    fn to_node(&self) -> Node {
        Node::String(self.name.clone())
    }
}

/// `@httpHeader("name")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeaderTrait {
    pub name: String,
}

impl Trait for HttpHeaderTrait {
    const ID: &'static str = "smithy.api#httpHeader";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        Ok(Self {
            name: expect_string(Self::ID, "/", node)?.into(),
        })
    }

    fn to_node(&self) -> Node {
        Node::String(self.name.clone())
    }
}

/// `@enumValue(value)` on members of `enum` and `intEnum` shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueTrait {
    pub value: Node,
}

impl Trait for EnumValueTrait {
    const ID: &'static str = "smithy.api#enumValue";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        Ok(Self {
            value: node.clone(),
        })
    }

    fn to_node(&self) -> Node {
        self.value.clone()
    }
}

macro_rules! annotation_trait {
    ($(#[$doc:meta])* $name:ident, $id:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Trait for $name {
            const ID: &'static str = $id;

            fn from_node(node: &Node) -> Result<Self, TraitError> {
                expect_object(Self::ID, "/", node)?;
                Ok($name)
            }

            fn to_node(&self) -> Node {
                json!({})
            }
        }
    };
}

annotation_trait!(
    /// `@required`
    RequiredTrait,
    "smithy.api#required"
);
annotation_trait!(
    /// `@httpLabel`
    HttpLabelTrait,
    "smithy.api#httpLabel"
);
annotation_trait!(
    /// `@httpPayload`
    HttpPayloadTrait,
    "smithy.api#httpPayload"
);
