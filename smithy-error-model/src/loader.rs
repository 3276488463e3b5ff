/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Loading and serializing models in the Smithy JSON AST format.

use crate::node::Node;
use crate::shape::{MemberShape, Shape, ShapeType, UnknownShapeType};
use crate::{Model, ShapeId, ShapeIdSyntaxError, TraitMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUPPORTED_VERSIONS: &[&str] = &["1.0", "2", "2.0"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read model file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model `{source_name}`")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported Smithy version `{version}` in `{source_name}`")]
    UnsupportedVersion {
        source_name: String,
        version: String,
    },
    #[error("invalid shape id in `{source_name}`")]
    ShapeId {
        source_name: String,
        #[source]
        source: ShapeIdSyntaxError,
    },
    #[error("shape `{shape_id}` in `{source_name}` has an unknown type")]
    ShapeType {
        source_name: String,
        shape_id: String,
        #[source]
        source: UnknownShapeType,
    },
    #[error("shape `{shape_id}` in `{source_name}` is missing `{property}`")]
    MissingProperty {
        source_name: String,
        shape_id: String,
        property: &'static str,
    },
    #[error("shape `{shape_id}` in `{source_name}` conflicts with an existing definition")]
    Conflict {
        source_name: String,
        shape_id: String,
    },
    #[error("`apply` in `{source_name}` targets `{shape_id}`, which is not defined")]
    ApplyTarget {
        source_name: String,
        shape_id: String,
    },
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct AstModel {
    smithy: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Node>,
    #[serde(default)]
    shapes: BTreeMap<String, AstShape>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct AstShape {
    #[serde(rename = "type")]
    shape_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    members: Option<BTreeMap<String, AstMember>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member: Option<AstMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<AstMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<AstMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<AstTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    operations: Vec<AstTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    collection_operations: Vec<AstTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    resources: Vec<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    create: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    put: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list: Option<AstTarget>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    traits: BTreeMap<String, Node>,
    #[serde(flatten)]
    extra: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct AstMember {
    target: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    traits: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct AstTarget {
    target: String,
}

/// Collects JSON AST documents and assembles them into a single [`Model`].
///
/// Shapes defined in several documents must be identical. `apply` shapes are resolved after all
/// documents are merged, so they may target shapes from any document.
#[derive(Debug, Default)]
pub struct ModelAssembler {
    sources: Vec<(String, String)>,
}

impl ModelAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a JSON AST document held in memory. `name` is only used in error messages.
    pub fn add_unparsed_model(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.sources.push((name.into(), contents.into()));
        self
    }

    /// Reads a JSON AST document from disk.
    pub fn add_import(self, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs_err::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.into(),
            source,
        })?;
        Ok(self.add_unparsed_model(path.display().to_string(), contents))
    }

    pub fn assemble(self) -> Result<Model, LoadError> {
        let mut model = Model::new();
        let mut definitions: BTreeMap<String, (String, AstShape)> = BTreeMap::new();
        let mut applies: Vec<(String, String, BTreeMap<String, Node>)> = Vec::new();

        for (source_name, contents) in self.sources {
            let ast: AstModel =
                serde_json::from_str(&contents).map_err(|source| LoadError::Json {
                    source_name: source_name.clone(),
                    source,
                })?;
            if !SUPPORTED_VERSIONS.contains(&ast.smithy.as_str()) {
                return Err(LoadError::UnsupportedVersion {
                    source_name,
                    version: ast.smithy,
                });
            }
            model.smithy_version = ast.smithy;
            model.metadata.extend(ast.metadata);
            debug!(source = %source_name, shapes = ast.shapes.len(), "loaded model source");

            for (shape_id, shape) in ast.shapes {
                if shape.shape_type == "apply" {
                    applies.push((source_name.clone(), shape_id, shape.traits));
                    continue;
                }
                match definitions.get(&shape_id) {
                    Some((_, existing)) if existing != &shape => {
                        return Err(LoadError::Conflict {
                            source_name,
                            shape_id,
                        })
                    }
                    Some(_) => {}
                    None => {
                        definitions.insert(shape_id, (source_name.clone(), shape));
                    }
                }
            }
        }

        for (shape_id, (source_name, ast)) in definitions {
            let shape = convert_shape(&source_name, &shape_id, ast)?;
            model.insert_shape(shape);
        }

        for (source_name, shape_id, traits) in applies {
            apply_traits(&mut model, &source_name, &shape_id, traits)?;
        }
        Ok(model)
    }
}

fn parse_id(source_name: &str, value: &str) -> Result<ShapeId, LoadError> {
    ShapeId::parse(value).map_err(|source| LoadError::ShapeId {
        source_name: source_name.into(),
        source,
    })
}

fn convert_traits(source_name: &str, traits: BTreeMap<String, Node>) -> Result<TraitMap, LoadError> {
    traits
        .into_iter()
        .map(|(id, value)| Ok((parse_id(source_name, &id)?, value)))
        .collect()
}

fn convert_targets(source_name: &str, targets: Vec<AstTarget>) -> Result<Vec<ShapeId>, LoadError> {
    targets
        .into_iter()
        .map(|target| parse_id(source_name, &target.target))
        .collect()
}

fn convert_shape(source_name: &str, shape_id: &str, ast: AstShape) -> Result<Shape, LoadError> {
    let id = parse_id(source_name, shape_id)?;
    let shape_type: ShapeType =
        ast.shape_type
            .parse()
            .map_err(|source| LoadError::ShapeType {
                source_name: source_name.into(),
                shape_id: shape_id.into(),
                source,
            })?;
    let missing = |property| LoadError::MissingProperty {
        source_name: source_name.into(),
        shape_id: shape_id.into(),
        property,
    };

    let mut shape = Shape::new(id.clone(), shape_type);
    shape.traits = convert_traits(source_name, ast.traits)?;
    shape.version = ast.version;
    shape.extra = ast.extra;

    let mut members = Vec::new();
    match shape_type {
        ShapeType::List | ShapeType::Set => {
            members.push(("member".to_string(), ast.member.ok_or_else(|| missing("member"))?));
        }
        ShapeType::Map => {
            members.push(("key".to_string(), ast.key.ok_or_else(|| missing("key"))?));
            members.push(("value".to_string(), ast.value.ok_or_else(|| missing("value"))?));
        }
        _ => members.extend(ast.members.unwrap_or_default()),
    }
    for (name, member) in members {
        let member_id = id.with_member(&name).map_err(|source| LoadError::ShapeId {
            source_name: source_name.into(),
            source,
        })?;
        shape.members.insert(
            name,
            MemberShape {
                id: member_id,
                target: parse_id(source_name, &member.target)?,
                traits: convert_traits(source_name, member.traits)?,
            },
        );
    }

    shape.input = ast
        .input
        .map(|target| parse_id(source_name, &target.target))
        .transpose()?;
    shape.output = ast
        .output
        .map(|target| parse_id(source_name, &target.target))
        .transpose()?;
    shape.errors = convert_targets(source_name, ast.errors)?;
    shape.operations = convert_targets(source_name, ast.operations)?;
    shape.collection_operations = convert_targets(source_name, ast.collection_operations)?;
    shape.resources = convert_targets(source_name, ast.resources)?;
    let lifecycle = [
        ("create", ast.create),
        ("put", ast.put),
        ("read", ast.read),
        ("update", ast.update),
        ("delete", ast.delete),
        ("list", ast.list),
    ];
    for (name, target) in lifecycle {
        if let Some(target) = target {
            shape
                .lifecycle
                .insert(name.to_string(), parse_id(source_name, &target.target)?);
        }
    }
    Ok(shape)
}

fn apply_traits(
    model: &mut Model,
    source_name: &str,
    shape_id: &str,
    traits: BTreeMap<String, Node>,
) -> Result<(), LoadError> {
    let id = parse_id(source_name, shape_id)?;
    let traits = convert_traits(source_name, traits)?;
    let target = if id.member_name().is_some() {
        model.get_member_mut(&id).map(|member| &mut member.traits)
    } else {
        model.get_shape_mut(&id).map(|shape| &mut shape.traits)
    };
    let target = target.ok_or_else(|| LoadError::ApplyTarget {
        source_name: source_name.into(),
        shape_id: shape_id.into(),
    })?;
    for (trait_id, value) in traits.iter() {
        if let Some(existing) = target.get(trait_id.as_str()) {
            if existing != value {
                return Err(LoadError::Conflict {
                    source_name: source_name.into(),
                    shape_id: format!("{shape_id} ({trait_id})"),
                });
            }
        }
        target.insert(trait_id.clone(), value.clone());
    }
    Ok(())
}

fn ast_traits(traits: &TraitMap) -> BTreeMap<String, Node> {
    traits
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

fn ast_member(member: &MemberShape) -> AstMember {
    AstMember {
        target: member.target.to_string(),
        traits: ast_traits(&member.traits),
    }
}

fn ast_target(id: &ShapeId) -> AstTarget {
    AstTarget {
        target: id.to_string(),
    }
}

fn ast_shape(shape: &Shape) -> AstShape {
    let mut ast = AstShape {
        shape_type: shape.shape_type.as_str().into(),
        version: shape.version.clone(),
        input: shape.input.as_ref().map(ast_target),
        output: shape.output.as_ref().map(ast_target),
        errors: shape.errors.iter().map(ast_target).collect(),
        operations: shape.operations.iter().map(ast_target).collect(),
        collection_operations: shape.collection_operations.iter().map(ast_target).collect(),
        resources: shape.resources.iter().map(ast_target).collect(),
        traits: ast_traits(&shape.traits),
        extra: shape.extra.clone(),
        ..Default::default()
    };
    match shape.shape_type {
        ShapeType::List | ShapeType::Set => ast.member = shape.member("member").map(ast_member),
        ShapeType::Map => {
            ast.key = shape.member("key").map(ast_member);
            ast.value = shape.member("value").map(ast_member);
        }
        shape_type if shape_type.has_named_members() => {
            ast.members = Some(
                shape
                    .members
                    .iter()
                    .map(|(name, member)| (name.clone(), ast_member(member)))
                    .collect(),
            )
        }
        _ => {}
    }
    for (name, target) in &shape.lifecycle {
        let target = Some(ast_target(target));
        match name.as_str() {
            "create" => ast.create = target,
            "put" => ast.put = target,
            "read" => ast.read = target,
            "update" => ast.update = target,
            "delete" => ast.delete = target,
            "list" => ast.list = target,
            _ => {}
        }
    }
    ast
}

impl Model {
    /// Serializes the model to a JSON AST node.
    pub fn to_json_ast(&self) -> Node {
        let ast = AstModel {
            smithy: self.smithy_version.clone(),
            metadata: self.metadata.clone(),
            shapes: self
                .shapes()
                .map(|shape| (shape.id.to_string(), ast_shape(shape)))
                .collect(),
        };
        // Every field serializes to plain JSON, so this conversion cannot fail.
        serde_json::to_value(ast).unwrap_or(Node::Null)
    }
}
