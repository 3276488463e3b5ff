/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Model transforms that run between validation and generation.
//!
//! Every transform is idempotent: running it on its own output changes nothing.

use crate::ConstTrait;
use serde::{Deserialize, Serialize};
use smithy_error_model::prelude::{DefaultTrait, ErrorKind, ErrorTrait, HttpErrorTrait, RequiredTrait};
use smithy_error_model::{Model, Node, Shape, ShapeId, ShapeIdSyntaxError, ShapeType, Trait};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Trait placed on synthesized error shapes, listing the errors they stand in for.
pub const ORIGINAL_ERRORS_TRAIT: &str = "smithy.synthetic#originalErrors";

/// Name of the single member of a synthesized error wrapper.
pub const ERROR_UNION_MEMBER: &str = "errorUnion";

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    ShapeId(#[from] ShapeIdSyntaxError),
    #[error("cannot synthesize `{shape_id}`: a shape with that id already exists")]
    Conflict { shape_id: ShapeId },
    #[error("cannot synthesize `{shape_id}`: errors `{first}` and `{second}` share the member name `{member}`")]
    MemberConflict {
        shape_id: ShapeId,
        member: String,
        first: ShapeId,
        second: ShapeId,
    },
}

/// What to do when several errors of one operation share an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ErrorStatusConflict {
    /// Wrap the conflicting errors in one synthesized error whose body is a union of them.
    #[serde(rename = "oneOf")]
    OneOf,
}

pub trait Transform {
    fn name(&self) -> &'static str;
    fn transform(&self, model: Model) -> Result<Model, TransformError>;
}

/// Gives every `@error` structure an explicit `@httpError`.
#[derive(Debug, Default)]
pub struct ResolveHttpErrorCodes;

impl Transform for ResolveHttpErrorCodes {
    fn name(&self) -> &'static str {
        "ResolveHttpErrorCodes"
    }

    fn transform(&self, mut model: Model) -> Result<Model, TransformError> {
        let unresolved: Vec<(ShapeId, ErrorKind)> = model
            .error_shapes()
            .filter(|shape| !shape.traits.contains(HttpErrorTrait::ID))
            .filter_map(|shape| Some((shape.id.clone(), shape.error_trait()?.kind)))
            .collect();
        for (id, kind) in unresolved {
            if let Some(shape) = model.get_shape_mut(&id) {
                let code = kind.default_status_code();
                debug!(shape = %id, code, "resolved HTTP error code");
                shape.traits.insert_trait(&HttpErrorTrait { code })?;
            }
        }
        Ok(model)
    }
}

/// Copies a value-form `@const` into `@default` when the member has no default.
#[derive(Debug, Default)]
pub struct AlignConstDefaults;

impl Transform for AlignConstDefaults {
    fn name(&self) -> &'static str {
        "AlignConstDefaults"
    }

    fn transform(&self, mut model: Model) -> Result<Model, TransformError> {
        let mut aligned = Vec::new();
        for shape in model.structure_shapes() {
            for member in shape.members.values() {
                if member.traits.contains(DefaultTrait::ID) {
                    continue;
                }
                if let Some(value) = member
                    .traits
                    .find::<ConstTrait>()
                    .and_then(|constant| constant.value().cloned())
                {
                    aligned.push((member.id.clone(), value));
                }
            }
        }
        for (id, value) in aligned {
            if let Some(member) = model.get_member_mut(&id) {
                debug!(member = %id, "aligned default with const");
                member.traits.insert_trait(&DefaultTrait { value })?;
            }
        }
        Ok(model)
    }
}

/// Replaces errors of an operation that share a status code with one synthesized error.
///
/// For operation `CreateTransfer` with two 422 errors, this adds:
/// - `CreateTransfer422ErrorUnion`, a union with one member per original error
/// - `CreateTransfer422Error`, an `@httpError(422)` error with a single `errorUnion` member
///
/// and the operation's error list points at the wrapper instead of the originals.
#[derive(Debug, Default)]
pub struct SynthesizeErrorUnions;

impl SynthesizeErrorUnions {
    fn conflicts(model: &Model, operation: &Shape) -> BTreeMap<u16, Vec<ShapeId>> {
        let mut by_code: BTreeMap<u16, Vec<ShapeId>> = BTreeMap::new();
        for error in &operation.errors {
            if let Some(code) = model.get_shape(error).and_then(Shape::error_status_code) {
                by_code.entry(code).or_default().push(error.clone());
            }
        }
        by_code.retain(|_, errors| errors.len() > 1);
        by_code
    }

    fn synthesize(
        model: &mut Model,
        operation: &ShapeId,
        code: u16,
        errors: &[ShapeId],
    ) -> Result<ShapeId, TransformError> {
        let name = format!("{}{code}Error", operation.shape_name());
        let wrapper_id = operation.sibling(&name)?;
        let union_id = operation.sibling(&format!("{name}Union"))?;
        for id in [&wrapper_id, &union_id] {
            if model.contains_shape(id) {
                return Err(TransformError::Conflict {
                    shape_id: id.clone(),
                });
            }
        }
        let original_errors = Node::Array(
            errors
                .iter()
                .map(|error| Node::String(error.to_string()))
                .collect(),
        );
        let synthetic_trait = ShapeId::parse(ORIGINAL_ERRORS_TRAIT)?;

        let mut union = Shape::new(union_id.clone(), ShapeType::Union);
        for error in errors {
            if let Some(existing) = union.member(error.shape_name()) {
                return Err(TransformError::MemberConflict {
                    shape_id: union_id,
                    member: error.shape_name().to_string(),
                    first: existing.target.clone(),
                    second: error.clone(),
                });
            }
            union.add_member(error.shape_name(), error.clone())?;
        }
        union
            .traits
            .insert(synthetic_trait.clone(), original_errors.clone());

        let kind = if code >= 500 {
            ErrorKind::Server
        } else {
            ErrorKind::Client
        };
        let mut wrapper = Shape::new(wrapper_id.clone(), ShapeType::Structure);
        wrapper.traits.insert_trait(&ErrorTrait { kind })?;
        wrapper.traits.insert_trait(&HttpErrorTrait { code })?;
        wrapper.traits.insert(synthetic_trait, original_errors);
        wrapper
            .add_member(ERROR_UNION_MEMBER, union_id.clone())?
            .traits
            .insert_trait(&RequiredTrait)?;

        model.insert_shape(union);
        model.insert_shape(wrapper);
        Ok(wrapper_id)
    }
}

impl Transform for SynthesizeErrorUnions {
    fn name(&self) -> &'static str {
        "SynthesizeErrorUnions"
    }

    fn transform(&self, mut model: Model) -> Result<Model, TransformError> {
        let conflicting: Vec<(ShapeId, BTreeMap<u16, Vec<ShapeId>>)> = model
            .shapes_of_type(ShapeType::Operation)
            .map(|operation| (operation.id.clone(), Self::conflicts(&model, operation)))
            .filter(|(_, conflicts)| !conflicts.is_empty())
            .collect();

        for (operation_id, conflicts) in conflicting {
            let mut replacements = BTreeMap::new();
            for (code, errors) in &conflicts {
                let wrapper = Self::synthesize(&mut model, &operation_id, *code, errors)?;
                debug!(operation = %operation_id, code, wrapper = %wrapper, "synthesized error union");
                for error in errors {
                    replacements.insert(error.clone(), wrapper.clone());
                }
            }
            if let Some(operation) = model.get_shape_mut(&operation_id) {
                let mut errors: Vec<ShapeId> = Vec::new();
                for error in &operation.errors {
                    let error = replacements.get(error).unwrap_or(error);
                    if !errors.contains(error) {
                        errors.push(error.clone());
                    }
                }
                operation.errors = errors;
            }
        }
        Ok(model)
    }
}

/// Options for [`ModelTransformer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    #[serde(default)]
    pub on_error_status_conflict: Option<ErrorStatusConflict>,
}

/// Runs the transforms in order.
pub struct ModelTransformer {
    transforms: Vec<Box<dyn Transform>>,
}

impl std::fmt::Debug for ModelTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|transform| transform.name()))
            .finish()
    }
}

impl Default for ModelTransformer {
    fn default() -> Self {
        Self::with_config(&TransformConfig::default())
    }
}

impl ModelTransformer {
    pub fn with_config(config: &TransformConfig) -> Self {
        let mut transforms: Vec<Box<dyn Transform>> =
            vec![Box::new(ResolveHttpErrorCodes), Box::new(AlignConstDefaults)];
        if config.on_error_status_conflict == Some(ErrorStatusConflict::OneOf) {
            transforms.push(Box::new(SynthesizeErrorUnions));
        }
        Self { transforms }
    }

    pub fn transform(&self, mut model: Model) -> Result<Model, TransformError> {
        for transform in &self.transforms {
            let before = model.len();
            model = transform.transform(model)?;
            info!(
                transform = transform.name(),
                added_shapes = model.len() - before,
                "applied model transform"
            );
        }
        Ok(model)
    }
}
