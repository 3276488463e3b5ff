/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use smithy_error_model::ShapeId;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("service `{0}` is not defined in the model")]
    UnknownService(ShapeId),
    #[error("`{shape_id}` is not a service (found {shape_type})")]
    NotAService {
        shape_id: ShapeId,
        shape_type: smithy_error_model::ShapeType,
    },
    #[error("`{0}` and `{1}` both generate the OpenAPI path {2}")]
    ConflictingOperations(ShapeId, ShapeId, String),
    #[error("`{first}` and `{second}` both generate the OpenAPI schema `{name}`")]
    ConflictingSchemas {
        name: String,
        first: ShapeId,
        second: ShapeId,
    },
    #[error("two artifacts claim the path `{}`", .0.display())]
    DuplicatePath(PathBuf),
    #[error("invalid error type template")]
    Template(#[from] handlebars::TemplateError),
    #[error("failed to render the error type for `{shape_id}`")]
    Render {
        shape_id: ShapeId,
        #[source]
        source: handlebars::RenderError,
    },
    #[error("failed to serialize the OpenAPI document")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
