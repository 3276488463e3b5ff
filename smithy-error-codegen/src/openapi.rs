/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! OpenAPI generation: the converter plus the mappers registered by [`ErrorExampleExtension`].

mod config;
mod context;
mod convert;
mod mapper;

pub use config::{OpenApiConfig, DEFAULT_OPENAPI_VERSION};
pub use context::Context;
pub use convert::{convert, schema_ref};
pub use mapper::{
    apply_extensions, ConstMapper, ErrorExampleExtension, ErrorExampleMapper, MemberExampleMapper,
    OpenApiExtension, OpenApiMapper,
};

use crate::GenerateError;
use smithy_error_model::{Model, Node};

/// Converts the configured service of `model` and applies the error example mappers.
///
/// The model is expected to be transformed already: conflicting error status codes that were not
/// synthesized into unions become a `oneOf` response.
pub fn to_openapi(model: &Model, config: &OpenApiConfig) -> Result<Node, GenerateError> {
    let context = Context::new(model, config)?;
    let document = convert(&context)?;
    Ok(apply_extensions(&context, document, &[&ErrorExampleExtension]))
}
