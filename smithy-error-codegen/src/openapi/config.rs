/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use serde::{Deserialize, Serialize};
use smithy_error_model::ShapeId;
use smithy_error_traits::{ErrorStatusConflict, TransformConfig};

pub const DEFAULT_OPENAPI_VERSION: &str = "3.1.0";

fn default_version() -> String {
    DEFAULT_OPENAPI_VERSION.into()
}

/// Settings of the `openapi` plugin in `smithy-build.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiConfig {
    /// The service to convert.
    pub service: ShapeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error_status_conflict: Option<ErrorStatusConflict>,
    /// The `openapi` version written to the document.
    #[serde(default = "default_version")]
    pub version: String,
}

impl OpenApiConfig {
    pub fn new(service: ShapeId) -> Self {
        Self {
            service,
            on_error_status_conflict: None,
            version: default_version(),
        }
    }

    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            on_error_status_conflict: self.on_error_status_conflict,
        }
    }
}
