/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::artifact::{Artifact, ArtifactSet};
use crate::openapi::{to_openapi, OpenApiConfig};
use crate::rust_types::RustTypesGenerator;
use crate::GenerateError;
use serde::{Deserialize, Serialize};
use smithy_error_model::{Model, ShapeId};
use tracing::info;

/// Settings of the `error-types` plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorTypesConfig {
    pub service: ShapeId,
}

/// The enabled generators. A disabled generator produces nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub openapi: Option<OpenApiConfig>,
    pub error_types: Option<ErrorTypesConfig>,
}

/// Generates every artifact of a transformed model.
///
/// Output is a pure function of the model and the configuration: JSON objects serialize with
/// sorted keys and shapes are visited in shape id order.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactGenerator<'a> {
    model: &'a Model,
}

impl<'a> ArtifactGenerator<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// `<Service>.openapi.json`
    pub fn openapi(&self, config: &OpenApiConfig) -> Result<Artifact, GenerateError> {
        let document = to_openapi(self.model, config)?;
        Ok(Artifact::new(
            config.service.clone(),
            format!("{}.openapi.json", config.service.shape_name()),
            serde_json::to_string_pretty(&document)?,
        ))
    }

    pub fn error_types(&self, config: &ErrorTypesConfig) -> Result<Vec<Artifact>, GenerateError> {
        RustTypesGenerator::new(self.model)?.generate(&config.service)
    }

    pub fn generate(&self, config: &GenerateConfig) -> Result<ArtifactSet, GenerateError> {
        let mut artifacts = ArtifactSet::new();
        if let Some(openapi) = &config.openapi {
            artifacts.insert(self.openapi(openapi)?)?;
        }
        if let Some(error_types) = &config.error_types {
            artifacts.extend(self.error_types(error_types)?)?;
        }
        info!(artifacts = artifacts.len(), "generated artifacts");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use smithy_error_model::ModelAssembler;
    use smithy_error_traits::{ErrorStatusConflict, ModelTransformer, TransformConfig};

    fn model() -> Model {
        let ast = json!({
            "smithy": "2.0",
            "shapes": {
                "com.example#Bank": {
                    "type": "service",
                    "version": "2024-06-01",
                    "operations": [{"target": "com.example#Transfer"}]
                },
                "com.example#Transfer": {
                    "type": "operation",
                    "errors": [
                        {"target": "com.example#LimitExceeded"},
                        {"target": "com.example#Suspended"}
                    ],
                    "traits": {"smithy.api#http": {"method": "POST", "uri": "/transfers"}}
                },
                "com.example#LimitExceeded": {
                    "type": "structure",
                    "members": {
                        "code": {
                            "target": "smithy.api#String",
                            "traits": {"smithy.api#default": "LIMIT", "com.example#const": {}}
                        }
                    },
                    "traits": {"smithy.api#error": "client", "smithy.api#httpError": 422}
                },
                "com.example#Suspended": {
                    "type": "structure",
                    "members": {
                        "message": {"target": "smithy.api#String"}
                    },
                    "traits": {
                        "smithy.api#error": "client",
                        "smithy.api#httpError": 422,
                        "com.example#errorExample": [
                            {"title": "Suspended", "content": {"message": "suspended"}}
                        ]
                    }
                }
            }
        });
        let model = ModelAssembler::new()
            .add_unparsed_model("bank.json", ast.to_string())
            .assemble()
            .unwrap();
        ModelTransformer::with_config(&TransformConfig {
            on_error_status_conflict: Some(ErrorStatusConflict::OneOf),
        })
        .transform(model)
        .unwrap()
    }

    fn config() -> GenerateConfig {
        let service: ShapeId = "com.example#Bank".parse().unwrap();
        GenerateConfig {
            openapi: Some(OpenApiConfig::new(service.clone())),
            error_types: Some(ErrorTypesConfig { service }),
        }
    }

    #[test]
    fn generates_every_enabled_artifact() {
        let model = model();
        let artifacts = ArtifactGenerator::new(&model).generate(&config()).unwrap();
        let paths: Vec<_> = artifacts
            .iter()
            .map(|artifact| artifact.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            paths,
            vec![
                "Bank.openapi.json",
                "errors/limit_exceeded.rs",
                "errors/mod.rs",
                "errors/suspended.rs",
            ]
        );

        let document: serde_json::Value =
            serde_json::from_str(&artifacts.get("Bank.openapi.json").unwrap().contents).unwrap();
        let response = &document["paths"]["/transfers"]["post"]["responses"]["422"];
        assert_eq!(
            response["content"]["application/json"]["schema"],
            json!({"$ref": "#/components/schemas/Transfer422ErrorResponseContent"})
        );
        assert_eq!(
            response["content"]["application/json"]["examples"]["Suspended"],
            json!({"$ref": "#/components/examples/SuspendedExample"})
        );
        assert_eq!(
            document["components"]["schemas"]["LimitExceededResponseContent"]["properties"]["code"],
            json!({"type": "string", "const": "LIMIT"})
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let first = ArtifactGenerator::new(&model()).generate(&config()).unwrap();
        let second = ArtifactGenerator::new(&model()).generate(&config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn disabled_generators_produce_nothing() {
        let model = model();
        let artifacts = ArtifactGenerator::new(&model)
            .generate(&GenerateConfig::default())
            .unwrap();
        assert!(artifacts.is_empty());
    }
}
