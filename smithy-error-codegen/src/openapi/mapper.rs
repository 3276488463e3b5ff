/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Post-processing steps over a converted OpenAPI document.

use crate::openapi::Context;
use smithy_error_model::Node;

mod const_mapper;
mod error_example;
mod member_example;
mod paths;

pub use const_mapper::ConstMapper;
pub use error_example::ErrorExampleMapper;
pub use member_example::MemberExampleMapper;

/// Updates an OpenAPI document after conversion.
///
/// Mappers run in ascending [`order`](OpenApiMapper::order). A mapper must leave parts of the
/// document it doesn't understand untouched.
pub trait OpenApiMapper {
    fn name(&self) -> &'static str;

    fn order(&self) -> u8 {
        0
    }

    fn update_node(&self, context: &Context<'_>, node: Node) -> Node;
}

/// A bundle of mappers registered together.
pub trait OpenApiExtension {
    fn mappers(&self) -> Vec<Box<dyn OpenApiMapper>>;
}

/// Registers the mappers for `@const`, `@errorExample` and `@memberExample`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorExampleExtension;

impl OpenApiExtension for ErrorExampleExtension {
    fn mappers(&self) -> Vec<Box<dyn OpenApiMapper>> {
        vec![
            Box::new(ConstMapper),
            Box::new(ErrorExampleMapper),
            Box::new(MemberExampleMapper),
        ]
    }
}

/// Runs the mappers of every extension over `node`, in ascending order.
pub fn apply_extensions(
    context: &Context<'_>,
    node: Node,
    extensions: &[&dyn OpenApiExtension],
) -> Node {
    let mut mappers: Vec<Box<dyn OpenApiMapper>> = extensions
        .iter()
        .flat_map(|extension| extension.mappers())
        .collect();
    mappers.sort_by_key(|mapper| mapper.order());
    mappers.into_iter().fold(node, |node, mapper| {
        tracing::debug!(mapper = mapper.name(), order = mapper.order(), "applying OpenAPI mapper");
        mapper.update_node(context, node)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::openapi::{convert, OpenApiConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use smithy_error_model::{Model, ModelAssembler};

    /// A service with two operations sharing the 422 error `LimitExceeded`. Member level
    /// `@memberExample` traits are only applied when `member_examples` is set.
    pub(crate) fn bank_model(member_examples: bool) -> Model {
        let example = |value: Node| -> Node {
            if member_examples {
                json!({ "com.example#memberExample": value })
            } else {
                json!({})
            }
        };
        let ast = json!({
            "smithy": "2.0",
            "shapes": {
                "com.example#Bank": {
                    "type": "service",
                    "version": "2024-06-01",
                    "operations": [
                        {"target": "com.example#CreateTransfer"},
                        {"target": "com.example#GetLimits"}
                    ]
                },
                "com.example#CreateTransfer": {
                    "type": "operation",
                    "errors": [
                        {"target": "com.example#LimitExceeded"},
                        {"target": "com.example#Suspended"}
                    ],
                    "traits": {"smithy.api#http": {"method": "POST", "uri": "/transfers"}}
                },
                "com.example#GetLimits": {
                    "type": "operation",
                    "errors": [{"target": "com.example#LimitExceeded"}],
                    "traits": {"smithy.api#http": {"method": "GET", "uri": "/limits"}}
                },
                "com.example#LimitExceeded": {
                    "type": "structure",
                    "members": {
                        "code": {
                            "target": "smithy.api#String",
                            "traits": {"smithy.api#default": "LIMIT", "com.example#const": {}}
                        },
                        "limit": {"target": "smithy.api#Integer", "traits": example(json!(1000))}
                    },
                    "traits": {
                        "smithy.api#error": "client",
                        "smithy.api#httpError": 422,
                        "com.example#errorExample": [
                            {
                                "title": "Daily limit",
                                "documentation": "Resets at midnight UTC",
                                "content": {"code": "LIMIT", "limit": 1000}
                            },
                            {"title": "Monthly limit", "content": {"code": "LIMIT", "limit": 20000}}
                        ]
                    }
                },
                "com.example#Suspended": {
                    "type": "structure",
                    "members": {
                        "code": {
                            "target": "smithy.api#String",
                            "traits": {"smithy.api#default": "SUSPENDED", "com.example#const": "SUSPENDED"}
                        },
                        "reason": {"target": "smithy.api#String", "traits": example(json!("fraud review"))},
                        "details": {"target": "com.example#SuspensionDetails"},
                        "history": {"target": "com.example#SuspensionHistory"}
                    },
                    "traits": {
                        "smithy.api#error": "client",
                        "smithy.api#httpError": 422,
                        "com.example#errorExample": [
                            {"title": "Suspended account", "content": {"code": "SUSPENDED"}}
                        ]
                    }
                },
                "com.example#SuspensionDetails": {
                    "type": "structure",
                    "members": {
                        "since": {
                            "target": "smithy.api#Timestamp",
                            "traits": example(json!("2024-01-01T00:00:00Z"))
                        }
                    }
                },
                "com.example#SuspensionHistory": {
                    "type": "list",
                    "member": {"target": "com.example#SuspensionDetails"}
                }
            }
        });
        ModelAssembler::new()
            .add_unparsed_model("bank.json", ast.to_string())
            .assemble()
            .unwrap()
    }

    /// Converts [`bank_model`] without applying any mapper.
    pub(crate) fn convert_bank(model: &Model) -> (OpenApiConfig, Node) {
        let config = OpenApiConfig::new("com.example#Bank".parse().unwrap());
        let document = convert(&Context::new(model, &config).unwrap()).unwrap();
        (config, document)
    }

    #[derive(Debug)]
    struct Recording(&'static str, u8);

    impl OpenApiMapper for Recording {
        fn name(&self) -> &'static str {
            self.0
        }

        fn order(&self) -> u8 {
            self.1
        }

        fn update_node(&self, _context: &Context<'_>, mut node: Node) -> Node {
            if let Some(applied) = node.get_mut("applied").and_then(Node::as_array_mut) {
                applied.push(json!(self.0));
            }
            node
        }
    }

    struct RecordingExtension;

    impl OpenApiExtension for RecordingExtension {
        fn mappers(&self) -> Vec<Box<dyn OpenApiMapper>> {
            vec![
                Box::new(Recording("late", 90)),
                Box::new(Recording("early", 10)),
                Box::new(Recording("middle", 55)),
            ]
        }
    }

    #[test]
    fn mappers_run_in_order() {
        let model = bank_model(false);
        let (config, _) = convert_bank(&model);
        let context = Context::new(&model, &config).unwrap();
        let node = apply_extensions(&context, json!({"applied": []}), &[&RecordingExtension]);
        assert_eq!(node, json!({"applied": ["early", "middle", "late"]}));
    }

    #[test]
    fn const_becomes_const_keyword_in_document() {
        let model = bank_model(true);
        let (config, document) = convert_bank(&model);
        let context = Context::new(&model, &config).unwrap();
        let document = apply_extensions(&context, document, &[&ErrorExampleExtension]);
        assert_eq!(
            document["components"]["schemas"]["LimitExceededResponseContent"]["properties"]["code"],
            json!({"type": "string", "const": "LIMIT"})
        );
        assert!(document["components"]["examples"].get("SuspendedExample").is_some());
    }
}
