/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::paths::{
    add_component_examples, add_response_examples, example_ref, for_each_operation,
};
use crate::openapi::{Context, OpenApiMapper};
use serde_json::json;
use smithy_error_model::{Node, ObjectNode, ShapeId};
use smithy_error_traits::ErrorExampleTrait;
use std::collections::BTreeMap;
use tracing::debug;

/// Adds `@errorExample` entries to `components/examples` and references them from the error
/// responses of every operation that can return the error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorExampleMapper;

impl OpenApiMapper for ErrorExampleMapper {
    fn name(&self) -> &'static str {
        "ErrorExampleMapper"
    }

    fn order(&self) -> u8 {
        60
    }

    fn update_node(&self, context: &Context<'_>, mut node: Node) -> Node {
        let error_examples: BTreeMap<&ShapeId, ErrorExampleTrait> = context
            .model()
            .error_shapes()
            .filter_map(|shape| Some((&shape.id, shape.traits.find::<ErrorExampleTrait>()?)))
            .collect();
        if error_examples.is_empty() {
            return node;
        }
        debug!(errors = error_examples.len(), "found errors with @errorExample");

        let mut components = ObjectNode::new();
        for (error_id, examples) in &error_examples {
            for (index, example) in examples.examples.iter().enumerate() {
                let mut component = json!({ "summary": example.title, "value": example.content });
                if let (Some(doc), Some(object)) = (&example.documentation, component.as_object_mut()) {
                    object.insert("description".into(), Node::String(doc.clone()));
                }
                components.insert(examples.example_name(error_id.shape_name(), index), component);
            }
        }
        add_component_examples(&mut node, &components);

        for_each_operation(context, &mut node, |operation, operation_object| {
            let mut by_code: BTreeMap<u16, ObjectNode> = BTreeMap::new();
            for (code, errors) in context.resolved_errors_by_code(operation) {
                for error_id in errors {
                    let Some(examples) = error_examples.get(error_id) else {
                        continue;
                    };
                    let name = error_id.shape_name();
                    let references = by_code.entry(code).or_default();
                    for index in 0..examples.examples.len() {
                        references.insert(
                            examples.reference_key(name, index),
                            example_ref(&examples.example_name(name, index)),
                        );
                    }
                }
            }
            add_response_examples(operation_object, &by_code);
        });
        node
    }
}
