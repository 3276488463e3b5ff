/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::openapi::Context;
use serde_json::json;
use smithy_error_model::{Node, ObjectNode, Shape};
use std::collections::BTreeMap;

/// Copies `examples` into `target`. Keys that already exist take the new value.
fn merge(target: &mut ObjectNode, examples: &ObjectNode) {
    for (key, value) in examples {
        target.insert(key.clone(), value.clone());
    }
}

/// `#/components/examples/<name>`
pub(super) fn example_ref(name: &str) -> Node {
    json!({ "$ref": format!("#/components/examples/{name}") })
}

fn object_member<'n>(object: &'n mut ObjectNode, key: &str) -> Option<&'n mut ObjectNode> {
    object
        .entry(key)
        .or_insert_with(|| Node::Object(ObjectNode::new()))
        .as_object_mut()
}

/// Adds entries to `components/examples`, creating it if needed.
pub(super) fn add_component_examples(node: &mut Node, examples: &ObjectNode) {
    let component_examples = node
        .as_object_mut()
        .and_then(|document| object_member(document, "components"))
        .and_then(|components| object_member(components, "examples"));
    if let Some(component_examples) = component_examples {
        merge(component_examples, examples);
    }
}

/// Calls `f` with every path operation that maps to an operation of the service.
pub(super) fn for_each_operation<'a>(
    context: &Context<'a>,
    node: &mut Node,
    mut f: impl FnMut(&'a Shape, &mut ObjectNode),
) {
    let Some(paths) = node.get_mut("paths").and_then(Node::as_object_mut) else {
        return;
    };
    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        for (method, operation_object) in item.iter_mut() {
            let (Some(operation), Some(operation_object)) = (
                context.find_operation(path, method),
                operation_object.as_object_mut(),
            ) else {
                continue;
            };
            f(operation, operation_object);
        }
    }
}

/// Adds examples to every media type of the responses whose status code has examples.
/// Non-numeric response keys such as `default` are left alone.
pub(super) fn add_response_examples(
    operation_object: &mut ObjectNode,
    examples_by_code: &BTreeMap<u16, ObjectNode>,
) {
    let Some(responses) = operation_object
        .get_mut("responses")
        .and_then(Node::as_object_mut)
    else {
        return;
    };
    for (code, response) in responses.iter_mut() {
        let Some(examples) = code
            .parse::<u16>()
            .ok()
            .and_then(|code| examples_by_code.get(&code))
            .filter(|examples| !examples.is_empty())
        else {
            continue;
        };
        let Some(content) = response.get_mut("content").and_then(Node::as_object_mut) else {
            continue;
        };
        for media_type in content.values_mut() {
            if let Some(media_examples) = media_type
                .as_object_mut()
                .and_then(|media_type| object_member(media_type, "examples"))
            {
                merge(media_examples, examples);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn response_examples_merge() {
        let mut operation = json!({
            "responses": {
                "200": {"description": "ok"},
                "422": {
                    "description": "conflict",
                    "content": {"application/json": {"examples": {"Existing": {"value": {}}}}}
                },
                "default": {"content": {"application/json": {}}}
            }
        });
        let mut by_code = BTreeMap::new();
        let mut examples = ObjectNode::new();
        examples.insert("Existing".into(), example_ref("Replaced"));
        examples.insert("Limit".into(), example_ref("LimitExample"));
        by_code.insert(422, examples);

        add_response_examples(operation.as_object_mut().unwrap(), &by_code);
        assert_eq!(
            operation["responses"]["422"]["content"]["application/json"]["examples"],
            json!({
                "Existing": {"$ref": "#/components/examples/Replaced"},
                "Limit": {"$ref": "#/components/examples/LimitExample"}
            })
        );
        assert_eq!(operation["responses"]["default"], json!({"content": {"application/json": {}}}));
    }

    #[test]
    fn component_examples_are_created() {
        let mut document = json!({"openapi": "3.1.0"});
        let mut examples = ObjectNode::new();
        examples.insert("A".into(), json!({"summary": "a"}));
        add_component_examples(&mut document, &examples);
        assert_eq!(document["components"], json!({"examples": {"A": {"summary": "a"}}}));
    }
}
