/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::paths::{add_component_examples, add_response_examples, example_ref, for_each_operation};
use crate::openapi::{Context, OpenApiMapper};
use serde_json::json;
use smithy_error_model::prelude::DefaultTrait;
use smithy_error_model::{MemberShape, Model, Node, ObjectNode, Shape, ShapeId, ShapeType};
use smithy_error_traits::{ConstTrait, MemberExampleTrait};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Builds one example per error structure out of its `@const` and `@memberExample` members and
/// references it from the error responses.
///
/// References are keyed by the error name. This mapper runs after [`ErrorExampleMapper`], so it
/// wins when a single-entry `@errorExample` already claimed that key.
///
/// [`ErrorExampleMapper`]: super::ErrorExampleMapper
#[derive(Debug, Default, Clone, Copy)]
pub struct MemberExampleMapper;

/// Assembles example values, descending into nested structures and lists of structures.
struct ExampleBuilder<'a> {
    model: &'a Model,
    visiting: BTreeSet<&'a ShapeId>,
}

impl<'a> ExampleBuilder<'a> {
    fn new(model: &'a Model) -> Self {
        Self {
            model,
            visiting: BTreeSet::new(),
        }
    }

    /// `None` when no member of `shape`, direct or nested, contributes a value.
    fn structure(&mut self, shape: &'a Shape) -> Option<Node> {
        if !self.visiting.insert(&shape.id) {
            return None;
        }
        let mut example = ObjectNode::new();
        for member in shape.members.values() {
            if let Some(value) = self.member(member) {
                example.insert(member.member_name().to_string(), value);
            }
        }
        self.visiting.remove(&shape.id);
        (!example.is_empty()).then_some(Node::Object(example))
    }

    fn member(&mut self, member: &'a MemberShape) -> Option<Node> {
        if let Some(constant) = member.traits.find::<ConstTrait>() {
            return match constant.value() {
                Some(value) => Some(value.clone()),
                None => member.traits.find::<DefaultTrait>().map(|default| default.value),
            };
        }
        if let Some(example) = member.traits.find::<MemberExampleTrait>() {
            return Some(example.value);
        }
        let model = self.model;
        let target = model.get_shape(&member.target)?;
        match target.shape_type {
            ShapeType::Structure => self.structure(target),
            ShapeType::List | ShapeType::Set => {
                let item = target
                    .member("member")
                    .and_then(|item| model.get_shape(&item.target))
                    .filter(|item| item.is_structure())?;
                self.structure(item).map(|item| json!([item]))
            }
            _ => None,
        }
    }
}

impl OpenApiMapper for MemberExampleMapper {
    fn name(&self) -> &'static str {
        "MemberExampleMapper"
    }

    fn order(&self) -> u8 {
        61
    }

    fn update_node(&self, context: &Context<'_>, mut node: Node) -> Node {
        let mut builder = ExampleBuilder::new(context.model());
        let member_examples: BTreeMap<&ShapeId, Node> = context
            .model()
            .error_shapes()
            .filter(|shape| context.synthesized_union(shape).is_none())
            .filter_map(|shape| Some((&shape.id, builder.structure(shape)?)))
            .collect();
        if member_examples.is_empty() {
            return node;
        }
        debug!(errors = member_examples.len(), "found error shapes with member examples");

        let components: ObjectNode = member_examples
            .iter()
            .map(|(error_id, value)| {
                let name = error_id.shape_name();
                (name.to_string(), json!({ "summary": name, "value": value }))
            })
            .collect();
        add_component_examples(&mut node, &components);

        for_each_operation(context, &mut node, |operation, operation_object| {
            let mut by_code: BTreeMap<u16, ObjectNode> = BTreeMap::new();
            for (code, errors) in context.resolved_errors_by_code(operation) {
                for error_id in errors.into_iter().filter(|id| member_examples.contains_key(id)) {
                    let name = error_id.shape_name();
                    by_code
                        .entry(code)
                        .or_default()
                        .insert(name.to_string(), example_ref(name));
                }
            }
            add_response_examples(operation_object, &by_code);
        });
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::mapper::tests::{bank_model, convert_bank};
    use crate::openapi::mapper::ErrorExampleMapper;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_examples_from_members() {
        let model = bank_model(true);
        let mut builder = ExampleBuilder::new(&model);
        let suspended = model
            .get_shape(&"com.example#Suspended".parse().unwrap())
            .unwrap();
        assert_eq!(
            builder.structure(suspended),
            Some(json!({
                "code": "SUSPENDED",
                "details": {"since": "2024-01-01T00:00:00Z"},
                "history": [{"since": "2024-01-01T00:00:00Z"}],
                "reason": "fraud review"
            }))
        );
        let limit = model
            .get_shape(&"com.example#LimitExceeded".parse().unwrap())
            .unwrap();
        assert_eq!(
            builder.structure(limit),
            Some(json!({"code": "LIMIT", "limit": 1000}))
        );
    }

    #[test]
    fn const_marker_without_examples_still_contributes() {
        let model = bank_model(false);
        let limit = model
            .get_shape(&"com.example#LimitExceeded".parse().unwrap())
            .unwrap();
        assert_eq!(
            ExampleBuilder::new(&model).structure(limit),
            Some(json!({"code": "LIMIT"}))
        );
    }

    #[test]
    fn member_examples_replace_shared_reference_keys() {
        let model = bank_model(true);
        let (config, document) = convert_bank(&model);
        let context = Context::new(&model, &config).unwrap();
        let document = ErrorExampleMapper.update_node(&context, document);
        let mapped = MemberExampleMapper.update_node(&context, document);

        let examples = &mapped["components"]["examples"];
        assert_eq!(
            examples["LimitExceeded"],
            json!({"summary": "LimitExceeded", "value": {"code": "LIMIT", "limit": 1000}})
        );
        assert!(examples.get("SuspendedExample").is_some());
        assert!(examples.get("Suspended").is_some());

        let response = &mapped["paths"]["/transfers"]["post"]["responses"]["422"]["content"]
            ["application/json"]["examples"];
        assert_eq!(
            response,
            &json!({
                "LimitExceeded": {"$ref": "#/components/examples/LimitExceeded"},
                "LimitExceeded1": {"$ref": "#/components/examples/LimitExceededExample1"},
                "LimitExceeded2": {"$ref": "#/components/examples/LimitExceededExample2"},
                "Suspended": {"$ref": "#/components/examples/Suspended"}
            })
        );
    }
}
