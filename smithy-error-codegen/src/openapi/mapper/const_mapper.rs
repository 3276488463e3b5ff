/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::openapi::{Context, OpenApiMapper};
use smithy_error_model::{Node, Trait};
use smithy_error_traits::ConstTrait;
use std::collections::BTreeSet;
use tracing::debug;

/// Suffixes of the schemas the converter synthesizes for request and response bodies.
const SYNTHETIC_SUFFIXES: &[&str] = &["ResponseContent", "RequestContent"];

/// Replaces `default` with `const` in the schema properties of `@const` members.
///
/// A property is matched by its schema name, with a `ResponseContent`/`RequestContent` suffix
/// stripped, and its property name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstMapper;

fn base_schema_name(schema_name: &str) -> &str {
    SYNTHETIC_SUFFIXES
        .iter()
        .find_map(|suffix| schema_name.strip_suffix(suffix))
        .unwrap_or(schema_name)
}

impl OpenApiMapper for ConstMapper {
    fn name(&self) -> &'static str {
        "ConstMapper"
    }

    fn order(&self) -> u8 {
        50
    }

    fn update_node(&self, context: &Context<'_>, mut node: Node) -> Node {
        let const_members: BTreeSet<(&str, &str)> = context
            .model()
            .structure_shapes()
            .flat_map(|shape| {
                shape
                    .members
                    .values()
                    .filter(|member| member.traits.contains(ConstTrait::ID))
                    .map(move |member| (shape.name(), member.member_name()))
            })
            .collect();
        if const_members.is_empty() {
            return node;
        }

        let Some(schemas) = node
            .pointer_mut("/components/schemas")
            .and_then(Node::as_object_mut)
        else {
            return node;
        };
        for (schema_name, schema) in schemas.iter_mut() {
            let base_name = base_schema_name(schema_name);
            let Some(properties) = schema
                .get_mut("properties")
                .and_then(Node::as_object_mut)
            else {
                continue;
            };
            for (property_name, property) in properties.iter_mut() {
                let is_const = const_members.contains(&(schema_name.as_str(), property_name.as_str()))
                    || const_members.contains(&(base_name, property_name.as_str()));
                if !is_const {
                    continue;
                }
                let Some(property) = property.as_object_mut() else {
                    continue;
                };
                if let Some(value) = property.remove("default") {
                    debug!(schema = %schema_name, property = %property_name, %value, "transformed default to const");
                    property.insert("const".into(), value);
                }
            }
        }
        node
    }
}
