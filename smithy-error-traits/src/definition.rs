/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::{ConstTrait, ErrorExampleTrait, MemberExampleTrait};
use smithy_error_model::{Model, Node, ShapeId, ShapeType, Trait, TraitError};
use std::collections::BTreeMap;
use std::fmt;

/// The shapes a trait may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `structure > member`
    StructureMember,
    /// `structure[trait|error]`
    ErrorStructure,
}

impl Selector {
    pub fn matches(&self, model: &Model, shape_id: &ShapeId) -> bool {
        match self {
            Selector::StructureMember => {
                shape_id.member_name().is_some()
                    && model.get_member(shape_id).is_some()
                    && model.shape_type_of(&shape_id.without_member()) == Some(ShapeType::Structure)
            }
            Selector::ErrorStructure => model
                .get_shape(shape_id)
                .map(|shape| shape.is_error())
                .unwrap_or(false),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Selector::StructureMember => "structure members",
            Selector::ErrorStructure => "structures with the `@error` trait",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Checks a payload against a trait's schema, returning every problem found.
pub type PayloadCheck = fn(&Node) -> Vec<TraitError>;

/// A custom trait: its id, where it can be applied, and its payload schema.
#[derive(Clone)]
pub struct TraitDefinition {
    pub id: &'static str,
    pub selector: Selector,
    pub check_payload: PayloadCheck,
}

impl fmt::Debug for TraitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraitDefinition")
            .field("id", &self.id)
            .field("selector", &self.selector)
            .finish()
    }
}

impl TraitDefinition {
    /// A definition whose payload is checked by the trait's own parser.
    pub fn of<T: Trait>(selector: Selector) -> Self {
        Self {
            id: T::ID,
            selector,
            check_payload: check_with_parser::<T>,
        }
    }

    /// The trait's name without its namespace, used as the validation event id.
    pub fn name(&self) -> &'static str {
        self.id.split_once('#').map(|(_, name)| name).unwrap_or(self.id)
    }
}

fn check_with_parser<T: Trait>(node: &Node) -> Vec<TraitError> {
    T::from_node(node).err().into_iter().collect()
}

fn check_error_examples(node: &Node) -> Vec<TraitError> {
    match ErrorExampleTrait::parse_entries(node) {
        Ok((_, errors)) => errors,
        Err(err) => vec![err],
    }
}

/// The set of known custom traits, keyed by trait id.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    definitions: BTreeMap<&'static str, TraitDefinition>,
}

impl TraitRegistry {
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, definition: TraitDefinition) -> &mut Self {
        self.definitions.insert(definition.id, definition);
        self
    }

    pub fn get(&self, trait_id: &str) -> Option<&TraitDefinition> {
        self.definitions.get(trait_id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TraitDefinition> {
        self.definitions.values()
    }
}

impl Default for TraitRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(TraitDefinition::of::<ConstTrait>(Selector::StructureMember))
            .register(TraitDefinition::of::<MemberExampleTrait>(
                Selector::StructureMember,
            ))
            .register(TraitDefinition {
                id: ErrorExampleTrait::ID,
                selector: Selector::ErrorStructure,
                check_payload: check_error_examples,
            });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use smithy_error_model::ModelAssembler;

    fn model() -> Model {
        ModelAssembler::new()
            .add_unparsed_model(
                "test.json",
                json!({
                    "smithy": "2.0",
                    "shapes": {
                        "com.example#Oops": {
                            "type": "structure",
                            "members": {"code": {"target": "smithy.api#String"}},
                            "traits": {"smithy.api#error": "client"}
                        },
                        "com.example#Plain": {"type": "structure"},
                        "com.example#Choice": {
                            "type": "union",
                            "members": {"a": {"target": "smithy.api#String"}}
                        }
                    }
                })
                .to_string(),
            )
            .assemble()
            .unwrap()
    }

    fn id(value: &str) -> ShapeId {
        ShapeId::parse(value).unwrap()
    }

    #[test]
    fn selectors() {
        let model = model();
        let member = Selector::StructureMember;
        assert!(member.matches(&model, &id("com.example#Oops$code")));
        assert!(!member.matches(&model, &id("com.example#Oops")));
        assert!(!member.matches(&model, &id("com.example#Choice$a")));

        let error = Selector::ErrorStructure;
        assert!(error.matches(&model, &id("com.example#Oops")));
        assert!(!error.matches(&model, &id("com.example#Plain")));
    }

    #[test]
    fn default_registry() {
        let registry = TraitRegistry::default();
        let names: Vec<_> = registry.definitions().map(|d| d.name()).collect();
        assert_eq!(names, vec!["const", "errorExample", "memberExample"]);
        let error_example = registry.get("com.example#errorExample").unwrap();
        assert_eq!(
            (error_example.check_payload)(&json!([{"content": {}}, {"title": 1, "content": {}}])).len(),
            2
        );
        let const_trait = registry.get("com.example#const").unwrap();
        assert!((const_trait.check_payload)(&json!("x")).is_empty());
    }
}
