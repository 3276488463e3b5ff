/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Model validation.
//!
//! Validators never stop at the first problem: every violation becomes a [`ValidationEvent`]
//! so a model author can fix everything in one pass.

use crate::definition::TraitRegistry;
use crate::{ConstTrait, ErrorExampleTrait, MemberExampleTrait};
use smithy_error_model::prelude::{DefaultTrait, ErrorTrait, HttpErrorTrait, HttpTrait};
use smithy_error_model::{MemberShape, Model, Node, ShapeId, ShapeType, Trait, TraitError};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    /// `Target` for broken shape references, otherwise the name of the trait being checked.
    pub id: String,
    pub severity: Severity,
    pub shape_id: ShapeId,
    pub trait_id: Option<String>,
    pub message: String,
}

impl ValidationEvent {
    pub fn error(id: impl Into<String>, shape_id: &ShapeId, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Error,
            shape_id: shape_id.clone(),
            trait_id: None,
            message: message.into(),
        }
    }

    pub fn warning(id: impl Into<String>, shape_id: &ShapeId, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(id, shape_id, message)
        }
    }

    pub fn for_trait(self, trait_id: &str) -> Self {
        Self {
            trait_id: Some(trait_id.to_string()),
            ..self
        }
    }

    fn sort_key(&self) -> (&ShapeId, &str, &str) {
        (&self.shape_id, &self.id, &self.message)
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} | {}",
            self.severity, self.shape_id, self.message, self.id
        )
    }
}

/// The model failed validation. Lists every `ERROR` event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model validation failed with {} error(s):{}", .errors.len(), list_events(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<ValidationEvent>,
}

fn list_events(events: &[ValidationEvent]) -> String {
    events.iter().map(|event| format!("\n  {event}")).collect()
}

/// Every event produced by validating a model, sorted by shape id, event id and message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedResult {
    events: Vec<ValidationEvent>,
}

impl ValidatedResult {
    pub fn new(mut events: Vec<ValidationEvent>) -> Self {
        events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        events.dedup();
        Self { events }
    }

    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationEvent> {
        self.events
            .iter()
            .filter(|event| event.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationEvent> {
        self.events
            .iter()
            .filter(|event| event.severity == Severity::Warning)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Fails with every `ERROR` event if there are any.
    pub fn unwrap_valid(&self) -> Result<(), ValidationFailure> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationFailure {
                errors: self.errors().cloned().collect(),
            })
        }
    }
}

/// A check over the whole model.
pub trait Validator {
    fn name(&self) -> &'static str;
    fn validate(&self, model: &Model) -> Vec<ValidationEvent>;
}

/// Every shape reference in the model must resolve.
#[derive(Debug, Default)]
pub struct TargetValidator;

impl TargetValidator {
    fn check(model: &Model, from: &ShapeId, relationship: &str, target: &ShapeId) -> Option<ValidationEvent> {
        if model.shape_type_of(target).is_some() {
            return None;
        }
        Some(ValidationEvent::error(
            "Target",
            from,
            format!("{relationship} targets `{target}`, which does not exist"),
        ))
    }
}

impl Validator for TargetValidator {
    fn name(&self) -> &'static str {
        "Target"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for shape in model.shapes() {
            for member in shape.members.values() {
                events.extend(Self::check(model, &member.id, "member", &member.target));
            }
            let references = [
                ("input", shape.input.iter().collect::<Vec<_>>()),
                ("output", shape.output.iter().collect()),
                ("error", shape.errors.iter().collect()),
                ("operation", shape.operations.iter().collect()),
                ("collection operation", shape.collection_operations.iter().collect()),
                ("resource", shape.resources.iter().collect()),
                ("lifecycle operation", shape.lifecycle.values().collect()),
            ];
            for (relationship, targets) in references {
                for target in targets {
                    events.extend(Self::check(model, &shape.id, relationship, target));
                }
            }
        }
        events
    }
}

/// Payloads of the prelude traits that drive status codes and routes: `@error`, `@httpError`
/// and `@http`. A payload that doesn't parse would otherwise be skipped by every reader.
#[derive(Debug, Default)]
pub struct PreludeTraitValidator;

impl PreludeTraitValidator {
    fn check(value: &Node, trait_id: &str) -> Option<Result<(), TraitError>> {
        if trait_id == ErrorTrait::ID {
            Some(ErrorTrait::from_node(value).map(drop))
        } else if trait_id == HttpErrorTrait::ID {
            Some(HttpErrorTrait::from_node(value).map(drop))
        } else if trait_id == HttpTrait::ID {
            Some(HttpTrait::from_node(value).map(drop))
        } else {
            None
        }
    }
}

impl Validator for PreludeTraitValidator {
    fn name(&self) -> &'static str {
        "PreludeTrait"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        model
            .trait_applications()
            .into_iter()
            .filter_map(|application| {
                let trait_id = application.trait_id.as_str();
                let problem = Self::check(application.value, trait_id)?.err()?;
                Some(
                    ValidationEvent::error(
                        application.trait_id.shape_name(),
                        application.shape_id,
                        problem.to_string(),
                    )
                    .for_trait(trait_id),
                )
            })
            .collect()
    }
}

/// Applies each registered trait's selector and payload schema.
#[derive(Debug, Default)]
pub struct TraitDefinitionValidator {
    registry: TraitRegistry,
}

impl TraitDefinitionValidator {
    pub fn new(registry: TraitRegistry) -> Self {
        Self { registry }
    }
}

impl Validator for TraitDefinitionValidator {
    fn name(&self) -> &'static str {
        "TraitDefinition"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for application in model.trait_applications() {
            let Some(definition) = self.registry.get(application.trait_id.as_str()) else {
                continue;
            };
            if !definition.selector.matches(model, application.shape_id) {
                events.push(
                    ValidationEvent::error(
                        definition.name(),
                        application.shape_id,
                        format!(
                            "\"{}\" trait is only applicable to {}",
                            definition.id, definition.selector
                        ),
                    )
                    .for_trait(definition.id),
                );
            }
            for problem in (definition.check_payload)(application.value) {
                events.push(
                    ValidationEvent::error(definition.name(), application.shape_id, problem.to_string())
                        .for_trait(definition.id),
                );
            }
        }
        events
    }
}

/// Whether `value` can be a value of a shape of type `target`.
fn node_matches_type(value: &Node, target: ShapeType) -> bool {
    match target {
        ShapeType::Document => true,
        ShapeType::String | ShapeType::Enum | ShapeType::Blob => value.is_string(),
        ShapeType::Timestamp => value.is_string() || value.is_number(),
        ShapeType::Boolean => value.is_boolean(),
        ShapeType::Structure | ShapeType::Union | ShapeType::Map => value.is_object(),
        ShapeType::List | ShapeType::Set => value.is_array(),
        other if other.is_number() => value.is_number(),
        _ => false,
    }
}

fn check_value_type(
    model: &Model,
    member: &MemberShape,
    trait_id: &'static str,
    event_id: &str,
    value: &Node,
) -> Option<ValidationEvent> {
    let target = model.target_type(member)?;
    if node_matches_type(value, target) {
        return None;
    }
    Some(
        ValidationEvent::error(
            event_id,
            &member.id,
            format!("value `{value}` is not compatible with the member's target type `{target}`"),
        )
        .for_trait(trait_id),
    )
}

fn structure_members(model: &Model) -> impl Iterator<Item = &MemberShape> {
    model
        .structure_shapes()
        .flat_map(|shape| shape.members.values())
}

/// `@const` must agree with `@default` and with the member's target type.
#[derive(Debug, Default)]
pub struct ConstValidator;

impl Validator for ConstValidator {
    fn name(&self) -> &'static str {
        "const"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for member in structure_members(model) {
            // Malformed payloads are reported by the definition validator.
            let Ok(Some(const_trait)) = member.traits.get_trait::<ConstTrait>() else {
                continue;
            };
            let default = member.traits.find::<DefaultTrait>();
            match (const_trait.value(), &default) {
                (None, None) => events.push(
                    ValidationEvent::error(
                        self.name(),
                        &member.id,
                        "`@const` without a value requires the member to have a `@default` value",
                    )
                    .for_trait(ConstTrait::ID),
                ),
                (Some(value), Some(default)) if *value != default.value => events.push(
                    ValidationEvent::error(
                        self.name(),
                        &member.id,
                        format!(
                            "`@const` value `{value}` differs from the `@default` value `{}`",
                            default.value
                        ),
                    )
                    .for_trait(ConstTrait::ID),
                ),
                _ => {}
            }
            let constant = const_trait
                .value()
                .cloned()
                .or_else(|| default.map(|default| default.value));
            if let Some(constant) = constant {
                events.extend(check_value_type(
                    model,
                    member,
                    ConstTrait::ID,
                    self.name(),
                    &constant,
                ));
            }
            if member.traits.contains(MemberExampleTrait::ID) {
                events.push(
                    ValidationEvent::warning(
                        self.name(),
                        &member.id,
                        "member has both `@const` and `@memberExample`; the constant is used as the example",
                    )
                    .for_trait(ConstTrait::ID),
                );
            }
        }
        events
    }
}

/// `@memberExample` must fit the member's target type.
#[derive(Debug, Default)]
pub struct MemberExampleValidator;

impl Validator for MemberExampleValidator {
    fn name(&self) -> &'static str {
        "memberExample"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        structure_members(model)
            .filter_map(|member| {
                let example = member.traits.get_trait::<MemberExampleTrait>().ok()??;
                check_value_type(
                    model,
                    member,
                    MemberExampleTrait::ID,
                    self.name(),
                    &example.value,
                )
            })
            .collect()
    }
}

/// `@errorExample` needs at least one entry, and titles should be unique.
#[derive(Debug, Default)]
pub struct ErrorExampleValidator;

impl Validator for ErrorExampleValidator {
    fn name(&self) -> &'static str {
        "errorExample"
    }

    fn validate(&self, model: &Model) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for shape in model.structure_shapes() {
            let Some(node) = shape.traits.get(ErrorExampleTrait::ID) else {
                continue;
            };
            // Malformed entries are reported by the definition validator.
            let Ok((entries, _)) = ErrorExampleTrait::parse_entries(node) else {
                continue;
            };
            if node.as_array().map_or(false, Vec::is_empty) {
                events.push(
                    ValidationEvent::error(
                        self.name(),
                        &shape.id,
                        "`@errorExample` must define at least one example",
                    )
                    .for_trait(ErrorExampleTrait::ID),
                );
            }
            let mut titles = BTreeSet::new();
            for example in &entries {
                if !titles.insert(example.title.as_str()) {
                    events.push(
                        ValidationEvent::warning(
                            self.name(),
                            &shape.id,
                            format!("duplicate error example title `{}`", example.title),
                        )
                        .for_trait(ErrorExampleTrait::ID),
                    );
                }
            }
        }
        events
    }
}

/// Runs every validator over a model and collects the results.
pub struct ModelValidator {
    validators: Vec<Box<dyn Validator>>,
}

impl fmt::Debug for ModelValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|validator| validator.name()))
            .finish()
    }
}

impl Default for ModelValidator {
    fn default() -> Self {
        Self::with_registry(TraitRegistry::default())
    }
}

impl ModelValidator {
    pub fn with_registry(registry: TraitRegistry) -> Self {
        Self {
            validators: vec![
                Box::new(TargetValidator),
                Box::new(PreludeTraitValidator),
                Box::new(TraitDefinitionValidator::new(registry)),
                Box::new(ConstValidator),
                Box::new(MemberExampleValidator),
                Box::new(ErrorExampleValidator),
            ],
        }
    }

    pub fn add_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn validate(&self, model: &Model) -> ValidatedResult {
        let mut events = Vec::new();
        for validator in &self.validators {
            let found = validator.validate(model);
            tracing::debug!(validator = validator.name(), events = found.len(), "ran validator");
            events.extend(found);
        }
        let result = ValidatedResult::new(events);
        tracing::info!(
            errors = result.errors().count(),
            warnings = result.warnings().count(),
            "validated model"
        );
        result
    }
}

/// Validates `model` with the default trait registry.
pub fn validate(model: &Model) -> ValidatedResult {
    ModelValidator::default().validate(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use smithy_error_model::ModelAssembler;

    fn load(shapes: Node) -> Model {
        ModelAssembler::new()
            .add_unparsed_model(
                "test.json",
                json!({"smithy": "2.0", "shapes": shapes}).to_string(),
            )
            .assemble()
            .unwrap()
    }

    fn messages(result: &ValidatedResult) -> Vec<String> {
        result.events().iter().map(|event| event.to_string()).collect()
    }

    fn valid_shapes() -> Node {
        json!({
            "com.example#TransferLimitExceeded": {
                "type": "structure",
                "members": {
                    "code": {
                        "target": "smithy.api#String",
                        "traits": {"smithy.api#default": "LIMIT", "com.example#const": {}}
                    },
                    "limit": {
                        "target": "smithy.api#Integer",
                        "traits": {"com.example#memberExample": 1000}
                    },
                    "kind": {
                        "target": "smithy.api#String",
                        "traits": {"com.example#const": "transfer"}
                    }
                },
                "traits": {
                    "smithy.api#error": "client",
                    "smithy.api#httpError": 422,
                    "com.example#errorExample": [
                        {"title": "Daily limit", "content": {"code": "LIMIT", "limit": 1000}}
                    ]
                }
            }
        })
    }

    #[test]
    fn valid_model_has_no_events() {
        let result = validate(&load(valid_shapes()));
        assert_eq!(Vec::<String>::new(), messages(&result));
        assert!(result.unwrap_valid().is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let model = load(json!({
            "com.example#Plain": {
                "type": "structure",
                "members": {
                    "marker": {
                        "target": "smithy.api#String",
                        "traits": {"com.example#const": {}}
                    },
                    "mismatch": {
                        "target": "smithy.api#String",
                        "traits": {"smithy.api#default": "a", "com.example#const": "b"}
                    },
                    "count": {
                        "target": "smithy.api#Integer",
                        "traits": {"com.example#memberExample": "many"}
                    },
                    "both": {
                        "target": "smithy.api#String",
                        "traits": {"com.example#const": "x", "com.example#memberExample": "y"}
                    },
                    "missing": {"target": "com.example#Nowhere"}
                },
                "traits": {
                    "com.example#const": "x",
                    "com.example#errorExample": [{"title": "t", "content": {}}]
                }
            },
            "com.example#Oops": {
                "type": "structure",
                "traits": {
                    "smithy.api#error": "server",
                    "com.example#errorExample": [
                        {"title": "same", "content": {}},
                        {"title": "same", "content": {}},
                        {"title": "broken"}
                    ]
                }
            },
            "com.example#Empty": {
                "type": "structure",
                "traits": {"smithy.api#error": "client", "com.example#errorExample": []}
            }
        }));
        let result = validate(&model);
        assert_eq!(
            vec![
                "[ERROR] com.example#Empty: `@errorExample` must define at least one example | errorExample",
                "[ERROR] com.example#Oops: `com.example#errorExample` is missing required property `/2/content` | errorExample",
                "[WARNING] com.example#Oops: duplicate error example title `same` | errorExample",
                "[ERROR] com.example#Plain: \"com.example#const\" trait is only applicable to structure members | const",
                "[ERROR] com.example#Plain: \"com.example#errorExample\" trait is only applicable to structures with the `@error` trait | errorExample",
                "[WARNING] com.example#Plain$both: member has both `@const` and `@memberExample`; the constant is used as the example | const",
                "[ERROR] com.example#Plain$count: value `\"many\"` is not compatible with the member's target type `integer` | memberExample",
                "[ERROR] com.example#Plain$marker: `@const` without a value requires the member to have a `@default` value | const",
                "[ERROR] com.example#Plain$mismatch: `@const` value `\"b\"` differs from the `@default` value `\"a\"` | const",
                "[ERROR] com.example#Plain$missing: member targets `com.example#Nowhere`, which does not exist | Target",
            ],
            messages(&result)
        );
        let failure = result.unwrap_valid().unwrap_err();
        assert_eq!(failure.errors.len(), 8);
        assert!(failure
            .to_string()
            .starts_with("model validation failed with 8 error(s):\n  [ERROR] com.example#Empty"));
    }

    #[test]
    fn malformed_prelude_traits_are_reported() {
        let model = load(json!({
            "com.example#Oops": {
                "type": "structure",
                "traits": {"smithy.api#error": "client", "smithy.api#httpError": "422"}
            },
            "com.example#Teapot": {
                "type": "structure",
                "traits": {"smithy.api#error": "teapot", "smithy.api#httpError": 200}
            },
            "com.example#Op": {
                "type": "operation",
                "traits": {"smithy.api#http": {"method": "GET"}}
            },
            "com.example#Put": {
                "type": "operation",
                "traits": {"smithy.api#http": {"method": 1, "uri": "/things"}}
            }
        }));
        let result = validate(&model);
        assert_eq!(
            vec![
                "[ERROR] com.example#Oops: expected number at `/` of `smithy.api#httpError` but found string | httpError",
                "[ERROR] com.example#Op: `smithy.api#http` is missing required property `/uri` | http",
                "[ERROR] com.example#Put: expected string at `/method` of `smithy.api#http` but found number | http",
                "[ERROR] com.example#Teapot: invalid value at `/` of `smithy.api#error`: expected `client` or `server` but found `teapot` | error",
                "[ERROR] com.example#Teapot: invalid value at `/` of `smithy.api#httpError`: 200 is not an error status code | httpError",
            ],
            messages(&result)
        );
    }

    #[test]
    fn const_type_must_match_target() {
        let model = load(json!({
            "com.example#Flags": {
                "type": "structure",
                "members": {
                    "enabled": {
                        "target": "smithy.api#Boolean",
                        "traits": {"com.example#const": "yes"}
                    },
                    "tags": {
                        "target": "com.example#Tags",
                        "traits": {"smithy.api#default": [], "com.example#const": {}}
                    }
                }
            },
            "com.example#Tags": {
                "type": "list",
                "member": {"target": "smithy.api#String"}
            }
        }));
        assert_eq!(
            vec!["[ERROR] com.example#Flags$enabled: value `\"yes\"` is not compatible with the member's target type `boolean` | const"],
            messages(&validate(&model))
        );
    }

    #[test]
    fn broken_operation_references() {
        let model = load(json!({
            "com.example#Bank": {
                "type": "service",
                "version": "2024-01-01",
                "operations": [{"target": "com.example#Missing"}]
            },
            "com.example#GetThing": {
                "type": "operation",
                "input": {"target": "smithy.api#Unit"},
                "errors": [{"target": "com.example#Gone"}]
            }
        }));
        assert_eq!(
            vec![
                "[ERROR] com.example#Bank: operation targets `com.example#Missing`, which does not exist | Target",
                "[ERROR] com.example#GetThing: error targets `com.example#Gone`, which does not exist | Target",
            ],
            messages(&validate(&model))
        );
    }
}
