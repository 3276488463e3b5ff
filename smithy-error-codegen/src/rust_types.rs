/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Renders Rust error types for the error structures of a service.

use crate::artifact::Artifact;
use crate::GenerateError;
use convert_case::{Boundary, Case, Casing};
use handlebars::Handlebars;
use serde::Serialize;
use smithy_error_model::prelude::{DocumentationTrait, ErrorKind, RequiredTrait};
use smithy_error_model::{MemberShape, Model, Shape, ShapeId, ShapeType};
use smithy_error_traits::transform::ORIGINAL_ERRORS_TRAIT;
use smithy_error_traits::ConstTrait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

const ERROR_TEMPLATE: &str = include_str!("templates/error.rs.hbs");
const TYPES_TEMPLATE: &str = include_str!("templates/types.rs.hbs");
const MOD_TEMPLATE: &str = include_str!("templates/mod.rs.hbs");

/// Directory of the generated sources, relative to the output directory.
pub const ERRORS_DIR: &str = "errors";

/// Members whose value `Display` shows, in order of preference.
const MESSAGE_MEMBERS: &[&str] = &["message", "detail", "title"];

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

/// Associated constants every generated error defines.
const RESERVED_CONSTANTS: &[&str] = &["STATUS_CODE", "ERROR_KIND", "SHAPE_ID"];

/// Word boundaries of Smithy names: `HTTPStatus` is `HTTP Status`, `Error404Page` is
/// `Error404 Page`.
const BOUNDARIES: &[Boundary] = &[
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

pub fn snake_case(name: &str) -> String {
    name.from_case(Case::Camel)
        .with_boundaries(BOUNDARIES)
        .to_case(Case::Snake)
}

fn pascal_case(name: &str) -> String {
    name.from_case(Case::Camel)
        .with_boundaries(BOUNDARIES)
        .to_case(Case::Pascal)
}

fn constant_name(name: &str) -> String {
    let constant = name
        .from_case(Case::Camel)
        .with_boundaries(BOUNDARIES)
        .to_case(Case::ScreamingSnake);
    if RESERVED_CONSTANTS.contains(&constant.as_str()) {
        format!("{constant}_VALUE")
    } else {
        constant
    }
}

/// A field or module name that is a valid Rust identifier.
fn rust_ident(name: &str) -> String {
    let snake = snake_case(name);
    match snake.as_str() {
        "self" | "super" | "crate" | "Self" => format!("{snake}_"),
        keyword if RUST_KEYWORDS.contains(&keyword) => format!("r#{snake}"),
        _ => snake,
    }
}

fn doc_lines(shape_traits: &smithy_error_model::TraitMap) -> Vec<String> {
    shape_traits
        .find::<DocumentationTrait>()
        .map(|doc| doc.value.lines().map(|line| line.trim_end().to_string()).collect())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct FieldContext {
    ident: String,
    variant: String,
    rust_type: String,
    docs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MessageContext {
    ident: String,
    required: bool,
}

#[derive(Debug, Serialize)]
struct ConstantContext {
    name: String,
    literal: String,
}

#[derive(Debug, Serialize)]
struct ErrorContext {
    shape_id: String,
    name: String,
    docs: Vec<String>,
    fields: Vec<FieldContext>,
    status_code: u16,
    kind: &'static str,
    constants: Vec<ConstantContext>,
    message: Option<MessageContext>,
}

#[derive(Debug, Serialize)]
struct TypeContext {
    name: String,
    is_union: bool,
    docs: Vec<String>,
    fields: Vec<FieldContext>,
}

#[derive(Debug, Serialize)]
struct ModuleContext {
    module: String,
    name: String,
}

/// Renders `errors/<snake_name>.rs` for every error of a service, plus `errors/types.rs` for the
/// structures and unions those errors refer to and an `errors/mod.rs` tying them together.
#[derive(Debug)]
pub struct RustTypesGenerator<'a> {
    model: &'a Model,
    templates: Handlebars<'static>,
}

impl<'a> RustTypesGenerator<'a> {
    pub fn new(model: &'a Model) -> Result<Self, GenerateError> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates.register_escape_fn(handlebars::no_escape);
        templates.register_template_string("error", ERROR_TEMPLATE)?;
        templates.register_template_string("types", TYPES_TEMPLATE)?;
        templates.register_template_string("mod", MOD_TEMPLATE)?;
        Ok(Self { model, templates })
    }

    /// The error structures reachable from `service`, without synthesized wrappers.
    pub fn service_errors(&self, service: &ShapeId) -> Vec<&'a Shape> {
        let model = self.model;
        model
            .walk(service)
            .iter()
            .filter_map(|id| model.get_shape(id))
            .filter(|shape| shape.is_error() && !shape.traits.contains(ORIGINAL_ERRORS_TRAIT))
            .collect()
    }

    pub fn generate(&self, service: &ShapeId) -> Result<Vec<Artifact>, GenerateError> {
        let errors = self.service_errors(service);
        let mut artifacts = Vec::with_capacity(errors.len() + 2);
        let mut modules = Vec::with_capacity(errors.len());
        for error in &errors {
            let module = rust_ident(error.name());
            debug!(error = %error.id, %module, "rendering error type");
            let contents = self.render(&error.id, "error", &self.error_context(error))?;
            artifacts.push(Artifact::new(
                error.id.clone(),
                PathBuf::from(ERRORS_DIR).join(format!("{}.rs", snake_case(error.name()))),
                contents,
            ));
            modules.push(ModuleContext {
                module,
                name: error.name().to_string(),
            });
        }

        let types = self.referenced_types(&errors);
        if !types.is_empty() {
            let context = serde_json::json!({ "service": service.as_str(), "types": types });
            artifacts.push(Artifact::new(
                service.clone(),
                PathBuf::from(ERRORS_DIR).join("types.rs"),
                self.render(service, "types", &context)?,
            ));
        }
        let context = serde_json::json!({
            "service": service.as_str(),
            "has_types": !types.is_empty(),
            "modules": modules
        });
        artifacts.push(Artifact::new(
            service.clone(),
            PathBuf::from(ERRORS_DIR).join("mod.rs"),
            self.render(service, "mod", &context)?,
        ));
        Ok(artifacts)
    }

    fn render(
        &self,
        shape_id: &ShapeId,
        template: &str,
        context: &impl Serialize,
    ) -> Result<String, GenerateError> {
        self.templates
            .render(template, context)
            .map_err(|source| GenerateError::Render {
                shape_id: shape_id.clone(),
                source,
            })
    }

    fn error_context(&self, error: &Shape) -> ErrorContext {
        let fields: Vec<FieldContext> = error
            .members
            .values()
            .map(|member| self.field(error, member))
            .collect();
        let message = MESSAGE_MEMBERS.iter().find_map(|name| {
            let member = error.member(name)?;
            (self.model.shape_type_of(&member.target) == Some(ShapeType::String)).then(|| {
                MessageContext {
                    ident: rust_ident(name),
                    required: member.traits.has_trait::<RequiredTrait>(),
                }
            })
        });
        let constants = error
            .members
            .values()
            .filter_map(|member| {
                let value = member.traits.find::<ConstTrait>()?.value()?.as_str()?.to_string();
                Some(ConstantContext {
                    name: constant_name(member.member_name()),
                    literal: format!("{value:?}"),
                })
            })
            .collect();
        let kind = error.error_trait().map(|error| error.kind).unwrap_or(ErrorKind::Client);
        ErrorContext {
            shape_id: error.id.to_string(),
            name: error.name().to_string(),
            docs: doc_lines(&error.traits),
            fields,
            status_code: error
                .error_status_code()
                .unwrap_or_else(|| kind.default_status_code()),
            kind: match kind {
                ErrorKind::Client => "Client",
                ErrorKind::Server => "Server",
            },
            constants,
            message,
        }
    }

    fn field(&self, container: &Shape, member: &MemberShape) -> FieldContext {
        let mut rust_type = self.rust_type(&member.target);
        if self.reaches(&member.target, &container.id) {
            rust_type = format!("Box<{rust_type}>");
        }
        let required = container.is_structure() && member.traits.has_trait::<RequiredTrait>();
        if container.is_structure() && !required {
            rust_type = format!("Option<{rust_type}>");
        }
        FieldContext {
            ident: rust_ident(member.member_name()),
            variant: pascal_case(member.member_name()),
            rust_type,
            docs: doc_lines(&member.traits),
        }
    }

    /// Whether `from` holds a `to` by value, directly or through other structures and unions.
    /// Lists and maps end the search since `Vec` and `BTreeMap` already allocate.
    fn reaches(&self, from: &ShapeId, to: &ShapeId) -> bool {
        let mut seen: BTreeSet<&ShapeId> = BTreeSet::new();
        let mut queue = vec![from];
        while let Some(id) = queue.pop() {
            if id == to {
                return true;
            }
            let Some(shape) = self.model.get_shape(id) else {
                continue;
            };
            if !(shape.is_structure() || shape.is_union()) || !seen.insert(&shape.id) {
                continue;
            }
            queue.extend(shape.members.values().map(|member| &member.target));
        }
        false
    }

    fn rust_type(&self, target: &ShapeId) -> String {
        let Some(shape_type) = self.model.shape_type_of(target) else {
            return "String".into();
        };
        match shape_type {
            ShapeType::Boolean => "bool".into(),
            ShapeType::Byte => "i8".into(),
            ShapeType::Short => "i16".into(),
            ShapeType::Integer | ShapeType::IntEnum => "i32".into(),
            ShapeType::Long => "i64".into(),
            ShapeType::Float => "f32".into(),
            ShapeType::Double => "f64".into(),
            ShapeType::Blob => "Vec<u8>".into(),
            ShapeType::List | ShapeType::Set => {
                let item = self.model.get_shape(target).and_then(|list| list.member("member"));
                match item {
                    Some(item) => format!("Vec<{}>", self.rust_type(&item.target)),
                    None => "Vec<String>".into(),
                }
            }
            ShapeType::Map => {
                let value = self.model.get_shape(target).and_then(|map| map.member("value"));
                match value {
                    Some(value) => format!(
                        "std::collections::BTreeMap<String, {}>",
                        self.rust_type(&value.target)
                    ),
                    None => "std::collections::BTreeMap<String, String>".into(),
                }
            }
            ShapeType::Structure | ShapeType::Union => target.shape_name().to_string(),
            _ => "String".into(),
        }
    }

    /// Non-error structures and unions that error members refer to, directly or nested.
    fn referenced_types(&self, errors: &[&'a Shape]) -> Vec<TypeContext> {
        let mut seen: BTreeSet<&ShapeId> = BTreeSet::new();
        let mut queue: Vec<&ShapeId> = errors
            .iter()
            .flat_map(|error| error.members.values().map(|member| &member.target))
            .collect();
        let mut types: BTreeMap<&ShapeId, TypeContext> = BTreeMap::new();
        while let Some(id) = queue.pop() {
            let Some(shape) = self.model.get_shape(id) else {
                continue;
            };
            if !seen.insert(&shape.id) {
                continue;
            }
            queue.extend(shape.members.values().map(|member| &member.target));
            if !(shape.is_structure() || shape.is_union()) || shape.is_error() {
                continue;
            }
            types.insert(
                &shape.id,
                TypeContext {
                    name: shape.name().to_string(),
                    is_union: shape.is_union(),
                    docs: doc_lines(&shape.traits),
                    fields: shape
                        .members
                        .values()
                        .map(|member| self.field(shape, member))
                        .collect(),
                },
            );
        }
        types.into_values().collect()
    }
}
