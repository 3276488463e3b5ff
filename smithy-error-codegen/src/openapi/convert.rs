/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Converts a Smithy service with HTTP bindings into an OpenAPI document.

use crate::openapi::Context;
use crate::GenerateError;
use serde_json::json;
use smithy_error_model::prelude::{
    is_unit, DefaultTrait, DocumentationTrait, EnumValueTrait, HttpHeaderTrait, HttpLabelTrait,
    HttpPayloadTrait, HttpQueryTrait, HttpTrait, RequiredTrait,
};
use smithy_error_model::{MemberShape, Model, Node, ObjectNode, Shape, ShapeId, ShapeType, TraitMap};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const MEDIA_TYPE: &str = "application/json";

/// `#/components/schemas/<name>`
pub fn schema_ref(name: &str) -> Node {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn documentation(traits: &TraitMap) -> Option<String> {
    traits.find::<DocumentationTrait>().map(|doc| doc.value)
}

fn json_content(schema: Node) -> Node {
    json!({ MEDIA_TYPE: { "schema": schema } })
}

fn simple_schema(shape_type: ShapeType) -> Node {
    match shape_type {
        ShapeType::String => json!({"type": "string"}),
        ShapeType::Blob => json!({"type": "string", "format": "byte"}),
        ShapeType::Boolean => json!({"type": "boolean"}),
        ShapeType::Byte | ShapeType::Short | ShapeType::Integer => {
            json!({"type": "integer", "format": "int32"})
        }
        ShapeType::Long => json!({"type": "integer", "format": "int64"}),
        ShapeType::Float => json!({"type": "number", "format": "float"}),
        ShapeType::Double => json!({"type": "number", "format": "double"}),
        ShapeType::BigInteger => json!({"type": "integer"}),
        ShapeType::BigDecimal => json!({"type": "number"}),
        ShapeType::Timestamp => json!({"type": "string", "format": "date-time"}),
        _ => json!({}),
    }
}

/// Aggregate and enum shapes get their own entry in `components/schemas`.
fn is_named_schema(shape_type: ShapeType) -> bool {
    shape_type.is_aggregate() || matches!(shape_type, ShapeType::Enum | ShapeType::IntEnum)
}

/// Builds `components/schemas`, defining every named shape a schema refers to.
#[derive(Debug)]
struct SchemaBuilder<'a> {
    model: &'a Model,
    schemas: BTreeMap<String, Node>,
    owners: BTreeMap<String, ShapeId>,
    conflict: Option<GenerateError>,
    pending: Vec<&'a Shape>,
    queued: BTreeSet<&'a ShapeId>,
}

impl<'a> SchemaBuilder<'a> {
    fn new(model: &'a Model) -> Self {
        Self {
            model,
            schemas: BTreeMap::new(),
            owners: BTreeMap::new(),
            conflict: None,
            pending: Vec::new(),
            queued: BTreeSet::new(),
        }
    }

    /// Records `owner` as the shape behind the schema `name`. Schema names drop the namespace, so
    /// two shapes can claim the same name; the first such clash fails the conversion.
    fn claim(&mut self, name: &str, owner: &ShapeId) {
        match self.owners.get(name) {
            Some(existing) if existing != owner => {
                if self.conflict.is_none() {
                    self.conflict = Some(GenerateError::ConflictingSchemas {
                        name: name.to_string(),
                        first: existing.clone(),
                        second: owner.clone(),
                    });
                }
            }
            Some(_) => {}
            None => {
                self.owners.insert(name.to_string(), owner.clone());
            }
        }
    }

    fn define(&mut self, name: String, owner: &ShapeId, schema: Node) -> Node {
        self.claim(&name, owner);
        let reference = schema_ref(&name);
        self.schemas.insert(name, schema);
        reference
    }

    /// The schema of a member's target: a `$ref` for aggregate and enum shapes, inline otherwise.
    fn target_schema(&mut self, target: &ShapeId) -> Node {
        match self.model.get_shape(target) {
            Some(shape) if is_named_schema(shape.shape_type) => {
                self.claim(shape.name(), &shape.id);
                if self.queued.insert(&shape.id) {
                    self.pending.push(shape);
                }
                schema_ref(shape.name())
            }
            Some(shape) => simple_schema(shape.shape_type),
            None => self
                .model
                .shape_type_of(target)
                .map(simple_schema)
                .unwrap_or_else(|| json!({})),
        }
    }

    fn member_schema(&mut self, member: &MemberShape) -> Node {
        let mut schema = self.target_schema(&member.target);
        if let Some(object) = schema.as_object_mut() {
            if let Some(doc) = documentation(&member.traits) {
                object.insert("description".into(), Node::String(doc));
            }
            if let Some(default) = member.traits.find::<DefaultTrait>() {
                object.insert("default".into(), default.value);
            }
        }
        schema
    }

    fn object_schema<'m>(
        &mut self,
        description: Option<String>,
        members: impl IntoIterator<Item = &'m MemberShape>,
    ) -> Node {
        let mut properties = ObjectNode::new();
        let mut required = Vec::new();
        for member in members {
            properties.insert(member.member_name().into(), self.member_schema(member));
            if member.traits.has_trait::<RequiredTrait>() {
                required.push(Node::String(member.member_name().into()));
            }
        }
        let mut schema = json!({"type": "object"});
        if let Some(object) = schema.as_object_mut() {
            if let Some(description) = description {
                object.insert("description".into(), Node::String(description));
            }
            if !properties.is_empty() {
                object.insert("properties".into(), Node::Object(properties));
            }
            if !required.is_empty() {
                object.insert("required".into(), Node::Array(required));
            }
        }
        schema
    }

    fn named_schema(&mut self, shape: &Shape) -> Node {
        let mut schema = match shape.shape_type {
            ShapeType::Structure => self.object_schema(None, shape.members.values()),
            ShapeType::Union => {
                let variants: Vec<Node> = shape
                    .members
                    .values()
                    .map(|member| {
                        let name = member.member_name();
                        json!({
                            "type": "object",
                            "title": name,
                            "properties": { name: self.member_schema(member) },
                            "required": [name]
                        })
                    })
                    .collect();
                json!({ "oneOf": variants })
            }
            ShapeType::List | ShapeType::Set => {
                let items = shape
                    .member("member")
                    .map(|member| self.member_schema(member))
                    .unwrap_or_else(|| json!({}));
                let mut schema = json!({"type": "array", "items": items});
                if shape.shape_type == ShapeType::Set {
                    schema["uniqueItems"] = Node::Bool(true);
                }
                schema
            }
            ShapeType::Map => {
                let values = shape
                    .member("value")
                    .map(|member| self.member_schema(member))
                    .unwrap_or_else(|| json!({}));
                json!({"type": "object", "additionalProperties": values})
            }
            ShapeType::Enum => {
                let values: Vec<Node> = shape
                    .members
                    .values()
                    .map(|member| {
                        member
                            .traits
                            .find::<EnumValueTrait>()
                            .map(|value| value.value)
                            .unwrap_or_else(|| Node::String(member.member_name().into()))
                    })
                    .collect();
                json!({"type": "string", "enum": values})
            }
            ShapeType::IntEnum => {
                let values: Vec<Node> = shape
                    .members
                    .values()
                    .filter_map(|member| member.traits.find::<EnumValueTrait>())
                    .map(|value| value.value)
                    .collect();
                json!({"type": "integer", "enum": values})
            }
            other => simple_schema(other),
        };
        if let (Some(doc), Some(object)) = (documentation(&shape.traits), schema.as_object_mut()) {
            object.insert("description".into(), Node::String(doc));
        }
        schema
    }

    fn finish(mut self) -> Result<BTreeMap<String, Node>, GenerateError> {
        while let Some(shape) = self.pending.pop() {
            let schema = self.named_schema(shape);
            self.schemas.entry(shape.name().to_string()).or_insert(schema);
        }
        match self.conflict {
            Some(conflict) => Err(conflict),
            None => Ok(self.schemas),
        }
    }
}

/// How an input or output member is bound to the HTTP message.
enum Binding<'a> {
    Label(&'a MemberShape),
    Query(String, &'a MemberShape),
    Header(String, &'a MemberShape),
    Payload(&'a MemberShape),
    Body(&'a MemberShape),
}

fn binding(member: &MemberShape) -> Binding<'_> {
    if member.traits.has_trait::<HttpLabelTrait>() {
        Binding::Label(member)
    } else if let Some(query) = member.traits.find::<HttpQueryTrait>() {
        Binding::Query(query.name, member)
    } else if let Some(header) = member.traits.find::<HttpHeaderTrait>() {
        Binding::Header(header.name, member)
    } else if member.traits.has_trait::<HttpPayloadTrait>() {
        Binding::Payload(member)
    } else {
        Binding::Body(member)
    }
}

fn io_structure<'a>(model: &'a Model, target: Option<&ShapeId>) -> Option<&'a Shape> {
    target
        .filter(|target| !is_unit(target))
        .and_then(|target| model.get_shape(target))
}

struct Converter<'a> {
    context: Context<'a>,
    schemas: SchemaBuilder<'a>,
}

impl<'a> Converter<'a> {
    fn parameter(&mut self, location: &str, name: &str, member: &MemberShape, required: bool) -> Node {
        let mut parameter = json!({
            "name": name,
            "in": location,
            "schema": self.schemas.member_schema(member),
        });
        if let Some(object) = parameter.as_object_mut() {
            if required {
                object.insert("required".into(), Node::Bool(true));
            }
            if let Some(doc) = documentation(&member.traits) {
                object.insert("description".into(), Node::String(doc));
            }
        }
        parameter
    }

    fn body(
        &mut self,
        owner: &ShapeId,
        content_name: String,
        payload: Option<&MemberShape>,
        members: Vec<&MemberShape>,
    ) -> Option<Node> {
        if let Some(payload) = payload {
            return Some(self.schemas.member_schema(payload));
        }
        if members.is_empty() {
            return None;
        }
        let schema = self.schemas.object_schema(None, members);
        Some(self.schemas.define(content_name, owner, schema))
    }

    fn request(&mut self, operation: &Shape, operation_object: &mut ObjectNode) {
        let Some(input) = io_structure(self.context.model(), operation.input.as_ref()) else {
            return;
        };
        let mut parameters = Vec::new();
        let mut payload = None;
        let mut body_members = Vec::new();
        for member in input.members.values() {
            let required = member.traits.has_trait::<RequiredTrait>();
            match binding(member) {
                Binding::Label(member) => {
                    parameters.push(self.parameter("path", member.member_name(), member, true))
                }
                Binding::Query(name, member) => {
                    parameters.push(self.parameter("query", &name, member, required))
                }
                Binding::Header(name, member) => {
                    parameters.push(self.parameter("header", &name, member, required))
                }
                Binding::Payload(member) => payload = Some(member),
                Binding::Body(member) => body_members.push(member),
            }
        }
        let body_required = payload
            .into_iter()
            .chain(body_members.iter().copied())
            .any(|member| member.traits.has_trait::<RequiredTrait>());
        if !parameters.is_empty() {
            operation_object.insert("parameters".into(), Node::Array(parameters));
        }
        let content_name = format!("{}RequestContent", operation.name());
        if let Some(schema) = self.body(&operation.id, content_name, payload, body_members) {
            operation_object.insert(
                "requestBody".into(),
                json!({ "required": body_required, "content": json_content(schema) }),
            );
        }
    }

    /// A response for `shape`'s header and body members. Body members go in a schema named
    /// `content_name`.
    fn response(
        &mut self,
        owner: &ShapeId,
        description: String,
        shape: Option<&Shape>,
        content_name: String,
    ) -> Node {
        let mut response = ObjectNode::new();
        response.insert("description".into(), Node::String(description));
        let Some(shape) = shape else {
            return Node::Object(response);
        };
        let mut headers = ObjectNode::new();
        let mut payload = None;
        let mut body_members = Vec::new();
        for member in shape.members.values() {
            match binding(member) {
                Binding::Header(name, member) => {
                    let mut header = json!({ "schema": self.schemas.member_schema(member) });
                    if let (Some(doc), Some(object)) = (documentation(&member.traits), header.as_object_mut()) {
                        object.insert("description".into(), Node::String(doc));
                    }
                    headers.insert(name, header);
                }
                Binding::Payload(member) => payload = Some(member),
                Binding::Body(member) => body_members.push(member),
                Binding::Label(_) | Binding::Query(..) => {}
            }
        }
        if !headers.is_empty() {
            response.insert("headers".into(), Node::Object(headers));
        }
        if let Some(schema) = self.body(owner, content_name, payload, body_members) {
            response.insert("content".into(), json_content(schema));
        }
        Node::Object(response)
    }

    /// Defines `<Error>ResponseContent` for an error, or for a synthesized wrapper a `oneOf`
    /// over the errors of its union. Returns the schema reference.
    fn error_content(&mut self, error: &Shape) -> Node {
        let name = format!("{}ResponseContent", error.name());
        match self.context.synthesized_union(error) {
            Some(union) => {
                let mut variants = Vec::new();
                for member in union.members.values() {
                    if let Some(target) = self.context.model().get_shape(&member.target) {
                        variants.push(self.error_content(target));
                    }
                }
                self.schemas.define(name, &error.id, json!({ "oneOf": variants }))
            }
            None => {
                let body = error
                    .members
                    .values()
                    .filter(|member| matches!(binding(member), Binding::Body(_)));
                let schema = self.schemas.object_schema(documentation(&error.traits), body);
                self.schemas.define(name, &error.id, schema)
            }
        }
    }

    fn responses(&mut self, operation: &'a Shape, http: &HttpTrait) -> Node {
        let model = self.context.model();
        let mut responses = ObjectNode::new();
        let output = io_structure(model, operation.output.as_ref());
        responses.insert(
            http.code.to_string(),
            self.response(
                &operation.id,
                format!("{} {} response", operation.name(), http.code),
                output,
                format!("{}ResponseContent", operation.name()),
            ),
        );

        let mut by_code: BTreeMap<u16, Vec<&Shape>> = BTreeMap::new();
        for error_id in self.context.operation_errors(operation) {
            if let Some(error) = model.get_shape(error_id) {
                if let Some(code) = error.error_status_code() {
                    by_code.entry(code).or_default().push(error);
                }
            }
        }
        for (code, errors) in by_code {
            let response = match errors.as_slice() {
                [error] => json!({
                    "description": format!("{} {code} response", error.name()),
                    "content": json_content(self.error_content(error)),
                }),
                errors => {
                    let variants: Vec<Node> = errors.iter().map(|error| self.error_content(error)).collect();
                    json!({
                        "description": format!("{} {code} response", operation.name()),
                        "content": json_content(json!({ "oneOf": variants })),
                    })
                }
            };
            responses.insert(code.to_string(), response);
        }
        Node::Object(responses)
    }

    fn operation(&mut self, operation: &'a Shape, http: &HttpTrait) -> Node {
        let mut object = ObjectNode::new();
        object.insert("operationId".into(), Node::String(operation.name().into()));
        if let Some(doc) = documentation(&operation.traits) {
            object.insert("description".into(), Node::String(doc));
        }
        self.request(operation, &mut object);
        object.insert("responses".into(), self.responses(operation, http));
        Node::Object(object)
    }
}

/// Converts the context's service into an OpenAPI document.
pub fn convert(context: &Context<'_>) -> Result<Node, GenerateError> {
    let service = context.service();
    let mut converter = Converter {
        context: *context,
        schemas: SchemaBuilder::new(context.model()),
    };

    let mut bound: BTreeMap<(String, String), &ShapeId> = BTreeMap::new();
    let mut paths: BTreeMap<String, ObjectNode> = BTreeMap::new();
    for operation in context.operations() {
        let Some(http) = operation.traits.find::<HttpTrait>() else {
            debug!(operation = %operation.id, "skipping operation without @http");
            continue;
        };
        let method = http.method.to_ascii_lowercase();
        let path = http.path().to_string();
        if let Some(existing) = bound.insert((path.clone(), method.clone()), &operation.id) {
            return Err(GenerateError::ConflictingOperations(
                existing.clone(),
                operation.id.clone(),
                format!("{} {path}", http.method),
            ));
        }
        let operation_object = converter.operation(operation, &http);
        paths.entry(path).or_default().insert(method, operation_object);
    }

    let mut info = json!({
        "title": service.name(),
        "version": service.version.clone().unwrap_or_default(),
    });
    if let (Some(doc), Some(object)) = (documentation(&service.traits), info.as_object_mut()) {
        object.insert("description".into(), Node::String(doc));
    }
    let schemas = converter.schemas.finish()?;
    Ok(json!({
        "openapi": context.config().version,
        "info": info,
        "paths": paths,
        "components": { "schemas": schemas }
    }))
}
