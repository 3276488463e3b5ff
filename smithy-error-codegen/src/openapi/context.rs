/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::openapi::OpenApiConfig;
use crate::GenerateError;
use smithy_error_model::prelude::HttpTrait;
use smithy_error_model::{Model, Shape, ShapeId, ShapeType};
use smithy_error_traits::transform::ERROR_UNION_MEMBER;
use std::collections::{BTreeMap, BTreeSet};

/// The model and service an OpenAPI document is built from, shared by the converter and mappers.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    model: &'a Model,
    service: &'a Shape,
    config: &'a OpenApiConfig,
}

impl<'a> Context<'a> {
    pub fn new(model: &'a Model, config: &'a OpenApiConfig) -> Result<Self, GenerateError> {
        let service = model
            .get_shape(&config.service)
            .ok_or_else(|| GenerateError::UnknownService(config.service.clone()))?;
        if service.shape_type != ShapeType::Service {
            return Err(GenerateError::NotAService {
                shape_id: service.id.clone(),
                shape_type: service.shape_type,
            });
        }
        Ok(Self {
            model,
            service,
            config,
        })
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn service(&self) -> &'a Shape {
        self.service
    }

    pub fn config(&self) -> &'a OpenApiConfig {
        self.config
    }

    /// Every operation of the service, in shape id order.
    pub fn operations(&self) -> impl Iterator<Item = &'a Shape> + 'a {
        let model = self.model;
        model
            .service_operations(&self.service.id)
            .into_iter()
            .filter_map(move |id| model.get_shape(&id))
    }

    /// Finds the operation bound to an OpenAPI path and method.
    ///
    /// Methods compare case-insensitively; the query string literals of the `@http` URI are ignored.
    pub fn find_operation(&self, path: &str, method: &str) -> Option<&'a Shape> {
        self.operations().find(|operation| {
            operation
                .traits
                .find::<HttpTrait>()
                .map(|http| http.method.eq_ignore_ascii_case(method) && http.path() == path)
                .unwrap_or(false)
        })
    }

    /// The errors of an operation, service-wide errors included, in declaration order.
    pub fn operation_errors(&self, operation: &'a Shape) -> Vec<&'a ShapeId> {
        let mut errors: Vec<&'a ShapeId> = Vec::new();
        for error in self.service.errors.iter().chain(operation.errors.iter()) {
            if !errors.contains(&error) {
                errors.push(error);
            }
        }
        errors
    }

    /// The error structures an operation can return, grouped by status code.
    ///
    /// A synthesized error wrapper is resolved to the errors of its union, so the result always
    /// names the original error structures.
    pub fn resolved_errors_by_code(&self, operation: &'a Shape) -> BTreeMap<u16, BTreeSet<&'a ShapeId>> {
        let mut by_code: BTreeMap<u16, BTreeSet<&'a ShapeId>> = BTreeMap::new();
        for error_id in self.operation_errors(operation) {
            let Some(error) = self.model.get_shape(error_id) else {
                continue;
            };
            let Some(code) = error.error_status_code() else {
                continue;
            };
            let errors = by_code.entry(code).or_default();
            match self.synthesized_union(error) {
                Some(union) => errors.extend(
                    union
                        .members
                        .values()
                        .filter(|member| {
                            self.model
                                .get_shape(&member.target)
                                .map(Shape::is_error)
                                .unwrap_or(false)
                        })
                        .map(|member| &member.target),
                ),
                None => {
                    errors.insert(&error.id);
                }
            }
        }
        by_code
    }

    /// The union behind a synthesized error wrapper, i.e. an error whose only member is
    /// `errorUnion` targeting a union.
    pub fn synthesized_union(&self, error: &Shape) -> Option<&'a Shape> {
        if error.members.len() != 1 {
            return None;
        }
        let member = error.member(ERROR_UNION_MEMBER)?;
        self.model
            .get_shape(&member.target)
            .filter(|target| target.is_union())
    }
}
