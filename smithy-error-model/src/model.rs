/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::node::Node;
use crate::prelude::prelude_shape_type;
use crate::shape::{MemberShape, Shape, ShapeType};
use crate::ShapeId;
use std::collections::{BTreeMap, BTreeSet};

/// A trait applied to a shape or member: the (shape id, trait id, payload) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitApplication<'a> {
    pub shape_id: &'a ShapeId,
    pub trait_id: &'a ShapeId,
    pub value: &'a Node,
}

/// A Smithy model: a graph of shapes keyed by shape id.
///
/// Shapes are stored in a `BTreeMap`, so every iteration over the model is in shape id order.
/// Prelude shapes (`smithy.api#String`, ...) are not stored but resolve through
/// [`Model::shape_type_of`].
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub smithy_version: String,
    pub metadata: BTreeMap<String, Node>,
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            smithy_version: "2.0".into(),
            metadata: BTreeMap::new(),
            shapes: BTreeMap::new(),
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.shapes.keys()
    }

    pub fn shapes_of_type(&self, shape_type: ShapeType) -> impl Iterator<Item = &Shape> {
        self.shapes
            .values()
            .filter(move |shape| shape.shape_type == shape_type)
    }

    pub fn structure_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes_of_type(ShapeType::Structure)
    }

    /// Every structure carrying the `@error` trait.
    pub fn error_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.structure_shapes().filter(|shape| shape.is_error())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get_shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn contains_shape(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Inserts or replaces a shape, returning the replaced shape.
    pub fn insert_shape(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id.clone(), shape)
    }

    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<Shape> {
        self.shapes.remove(id)
    }

    /// Looks up a member by its member shape id, e.g. `ns#Struct$member`.
    pub fn get_member(&self, id: &ShapeId) -> Option<&MemberShape> {
        let name = id.member_name()?;
        self.shapes.get(&id.without_member())?.members.get(name)
    }

    pub fn get_member_mut(&mut self, id: &ShapeId) -> Option<&mut MemberShape> {
        let name = id.member_name()?;
        self.shapes
            .get_mut(&id.without_member())?
            .members
            .get_mut(name)
    }

    /// Resolves the type of any shape id: model shapes, members and prelude shapes.
    pub fn shape_type_of(&self, id: &ShapeId) -> Option<ShapeType> {
        if id.member_name().is_some() {
            return self.get_member(id).map(|_| ShapeType::Member);
        }
        self.shapes
            .get(id)
            .map(|shape| shape.shape_type)
            .or_else(|| prelude_shape_type(id))
    }

    /// Resolves the type of the shape a member targets.
    pub fn target_type(&self, member: &MemberShape) -> Option<ShapeType> {
        self.shape_type_of(&member.target)
    }

    /// Every trait applied in the model, on shapes and on members, in shape id order.
    pub fn trait_applications(&self) -> Vec<TraitApplication<'_>> {
        let mut applications = Vec::new();
        for shape in self.shapes.values() {
            for (trait_id, value) in shape.traits.iter() {
                applications.push(TraitApplication {
                    shape_id: &shape.id,
                    trait_id,
                    value,
                });
            }
            for member in shape.members.values() {
                for (trait_id, value) in member.traits.iter() {
                    applications.push(TraitApplication {
                        shape_id: &member.id,
                        trait_id,
                        value,
                    });
                }
            }
        }
        applications
    }

    /// Every operation bound to a service, directly or through its resources.
    pub fn service_operations(&self, service: &ShapeId) -> BTreeSet<ShapeId> {
        let mut operations = BTreeSet::new();
        let mut visited = BTreeSet::new();
        self.collect_operations(service, &mut operations, &mut visited);
        operations
    }

    fn collect_operations(
        &self,
        container: &ShapeId,
        operations: &mut BTreeSet<ShapeId>,
        visited: &mut BTreeSet<ShapeId>,
    ) {
        if !visited.insert(container.clone()) {
            return;
        }
        let Some(shape) = self.get_shape(container) else {
            return;
        };
        let bound = shape
            .operations
            .iter()
            .chain(shape.collection_operations.iter())
            .chain(shape.lifecycle.values());
        for operation in bound {
            if self.shape_type_of(operation) == Some(ShapeType::Operation) {
                operations.insert(operation.clone());
            }
        }
        for resource in &shape.resources {
            self.collect_operations(resource, operations, visited);
        }
    }

    /// The shapes `shape` directly points to.
    fn references(shape: &Shape) -> impl Iterator<Item = &ShapeId> {
        shape
            .members
            .values()
            .map(|member| &member.target)
            .chain(shape.input.iter())
            .chain(shape.output.iter())
            .chain(shape.errors.iter())
            .chain(shape.operations.iter())
            .chain(shape.collection_operations.iter())
            .chain(shape.resources.iter())
            .chain(shape.lifecycle.values())
    }

    /// Every model shape reachable from `root`, including `root` itself.
    pub fn walk(&self, root: &ShapeId) -> BTreeSet<ShapeId> {
        let mut seen = BTreeSet::new();
        let mut queue = vec![root.clone()];
        while let Some(next) = queue.pop() {
            if let Some(shape) = self.get_shape(&next) {
                if seen.insert(next.clone()) {
                    queue.extend(Self::references(shape).cloned());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(value: &str) -> ShapeId {
        ShapeId::parse(value).unwrap()
    }

    fn model() -> Model {
        let mut model = Model::new();
        let mut service = Shape::new(id("com.example#Bank"), ShapeType::Service);
        service.operations.push(id("com.example#GetAccount"));
        service.resources.push(id("com.example#Transfer"));
        model.insert_shape(service);

        let mut resource = Shape::new(id("com.example#Transfer"), ShapeType::Resource);
        resource
            .lifecycle
            .insert("create".into(), id("com.example#CreateTransfer"));
        model.insert_shape(resource);

        let mut get_account = Shape::new(id("com.example#GetAccount"), ShapeType::Operation);
        get_account.errors.push(id("com.example#NotFound"));
        model.insert_shape(get_account);
        model.insert_shape(Shape::new(
            id("com.example#CreateTransfer"),
            ShapeType::Operation,
        ));

        let mut not_found = Shape::new(id("com.example#NotFound"), ShapeType::Structure);
        not_found.traits.insert(id("smithy.api#error"), json!("client"));
        not_found
            .add_member("message", id("smithy.api#String"))
            .unwrap()
            .traits
            .insert(id("smithy.api#required"), json!({}));
        model.insert_shape(not_found);
        model
    }

    #[test]
    fn service_operations_include_resources() {
        let operations: Vec<_> = model()
            .service_operations(&id("com.example#Bank"))
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(
            vec!["com.example#CreateTransfer", "com.example#GetAccount"],
            operations
        );
    }

    #[test]
    fn shape_type_resolution() {
        let model = model();
        assert_eq!(
            model.shape_type_of(&id("com.example#NotFound$message")),
            Some(ShapeType::Member)
        );
        assert_eq!(model.shape_type_of(&id("com.example#NotFound$nope")), None);
        assert_eq!(
            model.shape_type_of(&id("smithy.api#Integer")),
            Some(ShapeType::Integer)
        );
        assert_eq!(model.shape_type_of(&id("com.example#Missing")), None);
    }

    #[test]
    fn trait_applications_cover_members() {
        let model = model();
        let applications: Vec<_> = model
            .trait_applications()
            .into_iter()
            .map(|app| format!("{} {}", app.shape_id, app.trait_id))
            .collect();
        assert_eq!(
            vec![
                "com.example#NotFound smithy.api#error",
                "com.example#NotFound$message smithy.api#required"
            ],
            applications
        );
    }

    #[test]
    fn walk_reaches_errors() {
        let model = model();
        let reachable = model.walk(&id("com.example#Bank"));
        assert!(reachable.contains(&id("com.example#NotFound")));
        assert!(reachable.contains(&id("com.example#CreateTransfer")));
        assert_eq!(model.error_shapes().count(), 1);
    }
}
