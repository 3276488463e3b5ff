/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::node::Node;
use crate::traits::{Trait, TraitError};
use crate::ShapeId;
use std::collections::BTreeMap;

/// The traits applied to a shape or member, keyed by trait Shape ID.
///
/// Values are kept as raw nodes so that unknown traits survive a load/serialize round trip.
/// Typed access goes through [`Trait`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitMap {
    traits: BTreeMap<ShapeId, Node>,
}

impl TraitMap {
    /// Creates a new empty TraitMap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw trait value, returning the previous value if there was one.
    pub fn insert(&mut self, id: ShapeId, value: Node) -> Option<Node> {
        self.traits.insert(id, value)
    }

    /// Inserts a typed trait.
    pub fn insert_trait<T: Trait>(&mut self, value: &T) -> Result<(), crate::ShapeIdSyntaxError> {
        self.traits.insert(ShapeId::parse(T::ID)?, value.to_node());
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.traits.remove(id)
    }

    /// Gets a raw trait value by its Shape ID.
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.traits.get(id)
    }

    /// Returns true if the map contains a trait with the given Shape ID.
    pub fn contains(&self, id: &str) -> bool {
        self.traits.contains_key(id)
    }

    pub fn has_trait<T: Trait>(&self) -> bool {
        self.contains(T::ID)
    }

    /// Parses a typed trait, surfacing payload errors.
    pub fn get_trait<T: Trait>(&self) -> Result<Option<T>, TraitError> {
        self.get(T::ID).map(T::from_node).transpose()
    }

    /// Parses a typed trait, treating a malformed payload as absent.
    ///
    /// Intended for models that already passed validation, where payload errors were reported.
    pub fn find<T: Trait>(&self) -> Option<T> {
        match self.get_trait::<T>() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(trait_id = T::ID, error = %err, "ignoring malformed trait");
                None
            }
        }
    }

    /// Returns an iterator over all (trait id, value) pairs in trait id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ShapeId, &Node)> {
        self.traits.iter()
    }

    /// Returns the number of traits in the map.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl FromIterator<(ShapeId, Node)> for TraitMap {
    fn from_iter<I: IntoIterator<Item = (ShapeId, Node)>>(iter: I) -> Self {
        Self {
            traits: iter.into_iter().collect(),
        }
    }
}
