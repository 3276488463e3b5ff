/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! In-memory Smithy models for the error trait tooling.
//!
//! A [`Model`] is assembled from one or more JSON AST documents with a [`ModelAssembler`].
//! Traits stay raw [`Node`]s on each shape and are read through the [`Trait`] interface.

#![warn(missing_debug_implementations, rust_2018_idioms)]

mod loader;
mod model;
pub mod node;
pub mod prelude;
mod shape;
mod shape_id;
mod trait_map;
pub mod traits;

pub use loader::{LoadError, ModelAssembler};
pub use model::{Model, TraitApplication};
pub use node::{Node, ObjectNode};
pub use shape::{MemberShape, Shape, ShapeType, UnknownShapeType};
pub use shape_id::{ShapeId, ShapeIdSyntaxError};
pub use trait_map::TraitMap;
pub use traits::{Trait, TraitError};
