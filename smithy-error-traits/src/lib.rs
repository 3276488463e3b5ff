/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Custom error traits for Smithy models.
//!
//! - [`ConstTrait`] (`com.example#const`) pins a member to a constant value.
//! - [`MemberExampleTrait`] (`com.example#memberExample`) gives a member an example value.
//! - [`ErrorExampleTrait`] (`com.example#errorExample`) attaches full examples to an error.
//!
//! [`validation`] checks models that use these traits and [`transform`] prepares validated
//! models for generation.

#![warn(missing_debug_implementations, rust_2018_idioms)]

mod const_trait;
pub mod definition;
mod error_example;
mod member_example;
pub mod transform;
pub mod validation;

pub use const_trait::ConstTrait;
pub use definition::{Selector, TraitDefinition, TraitRegistry};
pub use error_example::{ErrorExampleEntry, ErrorExampleTrait};
pub use member_example::MemberExampleTrait;
pub use transform::{ErrorStatusConflict, ModelTransformer, TransformConfig, TransformError};
pub use validation::{validate, ModelValidator, Severity, ValidatedResult, ValidationEvent, ValidationFailure};
