/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Generates artifacts from a Smithy model carrying the error traits: an OpenAPI document with
//! error examples and Rust error types.

#![warn(missing_debug_implementations, rust_2018_idioms)]

pub mod artifact;
mod error;
mod generate;
pub mod openapi;
pub mod rust_types;

pub use artifact::{Artifact, ArtifactSet};
pub use error::GenerateError;
pub use generate::{ArtifactGenerator, ErrorTypesConfig, GenerateConfig};
