/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::model::{ensure_valid, load_model, write_json};
use anyhow::{Context as _, Result};
use clap::Parser;
use fs_err as fs;
use smithy_error_codegen::openapi::{apply_extensions, Context, ErrorExampleExtension, OpenApiConfig};
use smithy_error_model::ShapeId;
use smithy_error_traits::ModelTransformer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Model files or directories of model files
    #[clap(long = "model", required = true)]
    pub models: Vec<PathBuf>,
    /// The service the OpenAPI document describes, e.g. `com.example#BankService`
    #[clap(long)]
    pub service: ShapeId,
    /// OpenAPI document produced by another converter
    #[clap(short, long)]
    pub input: PathBuf,
    /// Path to write the updated OpenAPI document to
    #[clap(short, long)]
    pub output: PathBuf,
}

/// Runs the error trait mappers over an existing OpenAPI document.
pub fn subcommand_map(
    MapArgs {
        models,
        service,
        input,
        output,
    }: &MapArgs,
) -> Result<()> {
    let model = load_model(models)?;
    ensure_valid(&model)?;
    let model = ModelTransformer::default()
        .transform(model)
        .context("Failed to transform the model")?;
    let document: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?,
    )
    .with_context(|| format!("Failed to parse OpenAPI document {:?}", input))?;

    let config = OpenApiConfig::new(service.clone());
    let context = Context::new(&model, &config)?;
    let document = apply_extensions(&context, document, &[&ErrorExampleExtension]);
    write_json(output, &document)
}
