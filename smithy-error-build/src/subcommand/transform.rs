/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::SmithyBuildConfig;
use crate::model::{ensure_valid, load_model, write_json};
use anyhow::{Context, Result};
use clap::Parser;
use smithy_error_traits::{ModelTransformer, TransformConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Model files or directories of model files
    #[clap(long = "model", required = true)]
    pub models: Vec<PathBuf>,
    /// `smithy-build.json` whose `openapi` plugin settings configure the transforms
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Path to write the transformed JSON AST to
    #[clap(short, long)]
    pub output: PathBuf,
}

pub fn subcommand_transform(
    TransformArgs {
        models,
        config,
        output,
    }: &TransformArgs,
) -> Result<()> {
    let transform_config = match config {
        Some(path) => SmithyBuildConfig::from_file(path)?.transform_config()?,
        None => TransformConfig::default(),
    };
    let model = load_model(models)?;
    ensure_valid(&model)?;
    let model = ModelTransformer::with_config(&transform_config)
        .transform(model)
        .context("Failed to transform the model")?;
    write_json(output, &model.to_json_ast())
}
