/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::SmithyBuildConfig;
use crate::model::{ensure_valid, load_model};
use anyhow::{Context, Result};
use clap::Parser;
use smithy_error_codegen::ArtifactGenerator;
use smithy_error_traits::ModelTransformer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to `smithy-build.json`
    #[clap(long)]
    pub config: PathBuf,
    /// Directory the generated artifacts are written to
    #[clap(long)]
    pub output_dir: PathBuf,
}

/// Loads, validates and transforms the model, then writes the artifacts of every enabled plugin.
pub fn subcommand_build(BuildArgs { config, output_dir }: &BuildArgs) -> Result<()> {
    let config = SmithyBuildConfig::from_file(config)?;
    let generate_config = config.generate_config()?;
    let model = load_model(&config.sources)?;
    ensure_valid(&model)?;
    let model = ModelTransformer::with_config(&config.transform_config()?)
        .transform(model)
        .context("Failed to transform the model")?;

    let artifacts = ArtifactGenerator::new(&model)
        .generate(&generate_config)
        .context("Failed to generate artifacts")?;
    let written = artifacts
        .write_to(output_dir)
        .with_context(|| format!("Failed to write artifacts to {:?}", output_dir))?;
    info!(artifacts = written.len(), output_dir = ?output_dir, "build complete");
    Ok(())
}
