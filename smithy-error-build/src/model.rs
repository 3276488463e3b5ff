/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Loading and validating the models the subcommands work on.

use anyhow::{Context, Result};
use fs_err as fs;
use smithy_error_model::{Model, ModelAssembler};
use smithy_error_traits::validate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Expands directories into the `*.json` files they contain, sorted by path.
pub fn model_files(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(source)? {
                let path = entry?.path();
                if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                    entries.push(path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(source.clone());
        }
    }
    Ok(files)
}

pub fn load_model(sources: &[PathBuf]) -> Result<Model> {
    let files = model_files(sources)?;
    if files.is_empty() {
        anyhow::bail!("no model files found in {:?}", sources);
    }
    let mut assembler = ModelAssembler::new();
    for file in &files {
        assembler = assembler
            .add_import(file)
            .with_context(|| format!("Failed to read model file {:?}", file))?;
    }
    let model = assembler.assemble().context("Failed to assemble the model")?;
    info!(files = files.len(), shapes = model.len(), "loaded model");
    Ok(model)
}

/// Logs every validation event and fails if any of them is an error.
pub fn ensure_valid(model: &Model) -> Result<()> {
    let result = validate(model);
    for event in result.warnings() {
        warn!("{event}");
    }
    result.unwrap_valid()?;
    Ok(())
}

pub fn write_json(path: &Path, node: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut contents = serde_json::to_string_pretty(node)?;
    contents.push('\n');
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}
