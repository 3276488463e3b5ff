/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::model::load_model;
use anyhow::{bail, Result};
use clap::Parser;
use smithy_error_traits::validate;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Model files or directories of model files
    #[clap(long = "model", required = true)]
    pub models: Vec<PathBuf>,
}

pub fn subcommand_validate(ValidateArgs { models }: &ValidateArgs) -> Result<()> {
    let model = load_model(models)?;
    let result = validate(&model);
    for event in result.events() {
        eprintln!("{event}");
    }
    let errors = result.errors().count();
    if errors > 0 {
        bail!("model validation failed with {errors} error(s)");
    }
    eprintln!(
        "model is valid ({} warning(s))",
        result.warnings().count()
    );
    Ok(())
}
