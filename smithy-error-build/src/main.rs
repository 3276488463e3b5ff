/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use anyhow::Result;
use clap::Parser;
use smithy_error_build::subcommand::build::{subcommand_build, BuildArgs};
use smithy_error_build::subcommand::map::{subcommand_map, MapArgs};
use smithy_error_build::subcommand::transform::{subcommand_transform, TransformArgs};
use smithy_error_build::subcommand::validate::{subcommand_validate, ValidateArgs};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
enum Args {
    /// Validates the error traits of a model and prints every validation event
    Validate(ValidateArgs),
    /// Writes the JSON AST of a model after resolving error codes, aligning `@const` defaults and
    /// optionally synthesizing error unions
    Transform(TransformArgs),
    /// Adds `@const`, `@errorExample` and `@memberExample` information to an existing OpenAPI
    /// document
    Map(MapArgs),
    /// Runs every plugin configured in `smithy-build.json`
    Build(BuildArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "error,smithy_error_build=info".to_owned()),
        )
        .init();

    match Args::parse() {
        Args::Validate(args) => subcommand_validate(&args)?,
        Args::Transform(args) => subcommand_transform(&args)?,
        Args::Map(args) => subcommand_map(&args)?,
        Args::Build(args) => subcommand_build(&args)?,
    }

    Ok(())
}
