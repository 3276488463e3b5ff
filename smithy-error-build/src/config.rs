/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use anyhow::{Context, Result};
use fs_err as fs;
use serde::Deserialize;
use smithy_error_codegen::openapi::OpenApiConfig;
use smithy_error_codegen::{ErrorTypesConfig, GenerateConfig};
use smithy_error_traits::TransformConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const OPENAPI_PLUGIN: &str = "openapi";
pub const ERROR_TYPES_PLUGIN: &str = "error-types";

/// `smithy-build.json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SmithyBuildConfig {
    pub version: String,
    /// Model files or directories. Relative paths are resolved against the config file's
    /// directory by [`SmithyBuildConfig::from_file`].
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

impl FromStr for SmithyBuildConfig {
    type Err = anyhow::Error;

    fn from_str(contents: &str) -> Result<Self> {
        let config: SmithyBuildConfig = serde_json::from_str(contents)?;
        if config.version != "1.0" {
            anyhow::bail!("unsupported smithy-build version `{}`", config.version);
        }
        Ok(config)
    }
}

impl SmithyBuildConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<SmithyBuildConfig> {
        let path = path.as_ref();
        let mut config = Self::from_str(
            &fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        )
        .with_context(|| format!("Failed to parse {:?}", path))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for source in &mut config.sources {
            if source.is_relative() {
                *source = base.join(&*source);
            }
        }
        Ok(config)
    }

    fn plugin<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.plugins
            .get(name)
            .map(|settings| {
                serde_json::from_value(settings.clone())
                    .with_context(|| format!("Invalid settings for the `{name}` plugin"))
            })
            .transpose()
    }

    pub fn openapi(&self) -> Result<Option<OpenApiConfig>> {
        self.plugin(OPENAPI_PLUGIN)
    }

    /// Transform options come from the `openapi` plugin, which owns `onErrorStatusConflict`.
    pub fn transform_config(&self) -> Result<TransformConfig> {
        Ok(self
            .openapi()?
            .map(|openapi| openapi.transform_config())
            .unwrap_or_default())
    }

    /// The generators of every known plugin. Unknown plugins are skipped with a warning.
    pub fn generate_config(&self) -> Result<GenerateConfig> {
        for name in self.plugins.keys() {
            if name != OPENAPI_PLUGIN && name != ERROR_TYPES_PLUGIN {
                warn!(plugin = %name, "ignoring unknown plugin");
            }
        }
        Ok(GenerateConfig {
            openapi: self.openapi()?,
            error_types: self.plugin::<ErrorTypesConfig>(ERROR_TYPES_PLUGIN)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smithy_error_traits::ErrorStatusConflict;

    const CONFIG: &str = r#"{
        "version": "1.0",
        "sources": ["model", "/abs/extra.json"],
        "plugins": {
            "openapi": {"service": "com.example#BankService", "onErrorStatusConflict": "oneOf"},
            "error-types": {"service": "com.example#BankService"},
            "typescript-codegen": {}
        }
    }"#;

    #[test]
    fn parse_plugins() {
        let config = SmithyBuildConfig::from_str(CONFIG).unwrap();
        let generate = config.generate_config().unwrap();
        let service = "com.example#BankService".parse().unwrap();
        assert_eq!(
            generate.error_types,
            Some(ErrorTypesConfig {
                service: "com.example#BankService".parse().unwrap()
            })
        );
        let openapi = generate.openapi.unwrap();
        assert_eq!(openapi.service, service);
        assert_eq!(openapi.version, "3.1.0");
        assert_eq!(
            config.transform_config().unwrap().on_error_status_conflict,
            Some(ErrorStatusConflict::OneOf)
        );
    }

    #[test]
    fn sources_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smithy-build.json");
        fs::write(&path, CONFIG).unwrap();
        let config = SmithyBuildConfig::from_file(&path).unwrap();
        assert_eq!(
            config.sources,
            vec![dir.path().join("model"), PathBuf::from("/abs/extra.json")]
        );
    }

    #[test]
    fn reject_bad_config() {
        let err = SmithyBuildConfig::from_str(r#"{"version": "2.0"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unsupported smithy-build version `2.0`");

        let config = SmithyBuildConfig::from_str(
            r#"{"version": "1.0", "plugins": {"openapi": {"service": "NoNamespace"}}}"#,
        )
        .unwrap();
        let err = config.generate_config().unwrap_err();
        assert_eq!(err.to_string(), "Invalid settings for the `openapi` plugin");
    }
}
