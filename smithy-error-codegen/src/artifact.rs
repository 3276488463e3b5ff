/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::GenerateError;
use smithy_error_model::ShapeId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A generated file and the shape it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub shape_id: ShapeId,
    /// Relative to the output directory.
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    /// Creates an artifact whose contents end with exactly one newline.
    pub fn new(shape_id: ShapeId, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let mut contents = contents.into();
        contents.truncate(contents.trim_end_matches('\n').len());
        contents.push('\n');
        Self {
            shape_id,
            path: path.into(),
            contents,
        }
    }
}

/// Artifacts ordered by path. Two artifacts never share a path.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: BTreeMap<PathBuf, Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: Artifact) -> Result<(), GenerateError> {
        if self.artifacts.contains_key(&artifact.path) {
            return Err(GenerateError::DuplicatePath(artifact.path));
        }
        self.artifacts.insert(artifact.path.clone(), artifact);
        Ok(())
    }

    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = Artifact>) -> Result<(), GenerateError> {
        artifacts.into_iter().try_for_each(|artifact| self.insert(artifact))
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Artifact> {
        self.artifacts.get(path.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Writes every artifact under `dir`, creating parent directories as needed. Returns the
    /// written paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
        let mut written = Vec::with_capacity(self.artifacts.len());
        for artifact in self.artifacts.values() {
            let path = dir.join(&artifact.path);
            if let Some(parent) = path.parent() {
                fs_err::create_dir_all(parent)?;
            }
            fs_err::write(&path, &artifact.contents)?;
            debug!(path = %path.display(), shape = %artifact.shape_id, "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::collections::btree_map::Values<'a, PathBuf, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn artifact(path: &str, contents: &str) -> Artifact {
        Artifact::new("com.example#Bank".parse().unwrap(), path, contents)
    }

    #[test]
    fn single_trailing_newline() {
        assert_eq!(artifact("a", "x").contents, "x\n");
        assert_eq!(artifact("a", "x\n\n\n").contents, "x\n");
        assert_eq!(artifact("a", "").contents, "\n");
    }

    #[test]
    fn ordered_by_path_and_unique() {
        let mut set = ArtifactSet::new();
        set.insert(artifact("errors/mod.rs", "mod")).unwrap();
        set.insert(artifact("bank.openapi.json", "{}")).unwrap();
        let paths: Vec<_> = set.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("bank.openapi.json"), PathBuf::from("errors/mod.rs")]
        );

        let err = set.insert(artifact("errors/mod.rs", "other")).unwrap_err();
        assert_eq!(err.to_string(), "two artifacts claim the path `errors/mod.rs`");
        assert_eq!(set.get("errors/mod.rs").unwrap().contents, "mod\n");
    }

    #[test]
    fn write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ArtifactSet::new();
        set.extend([artifact("errors/mod.rs", "mod"), artifact("openapi.json", "{}")])
            .unwrap();
        let written = set.write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs_err::read_to_string(dir.path().join("errors/mod.rs")).unwrap(),
            "mod\n"
        );
    }
}
