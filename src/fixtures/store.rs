//! Loading definitions from the fixture tree.

use std::io;
use std::path::{Path, PathBuf};

use crate::fixtures::{Definition, FixtureError};
use crate::routing::VariantKey;

/// Reads `root/path/VERB/variant.json` files.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    root: PathBuf,
}

impl DefinitionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a variant, or `None` if the variant name would escape
    /// its verb directory.
    pub fn file_path(&self, key: &VariantKey) -> Option<PathBuf> {
        let variant = key.variant();
        if variant.is_empty() || variant.contains(['/', '\\']) || variant == ".." || variant == "." {
            return None;
        }

        let mut path = self.root.clone();
        path.extend(key.route().path().split('/').filter(|s| !s.is_empty()));
        path.push(key.route().verb().as_str());
        path.push(format!("{variant}.json"));
        Some(path)
    }

    /// Read and parse the definition for `key`.
    pub fn load(&self, key: &VariantKey) -> Result<Definition, FixtureError> {
        let path = self
            .file_path(key)
            .ok_or_else(|| FixtureError::NotFound(format!("invalid variant name '{}'", key.variant())))?;

        let bytes = std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => {
                FixtureError::NotFound(format!("no such file or directory: {}", path.display()))
            }
            _ => FixtureError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let definition = Definition::from_slice(&bytes)
            .map_err(|source| FixtureError::Malformed { path: path.clone(), source })?;

        tracing::debug!(key = %key, path = %path.display(), "Definition loaded");
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{HttpVerb, RouteKey};
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, DefinitionStore) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let store = DefinitionStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_variant() {
        let (_dir, store) = store_with(&[(
            "endpoint1/sub/GET/alt.json",
            r#"{"response_code":418,"body":"teapot"}"#,
        )]);
        let key = RouteKey::new("/endpoint1/sub", HttpVerb::Get).with_variant("alt");

        let def = store.load(&key).unwrap();
        assert_eq!(def.status(), 418);
        assert_eq!(def.body, serde_json::json!("teapot"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, store) = store_with(&[]);
        let key = RouteKey::new("nothing", HttpVerb::Get).with_variant("default");
        let err = store.load(&key).unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let (_dir, store) = store_with(&[("a/POST/default.json", "{ not json")]);
        let key = RouteKey::new("a", HttpVerb::Post).with_variant("default");
        assert!(matches!(store.load(&key), Err(FixtureError::Malformed { .. })));
    }

    #[test]
    fn test_variant_cannot_escape_verb_directory() {
        let (_dir, store) = store_with(&[("a/GET/default.json", "{}"), ("secret.json", "{}")]);
        let route = RouteKey::new("a", HttpVerb::Get);
        assert!(store.file_path(&route.with_variant("../../secret")).is_none());
        assert!(store.load(&route.with_variant("..")).unwrap_err().is_not_found());
    }
}
