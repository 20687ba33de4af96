//! Startup discovery of routes from a fixture directory tree.
//!
//! Layout: `<root>/<endpoint-path>/<VERB>/<variant>.json`. Files without a
//! `.json` extension are not variants.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::routing::{HttpVerb, RouteTable};

/// Fatal errors raised while scanning the fixture tree.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The root could not be read. Propagated as-is.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("No HTTP verb folders found within: {}", .0.display())]
    NoVerbsFound(PathBuf),

    #[error("No definition files found within: {}", .0.display())]
    NoDefinitionsFound(PathBuf),
}

/// One entry produced by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub is_dir: bool,
    pub name: String,
}

/// Recursively list everything below `root`, sorted by relative path.
///
/// The root itself must be a readable directory; unreadable subdirectories
/// are skipped with a warning. Symlinks are not followed.
pub fn walk(root: &Path) -> io::Result<Vec<WalkEntry>> {
    let metadata = fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path is not a directory {}", root.display()),
        ));
    }

    let mut entries = Vec::new();
    let mut pending = vec![(fs::read_dir(root)?, PathBuf::new())];

    while let Some((read_dir, prefix)) = pending.pop() {
        for entry in read_dir.filter_map(Result::ok) {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = prefix.join(&name);

            if file_type.is_dir() {
                match fs::read_dir(entry.path()) {
                    Ok(children) => pending.push((children, relative.clone())),
                    Err(e) => {
                        tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable directory");
                    }
                }
            }

            entries.push(WalkEntry {
                relative,
                is_dir: file_type.is_dir(),
                name,
            });
        }
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(entries)
}

impl RouteTable {
    /// Scan `root` and build the route table.
    pub fn scan(root: &Path) -> Result<Self, DiscoveryError> {
        let entries = walk(root)?;
        let table = Self::from_entries(&entries);

        if table.is_empty() {
            return Err(DiscoveryError::NoVerbsFound(root.to_path_buf()));
        }
        if table.definition_count() == 0 {
            return Err(DiscoveryError::NoDefinitionsFound(root.to_path_buf()));
        }

        tracing::info!(
            root = %root.display(),
            routes = table.route_count(),
            definitions = table.definition_count(),
            "Fixture tree scanned"
        );
        Ok(table)
    }

    /// Build a table from walk output without touching the filesystem.
    pub fn from_entries(entries: &[WalkEntry]) -> Self {
        let mut table = RouteTable::default();

        for entry in entries {
            if entry.is_dir {
                if let Ok(verb) = entry.name.parse::<HttpVerb>() {
                    table.insert_verb(&route_path(entry.relative.parent()), verb);
                }
                continue;
            }

            let is_json = entry.relative.extension().and_then(|ext| ext.to_str()) == Some("json");
            if entry.name.starts_with('.') || !is_json {
                continue;
            }

            let Some(verb_dir) = entry.relative.parent() else {
                continue;
            };
            let Some(verb) = verb_dir
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.parse::<HttpVerb>().ok())
            else {
                continue;
            };
            let Some(variant) = entry.relative.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            table.insert_variant(&route_path(verb_dir.parent()), verb, variant);
        }

        table
    }
}

/// Join the components of a relative directory with `/`.
fn route_path(dir: Option<&Path>) -> String {
    dir.map(|dir| {
        dir.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    })
    .unwrap_or_default()
}
