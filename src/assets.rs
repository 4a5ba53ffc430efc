//! Template asset loading
//!
//! Loads a directory of template-part files into an in-memory, path-keyed
//! store. Loading is all-or-nothing: the first unreadable file or directory
//! aborts the load and no partial store is returned.
//!
//! [`verify_required_assets`] is a stat-only pre-flight check so a
//! misconfigured template directory is reported before any other pipeline
//! stage does work.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Base template for Kubernetes clusters
pub const KUBERNETES_BASE_FILE: &str = "kubernetesbase.t";

/// Base template for Swarm clusters
pub const SWARM_BASE_FILE: &str = "swarmbase.t";

/// Base template for DCOS clusters
pub const DCOS_BASE_FILE: &str = "dcosbase.t";

/// Template parts that must exist before a generation run starts
pub const REQUIRED_ASSETS: &[&str] = &[KUBERNETES_BASE_FILE, SWARM_BASE_FILE, DCOS_BASE_FILE];

/// Immutable mapping from relative path to raw file content
#[derive(Debug, Default)]
pub struct TemplateAssets {
    files: HashMap<String, Vec<u8>>,
}

impl TemplateAssets {
    /// Recursively load every regular file under `root`
    ///
    /// Keys are `/`-joined paths relative to `root`, regardless of platform.
    pub fn load(root: &Path) -> Result<Self> {
        let mut files = HashMap::new();

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk error"));
                Error::io(path, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let content =
                std::fs::read(entry.path()).map_err(|e| Error::io(entry.path(), e))?;

            if files.insert(relative.clone(), content).is_some() {
                return Err(Error::DuplicateAsset(relative));
            }
        }

        debug!(count = files.len(), root = %root.display(), "loaded template assets");
        Ok(Self { files })
    }

    /// Content of the asset at `relative`, if loaded
    pub fn get(&self, relative: &str) -> Option<&[u8]> {
        self.files.get(relative).map(Vec::as_slice)
    }

    /// Number of loaded assets
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Check that every name in `required` exists under `root`, without reading
/// content
///
/// Fails with [`Error::MissingAsset`] naming the first missing file.
pub fn verify_required_assets(root: &Path, required: &[&str]) -> Result<()> {
    for name in required {
        let path = root.join(name);
        if !path.is_file() {
            return Err(Error::MissingAsset { path });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn load_round_trips_bytes_exactly() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.t", b"top level");
        write(dir.path(), "nested/part.t", b"\x00\xffbinary\r\ncontent");

        let assets = TemplateAssets::load(dir.path()).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets.get("base.t"), Some(&b"top level"[..]));
        assert_eq!(
            assets.get("nested/part.t"),
            Some(&b"\x00\xffbinary\r\ncontent"[..])
        );
    }

    #[test]
    fn load_keys_are_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/b/c.t", b"deep");

        let assets = TemplateAssets::load(dir.path()).unwrap();
        assert_eq!(assets.get("a/b/c.t"), Some(&b"deep"[..]));
        assert!(assets.get("c.t").is_none());
    }

    #[test]
    fn load_fails_for_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = TemplateAssets::load(&missing);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn empty_directory_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let assets = TemplateAssets::load(dir.path()).unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn verify_passes_when_required_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.t", b"x");
        write(dir.path(), "other.t", b"y");
        assert!(verify_required_assets(dir.path(), &["base.t"]).is_ok());
    }

    #[test]
    fn verify_fails_iff_a_required_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "unrelated.t", b"x");

        let err = verify_required_assets(dir.path(), &["base.t"]).unwrap_err();
        match err {
            Error::MissingAsset { path } => {
                assert!(path.ends_with("base.t"));
            }
            other => panic!("expected MissingAsset, got {other:?}"),
        }

        // Presence of the required file makes the same check pass, no matter
        // what else exists.
        write(dir.path(), "base.t", b"x");
        assert!(verify_required_assets(dir.path(), &["base.t"]).is_ok());
    }

    #[test]
    fn verify_names_the_first_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "second.t", b"x");
        let err = verify_required_assets(dir.path(), &["first.t", "second.t"]).unwrap_err();
        assert!(err.to_string().contains("first.t"));
    }
}
