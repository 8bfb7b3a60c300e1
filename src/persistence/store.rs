use crate::error::StoreError;
use crate::protection::registry::OwnershipRegistry;
use crate::world::position::Position;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON owner file for one protected block type. Every save is a full overwrite.
#[derive(Debug, Clone)]
pub struct OwnerStore {
    path: PathBuf,
}

impl OwnerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.sibling_path("bak")
    }

    fn sibling_path(&self, extension: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    /// A missing file is an empty registry. A corrupt file is an error; the
    /// `.bak` and `.corrupt` copies are only for manual recovery.
    pub fn load(&self) -> Result<OwnershipRegistry, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(OwnershipRegistry::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        parse_registry(&data, &self.path).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, registry: &OwnershipRegistry) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_string_pretty(registry).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        if self.path.exists() {
            if self.load_file(&self.path).is_some() {
                let backup_path = self.backup_path();
                fs::copy(&self.path, &backup_path).map_err(|source| StoreError::Io {
                    path: backup_path,
                    source,
                })?;
            } else {
                // Keep the unreadable document around for manual recovery.
                let corrupt_path = self.sibling_path("corrupt");
                log::warn!(
                    "owner file {} unreadable, moved to {}",
                    self.path.display(),
                    corrupt_path.display()
                );
                fs::rename(&self.path, &corrupt_path).map_err(|source| StoreError::Io {
                    path: corrupt_path,
                    source,
                })?;
            }
        }
        fs::write(&self.path, data).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn load_file(&self, path: &Path) -> Option<OwnershipRegistry> {
        let data = fs::read_to_string(path).ok()?;
        parse_registry(&data, path).ok()
    }
}

/// Entries with a key that is not a position, or a value that is not a
/// string, are skipped; the next save drops them.
fn parse_registry(data: &str, path: &Path) -> Result<OwnershipRegistry, serde_json::Error> {
    let mut registry = OwnershipRegistry::new();
    if data.trim().is_empty() {
        return Ok(registry);
    }
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(data)?;
    for (key, value) in raw {
        let position = match key.parse::<Position>() {
            Ok(position) => position,
            Err(err) => {
                log::warn!("owner file {}: skipping entry: {}", path.display(), err);
                continue;
            }
        };
        match value.as_str() {
            Some(owner) => registry.claim(&[position], owner),
            None => log::warn!(
                "owner file {}: skipping entry {} with non-string owner {}",
                path.display(),
                key,
                value
            ),
        }
    }
    Ok(registry)
}
