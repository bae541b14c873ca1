//! Access to the host's resources: descriptor discovery and raw reads.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::schema::ResourceId;

/// File extension of animation descriptors.
pub const DESCRIPTOR_EXTENSION: &str = ".properties";

/// Where animation resources come from.
pub trait ResourceSource {
    /// Every descriptor under one of `roots`, sorted.
    fn find_descriptors(&self, roots: &[String]) -> Vec<ResourceId>;

    /// Raw bytes of one resource.
    fn read(&self, id: &ResourceId) -> io::Result<Vec<u8>>;
}

fn is_descriptor_under(path: &str, roots: &[String]) -> bool {
    path.ends_with(DESCRIPTOR_EXTENSION)
        && roots.iter().any(|root| {
            path.strip_prefix(root.trim_end_matches('/'))
                .is_some_and(|rest| rest.starts_with('/'))
        })
}

/// Resources held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    resources: BTreeMap<ResourceId, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ResourceId, bytes: impl Into<Vec<u8>>) {
        self.resources.insert(id, bytes.into());
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn find_descriptors(&self, roots: &[String]) -> Vec<ResourceId> {
        self.resources
            .keys()
            .filter(|id| is_descriptor_under(id.path(), roots))
            .cloned()
            .collect()
    }

    fn read(&self, id: &ResourceId) -> io::Result<Vec<u8>> {
        self.resources.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Resource {} not found", id))
        })
    }
}

/// A resource pack unpacked on disk as `<root>/assets/<namespace>/<path>`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn assets(&self) -> PathBuf {
        self.root.join("assets")
    }
}

impl ResourceSource for DirectorySource {
    fn find_descriptors(&self, roots: &[String]) -> Vec<ResourceId> {
        let Ok(namespaces) = fs::read_dir(self.assets()) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for entry in namespaces.flatten() {
            let ns_dir = entry.path();
            if !ns_dir.is_dir() {
                continue;
            }
            let Some(namespace) = ns_dir.file_name().and_then(|n| n.to_str()).map(str::to_owned)
            else {
                continue;
            };

            for file in WalkDir::new(&ns_dir).into_iter().filter_map(Result::ok) {
                if !file.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = file.path().strip_prefix(&ns_dir) else {
                    continue;
                };
                let path = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if !is_descriptor_under(&path, roots) {
                    continue;
                }
                match ResourceId::new(namespace.clone(), path) {
                    Ok(id) => found.push(id),
                    Err(e) => warn!("Skipping descriptor {}: {}", file.path().display(), e),
                }
            }
        }

        found.sort();
        found
    }

    fn read(&self, id: &ResourceId) -> io::Result<Vec<u8>> {
        fs::read(self.assets().join(id.namespace()).join(id.path()))
    }
}
