//! Animation descriptor records and namespaced resource references.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Namespace used when a reference carries none.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced resource reference (`namespace:path`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Create a reference from its parts, validating the namespace.
    pub fn new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, InvalidResourceId> {
        let namespace = namespace.into();
        let path = path.into();

        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(InvalidResourceId(format!("{}:{}", namespace, path)));
        }
        if path.is_empty() {
            return Err(InvalidResourceId(format!("{}:", namespace)));
        }
        if !path.chars().all(is_path_char) && !path.starts_with("~/") {
            // Legacy packs use uppercase and spaces freely; tolerate them but say so.
            warn!(
                "Legacy resource pack is using an invalid resource path '{}:{}'; \
                 only [a-z0-9_.-/] are supported",
                namespace, path
            );
        }

        Ok(Self { namespace, path })
    }

    /// Parse `namespace:path`, defaulting the namespace when absent.
    pub fn parse(s: &str) -> Result<Self, InvalidResourceId> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve a reference found inside the descriptor `file`.
    ///
    /// `./x` is relative to the descriptor's directory, `~/x` maps to `optifine/x`.
    pub fn resolve_relative(file: &ResourceId, reference: ResourceId) -> ResourceId {
        if let Some(rest) = reference.path.strip_prefix("./") {
            if let Some(slash) = file.path.rfind('/').filter(|&i| i > 0) {
                return ResourceId {
                    namespace: file.namespace.clone(),
                    path: format!("{}/{}", &file.path[..slash], rest),
                };
            }
        } else if let Some(rest) = reference.path.strip_prefix("~/") {
            return ResourceId {
                namespace: reference.namespace,
                path: format!("optifine/{}", rest),
            };
        }
        reference
    }

    /// Same namespace, path with `suffix` appended.
    pub fn with_suffix(&self, suffix: &str) -> ResourceId {
        ResourceId {
            namespace: self.namespace.clone(),
            path: format!("{}{}", self.path, suffix),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Malformed resource reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid resource location '{0}'")]
pub struct InvalidResourceId(pub String);

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

/// Width and height of a tile, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub width: u32,
    pub height: u32,
}

/// One decoded animation descriptor.
///
/// Immutable once decoded; several specs may share one `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Tile strip providing the frames.
    pub source: ResourceId,
    /// Base texture being animated.
    pub target: ResourceId,
    /// Top-left corner of the destination rectangle on the target.
    pub target_offset: (u32, u32),
    /// Size of one tile, and of the destination rectangle.
    pub region: Region,
    /// Ticks per frame when a frame has no explicit override.
    pub default_frame_duration: u32,
    /// Cross-blend consecutive frames instead of hard-cutting.
    pub interpolate: bool,
    /// Ticks a frame is held before its blend starts.
    pub interpolation_delay: u32,
    /// Logical frame index to source tile index.
    pub frame_mapping: BTreeMap<u32, u32>,
    /// Logical frame index to duration override.
    pub frame_durations: BTreeMap<u32, u32>,
}

impl AnimationSpec {
    /// Spec with identity mapping and default timing.
    pub fn new(
        source: ResourceId,
        target: ResourceId,
        target_offset: (u32, u32),
        region: Region,
    ) -> Self {
        Self {
            source,
            target,
            target_offset,
            region,
            default_frame_duration: 1,
            interpolate: false,
            interpolation_delay: 0,
            frame_mapping: BTreeMap::new(),
            frame_durations: BTreeMap::new(),
        }
    }

    /// Highest logical frame named by the frame mapping.
    pub fn greatest_mapped_frame(&self) -> Option<u32> {
        self.frame_mapping.keys().next_back().copied()
    }

    /// Source tile for logical frame `frame`.
    #[inline]
    pub fn tile_for(&self, frame: u32) -> u32 {
        self.frame_mapping.get(&frame).copied().unwrap_or(frame)
    }

    /// Duration of logical frame `frame`.
    #[inline]
    pub fn duration_for(&self, frame: u32) -> u32 {
        self.frame_durations
            .get(&frame)
            .copied()
            .unwrap_or(self.default_frame_duration)
    }
}
