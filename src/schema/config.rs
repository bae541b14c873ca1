//! Configuration types for texture animation playback.

use serde::{Deserialize, Serialize};

/// Descriptor roots searched by default, in priority order.
pub const DEFAULT_ANIMATION_ROOTS: [&str; 3] =
    ["animatica/anim", "mcpatcher/anim", "optifine/anim"];

/// Default ceiling on baked sequence length.
pub const DEFAULT_MAX_BAKED_FRAMES: usize = 2048;

fn default_true() -> bool {
    true
}

fn default_max_baked_frames() -> Option<usize> {
    Some(DEFAULT_MAX_BAKED_FRAMES)
}

fn default_animation_roots() -> Vec<String> {
    DEFAULT_ANIMATION_ROOTS.iter().map(|r| r.to_string()).collect()
}

/// How animation groups are played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Redraw one working texture in place whenever it changes.
    #[default]
    Live,
    /// Precompute the whole cycle into distinct frames at load time.
    Baked,
}

/// Top-level playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Master switch; when off no animations are loaded.
    #[serde(default = "default_true")]
    pub animated_textures: bool,
    /// Driver used for every group.
    #[serde(default)]
    pub mode: PlaybackMode,
    /// Ceiling on baked sequence length (`None` bakes the full cycle).
    #[serde(default = "default_max_baked_frames")]
    pub max_baked_frames: Option<usize>,
    /// Resource path prefixes searched for `.properties` descriptors.
    #[serde(default = "default_animation_roots")]
    pub animation_roots: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            animated_textures: true,
            mode: PlaybackMode::Live,
            max_baked_frames: default_max_baked_frames(),
            animation_roots: default_animation_roots(),
        }
    }
}

impl PlayerConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_baked_frames == Some(0) {
            return Err(ConfigError::ZeroFrameCeiling);
        }
        if self.animation_roots.is_empty() {
            return Err(ConfigError::NoAnimationRoots);
        }
        if let Some(i) = self.animation_roots.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::EmptyAnimationRoot { index: i });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Baked frame ceiling must be non-zero (use null for no ceiling)")]
    ZeroFrameCeiling,
    #[error("At least one animation root is required")]
    NoAnimationRoots,
    #[error("Animation root {index} is empty")]
    EmptyAnimationRoot { index: usize },
}
