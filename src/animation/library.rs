//! Animation library - every animated texture of a loaded resource set.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use log::{error, info, warn};

use super::{
    AnimationGroup, BakeConfig, BakedAnimation, Bakery, FrameRef, LiveTexture, LoadError,
    ResourceSource,
};
use crate::compute::TextureBuffer;
use crate::schema::{
    AnimationSpec, ConfigError, PlaybackMode, PlayerConfig, ResourceId, parse_descriptor,
};

/// Playback state of one target.
#[derive(Debug, Clone)]
pub enum GroupPlayback {
    Live(LiveTexture),
    Baked(BakedAnimation),
    /// The group could not be loaded; the original texture is shown.
    Failed,
}

/// Animated textures keyed by target, built in one pass.
///
/// A reload builds a new library and replaces the old one wholesale.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    groups: BTreeMap<ResourceId, GroupPlayback>,
}

impl AnimationLibrary {
    /// Library with no animations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Discover, decode and build every animation in `source`.
    ///
    /// Bad descriptors and groups are logged and contained; only an invalid
    /// configuration is an error.
    pub fn load(source: &dyn ResourceSource, config: &PlayerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if !config.animated_textures {
            info!("Animated textures disabled");
            return Ok(Self::empty());
        }

        let descriptors = source.find_descriptors(&config.animation_roots);
        let mut by_target = BTreeMap::<ResourceId, Vec<(ResourceId, AnimationSpec)>>::new();
        for file in &descriptors {
            match read_descriptor(source, file) {
                Ok(spec) => by_target
                    .entry(spec.target.clone())
                    .or_default()
                    .push((file.clone(), spec)),
                Err(e) => warn!("{}", e),
            }
        }

        let mut groups = BTreeMap::new();
        let mut failed = 0;
        for (target, specs) in by_target {
            let playback = match AnimationGroup::build(&target, &specs, source) {
                Ok(group) => match config.mode {
                    PlaybackMode::Live => GroupPlayback::Live(LiveTexture::new(group)),
                    PlaybackMode::Baked => {
                        let bake = BakeConfig {
                            max_frames: config.max_baked_frames,
                        };
                        GroupPlayback::Baked(Bakery::new(group, bake).bake())
                    }
                },
                Err(e) => {
                    error!("Animation for {} disabled: {}", target, e);
                    failed += 1;
                    GroupPlayback::Failed
                }
            };
            groups.insert(target, playback);
        }

        info!(
            "Loaded {} animated textures from {} descriptors ({} failed, {:?} mode)",
            groups.len() - failed,
            descriptors.len(),
            failed,
            config.mode
        );

        Ok(Self { groups })
    }

    /// What to display for `target` at global tick `tick`.
    pub fn lookup(&self, target: &ResourceId, tick: u64) -> FrameRef<'_> {
        match self.groups.get(target) {
            Some(GroupPlayback::Live(texture)) => FrameRef::Texture(texture.id()),
            Some(GroupPlayback::Baked(baked)) => baked.frame_at(tick),
            Some(GroupPlayback::Failed) | None => FrameRef::Unanimated,
        }
    }

    /// Advance every live texture by one tick. Returns how many were redrawn.
    pub fn tick(&mut self) -> usize {
        self.groups
            .values_mut()
            .filter_map(|g| match g {
                GroupPlayback::Live(texture) => Some(texture.tick()),
                _ => None,
            })
            .filter(|&redrawn| redrawn)
            .count()
    }

    /// Live textures changed since they were last taken.
    pub fn take_uploads(&mut self) -> Vec<(&ResourceId, &TextureBuffer)> {
        let mut uploads = Vec::new();
        for group in self.groups.values_mut() {
            if let GroupPlayback::Live(texture) = group {
                if let Some(upload) = texture.take_upload() {
                    uploads.push(upload);
                }
            }
        }
        uploads
    }

    /// Pixels behind a frame identity returned by [`lookup`](Self::lookup).
    pub fn texture(&self, id: &ResourceId) -> Option<&TextureBuffer> {
        self.groups.values().find_map(|g| match g {
            GroupPlayback::Live(texture) if texture.id() == id => Some(texture.image()),
            GroupPlayback::Baked(baked) => baked.texture(id),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = (&ResourceId, &GroupPlayback)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn read_descriptor(
    source: &dyn ResourceSource,
    file: &ResourceId,
) -> Result<AnimationSpec, LoadError> {
    let bytes = source.read(file).map_err(|e| LoadError::Io {
        id: file.clone(),
        source: e,
    })?;
    Ok(parse_descriptor(file, &String::from_utf8_lossy(&bytes))?)
}

/// A library shared between a reloading thread and readers.
///
/// Reloads build the replacement without holding the lock, then swap it in.
#[derive(Debug, Default)]
pub struct SharedLibrary {
    inner: RwLock<AnimationLibrary>,
}

impl SharedLibrary {
    pub fn new(library: AnimationLibrary) -> Self {
        Self {
            inner: RwLock::new(library),
        }
    }

    /// Rebuild from `source`; the current library stays visible until done.
    pub fn reload(
        &self,
        source: &dyn ResourceSource,
        config: &PlayerConfig,
    ) -> Result<(), ConfigError> {
        let next = AnimationLibrary::load(source, config)?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    /// Frame identity for `target` at `tick`; `None` means show the original texture.
    pub fn lookup(&self, target: &ResourceId, tick: u64) -> Option<ResourceId> {
        self.read().lookup(target, tick).to_id()
    }

    pub fn tick(&self) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tick()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, AnimationLibrary> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
