//! Live driver - redraws one working texture in place.

use super::AnimationGroup;
use crate::compute::TextureBuffer;
use crate::schema::ResourceId;

/// Suffix of the working texture's identity.
pub const LIVE_SUFFIX: &str = "-anim";

/// An animated texture updated every tick.
///
/// The identity never changes; only the pixels do. After each redraw the
/// texture is flagged for upload until the host takes it.
#[derive(Debug, Clone)]
pub struct LiveTexture {
    id: ResourceId,
    group: AnimationGroup,
    image: TextureBuffer,
    needs_upload: bool,
    redraws: u64,
}

impl LiveTexture {
    /// Render the group's starting state so the texture is valid before the first tick.
    pub fn new(group: AnimationGroup) -> Self {
        let id = group.target().with_suffix(LIVE_SUFFIX);
        let mut image = group.base().clone();
        group.render(&mut image);

        Self {
            id,
            group,
            image,
            needs_upload: true,
            redraws: 0,
        }
    }

    /// Run one tick. Returns true if the texture was redrawn.
    pub fn tick(&mut self) -> bool {
        let redraw = self.group.begin_tick();
        if redraw {
            self.group.render(&mut self.image);
            self.needs_upload = true;
            self.redraws += 1;
        }
        self.group.end_tick();
        redraw
    }

    /// Identity and image, if the image changed since the last call.
    pub fn take_upload(&mut self) -> Option<(&ResourceId, &TextureBuffer)> {
        if std::mem::take(&mut self.needs_upload) {
            Some((&self.id, &self.image))
        } else {
            None
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn image(&self) -> &TextureBuffer {
        &self.image
    }

    pub fn group(&self) -> &AnimationGroup {
        &self.group
    }

    /// Redraws performed by `tick` so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}
