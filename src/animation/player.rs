//! Baked animation playback - cyclic lookup over precomputed frames.

use crate::compute::TextureBuffer;
use crate::schema::ResourceId;

/// What to display for a target at some tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRef<'a> {
    /// No animation; display the original texture.
    Unanimated,
    /// Display the texture with this identity.
    Texture(&'a ResourceId),
}

impl FrameRef<'_> {
    /// Owned identity, `None` for [`FrameRef::Unanimated`].
    pub fn to_id(self) -> Option<ResourceId> {
        match self {
            FrameRef::Unanimated => None,
            FrameRef::Texture(id) => Some(id.clone()),
        }
    }
}

/// One distinct baked frame.
#[derive(Debug, Clone)]
pub struct BakedFrame {
    pub id: ResourceId,
    pub image: TextureBuffer,
}

/// A fully baked animation cycle.
///
/// `sequence` holds one entry per tick of the cycle, each an index into
/// `frames`; static stretches repeat the same index.
#[derive(Debug, Clone)]
pub struct BakedAnimation {
    target: ResourceId,
    frames: Vec<BakedFrame>,
    sequence: Vec<usize>,
}

impl BakedAnimation {
    pub(super) fn new(target: ResourceId, frames: Vec<BakedFrame>, sequence: Vec<usize>) -> Self {
        debug_assert!(sequence.iter().all(|&i| i < frames.len()));
        Self {
            target,
            frames,
            sequence,
        }
    }

    /// Frame to display at global tick `tick`.
    pub fn frame_at(&self, tick: u64) -> FrameRef<'_> {
        if self.sequence.is_empty() {
            return FrameRef::Unanimated;
        }
        let index = self.sequence[(tick % self.sequence.len() as u64) as usize];
        FrameRef::Texture(&self.frames[index].id)
    }

    /// Pixels of a baked frame.
    pub fn texture(&self, id: &ResourceId) -> Option<&TextureBuffer> {
        self.frames.iter().find(|f| &f.id == id).map(|f| &f.image)
    }

    pub fn target(&self) -> &ResourceId {
        &self.target
    }

    /// Length of the cycle in ticks.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The distinct frames, in order of first appearance.
    pub fn distinct_frames(&self) -> &[BakedFrame] {
        &self.frames
    }

    /// Frame identities in tick order.
    pub fn sequence(&self) -> impl ExactSizeIterator<Item = &ResourceId> + '_ {
        self.sequence.iter().map(|&i| &self.frames[i].id)
    }

    /// Iterate over the frames of one cycle, one per tick.
    pub fn frames(&self) -> FrameIterator<'_> {
        FrameIterator {
            animation: self,
            current: 0,
        }
    }

    /// Bytes held by the distinct frame buffers.
    pub fn byte_len(&self) -> usize {
        self.frames.iter().map(|f| f.image.byte_len()).sum()
    }
}

/// Iterator over a baked cycle.
pub struct FrameIterator<'a> {
    animation: &'a BakedAnimation,
    current: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = &'a BakedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.animation.sequence.get(self.current)?;
        self.current += 1;
        Some(&self.animation.frames[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.animation.sequence.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FrameIterator<'a> {}
