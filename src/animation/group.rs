//! Animation groups - every animation that draws onto one target texture.

use std::io;

use log::warn;

use super::ResourceSource;
use crate::compute::{
    Phase, PhaseCursor, TextureBuffer, Timeline, TimelineError, blend_copy, copy, cycle_length,
};
use crate::schema::{AnimationSpec, DescriptorError, Region, ResourceId};

/// Failures while loading animations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {id}: {source}")]
    Io { id: ResourceId, source: io::Error },
    #[error("Failed to decode image {id}: {source}")]
    Decode {
        id: ResourceId,
        source: image::ImageError,
    },
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Malformed animation {descriptor}: {source}")]
    Malformed {
        descriptor: ResourceId,
        source: TimelineError,
    },
    #[error("No usable animations for {target}")]
    NoAnimations { target: ResourceId },
}

/// Read and decode one image resource.
pub fn load_texture(
    source: &dyn ResourceSource,
    id: &ResourceId,
) -> Result<TextureBuffer, LoadError> {
    let bytes = source.read(id).map_err(|e| LoadError::Io {
        id: id.clone(),
        source: e,
    })?;
    TextureBuffer::decode(&bytes).map_err(|e| LoadError::Decode {
        id: id.clone(),
        source: e,
    })
}

/// One running animation: its playhead, tile strip and destination.
#[derive(Debug, Clone)]
pub struct Animation {
    descriptor: ResourceId,
    cursor: PhaseCursor,
    source: TextureBuffer,
    target_offset: (u32, u32),
    region: Region,
}

impl Animation {
    /// Build the timeline for `spec` and check its rectangles against both textures.
    pub fn new(
        descriptor: ResourceId,
        spec: &AnimationSpec,
        source: TextureBuffer,
        target: &TextureBuffer,
    ) -> Result<Self, TimelineError> {
        let timeline = Timeline::build(spec, source.width, source.height)?;

        let (x, y) = spec.target_offset;
        if !target.contains_rect(x, y, spec.region.width, spec.region.height) {
            return Err(TimelineError::RegionOutsideTarget {
                x,
                y,
                width: spec.region.width,
                height: spec.region.height,
                target_width: target.width,
                target_height: target.height,
            });
        }

        Ok(Self {
            descriptor,
            cursor: PhaseCursor::new(timeline),
            source,
            target_offset: spec.target_offset,
            region: spec.region,
        })
    }

    /// Composite the current phase onto `dst`.
    pub fn draw(&self, dst: &mut TextureBuffer) {
        let size = (self.region.width, self.region.height);
        match *self.cursor.phase() {
            Phase::Static { v, .. } => copy(&self.source, (0, v), size, dst, self.target_offset),
            Phase::Interpolated { from_v, to_v, .. } => blend_copy(
                &self.source,
                (0, from_v),
                (0, to_v),
                size,
                dst,
                self.target_offset,
                self.cursor.blend(),
            ),
        }
    }

    pub fn descriptor(&self) -> &ResourceId {
        &self.descriptor
    }

    pub fn cursor(&self) -> &PhaseCursor {
        &self.cursor
    }
}

/// All animations sharing one target texture, plus its pristine image.
///
/// A tick is `begin_tick`, then `render` if it asked for a redraw, then
/// `end_tick`. Rendering reflects cursor state before the advance.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    target: ResourceId,
    base: TextureBuffer,
    animations: Vec<Animation>,
    ticks_since_loop: u64,
}

impl AnimationGroup {
    /// Assemble a group from its descriptors, in declaration order.
    ///
    /// Unreadable images fail the whole group. Malformed specs are skipped.
    pub fn build(
        target: &ResourceId,
        specs: &[(ResourceId, AnimationSpec)],
        source: &dyn ResourceSource,
    ) -> Result<Self, LoadError> {
        let base = load_texture(source, target)?;

        let mut animations = Vec::with_capacity(specs.len());
        for (descriptor, spec) in specs {
            let strip = load_texture(source, &spec.source)?;
            match Animation::new(descriptor.clone(), spec, strip, &base) {
                Ok(animation) => animations.push(animation),
                Err(e) => warn!(
                    "{}",
                    LoadError::Malformed {
                        descriptor: descriptor.clone(),
                        source: e,
                    }
                ),
            }
        }

        Self::from_parts(target.clone(), base, animations)
    }

    /// Group from already-built animations.
    pub fn from_parts(
        target: ResourceId,
        base: TextureBuffer,
        animations: Vec<Animation>,
    ) -> Result<Self, LoadError> {
        if animations.is_empty() {
            return Err(LoadError::NoAnimations { target });
        }
        Ok(Self {
            target,
            base,
            animations,
            ticks_since_loop: 0,
        })
    }

    /// Every animation is back at the start of its cycle.
    pub fn is_at_zero(&self) -> bool {
        self.animations.iter().all(|a| a.cursor.is_at_zero())
    }

    /// Decide whether the current tick must be redrawn.
    ///
    /// Also resets the loop counter when the whole group is back at zero.
    pub fn begin_tick(&mut self) -> bool {
        let mut redraw = false;
        if self.is_at_zero() {
            self.ticks_since_loop = 0;
        } else if self.ticks_since_loop == 0 {
            redraw = true;
        }
        redraw || self.animations.iter().any(|a| a.cursor.is_dirty())
    }

    /// Pristine base image plus every animation's current phase.
    pub fn render(&self, dst: &mut TextureBuffer) {
        dst.copy_from(&self.base);
        for animation in &self.animations {
            animation.draw(dst);
        }
    }

    pub fn end_tick(&mut self) {
        for animation in &mut self.animations {
            animation.cursor.advance();
        }
        self.ticks_since_loop += 1;
    }

    /// Ticks before the whole group repeats.
    pub fn cycle_length(&self) -> u64 {
        cycle_length(
            self.animations
                .iter()
                .map(|a| a.cursor.timeline().total_duration()),
        )
    }

    /// Ticks since the group was last entirely at zero.
    pub fn ticks_since_loop(&self) -> u64 {
        self.ticks_since_loop
    }

    pub fn target(&self) -> &ResourceId {
        &self.target
    }

    pub fn base(&self) -> &TextureBuffer {
        &self.base
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::testing::{id, png, strip_png, tile_spec};
    use crate::animation::MemorySource;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const GRAY: [u8; 4] = [50, 50, 50, 255];

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(id("target.png"), png(4, 4, GRAY));
        source.insert(id("strip.png"), strip_png(2, 2, &[RED, BLUE]));
        source
    }

    #[test]
    fn test_build_and_render() {
        let spec = tile_spec("strip.png", "target.png", (2, 2), 2, 1);
        let mut group =
            AnimationGroup::build(&id("target.png"), &[(id("a.properties"), spec)], &source())
                .unwrap();

        let mut dst = TextureBuffer::new(4, 4);
        assert!(group.begin_tick());
        group.render(&mut dst);
        assert_eq!(dst.pixel(0, 0), GRAY);
        assert_eq!(dst.pixel(3, 3), RED);
        group.end_tick();

        assert!(group.begin_tick());
        group.render(&mut dst);
        assert_eq!(dst.pixel(2, 2), BLUE);
        assert_eq!(group.cycle_length(), 2);
        assert_eq!(group.animations()[0].cursor().phase_index(), 1);
    }

    #[test]
    fn test_loop_counter_resets_at_zero() {
        let spec = tile_spec("strip.png", "target.png", (0, 0), 2, 2);
        let mut group =
            AnimationGroup::build(&id("target.png"), &[(id("a.properties"), spec)], &source())
                .unwrap();

        let mut counts = Vec::new();
        for _ in 0..6 {
            group.begin_tick();
            counts.push(group.ticks_since_loop());
            group.end_tick();
        }
        // cycle of 4 ticks: the counter restarts when every cursor is back at zero
        assert_eq!(counts, vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(group.animations()[0].cursor().elapsed(), 2);
    }

    #[test]
    fn test_later_specs_draw_on_top() {
        let under = tile_spec("strip.png", "target.png", (0, 0), 2, 1);
        let mut over = tile_spec("strip.png", "target.png", (0, 0), 2, 1);
        over.frame_mapping.insert(0, 1);
        let group = AnimationGroup::build(
            &id("target.png"),
            &[(id("a.properties"), under), (id("b.properties"), over)],
            &source(),
        )
        .unwrap();

        let mut dst = TextureBuffer::new(4, 4);
        group.render(&mut dst);
        assert_eq!(dst.pixel(0, 0), BLUE);
    }

    #[test]
    fn test_malformed_spec_skipped() {
        let good = tile_spec("strip.png", "target.png", (0, 0), 2, 1);
        let outside = tile_spec("strip.png", "target.png", (3, 3), 2, 1);
        let group = AnimationGroup::build(
            &id("target.png"),
            &[(id("a.properties"), good), (id("b.properties"), outside)],
            &source(),
        )
        .unwrap();
        assert_eq!(group.animations().len(), 1);
        assert_eq!(group.animations()[0].descriptor(), &id("a.properties"));
    }

    #[test]
    fn test_all_malformed_fails() {
        let outside = tile_spec("strip.png", "target.png", (3, 3), 2, 1);
        let specs = [(id("b.properties"), outside)];
        let err = AnimationGroup::build(&id("target.png"), &specs, &source()).unwrap_err();
        assert!(matches!(err, LoadError::NoAnimations { .. }));
    }

    #[test]
    fn test_undecodable_source_fails_group() {
        let mut source = source();
        source.insert(id("broken.png"), b"not an image".to_vec());
        let good = tile_spec("strip.png", "target.png", (0, 0), 2, 1);
        let broken = tile_spec("broken.png", "target.png", (0, 0), 2, 1);
        let err = AnimationGroup::build(
            &id("target.png"),
            &[(id("a.properties"), good), (id("b.properties"), broken)],
            &source,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_missing_target_fails_group() {
        let spec = tile_spec("strip.png", "nowhere.png", (0, 0), 2, 1);
        let specs = [(id("a.properties"), spec)];
        let err = AnimationGroup::build(&id("nowhere.png"), &specs, &source()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
