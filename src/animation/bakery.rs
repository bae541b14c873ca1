//! Bake driver - precomputes a group's whole cycle into discrete frames.

use log::debug;

use super::player::{BakedAnimation, BakedFrame};
use super::AnimationGroup;
use crate::compute::TextureBuffer;

/// Configuration for baking.
#[derive(Debug, Clone, Default)]
pub struct BakeConfig {
    /// Maximum sequence length (`None` = bake the full cycle).
    pub max_frames: Option<usize>,
}

/// Runs a group tick by tick until its cycle closes.
///
/// Only ticks that need a redraw allocate a new buffer; every other tick
/// repeats the previous frame.
///
/// Usage:
/// ```ignore
/// let baked = Bakery::new(group, BakeConfig { max_frames: Some(512) }).bake();
/// let frame = baked.frame_at(global_tick);
/// ```
pub struct Bakery {
    group: AnimationGroup,
    config: BakeConfig,
    frames: Vec<BakedFrame>,
    sequence: Vec<usize>,
}

impl Bakery {
    pub fn new(group: AnimationGroup, config: BakeConfig) -> Self {
        Self {
            group,
            config,
            frames: Vec::new(),
            sequence: Vec::new(),
        }
    }

    /// Bake one tick.
    fn step(&mut self) {
        let last = self.sequence.last().copied();
        let redraw = self.group.begin_tick() || last.is_none();

        match last {
            Some(index) if !redraw => self.sequence.push(index),
            _ => {
                let base = self.group.base();
                let mut image = TextureBuffer::new(base.width, base.height);
                self.group.render(&mut image);
                let id = self
                    .group
                    .target()
                    .with_suffix(&format!(".anim{}", self.sequence.len()));
                self.frames.push(BakedFrame { id, image });
                self.sequence.push(self.frames.len() - 1);
            }
        }

        self.group.end_tick();
    }

    fn at_ceiling(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|max| self.sequence.len() >= max)
    }

    /// Bake until every animation is back at zero or the ceiling is reached.
    ///
    /// Hitting the ceiling truncates the cycle; playback then loops early.
    pub fn bake(mut self) -> BakedAnimation {
        loop {
            self.step();
            if self.group.is_at_zero() || self.at_ceiling() {
                break;
            }
        }

        let stats = BakeStats {
            sequence_len: self.sequence.len(),
            distinct_frames: self.frames.len(),
            cycle_length: self.group.cycle_length(),
            total_bytes: self.frames.iter().map(|f| f.image.byte_len()).sum(),
        };
        debug!("Baked {}: {}", self.group.target(), stats);

        BakedAnimation::new(self.group.target().clone(), self.frames, self.sequence)
    }
}

/// Statistics from one bake.
#[derive(Debug, Clone)]
pub struct BakeStats {
    /// Entries in the baked sequence.
    pub sequence_len: usize,
    /// Distinct buffers allocated.
    pub distinct_frames: usize,
    /// Full group cycle, which the sequence may truncate.
    pub cycle_length: u64,
    /// Bytes held by the distinct buffers.
    pub total_bytes: usize,
}

impl std::fmt::Display for BakeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ticks ({} full cycle), {} distinct frames, {} bytes",
            self.sequence_len, self.cycle_length, self.distinct_frames, self.total_bytes
        )
    }
}
