//! Phase cursor - the per-animation playhead.

use super::{Phase, Timeline};

/// Mutable playhead over one animation's timeline.
///
/// `dirty` reports whether the output may differ from the previous tick:
/// entering a new phase, or sitting in a blend between two distinct tiles.
/// Entering a new phase counts even when it samples the same tile as the
/// one before it, so a blend that ended mid-way is always replaced.
#[derive(Debug, Clone)]
pub struct PhaseCursor {
    timeline: Timeline,
    elapsed: u64,
    current: Option<usize>,
    local_tick: u32,
    dirty: bool,
}

impl PhaseCursor {
    pub fn new(timeline: Timeline) -> Self {
        let mut cursor = Self {
            timeline,
            elapsed: 0,
            current: None,
            local_tick: 0,
            dirty: true,
        };
        cursor.locate();
        cursor
    }

    /// Find the phase containing `elapsed` and refresh the dirty flag.
    fn locate(&mut self) {
        let mut remaining = self.elapsed;

        for (index, phase) in self.timeline.phases().iter().enumerate() {
            let duration = phase.duration() as u64;
            if remaining < duration {
                self.dirty = self.current != Some(index) || phase.is_changing();
                self.current = Some(index);
                self.local_tick = remaining as u32;
                return;
            }
            remaining -= duration;
        }
    }

    /// Move one tick forward, wrapping at the end of the cycle.
    pub fn advance(&mut self) {
        self.elapsed += 1;
        if self.elapsed >= self.timeline.total_duration() {
            self.elapsed = 0;
        }
        self.locate();
    }

    /// Phase under the playhead.
    pub fn phase(&self) -> &Phase {
        // A built timeline always has at least one phase, located on construction.
        &self.timeline.phases()[self.current.unwrap_or(0)]
    }

    pub fn phase_index(&self) -> usize {
        self.current.unwrap_or(0)
    }

    /// Ticks into the current phase.
    pub fn local_tick(&self) -> u32 {
        self.local_tick
    }

    /// Blend weight of the current phase at the current tick.
    pub fn blend(&self) -> f64 {
        self.phase().blend(self.local_tick)
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Back at the start of the cycle.
    pub fn is_at_zero(&self) -> bool {
        self.elapsed == 0
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}
