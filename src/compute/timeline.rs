//! Timeline construction - turns an animation spec into timed phases.
//!
//! Each logical frame becomes one phase, or two when interpolation has a
//! hold delay: a static hold of `interpolation_delay` ticks followed by a
//! blend toward the next frame. The last frame blends toward the first.

use crate::schema::AnimationSpec;

/// One timed segment of an animation.
///
/// Offsets are the top row of a tile within the source strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Shows one tile for the whole phase.
    Static { duration: u32, v: u32 },
    /// Blends from one tile to another over the phase.
    Interpolated { duration: u32, from_v: u32, to_v: u32 },
}

impl Phase {
    #[inline]
    pub fn duration(&self) -> u32 {
        match *self {
            Phase::Static { duration, .. } | Phase::Interpolated { duration, .. } => duration,
        }
    }

    /// Blend weight at `local_tick` ticks into the phase.
    ///
    /// 0 at the start of an interpolated phase, strictly below 1 at its last tick.
    /// Computed in `f64` so the weight stays below 1 for every `u32` duration.
    #[inline]
    pub fn blend(&self, local_tick: u32) -> f64 {
        match *self {
            Phase::Static { .. } => 0.0,
            Phase::Interpolated { duration, .. } => local_tick as f64 / duration as f64,
        }
    }

    /// Whether rendering this phase alters pixels from tick to tick.
    #[inline]
    pub fn is_changing(&self) -> bool {
        match *self {
            Phase::Static { .. } => false,
            Phase::Interpolated { from_v, to_v, .. } => from_v != to_v,
        }
    }
}

/// The complete cyclic phase sequence of one animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    phases: Vec<Phase>,
    total_duration: u64,
    frame_count: usize,
}

impl Timeline {
    /// Build the timeline for `spec` over a source strip of the given size.
    pub fn build(
        spec: &AnimationSpec,
        source_width: u32,
        source_height: u32,
    ) -> Result<Self, TimelineError> {
        let tile_height = spec.region.height;
        if tile_height == 0 || spec.region.width == 0 {
            return Err(TimelineError::EmptyRegion);
        }
        if spec.region.width > source_width {
            return Err(TimelineError::RegionWiderThanSource {
                region_width: spec.region.width,
                source_width,
            });
        }

        let texture_frames = source_height / tile_height;
        if texture_frames == 0 {
            return Err(TimelineError::SourceTooShort {
                source_height,
                tile_height,
            });
        }

        // (frame, tile v, duration); frames past the strip need an explicit remap
        let remapped = spec.frame_mapping.range(texture_frames..).map(|(&f, _)| f);
        let frames: Vec<(u32, u32, u32)> = (0..texture_frames)
            .chain(remapped)
            .map(|f| {
                let v = tile_offset(spec.tile_for(f), tile_height, texture_frames);
                (f, v, spec.duration_for(f))
            })
            .collect();

        let delay = if spec.interpolate {
            spec.interpolation_delay
        } else {
            0
        };
        let capacity = if delay > 0 { frames.len() * 2 } else { frames.len() };
        let mut phases = Vec::with_capacity(capacity);
        let mut total_duration = 0u64;

        for (i, &(frame, v, duration)) in frames.iter().enumerate() {
            if duration == 0 {
                return Err(TimelineError::ZeroDuration { frame });
            }

            if !spec.interpolate {
                phases.push(Phase::Static { duration, v });
                total_duration += duration as u64;
                continue;
            }

            if duration <= delay {
                return Err(TimelineError::NoBlendTime {
                    frame,
                    duration,
                    delay,
                });
            }
            let next_v = frames[(i + 1) % frames.len()].1;

            if delay > 0 {
                phases.push(Phase::Static { duration: delay, v });
            }
            phases.push(Phase::Interpolated {
                duration: duration - delay,
                from_v: v,
                to_v: next_v,
            });
            total_duration += duration as u64;
        }

        Ok(Self {
            phases,
            total_duration,
            frame_count: frames.len(),
        })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Cycle length in ticks.
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    /// Number of logical frames that produced phases.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

/// Top row of `tile`, clamped to the last physical tile of the strip.
#[inline]
fn tile_offset(tile: u32, tile_height: u32, texture_frames: u32) -> u32 {
    let last = (texture_frames - 1) as u64 * tile_height as u64;
    (tile as u64 * tile_height as u64).min(last) as u32
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b > 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple of several cycle lengths (saturating).
///
/// This is the number of ticks before every animation in a group is back
/// at its start at the same time.
pub fn cycle_length(durations: impl IntoIterator<Item = u64>) -> u64 {
    durations
        .into_iter()
        .filter(|&d| d > 0)
        .fold(1, |acc, d| (acc / gcd(acc, d)).saturating_mul(d))
}

/// Malformed animation specs, detected while building the timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("Animation region must have non-zero width and height")]
    EmptyRegion,
    #[error(
        "Animation region is {region_width}px wide but the source is only {source_width}px"
    )]
    RegionWiderThanSource { region_width: u32, source_width: u32 },
    #[error("Source strip is {source_height}px tall, shorter than one {tile_height}px tile")]
    SourceTooShort { source_height: u32, tile_height: u32 },
    #[error("Frame {frame} has zero duration")]
    ZeroDuration { frame: u32 },
    #[error(
        "Frame {frame} lasts {duration} ticks, leaving no blend time after a {delay} tick delay"
    )]
    NoBlendTime { frame: u32, duration: u32, delay: u32 },
    #[error(
        "{width}x{height} region at ({x}, {y}) overflows the {target_width}x{target_height} target"
    )]
    RegionOutsideTarget {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Region, ResourceId};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn spec(tile: u32, duration: u32) -> AnimationSpec {
        let mut spec = AnimationSpec::new(
            ResourceId::parse("strip.png").unwrap(),
            ResourceId::parse("target.png").unwrap(),
            (0, 0),
            Region {
                width: tile,
                height: tile,
            },
        );
        spec.default_frame_duration = duration;
        spec
    }

    fn included_frames(spec: &AnimationSpec, source_height: u32) -> Vec<u32> {
        let texture_frames = source_height / spec.region.height;
        let logical = texture_frames.max(spec.greatest_mapped_frame().map_or(0, |m| m + 1));
        (0..logical)
            .filter(|f| *f < texture_frames || spec.frame_mapping.contains_key(f))
            .collect()
    }

    #[test]
    fn test_static_strip() {
        let timeline = Timeline::build(&spec(16, 4), 16, 48).unwrap();
        assert_eq!(
            timeline.phases(),
            &[
                Phase::Static { duration: 4, v: 0 },
                Phase::Static { duration: 4, v: 16 },
                Phase::Static { duration: 4, v: 32 },
            ]
        );
        assert_eq!(timeline.total_duration(), 12);
        assert_eq!(timeline.frame_count(), 3);
    }

    #[test]
    fn test_partial_tile_ignored() {
        // 40px strip holds two whole 16px tiles
        let timeline = Timeline::build(&spec(16, 1), 16, 40).unwrap();
        assert_eq!(timeline.frame_count(), 2);
    }

    #[test]
    fn test_mapping_extends_and_clamps() {
        let mut s = spec(16, 2);
        s.frame_mapping = BTreeMap::from([(0, 2), (4, 9)]);
        s.frame_durations = BTreeMap::from([(4, 5)]);
        let timeline = Timeline::build(&s, 16, 48).unwrap();

        // frames 0..=2 from the strip, 3 skipped (no remap), 4 remapped and clamped
        assert_eq!(
            timeline.phases(),
            &[
                Phase::Static { duration: 2, v: 32 },
                Phase::Static { duration: 2, v: 16 },
                Phase::Static { duration: 2, v: 32 },
                Phase::Static { duration: 5, v: 32 },
            ]
        );
        assert_eq!(timeline.total_duration(), 11);
    }

    #[test]
    fn test_interpolated_with_delay() {
        let mut s = spec(8, 5);
        s.interpolate = true;
        s.interpolation_delay = 2;
        let timeline = Timeline::build(&s, 8, 16).unwrap();
        assert_eq!(
            timeline.phases(),
            &[
                Phase::Static { duration: 2, v: 0 },
                Phase::Interpolated { duration: 3, from_v: 0, to_v: 8 },
                Phase::Static { duration: 2, v: 8 },
                Phase::Interpolated { duration: 3, from_v: 8, to_v: 0 },
            ]
        );
        assert_eq!(timeline.total_duration(), 10);
    }

    #[test]
    fn test_single_frame_interpolation_is_noop() {
        let mut s = spec(8, 3);
        s.interpolate = true;
        let timeline = Timeline::build(&s, 8, 8).unwrap();
        let phase = timeline.phases()[0];
        assert_eq!(phase, Phase::Interpolated { duration: 3, from_v: 0, to_v: 0 });
        assert!(!phase.is_changing());
    }

    #[test]
    fn test_sparse_mapping_far_past_strip() {
        let mut s = spec(16, 1);
        s.frame_mapping.insert(u32::MAX, 0);
        s.frame_durations.insert(u32::MAX, 3);
        let timeline = Timeline::build(&s, 16, 16).unwrap();
        assert_eq!(timeline.frame_count(), 2);
        assert_eq!(
            timeline.phases(),
            &[
                Phase::Static { duration: 1, v: 0 },
                Phase::Static { duration: 3, v: 0 },
            ]
        );
    }

    #[test]
    fn test_blend_below_one_for_long_phases() {
        let phase = Phase::Interpolated {
            duration: u32::MAX,
            from_v: 0,
            to_v: 16,
        };
        let last = phase.blend(u32::MAX - 1);
        assert!(last < 1.0);
        assert!(phase.blend(u32::MAX - 2) < last);
        assert!(phase.blend(1 << 25) > phase.blend((1 << 25) - 1));
    }

    #[test]
    fn test_malformed_specs() {
        let mut s = spec(16, 1);
        s.region.height = 0;
        assert_eq!(Timeline::build(&s, 16, 16), Err(TimelineError::EmptyRegion));

        assert!(matches!(
            Timeline::build(&spec(16, 1), 16, 8),
            Err(TimelineError::SourceTooShort { .. })
        ));
        assert!(matches!(
            Timeline::build(&spec(16, 1), 8, 32),
            Err(TimelineError::RegionWiderThanSource { .. })
        ));

        let mut s = spec(16, 1);
        s.frame_durations.insert(1, 0);
        assert_eq!(
            Timeline::build(&s, 16, 32),
            Err(TimelineError::ZeroDuration { frame: 1 })
        );

        let mut s = spec(16, 3);
        s.interpolate = true;
        s.interpolation_delay = 3;
        assert!(matches!(
            Timeline::build(&s, 16, 32),
            Err(TimelineError::NoBlendTime { frame: 0, .. })
        ));
    }

    #[test]
    fn test_delay_ignored_without_interpolation() {
        let mut s = spec(16, 2);
        s.interpolation_delay = 5;
        let timeline = Timeline::build(&s, 16, 32).unwrap();
        assert_eq!(timeline.phases().len(), 2);
        assert_eq!(timeline.total_duration(), 4);
    }

    #[test]
    fn test_cycle_length() {
        assert_eq!(cycle_length([2, 3]), 6);
        assert_eq!(cycle_length([4, 6, 10]), 60);
        assert_eq!(cycle_length([7]), 7);
        assert_eq!(cycle_length(std::iter::empty()), 1);
        assert_eq!(cycle_length([u64::MAX, u64::MAX - 1]), u64::MAX);
    }

    fn arb_spec() -> impl Strategy<Value = (AnimationSpec, u32)> {
        (
            1u32..6,
            1u32..6,
            0u32..4,
            1u32..8,
            prop::collection::btree_map(0u32..10, 0u32..10, 0..4),
            prop::collection::btree_map(0u32..10, 1u32..8, 0..4),
            any::<bool>(),
            0u32..3,
        )
            .prop_map(
                |(tile, strip_frames, slack, duration, mapping, overrides, interpolate, delay)| {
                    let mut s = spec(tile, duration + delay);
                    s.frame_mapping = mapping;
                    // keep every frame longer than the delay
                    s.frame_durations =
                        overrides.into_iter().map(|(k, d)| (k, d + delay)).collect();
                    s.interpolate = interpolate;
                    s.interpolation_delay = delay;
                    (s, strip_frames * tile + slack % tile)
                },
            )
    }

    proptest! {
        #[test]
        fn prop_durations_sum_to_total((s, height) in arb_spec()) {
            let timeline = Timeline::build(&s, s.region.width, height).unwrap();
            let frames = included_frames(&s, height);

            let phase_sum: u64 = timeline.phases().iter().map(|p| p.duration() as u64).sum();
            let frame_sum: u64 = frames.iter().map(|&f| s.duration_for(f) as u64).sum();
            prop_assert_eq!(phase_sum, timeline.total_duration());
            prop_assert_eq!(phase_sum, frame_sum);
            prop_assert!(timeline.phases().iter().all(|p| p.duration() > 0));
        }

        #[test]
        fn prop_phase_count((s, height) in arb_spec()) {
            let timeline = Timeline::build(&s, s.region.width, height).unwrap();
            let frames = included_frames(&s, height).len();
            prop_assert_eq!(timeline.frame_count(), frames);

            if s.interpolate && s.interpolation_delay > 0 {
                prop_assert_eq!(timeline.phases().len(), frames * 2);
                for pair in timeline.phases().chunks(2) {
                    let is_hold = matches!(
                        pair[0],
                        Phase::Static { duration, .. } if duration == s.interpolation_delay
                    );
                    prop_assert!(is_hold);
                    prop_assert!(
                        matches!(pair[1], Phase::Interpolated { .. }),
                        "expected blend after hold"
                    );
                }
            } else {
                prop_assert_eq!(timeline.phases().len(), frames);
            }
        }

        #[test]
        fn prop_offsets_within_strip((s, height) in arb_spec()) {
            let timeline = Timeline::build(&s, s.region.width, height).unwrap();
            let last = (height / s.region.height - 1) * s.region.height;
            for phase in timeline.phases() {
                match *phase {
                    Phase::Static { v, .. } => {
                        prop_assert!(v <= last);
                    }
                    Phase::Interpolated { from_v, to_v, .. } => {
                        prop_assert!(from_v <= last && to_v <= last);
                    }
                }
            }
        }

        #[test]
        fn prop_blend_weight_monotonic(duration in 1u32..200) {
            let phase = Phase::Interpolated { duration, from_v: 0, to_v: 16 };
            prop_assert_eq!(phase.blend(0), 0.0);
            for t in 1..duration {
                prop_assert!(phase.blend(t) > phase.blend(t - 1));
                prop_assert!(phase.blend(t) < 1.0);
            }
        }
    }
}
