//! Decoding of properties-style animation descriptor files.
//!
//! # Format
//!
//! ```text
//! from=./lava_strip.png
//! to=minecraft:textures/block/lava.png
//! x=0
//! y=0
//! w=16
//! h=16
//! duration=2
//! interpolate=true
//! skip=1
//! tile.0=3
//! duration.0=10
//! ```

use std::collections::{BTreeMap, HashMap};

use configparser::ini::Ini;

use super::{AnimationSpec, Region, ResourceId};

/// Keys of a descriptor file.
pub mod keys {
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const WIDTH: &str = "w";
    pub const HEIGHT: &str = "h";
    pub const DURATION: &str = "duration";
    pub const INTERPOLATE: &str = "interpolate";
    pub const SKIP: &str = "skip";
    pub const TILE: &str = "tile";
}

/// Section holding keys that appear before any `[section]` header.
const ROOT_SECTION: &str = "default";

/// Descriptor decoding errors.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Descriptor {file} is missing required property '{key}'")]
    Missing { file: ResourceId, key: &'static str },
    #[error("Descriptor {file} has invalid property '{key}', expected {expected}")]
    Invalid {
        file: ResourceId,
        key: &'static str,
        expected: &'static str,
    },
    #[error("Descriptor {file} could not be parsed: {message}")]
    Syntax { file: ResourceId, message: String },
}

/// Decode the properties text of descriptor `file` into an [`AnimationSpec`].
pub fn parse_descriptor(file: &ResourceId, text: &str) -> Result<AnimationSpec, DescriptorError> {
    let mut ini = Ini::new_cs();
    let sections = ini.read(text.to_owned()).map_err(|message| DescriptorError::Syntax {
        file: file.clone(),
        message,
    })?;
    let props = Properties {
        file,
        values: sections.get(ROOT_SECTION),
    };

    let source = props.resource(keys::FROM)?;
    let target = props.resource(keys::TO)?;
    let target_offset = (props.uint(keys::X)?, props.uint(keys::Y)?);
    let region = Region {
        width: props.positive(keys::WIDTH)?,
        height: props.positive(keys::HEIGHT)?,
    };

    let default_frame_duration = match props.get(keys::DURATION) {
        Some(_) => props.positive(keys::DURATION)?,
        None => 1,
    };
    let interpolate = props.bool_or(keys::INTERPOLATE, false)?;
    let interpolation_delay = match props.get(keys::SKIP) {
        Some(_) => props.uint(keys::SKIP)?,
        None => 0,
    };

    let frame_mapping = props.int_map(keys::TILE);
    let frame_durations = props.int_map(keys::DURATION);
    if frame_durations.values().any(|&d| d == 0) {
        return Err(DescriptorError::Invalid {
            file: file.clone(),
            key: keys::DURATION,
            expected: "positive frame durations",
        });
    }

    Ok(AnimationSpec {
        source,
        target,
        target_offset,
        region,
        default_frame_duration,
        interpolate,
        interpolation_delay,
        frame_mapping,
        frame_durations,
    })
}

/// Typed accessors over the root section of one descriptor.
struct Properties<'a> {
    file: &'a ResourceId,
    values: Option<&'a HashMap<String, Option<String>>>,
}

impl<'a> Properties<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.values?.get(key)?.as_deref().map(str::trim)
    }

    fn require(&self, key: &'static str) -> Result<&'a str, DescriptorError> {
        self.get(key).ok_or_else(|| DescriptorError::Missing {
            file: self.file.clone(),
            key,
        })
    }

    fn invalid(&self, key: &'static str, expected: &'static str) -> DescriptorError {
        DescriptorError::Invalid {
            file: self.file.clone(),
            key,
            expected,
        }
    }

    fn resource(&self, key: &'static str) -> Result<ResourceId, DescriptorError> {
        let reference = ResourceId::parse(self.require(key)?)
            .map_err(|_| self.invalid(key, "resource location"))?;
        Ok(ResourceId::resolve_relative(self.file, reference))
    }

    fn uint(&self, key: &'static str) -> Result<u32, DescriptorError> {
        self.require(key)?
            .parse()
            .map_err(|_| self.invalid(key, "non-negative integer (whole number)"))
    }

    fn positive(&self, key: &'static str) -> Result<u32, DescriptorError> {
        match self.uint(key) {
            Ok(0) | Err(DescriptorError::Invalid { .. }) => {
                Err(self.invalid(key, "positive integer (whole number)"))
            }
            other => other,
        }
    }

    fn bool_or(&self, key: &'static str, default: bool) -> Result<bool, DescriptorError> {
        match self.get(key) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(_) => Err(self.invalid(key, "boolean (false/true)")),
        }
    }

    /// Collect `prefix.<n>=<m>` entries; malformed entries are skipped.
    fn int_map(&self, prefix: &str) -> BTreeMap<u32, u32> {
        let Some(values) = self.values else {
            return BTreeMap::new();
        };
        values
            .iter()
            .filter_map(|(key, value)| {
                let index = key.strip_prefix(prefix)?.strip_prefix('.')?;
                let index: u32 = index.trim().parse().ok()?;
                let value: u32 = value.as_deref()?.trim().parse().ok()?;
                Some((index, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> ResourceId {
        ResourceId::parse("pack:optifine/anim/lava/lava.properties").unwrap()
    }

    const MINIMAL: &str = "from=./strip.png\nto=textures/block/lava.png\nx=0\ny=16\nw=16\nh=8\n";

    #[test]
    fn test_minimal_defaults() {
        let spec = parse_descriptor(&file(), MINIMAL).unwrap();
        assert_eq!(spec.source.to_string(), "pack:optifine/anim/lava/strip.png");
        assert_eq!(spec.target.to_string(), "minecraft:textures/block/lava.png");
        assert_eq!(spec.target_offset, (0, 16));
        assert_eq!(spec.region, Region { width: 16, height: 8 });
        assert_eq!(spec.default_frame_duration, 1);
        assert!(!spec.interpolate);
        assert_eq!(spec.interpolation_delay, 0);
        assert!(spec.frame_mapping.is_empty());
        assert!(spec.frame_durations.is_empty());
    }

    #[test]
    fn test_full_descriptor() {
        let text = format!(
            "# lava flow\n{}duration=4\ninterpolate=true\nskip=1\n{}",
            MINIMAL, "tile.0=2\ntile.1=0\ntile.x=5\nduration.1=7\n"
        );
        let spec = parse_descriptor(&file(), &text).unwrap();
        assert_eq!(spec.default_frame_duration, 4);
        assert!(spec.interpolate);
        assert_eq!(spec.interpolation_delay, 1);
        assert_eq!(spec.frame_mapping, BTreeMap::from([(0, 2), (1, 0)]));
        assert_eq!(spec.frame_durations, BTreeMap::from([(1, 7)]));
    }

    #[test]
    fn test_missing_required() {
        let err = parse_descriptor(&file(), "from=a.png\nx=0\ny=0\nw=1\nh=1\n").unwrap_err();
        assert!(matches!(err, DescriptorError::Missing { key: "to", .. }));
    }

    #[test]
    fn test_invalid_values() {
        let bad_int = MINIMAL.replace("x=0", "x=left");
        assert!(matches!(
            parse_descriptor(&file(), &bad_int),
            Err(DescriptorError::Invalid { key: "x", .. })
        ));

        let zero_height = MINIMAL.replace("h=8", "h=0");
        assert!(matches!(
            parse_descriptor(&file(), &zero_height),
            Err(DescriptorError::Invalid { key: "h", .. })
        ));

        let bad_bool = format!("{}interpolate=yes\n", MINIMAL);
        assert!(matches!(
            parse_descriptor(&file(), &bad_bool),
            Err(DescriptorError::Invalid { key: "interpolate", .. })
        ));

        let zero_override = format!("{}duration.3=0\n", MINIMAL);
        assert!(matches!(
            parse_descriptor(&file(), &zero_override),
            Err(DescriptorError::Invalid { key: "duration", .. })
        ));
    }
}
