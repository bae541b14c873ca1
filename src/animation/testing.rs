//! Fixtures shared by the animation tests.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::schema::{AnimationSpec, Region, ResourceId};

pub fn id(s: &str) -> ResourceId {
    ResourceId::parse(s).unwrap()
}

fn encode(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode(&RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// Vertical strip PNG with one solid `tile`x`tile` square per color.
pub fn strip_png(width: u32, tile: u32, colors: &[[u8; 4]]) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, tile * colors.len() as u32, |_, y| {
        Rgba(colors[(y / tile) as usize])
    });
    encode(&img)
}

/// Square-tile spec with uniform frame duration.
pub fn tile_spec(
    source: &str,
    target: &str,
    offset: (u32, u32),
    tile: u32,
    duration: u32,
) -> AnimationSpec {
    let mut spec = AnimationSpec::new(
        id(source),
        id(target),
        offset,
        Region {
            width: tile,
            height: tile,
        },
    );
    spec.default_frame_duration = duration;
    spec
}
