//! Tile compositing onto destination textures.
//!
//! Both operations read from borrowed buffers and write only into `dst`.
//! Rectangles must lie inside their buffers; callers check this when the
//! animation is built.

use super::TextureBuffer;

/// Copy the `size` rectangle at `src_origin` in `src` to `dst_origin` in `dst`.
pub fn copy(
    src: &TextureBuffer,
    src_origin: (u32, u32),
    size: (u32, u32),
    dst: &mut TextureBuffer,
    dst_origin: (u32, u32),
) {
    let (u, v) = src_origin;
    let (du, dv) = dst_origin;
    let row_bytes = size.0 as usize * 4;

    for ry in 0..size.1 {
        let s = ((v + ry) as usize * src.width as usize + u as usize) * 4;
        let d = ((dv + ry) as usize * dst.width as usize + du as usize) * 4;
        dst.data[d..d + row_bytes].copy_from_slice(&src.data[s..s + row_bytes]);
    }
}

/// Cross-blend two `size` rectangles of `src` into `dst`.
///
/// `weight` 0 yields the sample at `origin_a`, 1 the sample at `origin_b`.
pub fn blend_copy(
    src: &TextureBuffer,
    origin_a: (u32, u32),
    origin_b: (u32, u32),
    size: (u32, u32),
    dst: &mut TextureBuffer,
    dst_origin: (u32, u32),
    weight: f64,
) {
    for ry in 0..size.1 {
        for rx in 0..size.0 {
            let a = src.pixel(origin_a.0 + rx, origin_a.1 + ry);
            let b = src.pixel(origin_b.0 + rx, origin_b.1 + ry);
            dst.set_pixel(dst_origin.0 + rx, dst_origin.1 + ry, blend_rgba(a, b, weight));
        }
    }
}

/// Linearly interpolate two RGBA samples.
///
/// A fully transparent sample takes the other sample's color so fading
/// in or out of transparency doesn't darken the edges.
#[inline]
pub fn blend_rgba(mut a: [u8; 4], mut b: [u8; 4], weight: f64) -> [u8; 4] {
    if a[3] == 0 {
        a[..3].copy_from_slice(&b[..3]);
    } else if b[3] == 0 {
        b[..3].copy_from_slice(&a[..3]);
    }

    std::array::from_fn(|c| lerp_channel(a[c], b[c], weight))
}

#[inline]
fn lerp_channel(a: u8, b: u8, weight: f64) -> u8 {
    let a = a as f64;
    (a + (b as f64 - a) * weight).clamp(0.0, 255.0) as u8
}
