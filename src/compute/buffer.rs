//! Flat RGBA8 pixel buffers.

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

/// Texture pixel storage.
///
/// Row-major RGBA8, indexed `(y * width + x) * 4 + channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Wrap existing RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an encoded image (PNG) into RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            data: rgba.into_raw(),
        })
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Overwrite this buffer with `other` (same dimensions).
    pub fn copy_from(&mut self, other: &TextureBuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.data.copy_from_slice(&other.data);
    }

    /// Whether the `w`x`h` rectangle at `(x, y)` lies inside the buffer.
    pub fn contains_rect(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        x as u64 + w as u64 <= self.width as u64 && y as u64 + h as u64 <= self.height as u64
    }

    /// Size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Buffer construction errors.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("{width}x{height} RGBA buffer needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
