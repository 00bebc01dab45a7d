use std::fmt;

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
}

impl WrapMode {
    pub(crate) fn address_mode(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// Error returned when pixel data does not match the declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDataError {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel of the input: 3 for RGB, 4 for RGBA.
    pub channels: u8,
    /// Length of the buffer that was passed in.
    pub len: usize,
}

impl fmt::Display for TextureDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "texture {}x{} needs {} {} bytes, got {}",
            self.width,
            self.height,
            self.width as usize * self.height as usize * self.channels as usize,
            if self.channels == 3 { "RGB" } else { "RGBA" },
            self.len
        )
    }
}

impl std::error::Error for TextureDataError {}

/// Tightly packed RGBA8 image, sRGB-encoded colour, linear alpha.
#[derive(Clone, PartialEq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    wrap: WrapMode,
}

impl TextureData {
    /// Wraps RGBA8 pixels. Fails if the buffer length or dimensions are wrong.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        wrap: WrapMode,
    ) -> Result<Self, TextureDataError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(TextureDataError { width, height, channels: 4, len: pixels.len() });
        }
        Ok(Self { width, height, pixels, wrap })
    }

    /// Expands RGB8 pixels to opaque RGBA8.
    pub fn from_rgb8(
        width: u32,
        height: u32,
        rgb: &[u8],
        wrap: WrapMode,
    ) -> Result<Self, TextureDataError> {
        if width == 0 || height == 0 || rgb.len() != width as usize * height as usize * 3 {
            return Err(TextureDataError { width, height, channels: 3, len: rgb.len() });
        }
        let pixels = rgb
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect();
        Self::from_rgba8(width, height, pixels, wrap)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    /// Returns the RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }
}

// Pixel buffers are large; keep Debug output to the header.
impl fmt::Debug for TextureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("wrap", &self.wrap)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_expanded_to_opaque_rgba() {
        let tex = TextureData::from_rgb8(2, 1, &[1, 2, 3, 4, 5, 6], WrapMode::Repeat).unwrap();
        assert_eq!(tex.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(tex.pixel(1, 0), Some([4, 5, 6, 255]));
        assert_eq!(tex.pixel(2, 0), None);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = TextureData::from_rgba8(2, 2, vec![0; 15], WrapMode::Repeat).unwrap_err();
        assert_eq!(err.len, 15);
        assert!(err.to_string().contains("needs 16"));
    }

    #[test]
    fn wrong_rgb_length_reports_rgb_bytes() {
        let err = TextureData::from_rgb8(2, 1, &[0; 7], WrapMode::Repeat).unwrap_err();
        assert_eq!((err.channels, err.len), (3, 7));
        assert_eq!(err.to_string(), "texture 2x1 needs 6 RGB bytes, got 7");
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(TextureData::from_rgba8(0, 4, Vec::new(), WrapMode::ClampToEdge).is_err());
    }
}
