//! Globe texture discovery and decoding.
//!
//! Candidates are tried in a fixed order from the asset directory; the first
//! one that decodes wins. Every failure is logged and skipped, and when
//! nothing loads a procedural fallback is used, so loading never fails.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageDecoder, ImageReader};

use globus_engine::texture::{TextureData, WrapMode};

use crate::procedural;

/// File names searched for a globe texture, in priority order.
pub const CANDIDATES: [&str; 6] = [
    "earth.jpg",
    "world.jpg",
    "world.bmp",
    "earth.bmp",
    "map.bmp",
    "texture.bmp",
];

/// Procedural texture used when no candidate file loads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Fallback {
    #[default]
    Checkerboard,
    WorldMap,
}

impl Fallback {
    pub fn texture(self) -> TextureData {
        match self {
            Fallback::Checkerboard => procedural::checkerboard(),
            Fallback::WorldMap => procedural::world_map(),
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Checkerboard => f.write_str("checkerboard"),
            Fallback::WorldMap => f.write_str("procedural world map"),
        }
    }
}

/// Why a single candidate could not be used.
#[derive(Debug)]
pub enum TextureError {
    NotFound(PathBuf),
    Io { path: PathBuf, source: io::Error },
    Decode { path: PathBuf, source: image::ImageError },
    Empty(PathBuf),
    TooLarge { path: PathBuf, width: u32, height: u32, max: u32 },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::NotFound(path) => write!(f, "{}: not found", path.display()),
            TextureError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            TextureError::Decode { path, source } => {
                write!(f, "{}: cannot decode: {source}", path.display())
            }
            TextureError::Empty(path) => write!(f, "{}: image has zero size", path.display()),
            TextureError::TooLarge { path, width, height, max } => write!(
                f,
                "{}: {width}x{height} exceeds the {max}px texture limit",
                path.display()
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            TextureError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Where the active globe texture came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    File(PathBuf),
    Fallback(Fallback),
}

impl fmt::Display for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureSource::File(path) => write!(f, "{}", path.display()),
            TextureSource::Fallback(fb) => write!(f, "{fb} (fallback)"),
        }
    }
}

#[derive(Debug)]
pub struct LoadedTexture {
    pub data: TextureData,
    pub source: TextureSource,
}

/// Decodes one image file into repeat-wrapped RGBA8, honouring EXIF
/// orientation.
///
/// Images with a side longer than `max_dimension` are rejected before the
/// pixel data is decoded.
pub fn load_image(path: &Path, max_dimension: u32) -> Result<TextureData, TextureError> {
    let io_err = |source: io::Error| {
        if source.kind() == io::ErrorKind::NotFound {
            TextureError::NotFound(path.to_path_buf())
        } else {
            TextureError::Io { path: path.to_path_buf(), source }
        }
    };
    let decode_err = |source| TextureError::Decode { path: path.to_path_buf(), source };

    let reader = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?;

    let mut decoder = reader.into_decoder().map_err(decode_err)?;

    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(path.to_path_buf()));
    }
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max: max_dimension,
        });
    }

    let orientation = decoder.orientation().map_err(decode_err)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    image.apply_orientation(orientation);

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    TextureData::from_rgba8(width, height, rgba.into_raw(), WrapMode::Repeat)
        .map_err(|_| TextureError::Empty(path.to_path_buf()))
}

/// Tries every candidate in `dir`, falling back to `fallback`.
pub fn load_globe_texture(dir: &Path, fallback: Fallback, max_dimension: u32) -> LoadedTexture {
    for name in CANDIDATES {
        let path = dir.join(name);
        if !path.exists() {
            log::debug!("texture candidate {} not present", path.display());
            continue;
        }

        match load_image(&path, max_dimension) {
            Ok(data) => {
                log::info!(
                    "using {} as globe texture ({}x{})",
                    path.display(),
                    data.width(),
                    data.height()
                );
                return LoadedTexture { data, source: TextureSource::File(path) };
            }
            Err(err) => log::warn!("skipping texture candidate: {err}"),
        }
    }

    log::info!(
        "no texture found in {}, using {fallback}",
        dir.display()
    );
    LoadedTexture {
        data: fallback.texture(),
        source: TextureSource::Fallback(fallback),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const MAX: u32 = 8192;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("globus-loader-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_bmp(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
        image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
            .save(path)
            .unwrap();
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
            .encode_image(&img)
            .unwrap();
        out
    }

    /// Inserts an APP1 EXIF segment carrying only an orientation tag.
    fn with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut exif = Vec::new();
        exif.extend_from_slice(b"Exif\0\0");
        // Big-endian TIFF header, first IFD at offset 8.
        exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
        exif.extend_from_slice(&1u16.to_be_bytes());
        // Tag 0x0112 (orientation), type SHORT, count 1.
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&orientation.to_be_bytes());
        exif.extend_from_slice(&[0, 0]);
        // No next IFD.
        exif.extend_from_slice(&[0, 0, 0, 0]);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((exif.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&exif);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn empty_dir_falls_back() {
        let dir = temp_dir("empty");

        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::Fallback(Fallback::Checkerboard));
        assert_eq!(loaded.data, procedural::checkerboard());

        let loaded = load_globe_texture(&dir, Fallback::WorldMap, MAX);
        assert_eq!(loaded.data.width(), procedural::WORLD_WIDTH);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn decodes_bmp_candidate() {
        let dir = temp_dir("bmp");
        write_bmp(&dir.join("map.bmp"), 4, 2, [10, 20, 30]);

        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::File(dir.join("map.bmp")));
        assert_eq!((loaded.data.width(), loaded.data.height()), (4, 2));
        assert_eq!(loaded.data.pixel(3, 1), Some([10, 20, 30, 255]));
        assert_eq!(loaded.data.wrap(), WrapMode::Repeat);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn earlier_candidates_win() {
        let dir = temp_dir("order");
        write_bmp(&dir.join("texture.bmp"), 2, 2, [1, 1, 1]);
        write_bmp(&dir.join("world.bmp"), 2, 2, [2, 2, 2]);

        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::File(dir.join("world.bmp")));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn jpeg_candidates_beat_bmp() {
        let dir = temp_dir("jpeg");
        write_bmp(&dir.join("world.bmp"), 2, 2, [1, 1, 1]);
        fs::write(dir.join("world.jpg"), jpeg_bytes(8, 4)).unwrap();

        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::File(dir.join("world.jpg")));

        fs::write(dir.join("earth.jpg"), jpeg_bytes(6, 3)).unwrap();
        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::File(dir.join("earth.jpg")));
        assert_eq!((loaded.data.width(), loaded.data.height()), (6, 3));
        assert_eq!(loaded.data.pixel(0, 0).map(|p| p[3]), Some(255));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn exif_rotation_swaps_dimensions() {
        let dir = temp_dir("exif");
        let path = dir.join("earth.jpg");

        fs::write(&path, with_orientation(&jpeg_bytes(8, 4), 1)).unwrap();
        let upright = load_image(&path, MAX).unwrap();
        assert_eq!((upright.width(), upright.height()), (8, 4));

        // 6: rotate 90 degrees clockwise.
        fs::write(&path, with_orientation(&jpeg_bytes(8, 4), 6)).unwrap();
        let rotated = load_image(&path, MAX).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (4, 8));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_candidate_is_skipped() {
        let dir = temp_dir("corrupt");
        fs::write(dir.join("earth.jpg"), b"definitely not a jpeg").unwrap();
        write_bmp(&dir.join("earth.bmp"), 2, 2, [5, 6, 7]);

        assert!(matches!(
            load_image(&dir.join("earth.jpg"), MAX),
            Err(TextureError::Decode { .. })
        ));

        let loaded = load_globe_texture(&dir, Fallback::Checkerboard, MAX);
        assert_eq!(loaded.source, TextureSource::File(dir.join("earth.bmp")));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let dir = temp_dir("large");
        let path = dir.join("world.bmp");
        write_bmp(&path, 16, 4, [0, 0, 0]);

        match load_image(&path, 8) {
            Err(TextureError::TooLarge { width, height, max, .. }) => {
                assert_eq!((width, height, max), (16, 4, 8));
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = temp_dir("missing");
        assert!(matches!(
            load_image(&dir.join("nope.bmp"), MAX),
            Err(TextureError::NotFound(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
