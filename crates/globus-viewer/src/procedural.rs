//! Procedurally generated textures.

use globus_engine::texture::{TextureData, TextureDataError, WrapMode};

// ── checkerboard ──────────────────────────────────────────────────────────

pub const CHECKER_SIZE: u32 = 64;
pub const CHECKER_CELL: u32 = 8;
pub const CHECKER_LIGHT: [u8; 3] = [100, 150, 50];
pub const CHECKER_DARK: [u8; 3] = [30, 60, 150];

/// 64×64 two-colour checkerboard with 8-pixel cells, repeat wrap.
pub fn checkerboard() -> TextureData {
    let mut rgb = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 3) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let even = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0;
            rgb.extend_from_slice(if even { &CHECKER_LIGHT } else { &CHECKER_DARK });
        }
    }
    rgb_texture(CHECKER_SIZE, CHECKER_SIZE, &rgb, WrapMode::Repeat)
}

// ── soft shadow ───────────────────────────────────────────────────────────

pub const SOFT_SHADOW_SIZE: u32 = 256;

/// Black disc whose alpha falls off from the centre, clamp-to-edge wrap.
///
/// For normalized distance `d` from the centre, alpha is
/// `(1 - d³)(1 - d/2)` inside the unit circle and zero outside, scaled by
/// `intensity`.
pub fn soft_shadow(size: u32, intensity: f32) -> TextureData {
    let size = size.max(2);
    let half = size as f32 / 2.0;
    let intensity = intensity.clamp(0.0, 1.0);

    let mut pixels = vec![0u8; (size * size * 4) as usize];
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 - half) / half;
            let dy = (y as f32 - half) / half;
            let alpha = soft_shadow_alpha((dx * dx + dy * dy).sqrt(), intensity);
            pixels[((y * size + x) * 4 + 3) as usize] = alpha;
        }
    }

    match TextureData::from_rgba8(size, size, pixels, WrapMode::ClampToEdge) {
        Ok(tex) => tex,
        Err(err) => unreachable_size(err),
    }
}

fn soft_shadow_alpha(dist: f32, intensity: f32) -> u8 {
    if dist > 1.0 {
        return 0;
    }
    let alpha = ((1.0 - dist.powi(3)) * (1.0 - 0.5 * dist)).clamp(0.0, 1.0);
    (alpha * 255.0 * intensity) as u8
}

// ── world map ─────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: u32 = 512;
pub const WORLD_HEIGHT: u32 = 256;
pub const OCEAN: [u8; 3] = [30, 60, 150];
const OUTLINE: [u8; 3] = [255, 255, 255];

/// Continent blocks as inclusive pixel boxes `(x1, y1, x2, y2)`, drawn in order.
const CONTINENTS: [(&str, [u32; 4], [u8; 3]); 7] = [
    ("Africa", [250, 100, 350, 180], [160, 120, 80]),
    ("Asia", [300, 50, 450, 150], [60, 160, 60]),
    ("Europe", [270, 50, 320, 100], [100, 180, 100]),
    ("North America", [50, 50, 200, 120], [180, 80, 80]),
    ("South America", [150, 130, 250, 200], [220, 120, 60]),
    ("Australia", [400, 170, 450, 210], [180, 80, 180]),
    ("Antarctica", [0, 220, WORLD_WIDTH, WORLD_HEIGHT], [220, 220, 220]),
];

/// Stylized 512×256 equirectangular map, north at the top.
///
/// Continents are outlined boxes over an ocean background, overlaid with
/// twelve meridians and six parallels.
pub fn world_map() -> TextureData {
    let (w, h) = (WORLD_WIDTH, WORLD_HEIGHT);
    let mut canvas = Canvas::new(w, h, OCEAN);

    for (_, [x1, y1, x2, y2], fill) in CONTINENTS {
        canvas.fill_rect(x1, y1, x2, y2, fill);
        canvas.outline_rect(x1, y1, x2, y2, OUTLINE);
    }

    for x in (0..w).step_by((w / 12) as usize) {
        canvas.fill_rect(x, 0, x, h, OUTLINE);
    }
    for y in (0..h).step_by((h / 6) as usize) {
        canvas.fill_rect(0, y, w, y, OUTLINE);
    }

    rgb_texture(w, h, &canvas.rgb, WrapMode::Repeat)
}

/// RGB8 raster with inclusive, edge-clipped rectangle drawing.
struct Canvas {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let rgb = background
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self { width, height, rgb }
    }

    fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: [u8; 3]) {
        if x1 >= self.width || y1 >= self.height {
            return;
        }
        let x2 = x2.min(self.width - 1);
        let y2 = y2.min(self.height - 1);
        for y in y1..=y2 {
            for x in x1..=x2 {
                let i = ((y * self.width + x) * 3) as usize;
                self.rgb[i..i + 3].copy_from_slice(&color);
            }
        }
    }

    fn outline_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: [u8; 3]) {
        self.fill_rect(x1, y1, x2, y1, color);
        self.fill_rect(x1, y2, x2, y2, color);
        self.fill_rect(x1, y1, x1, y2, color);
        self.fill_rect(x2, y1, x2, y2, color);
    }
}

fn rgb_texture(width: u32, height: u32, rgb: &[u8], wrap: WrapMode) -> TextureData {
    match TextureData::from_rgb8(width, height, rgb, wrap) {
        Ok(tex) => tex,
        Err(err) => unreachable_size(err),
    }
}

// Generators size their buffers from the same dimensions they pass in.
#[cold]
fn unreachable_size(err: TextureDataError) -> ! {
    panic!("procedural texture has inconsistent size: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_cells_alternate() {
        let tex = checkerboard();
        assert_eq!((tex.width(), tex.height()), (64, 64));
        assert_eq!(tex.wrap(), WrapMode::Repeat);
        assert_eq!(tex.pixel(0, 0), Some([100, 150, 50, 255]));
        assert_eq!(tex.pixel(7, 7), Some([100, 150, 50, 255]));
        assert_eq!(tex.pixel(8, 0), Some([30, 60, 150, 255]));
        assert_eq!(tex.pixel(0, 8), Some([30, 60, 150, 255]));
        assert_eq!(tex.pixel(8, 8), Some([100, 150, 50, 255]));
    }

    #[test]
    fn soft_shadow_alpha_profile() {
        let tex = soft_shadow(SOFT_SHADOW_SIZE, 1.0);
        assert_eq!(tex.wrap(), WrapMode::ClampToEdge);

        let centre = tex.pixel(128, 128).unwrap();
        assert_eq!(centre, [0, 0, 0, 255]);

        // Half way out: (1 - 1/8)(1 - 1/4) = 0.65625
        let mid = tex.pixel(192, 128).unwrap();
        assert_eq!(mid[3], (0.65625f32 * 255.0) as u8);

        // Exactly on the rim and beyond it.
        assert_eq!(tex.pixel(0, 128).unwrap()[3], 0);
        assert_eq!(tex.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(tex.pixel(255, 255).unwrap()[3], 0);
    }

    #[test]
    fn soft_shadow_scales_with_intensity() {
        let full = soft_shadow(64, 1.0);
        let part = soft_shadow(64, 0.6);
        assert_eq!(part.pixel(32, 32).unwrap()[3], (255.0f32 * 0.6) as u8);
        assert!(part.pixel(40, 32).unwrap()[3] < full.pixel(40, 32).unwrap()[3]);
    }

    #[test]
    fn world_map_layout() {
        let tex = world_map();
        assert_eq!((tex.width(), tex.height()), (512, 256));

        // Open ocean, away from grid lines.
        assert_eq!(tex.pixel(10, 10), Some([30, 60, 150, 255]));
        // Inside Africa (not covered by Asia).
        assert_eq!(tex.pixel(260, 170), Some([160, 120, 80, 255]));
        // Europe is drawn over Asia.
        assert_eq!(tex.pixel(300, 60), Some([100, 180, 100, 255]));
        // Antarctica spans the bottom rows.
        assert_eq!(tex.pixel(10, 250), Some([220, 220, 220, 255]));
        // Outlines and meridians are white.
        assert_eq!(tex.pixel(50, 60), Some([255, 255, 255, 255]));
        assert_eq!(tex.pixel(42, 10), Some([255, 255, 255, 255]));
        assert_eq!(tex.pixel(10, 42), Some([255, 255, 255, 255]));
    }
}
