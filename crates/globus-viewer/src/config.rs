use std::path::PathBuf;

use globus_engine::logging::LoggingConfig;

use crate::loader::Fallback;
use crate::shadow::DEFAULT_INTENSITY;

/// Fixed scene dimensions in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneLayout {
    pub floor_y: f32,
    /// Half the side length of the square floor.
    pub floor_half_extent: f32,
    pub grid_spacing: f32,
    pub globe_radius: f32,
    pub sphere_slices: u32,
    pub sphere_stacks: u32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            floor_y: -1.5,
            floor_half_extent: 4.0,
            grid_spacing: 0.5,
            globe_radius: 1.0,
            sphere_slices: 36,
            sphere_stacks: 18,
        }
    }
}

/// Everything the viewer needs before the window opens.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: f64,
    pub height: f64,
    /// Directory searched for globe textures.
    pub asset_dir: PathBuf,
    pub fallback: Fallback,
    pub layout: SceneLayout,
    pub shadow_intensity: f32,
    /// Requested MSAA sample count; lowered to what the adapter supports.
    pub sample_count: u32,
    pub logging: LoggingConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Globus".to_string(),
            width: 800.0,
            height: 600.0,
            asset_dir: PathBuf::from("."),
            fallback: Fallback::default(),
            layout: SceneLayout::default(),
            shadow_intensity: DEFAULT_INTENSITY,
            sample_count: 4,
            logging: LoggingConfig::default(),
        }
    }
}
