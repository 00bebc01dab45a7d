//! Preset point-light positions and the light rig that cycles through them.

use std::fmt;

use glam::Vec3;

use globus_engine::paint::Color;
use globus_engine::scene::{Material, PointLight};

/// A named light position in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightPreset {
    pub position: Vec3,
    pub label: &'static str,
}

impl LightPreset {
    const fn new(x: f32, y: f32, z: f32, label: &'static str) -> Self {
        Self { position: Vec3::new(x, y, z), label }
    }
}

pub const PRESETS: [LightPreset; 8] = [
    LightPreset::new(5.0, 5.0, 5.0, "upper right front"),
    LightPreset::new(-5.0, 5.0, 5.0, "upper left front"),
    LightPreset::new(0.0, 10.0, 0.0, "directly above"),
    LightPreset::new(0.0, -10.0, 0.0, "directly below"),
    LightPreset::new(10.0, 0.0, 0.0, "right"),
    LightPreset::new(-10.0, 0.0, 0.0, "left"),
    LightPreset::new(0.0, 0.0, 10.0, "front"),
    LightPreset::new(0.0, 0.0, -10.0, "back"),
];

// ── fixed colours ─────────────────────────────────────────────────────────

/// Scene-wide ambient added on top of the light's own ambient term.
pub const GLOBAL_AMBIENT: f32 = 0.2;
pub const LIGHT_AMBIENT: f32 = 0.3;
pub const LIGHT_DIFFUSE: [f32; 3] = [1.0, 1.0, 0.9];
pub const LIGHT_SPECULAR: f32 = 0.8;

/// Surface response of the globe.
pub const GLOBE_MATERIAL: Material = Material {
    ambient: 0.7,
    diffuse: 0.9,
    specular: 0.3,
    shininess: 30.0,
};

/// Returned by [`LightRig::select`] for an index outside the preset table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InvalidPreset {
    pub index: usize,
}

impl fmt::Display for InvalidPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid light preset {}, valid range is 0-{}",
            self.index,
            PRESETS.len() - 1
        )
    }
}

impl std::error::Error for InvalidPreset {}

/// Which preset is active and whether lighting is on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LightRig {
    index: usize,
    enabled: bool,
}

impl Default for LightRig {
    fn default() -> Self {
        Self { index: 0, enabled: true }
    }
}

impl LightRig {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn current(&self) -> &'static LightPreset {
        &PRESETS[self.index]
    }

    pub fn next(&mut self) -> &'static LightPreset {
        self.index = (self.index + 1) % PRESETS.len();
        self.current()
    }

    pub fn prev(&mut self) -> &'static LightPreset {
        self.index = (self.index + PRESETS.len() - 1) % PRESETS.len();
        self.current()
    }

    /// Activates preset `index`. Out-of-range indices leave the rig unchanged.
    pub fn select(&mut self, index: usize) -> Result<&'static LightPreset, InvalidPreset> {
        if index >= PRESETS.len() {
            return Err(InvalidPreset { index });
        }
        self.index = index;
        Ok(self.current())
    }

    /// Flips lighting on/off and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// The point light for the renderer, or `None` when lighting is off.
    ///
    /// Colours are sRGB grey levels converted to linear. The global ambient is
    /// folded into the light's ambient term.
    pub fn point_light(&self) -> Option<PointLight> {
        if !self.enabled {
            return None;
        }
        let grey = |v: f32| Color::from_srgb(v, v, v, 1.0);
        let [dr, dg, db] = LIGHT_DIFFUSE;

        Some(PointLight {
            position: self.current().position,
            ambient: grey((LIGHT_AMBIENT + GLOBAL_AMBIENT).min(1.0)),
            diffuse: Color::from_srgb(dr, dg, db, 1.0),
            specular: grey(LIGHT_SPECULAR),
        })
    }
}

impl fmt::Display for LightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        write!(f, "{} ({}, {}, {})", self.label, p.x, p.y, p.z)
    }
}

pub(crate) fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

/// Multi-line status report for the console.
pub fn info(rig: &LightRig, shadows: bool, intensity: f32) -> String {
    let preset = rig.current();
    let p = preset.position;
    let rule = "=".repeat(40);
    format!(
        "\n{rule}\n\
         light preset: {}\n\
         description:  {}\n\
         position:     ({}, {}, {})\n\
         lighting:     {}\n\
         shadows:      {}\n\
         intensity:    {:.1}\n\
         {rule}",
        rig.index(),
        preset.label,
        p.x,
        p.y,
        p.z,
        on_off(rig.enabled()),
        on_off(shadows),
        intensity,
    )
}
