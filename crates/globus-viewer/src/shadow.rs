//! Stylized planar shadows.
//!
//! The drop shadow is not a real shadow map: the globe centre is projected
//! from the light onto the floor, and a soft elliptical decal is placed there,
//! stretched and rotated to follow the light direction.

use glam::{Mat4, Vec3};

/// Rays flatter than this (in |dy|) are treated as parallel to the floor.
const PARALLEL_EPSILON: f32 = 1e-4;
/// Decals smaller than this are not drawn.
pub const MIN_DECAL_SIZE: f32 = 0.1;
/// Lift above the floor to avoid z-fighting with the grid (`+0.001`).
pub const DECAL_LIFT: f32 = 0.002;

pub const MIN_INTENSITY: f32 = 0.1;
pub const MAX_INTENSITY: f32 = 1.0;
pub const DEFAULT_INTENSITY: f32 = 0.6;
/// Step used by the `[` / `]` keys.
pub const INTENSITY_STEP: f32 = 0.1;

pub const CONTACT_SEGMENTS: u32 = 32;
pub const CONTACT_RADIUS: f32 = 0.2;
pub const CONTACT_ALPHA: f32 = 0.3;

/// Where the projected shadow lands on the floor and how big it is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowFootprint {
    pub center_x: f32,
    pub center_z: f32,
    pub size: f32,
}

/// Projects `point` from a point light at `light` onto the plane `y = floor_y`.
///
/// `scale` is the on-screen globe radius (`radius * zoom`). Returns `None`
/// when the ray is parallel to the floor or points away from it. A light
/// below the floor still yields a footprint under the globe.
pub fn project_point_shadow(
    light: Vec3,
    point: Vec3,
    floor_y: f32,
    scale: f32,
    floor_size: f32,
) -> Option<ShadowFootprint> {
    let d = point - light;
    if d.y.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (floor_y - light.y) / d.y;
    if t < 0.0 {
        return None;
    }

    let mut size = scale * (1.0 + 0.5 * t);
    let height = (light.y - floor_y).abs();
    if height > 0.0 {
        size *= d.length() / height;
    }
    size = size.min(0.6 * floor_size);

    Some(ShadowFootprint {
        center_x: light.x + t * d.x,
        center_z: light.z + t * d.z,
        size,
    })
}

/// Stretch and orientation of the shadow ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowEllipse {
    pub stretch_x: f32,
    pub stretch_z: f32,
    /// Radians about +Y.
    pub rotation: f32,
}

impl Default for ShadowEllipse {
    fn default() -> Self {
        Self { stretch_x: 1.0, stretch_z: 1.0, rotation: 0.0 }
    }
}

pub fn shadow_ellipse(light: Vec3) -> ShadowEllipse {
    let len = light.length();
    if len < PARALLEL_EPSILON {
        return ShadowEllipse::default();
    }
    let l = light / len;
    ShadowEllipse {
        stretch_x: 1.0 + 0.8 * l.x.abs(),
        stretch_z: 1.0 + 0.8 * l.z.abs(),
        rotation: l.z.atan2(l.x),
    }
}

/// A placed drop-shadow decal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowDecal {
    pub footprint: ShadowFootprint,
    pub ellipse: ShadowEllipse,
    pub floor_y: f32,
}

impl ShadowDecal {
    /// Builds the decal for the globe centred at the origin, or `None` if the
    /// projection misses the floor or the result is too small to see.
    pub fn for_light(light: Vec3, floor_y: f32, scale: f32, floor_size: f32) -> Option<Self> {
        let footprint = project_point_shadow(light, Vec3::ZERO, floor_y, scale, floor_size)?;
        if footprint.size < MIN_DECAL_SIZE {
            return None;
        }
        Some(Self {
            footprint,
            ellipse: shadow_ellipse(light),
            floor_y,
        })
    }

    /// Maps the unit decal quad (`[-1, 1]` in XZ) onto the floor.
    pub fn model_matrix(&self) -> Mat4 {
        let f = self.footprint;
        let e = self.ellipse;
        Mat4::from_translation(Vec3::new(f.center_x, self.floor_y + DECAL_LIFT, f.center_z))
            * Mat4::from_rotation_y(e.rotation)
            * Mat4::from_scale(Vec3::new(f.size * e.stretch_x, 1.0, f.size * e.stretch_z))
    }
}

/// Shadow toggle and strength.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowSettings {
    pub enabled: bool,
    intensity: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self { enabled: true, intensity: DEFAULT_INTENSITY }
    }
}

impl ShadowSettings {
    pub fn new(enabled: bool, intensity: f32) -> Self {
        Self { enabled, intensity: clamp_intensity(intensity) }
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Adds `delta` to the intensity, clamped. Returns `true` if it changed.
    pub fn adjust(&mut self, delta: f32) -> bool {
        let next = clamp_intensity(self.intensity + delta);
        if (next - self.intensity).abs() < 1e-6 {
            return false;
        }
        self.intensity = next;
        true
    }
}

fn clamp_intensity(v: f32) -> f32 {
    if v.is_nan() {
        return DEFAULT_INTENSITY;
    }
    // Round to the step so repeated +/- land on exact tenths.
    ((v / INTENSITY_STEP).round() * INTENSITY_STEP).clamp(MIN_INTENSITY, MAX_INTENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR_Y: f32 = -1.5;
    const FLOOR_SIZE: f32 = 4.0;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn light_overhead_projects_to_origin() {
        let f = project_point_shadow(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, FLOOR_Y, 1.0, FLOOR_SIZE)
            .unwrap();
        // t = 11.5 / 10 = 1.15, size = 1.575 * 10 / 11.5
        assert!(approx(f.center_x, 0.0) && approx(f.center_z, 0.0));
        assert!(approx(f.size, 1.575 * 10.0 / 11.5), "{}", f.size);
    }

    #[test]
    fn diagonal_light_pushes_shadow_away() {
        let light = Vec3::new(5.0, 5.0, 5.0);
        let f = project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 1.0, FLOOR_SIZE).unwrap();
        // t = 6.5 / 5 = 1.3, centre = 5 - 1.3 * 5
        assert!(approx(f.center_x, -1.5) && approx(f.center_z, -1.5));
        assert!(approx(f.size, 1.65 * 75f32.sqrt() / 6.5), "{}", f.size);

        let zoomed = project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 2.0, FLOOR_SIZE).unwrap();
        assert!(approx(zoomed.size, 0.6 * FLOOR_SIZE));
    }

    #[test]
    fn horizontal_light_casts_nothing() {
        for light in [Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -10.0)] {
            assert_eq!(project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 1.0, FLOOR_SIZE), None);
        }
    }

    #[test]
    fn light_below_floor_still_marks_floor_under_globe() {
        let light = Vec3::new(0.0, -10.0, 0.0);
        let f = project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 1.0, FLOOR_SIZE).unwrap();
        // t = 8.5 / 10 = 0.85, size = 1.425 * 10 / 8.5
        assert!(approx(f.center_x, 0.0) && approx(f.center_z, 0.0));
        assert!(approx(f.size, 1.425 * 10.0 / 8.5), "{}", f.size);
        assert!(ShadowDecal::for_light(light, FLOOR_Y, 1.0, FLOOR_SIZE).is_some());
    }

    #[test]
    fn ray_pointing_away_from_floor_casts_nothing() {
        // Light under the floor looking at a point below it.
        let light = Vec3::new(0.0, -10.0, 0.0);
        let point = Vec3::new(0.0, -12.0, 0.0);
        assert_eq!(project_point_shadow(light, point, FLOOR_Y, 1.0, FLOOR_SIZE), None);
    }

    #[test]
    fn scale_scales_unclamped_size() {
        let light = Vec3::new(0.0, 10.0, 0.0);
        let a = project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 1.0, FLOOR_SIZE).unwrap();
        let b = project_point_shadow(light, Vec3::ZERO, FLOOR_Y, 0.5, FLOOR_SIZE).unwrap();
        assert!(approx(b.size, a.size * 0.5));
    }

    #[test]
    fn ellipse_for_axis_and_diagonal_lights() {
        let e = shadow_ellipse(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(e, ShadowEllipse { stretch_x: 1.0, stretch_z: 1.0, rotation: 0.0 });

        let e = shadow_ellipse(Vec3::new(10.0, 0.0, 0.0));
        assert!(approx(e.stretch_x, 1.8) && approx(e.stretch_z, 1.0));

        let e = shadow_ellipse(Vec3::new(5.0, 5.0, 5.0));
        let s = 1.0 + 0.8 / 3f32.sqrt();
        assert!(approx(e.stretch_x, s) && approx(e.stretch_z, s));
        assert!(approx(e.rotation, std::f32::consts::FRAC_PI_4));
    }

    #[test]
    fn degenerate_light_gives_identity_ellipse() {
        assert_eq!(shadow_ellipse(Vec3::ZERO), ShadowEllipse::default());
    }

    #[test]
    fn decal_model_places_quad_on_floor() {
        let decal = ShadowDecal::for_light(Vec3::new(0.0, 10.0, 0.0), FLOOR_Y, 1.0, FLOOR_SIZE)
            .unwrap();
        let size = decal.footprint.size;
        let corner = decal.model_matrix().transform_point3(Vec3::new(1.0, 0.0, 1.0));
        assert!(approx(corner.x, size) && approx(corner.z, size));
        assert!(approx(corner.y, FLOOR_Y + DECAL_LIFT));
    }

    #[test]
    fn tiny_decals_are_skipped() {
        assert!(ShadowDecal::for_light(Vec3::new(0.0, 10.0, 0.0), FLOOR_Y, 0.05, FLOOR_SIZE).is_none());
    }

    #[test]
    fn intensity_is_clamped() {
        let mut s = ShadowSettings::default();
        assert!(s.adjust(0.1));
        assert!(approx(s.intensity(), 0.7));
        for _ in 0..10 {
            s.adjust(0.1);
        }
        assert!(approx(s.intensity(), 1.0));
        assert!(!s.adjust(0.1));
        for _ in 0..20 {
            s.adjust(-0.1);
        }
        assert!(approx(s.intensity(), 0.1));
        assert_eq!(ShadowSettings::new(true, 5.0).intensity(), 1.0);
    }
}
