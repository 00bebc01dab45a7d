//! Per-frame draw stream for the globe scene.

use glam::{Mat4, Vec3};

use globus_engine::geometry::{disc_fan, grid_lines, ColorVertex};
use globus_engine::paint::Color;
use globus_engine::scene::{DrawList, Layer, MeshId, SceneView, Shading, TextureId};

use crate::config::SceneLayout;
use crate::light::{LightRig, GLOBE_MATERIAL};
use crate::shadow::{
    ShadowDecal, ShadowSettings, CONTACT_ALPHA, CONTACT_RADIUS, CONTACT_SEGMENTS,
};
use crate::view::{self, ViewState};

pub const FLOOR_GREY: f32 = 0.5;
pub const GRID_GREY: f32 = 0.7;
/// Grid height above the floor.
pub const GRID_LIFT: f32 = 0.001;
/// Contact blob offset below the globe surface.
pub const CONTACT_DROP: f32 = 0.001;

/// Background colour (sRGB `0, 0, 0.1`).
pub fn clear_color() -> Color {
    Color::from_srgb(0.0, 0.0, 0.1, 1.0)
}

/// GPU resources the scene draws with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    pub globe: MeshId,
    pub albedo: TextureId,
    pub shadow: TextureId,
}

/// Mutable state read by a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneState {
    pub view: ViewState,
    pub rig: LightRig,
    pub shadows: ShadowSettings,
}

/// Camera, light and background for the renderer.
pub fn scene_view(state: &SceneState) -> SceneView {
    SceneView {
        camera: view::camera(),
        light: state.rig.point_light(),
        clear: clear_color(),
    }
}

/// Records the frame into `list` (cleared first).
///
/// Paint order: floor, grid, projected shadow, globe, contact shadow.
pub fn compose(
    list: &mut DrawList,
    state: &SceneState,
    layout: &SceneLayout,
    handles: &SceneHandles,
) {
    list.clear();

    let grey = |v: f32| Color::from_srgb(v, v, v, 1.0);

    list.push_triangles(
        Layer::GROUND,
        floor_triangles(layout.floor_half_extent, layout.floor_y, grey(FLOOR_GREY)),
        Mat4::IDENTITY,
    );

    list.push_lines(
        Layer::GROUND_OVERLAY,
        grid_lines(
            layout.floor_half_extent,
            layout.grid_spacing,
            layout.floor_y + GRID_LIFT,
            grey(GRID_GREY),
        ),
        Mat4::IDENTITY,
    );

    let intensity = state.shadows.intensity();
    let globe_model = state.view.model_matrix();

    if state.shadows.enabled && state.rig.enabled() {
        let decal = ShadowDecal::for_light(
            state.rig.current().position,
            layout.floor_y,
            layout.globe_radius * state.view.zoom,
            layout.floor_half_extent,
        );
        if let Some(decal) = decal {
            list.push_decal(
                Layer::GROUND_OVERLAY,
                handles.shadow,
                decal.model_matrix(),
                Color::BLACK.with_alpha(intensity),
            );
        }
    }

    let shading = if state.rig.enabled() {
        Shading::Lit(GLOBE_MATERIAL)
    } else {
        Shading::Unlit
    };
    list.push_mesh(Layer::OPAQUE, handles.globe, handles.albedo, globe_model, shading);

    if state.shadows.enabled {
        list.push_triangles(
            Layer::TRANSLUCENT,
            disc_fan(
                CONTACT_RADIUS * layout.globe_radius,
                CONTACT_SEGMENTS,
                -layout.globe_radius - CONTACT_DROP,
                Color::BLACK.with_alpha(CONTACT_ALPHA * intensity),
                Color::transparent(),
            ),
            globe_model,
        );
    }
}

/// Two triangles covering the floor square at height `y`.
fn floor_triangles(half: f32, y: f32, color: Color) -> Vec<ColorVertex> {
    let c = color.to_array();
    let v = |x: f32, z: f32| ColorVertex::new(Vec3::new(x, y, z).to_array(), c);
    vec![
        v(-half, -half),
        v(half, half),
        v(half, -half),
        v(-half, -half),
        v(-half, half),
        v(half, half),
    ]
}

#[cfg(test)]
mod tests {
    use globus_engine::scene::DrawCmd;

    use super::*;

    const HANDLES: SceneHandles = SceneHandles {
        globe: MeshId(0),
        albedo: TextureId(0),
        shadow: TextureId(1),
    };

    fn state() -> SceneState {
        SceneState {
            view: ViewState::default(),
            rig: LightRig::default(),
            shadows: ShadowSettings::default(),
        }
    }

    fn kinds(list: &mut DrawList) -> Vec<&'static str> {
        list.iter_in_paint_order()
            .map(|item| match &item.cmd {
                DrawCmd::Mesh(_) => "mesh",
                DrawCmd::Decal(_) => "decal",
                DrawCmd::Triangles(_) => "triangles",
                DrawCmd::Lines(_) => "lines",
            })
            .collect()
    }

    #[test]
    fn full_scene_in_paint_order() {
        let mut list = DrawList::new();
        compose(&mut list, &state(), &SceneLayout::default(), &HANDLES);
        assert_eq!(kinds(&mut list), ["triangles", "lines", "decal", "mesh", "triangles"]);
    }

    #[test]
    fn lighting_off_hides_drop_shadow_but_keeps_contact() {
        let mut s = state();
        s.rig.toggle();
        let mut list = DrawList::new();
        compose(&mut list, &s, &SceneLayout::default(), &HANDLES);
        assert_eq!(kinds(&mut list), ["triangles", "lines", "mesh", "triangles"]);

        let mesh = list.items().iter().find_map(|i| match &i.cmd {
            DrawCmd::Mesh(m) => Some(m.shading),
            _ => None,
        });
        assert_eq!(mesh, Some(Shading::Unlit));
    }

    #[test]
    fn shadows_off_draws_no_shadows() {
        let mut s = state();
        s.shadows.toggle();
        let mut list = DrawList::new();
        compose(&mut list, &s, &SceneLayout::default(), &HANDLES);
        assert_eq!(kinds(&mut list), ["triangles", "lines", "mesh"]);
    }

    #[test]
    fn horizontal_light_has_no_drop_shadow() {
        let mut s = state();
        s.rig.select(4).unwrap();
        let mut list = DrawList::new();
        compose(&mut list, &s, &SceneLayout::default(), &HANDLES);
        assert!(!kinds(&mut list).contains(&"decal"));
    }

    #[test]
    fn shadow_tint_and_contact_alpha_follow_intensity() {
        let mut list = DrawList::new();
        compose(&mut list, &state(), &SceneLayout::default(), &HANDLES);

        let decal = list.items().iter().find_map(|i| match &i.cmd {
            DrawCmd::Decal(d) => Some(d.clone()),
            _ => None,
        });
        let decal = decal.unwrap();
        assert_eq!(decal.texture, HANDLES.shadow);
        assert!((decal.tint.a - 0.6).abs() < 1e-6);
        assert_eq!((decal.tint.r, decal.tint.g, decal.tint.b), (0.0, 0.0, 0.0));

        let contact = match &list.items().last().unwrap().cmd {
            DrawCmd::Triangles(t) => t.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert!((contact.vertices[0].color[3] - 0.18).abs() < 1e-6);
        assert_eq!(contact.vertices[1].color[3], 0.0);
        assert!((contact.vertices[0].position[1] + 1.001).abs() < 1e-6);
    }

    #[test]
    fn scene_view_carries_background_and_light() {
        let mut s = state();
        let view = scene_view(&s);
        assert_eq!(view.clear, clear_color());
        assert!(view.light.is_some());

        s.rig.toggle();
        assert_eq!(scene_view(&s).light, None);
    }

    #[test]
    fn shadows_scale_with_globe_radius() {
        let decal_and_rim = |layout: &SceneLayout| {
            let mut list = DrawList::new();
            compose(&mut list, &state(), layout, &HANDLES);
            let decal = list.items().iter().find_map(|i| match &i.cmd {
                DrawCmd::Decal(d) => Some(d.model),
                _ => None,
            });
            let rim = match &list.items().last().unwrap().cmd {
                DrawCmd::Triangles(t) => Vec3::from(t.vertices[1].position),
                other => panic!("unexpected {other:?}"),
            };
            (decal.unwrap(), rim)
        };

        let unit = SceneLayout::default();
        let small = SceneLayout { globe_radius: 0.5, ..SceneLayout::default() };
        let (unit_decal, unit_rim) = decal_and_rim(&unit);
        let (small_decal, small_rim) = decal_and_rim(&small);

        let width = |m: Mat4| m.transform_vector3(Vec3::X).length();
        assert!((width(small_decal) - 0.5 * width(unit_decal)).abs() < 1e-4);

        let radial = |v: Vec3| Vec3::new(v.x, 0.0, v.z).length();
        assert!((radial(unit_rim) - CONTACT_RADIUS).abs() < 1e-5);
        assert!((radial(small_rim) - 0.5 * CONTACT_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn floor_is_opaque_and_grid_sits_above_it() {
        let mut list = DrawList::new();
        compose(&mut list, &state(), &SceneLayout::default(), &HANDLES);
        match &list.items()[0].cmd {
            DrawCmd::Triangles(t) => {
                assert!(t.is_opaque());
                assert!(t.vertices.iter().all(|v| v.position[1] == -1.5));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &list.items()[1].cmd {
            DrawCmd::Lines(l) => assert!(l.vertices.iter().all(|v| v.position[1] == -1.5 + 0.001)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
