use std::path::PathBuf;

use winit::dpi::LogicalSize;

use globus_engine::core::{App as EngineApp, AppControl, FrameCtx};
use globus_engine::device::GpuInit;
use globus_engine::geometry::sphere;
use globus_engine::input::MouseButton;
use globus_engine::logging::{init_logging, LoggingConfig};
use globus_engine::render::{RenderCtx, RenderTarget, SceneRenderer};
use globus_engine::scene::{DrawList, SceneView};
use globus_engine::time::FrameStats;
use globus_engine::window::{CursorIcon, Runtime, RuntimeConfig};

use crate::compose::{compose, scene_view, SceneHandles, SceneState};
use crate::config::{SceneLayout, ViewerConfig};
use crate::controls::{key_actions, Action, WheelAccumulator};
use crate::light::{self, on_off, LightRig};
use crate::loader::{load_globe_texture, Fallback};
use crate::procedural::{soft_shadow, SOFT_SHADOW_SIZE};
use crate::shadow::{ShadowSettings, INTENSITY_STEP};
use crate::view::ViewState;

/// Frames between debug frame-rate reports.
const STATS_WINDOW: u32 = 600;

// ── Viewer ────────────────────────────────────────────────────────────────

/// Globe viewer builder.
///
/// Configure, then start the event loop with [`run`](Viewer::run):
///
/// ```rust,ignore
/// Viewer::new()
///     .title("Globus")
///     .asset_dir("assets")
///     .fallback(Fallback::WorldMap)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.config.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Directory searched for `earth.jpg`, `world.bmp`, ...
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.asset_dir = dir.into();
        self
    }

    /// Procedural texture used when no image file loads.
    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.config.fallback = fallback;
        self
    }

    pub fn layout(mut self, layout: SceneLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Initial shadow intensity, clamped to `[0.1, 1.0]`.
    pub fn shadow_intensity(mut self, intensity: f32) -> Self {
        self.config.shadow_intensity = intensity;
        self
    }

    /// Requested MSAA sample count (1 disables multisampling).
    pub fn sample_count(mut self, count: u32) -> Self {
        self.config.sample_count = count;
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Opens the window and runs until the user exits.
    ///
    /// Fails only if the window or GPU context cannot be created.
    pub fn run(self) -> anyhow::Result<()> {
        init_logging(self.config.logging.clone());

        let runtime = RuntimeConfig {
            title:        self.config.title.clone(),
            initial_size: LogicalSize::new(self.config.width, self.config.height),
        };
        let gpu_init = GpuInit {
            sample_count: self.config.sample_count,
            ..GpuInit::default()
        };

        log::info!(
            "starting {} ({}x{}), assets in {}",
            self.config.title,
            self.config.width,
            self.config.height,
            self.config.asset_dir.display()
        );

        Runtime::run(runtime, gpu_init, ViewerApp::new(self.config))
    }
}

// ── ViewerApp ─────────────────────────────────────────────────────────────

/// Internal state that implements `globus_engine::core::App`.
///
/// GPU resources are created on the first frame, once a device exists.
struct ViewerApp {
    config: ViewerConfig,
    state:  SceneState,

    wheel: WheelAccumulator,
    stats: FrameStats,

    // Rendering
    renderer:  SceneRenderer,
    draw_list: DrawList,
    handles:   Option<SceneHandles>,

    // Work deferred until a RenderCtx is available.
    reload_texture: bool,
    rebuild_shadow: bool,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        let shadows = ShadowSettings::new(true, config.shadow_intensity);
        Self {
            config,
            state: SceneState {
                view: ViewState::default(),
                rig: LightRig::default(),
                shadows,
            },
            wheel:          WheelAccumulator::default(),
            stats:          FrameStats::new(STATS_WINDOW),
            renderer:       SceneRenderer::new(),
            draw_list:      DrawList::new(),
            handles:        None,
            reload_texture: false,
            rebuild_shadow: false,
        }
    }

    fn apply(&mut self, action: Action) -> AppControl {
        let state = &mut self.state;
        match action {
            Action::Exit => {
                log::info!("exit requested");
                return AppControl::Exit;
            }
            Action::ZoomIn => {
                state.view.zoom_in();
                log::debug!("zoom {:.3}", state.view.zoom);
            }
            Action::ZoomOut => {
                state.view.zoom_out();
                log::debug!("zoom {:.3}", state.view.zoom);
            }
            Action::ResetView => {
                state.view.reset();
                log::info!("view reset");
            }
            Action::ReloadTexture => {
                log::info!("reloading globe texture");
                self.reload_texture = true;
            }
            Action::ToggleLighting => {
                let on = state.rig.toggle();
                log::info!("lighting: {}", on_off(on));
            }
            Action::ToggleShadows => {
                let on = state.shadows.toggle();
                log::info!("shadows: {}", on_off(on));
            }
            Action::IntensityDown | Action::IntensityUp => {
                let delta = if action == Action::IntensityUp {
                    INTENSITY_STEP
                } else {
                    -INTENSITY_STEP
                };
                if state.shadows.adjust(delta) {
                    self.rebuild_shadow = true;
                }
                log::info!("shadow intensity: {:.1}", state.shadows.intensity());
            }
            Action::NextLight | Action::PrevLight => {
                let preset = if action == Action::NextLight {
                    state.rig.next()
                } else {
                    state.rig.prev()
                };
                log::info!("light preset {}: {preset}", state.rig.index());
                self.log_info();
            }
            Action::ShowInfo => self.log_info(),
            Action::SelectLight(index) => match state.rig.select(index as usize) {
                Ok(preset) => log::info!("light preset {index}: {preset}"),
                Err(err) => log::warn!("{err}"),
            },
            Action::PresetHint(digit) => {
                log::info!("key {digit}: light presets are 0-{} only", light::PRESETS.len() - 1);
            }
        }
        AppControl::Continue
    }

    fn log_info(&self) {
        let s = &self.state;
        log::info!("{}", light::info(&s.rig, s.shadows.enabled, s.shadows.intensity()));
    }

    /// Uploads the globe mesh and both textures on first use.
    fn ensure_resources(&mut self, rctx: &RenderCtx<'_>) -> SceneHandles {
        if let Some(handles) = self.handles {
            return handles;
        }

        let layout = &self.config.layout;
        let mesh = sphere(layout.globe_radius, layout.sphere_slices, layout.sphere_stacks);
        let globe = self.renderer.upload_mesh(rctx, &mesh);

        let max = rctx.device.limits().max_texture_dimension_2d;
        let loaded = load_globe_texture(&self.config.asset_dir, self.config.fallback, max);
        let albedo = self.renderer.upload_texture(rctx, &loaded.data);
        log::info!("globe texture: {}", loaded.source);

        let shadow_tex = soft_shadow(SOFT_SHADOW_SIZE, self.state.shadows.intensity());
        let shadow = self.renderer.upload_texture(rctx, &shadow_tex);

        let handles = SceneHandles { globe, albedo, shadow };
        self.handles = Some(handles);
        self.reload_texture = false;
        self.rebuild_shadow = false;
        handles
    }

    fn draw(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, view: &SceneView) {
        let handles = self.ensure_resources(rctx);

        if std::mem::take(&mut self.reload_texture) {
            let max = rctx.device.limits().max_texture_dimension_2d;
            let loaded = load_globe_texture(&self.config.asset_dir, self.config.fallback, max);
            self.renderer.replace_texture(rctx, handles.albedo, &loaded.data);
            log::info!("globe texture: {}", loaded.source);
        }

        if std::mem::take(&mut self.rebuild_shadow) {
            let tex = soft_shadow(SOFT_SHADOW_SIZE, self.state.shadows.intensity());
            self.renderer.replace_texture(rctx, handles.shadow, &tex);
        }

        compose(&mut self.draw_list, &self.state, &self.config.layout, &handles);
        self.renderer.render(rctx, target, view, &mut self.draw_list);
    }
}

impl EngineApp for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Input ─────────────────────────────────────────────────────────
        for action in key_actions(ctx.input_frame.key_presses()) {
            if self.apply(action) == AppControl::Exit {
                return AppControl::Exit;
            }
        }

        let steps = self.wheel.feed(ctx.input_frame.wheel_lines);
        for _ in 0..steps.unsigned_abs() {
            let action = if steps > 0 { Action::ZoomIn } else { Action::ZoomOut };
            self.apply(action);
        }

        let left = MouseButton::Left;
        if ctx.input_frame.buttons_pressed.contains(&left) {
            ctx.window.set_cursor(CursorIcon::Grabbing);
        }
        if ctx.input_frame.buttons_released.contains(&left) {
            ctx.window.set_cursor(CursorIcon::Default);
        }
        if ctx.input.button_down(left) {
            let (dx, dy) = ctx.input_frame.pointer_delta;
            if dx != 0.0 || dy != 0.0 {
                self.state.view.drag(dx, dy);
            }
        }

        if let Some(fps) = self.stats.record(&ctx.time) {
            log::debug!(
                "frame {}: {fps:.1} fps, {} draw items",
                ctx.time.frame_index,
                self.draw_list.len()
            );
        }

        // ── Render ────────────────────────────────────────────────────────
        let view = scene_view(&self.state);
        ctx.render(view.clear, |rctx, target| self.draw(rctx, target, &view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ViewerApp {
        ViewerApp::new(ViewerConfig::default())
    }

    #[test]
    fn builder_sets_config() {
        let v = Viewer::new()
            .title("t")
            .size(640.0, 480.0)
            .asset_dir("assets")
            .fallback(Fallback::WorldMap)
            .shadow_intensity(0.3)
            .sample_count(1);
        let c = v.config();
        assert_eq!(c.title, "t");
        assert_eq!((c.width, c.height), (640.0, 480.0));
        assert_eq!(c.asset_dir, PathBuf::from("assets"));
        assert_eq!(c.fallback, Fallback::WorldMap);
        assert_eq!(c.sample_count, 1);
    }

    #[test]
    fn default_config_matches_scene() {
        let c = ViewerConfig::default();
        assert_eq!((c.width, c.height), (800.0, 600.0));
        assert_eq!(c.layout.floor_y, -1.5);
        assert_eq!(c.fallback, Fallback::Checkerboard);
        assert_eq!(c.shadow_intensity, 0.6);
    }

    #[test]
    fn escape_exits() {
        assert_eq!(app().apply(Action::Exit), AppControl::Exit);
    }

    #[test]
    fn intensity_change_schedules_shadow_rebuild() {
        let mut a = app();
        a.apply(Action::IntensityUp);
        assert!(a.rebuild_shadow);
        assert!((a.state.shadows.intensity() - 0.7).abs() < 1e-6);

        // Already at the limit: nothing to rebuild.
        let mut a = ViewerApp::new(ViewerConfig { shadow_intensity: 1.0, ..ViewerConfig::default() });
        a.apply(Action::IntensityUp);
        assert!(!a.rebuild_shadow);
    }

    #[test]
    fn light_actions_update_rig() {
        let mut a = app();
        a.apply(Action::PrevLight);
        assert_eq!(a.state.rig.index(), 7);
        a.apply(Action::SelectLight(2));
        assert_eq!(a.state.rig.index(), 2);
        a.apply(Action::PresetHint(9));
        assert_eq!(a.state.rig.index(), 2);
        a.apply(Action::ToggleLighting);
        assert!(!a.state.rig.enabled());
    }

    #[test]
    fn view_actions_update_view() {
        let mut a = app();
        a.apply(Action::ZoomIn);
        a.apply(Action::ZoomIn);
        assert!(a.state.view.zoom > 1.2);
        a.apply(Action::ResetView);
        assert_eq!(a.state.view, ViewState::default());
        a.apply(Action::ReloadTexture);
        assert!(a.reload_texture);
    }
}
