//! Globus viewer: a textured, lit globe above a floor, with a stylized drop
//! shadow that follows a movable point light.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use globus_viewer::Viewer;
//!
//! Viewer::new().title("Globus").run()?;
//! ```
//!
//! The domain pieces are usable without a window:
//! - [`shadow`]: planar shadow projection and ellipse shaping
//! - [`procedural`]: checkerboard, soft-shadow and world-map textures
//! - [`loader`]: texture file discovery with procedural fallback
//! - [`light`], [`view`], [`controls`]: interaction state
//! - [`compose`]: per-frame draw stream

mod app;
pub mod compose;
pub mod config;
pub mod controls;
pub mod light;
pub mod loader;
pub mod procedural;
pub mod shadow;
pub mod view;

pub use app::Viewer;
pub use config::{SceneLayout, ViewerConfig};
pub use loader::Fallback;
