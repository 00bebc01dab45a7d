//! Globus engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window loop, device, input, timing, logging, CPU-side mesh and texture
//! data, the draw stream, and the scene renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod geometry;
pub mod paint;
pub mod render;
pub mod scene;
pub mod texture;
