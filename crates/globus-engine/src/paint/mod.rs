//! Colour model shared between the viewer and renderers.
//!
//! Colours are linear, straight-alpha RGBA. Constructors that take sRGB
//! input decode it so that values authored against an sRGB display look the
//! same on an sRGB swapchain.

pub mod color;

pub use color::Color;
