//! CPU-side texture images.
//!
//! `TextureData` is what procedural generators and file loaders produce and
//! what the renderer uploads. Pixels are always tightly packed RGBA8, rows
//! top to bottom.

mod data;

pub use data::{TextureData, TextureDataError, WrapMode};
