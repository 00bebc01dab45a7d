//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning the depth and multisample attachments that track the surface size
//! - acquiring frames and providing encoders/views for rendering

mod attachments;
mod gpu;
mod surface;

pub use attachments::{FrameAttachments, DEPTH_FORMAT};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
