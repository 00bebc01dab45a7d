use crate::paint::Color;

/// Renderer-facing context (device/queue + target formats + drawable size).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub sample_count: u32,
    /// Drawable size in physical pixels.
    pub width: u32,
    pub height: u32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        (width, height): (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            sample_count,
            width,
            height,
        }
    }

    /// Width / height of the drawable, never zero or NaN.
    #[inline]
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.width, self.height)
    }
}

#[inline]
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Target for drawing (encoder + colour/depth views).
///
/// With MSAA, `color_view` is the multisampled image and `resolve_target` the
/// swapchain view; without it `resolve_target` is `None`.
///
/// `clear` is a pending clear of colour and depth. The first pass recorded
/// into the target takes it and uses it as its load op.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub resolve_target: Option<&'a wgpu::TextureView>,
    pub depth_view: &'a wgpu::TextureView,
    pub clear: Option<Color>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        resolve_target: Option<&'a wgpu::TextureView>,
        depth_view: &'a wgpu::TextureView,
        clear: Option<Color>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            resolve_target,
            depth_view,
            clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::aspect_ratio;

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(aspect_ratio(800, 600), 800.0 / 600.0);
        assert_eq!(aspect_ratio(800, 0), 800.0);
        assert_eq!(aspect_ratio(0, 0), 1.0);
    }
}
