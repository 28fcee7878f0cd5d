//! GPU Context
//!
//! Owns the machinery every frame depends on: the wgpu device and queue,
//! the window surface, and the depth buffer whose size tracks the surface.
//! Created once when the window opens; afterwards the only mutation is
//! [`resize`](GpuContext::resize).

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::errors::{Result, ViewerError};

/// Device, queue and surface bundle for one window.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,

    pub depth_format: wgpu::TextureFormat,
    /// Replaced together with the surface configuration on resize.
    pub depth_texture_view: wgpu::TextureView,
    /// Clear color for the next frame, refreshed from the scene background.
    pub clear_color: wgpu::Color,
}

impl GpuContext {
    /// Brings up the GPU for `window` and configures its surface.
    ///
    /// # Errors
    ///
    /// Fails when no compatible adapter exists, when the device request is
    /// denied, or when the surface cannot be configured for the adapter.
    pub async fn new<W>(window: W, width: u32, height: u32, vsync: bool) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::AdapterRequestFailed(e.to_string()))?;
        log::debug!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or_else(|| {
                ViewerError::AdapterRequestFailed("Surface not supported by adapter".to_string())
            })?;
        config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let depth_texture_view = create_depth_texture(&device, width, height, depth_format);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth_format,
            depth_texture_view,
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Reconfigures the surface and depth buffer for a new pixel size.
    ///
    /// Zero-sized requests (minimized window) are ignored; the surface
    /// keeps its previous configuration until a usable size arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture_view =
            create_depth_texture(&self.device, width, height, self.depth_format);
    }

    /// Texture format the surface presents in.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    #[inline]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture_view
    }

    /// Current surface size in pixels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
