//! GPU Rendering
//!
//! Everything that touches wgpu lives here: device and surface management in
//! [`context`], pipelines and per-frame drawing in [`renderer`].

pub mod context;
pub mod renderer;

pub use context::GpuContext;
pub use renderer::Renderer;
