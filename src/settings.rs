//! Viewer Configuration

use glam::Vec3;

use crate::resources::material::{DEFAULT_TINT, rgb_from_hex};

/// Default background color, a near-black purple.
pub const DEFAULT_BACKGROUND: u32 = 0x000b_0114;

/// Global configuration for the viewer.
///
/// Consumed once at startup to size the window, place the camera and tune
/// the orbit controls. Runtime changes go through the live [`Viewer`] and
/// [`OrbitControls`] instead.
///
/// | Field             | Description                             | Default     |
/// |-------------------|-----------------------------------------|-------------|
/// | `title`           | Window title                            | `"plyview"` |
/// | `width`/`height`  | Initial window size (logical pixels)    | 1280 x 720  |
/// | `vsync`           | Vertical sync enabled                   | `true`      |
/// | `fov_degrees`     | Vertical field of view                  | 75          |
/// | `camera_distance` | Initial orbit radius                    | 5           |
/// | `background`      | Clear color (linear RGB)                | dark purple |
/// | `tint`            | Base color applied to every model       | pale violet |
///
/// [`Viewer`]: crate::viewer::Viewer
/// [`OrbitControls`]: crate::utils::OrbitControls
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    // === Window ===
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// When `true`, the frame rate is capped to the display refresh rate.
    pub vsync: bool,

    // === Camera ===
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance between the camera and the model center at startup.
    pub camera_distance: f32,

    // === Appearance ===
    /// Background clear color, linear RGB.
    pub background: Vec3,
    /// Base color multiplied into every model, linear RGB.
    pub tint: Vec3,

    // === Controls ===
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Per-frame retention exponent for camera glide; higher settles faster.
    pub damping_factor: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "plyview".into(),
            width: 1280,
            height: 720,
            vsync: true,

            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_distance: 5.0,

            background: rgb_from_hex(DEFAULT_BACKGROUND),
            tint: rgb_from_hex(DEFAULT_TINT),

            rotate_speed: 5.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
            damping_factor: 0.3,
        }
    }
}
