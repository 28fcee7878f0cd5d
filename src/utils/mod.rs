//! Utilities
//!
//! Small helpers shared by the app layer:
//! - [`OrbitControls`]: damped orbit / pan / zoom camera driver
//! - [`FpsCounter`]: windowed frame-rate measurement
//! - [`Timer`]: per-frame delta time source

pub mod fps_counter;
pub mod orbit_control;
pub mod time;

pub use fps_counter::FpsCounter;
pub use orbit_control::OrbitControls;
pub use time::Timer;
