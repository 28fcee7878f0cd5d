#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod assets;
pub mod errors;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;
pub mod viewer;

pub use app::App;
pub use assets::MeshSource;
pub use errors::{Result, ViewerError};
pub use render::Renderer;
pub use resources::{Geometry, Material, Mesh};
pub use scene::{Camera, Light, Scene};
pub use settings::ViewerSettings;
pub use utils::OrbitControls;
pub use viewer::{LogDelegate, Viewer, ViewerDelegate};
