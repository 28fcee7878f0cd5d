//! Viewer Core
//!
//! The [`Viewer`] owns everything that is not a GPU resource: the scene with
//! its camera and lights, the orbit controls, and the model loading
//! lifecycle. The application shell feeds it input and a time step once per
//! frame; the renderer reads the resulting scene.
//!
//! Loading is asynchronous. [`Viewer::load`] hands the work to the asset
//! runtime and returns immediately; finished geometry surfaces through a
//! channel and is swapped into the scene during [`Viewer::update`]. Every
//! call to `load` bumps a generation counter, so a model picked while a slow
//! download is still in flight cannot be overwritten by the stale result.

use glam::Vec3;

use crate::app::input::Input;
use crate::assets::{self, LoadEvent, LoadMessage, MeshSource};
use crate::resources::{Geometry, Material, MaterialFeatures, Mesh, Topology};
use crate::scene::{Camera, Light, Scene};
use crate::settings::ViewerSettings;
use crate::utils::OrbitControls;

// ============================================================================
// Delegate
// ============================================================================

/// Callbacks for the model loading lifecycle.
///
/// All methods have no-op defaults. The viewer invokes them on the main
/// thread from [`Viewer::update`], never from a worker.
pub trait ViewerDelegate {
    /// Loading flipped on (`load` was called) or off (the load finished,
    /// successfully or not).
    #[allow(unused_variables)]
    fn on_loading_changed(&mut self, loading: bool) {}

    /// Bytes received so far; `total` when the source reports a size.
    #[allow(unused_variables)]
    fn on_progress(&mut self, loaded: u64, total: Option<u64>) {}

    /// A load failed. The previous model, if any, stays on screen.
    #[allow(unused_variables)]
    fn on_error(&mut self, message: &str) {}
}

/// Default delegate that forwards every event to the logger.
pub struct LogDelegate;

impl ViewerDelegate for LogDelegate {
    fn on_loading_changed(&mut self, loading: bool) {
        if loading {
            log::info!("Loading model...");
        } else {
            log::info!("Loading finished");
        }
    }

    fn on_progress(&mut self, loaded: u64, total: Option<u64>) {
        match total {
            Some(total) if total > 0 => {
                log::debug!("{:.0}% loaded", loaded as f64 / total as f64 * 100.0);
            }
            _ => log::debug!("{loaded} bytes loaded"),
        }
    }

    fn on_error(&mut self, message: &str) {
        log::error!("{message}");
    }
}

// ============================================================================
// Viewer
// ============================================================================

pub struct Viewer {
    scene: Scene,
    pub controls: OrbitControls,
    delegate: Box<dyn ViewerDelegate>,

    sender: flume::Sender<LoadMessage>,
    events: flume::Receiver<LoadMessage>,
    /// Bumped on every `load` and `clear`; messages from older loads are
    /// dropped unseen.
    generation: u64,
    loading: bool,

    tint: Vec3,
}

impl Viewer {
    /// Builds the fixed scene: perspective camera on the +Z axis, one white
    /// ambient light and one white directional light shining from (1, 1, 1).
    #[must_use]
    pub fn new(settings: &ViewerSettings) -> Self {
        let aspect = settings.width as f32 / settings.height.max(1) as f32;
        let camera =
            Camera::new_perspective(settings.fov_degrees, aspect, settings.near, settings.far);

        let mut scene = Scene::new(camera);
        scene.background = settings.background;
        scene.add_light(Light::new_ambient(Vec3::ONE, 1.0));
        scene.add_light(Light::new_directional(Vec3::ONE, 1.5, Vec3::ONE));

        let mut controls = OrbitControls::new(Vec3::ZERO, settings.camera_distance);
        controls.rotate_speed = settings.rotate_speed;
        controls.zoom_speed = settings.zoom_speed;
        controls.pan_speed = settings.pan_speed;
        controls.damping_factor = settings.damping_factor;

        let (sender, events) = flume::unbounded();

        let mut viewer = Self {
            scene,
            controls,
            delegate: Box::new(LogDelegate),
            sender,
            events,
            generation: 0,
            loading: false,
            tint: settings.tint,
        };
        // Place the camera before the first frame.
        viewer.controls.step(&mut viewer.scene.camera.transform, 0.0);
        viewer
    }

    /// Replaces the delegate receiving lifecycle callbacks.
    pub fn set_delegate(&mut self, delegate: Box<dyn ViewerDelegate>) {
        self.delegate = delegate;
    }

    /// Starts loading `source`; the finished model replaces the current one.
    ///
    /// Fetching and decoding run off the main thread. Calling `load` again
    /// before the previous load finishes supersedes it.
    pub fn load(&mut self, source: MeshSource) {
        self.generation += 1;
        self.set_loading(true);
        log::info!("Loading {source}");
        assets::spawn_load(source, self.generation, self.sender.clone());
    }

    /// Removes the current model and ignores any load still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.scene.clear_model();
        self.set_loading(false);
    }

    /// Per-frame tick: advances the damped camera motion and applies
    /// finished loads.
    pub fn update(&mut self, input: &Input, dt: f32) {
        let fov_degrees = self.scene.camera.fov.to_degrees();
        self.controls.absorb(input, fov_degrees);
        self.controls.step(&mut self.scene.camera.transform, dt);

        self.poll_load_events();
    }

    /// Keeps the camera projection in sync with the window's pixel size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.scene.camera.set_aspect(width as f32 / height as f32);
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.delegate.on_loading_changed(loading);
        }
    }

    fn poll_load_events(&mut self) {
        while let Ok(message) = self.events.try_recv() {
            if message.generation != self.generation {
                // Superseded by a newer load or a clear.
                continue;
            }
            match message.event {
                LoadEvent::Progress { loaded, total } => {
                    self.delegate.on_progress(loaded, total);
                }
                LoadEvent::Loaded(geometry) => {
                    self.install_geometry(geometry);
                    self.set_loading(false);
                }
                LoadEvent::Failed(error) => {
                    self.delegate.on_error(&error.to_string());
                    self.set_loading(false);
                }
            }
        }
    }

    /// Prepares freshly decoded geometry for display and swaps it into the
    /// scene: fit into the view volume, synthesize normals when the file has
    /// none, then pick the material features the attributes call for.
    fn install_geometry(&mut self, mut geometry: Geometry) {
        geometry.normalize_to_view_volume();
        if geometry.normals.is_none() {
            geometry.compute_vertex_normals();
        }

        let mut features = MaterialFeatures::empty();
        if geometry.has_vertex_colors() {
            features |= MaterialFeatures::USE_VERTEX_COLORS;
        }
        if geometry.topology() == Topology::PointList {
            // No faces means no meaningful normals; skip lighting.
            features |= MaterialFeatures::UNLIT;
        }

        log::info!(
            "Model ready: {} vertices, {} triangles",
            geometry.vertex_count(),
            geometry.triangle_count(),
        );

        let material = Material::new(self.tint).with_features(features);
        let mesh = Mesh::new(geometry, material).with_name("Model");
        self.scene.set_model(mesh);
    }
}
