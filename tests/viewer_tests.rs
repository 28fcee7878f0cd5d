//! Viewer Lifecycle Tests
//!
//! Tests for:
//! - Initial scene setup (camera, lights, background)
//! - Asynchronous loading of local files into the scene
//! - Delegate callbacks for loading, progress and errors
//! - Generation discipline: clears and reloads drop stale results
//! - Material feature selection from decoded attributes
//! - Source string parsing

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use glam::{Vec2, Vec3};

use plyview::ViewerError;
use plyview::app::input::Input;
use plyview::assets::{MeshSource, load_geometry_blocking};
use plyview::resources::geometry::{TARGET_SIZE, Topology};
use plyview::settings::ViewerSettings;
use plyview::viewer::{Viewer, ViewerDelegate};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// Fixtures
// ============================================================================

/// Triangle 10 units off the origin whose largest extent is already 3,
/// so normalization reduces to pure recentering.
const TRIANGLE_PLY: &[u8] = b"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
10 0 0
13 0 0
10 3 0
3 0 1 2
";

const POINTS_PLY: &[u8] = b"ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
end_header
0 0 0
1 1 1
";

const COLORED_PLY: &[u8] = b"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
element face 1
property list uchar int vertex_indices
end_header
0 0 0 255 0 0
1 0 0 0 255 0
0 1 0 0 0 255
3 0 1 2
";

fn write_temp_ply(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("plyview_test_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).expect("Should write fixture");
    path
}

/// Pumps the viewer until the in-flight load finishes or a generous
/// timeout elapses.
fn pump_until_loaded(viewer: &mut Viewer) {
    let input = Input::new();
    for _ in 0..500 {
        if !viewer.is_loading() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
        viewer.update(&input, 1.0 / 60.0);
    }
    assert!(!viewer.is_loading(), "Load did not finish within 5 seconds");
}

/// Pumps a fixed number of frames regardless of loading state.
fn pump_frames(viewer: &mut Viewer, frames: usize) {
    let input = Input::new();
    for _ in 0..frames {
        thread::sleep(Duration::from_millis(10));
        viewer.update(&input, 1.0 / 60.0);
    }
}

// ============================================================================
// Delegate Spy
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum DelegateEvent {
    Loading(bool),
    Progress(u64, Option<u64>),
    Error(String),
}

struct SpyDelegate {
    events: Arc<Mutex<Vec<DelegateEvent>>>,
}

impl ViewerDelegate for SpyDelegate {
    fn on_loading_changed(&mut self, loading: bool) {
        self.events.lock().unwrap().push(DelegateEvent::Loading(loading));
    }

    fn on_progress(&mut self, loaded: u64, total: Option<u64>) {
        self.events
            .lock()
            .unwrap()
            .push(DelegateEvent::Progress(loaded, total));
    }

    fn on_error(&mut self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(DelegateEvent::Error(message.to_string()));
    }
}

fn spied_viewer() -> (Viewer, Arc<Mutex<Vec<DelegateEvent>>>) {
    let mut viewer = Viewer::new(&ViewerSettings::default());
    let events = Arc::new(Mutex::new(Vec::new()));
    viewer.set_delegate(Box::new(SpyDelegate {
        events: events.clone(),
    }));
    (viewer, events)
}

fn loading_flips(events: &[DelegateEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            DelegateEvent::Loading(value) => Some(*value),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Initial State
// ============================================================================

#[test]
fn viewer_starts_with_fixed_scene() {
    let settings = ViewerSettings::default();
    let viewer = Viewer::new(&settings);
    let scene = viewer.scene();

    assert!(vec3_approx(
        scene.camera.transform.position,
        Vec3::new(0.0, 0.0, settings.camera_distance)
    ));
    assert!(vec3_approx(scene.background, settings.background));
    assert_eq!(scene.lights.len(), 2, "One ambient plus one directional");
    assert!(scene.model().is_none());
    assert!(!viewer.is_loading());
}

#[test]
fn set_viewport_updates_camera_aspect() {
    let mut viewer = Viewer::new(&ViewerSettings::default());

    viewer.set_viewport(200, 100);
    assert!(approx(viewer.scene().camera.aspect, 2.0));

    // A minimized window must not poison the projection.
    viewer.set_viewport(0, 100);
    assert!(approx(viewer.scene().camera.aspect, 2.0));
}

#[test]
fn update_drives_orbit_controls() {
    let mut viewer = Viewer::new(&ViewerSettings::default());

    let mut input = Input::new();
    input.screen_size = Vec2::new(800.0, 600.0);
    input.cursor_delta = Vec2::new(40.0, 0.0);
    input.mouse_buttons.insert(winit::event::MouseButton::Left);

    viewer.update(&input, 1.0 / 60.0);

    let position = viewer.scene().camera.transform.position;
    assert!(
        !vec3_approx(position, Vec3::new(0.0, 0.0, 5.0)),
        "A drag should move the camera off its starting pose"
    );
    assert!(approx(position.length(), 5.0), "Orbiting keeps the distance");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load_file_installs_normalized_model() {
    let path = write_temp_ply("triangle.ply", TRIANGLE_PLY);
    let (mut viewer, events) = spied_viewer();

    viewer.load(MeshSource::from(path.as_path()));
    assert!(viewer.is_loading(), "load() flips loading synchronously");

    pump_until_loaded(&mut viewer);
    std::fs::remove_file(&path).ok();

    let model = viewer.scene().model().expect("Model should be installed");
    assert_eq!(model.name, "Model");

    let bb = model.geometry.compute_bounding_box();
    assert!(vec3_approx(bb.center(), Vec3::ZERO), "Model is recentered");
    assert!(approx(bb.size().x, TARGET_SIZE), "Largest extent fits the view volume");

    assert!(
        model.geometry.normals.is_some(),
        "Missing normals are synthesized on install"
    );
    assert!(!model.material.uses_vertex_colors());
    assert!(!model.material.is_unlit());

    let events = events.lock().unwrap().clone();
    assert_eq!(loading_flips(&events), vec![true, false]);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, DelegateEvent::Progress(_, Some(_)))),
        "File loads report sized progress"
    );
}

#[test]
fn point_cloud_gets_unlit_material() {
    let path = write_temp_ply("points.ply", POINTS_PLY);
    let mut viewer = Viewer::new(&ViewerSettings::default());

    viewer.load(MeshSource::from(path.as_path()));
    pump_until_loaded(&mut viewer);
    std::fs::remove_file(&path).ok();

    let model = viewer.scene().model().expect("Model should be installed");
    assert_eq!(model.geometry.topology(), Topology::PointList);
    assert!(model.material.is_unlit());
}

#[test]
fn vertex_colors_switch_the_material_over() {
    let path = write_temp_ply("colored.ply", COLORED_PLY);
    let mut viewer = Viewer::new(&ViewerSettings::default());

    viewer.load(MeshSource::from(path.as_path()));
    pump_until_loaded(&mut viewer);
    std::fs::remove_file(&path).ok();

    let model = viewer.scene().model().expect("Model should be installed");
    assert!(model.material.uses_vertex_colors());
    assert!(!model.material.is_unlit());
}

#[test]
fn failed_load_reports_error_and_keeps_previous_model() {
    let path = write_temp_ply("keeper.ply", TRIANGLE_PLY);
    let (mut viewer, events) = spied_viewer();

    viewer.load(MeshSource::from(path.as_path()));
    pump_until_loaded(&mut viewer);
    std::fs::remove_file(&path).ok();

    let kept_uuid = viewer.scene().model().expect("First load succeeds").geometry.uuid;

    viewer.load(MeshSource::parse("/nonexistent/plyview/missing.ply"));
    pump_until_loaded(&mut viewer);

    let model = viewer.scene().model().expect("Previous model must survive");
    assert_eq!(model.geometry.uuid, kept_uuid);

    let events = events.lock().unwrap().clone();
    let errors: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, DelegateEvent::Error(_)))
        .collect();
    assert_eq!(errors.len(), 1, "Exactly one error per failed load");
    assert_eq!(loading_flips(&events), vec![true, false, true, false]);
}

#[test]
fn corrupt_file_surfaces_a_parse_error() {
    let path = write_temp_ply("corrupt.ply", b"obj\nformat ascii 1.0\nend_header\n");
    let (mut viewer, events) = spied_viewer();

    viewer.load(MeshSource::from(path.as_path()));
    pump_until_loaded(&mut viewer);
    std::fs::remove_file(&path).ok();

    assert!(viewer.scene().model().is_none(), "Nothing to install");

    let events = events.lock().unwrap().clone();
    let messages: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            DelegateEvent::Error(message) => Some(message.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(messages.len(), 1);
    assert!(
        messages[0].contains("not a PLY file"),
        "Parse failure should reach the delegate: {}",
        messages[0]
    );
    assert_eq!(loading_flips(&events), vec![true, false]);
}

#[test]
fn clear_drops_an_in_flight_load() {
    let path = write_temp_ply("dropped.ply", TRIANGLE_PLY);
    let (mut viewer, events) = spied_viewer();

    viewer.load(MeshSource::from(path.as_path()));
    viewer.clear();
    assert!(!viewer.is_loading());

    // Give the worker ample time to finish; its result must be ignored.
    pump_frames(&mut viewer, 50);
    std::fs::remove_file(&path).ok();

    assert!(
        viewer.scene().model().is_none(),
        "A cleared viewer must not resurrect a stale load"
    );
    assert!(!viewer.is_loading());

    let events = events.lock().unwrap().clone();
    assert_eq!(loading_flips(&events), vec![true, false]);
}

#[test]
fn reload_supersedes_the_previous_load() {
    let keeper = write_temp_ply("superseded_keeper.ply", TRIANGLE_PLY);
    let points = write_temp_ply("superseded_points.ply", POINTS_PLY);
    let mut viewer = Viewer::new(&ViewerSettings::default());

    // Two loads back to back; only the second may land.
    viewer.load(MeshSource::from(keeper.as_path()));
    viewer.load(MeshSource::from(points.as_path()));
    pump_until_loaded(&mut viewer);
    pump_frames(&mut viewer, 20);

    std::fs::remove_file(&keeper).ok();
    std::fs::remove_file(&points).ok();

    let model = viewer.scene().model().expect("Second load should land");
    assert_eq!(
        model.geometry.topology(),
        Topology::PointList,
        "The superseding load wins regardless of completion order"
    );
}

// ============================================================================
// Blocking Loader
// ============================================================================

#[test]
fn load_geometry_blocking_reads_a_file() {
    let path = write_temp_ply("blocking.ply", TRIANGLE_PLY);
    let geometry =
        load_geometry_blocking(&MeshSource::from(path.as_path())).expect("Should load");
    std::fs::remove_file(&path).ok();

    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.triangle_count(), 1);
}

#[test]
fn load_geometry_blocking_surfaces_io_errors() {
    let err = load_geometry_blocking(&MeshSource::parse("/nonexistent/plyview/missing.ply"))
        .expect_err("Missing file must fail");
    assert!(matches!(err, ViewerError::IoError(_)), "got {err:?}");
}

// ============================================================================
// Source Parsing
// ============================================================================

#[test]
fn source_strings_split_into_http_and_file() {
    assert!(matches!(
        MeshSource::parse("https://example.com/models/brain.ply"),
        MeshSource::Http(_)
    ));
    assert!(matches!(
        MeshSource::parse("http://example.com/mesh.ply"),
        MeshSource::Http(_)
    ));
    assert!(matches!(
        MeshSource::parse("meshes/skull.ply"),
        MeshSource::File(_)
    ));
    assert!(matches!(MeshSource::parse("C:\\meshes\\skull.ply"), MeshSource::File(_)));
}

#[test]
fn source_filename_extraction() {
    assert_eq!(
        MeshSource::parse("https://example.com/models/brain.ply").filename(),
        "brain.ply"
    );
    assert_eq!(MeshSource::parse("meshes/skull.ply").filename(), "skull.ply");
}
