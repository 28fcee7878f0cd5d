//! Orbit Control Tests
//!
//! Tests for:
//! - Initial camera placement on the +Z axis
//! - Left-drag orbiting with damped glide
//! - Scroll zoom with distance clamping
//! - Right-drag panning of the focus point
//! - Pole clamping and numerical stability
//! - Input event accumulation and per-frame reset

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use plyview::app::input::Input;
use plyview::scene::transform::Transform;
use plyview::utils::orbit_control::OrbitControls;

const EPSILON: f32 = 1e-3;
const FOV_DEGREES: f32 = 75.0;
const DT: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn rig() -> (OrbitControls, Transform) {
    (OrbitControls::new(Vec3::ZERO, 5.0), Transform::new())
}

/// Input snapshot for one frame of dragging with `button` held.
fn drag_input(button: MouseButton, delta: Vec2) -> Input {
    let mut input = Input::new();
    input.screen_size = Vec2::new(800.0, 600.0);
    input.cursor_delta = delta;
    input.mouse_buttons.insert(button);
    input
}

fn scroll_input(lines: f32) -> Input {
    let mut input = Input::new();
    input.screen_size = Vec2::new(800.0, 600.0);
    input.scroll_delta = Vec2::new(0.0, lines);
    input
}

/// Runs enough damped steps for pending motion to bleed out completely.
fn settle(controls: &mut OrbitControls, transform: &mut Transform) {
    for _ in 0..120 {
        controls.step(transform, DT);
    }
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn initial_step_places_camera_on_positive_z() {
    let (mut controls, mut transform) = rig();
    controls.step(&mut transform, 0.0);

    assert!(vec3_approx(transform.position, Vec3::new(0.0, 0.0, 5.0)));
    assert!(!controls.is_coasting());

    let forward = transform.rotation * Vec3::NEG_Z;
    assert!(
        vec3_approx(forward, Vec3::NEG_Z),
        "Camera should look at the origin"
    );
}

#[test]
fn idle_controls_hold_position() {
    let (mut controls, mut transform) = rig();
    settle(&mut controls, &mut transform);

    assert!(vec3_approx(transform.position, Vec3::new(0.0, 0.0, 5.0)));
    assert!(approx(controls.radius, 5.0));
    assert!(approx(controls.theta, 0.0));
    assert!(approx(controls.phi, FRAC_PI_2));
}

// ============================================================================
// Orbiting
// ============================================================================

#[test]
fn horizontal_drag_orbits_around_target() {
    let (mut controls, mut transform) = rig();

    // 60 px on a 600 px screen at rotate_speed 5 is exactly pi radians.
    controls.absorb(&drag_input(MouseButton::Left, Vec2::new(60.0, 0.0)), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    assert!(approx(controls.theta, -PI));
    assert!(
        vec3_approx(transform.position, Vec3::new(0.0, 0.0, -5.0)),
        "Half a revolution lands on the opposite side"
    );
    assert!(approx(controls.radius, 5.0), "Orbiting must not change distance");
    assert!(!controls.is_coasting());
}

#[test]
fn vertical_drag_changes_polar_angle() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&drag_input(MouseButton::Left, Vec2::new(0.0, 10.0)), FOV_DEGREES);
    controls.step(&mut transform, DT);

    assert!(
        controls.phi < FRAC_PI_2,
        "Downward drag should raise the camera toward the top pole"
    );
    assert!(approx(controls.theta, 0.0));
}

#[test]
fn damping_spreads_a_drag_over_frames() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&drag_input(MouseButton::Left, Vec2::new(60.0, 0.0)), FOV_DEGREES);
    controls.step(&mut transform, DT);

    let after_one = controls.theta;
    assert!(after_one > -PI, "One damped frame applies only part of the drag");
    assert!(controls.is_coasting(), "Remaining motion keeps coasting");

    settle(&mut controls, &mut transform);
    assert!(approx(controls.theta, -PI));
    assert!(!controls.is_coasting());
}

#[test]
fn disabling_damping_applies_input_immediately() {
    let (mut controls, mut transform) = rig();
    controls.enable_damping = false;

    controls.absorb(&drag_input(MouseButton::Left, Vec2::new(60.0, 0.0)), FOV_DEGREES);
    controls.step(&mut transform, DT);

    assert!(approx(controls.theta, -PI), "Whole drag lands in a single step");
    assert!(!controls.is_coasting());
}

#[test]
fn extreme_vertical_drag_is_clamped_at_the_poles() {
    let (mut controls, mut transform) = rig();

    controls.absorb(
        &drag_input(MouseButton::Left, Vec2::new(0.0, 100_000.0)),
        FOV_DEGREES,
    );
    settle(&mut controls, &mut transform);

    assert!(controls.phi > 0.0, "Polar angle never reaches the pole itself");
    assert!(controls.phi < PI);
    assert!(transform.position.is_finite());
    assert!(
        approx(transform.position.y, 5.0),
        "Fully clamped camera sits essentially at the top pole"
    );
}

// ============================================================================
// Zooming
// ============================================================================

#[test]
fn scroll_up_zooms_in() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&scroll_input(1.0), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    // One line at zoom_speed 1.2 scales the distance by 1 - 0.05 * 1.2.
    assert!(approx(controls.radius, 5.0 * 0.94));
    assert!(approx(transform.position.z, 5.0 * 0.94));
}

#[test]
fn scroll_down_zooms_out() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&scroll_input(-1.0), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    assert!(approx(controls.radius, 5.0 / 0.94));
}

#[test]
fn zoom_clamps_to_min_distance() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&scroll_input(500.0), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    assert!(approx(controls.radius, controls.min_distance));
    assert!(transform.position.is_finite());
}

#[test]
fn zoom_clamps_to_max_distance() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&scroll_input(-500.0), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    assert!(approx(controls.radius, controls.max_distance));
}

// ============================================================================
// Panning
// ============================================================================

#[test]
fn right_drag_pans_the_focus_point() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&drag_input(MouseButton::Right, Vec2::new(50.0, 0.0)), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    // The pan distance is sized so the grabbed point tracks the cursor:
    // 50 px of an 800x600 view whose height spans 2 * r * tan(fov / 2).
    let world_per_pixel = 2.0 * 5.0 * (FOV_DEGREES.to_radians() / 2.0).tan() / 600.0;
    let expected_x = -50.0 * world_per_pixel * controls.pan_speed;

    assert!(approx(controls.center.x, expected_x));
    assert!(approx(controls.center.y, 0.0));
    assert!(
        approx(transform.position.x, expected_x),
        "Camera keeps its offset from the panned center"
    );
    assert!(approx(transform.position.z, 5.0));
    assert!(approx(controls.radius, 5.0), "Panning must not change distance");
}

#[test]
fn vertical_pan_follows_screen_up() {
    let (mut controls, mut transform) = rig();

    controls.absorb(&drag_input(MouseButton::Right, Vec2::new(0.0, 40.0)), FOV_DEGREES);
    settle(&mut controls, &mut transform);

    assert!(
        controls.center.y > 0.0,
        "Dragging down moves the scene down, so the focus moves up"
    );
    assert!(approx(controls.center.x, 0.0));
    assert!(approx(transform.position.y - controls.center.y, 0.0));
}

// ============================================================================
// Input Accumulation
// ============================================================================

#[test]
fn first_cursor_event_produces_no_delta() {
    let mut input = Input::new();
    input.handle_cursor_move(400.0, 300.0);

    assert!(approx(input.cursor_delta.x, 0.0));
    assert!(approx(input.cursor_delta.y, 0.0));

    input.handle_cursor_move(410.0, 280.0);
    assert!(approx(input.cursor_delta.x, 10.0));
    assert!(approx(input.cursor_delta.y, -20.0));
}

#[test]
fn cursor_deltas_accumulate_within_a_frame() {
    let mut input = Input::new();
    input.handle_cursor_move(0.0, 0.0);
    input.handle_cursor_move(5.0, 0.0);
    input.handle_cursor_move(12.0, 3.0);

    assert!(approx(input.cursor_delta.x, 12.0));
    assert!(approx(input.cursor_delta.y, 3.0));
}

#[test]
fn end_frame_clears_deltas_but_keeps_buttons() {
    let mut input = Input::new();
    input.handle_cursor_move(0.0, 0.0);
    input.handle_cursor_move(5.0, 5.0);
    input.handle_mouse_input(ElementState::Pressed, MouseButton::Left);
    input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 2.0));

    input.end_frame();

    assert!(approx(input.cursor_delta.x, 0.0));
    assert!(approx(input.scroll_delta.y, 0.0));
    assert!(
        input.is_button_pressed(MouseButton::Left),
        "A held button survives the frame boundary"
    );

    input.handle_mouse_input(ElementState::Released, MouseButton::Left);
    assert!(!input.is_button_pressed(MouseButton::Left));
}

#[test]
fn pixel_scroll_is_scaled_to_lines() {
    let mut input = Input::new();
    input.handle_mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
        0.0, 50.0,
    )));

    assert!(approx(input.scroll_delta.y, 5.0));
}
