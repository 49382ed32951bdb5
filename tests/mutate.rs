use approx::assert_relative_eq;
use glam::{Quat, Vec3};
use scaffold::edit::{apply_gesture, apply_point_delta, selection_points, EditGesture};
use scaffold::error::SketchError;
use scaffold::model::{Line, LineRole, Point};
use scaffold::State;

fn vertex(x: f32, y: f32, z: f32) -> Point {
    Point::Vertex { x, y, z }
}

fn tick(t: f32, ref_a: u32, ref_b: u32) -> Point {
    Point::Tick { t, ref_a, ref_b }
}

fn line(start: u32, end: u32) -> Line {
    Line {
        start,
        end,
        role: LineRole::Free,
    }
}

fn state_with(points: Vec<Point>, lines: Vec<Line>) -> State {
    State::from_parts(points, lines, vec![], vec![])
}

#[test]
fn move_point_overwrites_vertex_and_ignores_t() {
    let mut state = state_with(vec![vertex(0.0, 0.0, 0.0)], vec![]);
    state.move_point(0, Vec3::new(3.0, -1.0, 2.0), 0.9).unwrap();
    assert_eq!(state.resolve(0).unwrap(), Vec3::new(3.0, -1.0, 2.0));
}

#[test]
fn move_point_on_tick_sets_clamped_t_and_ignores_position() {
    let mut state = state_with(
        vec![vertex(0.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0), tick(0.5, 0, 1)],
        vec![],
    );
    state.move_point(2, Vec3::new(99.0, 99.0, 99.0), 1.5).unwrap();
    assert_eq!(state.resolve(2).unwrap(), Vec3::new(2.0, 0.0, 0.0));
    state.move_point(2, Vec3::ZERO, -0.5).unwrap();
    assert_eq!(state.resolve(2).unwrap(), Vec3::new(0.0, 0.0, 0.0));
}

#[test]
fn move_line_sets_both_vertex_endpoints() {
    let mut state = state_with(
        vec![vertex(0.0, 0.0, 0.0), vertex(1.0, 0.0, 0.0)],
        vec![line(0, 1)],
    );
    state
        .move_line(0, Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(state.resolve(0).unwrap(), Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(state.resolve(1).unwrap(), Vec3::new(2.0, 2.0, 2.0));
}

#[test]
fn move_line_with_tick_endpoint_is_rejected_without_mutation() {
    let points = vec![
        vertex(0.0, 0.0, 0.0),
        vertex(4.0, 0.0, 0.0),
        tick(0.5, 0, 1),
    ];
    let mut state = state_with(points, vec![line(0, 2)]);
    let before = state.clone();

    let err = state
        .move_line(0, Vec3::new(9.0, 9.0, 9.0), Vec3::new(8.0, 8.0, 8.0))
        .unwrap_err();
    assert!(matches!(err, SketchError::UnsupportedOperation(_)));
    assert_eq!(state, before);
}

#[test]
fn move_line_out_of_range_is_reported() {
    let mut state = state_with(vec![], vec![]);
    assert!(matches!(
        state.move_line(3, Vec3::ZERO, Vec3::ZERO),
        Err(SketchError::IndexOutOfRange { kind: "line", .. })
    ));
}

#[test]
fn selection_deduplicates_shared_endpoints() {
    let state = state_with(
        vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 0.0),
        ],
        vec![line(0, 1), line(1, 2)],
    );
    let selected = selection_points(&state, &[0, 1]).unwrap();
    assert_eq!(selected.len(), 3);
    assert_eq!(selected[&1], Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn translate_gesture_moves_every_selected_point_once() {
    let mut state = state_with(
        vec![
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 0.0),
        ],
        vec![line(0, 1), line(1, 2)],
    );
    apply_gesture(&mut state, &[0, 1], EditGesture::Translate(Vec3::new(0.5, 0.0, 2.0))).unwrap();
    assert_eq!(state.resolve(0).unwrap(), Vec3::new(0.5, 0.0, 2.0));
    assert_eq!(state.resolve(1).unwrap(), Vec3::new(1.5, 0.0, 2.0));
    assert_eq!(state.resolve(2).unwrap(), Vec3::new(1.5, 1.0, 2.0));
}

#[test]
fn scale_gesture_keeps_the_centroid_fixed() {
    let mut state = state_with(
        vec![vertex(-1.0, 0.0, 0.0), vertex(3.0, 0.0, 0.0)],
        vec![line(0, 1)],
    );
    apply_gesture(&mut state, &[0], EditGesture::Scale(2.0)).unwrap();
    assert_eq!(state.resolve(0).unwrap(), Vec3::new(-3.0, 0.0, 0.0));
    assert_eq!(state.resolve(1).unwrap(), Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn rotate_gesture_spins_about_the_centroid() {
    let mut state = state_with(
        vec![vertex(0.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0)],
        vec![line(0, 1)],
    );
    let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    apply_gesture(&mut state, &[0], EditGesture::Rotate(quarter)).unwrap();

    let a = state.resolve(0).unwrap();
    let b = state.resolve(1).unwrap();
    assert_relative_eq!(a, Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-5);
    assert_relative_eq!(b, Vec3::new(1.0, 0.0, -1.0), epsilon = 1e-5);
}

#[test]
fn tick_delta_projects_onto_the_reference_segment() {
    let mut state = state_with(
        vec![vertex(0.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0), tick(0.5, 0, 1)],
        vec![],
    );
    // Only the x component survives projection onto the segment; a delta
    // of +0.5 along a length-2 segment is a +0.25 parameter shift.
    apply_point_delta(&mut state, 2, Vec3::new(0.5, 3.0, 0.0)).unwrap();
    assert_relative_eq!(
        state.resolve(2).unwrap(),
        Vec3::new(1.5, 0.0, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn tick_delta_clamps_at_the_segment_ends() {
    let mut state = state_with(
        vec![vertex(0.0, 0.0, 0.0), vertex(2.0, 0.0, 0.0), tick(0.5, 0, 1)],
        vec![],
    );
    apply_point_delta(&mut state, 2, Vec3::new(100.0, 0.0, 0.0)).unwrap();
    assert_eq!(state.resolve(2).unwrap(), Vec3::new(2.0, 0.0, 0.0));
}
