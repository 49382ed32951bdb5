use glam::Vec3;
use proptest::prelude::*;
use scaffold::model::{Line, LineRole, Point};
use scaffold::wire::{encode_message, parse_message, WireCommand};
use scaffold::State;

/// Point tables that are acyclic by construction: a tick only ever
/// references strictly earlier indices, and index 0 is always a vertex.
fn point_table() -> impl Strategy<Value = Vec<Point>> {
    let row = (
        prop::bool::ANY,
        0.0f32..=1.0f32,
        -100.0f32..100.0f32,
        -100.0f32..100.0f32,
        -100.0f32..100.0f32,
        any::<u32>(),
        any::<u32>(),
    );
    prop::collection::vec(row, 1..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (is_tick, t, x, y, z, a, b))| {
                if is_tick && i > 0 {
                    Point::Tick {
                        t,
                        ref_a: a % i as u32,
                        ref_b: b % i as u32,
                    }
                } else {
                    Point::Vertex { x, y, z }
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn acyclic_models_resolve_totally(points in point_table()) {
        let state = State::from_parts(points.clone(), vec![], vec![], vec![]);
        for index in 0..points.len() as u32 {
            prop_assert!(state.resolve(index).is_ok());
        }
    }

    /// A tick's resolved position stays inside the componentwise span of
    /// its two references, because t is in [0, 1].
    #[test]
    fn tick_resolution_stays_between_its_references(points in point_table()) {
        let state = State::from_parts(points.clone(), vec![], vec![], vec![]);
        for (index, point) in points.iter().enumerate() {
            if let Point::Tick { ref_a, ref_b, .. } = *point {
                let p = state.resolve(index as u32).unwrap();
                let a = state.resolve(ref_a).unwrap();
                let b = state.resolve(ref_b).unwrap();
                for axis in 0..3 {
                    let lo = a[axis].min(b[axis]) - 1e-4;
                    let hi = a[axis].max(b[axis]) + 1e-4;
                    prop_assert!(p[axis] >= lo && p[axis] <= hi);
                }
            }
        }
    }

    #[test]
    fn wire_round_trip_is_identity(
        points in point_table(),
        role_picks in prop::collection::vec(0usize..3, 0..8),
    ) {
        let roles = [LineRole::Free, LineRole::HalfConstrained, LineRole::Constrained];
        let lines: Vec<Line> = role_picks
            .iter()
            .enumerate()
            .map(|(i, &pick)| Line {
                start: (i % points.len()) as u32,
                end: ((i + 1) % points.len()) as u32,
                role: roles[pick],
            })
            .collect();
        let state = State::from_parts(points, lines, vec![], vec![]);

        let text = encode_message(WireCommand::Init, &state);
        let (command, decoded) = parse_message(&text).unwrap();
        prop_assert_eq!(command, WireCommand::Init);
        prop_assert_eq!(decoded, state);
    }

    #[test]
    fn moved_vertex_resolves_to_its_new_position(
        points in point_table(),
        x in -50.0f32..50.0,
        y in -50.0f32..50.0,
        z in -50.0f32..50.0,
    ) {
        let mut state = State::from_parts(points, vec![], vec![], vec![]);
        // index 0 is a vertex by construction
        state.move_point(0, Vec3::new(x, y, z), 0.0).unwrap();
        prop_assert_eq!(state.resolve(0).unwrap(), Vec3::new(x, y, z));
    }
}
