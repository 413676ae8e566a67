//! # Spatial Index Tests
//!
//! Checks the grid against a brute-force scan over randomized bodies, and
//! checks that insert/remove/update leave no residue behind.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voidline_core::spatial::{check_collision, BodyId, Circle, SpatialIndex};

const WORLD: f32 = 4000.0;

fn random_bodies(rng: &mut ChaCha8Rng, count: u32) -> Vec<(BodyId, Circle)> {
    (0..count)
        .map(|i| {
            let circle = Circle::at(
                rng.gen_range(-WORLD..WORLD),
                rng.gen_range(-WORLD..WORLD),
                rng.gen_range(1.0..60.0),
            );
            (BodyId::new(i, 0), circle)
        })
        .collect()
}

fn brute_force(bodies: &[(BodyId, Circle)], probe: Circle) -> Vec<BodyId> {
    let mut hits: Vec<BodyId> = bodies
        .iter()
        .filter(|(_, circle)| check_collision(probe, *circle))
        .map(|(id, _)| *id)
        .collect();
    hits.sort_unstable();
    hits
}

/// Test: 1000 bodies, cell size 128, 100 queries all match brute force.
#[test]
fn test_query_circle_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let bodies = random_bodies(&mut rng, 1000);

    let mut index = SpatialIndex::new(128.0);
    index.rebuild(bodies.iter().copied());
    assert_eq!(index.len(), 1000);

    for _ in 0..100 {
        let probe = Circle::at(
            rng.gen_range(-WORLD..WORLD),
            rng.gen_range(-WORLD..WORLD),
            rng.gen_range(0.0..400.0),
        );
        let expected = brute_force(&bodies, probe);
        let actual = index.query_circle(probe.center.x, probe.center.y, probe.radius);
        assert_eq!(actual, expected, "mismatch for probe {probe:?}");
    }
}

/// Test: broad phase is always a superset of the exact answer.
#[test]
fn test_broad_phase_never_misses() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let bodies = random_bodies(&mut rng, 500);

    let mut index = SpatialIndex::new(64.0);
    index.rebuild(bodies.iter().copied());

    let mut broad = Vec::new();
    for _ in 0..100 {
        let probe = Circle::at(
            rng.gen_range(-WORLD..WORLD),
            rng.gen_range(-WORLD..WORLD),
            rng.gen_range(0.0..250.0),
        );
        index.query_into(probe.center.x, probe.center.y, probe.radius, &mut broad);
        for id in brute_force(&bodies, probe) {
            assert!(broad.binary_search(&id).is_ok(), "broad phase dropped {id:?}");
        }
    }
}

/// Test: collision pairs equal an O(n²) scan.
#[test]
fn test_collision_pairs_match_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let bodies = random_bodies(&mut rng, 400);

    let mut index = SpatialIndex::new(128.0);
    index.rebuild(bodies.iter().copied());

    let mut expected = Vec::new();
    for (i, (a, ca)) in bodies.iter().enumerate() {
        for (b, cb) in &bodies[i + 1..] {
            if check_collision(*ca, *cb) {
                expected.push(if a < b { (*a, *b) } else { (*b, *a) });
            }
        }
    }
    expected.sort_unstable();

    assert_eq!(index.collision_pairs(), expected);
}

/// Test: insert followed by remove restores the previous state.
#[test]
fn test_insert_remove_restores_state() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let bodies = random_bodies(&mut rng, 200);

    let mut index = SpatialIndex::new(128.0);
    index.rebuild(bodies.iter().copied());
    let cells_before = index.occupied_cells();
    let everything_before = index.query(0.0, 0.0, WORLD * 2.0);

    let extra = BodyId::new(10_000, 0);
    index.insert(extra, Circle::at(123.0, -456.0, 300.0));
    assert!(index.contains(extra));
    assert!(index.remove(extra));

    assert!(!index.contains(extra));
    assert_eq!(index.len(), 200);
    assert_eq!(index.occupied_cells(), cells_before);
    assert_eq!(index.query(0.0, 0.0, WORLD * 2.0), everything_before);
}

/// Test: update equals remove followed by insert.
#[test]
fn test_update_equals_remove_insert() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let bodies = random_bodies(&mut rng, 300);

    let mut updated = SpatialIndex::new(96.0);
    let mut manual = SpatialIndex::new(96.0);
    updated.rebuild(bodies.iter().copied());
    manual.rebuild(bodies.iter().copied());

    for (id, _) in bodies.iter().take(50) {
        let moved = Circle::at(rng.gen_range(-WORLD..WORLD), rng.gen_range(-WORLD..WORLD), 20.0);
        assert!(updated.update(*id, moved));
        manual.remove(*id);
        manual.insert(*id, moved);
    }

    assert_eq!(updated.occupied_cells(), manual.occupied_cells());
    assert_eq!(updated.collision_pairs(), manual.collision_pairs());
    for _ in 0..50 {
        let (x, y) = (rng.gen_range(-WORLD..WORLD), rng.gen_range(-WORLD..WORLD));
        assert_eq!(updated.query_circle(x, y, 200.0), manual.query_circle(x, y, 200.0));
    }
}

/// Test: removing an id that was never inserted changes nothing.
#[test]
fn test_remove_unknown_is_noop() {
    let mut index = SpatialIndex::new(128.0);
    index.insert(BodyId::new(1, 0), Circle::at(0.0, 0.0, 10.0));
    index.insert(BodyId::new(2, 0), Circle::at(300.0, 0.0, 10.0));

    assert!(!index.remove(BodyId::new(99, 0)));
    assert!(!index.remove(BodyId::new(1, 5)));

    assert_eq!(index.len(), 2);
    assert_eq!(index.occupied_cells(), 2);
    assert_eq!(
        index.query(0.0, 0.0, 1000.0),
        vec![BodyId::new(1, 0), BodyId::new(2, 0)]
    );
}

/// Test: the same inputs always produce the same ordered answers.
#[test]
fn test_query_order_is_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let bodies = random_bodies(&mut rng, 600);

    let mut forward = SpatialIndex::new(128.0);
    forward.rebuild(bodies.iter().copied());
    let mut backward = SpatialIndex::new(128.0);
    backward.rebuild(bodies.iter().rev().copied());

    assert_eq!(forward.query(0.0, 0.0, 1500.0), backward.query(0.0, 0.0, 1500.0));
    assert_eq!(forward.collision_pairs(), backward.collision_pairs());
}
