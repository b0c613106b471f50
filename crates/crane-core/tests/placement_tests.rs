// Integration tests for construction-time cargo placement.

use crane_core::cargo::{candidate_is_clear, place_cargo, CargoMaterials, PlacementParams};
use crane_core::collision::{intersects, BoundingSphere};
use crane_core::constants::{crane_base_center, CARGO_REACH_RADIUS, CARGO_Y};
use crane_core::scene::Transform;
use crane_core::shape::Shape;
use crane_core::{PlacementError, SceneGraph, SimConfig, Simulation};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded(seed: u64) -> Simulation {
    Simulation::new(SimConfig {
        seed,
        ..SimConfig::default()
    })
    .expect("default placement fits")
}

#[test]
fn placed_cargo_never_overlaps_anything() {
    for seed in [1, 7, 42, 1234] {
        let sim = seeded(seed);
        let scene = sim.scene();
        let cargo = sim.idle_cargo();
        assert_eq!(cargo.len(), SimConfig::default().cargo_count);

        for (i, a) in cargo.iter().enumerate() {
            for b in &cargo[i + 1..] {
                assert!(
                    !intersects(scene, &a.bounds, &b.bounds),
                    "seed {seed}: cargo {} overlaps cargo {}",
                    a.id,
                    b.id
                );
            }
            assert!(!intersects(scene, &a.bounds, sim.base_bounds()));
            for wall in sim.wall_bounds() {
                assert!(!intersects(scene, &a.bounds, wall), "seed {seed}: cargo {} hits a wall", a.id);
            }
        }
    }
}

#[test]
fn placed_cargo_stays_within_reach_at_cargo_height() {
    let sim = seeded(99);
    let base = crane_base_center();
    for c in sim.idle_cargo() {
        let p = c.bounds.center(sim.scene());
        assert!((p.y - CARGO_Y).abs() < 1e-3);
        assert!(Vec2::new(p.x - base.x, p.z - base.z).length() <= CARGO_REACH_RADIUS + 1e-3);
    }
}

#[test]
fn same_seed_gives_same_layout() {
    let a = seeded(5);
    let b = seeded(5);
    let pos = |s: &Simulation| -> Vec<Vec3> {
        s.idle_cargo()
            .iter()
            .map(|c| c.bounds.center(s.scene()))
            .collect()
    };
    assert_eq!(pos(&a), pos(&b));
    assert_eq!(
        a.idle_cargo().iter().map(|c| c.kind).collect::<Vec<_>>(),
        b.idle_cargo().iter().map(|c| c.kind).collect::<Vec<_>>()
    );
}

#[test]
fn candidate_overlapping_the_base_is_rejected() {
    let sim = seeded(3);
    let base = *sim.base_bounds();
    let center = crane_base_center() + Vec3::new(base.radius, CARGO_Y - crane_base_center().y, 0.0);
    assert!(!candidate_is_clear(
        sim.scene(),
        center,
        5.0,
        CARGO_REACH_RADIUS,
        &[],
        &[base]
    ));
}

#[test]
fn crowded_disk_exhausts_instead_of_looping() {
    let mut scene = SceneGraph::new();
    let body = scene.add_material([1.0, 1.0, 1.0], true);
    let bounds = scene.add_material([0.5, 0.5, 0.5], true);
    let group = scene.add_node("cargo", None, Transform::IDENTITY);
    // an obstacle covering the whole disk
    let blocker = scene.add_visual(
        "blocker",
        None,
        Transform::from_translation(Vec3::new(0.0, CARGO_Y, 0.0)),
        Shape::Sphere { radius: 50.0 },
        bounds,
    );
    let params = PlacementParams {
        count: 3,
        reach_radius: 20.0,
        height: CARGO_Y,
        max_attempts: 25,
    };
    let mut rng = StdRng::seed_from_u64(11);
    let err = place_cargo(
        &mut scene,
        group,
        CargoMaterials { body, bounds },
        &[BoundingSphere::new(blocker, 50.0)],
        &params,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PlacementError::Exhausted {
            placed: 0,
            requested: 3,
            attempts: 25
        }
    );
}

#[test]
fn zero_cargo_builds_an_empty_yard() {
    let sim = Simulation::new(SimConfig {
        cargo_count: 0,
        ..SimConfig::default()
    })
    .unwrap();
    assert!(sim.idle_cargo().is_empty());
    assert!(sim.delivered().is_empty());
    assert!(sim.grabbed().is_none());
}
