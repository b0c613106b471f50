// Scenario tests for the frame loop and the pick-and-place sequence.

use crane_core::collision::intersects;
use crane_core::constants::*;
use crane_core::dof::{shortest_arc, wrap_angle};
use crane_core::{
    CameraId, CargoKind, ControlKey, ControlMode, DofState, GrabPhase, HudSnapshot, Shape,
    SimConfig, Simulation,
};
use glam::Vec3;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 5_000;

fn empty_yard() -> Simulation {
    Simulation::new(SimConfig {
        cargo_count: 0,
        ..SimConfig::default()
    })
    .unwrap()
}

fn claw_probe_center(sim: &Simulation) -> Vec3 {
    sim.claw_bounds().center(sim.scene())
}

/// Drop a small cargo right where the claw's bounding sphere is.
fn spawn_under_claw(sim: &mut Simulation) -> usize {
    let at = claw_probe_center(sim) - Vec3::Y * 4.0;
    sim.spawn_cargo_at(CargoKind::Icosahedron, Shape::Icosahedron { radius: 5.0 }, at)
}

#[test]
fn holding_boom_key_accumulates_wrapped_angle() {
    let mut sim = empty_yard();
    sim.on_key_down("q");
    let n = 100;
    for _ in 0..n {
        sim.tick(FRAME);
    }
    let expected = wrap_angle(n as f32 * BOOM_SPEED * FRAME.as_secs_f32());
    let got = sim.dof().boom_angle;
    assert!(shortest_arc(got, expected).abs() < 1e-3, "{got} vs {expected}");
    assert_eq!(sim.mode(), ControlMode::Free);
}

#[test]
fn held_keys_saturate_at_their_limits() {
    let mut sim = empty_yard();
    sim.on_key_down("W");
    sim.on_key_down("e");
    for _ in 0..200 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.dof().trolley_offset, TROLLEY_MAX_OFFSET);
    assert_eq!(sim.dof().cable_length, CABLE_MIN_LENGTH);

    sim.on_key_up("w");
    sim.on_key_down("s");
    for _ in 0..200 {
        sim.tick(FRAME);
    }
    assert_eq!(sim.dof().trolley_offset, TROLLEY_MIN_OFFSET);
}

#[test]
fn releasing_a_key_stops_motion() {
    let mut sim = empty_yard();
    sim.on_key_down("d");
    sim.tick(FRAME);
    sim.on_key_up("D");
    let after = sim.dof().cable_length;
    sim.tick(FRAME);
    assert_eq!(sim.dof().cable_length, after);
    assert!(!sim.held_keys().is_held(ControlKey::D));
}

#[test]
fn claw_contact_grabs_exactly_one_cargo() {
    let mut sim = empty_yard();
    let first = spawn_under_claw(&mut sim);
    let second = spawn_under_claw(&mut sim);
    assert_eq!(sim.idle_cargo().len(), 2);

    sim.tick(FRAME);

    assert_eq!(sim.mode(), ControlMode::Grabbing(GrabPhase::Retract));
    let grabbed = sim.grabbed().expect("cargo grabbed");
    assert_eq!(grabbed.id, first);
    assert_eq!(sim.idle_cargo().len(), 1);
    assert_eq!(sim.idle_cargo()[0].id, second);
    assert!(sim.idle_cargo().iter().all(|c| c.id != grabbed.id));
    assert_eq!(sim.scene().node(grabbed.node).parent(), Some(sim.rig().claw));

    let claw = sim.claw_world().transform_point3(Vec3::ZERO);
    let cargo = sim.scene().world_position(grabbed.node);
    assert!((cargo - (claw + Vec3::Y * 3.0 * CLAW_BOUNDS_OFFSET_Y)).length() < 1e-3);
}

#[test]
fn keys_are_recorded_but_ignored_while_grabbing() {
    let mut sim = empty_yard();
    sim.set_dof(DofState {
        cable_length: 60.0,
        ..DofState::default()
    });
    spawn_under_claw(&mut sim);
    sim.tick(FRAME);
    assert_eq!(sim.mode(), ControlMode::Grabbing(GrabPhase::Retract));

    let before = *sim.dof();
    sim.on_key_down("s");
    sim.on_key_down("q");
    sim.tick(FRAME);
    assert!(sim.held_keys().is_held(ControlKey::S));
    assert_eq!(sim.dof().trolley_offset, before.trolley_offset);
    assert_eq!(sim.dof().boom_angle, before.boom_angle);
    assert!(sim.dof().cable_length < before.cable_length);
}

#[test]
fn full_delivery_runs_every_phase_in_order() {
    let mut sim = empty_yard();
    sim.set_dof(DofState {
        boom_angle: 3.0,
        cable_length: 90.0,
        ..DofState::default()
    });
    spawn_under_claw(&mut sim);

    let mut modes = vec![sim.mode()];
    let mut slew_distance: Option<f32> = None;
    let mut overlap_frame: Option<usize> = None;

    for frame in 0..MAX_FRAMES {
        sim.tick(FRAME);
        let mode = sim.mode();
        if modes.last() != Some(&mode) {
            modes.push(mode);
        }

        if mode == ControlMode::Grabbing(GrabPhase::Slew) {
            let d = shortest_arc(sim.dof().boom_angle, TARGET_BOOM_ANGLE).abs();
            if let Some(prev) = slew_distance {
                assert!(d < prev, "slew distance went from {prev} to {d}");
            }
            slew_distance = Some(d);
        }

        if let Some(cargo) = sim.grabbed() {
            if intersects(sim.scene(), &cargo.bounds, sim.container_bounds()) {
                overlap_frame.get_or_insert(frame);
            }
        }
        if mode == ControlMode::Free && sim.delivered().len() == 1 {
            let seen = overlap_frame.expect("overlap observed before release");
            assert!(frame - seen <= 1, "released {} frames late", frame - seen);
            break;
        }
    }

    assert_eq!(
        modes,
        vec![
            ControlMode::Free,
            ControlMode::Grabbing(GrabPhase::Retract),
            ControlMode::Grabbing(GrabPhase::Slew),
            ControlMode::Grabbing(GrabPhase::Traverse),
            ControlMode::Grabbing(GrabPhase::Lower),
            ControlMode::Free,
        ]
    );
    assert!(sim.grabbed().is_none());
    assert_eq!(sim.dof().boom_angle, TARGET_BOOM_ANGLE);
    assert_eq!(sim.dof().trolley_offset, TARGET_TROLLEY_OFFSET);
    assert!(sim.dof().cable_length <= CABLE_MAX_LENGTH);

    let delivered = sim.delivered()[0];
    assert_eq!(
        sim.scene().node(delivered.node).parent(),
        Some(sim.rig().container)
    );
}

#[test]
fn delivered_cargo_stays_put_when_the_crane_moves_on() {
    let mut sim = empty_yard();
    spawn_under_claw(&mut sim);
    for _ in 0..MAX_FRAMES {
        sim.tick(FRAME);
        if !sim.delivered().is_empty() {
            break;
        }
    }
    let delivered = sim.delivered()[0];
    let resting = sim.scene().world_position(delivered.node);
    assert_eq!(sim.mode(), ControlMode::Free);

    sim.on_key_down("a");
    sim.on_key_down("e");
    for _ in 0..30 {
        sim.tick(FRAME);
    }
    assert!((sim.scene().world_position(delivered.node) - resting).length() < 1e-3);
}

#[test]
fn camera_keys_switch_views_and_mobile_follows_claw() {
    let mut sim = empty_yard();
    assert_eq!(sim.active_camera(), CameraId::Inspect);
    sim.on_key_down("3");
    assert_eq!(sim.active_camera(), CameraId::Top);
    sim.on_key_down("9");
    assert_eq!(sim.active_camera(), CameraId::Top);

    sim.on_key_down("6");
    sim.on_key_down("d");
    sim.tick(FRAME);
    let cam = sim.camera(1.5);
    let claw = sim.claw_world().transform_point3(Vec3::ZERO);
    assert!((cam.eye - claw).length() < 1e-4);
}

#[test]
fn hud_snapshot_reflects_keys_camera_and_mode() {
    let mut sim = empty_yard();
    sim.on_key_down("r");
    sim.on_key_down("5");
    let lines = HudSnapshot::from_sim(&sim).lines();
    assert_eq!(lines[0], "Q: Not Pressed");
    assert_eq!(lines[6], "R: Pressed");
    assert_eq!(lines[8], "Camera: Perspective");
    assert_eq!(lines[9], "Wireframe: On");
    assert_eq!(lines[10], "Mode: Free");

    spawn_under_claw(&mut sim);
    sim.tick(FRAME);
    let hud = HudSnapshot::from_sim(&sim);
    assert_eq!(hud.mode, ControlMode::Grabbing(GrabPhase::Retract));
    assert_eq!(hud.lines()[10], "Mode: Grabbing (1)");
}
