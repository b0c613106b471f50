//! Joint variables of the crane and their clamping rules.

use crate::constants::*;
use std::f32::consts::{PI, TAU};

/// One independently controllable axis of the crane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dof {
    BoomAngle,
    TrolleyOffset,
    CableLength,
    ClawTipAngle,
}

impl Dof {
    pub const ALL: [Dof; 4] = [
        Dof::BoomAngle,
        Dof::TrolleyOffset,
        Dof::CableLength,
        Dof::ClawTipAngle,
    ];

    /// Inclusive limits, or `None` for the wrapping boom angle.
    pub fn limits(self) -> Option<(f32, f32)> {
        match self {
            Dof::BoomAngle => None,
            Dof::TrolleyOffset => Some((TROLLEY_MIN_OFFSET, TROLLEY_MAX_OFFSET)),
            Dof::CableLength => Some((CABLE_MIN_LENGTH, CABLE_MAX_LENGTH)),
            Dof::ClawTipAngle => Some((CLAW_TIP_MIN_ANGLE, CLAW_TIP_MAX_ANGLE)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DofState {
    pub boom_angle: f32,
    pub trolley_offset: f32,
    pub cable_length: f32,
    pub claw_tip_angle: f32,
}

impl Default for DofState {
    fn default() -> Self {
        Self {
            boom_angle: 0.0,
            trolley_offset: TROLLEY_MAX_OFFSET,
            cable_length: CABLE_MIN_LENGTH,
            claw_tip_angle: CLAW_TIP_START_ANGLE,
        }
    }
}

impl DofState {
    pub fn get(&self, dof: Dof) -> f32 {
        match dof {
            Dof::BoomAngle => self.boom_angle,
            Dof::TrolleyOffset => self.trolley_offset,
            Dof::CableLength => self.cable_length,
            Dof::ClawTipAngle => self.claw_tip_angle,
        }
    }

    /// Overwrite a DOF, clamping (or wrapping) into its range.
    pub fn set(&mut self, dof: Dof, value: f32) {
        let value = constrain(dof, value);
        match dof {
            Dof::BoomAngle => self.boom_angle = value,
            Dof::TrolleyOffset => self.trolley_offset = value,
            Dof::CableLength => self.cable_length = value,
            Dof::ClawTipAngle => self.claw_tip_angle = value,
        }
    }

    /// Add `amount` to a DOF and saturate. Never fails.
    pub fn apply_delta(&mut self, dof: Dof, amount: f32) {
        self.set(dof, self.get(dof) + amount);
    }
}

fn constrain(dof: Dof, value: f32) -> f32 {
    match dof.limits() {
        None => wrap_angle(value),
        Some((lo, hi)) => value.clamp(lo, hi),
    }
}

/// Wrap an angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-π, π].
#[inline]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    let d = wrap_angle(to - from);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_is_in_range() {
        let s = DofState::default();
        for dof in Dof::ALL {
            if let Some((lo, hi)) = dof.limits() {
                let v = s.get(dof);
                assert!(v >= lo && v <= hi, "{dof:?} = {v} outside [{lo}, {hi}]");
            }
        }
        assert_eq!(s.boom_angle, 0.0);
    }

    #[test]
    fn deltas_saturate_instead_of_overflowing() {
        let mut s = DofState::default();
        s.apply_delta(Dof::CableLength, 1e6);
        assert_eq!(s.cable_length, CABLE_MAX_LENGTH);
        s.apply_delta(Dof::CableLength, -1e6);
        assert_eq!(s.cable_length, CABLE_MIN_LENGTH);
        s.apply_delta(Dof::TrolleyOffset, -500.0);
        assert_eq!(s.trolley_offset, TROLLEY_MIN_OFFSET);
        s.apply_delta(Dof::ClawTipAngle, 10.0);
        assert_eq!(s.claw_tip_angle, CLAW_TIP_MAX_ANGLE);
        s.apply_delta(Dof::ClawTipAngle, -10.0);
        assert_eq!(s.claw_tip_angle, CLAW_TIP_MIN_ANGLE);
    }

    #[test]
    fn boom_angle_wraps_both_ways() {
        let mut s = DofState::default();
        s.apply_delta(Dof::BoomAngle, -0.5);
        assert!((s.boom_angle - (TAU - 0.5)).abs() < 1e-5);
        s.apply_delta(Dof::BoomAngle, 1.0);
        assert!((s.boom_angle - 0.5).abs() < 1e-5);
        s.apply_delta(Dof::BoomAngle, 7.0 * TAU);
        assert!((s.boom_angle - 0.5).abs() < 1e-3);
        assert!(s.boom_angle >= 0.0 && s.boom_angle < TAU);
    }

    #[test]
    fn wrap_angle_never_returns_tau() {
        assert_eq!(wrap_angle(-1e-9), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!(wrap_angle(-f32::EPSILON) < TAU);
    }

    #[test]
    fn shortest_arc_picks_the_short_way_round() {
        assert!((shortest_arc(0.1, 0.3) - 0.2).abs() < 1e-6);
        assert!((shortest_arc(0.3, 0.1) + 0.2).abs() < 1e-6);
        // across the 0/2π seam
        assert!((shortest_arc(TAU - 0.1, 0.1) - 0.2).abs() < 1e-5);
        assert!((shortest_arc(0.1, TAU - 0.1) + 0.2).abs() < 1e-5);
    }
}
