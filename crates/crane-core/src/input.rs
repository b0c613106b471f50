//! Keyboard vocabulary and the held-key → DOF mapper.

use crate::camera::CameraId;
use crate::constants::{BOOM_SPEED, CABLE_SPEED, CLAW_TIP_SPEED, TROLLEY_SPEED};
use crate::dof::{Dof, DofState};
use std::time::Duration;

/// The eight held controls, in HUD display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Q,
    A,
    W,
    S,
    E,
    D,
    R,
    F,
}

impl ControlKey {
    pub const ALL: [ControlKey; 8] = [
        ControlKey::Q,
        ControlKey::A,
        ControlKey::W,
        ControlKey::S,
        ControlKey::E,
        ControlKey::D,
        ControlKey::R,
        ControlKey::F,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlKey::Q => "Q",
            ControlKey::A => "A",
            ControlKey::W => "W",
            ControlKey::S => "S",
            ControlKey::E => "E",
            ControlKey::D => "D",
            ControlKey::R => "R",
            ControlKey::F => "F",
        }
    }

    /// DOF driven by this key and the signed rate (per second) it applies.
    pub fn binding(self) -> (Dof, f32) {
        match self {
            ControlKey::Q => (Dof::BoomAngle, BOOM_SPEED),
            ControlKey::A => (Dof::BoomAngle, -BOOM_SPEED),
            ControlKey::W => (Dof::TrolleyOffset, TROLLEY_SPEED),
            ControlKey::S => (Dof::TrolleyOffset, -TROLLEY_SPEED),
            ControlKey::E => (Dof::CableLength, -CABLE_SPEED),
            ControlKey::D => (Dof::CableLength, CABLE_SPEED),
            ControlKey::R => (Dof::ClawTipAngle, CLAW_TIP_SPEED),
            ControlKey::F => (Dof::ClawTipAngle, -CLAW_TIP_SPEED),
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// What a key press means to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Control(ControlKey),
    Camera(CameraId),
    ToggleWireframe,
    ToggleBounds,
    ToggleHud,
}

impl KeyCommand {
    /// Map a DOM / winit key string to a command. Letters are case-insensitive;
    /// anything unknown yields `None`.
    pub fn parse(key: &str) -> Option<Self> {
        let cmd = match key {
            "q" | "Q" => KeyCommand::Control(ControlKey::Q),
            "a" | "A" => KeyCommand::Control(ControlKey::A),
            "w" | "W" => KeyCommand::Control(ControlKey::W),
            "s" | "S" => KeyCommand::Control(ControlKey::S),
            "e" | "E" => KeyCommand::Control(ControlKey::E),
            "d" | "D" => KeyCommand::Control(ControlKey::D),
            "r" | "R" => KeyCommand::Control(ControlKey::R),
            "f" | "F" => KeyCommand::Control(ControlKey::F),
            "1" => KeyCommand::Camera(CameraId::Front),
            "2" => KeyCommand::Camera(CameraId::Side),
            "3" => KeyCommand::Camera(CameraId::Top),
            "4" => KeyCommand::Camera(CameraId::Ortho),
            "5" => KeyCommand::Camera(CameraId::Perspective),
            "6" => KeyCommand::Camera(CameraId::Mobile),
            "0" => KeyCommand::Camera(CameraId::Inspect),
            "7" => KeyCommand::ToggleWireframe,
            "b" | "B" => KeyCommand::ToggleBounds,
            "h" | "H" => KeyCommand::ToggleHud,
            _ => return None,
        };
        Some(cmd)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    held: [bool; 8],
}

impl HeldKeys {
    #[inline]
    pub fn set(&mut self, key: ControlKey, down: bool) {
        self.held[key.slot()] = down;
    }

    #[inline]
    pub fn is_held(&self, key: ControlKey) -> bool {
        self.held[key.slot()]
    }

    pub fn any(&self) -> bool {
        self.held.iter().any(|h| *h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlKey, bool)> + '_ {
        ControlKey::ALL.iter().map(move |k| (*k, self.is_held(*k)))
    }

    /// Net signed rate per axis, indexed like `Dof::ALL`.
    fn net_rates(&self) -> [f32; 4] {
        let mut rates = [0.0; 4];
        for key in ControlKey::ALL {
            if self.is_held(key) {
                let (axis, rate) = key.binding();
                rates[axis as usize] += rate;
            }
        }
        rates
    }

    /// Apply the net `rate * dt` of the held keys once per axis, so opposite
    /// keys held together cancel even at a limit.
    pub fn apply(&self, dof: &mut DofState, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        for (axis, rate) in Dof::ALL.into_iter().zip(self.net_rates()) {
            if rate != 0.0 {
                dof.apply_delta(axis, rate * dt_sec);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CABLE_MIN_LENGTH, TROLLEY_MAX_OFFSET};

    #[test]
    fn parse_is_case_insensitive_for_letters() {
        for key in ControlKey::ALL {
            let lower = key.label().to_ascii_lowercase();
            assert_eq!(KeyCommand::parse(key.label()), Some(KeyCommand::Control(key)));
            assert_eq!(KeyCommand::parse(&lower), Some(KeyCommand::Control(key)));
        }
    }

    #[test]
    fn digits_select_cameras_and_wireframe() {
        assert_eq!(KeyCommand::parse("0"), Some(KeyCommand::Camera(CameraId::Inspect)));
        assert_eq!(KeyCommand::parse("6"), Some(KeyCommand::Camera(CameraId::Mobile)));
        assert_eq!(KeyCommand::parse("7"), Some(KeyCommand::ToggleWireframe));
        assert_eq!(KeyCommand::parse("8"), None);
        assert_eq!(KeyCommand::parse("ArrowUp"), None);
        assert_eq!(KeyCommand::parse(""), None);
    }

    #[test]
    fn key_pairs_are_symmetric_opposites() {
        let pairs = [
            (ControlKey::Q, ControlKey::A),
            (ControlKey::W, ControlKey::S),
            (ControlKey::D, ControlKey::E),
            (ControlKey::R, ControlKey::F),
        ];
        for (inc, dec) in pairs {
            let (a, ra) = inc.binding();
            let (b, rb) = dec.binding();
            assert_eq!(a, b);
            assert!(ra > 0.0 && rb < 0.0 && (ra + rb).abs() < 1e-6);
        }
    }

    #[test]
    fn held_keys_scale_with_elapsed_time() {
        let mut held = HeldKeys::default();
        held.set(ControlKey::D, true);
        let mut dof = DofState::default();
        let before = dof.cable_length;
        held.apply(&mut dof, Duration::from_millis(100));
        assert!((dof.cable_length - (before + CABLE_SPEED * 0.1)).abs() < 1e-3);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut held = HeldKeys::default();
        held.set(ControlKey::W, true);
        held.set(ControlKey::S, true);
        let mut dof = DofState::default();
        dof.trolley_offset = 0.0;
        held.apply(&mut dof, Duration::from_millis(16));
        assert!(dof.trolley_offset.abs() < 1e-4);
    }

    #[test]
    fn opposite_keys_hold_still_at_a_limit() {
        let mut held = HeldKeys::default();
        held.set(ControlKey::W, true);
        held.set(ControlKey::S, true);
        let mut dof = DofState::default();
        assert_eq!(dof.trolley_offset, TROLLEY_MAX_OFFSET);
        for _ in 0..10 {
            held.apply(&mut dof, Duration::from_millis(16));
        }
        assert_eq!(dof.trolley_offset, TROLLEY_MAX_OFFSET);

        held.set(ControlKey::D, true);
        held.set(ControlKey::E, true);
        held.apply(&mut dof, Duration::from_millis(16));
        assert_eq!(dof.cable_length, CABLE_MIN_LENGTH);
    }
}
