use crate::camera::CameraId;
use crate::input::ControlKey;
use crate::sim::{ControlMode, Simulation};

/// Read-only view of everything the HUD shows. Derived fresh from the
/// simulation whenever the display wants it; nothing flows back.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub keys: [(ControlKey, bool); 8],
    pub camera: CameraId,
    pub wireframe: bool,
    pub mode: ControlMode,
    pub idle_cargo: usize,
    pub delivered: usize,
}

impl HudSnapshot {
    pub fn from_sim(sim: &Simulation) -> Self {
        let held = sim.held_keys();
        let mut keys = [(ControlKey::Q, false); 8];
        for (slot, (key, down)) in keys.iter_mut().zip(held.iter()) {
            *slot = (key, down);
        }
        Self {
            keys,
            camera: sim.active_camera(),
            wireframe: sim.wireframe(),
            mode: sim.mode(),
            idle_cargo: sim.idle_cargo().len(),
            delivered: sim.delivered().len(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .keys
            .iter()
            .map(|(k, down)| {
                format!(
                    "{}: {}",
                    k.label(),
                    if *down { "Pressed" } else { "Not Pressed" }
                )
            })
            .collect();
        out.push(format!("Camera: {}", self.camera.name()));
        out.push(format!(
            "Wireframe: {}",
            if self.wireframe { "On" } else { "Off" }
        ));
        out.push(format!("Mode: {}", self.mode));
        out.push(format!(
            "Cargo: {} idle, {} delivered",
            self.idle_cargo, self.delivered
        ));
        out
    }

    /// Compact single-line form for window titles.
    pub fn summary(&self) -> String {
        let held: String = self
            .keys
            .iter()
            .filter(|(_, down)| *down)
            .map(|(k, _)| k.label())
            .collect();
        format!(
            "Crane | {} | camera {} | wireframe {} | held [{}] | {} delivered, {} idle",
            self.mode,
            self.camera.name(),
            if self.wireframe { "on" } else { "off" },
            held,
            self.delivered,
            self.idle_cargo
        )
    }
}
