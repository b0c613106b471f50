use crane_core::{HudSnapshot, Simulation};
use web_sys as web;

/// HUD body for the current state, or `None` while the HUD is toggled off.
pub fn hud_text(sim: &Simulation) -> Option<String> {
    sim.hud_visible()
        .then(|| HudSnapshot::from_sim(sim).lines().join("\n"))
}

#[inline]
pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

#[inline]
pub fn set_visible(document: &web::Document, id: &str, visible: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("style", if visible { "" } else { "display:none" });
    }
}

/// Bring `#hud` in line with `sim` right away, outside the frame loop.
pub fn refresh(document: &web::Document, id: &str, sim: &Simulation) {
    match hud_text(sim) {
        Some(text) => {
            set_visible(document, id, true);
            set_text(document, id, &text);
        }
        None => set_visible(document, id, false),
    }
}
