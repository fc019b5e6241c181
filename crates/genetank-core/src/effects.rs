//! Presentation effects - spike highlights and vitals-driven color, fed by frame events.
//!
//! Nothing here touches simulation state. A renderer keeps a [`SpikeHighlights`],
//! hands it every [`FrameReport`], and asks it how bright each spike should be.

use hecs::Entity;
use std::collections::HashMap;

use crate::components::{Fill, Vitals};
use crate::events::{FrameEvent, FrameReport};
use crate::math;

/// How long a spike glows after draining something
pub const HIGHLIGHT_DURATION_MS: f64 = 250.0;

/// Share of the full saturation a body keeps at its death threshold
const MIN_SATURATION_SHARE: f64 = 0.25;

/// Time-bounded linear interpolation of a cosmetic value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Progress in [0, 1] at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        math::clamp01((now_ms - self.start_ms) / self.duration_ms)
    }

    pub fn value_at(&self, now_ms: f64) -> f64 {
        math::lerp(self.from, self.to, self.progress(now_ms))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Fading highlight per (body, spike index)
#[derive(Debug, Clone, Default)]
pub struct SpikeHighlights {
    tweens: HashMap<(Entity, usize), Tween>,
}

impl SpikeHighlights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or restart highlights for every drain in the report and drop removed bodies
    pub fn apply(&mut self, report: &FrameReport, now_ms: f64) {
        for event in &report.events {
            match *event {
                FrameEvent::SpikeDrained { attacker, spike, .. } => {
                    self.tweens
                        .insert((attacker, spike), Tween::new(1.0, 0.0, now_ms, HIGHLIGHT_DURATION_MS));
                }
                FrameEvent::Removed { entity } => self.forget(entity),
                _ => {}
            }
        }
    }

    /// Highlight strength in [0, 1]; 0 when the spike is not lit
    pub fn intensity(&self, entity: Entity, spike: usize, now_ms: f64) -> f64 {
        self.tweens
            .get(&(entity, spike))
            .map_or(0.0, |tween| tween.value_at(now_ms))
    }

    pub fn forget(&mut self, entity: Entity) {
        self.tweens.retain(|(owner, _), _| *owner != entity);
    }

    /// Drop highlights that have fully faded
    pub fn prune(&mut self, now_ms: f64) {
        self.tweens.retain(|_, tween| !tween.is_finished(now_ms));
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

/// Display saturation for a body: full when ready to spawn, fading toward death, gray once dead.
///
/// Motes never spawn, so they keep the saturation of their fill.
pub fn fill_saturation(fill: &Fill, vitals: &Vitals) -> u8 {
    if vitals.is_dead {
        return 0;
    }
    if !vitals.spawns_at.is_finite() {
        return fill.saturation;
    }
    let span = vitals.spawns_at - vitals.dies_at;
    let health = if span > 0.0 {
        math::clamp01((vitals.calories - vitals.dies_at) / span)
    } else {
        1.0
    };
    let share = math::lerp(MIN_SATURATION_SHARE, 1.0, health);
    (fill.saturation as f64 * share).round() as u8
}
