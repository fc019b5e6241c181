//! Frame events - what happened during one frame, for presentation layers and stats

use hecs::Entity;

/// Something observable that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// A spike of `attacker` drained `amount` calories from `target`
    SpikeDrained {
        attacker: Entity,
        target: Entity,
        /// Index into the attacker's spikes (longest first)
        spike: usize,
        amount: f64,
    },
    /// The body's calories fell below its death threshold
    Died { entity: Entity },
    /// The body left the tank at the end of the frame
    Removed { entity: Entity },
    /// The parent split into two children and was removed
    Reproduced { parent: Entity, children: [Entity; 2] },
    MoteSpawned { entity: Entity },
}

/// Result of simulating one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Frame counter after this frame
    pub tick: u64,
    /// Clamped frame duration in seconds
    pub delay: f64,
    pub events: Vec<FrameEvent>,
}

impl FrameReport {
    pub fn new(tick: u64, delay: f64) -> Self {
        Self {
            tick,
            delay,
            events: Vec::new(),
        }
    }

    /// Total calories moved by spikes this frame
    pub fn calories_drained(&self) -> f64 {
        self.events
            .iter()
            .map(|event| match event {
                FrameEvent::SpikeDrained { amount, .. } => *amount,
                _ => 0.0,
            })
            .sum()
    }

    pub fn births(&self) -> usize {
        self.count(|e| matches!(e, FrameEvent::Reproduced { .. })) * 2
    }

    pub fn deaths(&self) -> usize {
        self.count(|e| matches!(e, FrameEvent::Died { .. }))
    }

    pub fn removals(&self) -> usize {
        self.count(|e| matches!(e, FrameEvent::Removed { .. }))
    }

    pub fn motes_spawned(&self) -> usize {
        self.count(|e| matches!(e, FrameEvent::MoteSpawned { .. }))
    }

    fn count(&self, predicate: impl Fn(&FrameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}
