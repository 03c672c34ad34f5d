/// Fire-and-forget triggers for the presentation layer (animation,
/// audio, particles, UI counters). The core never reads anything
/// back; a host drains the bus after each tick and the bus keeps
/// per-kind counts of the previous tick for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    SwingStarted { avatar: u64 },
    WalkingChanged { avatar: u64, walking: bool },
    ToolImpact { avatar: u64, node: u64 },
    NodeHit { node: u64 },
    NodeHarvested { node: u64 },
    ResourceSpawned { node: u64, item: u64 },
    ItemPickedUp { avatar: u64, item: u64 },
    CarryingChanged { avatar: u64, carrying: bool },
    SitePulse { site: u64 },
    CounterChanged { site: u64, amount: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    SwingStarted,
    WalkingChanged,
    ToolImpact,
    NodeHit,
    NodeHarvested,
    ResourceSpawned,
    ItemPickedUp,
    CarryingChanged,
    SitePulse,
    CounterChanged,
}

impl Cue {
    pub fn kind(self) -> CueKind {
        match self {
            Self::SwingStarted { .. } => CueKind::SwingStarted,
            Self::WalkingChanged { .. } => CueKind::WalkingChanged,
            Self::ToolImpact { .. } => CueKind::ToolImpact,
            Self::NodeHit { .. } => CueKind::NodeHit,
            Self::NodeHarvested { .. } => CueKind::NodeHarvested,
            Self::ResourceSpawned { .. } => CueKind::ResourceSpawned,
            Self::ItemPickedUp { .. } => CueKind::ItemPickedUp,
            Self::CarryingChanged { .. } => CueKind::CarryingChanged,
            Self::SitePulse { .. } => CueKind::SitePulse,
            Self::CounterChanged { .. } => CueKind::CounterChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueCounts {
    pub total: u32,
    pub swing_started: u32,
    pub walking_changed: u32,
    pub tool_impact: u32,
    pub node_hit: u32,
    pub node_harvested: u32,
    pub resource_spawned: u32,
    pub item_picked_up: u32,
    pub carrying_changed: u32,
    pub site_pulse: u32,
    pub counter_changed: u32,
}

impl CueCounts {
    fn record(&mut self, kind: CueKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            CueKind::SwingStarted => self.swing_started = self.swing_started.saturating_add(1),
            CueKind::WalkingChanged => {
                self.walking_changed = self.walking_changed.saturating_add(1)
            }
            CueKind::ToolImpact => self.tool_impact = self.tool_impact.saturating_add(1),
            CueKind::NodeHit => self.node_hit = self.node_hit.saturating_add(1),
            CueKind::NodeHarvested => self.node_harvested = self.node_harvested.saturating_add(1),
            CueKind::ResourceSpawned => {
                self.resource_spawned = self.resource_spawned.saturating_add(1)
            }
            CueKind::ItemPickedUp => self.item_picked_up = self.item_picked_up.saturating_add(1),
            CueKind::CarryingChanged => {
                self.carrying_changed = self.carrying_changed.saturating_add(1)
            }
            CueKind::SitePulse => self.site_pulse = self.site_pulse.saturating_add(1),
            CueKind::CounterChanged => {
                self.counter_changed = self.counter_changed.saturating_add(1)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CueBus {
    current_tick_cues: Vec<Cue>,
    last_tick_counts: CueCounts,
}

impl CueBus {
    pub fn emit(&mut self, cue: Cue) {
        self.current_tick_cues.push(cue);
    }

    pub fn current_tick_cues(&self) -> &[Cue] {
        &self.current_tick_cues
    }

    /// Host-side drain; called once the tick's movement is final.
    pub fn finish_tick_rollover(&mut self) -> Vec<Cue> {
        let mut counts = CueCounts::default();
        for cue in &self.current_tick_cues {
            counts.record(cue.kind());
        }
        self.last_tick_counts = counts;
        std::mem::take(&mut self.current_tick_cues)
    }

    pub fn last_tick_counts(&self) -> CueCounts {
        self.last_tick_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollover_counts_by_kind_and_clears() {
        let mut bus = CueBus::default();
        bus.emit(Cue::NodeHit { node: 1 });
        bus.emit(Cue::NodeHit { node: 1 });
        bus.emit(Cue::SitePulse { site: 0 });

        let drained = bus.finish_tick_rollover();
        assert_eq!(drained.len(), 3);
        assert!(bus.current_tick_cues().is_empty());

        let counts = bus.last_tick_counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.node_hit, 2);
        assert_eq!(counts.site_pulse, 1);
    }

    #[test]
    fn counts_reset_each_tick() {
        let mut bus = CueBus::default();
        bus.emit(Cue::SwingStarted { avatar: 0 });
        bus.finish_tick_rollover();
        bus.finish_tick_rollover();
        assert_eq!(bus.last_tick_counts().total, 0);
    }
}
