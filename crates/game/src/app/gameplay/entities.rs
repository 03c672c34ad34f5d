/// A harvestable stand of resources. Health may go negative; the
/// alive flag only flips in the world's node-update phase, one tick
/// after the lethal hit landed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub id: NodeId,
    pub position: Vec3,
    spawn_point: Vec3,
    health: i32,
    alive: bool,
    collider: ColliderId,
    spawn_countdown: Option<f32>,
}

impl ResourceNode {
    fn new(id: NodeId, position: Vec3, spawn_point: Vec3, health: i32, collider: ColliderId) -> Self {
        Self {
            id,
            position,
            spawn_point,
            health,
            alive: true,
            collider,
            spawn_countdown: None,
        }
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    /// No-op once harvested; repeated hits after death change nothing.
    fn get_hit(&mut self, damage: i32, cues: &mut CueBus) {
        if self.alive {
            cues.emit(Cue::NodeHit { node: self.id.0 });
            self.health -= damage;
        }
    }

    /// One-way alive -> harvested transition.
    fn harvest(&mut self, spawn_delay_seconds: f32, cues: &mut CueBus) {
        self.alive = false;
        self.spawn_countdown = Some(spawn_delay_seconds);
        cues.emit(Cue::NodeHarvested { node: self.id.0 });
    }
}

/// A resource lying on the ground (or being carried). Spawned by a
/// harvested node, destroyed on successful delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub position: Vec3,
    on_ground: bool,
    collider: ColliderId,
}

impl Item {
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }
}

/// Collection point. The receive policy always accepts in the base
/// design; the bool return leaves room for rejection policies.
#[derive(Debug, Clone, PartialEq)]
pub struct DropSite {
    pub id: SiteId,
    pub position: Vec3,
    amount: u32,
    collider: ColliderId,
}

impl DropSite {
    pub fn amount(&self) -> u32 {
        self.amount
    }

    fn receive_item(&mut self, _item: ItemId, cues: &mut CueBus) -> bool {
        self.amount = self.amount.saturating_add(1);
        cues.emit(Cue::SitePulse { site: self.id.0 });
        cues.emit(Cue::CounterChanged {
            site: self.id.0,
            amount: self.amount,
        });
        true
    }
}
