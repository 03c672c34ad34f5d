#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvatarId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Behaviour {
    #[default]
    Follow,
    PullCart,
    Harvest,
    Gather,
    Deliver,
}

impl Behaviour {
    pub fn name(self) -> &'static str {
        match self {
            Self::Follow => "Follow",
            Self::PullCart => "PullCart",
            Self::Harvest => "Harvest",
            Self::Gather => "Gather",
            Self::Deliver => "Deliver",
        }
    }
}

/// What a follower's current behaviour is aimed at. Follow and
/// PullCart chase an avatar; the work behaviours chase world objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTarget {
    Avatar(AvatarId),
    Node(NodeId),
    Item(ItemId),
    Site(SiteId),
}

/// Signals raised by the player avatar's actuator operations and
/// consumed synchronously by the order dispatcher in the same tick.
/// Followers raise none of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerSignal {
    ToolHit,
    PickedUp { item: ItemId },
    DroppedOff,
}
