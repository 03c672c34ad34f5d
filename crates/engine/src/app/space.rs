use super::math::{into_frame, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

/// Category filter for overlap queries, standing in for the physics
/// layer masks the gameplay code selects targets with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderTag {
    ResourceNode,
    PickUp,
    DropOff,
    Carried,
}

#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub id: ColliderId,
    pub tag: ColliderTag,
    pub position: Vec3,
    pub enabled: bool,
}

#[derive(Debug, Default)]
pub struct ColliderIdAllocator {
    next: u64,
}

impl ColliderIdAllocator {
    pub fn allocate(&mut self) -> ColliderId {
        let id = ColliderId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Synchronous, side-effect-free spatial query service. Colliders are
/// points; overlap tests check the point against the query volume.
/// Query results come back in insertion order, so ties among
/// equidistant colliders resolve to whichever was registered first.
#[derive(Debug, Default)]
pub struct Space {
    allocator: ColliderIdAllocator,
    colliders: Vec<Collider>,
}

impl Space {
    pub fn insert(&mut self, tag: ColliderTag, position: Vec3) -> ColliderId {
        let id = self.allocator.allocate();
        self.colliders.push(Collider {
            id,
            tag,
            position,
            enabled: true,
        });
        id
    }

    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|collider| collider.id != id);
        self.colliders.len() != before
    }

    pub fn set_position(&mut self, id: ColliderId, position: Vec3) {
        if let Some(collider) = self.find_mut(id) {
            collider.position = position;
        }
    }

    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) {
        if let Some(collider) = self.find_mut(id) {
            collider.enabled = enabled;
        }
    }

    pub fn set_tag(&mut self, id: ColliderId, tag: ColliderTag) {
        if let Some(collider) = self.find_mut(id) {
            collider.tag = tag;
        }
    }

    pub fn find(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.iter().find(|collider| collider.id == id)
    }

    fn find_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.iter_mut().find(|collider| collider.id == id)
    }

    pub fn position_of(&self, id: ColliderId) -> Option<Vec3> {
        self.find(id).map(|collider| collider.position)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Axis-aligned box in the frame whose forward axis is `forward`,
    /// centered at `center` with the given half extents.
    pub fn overlap_box(
        &self,
        center: Vec3,
        half_extent: Vec3,
        forward: Vec3,
        tag: ColliderTag,
    ) -> Vec<ColliderId> {
        self.colliders
            .iter()
            .filter(|collider| collider.enabled && collider.tag == tag)
            .filter(|collider| {
                let local = into_frame(forward, collider.position.sub(center));
                local.x.abs() <= half_extent.x
                    && local.y.abs() <= half_extent.y
                    && local.z.abs() <= half_extent.z
            })
            .map(|collider| collider.id)
            .collect()
    }

    pub fn overlap_sphere(&self, center: Vec3, radius: f32, tag: ColliderTag) -> Vec<ColliderId> {
        let radius_sq = radius * radius;
        self.colliders
            .iter()
            .filter(|collider| collider.enabled && collider.tag == tag)
            .filter(|collider| collider.position.sub(center).length_sq() <= radius_sq)
            .map(|collider| collider.id)
            .collect()
    }
}
