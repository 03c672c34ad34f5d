/// Harvesting tool carried by an avatar. The hit volume and the
/// per-swing ledger follow a two-phase lifecycle: `start_swing`
/// enables the volume, the forward mark disables it, the total mark
/// clears the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    damage: i32,
    volume_enabled: bool,
    recently_hit: Vec<NodeId>,
    swing_elapsed: Option<f32>,
}

impl Tool {
    fn new(damage: i32) -> Self {
        Self {
            damage,
            volume_enabled: false,
            recently_hit: Vec::new(),
            swing_elapsed: None,
        }
    }

    pub fn recently_hit(&self) -> &[NodeId] {
        &self.recently_hit
    }

    fn start_swing(&mut self) {
        self.volume_enabled = true;
        self.swing_elapsed = Some(0.0);
    }

    fn finish_forward_swing(&mut self) {
        self.volume_enabled = false;
    }

    fn finish_swing(&mut self) {
        self.recently_hit.clear();
        self.swing_elapsed = None;
    }

    pub fn already_hit(&self, node: NodeId) -> bool {
        self.recently_hit.contains(&node)
    }

    /// Records a landed hit. The ledger keeps set semantics: a node
    /// already present is not recorded again.
    fn record_hit(&mut self, node: NodeId) {
        if !self.already_hit(node) {
            self.recently_hit.push(node);
        }
    }
}

/// One controllable body: the player's or a follower's. Owns its
/// optional tool and the reference to whatever it carries; both are
/// wired at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub id: AvatarId,
    pub position: Vec3,
    pub forward: Vec3,
    vertical_velocity: f32,
    move_speed: f32,
    swinging: bool,
    walking: bool,
    carrying: Option<ItemId>,
    tool: Option<Tool>,
}

impl Avatar {
    fn new(id: AvatarId, position: Vec3, move_speed: f32, tool: Option<Tool>) -> Self {
        Self {
            id,
            position,
            forward: Vec3::new(0.0, 0.0, 1.0),
            vertical_velocity: 0.0,
            move_speed,
            swinging: false,
            walking: false,
            carrying: None,
            tool,
        }
    }

    pub fn ready_for_action(&self) -> bool {
        !self.swinging && self.carrying.is_none()
    }

    pub fn tool(&self) -> Option<&Tool> {
        self.tool.as_ref()
    }

    /// Vertical settle toward the ground plane. Runs unconditionally
    /// every tick for every avatar, before any behaviour logic.
    fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        let grounded = self.position.y <= GROUND_Y;
        if grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = 0.0;
        }
        self.vertical_velocity += gravity * dt;
        self.position.y = (self.position.y + self.vertical_velocity * dt).max(GROUND_Y);
    }

    /// Sets the facing direction from the ground-plane projection of
    /// `direction`; a degenerate direction leaves facing unchanged.
    fn face(&mut self, direction: Vec3) {
        let flat = direction.project_on_ground().normalized_or_zero();
        if flat != Vec3::ZERO {
            self.forward = flat;
        }
    }

    fn drive(&mut self, direction: Vec3, dt: f32, cues: &mut CueBus) {
        self.drive_with_speed(direction, self.move_speed, dt, cues);
    }

    fn drive_with_speed(&mut self, direction: Vec3, speed: f32, dt: f32, cues: &mut CueBus) {
        let flat = direction.project_on_ground();
        if flat.length_sq() > 0.0 {
            self.set_walking(true, cues);
            self.face(flat);
        } else {
            self.set_walking(false, cues);
        }
        self.position = self.position.add(flat.scale(speed * dt));
    }

    fn set_walking(&mut self, walking: bool, cues: &mut CueBus) {
        if self.walking != walking {
            self.walking = walking;
            cues.emit(Cue::WalkingChanged {
                avatar: self.id.0,
                walking,
            });
        }
    }

    fn probe_center(&self) -> Vec3 {
        self.position
            .add(self.forward.scale(PROBE_FORWARD_UNITS))
            .add(Vec3::new(0.0, PROBE_UP_UNITS, 0.0))
    }
}
