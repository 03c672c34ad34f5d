/// The whole harvest simulation: avatars, followers, nodes, items and
/// drop sites, plus the spatial index and cue bus they share. One
/// `step` is one fixed tick.
///
/// Tick order is load-bearing: node updates run before the swing
/// sweep, so a lethal hit landed on tick T only flips the node to
/// harvested on tick T+1.
#[derive(Debug)]
pub struct HarvestWorld {
    config: SimConfig,
    nav: NavGrid,
    space: Space,
    cues: CueBus,
    avatars: Vec<Avatar>,
    followers: Vec<Follower>,
    nodes: Vec<ResourceNode>,
    items: Vec<Item>,
    sites: Vec<DropSite>,
    player: AvatarId,
    next_avatar: u64,
    next_node: u64,
    next_item: u64,
    next_site: u64,
    node_by_collider: HashMap<ColliderId, NodeId>,
    item_by_collider: HashMap<ColliderId, ItemId>,
    site_by_collider: HashMap<ColliderId, SiteId>,
    tick: u64,
}

impl HarvestWorld {
    pub fn new(config: SimConfig, nav: NavGrid, player_position: Vec3) -> Self {
        let mut world = Self {
            config,
            nav,
            space: Space::default(),
            cues: CueBus::default(),
            avatars: Vec::new(),
            followers: Vec::new(),
            nodes: Vec::new(),
            items: Vec::new(),
            sites: Vec::new(),
            player: AvatarId(0),
            next_avatar: 0,
            next_node: 0,
            next_item: 0,
            next_site: 0,
            node_by_collider: HashMap::new(),
            item_by_collider: HashMap::new(),
            site_by_collider: HashMap::new(),
            tick: 0,
        };
        world.player = world.spawn_avatar(player_position);
        info!(player = world.player.0, "harvest world ready");
        world
    }

    fn spawn_avatar(&mut self, position: Vec3) -> AvatarId {
        let id = AvatarId(self.next_avatar);
        self.next_avatar += 1;
        let tool = Tool::new(self.config.tool_damage);
        self.avatars
            .push(Avatar::new(id, position, self.config.move_speed, Some(tool)));
        id
    }

    pub fn spawn_follower(&mut self, position: Vec3) -> AvatarId {
        let id = self.spawn_avatar(position);
        self.followers.push(Follower::new(id, self.player));
        debug!(follower = id.0, "follower_spawned");
        id
    }

    pub fn spawn_node(&mut self, position: Vec3, spawn_point: Vec3) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let collider = self.space.insert(ColliderTag::ResourceNode, position);
        self.node_by_collider.insert(collider, id);
        self.nodes.push(ResourceNode::new(
            id,
            position,
            spawn_point,
            self.config.node_health,
            collider,
        ));
        id
    }

    pub fn spawn_item(&mut self, position: Vec3) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        let collider = self.space.insert(ColliderTag::PickUp, position);
        self.item_by_collider.insert(collider, id);
        self.items.push(Item {
            id,
            position,
            on_ground: true,
            collider,
        });
        id
    }

    pub fn spawn_site(&mut self, position: Vec3) -> SiteId {
        let id = SiteId(self.next_site);
        self.next_site += 1;
        let collider = self.space.insert(ColliderTag::DropOff, position);
        self.site_by_collider.insert(collider, id);
        self.sites.push(DropSite {
            id,
            position,
            amount: 0,
            collider,
        });
        id
    }

    pub fn followers(&self) -> &[Follower] {
        &self.followers
    }

    pub fn sites(&self) -> &[DropSite] {
        &self.sites
    }

    fn avatar_index(&self, id: AvatarId) -> Option<usize> {
        self.avatars.iter().position(|avatar| avatar.id == id)
    }

    pub fn avatar(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|avatar| avatar.id == id)
    }

    fn avatar_position(&self, id: AvatarId) -> Vec3 {
        self.avatar(id).map_or(Vec3::ZERO, |avatar| avatar.position)
    }

    fn is_avatar_carrying(&self, id: AvatarId) -> bool {
        self.avatar(id).is_some_and(|avatar| avatar.carrying.is_some())
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn site(&self, id: SiteId) -> Option<&DropSite> {
        self.sites.iter().find(|site| site.id == id)
    }

    fn target_position(&self, target: OrderTarget) -> Option<Vec3> {
        match target {
            OrderTarget::Avatar(id) => self.avatar(id).map(|avatar| avatar.position),
            OrderTarget::Node(id) => self.node(id).map(|node| node.position),
            OrderTarget::Item(id) => self.item(id).map(|item| item.position),
            OrderTarget::Site(id) => self.site(id).map(|site| site.position),
        }
    }

    /// Advances the world by one fixed tick and returns the cues it
    /// raised, in emission order.
    pub fn step(&mut self, dt: f32, input: &InputSnapshot) -> Vec<Cue> {
        self.run_node_updates(dt);
        let gravity = self.config.gravity;
        for avatar in &mut self.avatars {
            avatar.apply_gravity(gravity, dt);
        }
        self.run_player_input(dt, input);
        self.run_swings(dt);
        self.run_follower_behaviours(dt);
        self.sync_carried_items();
        self.tick += 1;
        self.cues.finish_tick_rollover()
    }

    /// Harvest checks and respawn countdowns. The harvest check reads
    /// the health left behind by the previous tick's swing sweep.
    fn run_node_updates(&mut self, dt: f32) {
        let mut spawns: Vec<(NodeId, Vec3)> = Vec::new();
        for index in 0..self.nodes.len() {
            if self.nodes[index].alive && self.nodes[index].health <= 0 {
                let collider = self.nodes[index].collider;
                self.nodes[index].harvest(self.config.spawn_delay_seconds, &mut self.cues);
                self.space.set_enabled(collider, false);
            }
            let node = &mut self.nodes[index];
            if let Some(remaining) = node.spawn_countdown {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    node.spawn_countdown = None;
                    spawns.push((node.id, node.spawn_point));
                } else {
                    node.spawn_countdown = Some(remaining);
                }
            }
        }
        for (node_id, position) in spawns {
            let item_id = self.spawn_item(position);
            self.cues.emit(Cue::ResourceSpawned {
                node: node_id.0,
                item: item_id.0,
            });
        }
    }

    fn run_player_input(&mut self, dt: f32, input: &InputSnapshot) {
        let Some(index) = self.avatar_index(self.player) else {
            return;
        };
        let direction = move_direction_from_axis(input.move_axis());
        self.avatars[index].drive(direction, dt, &mut self.cues);
        if input.primary_pressed() {
            self.begin_swing(self.player);
        }
        if input.secondary_pressed() {
            self.pick_up_or_drop_off(self.player);
        }
    }

    /// Starts a swing if the avatar is empty-handed, not already
    /// swinging, and actually holds a tool.
    fn begin_swing(&mut self, avatar_id: AvatarId) {
        let Some(index) = self.avatar_index(avatar_id) else {
            return;
        };
        let avatar = &mut self.avatars[index];
        if !avatar.ready_for_action() {
            return;
        }
        let Some(tool) = avatar.tool.as_mut() else {
            return;
        };
        tool.start_swing();
        avatar.swinging = true;
        self.cues.emit(Cue::SwingStarted { avatar: avatar_id.0 });
    }

    fn run_swings(&mut self, dt: f32) {
        for index in 0..self.avatars.len() {
            self.advance_swing(index, dt);
        }
    }

    /// One tick of an in-flight swing: sweep the probe volume while
    /// the tool's hit volume is live, then cross the forward and total
    /// time marks. Every hit landed by the player dispatches orders.
    fn advance_swing(&mut self, index: usize, dt: f32) {
        if !self.avatars[index].swinging {
            return;
        }
        let Some(tool) = self.avatars[index].tool.as_ref() else {
            return;
        };
        let Some(elapsed) = tool.swing_elapsed else {
            return;
        };
        let elapsed = elapsed + dt;
        let damage = tool.damage;
        let avatar_id = self.avatars[index].id;

        let mut landed_hits = 0u32;
        if tool.volume_enabled {
            let center = self.avatars[index].probe_center();
            let forward = self.avatars[index].forward;
            let swept =
                self.space
                    .overlap_box(center, probe_half_extents(), forward, ColliderTag::ResourceNode);
            for collider in swept {
                let Some(&node_id) = self.node_by_collider.get(&collider) else {
                    continue;
                };
                let hit_before = self.avatars[index]
                    .tool
                    .as_ref()
                    .is_some_and(|tool| tool.already_hit(node_id));
                if hit_before {
                    continue;
                }
                if let Some(tool) = self.avatars[index].tool.as_mut() {
                    tool.record_hit(node_id);
                }
                if let Some(node) = self.nodes.iter_mut().find(|node| node.id == node_id) {
                    node.get_hit(damage, &mut self.cues);
                }
                self.cues.emit(Cue::ToolImpact {
                    avatar: avatar_id.0,
                    node: node_id.0,
                });
                landed_hits += 1;
            }
        }

        if let Some(tool) = self.avatars[index].tool.as_mut() {
            tool.swing_elapsed = Some(elapsed);
            if elapsed >= self.config.swing_forward_seconds {
                tool.finish_forward_swing();
            }
        }
        if elapsed >= self.config.swing_total_seconds {
            if let Some(tool) = self.avatars[index].tool.as_mut() {
                tool.finish_swing();
            }
            self.avatars[index].swinging = false;
        }

        if avatar_id == self.player {
            for _ in 0..landed_hits {
                self.dispatch_signal(PlayerSignal::ToolHit);
            }
        }
    }

    /// The carry-state actuator: a carrying avatar tries to drop off,
    /// an empty-handed one tries to pick up. Mid-swing it is a no-op.
    fn pick_up_or_drop_off(&mut self, avatar_id: AvatarId) {
        let Some(index) = self.avatar_index(avatar_id) else {
            return;
        };
        if self.avatars[index].swinging {
            return;
        }
        match self.avatars[index].carrying {
            Some(item_id) => self.try_drop_off(index, item_id),
            None => self.try_pick_up(index),
        }
    }

    fn try_pick_up(&mut self, index: usize) {
        let center = self.avatars[index].probe_center();
        let forward = self.avatars[index].forward;
        let found = self
            .space
            .overlap_box(center, probe_half_extents(), forward, ColliderTag::PickUp);
        let candidates: Vec<(ItemId, Vec3)> = found
            .iter()
            .filter_map(|collider| self.item_by_collider.get(collider).copied())
            .filter_map(|item_id| self.item(item_id))
            .filter(|item| item.on_ground)
            .map(|item| (item.id, item.position))
            .collect();
        let from = self.avatars[index].position;
        let Some(item_id) = nearest_by_distance(&candidates, from) else {
            return;
        };
        let avatar_id = self.avatars[index].id;
        if let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) {
            item.on_ground = false;
            self.space.set_tag(item.collider, ColliderTag::Carried);
        }
        self.avatars[index].carrying = Some(item_id);
        self.cues.emit(Cue::ItemPickedUp {
            avatar: avatar_id.0,
            item: item_id.0,
        });
        self.cues.emit(Cue::CarryingChanged {
            avatar: avatar_id.0,
            carrying: true,
        });
        if avatar_id == self.player {
            self.dispatch_signal(PlayerSignal::PickedUp { item: item_id });
        }
    }

    /// Failure leaves the carry state untouched, so the avatar can
    /// retry at another site.
    fn try_drop_off(&mut self, index: usize, item_id: ItemId) {
        let center = self.avatars[index].probe_center();
        let forward = self.avatars[index].forward;
        let found = self
            .space
            .overlap_box(center, probe_half_extents(), forward, ColliderTag::DropOff);
        let candidates: Vec<(SiteId, Vec3)> = found
            .iter()
            .filter_map(|collider| self.site_by_collider.get(collider).copied())
            .filter_map(|site_id| self.site(site_id).map(|site| (site_id, site.position)))
            .collect();
        let from = self.avatars[index].position;
        let Some(site_id) = nearest_by_distance(&candidates, from) else {
            return;
        };
        let Some(site_index) = self.sites.iter().position(|site| site.id == site_id) else {
            return;
        };
        if !self.sites[site_index].receive_item(item_id, &mut self.cues) {
            return;
        }
        info!(
            site = site_id.0,
            amount = self.sites[site_index].amount,
            "delivery_received"
        );
        if let Some(item_index) = self.items.iter().position(|item| item.id == item_id) {
            let collider = self.items[item_index].collider;
            self.space.remove(collider);
            self.item_by_collider.remove(&collider);
            self.items.remove(item_index);
        }
        let avatar_id = self.avatars[index].id;
        self.avatars[index].carrying = None;
        self.cues.emit(Cue::CarryingChanged {
            avatar: avatar_id.0,
            carrying: false,
        });
        if avatar_id == self.player {
            self.dispatch_signal(PlayerSignal::DroppedOff);
        }
    }

    /// Keeps a carried item (and its collider) riding the carrier.
    fn sync_carried_items(&mut self) {
        for index in 0..self.avatars.len() {
            let Some(item_id) = self.avatars[index].carrying else {
                continue;
            };
            let anchor = self.avatars[index].probe_center();
            if let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) {
                item.position = anchor;
                self.space.set_position(item.collider, anchor);
            }
        }
    }
}

impl Simulation for HarvestWorld {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SimCommand {
        self.step(fixed_dt_seconds, input);
        SimCommand::Continue
    }
}
