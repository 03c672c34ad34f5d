/// One AI-driven hand. The behaviour field is the whole state
/// machine; transitions happen only through `take_order` or the
/// internal revert when a target goes stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Follower {
    pub avatar: AvatarId,
    behaviour: Behaviour,
    target: OrderTarget,
}

impl Follower {
    fn new(avatar: AvatarId, player: AvatarId) -> Self {
        Self {
            avatar,
            behaviour: Behaviour::Follow,
            target: OrderTarget::Avatar(player),
        }
    }

    pub fn behaviour(&self) -> Behaviour {
        self.behaviour
    }

    pub fn target(&self) -> OrderTarget {
        self.target
    }

    /// Order acceptance: Deliver is accepted by a carrying follower
    /// no matter what it is doing; every other order only lands on a
    /// follower that is following and empty-handed.
    fn take_order(&mut self, new_behaviour: Behaviour, target: OrderTarget, carrying: bool) -> bool {
        let accepted = if new_behaviour == Behaviour::Deliver {
            carrying
        } else {
            self.behaviour == Behaviour::Follow && !carrying
        };
        if accepted {
            self.behaviour = new_behaviour;
            self.target = target;
        }
        accepted
    }

    fn return_to_follow(&mut self, player: AvatarId) {
        self.behaviour = Behaviour::Follow;
        self.target = OrderTarget::Avatar(player);
    }
}

impl HarvestWorld {
    /// Exactly one behaviour evaluation per follower per tick, in
    /// list order.
    fn run_follower_behaviours(&mut self, dt: f32) {
        for index in 0..self.followers.len() {
            self.run_follower_behaviour(index, dt);
        }
    }

    fn run_follower_behaviour(&mut self, index: usize, dt: f32) {
        let behaviour = self.followers[index].behaviour;
        match behaviour {
            Behaviour::Follow => self.follower_follow(index, dt),
            Behaviour::PullCart => self.follower_pull_cart(index, dt),
            Behaviour::Harvest => self.follower_harvest(index, dt),
            Behaviour::Gather => self.follower_gather(index, dt),
            Behaviour::Deliver => self.follower_deliver(index, dt),
        }
    }

    fn follower_follow(&mut self, index: usize, dt: f32) {
        let Some(target_position) = self.target_position(self.followers[index].target()) else {
            self.revert_follower(index);
            return;
        };
        let avatar_id = self.followers[index].avatar;
        let distance = self.avatar_position(avatar_id).distance(target_position);
        if distance > self.config.follow_distance {
            self.move_closer(avatar_id, target_position, None, dt);
        } else {
            self.stop_and_face(avatar_id, target_position, dt);
        }
    }

    fn follower_pull_cart(&mut self, index: usize, dt: f32) {
        let Some(target_position) = self.target_position(self.followers[index].target()) else {
            self.revert_follower(index);
            return;
        };
        let avatar_id = self.followers[index].avatar;
        let distance = self.avatar_position(avatar_id).distance(target_position);
        if distance > self.config.follow_distance_with_cart {
            self.move_closer(
                avatar_id,
                target_position,
                Some(self.config.cart_pull_speed),
                dt,
            );
        } else {
            self.stop(avatar_id, dt);
        }
    }

    fn follower_harvest(&mut self, index: usize, dt: f32) {
        let OrderTarget::Node(node_id) = self.followers[index].target() else {
            self.revert_follower(index);
            return;
        };
        let Some(node) = self.node(node_id) else {
            self.revert_follower(index);
            return;
        };
        if !node.alive() {
            self.revert_follower(index);
            return;
        }
        let target_position = node.position;
        let avatar_id = self.followers[index].avatar;
        if self.avatar_position(avatar_id).distance(target_position) > self.config.harvest_distance
        {
            self.move_closer(avatar_id, target_position, None, dt);
        } else {
            self.stop_and_face(avatar_id, target_position, dt);
            self.begin_swing(avatar_id);
        }
    }

    fn follower_gather(&mut self, index: usize, dt: f32) {
        let OrderTarget::Item(item_id) = self.followers[index].target() else {
            self.revert_follower(index);
            return;
        };
        let Some(item) = self.item(item_id) else {
            self.revert_follower(index);
            return;
        };
        if !item.on_ground() {
            self.revert_follower(index);
            return;
        }
        let target_position = item.position;
        let avatar_id = self.followers[index].avatar;
        if self.avatar_position(avatar_id).distance(target_position) > self.config.gather_distance
        {
            self.move_closer(avatar_id, target_position, None, dt);
        } else {
            self.stop_and_face(avatar_id, target_position, dt);
            self.pick_up_or_drop_off(avatar_id);
        }
    }

    fn follower_deliver(&mut self, index: usize, dt: f32) {
        let OrderTarget::Site(site_id) = self.followers[index].target() else {
            self.revert_follower(index);
            return;
        };
        let Some(site) = self.site(site_id) else {
            self.revert_follower(index);
            return;
        };
        let target_position = site.position;
        let avatar_id = self.followers[index].avatar;
        if !self.is_avatar_carrying(avatar_id) {
            self.revert_follower(index);
            return;
        }
        if self.avatar_position(avatar_id).distance(target_position)
            > self.config.deliver_distance
        {
            self.move_closer(avatar_id, target_position, None, dt);
        } else {
            self.stop_and_face(avatar_id, target_position, dt);
            self.pick_up_or_drop_off(avatar_id);
        }
    }

    fn revert_follower(&mut self, index: usize) {
        let player = self.player;
        let follower = &mut self.followers[index];
        debug!(
            follower = follower.avatar.0,
            from = follower.behaviour.name(),
            "follower_revert"
        );
        follower.return_to_follow(player);
    }

    /// One committed step along a freshly computed path: movement
    /// follows the path's first intermediate corner for this tick
    /// rather than replanning mid-segment.
    fn move_closer(&mut self, avatar_id: AvatarId, target: Vec3, speed: Option<f32>, dt: f32) {
        let from = self.avatar_position(avatar_id);
        let Some(path) = self.nav.compute_path(from, target) else {
            return;
        };
        let Some(corner) = path.next_corner() else {
            return;
        };
        let direction = corner.sub(from).normalized_or_zero();
        let Some(index) = self.avatar_index(avatar_id) else {
            return;
        };
        let avatar = &mut self.avatars[index];
        match speed {
            Some(speed) => avatar.drive_with_speed(direction, speed, dt, &mut self.cues),
            None => avatar.drive(direction, dt, &mut self.cues),
        }
    }

    fn stop(&mut self, avatar_id: AvatarId, dt: f32) {
        let Some(index) = self.avatar_index(avatar_id) else {
            return;
        };
        self.avatars[index].drive(Vec3::ZERO, dt, &mut self.cues);
    }

    fn stop_and_face(&mut self, avatar_id: AvatarId, target: Vec3, dt: f32) {
        let Some(index) = self.avatar_index(avatar_id) else {
            return;
        };
        let toward = target.sub(self.avatars[index].position);
        let avatar = &mut self.avatars[index];
        avatar.drive(Vec3::ZERO, dt, &mut self.cues);
        avatar.face(toward);
    }
}
