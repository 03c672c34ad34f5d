impl HarvestWorld {
    /// Turns a player action into orders for the followers, in the
    /// same tick the action happened.
    fn dispatch_signal(&mut self, signal: PlayerSignal) {
        match signal {
            PlayerSignal::ToolHit => self.order_harvest(),
            PlayerSignal::PickedUp { item } => self.order_gather(item),
            PlayerSignal::DroppedOff => self.order_deliver(),
        }
    }

    /// Every node the player's current swing already struck is held
    /// out of the pool, unless doing so would empty it entirely.
    /// Followers are served in list order; each offer consumes the
    /// pool entry nearest that follower whether or not the follower
    /// accepts, so two followers never chase the same node.
    fn order_harvest(&mut self) {
        let player_position = self.avatar_position(self.player);
        let found = self.space.overlap_sphere(
            player_position,
            self.config.order_range,
            ColliderTag::ResourceNode,
        );
        let mut pool: Vec<NodeId> = found
            .iter()
            .filter_map(|collider| self.node_by_collider.get(collider).copied())
            .collect();
        let struck: Vec<NodeId> = self
            .avatar(self.player)
            .and_then(Avatar::tool)
            .map(|tool| tool.recently_hit().to_vec())
            .unwrap_or_default();
        if pool.len() > struck.len() {
            pool.retain(|node| !struck.contains(node));
        }
        for follower_index in 0..self.followers.len() {
            if pool.is_empty() {
                break;
            }
            let follower_position = self.avatar_position(self.followers[follower_index].avatar);
            let candidates: Vec<(usize, Vec3)> = pool
                .iter()
                .enumerate()
                .filter_map(|(pool_index, node_id)| {
                    self.node(*node_id).map(|node| (pool_index, node.position))
                })
                .collect();
            let Some(pool_index) = nearest_by_distance(&candidates, follower_position) else {
                break;
            };
            let node_id = pool.remove(pool_index);
            self.offer_order(follower_index, Behaviour::Harvest, OrderTarget::Node(node_id));
        }
    }

    /// Same pool mechanics as harvesting; the item the player just
    /// picked up stays out of the pool.
    fn order_gather(&mut self, carried_item: ItemId) {
        let player_position = self.avatar_position(self.player);
        let found = self.space.overlap_sphere(
            player_position,
            self.config.order_range,
            ColliderTag::PickUp,
        );
        let mut pool: Vec<ItemId> = found
            .iter()
            .filter_map(|collider| self.item_by_collider.get(collider).copied())
            .filter(|&item_id| item_id != carried_item)
            .filter(|&item_id| self.item(item_id).is_some_and(Item::on_ground))
            .collect();
        for follower_index in 0..self.followers.len() {
            if pool.is_empty() {
                break;
            }
            let follower_position = self.avatar_position(self.followers[follower_index].avatar);
            let candidates: Vec<(usize, Vec3)> = pool
                .iter()
                .enumerate()
                .filter_map(|(pool_index, item_id)| {
                    self.item(*item_id).map(|item| (pool_index, item.position))
                })
                .collect();
            let Some(pool_index) = nearest_by_distance(&candidates, follower_position) else {
                break;
            };
            let item_id = pool.remove(pool_index);
            self.offer_order(follower_index, Behaviour::Gather, OrderTarget::Item(item_id));
        }
    }

    /// Sites are shared, not consumed: every carrying follower is sent
    /// to the site nearest it, and the same site may serve them all.
    fn order_deliver(&mut self) {
        let player_position = self.avatar_position(self.player);
        let found = self.space.overlap_sphere(
            player_position,
            self.config.order_range,
            ColliderTag::DropOff,
        );
        let sites: Vec<(SiteId, Vec3)> = found
            .iter()
            .filter_map(|collider| self.site_by_collider.get(collider).copied())
            .filter_map(|site_id| self.site(site_id).map(|site| (site_id, site.position)))
            .collect();
        if sites.is_empty() {
            return;
        }
        for follower_index in 0..self.followers.len() {
            let avatar_id = self.followers[follower_index].avatar;
            if !self.is_avatar_carrying(avatar_id) {
                continue;
            }
            let follower_position = self.avatar_position(avatar_id);
            let Some(site_id) = nearest_by_distance(&sites, follower_position) else {
                continue;
            };
            self.offer_order(follower_index, Behaviour::Deliver, OrderTarget::Site(site_id));
        }
    }

    fn offer_order(&mut self, follower_index: usize, behaviour: Behaviour, target: OrderTarget) -> bool {
        let avatar_id = self.followers[follower_index].avatar;
        let carrying = self.is_avatar_carrying(avatar_id);
        let accepted = self.followers[follower_index].take_order(behaviour, target, carrying);
        debug!(
            follower = avatar_id.0,
            order = behaviour.name(),
            accepted,
            "order_offer"
        );
        accepted
    }
}
