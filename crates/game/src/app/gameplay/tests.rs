use super::*;

const DT: f32 = 1.0 / 60.0;

fn open_grid() -> NavGrid {
    NavGrid::open(32, 32, Vec3::new(-16.0, 0.0, -16.0))
}

fn world_at(player_position: Vec3) -> HarvestWorld {
    HarvestWorld::new(SimConfig::default(), open_grid(), player_position)
}

fn world_with(config: SimConfig, player_position: Vec3) -> HarvestWorld {
    HarvestWorld::new(config, open_grid(), player_position)
}

fn step_n(world: &mut HarvestWorld, ticks: u32, input: &InputSnapshot) {
    for _ in 0..ticks {
        world.step(DT, input);
    }
}

fn swing_input() -> InputSnapshot {
    InputSnapshot::empty().with_primary_pressed(true)
}

fn interact_input() -> InputSnapshot {
    InputSnapshot::empty().with_secondary_pressed(true)
}

#[test]
fn tool_ledger_keeps_set_semantics_and_clears_on_finish() {
    let mut tool = Tool::new(1);
    tool.start_swing();
    tool.record_hit(NodeId(7));
    tool.record_hit(NodeId(7));
    tool.record_hit(NodeId(9));
    assert_eq!(tool.recently_hit(), &[NodeId(7), NodeId(9)]);
    tool.finish_forward_swing();
    assert!(!tool.volume_enabled);
    assert_eq!(tool.recently_hit().len(), 2);
    tool.finish_swing();
    assert!(tool.recently_hit().is_empty());
}

#[test]
fn dead_node_ignores_further_hits() {
    let mut cues = CueBus::default();
    let mut node = ResourceNode::new(NodeId(1), Vec3::ZERO, Vec3::ZERO, 2, ColliderId(1));
    node.get_hit(5, &mut cues);
    node.harvest(0.5, &mut cues);
    let health = node.health;
    node.get_hit(5, &mut cues);
    assert!(!node.alive());
    assert_eq!(node.health, health);
}

#[test]
fn order_acceptance_rules() {
    let player = AvatarId(0);
    let mut follower = Follower::new(AvatarId(1), player);
    assert!(!follower.take_order(Behaviour::Deliver, OrderTarget::Site(SiteId(0)), false));
    assert!(follower.take_order(Behaviour::Harvest, OrderTarget::Node(NodeId(0)), false));
    assert!(!follower.take_order(Behaviour::Gather, OrderTarget::Item(ItemId(0)), false));
    assert!(follower.take_order(Behaviour::Deliver, OrderTarget::Site(SiteId(0)), true));

    let mut carrying_follower = Follower::new(AvatarId(2), player);
    assert!(!carrying_follower.take_order(Behaviour::Harvest, OrderTarget::Node(NodeId(0)), true));
    assert_eq!(carrying_follower.behaviour(), Behaviour::Follow);
}

#[test]
fn player_swing_hits_node_in_probe() {
    let mut world = world_at(Vec3::ZERO);
    let node = world.spawn_node(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));
    let cues = world.step(DT, &swing_input());
    assert!(cues.iter().any(|cue| matches!(cue, Cue::SwingStarted { .. })));
    assert!(cues.iter().any(|cue| matches!(cue, Cue::ToolImpact { .. })));
    let expected = SimConfig::default().node_health - SimConfig::default().tool_damage;
    assert_eq!(world.node(node).map(|node| node.health), Some(expected));
}

#[test]
fn swing_while_swinging_is_ignored() {
    let mut world = world_at(Vec3::ZERO);
    world.step(DT, &swing_input());
    let cues = world.step(DT, &swing_input());
    assert!(!cues.iter().any(|cue| matches!(cue, Cue::SwingStarted { .. })));
}

#[test]
fn one_swing_strikes_each_node_once() {
    let mut world = world_at(Vec3::ZERO);
    let node = world.spawn_node(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));
    world.step(DT, &swing_input());
    // the volume stays live for several more ticks; the ledger blocks repeats
    step_n(&mut world, 10, &InputSnapshot::empty());
    let expected = SimConfig::default().node_health - SimConfig::default().tool_damage;
    assert_eq!(world.node(node).map(|node| node.health), Some(expected));
}

#[test]
fn lethal_hit_flips_alive_one_tick_later() {
    let mut config = SimConfig::default();
    config.tool_damage = 2;
    config.node_health = 3;
    let swing_ticks = (config.swing_total_seconds / DT).ceil() as u32;
    let mut world = world_with(config, Vec3::ZERO);
    let node = world.spawn_node(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));

    world.step(DT, &swing_input());
    assert_eq!(world.node(node).map(|node| node.health), Some(1));
    step_n(&mut world, swing_ticks, &InputSnapshot::empty());

    world.step(DT, &swing_input());
    let struck = world.node(node).unwrap();
    assert_eq!(struck.health, -1);
    assert!(struck.alive(), "alive only flips in the next node update");

    world.step(DT, &InputSnapshot::empty());
    assert!(!world.node(node).unwrap().alive());
}

#[test]
fn harvested_node_spawns_item_at_spawn_point_after_delay() {
    let mut config = SimConfig::default();
    config.tool_damage = 5;
    let spawn_ticks = (config.spawn_delay_seconds / DT).ceil() as u32;
    let spawn_point = Vec3::new(2.0, 0.0, 1.0);
    let mut world = world_with(config, Vec3::ZERO);
    let node = world.spawn_node(Vec3::new(0.0, 0.0, 1.0), spawn_point);

    world.step(DT, &swing_input());
    world.step(DT, &InputSnapshot::empty());
    assert!(!world.node(node).unwrap().alive());

    let mut spawned = Vec::new();
    for _ in 0..spawn_ticks {
        spawned = world.step(DT, &InputSnapshot::empty());
    }
    let item_id = spawned.iter().find_map(|cue| match cue {
        Cue::ResourceSpawned { item, .. } => Some(ItemId(*item)),
        _ => None,
    });
    let item = item_id.and_then(|id| world.item(id)).unwrap();
    assert!(item.on_ground());
    assert_eq!(item.position, spawn_point);
}

#[test]
fn player_pickup_then_dropoff_round_trip() {
    let mut world = world_at(Vec3::ZERO);
    let item = world.spawn_item(Vec3::new(0.0, 0.0, 1.0));
    let site = world.spawn_site(Vec3::new(0.0, 0.0, 1.0));

    let cues = world.step(DT, &interact_input());
    assert!(cues.iter().any(|cue| matches!(cue, Cue::ItemPickedUp { .. })));
    let player = world.player;
    assert_eq!(world.avatar(player).unwrap().carrying, Some(item));
    assert!(!world.item(item).unwrap().on_ground());

    let cues = world.step(DT, &interact_input());
    assert!(cues.iter().any(|cue| matches!(cue, Cue::SitePulse { .. })));
    assert!(world.avatar(player).unwrap().ready_for_action());
    assert!(world.item(item).is_none());
    assert_eq!(world.site(site).map(DropSite::amount), Some(1));
}

#[test]
fn pickup_during_swing_is_ignored() {
    let mut world = world_at(Vec3::ZERO);
    let item = world.spawn_item(Vec3::new(0.0, 0.0, 1.0));
    world.step(DT, &swing_input());
    world.step(DT, &interact_input());
    let player = world.player;
    assert_eq!(world.avatar(player).unwrap().carrying, None);
    assert!(world.item(item).unwrap().on_ground());
}

#[test]
fn dropoff_without_site_keeps_carrying() {
    let mut world = world_at(Vec3::ZERO);
    let item = world.spawn_item(Vec3::new(0.0, 0.0, 1.0));
    world.step(DT, &interact_input());
    world.step(DT, &interact_input());
    let player = world.player;
    assert_eq!(world.avatar(player).unwrap().carrying, Some(item));
    assert!(world.item(item).is_some());
}

#[test]
fn struck_node_excluded_while_others_remain() {
    let mut world = world_at(Vec3::ZERO);
    let follower = world.spawn_follower(Vec3::new(0.0, 0.0, -2.0));
    world.spawn_node(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));
    let far_node = world.spawn_node(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 0.0));

    world.step(DT, &swing_input());
    let state = &world.followers()[0];
    assert_eq!(state.avatar, follower);
    assert_eq!(state.behaviour(), Behaviour::Harvest);
    assert_eq!(state.target(), OrderTarget::Node(far_node));
}

#[test]
fn struck_node_offered_when_it_is_the_whole_pool() {
    let mut world = world_at(Vec3::ZERO);
    world.spawn_follower(Vec3::new(0.0, 0.0, -2.0));
    let node = world.spawn_node(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));

    world.step(DT, &swing_input());
    let state = &world.followers()[0];
    assert_eq!(state.behaviour(), Behaviour::Harvest);
    assert_eq!(state.target(), OrderTarget::Node(node));
}

#[test]
fn harvest_orders_pick_nearest_node_to_each_follower() {
    let mut world = world_at(Vec3::ZERO);
    world.spawn_follower(Vec3::new(5.0, 0.0, 0.0));
    // three units from the follower; the other node is seven away
    let near_follower = world.spawn_node(Vec3::new(8.0, 0.0, 0.0), Vec3::new(8.0, 0.0, 1.0));
    world.spawn_node(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 1.0));

    world.order_harvest();
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Harvest);
    assert_eq!(world.followers()[0].target(), OrderTarget::Node(near_follower));
}

#[test]
fn two_followers_never_chase_the_same_node() {
    let mut world = world_at(Vec3::ZERO);
    world.spawn_follower(Vec3::new(1.0, 0.0, 0.0));
    world.spawn_follower(Vec3::new(2.0, 0.0, 0.0));
    world.spawn_node(Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 1.0));
    world.spawn_node(Vec3::new(8.0, 0.0, 0.0), Vec3::new(8.0, 0.0, 1.0));

    world.order_harvest();
    let first = world.followers()[0].target();
    let second = world.followers()[1].target();
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Harvest);
    assert_eq!(world.followers()[1].behaviour(), Behaviour::Harvest);
    assert_ne!(first, second);
}

#[test]
fn rejected_offer_still_consumes_the_pool_entry() {
    let mut world = world_at(Vec3::ZERO);
    let player = world.player;
    world.spawn_follower(Vec3::new(2.0, 0.0, 0.0));
    world.spawn_follower(Vec3::new(2.5, 0.0, 0.0));
    world.spawn_node(Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 1.0));
    let far_node = world.spawn_node(Vec3::new(8.0, 0.0, 0.0), Vec3::new(8.0, 0.0, 1.0));

    // the first follower is busy and will decline, but its offer still
    // burns the node nearest to it
    world.followers[0].take_order(Behaviour::PullCart, OrderTarget::Avatar(player), false);
    world.order_harvest();
    assert_eq!(world.followers()[0].behaviour(), Behaviour::PullCart);
    assert_eq!(world.followers()[1].behaviour(), Behaviour::Harvest);
    assert_eq!(world.followers()[1].target(), OrderTarget::Node(far_node));
}

#[test]
fn gather_orders_exclude_the_item_just_picked_up() {
    let mut world = world_at(Vec3::ZERO);
    world.spawn_follower(Vec3::new(-2.0, 0.0, 0.0));
    world.spawn_item(Vec3::new(0.0, 0.0, 1.0));
    let ground_item = world.spawn_item(Vec3::new(3.0, 0.0, 0.0));

    world.step(DT, &interact_input());
    let state = &world.followers()[0];
    assert_eq!(state.behaviour(), Behaviour::Gather);
    assert_eq!(state.target(), OrderTarget::Item(ground_item));
}

#[test]
fn deliver_orders_share_one_site_and_skip_empty_hands() {
    let mut world = world_at(Vec3::ZERO);
    let first = world.spawn_follower(Vec3::new(1.0, 0.0, 0.0));
    let second = world.spawn_follower(Vec3::new(2.0, 0.0, 0.0));
    world.spawn_follower(Vec3::new(3.0, 0.0, 0.0));
    let site = world.spawn_site(Vec3::new(5.0, 0.0, 0.0));
    let item_a = world.spawn_item(Vec3::new(1.0, 0.0, 0.0));
    let item_b = world.spawn_item(Vec3::new(2.0, 0.0, 0.0));

    let first_index = world.avatar_index(first).unwrap();
    world.avatars[first_index].carrying = Some(item_a);
    let second_index = world.avatar_index(second).unwrap();
    world.avatars[second_index].carrying = Some(item_b);

    world.order_deliver();
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Deliver);
    assert_eq!(world.followers()[0].target(), OrderTarget::Site(site));
    assert_eq!(world.followers()[1].behaviour(), Behaviour::Deliver);
    assert_eq!(world.followers()[1].target(), OrderTarget::Site(site));
    assert_eq!(world.followers()[2].behaviour(), Behaviour::Follow);
}

#[test]
fn delivering_follower_feeds_the_site_and_reverts() {
    let mut world = world_at(Vec3::new(10.5, 0.0, 10.5));
    let follower = world.spawn_follower(Vec3::ZERO);
    let site = world.spawn_site(Vec3::new(0.0, 0.0, 1.5));
    let item = world.spawn_item(Vec3::ZERO);

    let index = world.avatar_index(follower).unwrap();
    world.avatars[index].carrying = Some(item);
    if let Some(item) = world.items.iter_mut().find(|candidate| candidate.id == item) {
        item.on_ground = false;
    }
    world.followers[0].take_order(Behaviour::Deliver, OrderTarget::Site(site), true);

    world.step(DT, &InputSnapshot::empty());
    assert_eq!(world.site(site).map(DropSite::amount), Some(1));
    assert!(world.item(item).is_none());
    assert_eq!(world.avatar(follower).unwrap().carrying, None);

    world.step(DT, &InputSnapshot::empty());
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Follow);
}

#[test]
fn gather_reverts_when_the_item_leaves_the_ground() {
    let mut world = world_at(Vec3::new(10.5, 0.0, 10.5));
    world.spawn_follower(Vec3::ZERO);
    let item = world.spawn_item(Vec3::new(5.0, 0.0, 0.0));
    world.followers[0].take_order(Behaviour::Gather, OrderTarget::Item(item), false);

    if let Some(item) = world.items.iter_mut().find(|candidate| candidate.id == item) {
        item.on_ground = false;
    }
    world.step(DT, &InputSnapshot::empty());
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Follow);
}

#[test]
fn close_follower_stops_and_faces_its_target() {
    let mut world = world_at(Vec3::new(0.5, 0.0, 2.0));
    let follower = world.spawn_follower(Vec3::new(0.5, 0.0, 0.5));
    world.step(DT, &InputSnapshot::empty());

    let avatar = world.avatar(follower).unwrap();
    assert!((avatar.position.x - 0.5).abs() < 1e-4);
    assert!((avatar.position.z - 0.5).abs() < 1e-4);
    assert!(avatar.forward.z > 0.9);
}

#[test]
fn cart_puller_moves_at_the_cart_speed() {
    let mut world = world_at(Vec3::new(0.5, 0.0, 8.5));
    let player = world.player;
    let follower = world.spawn_follower(Vec3::new(0.5, 0.0, 0.5));
    world.followers[0].take_order(Behaviour::PullCart, OrderTarget::Avatar(player), false);

    world.step(DT, &InputSnapshot::empty());
    let moved = world.avatar(follower).unwrap().position.z - 0.5;
    let expected = SimConfig::default().cart_pull_speed * DT;
    assert!((moved - expected).abs() < 1e-4, "moved {moved}");
}

#[test]
fn avatars_settle_onto_the_ground() {
    let mut world = world_at(Vec3::ZERO);
    let player = world.player;
    let index = world.avatar_index(player).unwrap();
    world.avatars[index].position.y = 3.0;

    step_n(&mut world, 120, &InputSnapshot::empty());
    assert_eq!(world.avatar(player).unwrap().position.y, 0.0);
}

#[test]
fn walking_cue_fires_only_on_edges() {
    let mut world = world_at(Vec3::ZERO);
    let forward = InputSnapshot::empty().with_move_axis(0.0, 1.0);

    let cues = world.step(DT, &forward);
    assert!(cues
        .iter()
        .any(|cue| matches!(cue, Cue::WalkingChanged { walking: true, .. })));
    assert_eq!(world.cues.last_tick_counts().walking_changed, 1);

    let cues = world.step(DT, &forward);
    assert!(!cues.iter().any(|cue| matches!(cue, Cue::WalkingChanged { .. })));

    let cues = world.step(DT, &InputSnapshot::empty());
    assert!(cues
        .iter()
        .any(|cue| matches!(cue, Cue::WalkingChanged { walking: false, .. })));
}

#[test]
fn follower_harvests_a_far_node_and_returns_to_following() {
    let mut world = world_at(Vec3::new(10.5, 0.0, 10.5));
    world.spawn_follower(Vec3::new(0.5, 0.0, -5.5));
    let spawn_point = Vec3::new(2.5, 0.0, 0.5);
    let node = world.spawn_node(Vec3::new(0.5, 0.0, 0.5), spawn_point);
    world.followers[0].take_order(Behaviour::Harvest, OrderTarget::Node(node), false);

    step_n(&mut world, 600, &InputSnapshot::empty());
    assert!(!world.node(node).unwrap().alive());
    assert_eq!(world.followers()[0].behaviour(), Behaviour::Follow);
    let spawned = world
        .items
        .iter()
        .find(|item| item.position == spawn_point)
        .unwrap();
    assert!(spawned.on_ground());
}
