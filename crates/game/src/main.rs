use engine::{run_sim_immediate, InputSnapshot, InputSource, NavGrid, Vec3};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;

use app::bootstrap::resolve_config;
use app::gameplay::{Behaviour, DropSite, HarvestWorld};

const DEMO_TICKS: u64 = 1200;
const TARGET_TPS: u32 = 60;

/// Canned player actions for the headless demo: three swings at the
/// front node, walk back, pick up, deliver. Everything else the
/// followers do on their own from the orders those actions raise.
struct ScriptedInput;

impl InputSource for ScriptedInput {
    fn next_snapshot(&mut self, tick: u64) -> InputSnapshot {
        match tick {
            0 | 45 | 90 => InputSnapshot::empty().with_primary_pressed(true),
            200 => InputSnapshot::empty().with_secondary_pressed(true),
            210..=264 => InputSnapshot::empty().with_move_axis(0.0, -1.0),
            280 => InputSnapshot::empty().with_secondary_pressed(true),
            _ => InputSnapshot::empty(),
        }
    }
}

fn build_demo_world() -> HarvestWorld {
    let config = resolve_config();
    let nav = NavGrid::open(32, 32, Vec3::new(-16.0, 0.0, -16.0));
    let mut world = HarvestWorld::new(config, nav, Vec3::new(0.5, 0.0, 0.5));
    world.spawn_follower(Vec3::new(2.5, 0.0, -1.5));
    world.spawn_follower(Vec3::new(-2.5, 0.0, -1.5));
    world.spawn_node(Vec3::new(0.5, 0.0, 2.5), Vec3::new(0.5, 0.0, 2.5));
    world.spawn_node(Vec3::new(4.5, 0.0, 2.5), Vec3::new(4.5, 0.0, 3.5));
    world.spawn_node(Vec3::new(-3.5, 0.0, 2.5), Vec3::new(-3.5, 0.0, 3.5));
    world.spawn_site(Vec3::new(0.5, 0.0, -3.5));
    world
}

fn main() {
    init_tracing();
    info!("=== Steading Startup ===");

    let mut world = build_demo_world();
    let mut input = ScriptedInput;

    match run_sim_immediate(DEMO_TICKS, TARGET_TPS, &mut world, &mut input) {
        Ok(ticks) => {
            let delivered: u32 = world.sites().iter().map(DropSite::amount).sum();
            let idle = world
                .followers()
                .iter()
                .filter(|follower| follower.behaviour() == Behaviour::Follow)
                .count();
            info!(ticks, delivered, idle_followers = idle, "demo_complete");
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
