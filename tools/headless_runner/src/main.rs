//! Runs the RPG simulation without a renderer.
//!
//! A simple autopilot plays the hero: it walks to the nearest enemy, swings
//! when the enemy is in reach and drinks a potion when health runs low.

use clap::Parser;
use sim_host::SimHost;
use sim_rpg::entity::Faction;
use sim_rpg::items::Item;
use sim_rpg::{RpgAction, RpgConfig, RpgEvent, RpgGame, ZoneLayout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

const DEMO_ZONE: &str = r#"{
    "name": "meadow",
    "player_x": 100,
    "spawns": [
        { "kind": "villager", "x": 40, "uid": 100 },
        { "kind": "chest", "x": 180, "uid": 101 },
        { "kind": "goblin", "x": 420, "uid": 200 },
        { "kind": "mushroom", "x": 560, "uid": 201 },
        { "kind": "skeleton", "x": 760, "uid": 202 },
        { "kind": "skeleton_archer", "x": 980, "uid": 203, "facing": "left" },
        { "kind": "boar", "x": 1200, "uid": 300 }
    ]
}"#;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Run the action RPG simulation headless with a scripted hero")]
struct Args {
    /// JSON config file; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON zone layout; a built-in demo zone is used when absent
    #[arg(long)]
    zone: Option<PathBuf>,

    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Stop after this many ticks even if the run is not over
    #[arg(long, default_value = "18000")]
    max_ticks: u64,

    /// Pace ticks at the configured tick rate instead of running flat out
    #[arg(short, long)]
    realtime: bool,

    /// Print the final observation as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RpgConfig::load(path)?,
        None => RpgConfig::default(),
    };
    let layout = match &args.zone {
        Some(path) => ZoneLayout::load(path)?,
        None => ZoneLayout::from_json(DEMO_ZONE)?,
    };
    let tick_hz = config.tick_hz;

    let mut game = RpgGame::with_zone(config, args.seed, &layout);
    give_starter_kit(&mut game);
    let mut host = SimHost::from_game(game, tick_hz);

    tracing::info!(
        zone = %layout.name,
        spawns = layout.spawns.len(),
        seed = args.seed,
        realtime = args.realtime,
        "starting run"
    );

    let events = if args.realtime {
        run_realtime(&mut host, args.max_ticks).await
    } else {
        run_fast(&mut host, args.max_ticks)
    };

    println!("\n=== RPG Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {}", host.current_tick());
    print_player(&host);
    print_event_summary(&events);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&host.observe())?);
    }
    Ok(())
}

fn give_starter_kit(game: &mut RpgGame) {
    let state = game.state_mut();
    state.inventory.add(Item::IronSword, 1);
    state.inventory.add(Item::HealthPotion, 3);
    state.inventory.add(Item::StrengthPotion, 1);
    state.equipment.weapon = Some(Item::IronSword);
}

fn run_fast(host: &mut SimHost<RpgGame>, max_ticks: u64) -> Vec<RpgEvent> {
    let mut all_events = Vec::new();
    while host.current_tick() < max_ticks {
        for action in autopilot(host.game()) {
            host.push(0, action);
        }
        let Some(events) = host.step_one_tick() else {
            break;
        };
        all_events.extend(events);
    }
    all_events
}

async fn run_realtime(host: &mut SimHost<RpgGame>, max_ticks: u64) -> Vec<RpgEvent> {
    let tick_duration = Duration::from_secs_f64(1.0 / host.tick_hz() as f64);
    let mut interval = interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut all_events = Vec::new();

    println!("=== Running in Real-Time Mode ({}Hz) ===", host.tick_hz());

    while host.current_tick() < max_ticks {
        interval.tick().await;

        for action in autopilot(host.game()) {
            host.push(0, action);
        }
        let Some(events) = host.step_one_tick() else {
            break;
        };
        for event in &events {
            print_event(host.current_tick(), host.game(), event);
        }
        all_events.extend(events);

        if host.current_tick() % host.tick_hz() as u64 == 0 {
            print_status(host);
        }
    }
    all_events
}

/// Actions for the next tick.
fn autopilot(game: &RpgGame) -> Vec<RpgAction> {
    let state = game.state();
    let player = state.player();
    if !player.is_alive() {
        return Vec::new();
    }

    if player.health < player.max_health * 0.4 {
        if let Some(slot) = state
            .inventory
            .slots()
            .iter()
            .position(|s| s.is_some_and(|s| s.item == Item::HealthPotion))
        {
            return vec![RpgAction::SelectSlot(slot), RpgAction::UseItem];
        }
    }

    let target = state
        .world
        .entities
        .values()
        .filter(|e| e.zone == state.zone.name && e.faction == Faction::Enemy && e.is_alive())
        .map(|e| e.center_x() - player.center_x())
        .min_by(|a, b| a.abs().total_cmp(&b.abs()));

    let Some(dx) = target else {
        return (player.move_dir != 0.0)
            .then_some(RpgAction::Stop)
            .into_iter()
            .collect();
    };

    let reach = state
        .equipment
        .weapon_spec()
        .map_or(state.config.unarmed_range, |w| w.range);
    let facing_target = dx * player.facing.sign() >= 0.0;

    if dx.abs() <= reach * 0.8 && facing_target {
        let mut actions = Vec::new();
        if player.move_dir != 0.0 {
            actions.push(RpgAction::Stop);
        }
        if !player.on_cooldown && player.can_act() {
            actions.push(RpgAction::Attack);
        }
        return actions;
    }

    let wanted = if dx < 0.0 { -1.0 } else { 1.0 };
    if player.move_dir == wanted {
        return Vec::new();
    }
    if wanted < 0.0 {
        vec![RpgAction::MoveLeft]
    } else {
        vec![RpgAction::MoveRight]
    }
}

fn print_event(tick: u64, game: &RpgGame, event: &RpgEvent) {
    let state = game.state();
    match event {
        RpgEvent::Hit {
            target,
            damage,
            health_left,
            ..
        } => {
            let name = state
                .entity(*target)
                .map_or("?", |e| e.kind.name());
            println!(
                "[{:>6}] {} hit for {:.1}, {:.1} left",
                tick, name, damage, health_left
            );
        }
        RpgEvent::EntityKilled { uid, kind, .. } => {
            println!("[{:>6}] {} #{} killed", tick, kind.name(), uid)
        }
        RpgEvent::ItemDropped { item, count, .. } => {
            println!("[{:>6}] Picked up {} x{}", tick, item.name(), count)
        }
        RpgEvent::ChestOpened { .. } => println!("[{:>6}] Chest opened", tick),
        RpgEvent::DialogueOpened { lines, .. } => {
            for line in lines.iter() {
                println!("[{:>6}] \"{}\"", tick, line);
            }
        }
        RpgEvent::ItemUsed { item } => println!("[{:>6}] Used {}", tick, item.name()),
        RpgEvent::Crafted { item, count } => {
            println!("[{:>6}] Crafted {} x{}", tick, item.name(), count)
        }
        _ => {}
    }
}

fn print_status(host: &SimHost<RpgGame>) {
    let state = host.game().state();
    let time_secs = host.current_tick() as f64 / host.tick_hz() as f64;
    let enemies = state
        .world
        .entities
        .values()
        .filter(|e| e.zone == state.zone.name && e.faction == Faction::Enemy && e.is_alive())
        .count();
    let player = state.player();
    println!(
        "  [{:>5.1}s] HP {:.0}/{:.0}, x {:.0}, state {}, enemies left {}",
        time_secs,
        player.health,
        player.max_health,
        player.x,
        player.state.name(),
        enemies
    );
}

fn print_player(host: &SimHost<RpgGame>) {
    let state = host.game().state();
    let player = state.player();
    println!("Player HP: {:.1}/{:.1}", player.health, player.max_health);
    println!("Inventory:");
    for stack in state.inventory.slots().iter().flatten() {
        println!("  {} x{}", stack.item.name(), stack.count);
    }
}

fn print_event_summary(events: &[RpgEvent]) {
    let mut attacks = 0;
    let mut rejected = 0;
    let mut hits = 0;
    let mut projectiles = 0;
    let mut kills = 0;
    let mut drops = 0;
    let mut quests = 0;

    for event in events {
        match event {
            RpgEvent::AttackStarted { .. } => attacks += 1,
            RpgEvent::AttackRejected { .. } => rejected += 1,
            RpgEvent::Hit { .. } => hits += 1,
            RpgEvent::ProjectileSpawned { .. } => projectiles += 1,
            RpgEvent::EntityKilled { .. } => kills += 1,
            RpgEvent::ItemDropped { .. } => drops += 1,
            RpgEvent::Quest(_) => quests += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Attacks started: {}", attacks);
    println!("Attacks rejected: {}", rejected);
    println!("Hits landed: {}", hits);
    println!("Projectiles fired: {}", projectiles);
    println!("Kills: {}", kills);
    println!("Drops: {}", drops);
    println!("Quest events: {}", quests);
}
