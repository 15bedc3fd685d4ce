#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless StormZ survival simulation.
//!
//! A scripted survivor kites the nearest enemy and returns fire every tick,
//! so a full run exercises spawning, collision, buffs, and the wave state
//! machine without a renderer attached.

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use stormz_core::{Command, DifficultyTable, Event, PoolConfig, WorldPoint};
use stormz_stat_modifiers::{WeaponModifier, WeaponModifierKind};
use stormz_system_collision::CollisionResolver;
use stormz_system_scheduler::WaveScheduler;
use stormz_world::{apply, query, Loadout, World};

/// Duration of the damage surge granted at the start of each wave.
const SURGE_DURATION: Duration = Duration::from_secs(2);

/// Headless StormZ wave-survival simulation.
#[derive(Debug, Parser)]
#[command(name = "stormz")]
struct Args {
    /// Seed for the wave scheduler's spawn rolls.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
    /// Safety bound on the number of ticks before the run is abandoned.
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,
    /// Suppress per-event narration; print only the final report.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.tick_ms > 0, "tick-ms must be positive");
    let dt = Duration::from_millis(args.tick_ms);

    let table = DifficultyTable::standard();
    let mut world = World::new(PoolConfig::for_table(&table), Loadout::starter());
    let mut scheduler = WaveScheduler::new(table, args.seed);
    let mut resolver = CollisionResolver::new();
    scheduler.start(query::clock_now(&world));

    let mut pending: Vec<Command> = Vec::new();
    let mut last_wave = scheduler.wave_number();
    let mut finished = false;

    for _ in 0..args.max_ticks {
        let mut events = Vec::new();
        for command in pending.drain(..) {
            apply(&mut world, command, &mut events);
        }
        apply(&mut world, Command::Tick { dt }, &mut events);

        drive_survivor(&mut world, &mut events);

        resolver.handle(
            query::projectile_view(&world),
            query::enemy_view(&world),
            query::player(&world),
            &mut pending,
        );
        scheduler.handle(
            &events,
            query::census(&world),
            query::player(&world),
            query::clock_now(&world),
            &mut pending,
        );

        if scheduler.wave_number() != last_wave {
            last_wave = scheduler.wave_number();
            surge(&mut world);
            if !args.quiet {
                println!("wave {last_wave} incoming");
            }
        }
        if !args.quiet {
            narrate(&events);
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::GameEnded { .. }))
        {
            finished = true;
            break;
        }
    }

    match scheduler.report() {
        Some(report) => {
            println!(
                "run over: {} on wave {} with score {} (+{} tokens)",
                if report.victory { "victory" } else { "defeat" },
                report.wave_number,
                report.score,
                report.tokens_gained,
            );
        }
        None => {
            ensure!(!finished, "run finished without a report");
            println!(
                "run abandoned after {} ticks on wave {} with score {}",
                args.max_ticks,
                scheduler.wave_number(),
                scheduler.score(),
            );
        }
    }
    Ok(())
}

/// Kites away from the nearest enemy while returning fire at it.
fn drive_survivor(world: &mut World, events: &mut Vec<Event>) {
    let Some(player) = query::player(world) else {
        return;
    };
    let nearest = query::enemy_view(world).into_vec().into_iter().min_by(|a, b| {
        a.position
            .distance_to(player.position)
            .total_cmp(&b.position.distance_to(player.position))
    });
    let Some(enemy) = nearest else {
        apply(
            world,
            Command::SteerPlayer {
                direction: WorldPoint::ZERO,
            },
            events,
        );
        return;
    };
    let retreat = enemy
        .position
        .direction_to(player.position)
        .unwrap_or(WorldPoint::ZERO);
    apply(world, Command::SteerPlayer { direction: retreat }, events);
    apply(
        world,
        Command::FireWeapon {
            aim: enemy.position,
        },
        events,
    );
}

/// Grants a short damage surge when a fresh wave begins.
fn surge(world: &mut World) {
    let now = query::clock_now(world);
    let _ = world.weapon_mut().apply(
        WeaponModifier::timed(WeaponModifierKind::DamageMult, 0.5, SURGE_DURATION),
        now,
    );
}

fn narrate(events: &[Event]) {
    for event in events {
        match event {
            Event::EnemyKilled { kind, .. } => println!("  killed a {kind:?}"),
            Event::PlayerDamaged { remaining_health } => {
                println!("  hit! {remaining_health} health left");
            }
            Event::PlayerDied => println!("  the survivor falls"),
            Event::AreaChanged { area } => println!("  advanced to area {area}"),
            _ => {}
        }
    }
}
