//! Full-loop tests wiring the scheduler against the authoritative world.

use std::time::Duration;

use stormz_core::{
    Command, DifficultyTable, Event, GameState, PoolConfig, WaveFinale, WaveInfo,
};
use stormz_system_scheduler::WaveScheduler;
use stormz_world::{apply, query, Loadout, World};

const DT: Duration = Duration::from_millis(100);

fn single_basic_wave(count: u32) -> DifficultyTable {
    DifficultyTable::new(vec![WaveInfo::new(
        Duration::from_millis(100),
        [count, 0, 0, 0],
        1,
        WaveFinale::TimedBreak,
    )])
}

/// Applies the pending command batch, advances one tick, and runs one
/// scheduler pass, leaving the next batch in `pending`.
fn step(world: &mut World, scheduler: &mut WaveScheduler, pending: &mut Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in pending.drain(..) {
        apply(world, command, &mut events);
    }
    apply(world, Command::Tick { dt: DT }, &mut events);
    scheduler.handle(
        &events,
        query::census(world),
        query::player(world),
        query::clock_now(world),
        pending,
    );
    events
}

#[test]
fn wave_of_three_clears_to_break_within_one_pass_of_the_last_kill() {
    let table = single_basic_wave(3);
    let mut world = World::new(PoolConfig::for_table(&table), Loadout::starter());
    let mut scheduler = WaveScheduler::new(table, 42);
    scheduler.start(query::clock_now(&world));

    let mut pending = Vec::new();
    for _ in 0..8 {
        let _ = step(&mut world, &mut scheduler, &mut pending);
        if query::census(&world).active_enemies() == 3 {
            break;
        }
    }
    assert_eq!(query::census(&world).active_enemies(), 3);
    assert_eq!(scheduler.state(), GameState::Normal);

    // Kill all three; the scheduler must observe the emptied field and clear
    // the wave in the same pass.
    for enemy in query::enemy_view(&world).into_vec() {
        pending.push(Command::Kill { entity: enemy.id });
    }
    let _ = step(&mut world, &mut scheduler, &mut pending);

    assert_eq!(query::census(&world).active_enemies(), 0);
    assert_eq!(scheduler.state(), GameState::Break);
    assert_eq!(scheduler.score(), 30, "three Basic kills on wave one");
}

#[test]
fn pause_freezes_the_whole_loop_until_unpaused() {
    let table = single_basic_wave(3);
    let mut world = World::new(PoolConfig::for_table(&table), Loadout::starter());
    let mut scheduler = WaveScheduler::new(table, 42);
    scheduler.start(query::clock_now(&world));
    let mut pending = Vec::new();

    assert!(scheduler.pause(&mut pending));
    let _ = step(&mut world, &mut scheduler, &mut pending);
    let frozen_at = query::clock_now(&world);

    for _ in 0..10 {
        let events = step(&mut world, &mut scheduler, &mut pending);
        assert!(events.is_empty(), "a paused tick emits nothing");
    }
    assert_eq!(query::clock_now(&world), frozen_at);
    assert_eq!(query::census(&world).active_enemies(), 0);

    assert!(scheduler.unpause(&mut pending));
    let _ = step(&mut world, &mut scheduler, &mut pending);
    let _ = step(&mut world, &mut scheduler, &mut pending);
    assert!(query::clock_now(&world) > frozen_at);
}

#[test]
fn player_death_ends_the_run_exactly_once() {
    let table = single_basic_wave(3);
    let mut world = World::new(PoolConfig::for_table(&table), Loadout::starter());
    let mut scheduler = WaveScheduler::new(table, 42);
    scheduler.start(query::clock_now(&world));
    let mut pending = Vec::new();

    let player = query::player(&world).expect("player active");
    pending.push(Command::Kill { entity: player.id });

    let mut ended = 0usize;
    for _ in 0..40 {
        let events = step(&mut world, &mut scheduler, &mut pending);
        ended += events
            .iter()
            .filter(|event| matches!(event, Event::GameEnded { victory: false }))
            .count();
    }
    assert_eq!(ended, 1);
    let report = scheduler.report().expect("run finished");
    assert!(!report.victory);
    assert_eq!(report.tokens_gained, report.wave_number * 5 + report.score / 12 + 10);
}
