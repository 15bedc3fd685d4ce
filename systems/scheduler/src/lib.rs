#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler and game state machine.
//!
//! The scheduler owns the run's difficulty progression. Each tick it drains
//! its deadline queue, reacts to world events (kills, player death), and
//! drives the current phase: spawning during `Normal`, clearance timing
//! during `Break`, scripted sequences during `Transition`. It mutates nothing
//! directly; every effect leaves as a [`Command`] for the world.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stormz_core::{
    Command, DifficultyTable, EnemyKind, Event, GameState, PlayerSnapshot, PoolCensus, RunReport,
    WaveFinale, WaveInfo, WorldPoint, ARENA_HEIGHT, ARENA_WIDTH, SPAWN_MARGIN,
};
use stormz_world::Timer;

/// Length of an ordinary inter-wave break.
const BREAK_DURATION: Duration = Duration::from_secs(5);
/// Delay between clearing the final wave and the win sequence starting.
const VICTORY_DELAY: Duration = Duration::from_secs(3);
/// Length of the death sequence before the loss signal fires.
const DEATH_SEQUENCE: Duration = Duration::from_secs(2);
/// Length of the area-change fade.
const AREA_FADE: Duration = Duration::from_millis(1_500);
/// Length of the victory fade once the win sequence starts.
const VICTORY_FADE: Duration = Duration::from_millis(1_500);

/// How close to the right edge counts as reaching it, in world units. Half
/// the player extent, so the objective clears while the silhouette touches
/// the boundary.
const RIGHT_EDGE_REACH: f32 = 25.0;

/// Scripted effects waiting on a virtual-clock deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sequence {
    /// Death animation finished; raise the loss signal.
    DeathEnd,
    /// Area fade finished; switch areas and start the next wave.
    AreaFadeEnd { area: u32 },
    /// Victory fade finished; raise the win signal.
    VictoryFadeEnd,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    deadline: Duration,
    sequence: Sequence,
}

/// Wave scheduler that drives spawning, breaks, and terminal transitions.
#[derive(Debug)]
pub struct WaveScheduler {
    table: DifficultyTable,
    state: GameState,
    resume_state: GameState,
    wave_number: u32,
    wave: Option<WaveInfo>,
    spawn_timer: Timer,
    break_timer: Timer,
    break_finale: WaveFinale,
    queue: Vec<Scheduled>,
    score: u32,
    area: u32,
    ended: bool,
    report: Option<RunReport>,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates a scheduler over the provided difficulty table.
    ///
    /// The seed fixes every spawn-kind and spawn-position roll, so two runs
    /// with identical seeds and inputs progress identically.
    #[must_use]
    pub fn new(table: DifficultyTable, seed: u64) -> Self {
        Self {
            table,
            state: GameState::Normal,
            resume_state: GameState::Normal,
            wave_number: 0,
            wave: None,
            spawn_timer: Timer::new(None, Duration::ZERO),
            break_timer: Timer::new(None, Duration::ZERO),
            break_finale: WaveFinale::TimedBreak,
            queue: Vec::new(),
            score: 0,
            area: 0,
            ended: false,
            report: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// One-based number of the current (or most recent) wave.
    #[must_use]
    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    /// Score accumulated so far. The scheduler is the sole mutator.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Area number the run has advanced to.
    #[must_use]
    pub fn area(&self) -> u32 {
        self.area
    }

    /// Result record of a finished run, available once the run ends.
    #[must_use]
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    /// Begins wave one. Call once before the first tick.
    pub fn start(&mut self, now: Duration) {
        if self.wave_number == 0 {
            self.begin_wave(1, now);
        }
    }

    /// Requests entry into `Paused`, freezing the virtual clock.
    ///
    /// Refused without effect during `Transition` or once already paused.
    pub fn pause(&mut self, out: &mut Vec<Command>) -> bool {
        if self.state == GameState::Transition || self.state == GameState::Paused {
            return false;
        }
        self.resume_state = self.state;
        self.state = GameState::Paused;
        out.push(Command::PauseClock);
        true
    }

    /// Leaves `Paused`, resuming the virtual clock and the prior phase.
    pub fn unpause(&mut self, out: &mut Vec<Command>) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.state = self.resume_state;
        out.push(Command::ResumeClock);
        true
    }

    /// Ends the run on the caller's behalf, producing the result record and
    /// the terminal command. A no-op once the run has already ended.
    pub fn end(&mut self, victory: bool, out: &mut Vec<Command>) {
        self.finish(victory, out);
    }

    /// Runs one scheduler pass: deadline queue first, then event reactions,
    /// then the current phase's timers.
    pub fn handle(
        &mut self,
        events: &[Event],
        census: PoolCensus,
        player: Option<PlayerSnapshot>,
        now: Duration,
        out: &mut Vec<Command>,
    ) {
        self.run_due_sequences(now, out);
        self.consume_events(events, now);

        if self.ended || self.state == GameState::Paused {
            return;
        }

        match self.state {
            GameState::Normal => self.tick_wave(census, now, out),
            GameState::Break => self.tick_break(census, player, now),
            GameState::Transition | GameState::Paused => {}
        }
    }

    fn run_due_sequences(&mut self, now: Duration, out: &mut Vec<Command>) {
        // Deadlines are sparse (at most one scripted sequence is pending at
        // a time), so a linear sweep is enough.
        let mut index = 0;
        while index < self.queue.len() {
            if self.queue[index].deadline > now {
                index += 1;
                continue;
            }
            let fired = self.queue.swap_remove(index);
            match fired.sequence {
                Sequence::DeathEnd => self.finish(false, out),
                Sequence::VictoryFadeEnd => self.finish(true, out),
                Sequence::AreaFadeEnd { area } => {
                    self.area = area;
                    out.push(Command::SwitchArea { area });
                    self.advance_wave(now);
                }
            }
        }
    }

    fn consume_events(&mut self, events: &[Event], now: Duration) {
        for event in events {
            match event {
                Event::EnemyKilled { kind, .. } => {
                    self.score = self
                        .score
                        .saturating_add(kill_points(*kind, self.wave_number));
                }
                Event::PlayerDied => {
                    if !self.ended && self.state != GameState::Transition {
                        self.state = GameState::Transition;
                        self.queue.push(Scheduled {
                            deadline: now + DEATH_SEQUENCE,
                            sequence: Sequence::DeathEnd,
                        });
                    }
                }
                // The world is authoritative about termination; a run ended
                // by an external adapter still concludes the scheduler.
                Event::GameEnded { victory } => {
                    let _ = self.conclude(*victory);
                }
                _ => {}
            }
        }
    }

    fn tick_wave(&mut self, census: PoolCensus, now: Duration, out: &mut Vec<Command>) {
        let Some(wave) = self.wave.as_ref() else {
            return;
        };

        if wave.is_exhausted() {
            if census.active_enemies() == 0 {
                self.enter_break(now);
            }
            return;
        }

        if !self.spawn_timer.is_over(now) {
            return;
        }
        self.spawn_timer.restart(now);

        let per_heat = wave.per_heat();
        for _ in 0..per_heat {
            let Some(kind) = self.draw_kind() else {
                break;
            };
            let position = self.draw_spawn_position();
            out.push(Command::SpawnEnemy { kind, position });
        }
    }

    fn tick_break(&mut self, census: PoolCensus, player: Option<PlayerSnapshot>, now: Duration) {
        match self.break_finale {
            WaveFinale::TimedBreak | WaveFinale::Victory => {
                // The break timer counts only undisturbed time. Any hostile
                // still on the field restarts it.
                if census.hostiles() > 0 {
                    self.break_timer.restart(now);
                    return;
                }
                if !self.break_timer.is_over(now) {
                    return;
                }
                if self.break_finale == WaveFinale::Victory {
                    self.enter_victory_fade(now);
                } else {
                    self.advance_wave(now);
                }
            }
            WaveFinale::AreaAdvance => {
                let Some(player) = player else {
                    return;
                };
                if player.position.x() >= ARENA_WIDTH - RIGHT_EDGE_REACH {
                    self.state = GameState::Transition;
                    self.queue.push(Scheduled {
                        deadline: now + AREA_FADE,
                        sequence: Sequence::AreaFadeEnd {
                            area: self.area + 1,
                        },
                    });
                }
            }
        }
    }

    fn begin_wave(&mut self, number: u32, now: Duration) {
        let Some(wave) = self.table.wave(number) else {
            return;
        };
        self.wave_number = number;
        self.wave = Some(wave.clone());
        self.spawn_timer = Timer::new(Some(wave.spawn_interval()), now);
        self.state = GameState::Normal;
    }

    /// Moves on to the next configured wave. A table with no further wave is
    /// treated as the victory finale, so a misconfigured final break cannot
    /// leave the scheduler retrying forever.
    fn advance_wave(&mut self, now: Duration) {
        let next = self.wave_number + 1;
        if self.table.wave(next).is_some() {
            self.begin_wave(next, now);
        } else {
            self.enter_victory_fade(now);
        }
    }

    fn enter_victory_fade(&mut self, now: Duration) {
        self.state = GameState::Transition;
        self.queue.push(Scheduled {
            deadline: now + VICTORY_FADE,
            sequence: Sequence::VictoryFadeEnd,
        });
    }

    fn enter_break(&mut self, now: Duration) {
        let finale = self
            .wave
            .as_ref()
            .map_or(WaveFinale::TimedBreak, WaveInfo::finale);
        self.break_finale = finale;
        self.state = GameState::Break;
        let duration = match finale {
            WaveFinale::TimedBreak => Some(BREAK_DURATION),
            WaveFinale::Victory => Some(VICTORY_DELAY),
            // Objective breaks never time out.
            WaveFinale::AreaAdvance => None,
        };
        self.break_timer = Timer::new(duration, now);
    }

    /// Marks the run as ended and freezes the result record.
    ///
    /// Returns `false` when the run had already concluded.
    fn conclude(&mut self, victory: bool) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        self.state = GameState::Transition;
        self.report = Some(RunReport {
            score: self.score,
            wave_number: self.wave_number,
            victory,
            tokens_gained: RunReport::payout(self.score, self.wave_number),
        });
        true
    }

    fn finish(&mut self, victory: bool, out: &mut Vec<Command>) {
        if self.conclude(victory) {
            out.push(Command::EndGame { victory });
        }
    }

    /// Draws an enemy kind weighted by the wave's remaining counts and
    /// decrements the drawn kind.
    fn draw_kind(&mut self) -> Option<EnemyKind> {
        let wave = self.wave.as_mut()?;
        let total = wave.remaining_total();
        if total == 0 {
            return None;
        }
        let mut roll = self.rng.gen_range(0..total);
        for kind in EnemyKind::ALL {
            let weight = wave.count(kind);
            if roll < weight {
                let _ = wave.decrement(kind);
                return Some(kind);
            }
            roll -= weight;
        }
        None
    }

    /// Picks a point on the spawn ring just outside the play area.
    fn draw_spawn_position(&mut self) -> WorldPoint {
        match self.rng.gen_range(0u8..4) {
            0 => WorldPoint::new(self.rng.gen_range(0.0..ARENA_WIDTH), -SPAWN_MARGIN),
            1 => WorldPoint::new(
                self.rng.gen_range(0.0..ARENA_WIDTH),
                ARENA_HEIGHT + SPAWN_MARGIN,
            ),
            2 => WorldPoint::new(-SPAWN_MARGIN, self.rng.gen_range(0.0..ARENA_HEIGHT)),
            _ => WorldPoint::new(
                ARENA_WIDTH + SPAWN_MARGIN,
                self.rng.gen_range(0.0..ARENA_HEIGHT),
            ),
        }
    }
}

/// Points awarded for one kill: the kind's base value scaled by
/// `1 + 0.5 x (wave - 1)`, floored.
#[must_use]
pub fn kill_points(kind: EnemyKind, wave_number: u32) -> u32 {
    let wave = wave_number.max(1);
    kind.base_points() * (wave + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormz_core::{EntityId, KIND_COUNT};

    fn empty_census() -> PoolCensus {
        PoolCensus::new([0; KIND_COUNT], [8; KIND_COUNT], 0)
    }

    fn census_with_enemies(active_basic: usize) -> PoolCensus {
        let mut active = [0usize; KIND_COUNT];
        active[stormz_core::EntityKind::Enemy(EnemyKind::Basic).slot()] = active_basic;
        PoolCensus::new(active, [16; KIND_COUNT], 0)
    }

    fn single_wave_table(counts: [u32; 4], finale: WaveFinale) -> DifficultyTable {
        DifficultyTable::new(vec![WaveInfo::new(
            Duration::from_secs(1),
            counts,
            1,
            finale,
        )])
    }

    fn player_at(x: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            id: EntityId::new(0),
            position: WorldPoint::new(x, ARENA_HEIGHT * 0.5),
            health: 5.0,
            max_health: 5.0,
            armor_health: 0.0,
        }
    }

    #[test]
    fn kill_points_scale_with_the_wave_multiplier() {
        assert_eq!(kill_points(EnemyKind::Basic, 1), 10);
        assert_eq!(kill_points(EnemyKind::Basic, 2), 15);
        assert_eq!(kill_points(EnemyKind::Fast, 3), 30);
        assert_eq!(kill_points(EnemyKind::Heavy, 2), 37);
    }

    #[test]
    fn start_enters_normal_with_wave_one() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        assert_eq!(scheduler.state(), GameState::Normal);
        assert_eq!(scheduler.wave_number(), 1);
    }

    #[test]
    fn spawn_timer_fires_at_the_configured_cadence() {
        let table = single_wave_table([3, 0, 0, 0], WaveFinale::TimedBreak);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(&[], empty_census(), None, Duration::from_millis(500), &mut out);
        assert!(out.is_empty(), "interval has not elapsed yet");

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Command::SpawnEnemy {
                kind: EnemyKind::Basic,
                ..
            }
        ));
    }

    #[test]
    fn wave_clears_only_when_counts_and_population_are_both_zero() {
        let table = single_wave_table([1, 0, 0, 0], WaveFinale::TimedBreak);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        // Spawn the single enemy of the wave.
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        assert_eq!(out.len(), 1);
        out.clear();

        // Counts are exhausted but one enemy is still alive: still Normal.
        scheduler.handle(
            &[],
            census_with_enemies(1),
            None,
            Duration::from_secs(2),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Normal);

        // The enemy dies: the wave clears within one pass.
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(3), &mut out);
        assert_eq!(scheduler.state(), GameState::Break);
    }

    #[test]
    fn break_timer_restarts_while_hostiles_remain() {
        let table = DifficultyTable::new(vec![
            WaveInfo::new(Duration::from_secs(1), [1, 0, 0, 0], 1, WaveFinale::TimedBreak),
            WaveInfo::new(Duration::from_secs(1), [1, 0, 0, 0], 1, WaveFinale::TimedBreak),
        ]);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        out.clear();
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(2), &mut out);
        assert_eq!(scheduler.state(), GameState::Break);

        // A straggler projectile keeps resetting the break countdown.
        let hostile = PoolCensus::new([0; KIND_COUNT], [8; KIND_COUNT], 1);
        scheduler.handle(&[], hostile, None, Duration::from_secs(6), &mut out);
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(8), &mut out);
        assert_eq!(
            scheduler.state(),
            GameState::Break,
            "five undisturbed seconds have not elapsed since the restart"
        );

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(12), &mut out);
        assert_eq!(scheduler.state(), GameState::Normal);
        assert_eq!(scheduler.wave_number(), 2);
    }

    #[test]
    fn area_advance_break_waits_for_the_right_edge() {
        let table = DifficultyTable::new(vec![
            WaveInfo::new(Duration::from_secs(1), [1, 0, 0, 0], 1, WaveFinale::AreaAdvance),
            WaveInfo::new(Duration::from_secs(1), [1, 0, 0, 0], 1, WaveFinale::TimedBreak),
        ]);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        out.clear();
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(2), &mut out);
        assert_eq!(scheduler.state(), GameState::Break);

        // Hours can pass: an objective break never times out.
        scheduler.handle(
            &[],
            empty_census(),
            Some(player_at(200.0)),
            Duration::from_secs(4_000),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Break);

        scheduler.handle(
            &[],
            empty_census(),
            Some(player_at(ARENA_WIDTH)),
            Duration::from_secs(4_001),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Transition);

        // The fade elapses: switch areas, then the next wave begins.
        scheduler.handle(
            &[],
            empty_census(),
            Some(player_at(ARENA_WIDTH)),
            Duration::from_secs(4_003),
            &mut out,
        );
        assert!(out.contains(&Command::SwitchArea { area: 1 }));
        assert_eq!(scheduler.state(), GameState::Normal);
        assert_eq!(scheduler.wave_number(), 2);
        assert_eq!(scheduler.area(), 1);
    }

    #[test]
    fn final_wave_victory_break_ends_the_run_in_a_win() {
        let table = single_wave_table([1, 0, 0, 0], WaveFinale::Victory);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        out.clear();
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(2), &mut out);
        assert_eq!(scheduler.state(), GameState::Break);

        // Victory delay, then the fade, then the terminal signal.
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(6), &mut out);
        assert_eq!(scheduler.state(), GameState::Transition);
        assert!(out.is_empty());

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(8), &mut out);
        assert_eq!(out, vec![Command::EndGame { victory: true }]);
        let report = scheduler.report().expect("run finished");
        assert!(report.victory);
    }

    #[test]
    fn player_death_runs_the_death_sequence_then_signals_loss_once() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(
            &[Event::PlayerDied],
            empty_census(),
            None,
            Duration::from_secs(1),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Transition);
        assert!(out.is_empty(), "the signal waits on the death sequence");

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(4), &mut out);
        assert_eq!(out, vec![Command::EndGame { victory: false }]);

        out.clear();
        scheduler.handle(
            &[Event::PlayerDied],
            empty_census(),
            None,
            Duration::from_secs(9),
            &mut out,
        );
        assert!(out.is_empty(), "the terminal signal is never retried");
    }

    #[test]
    fn externally_ended_run_concludes_the_scheduler() {
        let table = single_wave_table([3, 0, 0, 0], WaveFinale::TimedBreak);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        // An adapter terminated the world directly; the broadcast ends the
        // scheduler too: no further spawning, report frozen.
        scheduler.handle(
            &[Event::GameEnded { victory: false }],
            empty_census(),
            None,
            Duration::from_secs(1),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Transition);
        assert!(out.is_empty(), "no spawn leaves an ended scheduler");
        let report = scheduler.report().expect("run concluded");
        assert!(!report.victory);

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(5), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn end_produces_the_terminal_command_exactly_once() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();
        scheduler.end(false, &mut out);
        scheduler.end(true, &mut out);
        assert_eq!(out, vec![Command::EndGame { victory: false }]);
        let report = scheduler.report().expect("run concluded");
        assert!(!report.victory, "the first conclusion wins");
    }

    #[test]
    fn timed_break_on_the_final_wave_falls_through_to_victory() {
        let table = single_wave_table([1, 0, 0, 0], WaveFinale::TimedBreak);
        let mut scheduler = WaveScheduler::new(table, 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        scheduler.handle(&[], empty_census(), None, Duration::from_secs(1), &mut out);
        out.clear();
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(2), &mut out);
        assert_eq!(scheduler.state(), GameState::Break);

        // The break expires with no wave left in the table: the run must end
        // in a win rather than idling in Break forever.
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(8), &mut out);
        assert_eq!(scheduler.state(), GameState::Transition);
        scheduler.handle(&[], empty_census(), None, Duration::from_secs(10), &mut out);
        assert_eq!(out, vec![Command::EndGame { victory: true }]);
    }

    #[test]
    fn pause_is_refused_during_transition() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();
        scheduler.handle(
            &[Event::PlayerDied],
            empty_census(),
            None,
            Duration::from_secs(1),
            &mut out,
        );
        assert_eq!(scheduler.state(), GameState::Transition);
        assert!(!scheduler.pause(&mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn pause_round_trip_restores_the_prior_phase() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();

        assert!(scheduler.pause(&mut out));
        assert_eq!(scheduler.state(), GameState::Paused);
        assert_eq!(out, vec![Command::PauseClock]);
        assert!(!scheduler.pause(&mut out), "already paused");

        out.clear();
        assert!(scheduler.unpause(&mut out));
        assert_eq!(scheduler.state(), GameState::Normal);
        assert_eq!(out, vec![Command::ResumeClock]);
        assert!(!scheduler.unpause(&mut out), "not paused any more");
    }

    #[test]
    fn kills_accumulate_score_with_the_current_wave_multiplier() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 7);
        scheduler.start(Duration::ZERO);
        let mut out = Vec::new();
        let kill = Event::EnemyKilled {
            entity: EntityId::new(5),
            kind: EnemyKind::Basic,
        };
        scheduler.handle(
            &[kill.clone(), kill],
            empty_census(),
            None,
            Duration::from_millis(10),
            &mut out,
        );
        assert_eq!(scheduler.score(), 20);
    }

    #[test]
    fn weighted_draw_exhausts_exactly_the_configured_counts() {
        let table = single_wave_table([2, 3, 1, 0], WaveFinale::TimedBreak);
        let mut scheduler = WaveScheduler::new(table, 99);
        scheduler.start(Duration::ZERO);
        let mut drawn = [0u32; 4];
        while let Some(kind) = scheduler.draw_kind() {
            drawn[kind.index()] += 1;
        }
        assert_eq!(drawn, [2, 3, 1, 0]);
    }

    #[test]
    fn spawn_positions_land_on_the_ring_outside_the_play_area() {
        let mut scheduler = WaveScheduler::new(DifficultyTable::standard(), 3);
        for _ in 0..64 {
            let position = scheduler.draw_spawn_position();
            let outside = position.x() < 0.0
                || position.x() > ARENA_WIDTH
                || position.y() < 0.0
                || position.y() > ARENA_HEIGHT;
            assert!(outside, "{position:?} lies inside the play area");
        }
    }
}
