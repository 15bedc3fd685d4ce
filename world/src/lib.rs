#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for StormZ.
//!
//! The world owns a single fixed arena of entity slots tagged by kind, with
//! per-kind free lists for recycling and O(1) activate/deactivate. All
//! mutation flows through [`apply`]; systems and adapters observe state only
//! through the read-only [`query`] module.

use std::time::Duration;

use stormz_core::{
    Bounds, Command, EnemyKind, EntityId, EntityKind, Event, Faction, PoolConfig,
    ProgressionSnapshot, ProjectileKind, SpawnError, WeaponSpec, WorldPoint, ARENA_HEIGHT,
    ARENA_WIDTH, KIND_COUNT, SPAWN_MARGIN,
};
use stormz_stat_modifiers::{
    Armor, WeaponModifier, WeaponModifierKind, WeaponStats,
};

mod clock;

pub use clock::{Timer, VirtualClock};

const PLAYER_SPEED: f32 = 300.0;
const PLAYER_BASE_HEALTH: f32 = 5.0;
const CONTACT_INTERVAL: Duration = Duration::from_millis(500);
const RANGED_FIRE_INTERVAL: Duration = Duration::from_millis(1_600);
const RANGED_HOLD_DISTANCE: f32 = 260.0;
const RANGED_PROJECTILE_SPEED: f32 = 240.0;
const RANGED_PROJECTILE_DAMAGE: f32 = 1.0;

/// Per-upgrade-level flat damage granted by the progression store.
const DAMAGE_PER_LEVEL: f32 = 0.5;
/// Per-upgrade-level addition to the fire-interval divisor.
const FIRERATE_PER_LEVEL: f32 = 0.2;
/// Per-upgrade-level addition to the player's maximum health.
const VITALITY_PER_LEVEL: f32 = 1.0;

/// Player equipment and progression used to seed a new world.
#[derive(Clone, Debug)]
pub struct Loadout {
    /// Weapon catalog entry the player starts with.
    pub weapon: WeaponSpec,
    /// Armor catalog entry worn by the player, if any.
    pub armor: Option<stormz_core::ArmorSpec>,
    /// Persistent progression applied as permanent modifiers at start.
    pub progression: ProgressionSnapshot,
}

impl Loadout {
    /// Starter loadout: pistol, light armor, fresh progression.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            weapon: WeaponSpec::pistol(),
            armor: Some(stormz_core::ArmorSpec::LIGHT),
            progression: ProgressionSnapshot::default(),
        }
    }
}

#[derive(Clone, Debug)]
struct EntityRecord {
    id: EntityId,
    kind: EntityKind,
    active: bool,
    slot_in_kind: usize,
    slot_in_all: usize,
    position: WorldPoint,
    velocity: WorldPoint,
    faction: Faction,
    health: f32,
    max_health: f32,
    speed: f32,
    damage: f32,
    durability: u32,
    hit_memory: Vec<EntityId>,
    action_accumulator: Duration,
    area: u32,
}

impl EntityRecord {
    fn idle(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            active: false,
            slot_in_kind: 0,
            slot_in_all: 0,
            position: WorldPoint::ZERO,
            velocity: WorldPoint::ZERO,
            faction: Faction::Neutral,
            health: 0.0,
            max_health: 0.0,
            speed: 0.0,
            damage: 0.0,
            durability: 0,
            hit_memory: Vec::new(),
            action_accumulator: Duration::ZERO,
            area: 0,
        }
    }

    fn clear_activation_fields(&mut self) {
        self.position = WorldPoint::ZERO;
        self.velocity = WorldPoint::ZERO;
        self.faction = Faction::Neutral;
        self.health = 0.0;
        self.max_health = 0.0;
        self.speed = 0.0;
        self.damage = 0.0;
        self.durability = 0;
        self.hit_memory.clear();
        self.action_accumulator = Duration::ZERO;
        self.area = 0;
    }

    fn bounds(&self) -> Bounds {
        let (width, height) = self.kind.extent();
        Bounds::centered(self.position, width, height)
    }
}

#[derive(Debug)]
struct PlayerLoadout {
    weapon: WeaponStats,
    armor: Option<Armor>,
    last_shot_at: Option<Duration>,
}

/// Represents the authoritative StormZ world state.
#[derive(Debug)]
pub struct World {
    clock: VirtualClock,
    slots: Vec<EntityRecord>,
    free: [Vec<u32>; KIND_COUNT],
    active: [Vec<u32>; KIND_COUNT],
    all_active: Vec<u32>,
    pools: PoolConfig,
    loadout: PlayerLoadout,
    player_index: Option<u32>,
    steer: WorldPoint,
    ended: bool,
}

impl World {
    /// Creates a new world with pools sized by the configuration and the
    /// player and background already active.
    ///
    /// All entity storage is allocated here; play never constructs or
    /// destroys an instance afterwards.
    #[must_use]
    pub fn new(pools: PoolConfig, loadout: Loadout) -> Self {
        let mut slots = Vec::with_capacity(pools.total());
        let mut free: [Vec<u32>; KIND_COUNT] = Default::default();
        for kind in EntityKind::ALL {
            for _ in 0..pools.capacity(kind) {
                let index = slots.len() as u32;
                slots.push(EntityRecord::idle(EntityId::new(index), kind));
                free[kind.slot()].push(index);
            }
        }
        // Pop from the back of the free list; reversing keeps handle
        // assignment in ascending slot order.
        for list in &mut free {
            list.reverse();
        }

        let mut weapon = WeaponStats::from_spec(loadout.weapon);
        let progression = loadout.progression;
        if progression.damage_level > 0 {
            let _ = weapon.apply(
                WeaponModifier::permanent(
                    WeaponModifierKind::DamageBonus,
                    DAMAGE_PER_LEVEL * progression.damage_level as f32,
                ),
                Duration::ZERO,
            );
        }
        if progression.firerate_level > 0 {
            let _ = weapon.apply(
                WeaponModifier::permanent(
                    WeaponModifierKind::FireIntervalMult,
                    FIRERATE_PER_LEVEL * progression.firerate_level as f32,
                ),
                Duration::ZERO,
            );
        }

        let mut world = Self {
            clock: VirtualClock::new(),
            slots,
            free,
            active: Default::default(),
            all_active: Vec::new(),
            pools,
            loadout: PlayerLoadout {
                weapon,
                armor: loadout.armor.map(Armor::from_spec),
                last_shot_at: None,
            },
            player_index: None,
            steer: WorldPoint::ZERO,
            ended: false,
        };

        if let Ok(index) = world.activate(EntityKind::Background) {
            world.slots[index as usize].area = 0;
        }
        let player_health = PLAYER_BASE_HEALTH + VITALITY_PER_LEVEL * progression.vitality_level as f32;
        if let Ok(index) = world.activate(EntityKind::Player) {
            let record = &mut world.slots[index as usize];
            record.position = Bounds::play_area().center();
            record.faction = Faction::Friendly;
            record.health = player_health;
            record.max_health = player_health;
            record.speed = PLAYER_SPEED;
            world.player_index = Some(index);
        }
        world
    }

    /// Mutable access to the player's weapon stats for buff application.
    pub fn weapon_mut(&mut self) -> &mut WeaponStats {
        &mut self.loadout.weapon
    }

    /// Mutable access to the player's armor for buff application.
    pub fn armor_mut(&mut self) -> Option<&mut Armor> {
        self.loadout.armor.as_mut()
    }

    fn activate(&mut self, kind: EntityKind) -> Result<u32, SpawnError> {
        if self.pools.capacity(kind) == 0 {
            return Err(SpawnError::InvalidKind(kind));
        }
        let Some(index) = self.free[kind.slot()].pop() else {
            return Err(SpawnError::PoolExhausted(kind));
        };
        let slot_in_kind = self.active[kind.slot()].len();
        let slot_in_all = self.all_active.len();
        self.active[kind.slot()].push(index);
        self.all_active.push(index);
        let record = &mut self.slots[index as usize];
        record.active = true;
        record.slot_in_kind = slot_in_kind;
        record.slot_in_all = slot_in_all;
        Ok(index)
    }

    fn deactivate(&mut self, index: u32) {
        let (kind, slot_in_kind, slot_in_all) = {
            let record = &mut self.slots[index as usize];
            if !record.active {
                return;
            }
            record.active = false;
            let detail = (record.kind, record.slot_in_kind, record.slot_in_all);
            record.clear_activation_fields();
            detail
        };

        let kind_list = &mut self.active[kind.slot()];
        let _ = kind_list.swap_remove(slot_in_kind);
        if let Some(moved) = kind_list.get(slot_in_kind).copied() {
            self.slots[moved as usize].slot_in_kind = slot_in_kind;
        }

        let _ = self.all_active.swap_remove(slot_in_all);
        if let Some(moved) = self.all_active.get(slot_in_all).copied() {
            self.slots[moved as usize].slot_in_all = slot_in_all;
        }

        self.free[kind.slot()].push(index);
    }

    fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.slots
            .get(id.get() as usize)
            .filter(|record| record.active)
    }

    fn player_record(&self) -> Option<&EntityRecord> {
        self.player_index
            .and_then(|index| self.slots.get(index as usize))
            .filter(|record| record.active)
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: WorldPoint,
        out_events: &mut Vec<Event>,
    ) {
        let pool_kind = EntityKind::Enemy(kind);
        match self.activate(pool_kind) {
            Ok(index) => {
                let archetype = kind.archetype();
                let record = &mut self.slots[index as usize];
                record.position = position;
                record.faction = Faction::Enemy;
                record.health = archetype.health;
                record.max_health = archetype.health;
                record.speed = archetype.speed;
                record.damage = archetype.contact_damage;
                out_events.push(Event::EnemySpawned {
                    entity: record.id,
                    kind,
                    position,
                });
            }
            Err(reason) => out_events.push(Event::SpawnRejected {
                kind: pool_kind,
                reason,
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_projectile(
        &mut self,
        kind: ProjectileKind,
        faction: Faction,
        position: WorldPoint,
        velocity: WorldPoint,
        damage: f32,
        durability: u32,
        out_events: &mut Vec<Event>,
    ) {
        let pool_kind = EntityKind::Projectile(kind);
        match self.activate(pool_kind) {
            Ok(index) => {
                let record = &mut self.slots[index as usize];
                record.position = position;
                record.velocity = velocity;
                record.faction = faction;
                record.damage = damage;
                record.durability = durability.max(1);
                out_events.push(Event::ProjectileSpawned {
                    entity: record.id,
                    kind,
                    faction,
                });
            }
            Err(reason) => out_events.push(Event::SpawnRejected {
                kind: pool_kind,
                reason,
            }),
        }
    }

    /// Routes damage through the player's armor and clamps health at zero.
    fn damage_player(&mut self, damage: f32, out_events: &mut Vec<Event>) {
        let now = self.clock.now();
        let Some(index) = self.player_index else {
            return;
        };
        if !self.slots[index as usize].active || self.slots[index as usize].health <= 0.0 {
            return;
        }
        let leftover = match self.loadout.armor.as_mut() {
            Some(armor) => armor.take_damage(damage, now),
            None => damage,
        };
        let record = &mut self.slots[index as usize];
        record.health = (record.health - leftover).max(0.0);
        out_events.push(Event::PlayerDamaged {
            remaining_health: record.health,
        });
        if record.health <= 0.0 {
            out_events.push(Event::PlayerDied);
        }
    }

    fn tick_player(&mut self, dt: Duration) {
        let now = self.clock.now();
        self.loadout.weapon.tick(now);
        if let Some(armor) = self.loadout.armor.as_mut() {
            armor.tick(dt, now);
        }
        let steer = self.steer;
        let Some(index) = self.player_index else {
            return;
        };
        let record = &mut self.slots[index as usize];
        if !record.active || record.health <= 0.0 {
            return;
        }
        let step = steer.scaled(record.speed * dt.as_secs_f32());
        record.position = Bounds::play_area().clamped(record.position.translated(step));
    }

    fn tick_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(player) = self.player_record() else {
            return;
        };
        let player_alive = player.health > 0.0;
        let player_position = player.position;
        let player_bounds = player.bounds();

        let mut enemy_indices: Vec<u32> = Vec::new();
        for kind in EnemyKind::ALL {
            enemy_indices.extend_from_slice(&self.active[EntityKind::Enemy(kind).slot()]);
        }

        for index in enemy_indices {
            let (position, contact) = {
                let record = &mut self.slots[index as usize];
                record.action_accumulator = record.action_accumulator.saturating_add(dt);
                let kind = match record.kind {
                    EntityKind::Enemy(kind) => kind,
                    _ => continue,
                };
                let toward_player = record.position.direction_to(player_position);
                let advance = match (kind, toward_player) {
                    (EnemyKind::Ranged, Some(direction)) => {
                        if record.position.distance_to(player_position) > RANGED_HOLD_DISTANCE {
                            Some(direction)
                        } else {
                            None
                        }
                    }
                    (_, direction) => direction,
                };
                if let Some(direction) = advance {
                    record.position = record
                        .position
                        .translated(direction.scaled(record.speed * dt.as_secs_f32()));
                }

                match kind {
                    EnemyKind::Ranged => {
                        if player_alive
                            && record.action_accumulator >= RANGED_FIRE_INTERVAL
                        {
                            record.action_accumulator = Duration::ZERO;
                            (Some(record.position), None)
                        } else {
                            (None, None)
                        }
                    }
                    _ => {
                        let touching = record.bounds().overlaps(&player_bounds);
                        if player_alive
                            && touching
                            && record.action_accumulator >= CONTACT_INTERVAL
                        {
                            record.action_accumulator = Duration::ZERO;
                            (None, Some(record.damage))
                        } else {
                            (None, None)
                        }
                    }
                }
            };

            if let Some(muzzle) = position {
                if let Some(direction) = muzzle.direction_to(player_position) {
                    self.spawn_projectile(
                        ProjectileKind::Standard,
                        Faction::Enemy,
                        muzzle,
                        direction.scaled(RANGED_PROJECTILE_SPEED),
                        RANGED_PROJECTILE_DAMAGE,
                        1,
                        out_events,
                    );
                }
            }
            if let Some(damage) = contact {
                self.damage_player(damage, out_events);
            }
        }
    }

    fn tick_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let cull_bounds = Bounds::centered(
            WorldPoint::new(ARENA_WIDTH * 0.5, ARENA_HEIGHT * 0.5),
            ARENA_WIDTH + SPAWN_MARGIN * 2.0,
            ARENA_HEIGHT + SPAWN_MARGIN * 2.0,
        );
        let mut projectile_indices: Vec<u32> = Vec::new();
        for kind in [ProjectileKind::Standard, ProjectileKind::Piercing] {
            projectile_indices
                .extend_from_slice(&self.active[EntityKind::Projectile(kind).slot()]);
        }
        for index in projectile_indices {
            let expired = {
                let record = &mut self.slots[index as usize];
                record.position = record
                    .position
                    .translated(record.velocity.scaled(dt.as_secs_f32()));
                !cull_bounds.contains(record.position)
            };
            if expired {
                let id = self.slots[index as usize].id;
                self.deactivate(index);
                out_events.push(Event::ProjectileExpired { entity: id });
            }
        }
    }

    fn execute_strike(
        &mut self,
        projectile: EntityId,
        target: EntityId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(shot) = self.record(projectile) else {
            return;
        };
        let (shot_kind, damage) = match shot.kind {
            EntityKind::Projectile(kind) => (kind, shot.damage),
            _ => return,
        };
        if shot_kind == ProjectileKind::Piercing && shot.hit_memory.contains(&target) {
            return;
        }

        let target_kind = match self.record(target) {
            Some(record) if record.health > 0.0 || record.kind == EntityKind::Player => {
                record.kind
            }
            _ => return,
        };

        match target_kind {
            EntityKind::Player => self.damage_player(damage, out_events),
            EntityKind::Enemy(kind) => {
                let dead = {
                    let record = &mut self.slots[target.get() as usize];
                    record.health -= damage;
                    record.health <= 0.0
                };
                if dead {
                    self.deactivate(target.get());
                    out_events.push(Event::EnemyKilled {
                        entity: target,
                        kind,
                    });
                }
            }
            _ => return,
        }
        out_events.push(Event::StrikeLanded { projectile, target });

        // Per-kind on-hit behaviour: standard bolts die on their first
        // effective hit; piercing bolts remember the target and spend one
        // durability per distinct target.
        match shot_kind {
            ProjectileKind::Standard => {
                self.deactivate(projectile.get());
                out_events.push(Event::ProjectileExpired { entity: projectile });
            }
            ProjectileKind::Piercing => {
                let spent = {
                    let record = &mut self.slots[projectile.get() as usize];
                    record.hit_memory.push(target);
                    record.durability = record.durability.saturating_sub(1);
                    record.durability == 0
                };
                if spent {
                    self.deactivate(projectile.get());
                    out_events.push(Event::ProjectileExpired { entity: projectile });
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let scaled = world.clock.advance(dt);
            if scaled.is_zero() {
                return;
            }
            out_events.push(Event::TimeAdvanced { dt: scaled });
            world.tick_player(scaled);
            world.tick_enemies(scaled, out_events);
            world.tick_projectiles(scaled, out_events);
        }
        Command::SteerPlayer { direction } => {
            world.steer = direction.normalized_or_zero();
        }
        Command::FireWeapon { aim } => {
            let Some(player) = world.player_record() else {
                return;
            };
            if player.health <= 0.0 {
                return;
            }
            let origin = player.position;
            let Some(direction) = origin.direction_to(aim) else {
                return;
            };
            let now = world.clock.now();
            let interval = world.loadout.weapon.fire_interval();
            if let Some(last) = world.loadout.last_shot_at {
                if now.saturating_sub(last) < interval {
                    return;
                }
            }
            world.loadout.last_shot_at = Some(now);
            let spec = world.loadout.weapon.spec().clone();
            let damage = world.loadout.weapon.damage();
            world.spawn_projectile(
                spec.projectile,
                Faction::Friendly,
                origin,
                direction.scaled(spec.projectile_speed),
                damage,
                spec.durability,
                out_events,
            );
            out_events.push(Event::ShotFired);
        }
        Command::SpawnEnemy { kind, position } => {
            world.spawn_enemy(kind, position, out_events);
        }
        Command::SpawnProjectile {
            kind,
            faction,
            position,
            velocity,
            damage,
            durability,
        } => {
            world.spawn_projectile(
                kind, faction, position, velocity, damage, durability, out_events,
            );
        }
        Command::Strike { projectile, target } => {
            world.execute_strike(projectile, target, out_events);
        }
        Command::Kill { entity } => {
            let Some(record) = world.record(entity) else {
                return;
            };
            let kind = record.kind;
            world.deactivate(entity.get());
            match kind {
                EntityKind::Enemy(enemy_kind) => out_events.push(Event::EnemyKilled {
                    entity,
                    kind: enemy_kind,
                }),
                EntityKind::Projectile(_) => {
                    out_events.push(Event::ProjectileExpired { entity });
                }
                EntityKind::Player => out_events.push(Event::PlayerDied),
                EntityKind::Background => {}
            }
        }
        Command::SwitchArea { area } => {
            let background_slot = EntityKind::Background.slot();
            if let Some(index) = world.active[background_slot].first().copied() {
                world.slots[index as usize].area = area;
                out_events.push(Event::AreaChanged { area });
            }
        }
        Command::PauseClock => {
            if !world.clock.is_paused() {
                world.clock.pause();
                out_events.push(Event::ClockPaused);
            }
        }
        Command::ResumeClock => {
            if world.clock.is_paused() {
                world.clock.resume();
                out_events.push(Event::ClockResumed);
            }
        }
        Command::EndGame { victory } => {
            if !world.ended {
                world.ended = true;
                out_events.push(Event::GameEnded { victory });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use stormz_core::{
        EnemySnapshot, EnemyView, EntityKind, Faction, PlayerSnapshot, PoolCensus,
        ProjectileKind, ProjectileSnapshot, ProjectileView, KIND_COUNT,
    };

    use super::World;

    /// Current reading of the world's virtual clock.
    #[must_use]
    pub fn clock_now(world: &World) -> Duration {
        world.clock.now()
    }

    /// Reports whether the virtual clock is frozen.
    #[must_use]
    pub fn clock_paused(world: &World) -> bool {
        world.clock.is_paused()
    }

    /// Captures a read-only snapshot of the player, if active.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        let record = world.player_record()?;
        Some(PlayerSnapshot {
            id: record.id,
            position: record.position,
            health: record.health,
            max_health: record.max_health,
            armor_health: world
                .loadout
                .armor
                .as_ref()
                .map_or(0.0, |armor| armor.stats().health()),
        })
    }

    /// Captures a read-only view of every active enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let mut snapshots = Vec::new();
        for kind in stormz_core::EnemyKind::ALL {
            for index in &world.active[EntityKind::Enemy(kind).slot()] {
                let record = &world.slots[*index as usize];
                snapshots.push(EnemySnapshot {
                    id: record.id,
                    kind,
                    position: record.position,
                    health: record.health,
                });
            }
        }
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every active projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let mut snapshots = Vec::new();
        for kind in [ProjectileKind::Standard, ProjectileKind::Piercing] {
            for index in &world.active[EntityKind::Projectile(kind).slot()] {
                let record = &world.slots[*index as usize];
                snapshots.push(ProjectileSnapshot {
                    id: record.id,
                    kind,
                    faction: record.faction,
                    position: record.position,
                    damage: record.damage,
                    durability: record.durability,
                    hit_memory: record.hit_memory.clone(),
                });
            }
        }
        ProjectileView::from_snapshots(snapshots)
    }

    /// Captures per-kind population counts from the pool arena.
    #[must_use]
    pub fn census(world: &World) -> PoolCensus {
        let mut active = [0usize; KIND_COUNT];
        let mut capacity = [0usize; KIND_COUNT];
        for kind in EntityKind::ALL {
            active[kind.slot()] = world.active[kind.slot()].len();
            capacity[kind.slot()] = world.pools.capacity(kind);
        }
        let hostile_projectiles = [ProjectileKind::Standard, ProjectileKind::Piercing]
            .into_iter()
            .flat_map(|kind| world.active[EntityKind::Projectile(kind).slot()].iter())
            .filter(|index| {
                world.slots[**index as usize]
                    .faction
                    .is_hostile_to(Faction::Friendly)
            })
            .count();
        PoolCensus::new(active, capacity, hostile_projectiles)
    }

    /// Area number currently displayed by the background.
    #[must_use]
    pub fn background_area(world: &World) -> u32 {
        world.active[EntityKind::Background.slot()]
            .first()
            .map_or(0, |index| world.slots[*index as usize].area)
    }

    /// Read-only access to the player's weapon stats.
    #[must_use]
    pub fn weapon(world: &World) -> &stormz_stat_modifiers::WeaponStats {
        &world.loadout.weapon
    }

    /// Read-only access to the player's armor, if worn.
    #[must_use]
    pub fn armor(world: &World) -> Option<&stormz_stat_modifiers::Armor> {
        world.loadout.armor.as_ref()
    }

    /// Handles of every active entity in generic update order.
    #[must_use]
    pub fn active_entities(world: &World) -> Vec<stormz_core::EntityId> {
        world
            .all_active
            .iter()
            .map(|index| world.slots[*index as usize].id)
            .collect()
    }
}
