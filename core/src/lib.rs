#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the StormZ simulation engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the play area expressed in world units.
pub const ARENA_WIDTH: f32 = 960.0;
/// Height of the play area expressed in world units.
pub const ARENA_HEIGHT: f32 = 540.0;
/// Distance beyond the play area edge at which enemies materialise.
pub const SPAWN_MARGIN: f32 = 60.0;

/// Number of distinct entity kinds managed by the pool arena.
pub const KIND_COUNT: usize = 8;

/// Position or direction expressed in continuous world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Origin of the world coordinate system.
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Creates a new point from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point translated by the provided delta.
    #[must_use]
    pub fn translated(self, delta: WorldPoint) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Returns the point scaled component-wise by the provided factor.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length of the point interpreted as a vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        Self::new(other.x - self.x, other.y - self.y).length()
    }

    /// Unit vector pointing from this point toward the other.
    ///
    /// Returns `None` when the points coincide, so callers never observe a
    /// NaN direction.
    #[must_use]
    pub fn direction_to(self, other: WorldPoint) -> Option<WorldPoint> {
        let delta = Self::new(other.x - self.x, other.y - self.y);
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        Some(delta.scaled(1.0 / length))
    }

    /// Returns the vector normalized to unit length, or zero when degenerate.
    #[must_use]
    pub fn normalized_or_zero(self) -> WorldPoint {
        let length = self.length();
        if length <= f32::EPSILON {
            return WorldPoint::ZERO;
        }
        self.scaled(1.0 / length)
    }
}

/// Axis-aligned bounding rectangle centred on a world point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    center: WorldPoint,
    half_width: f32,
    half_height: f32,
}

impl Bounds {
    /// Creates bounds centred on the provided point with full extents.
    #[must_use]
    pub fn centered(center: WorldPoint, width: f32, height: f32) -> Self {
        Self {
            center,
            half_width: width * 0.5,
            half_height: height * 0.5,
        }
    }

    /// Bounds covering the whole play area.
    #[must_use]
    pub fn play_area() -> Self {
        Self::centered(
            WorldPoint::new(ARENA_WIDTH * 0.5, ARENA_HEIGHT * 0.5),
            ARENA_WIDTH,
            ARENA_HEIGHT,
        )
    }

    /// Centre of the rectangle.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Leftmost coordinate covered by the rectangle.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.center.x() - self.half_width
    }

    /// Rightmost coordinate covered by the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.center.x() + self.half_width
    }

    /// Topmost coordinate covered by the rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y() - self.half_height
    }

    /// Bottommost coordinate covered by the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.center.y() + self.half_height
    }

    /// Full width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    /// Full height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    /// Reports whether two rectangles overlap, edges included.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Reports whether the point lies within the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x() >= self.left()
            && point.x() <= self.right()
            && point.y() >= self.top()
            && point.y() <= self.bottom()
    }

    /// Clamps the provided point so it stays within the rectangle.
    #[must_use]
    pub fn clamped(&self, point: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            point.x().clamp(self.left(), self.right()),
            point.y().clamp(self.top(), self.bottom()),
        )
    }
}

/// Dense bit grid describing the solid pixels of an irregular silhouette.
///
/// Masks are anchored at the top-left corner of the owning entity's bounds
/// and sampled at one world unit per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl PixelMask {
    /// Creates a mask with every cell solid.
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        let capacity = (width as usize) * (height as usize);
        Self {
            width,
            height,
            bits: vec![true; capacity],
        }
    }

    /// Creates a circular mask inscribed in a square of the given diameter.
    #[must_use]
    pub fn disc(diameter: u32) -> Self {
        let mut mask = Self {
            width: diameter,
            height: diameter,
            bits: vec![false; (diameter as usize) * (diameter as usize)],
        };
        let radius = diameter as f32 * 0.5;
        for row in 0..diameter {
            for column in 0..diameter {
                let dx = column as f32 + 0.5 - radius;
                let dy = row as f32 + 0.5 - radius;
                if dx * dx + dy * dy <= radius * radius {
                    mask.bits[(row * diameter + column) as usize] = true;
                }
            }
        }
        mask
    }

    /// Builds a mask from textual rows where `'#'` marks a solid cell.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        let mut bits = vec![false; (width as usize) * (height as usize)];
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, glyph) in row.chars().enumerate() {
                if glyph == '#' {
                    bits[row_index * width as usize + column_index] = true;
                }
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Width of the mask in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the mask in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell at the provided local coordinates is solid.
    #[must_use]
    pub fn is_set(&self, column: u32, row: u32) -> bool {
        if column >= self.width || row >= self.height {
            return false;
        }
        self.bits[(row * self.width + column) as usize]
    }

    /// Reports whether two positioned masks share at least one solid cell.
    ///
    /// Each mask is anchored at the top-left corner of its bounds; the bounds
    /// rectangles supply the world-space placement.
    #[must_use]
    pub fn overlaps(&self, own: &Bounds, other: &PixelMask, other_bounds: &Bounds) -> bool {
        let overlap_left = own.left().max(other_bounds.left());
        let overlap_right = own.right().min(other_bounds.right());
        let overlap_top = own.top().max(other_bounds.top());
        let overlap_bottom = own.bottom().min(other_bounds.bottom());
        if overlap_left > overlap_right || overlap_top > overlap_bottom {
            return false;
        }

        let mut y = overlap_top.floor();
        while y <= overlap_bottom {
            let mut x = overlap_left.floor();
            while x <= overlap_right {
                let own_column = (x - own.left()).floor();
                let own_row = (y - own.top()).floor();
                let other_column = (x - other_bounds.left()).floor();
                let other_row = (y - other_bounds.top()).floor();
                if own_column >= 0.0
                    && own_row >= 0.0
                    && other_column >= 0.0
                    && other_row >= 0.0
                    && self.is_set(own_column as u32, own_row as u32)
                    && other.is_set(other_column as u32, other_row as u32)
                {
                    return true;
                }
                x += 1.0;
            }
            y += 1.0;
        }
        false
    }
}

/// Unique index-based handle assigned to a pooled entity slot.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity handle with the provided slot index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy variants differing in health, speed, damage, and behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker that closes to contact range.
    Basic,
    /// Fragile but quick walker.
    Fast,
    /// Slow, durable walker that hits hard.
    Heavy,
    /// Keeps its distance and fires enemy-faction projectiles.
    Ranged,
}

impl EnemyKind {
    /// Every enemy kind in difficulty-table order.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Heavy,
        EnemyKind::Ranged,
    ];

    /// Stable index of the kind within per-kind tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            EnemyKind::Basic => 0,
            EnemyKind::Fast => 1,
            EnemyKind::Heavy => 2,
            EnemyKind::Ranged => 3,
        }
    }

    /// Base score value reported when an enemy of this kind dies.
    #[must_use]
    pub const fn base_points(self) -> u32 {
        match self {
            EnemyKind::Basic => 10,
            EnemyKind::Fast => 15,
            EnemyKind::Heavy => 25,
            EnemyKind::Ranged => 20,
        }
    }

    /// Combat attributes assigned to freshly spawned enemies of this kind.
    #[must_use]
    pub const fn archetype(self) -> EnemyArchetype {
        match self {
            EnemyKind::Basic => EnemyArchetype {
                health: 3.0,
                speed: 90.0,
                contact_damage: 1.0,
            },
            EnemyKind::Fast => EnemyArchetype {
                health: 2.0,
                speed: 140.0,
                contact_damage: 1.0,
            },
            EnemyKind::Heavy => EnemyArchetype {
                health: 8.0,
                speed: 60.0,
                contact_damage: 2.0,
            },
            EnemyKind::Ranged => EnemyArchetype {
                health: 3.0,
                speed: 70.0,
                contact_damage: 1.0,
            },
        }
    }
}

/// Combat attributes copied onto an enemy slot at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyArchetype {
    /// Starting and maximum health.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt by one contact strike.
    pub contact_damage: f32,
}

/// Projectile variants differing in how many hits they survive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Dies on its first effective hit.
    Standard,
    /// Passes through up to its durability in distinct targets.
    Piercing,
}

/// Tag identifying which pool an entity slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The single controllable survivor.
    Player,
    /// Hostile walker of the given variant.
    Enemy(EnemyKind),
    /// In-flight projectile of the given variant.
    Projectile(ProjectileKind),
    /// Non-combat backdrop representing the current area.
    Background,
}

impl EntityKind {
    /// Every entity kind in pool-table order.
    pub const ALL: [EntityKind; KIND_COUNT] = [
        EntityKind::Player,
        EntityKind::Enemy(EnemyKind::Basic),
        EntityKind::Enemy(EnemyKind::Fast),
        EntityKind::Enemy(EnemyKind::Heavy),
        EntityKind::Enemy(EnemyKind::Ranged),
        EntityKind::Projectile(ProjectileKind::Standard),
        EntityKind::Projectile(ProjectileKind::Piercing),
        EntityKind::Background,
    ];

    /// Stable slot of the kind within per-kind pool tables.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            EntityKind::Player => 0,
            EntityKind::Enemy(kind) => 1 + kind.index(),
            EntityKind::Projectile(ProjectileKind::Standard) => 5,
            EntityKind::Projectile(ProjectileKind::Piercing) => 6,
            EntityKind::Background => 7,
        }
    }

    /// Full extent of the kind's bounding rectangle in world units.
    #[must_use]
    pub const fn extent(self) -> (f32, f32) {
        match self {
            EntityKind::Player | EntityKind::Enemy(_) => (50.0, 50.0),
            EntityKind::Projectile(_) => (8.0, 8.0),
            EntityKind::Background => (ARENA_WIDTH, ARENA_HEIGHT),
        }
    }

    /// Reports whether overlap tests must consult the kind's pixel mask.
    ///
    /// Round silhouettes need the precise test; the piercing bolt is a solid
    /// square, so its bounds are exact.
    #[must_use]
    pub const fn precise(self) -> bool {
        match self {
            EntityKind::Player | EntityKind::Enemy(_) => true,
            EntityKind::Projectile(ProjectileKind::Standard) => true,
            EntityKind::Projectile(ProjectileKind::Piercing) => false,
            EntityKind::Background => false,
        }
    }
}

/// Combat allegiance tags resolved through the static hostility table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Hostile to and from every faction, itself included.
    Neutral,
    /// The player's side.
    Friendly,
    /// The wave attackers' side.
    Enemy,
}

impl Faction {
    /// Resolves whether an attack from this faction harms the target faction.
    ///
    /// The table is irreflexive for `Friendly` and `Enemy`; `Neutral`
    /// interactions are always hostile in both directions.
    #[must_use]
    pub const fn is_hostile_to(self, target: Faction) -> bool {
        match (self, target) {
            (Faction::Friendly, Faction::Friendly) => false,
            (Faction::Enemy, Faction::Enemy) => false,
            _ => true,
        }
    }
}

/// Progression phases owned exclusively by the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// An active wave is spawning and being fought.
    Normal,
    /// No active wave; waiting on the break timer or a break objective.
    Break,
    /// Scripted sequence during which spawning and input are suspended.
    Transition,
    /// Simulation time is frozen; entered and left only by explicit toggle.
    Paused,
}

/// How a wave hands over to the next phase once it clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveFinale {
    /// Ordinary timed break followed by the next wave.
    TimedBreak,
    /// Objective break: the player must reach the right edge to change area.
    AreaAdvance,
    /// Victory break: a fixed delay, then the run ends in a win.
    Victory,
}

/// Per-wave configuration copied fresh from the difficulty table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveInfo {
    spawn_interval: Duration,
    counts: [u32; 4],
    per_heat: u32,
    finale: WaveFinale,
}

impl WaveInfo {
    /// Creates a wave description from cadence, composition, and batch size.
    #[must_use]
    pub const fn new(
        spawn_interval: Duration,
        counts: [u32; 4],
        per_heat: u32,
        finale: WaveFinale,
    ) -> Self {
        Self {
            spawn_interval,
            counts,
            per_heat,
            finale,
        }
    }

    /// Interval between spawn-timer firings.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Number of enemies spawned per timer firing.
    #[must_use]
    pub const fn per_heat(&self) -> u32 {
        self.per_heat
    }

    /// How the wave hands over once cleared.
    #[must_use]
    pub const fn finale(&self) -> WaveFinale {
        self.finale
    }

    /// Remaining spawn count for the provided enemy kind.
    #[must_use]
    pub const fn count(&self, kind: EnemyKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Sum of the remaining spawn counts across every kind.
    #[must_use]
    pub fn remaining_total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Reports whether every per-kind count has reached zero.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.counts.iter().all(|count| *count == 0)
    }

    /// Decrements the count for the kind, reporting whether one remained.
    pub fn decrement(&mut self, kind: EnemyKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Static per-wave difficulty table indexed by one-based wave number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    waves: Vec<WaveInfo>,
}

impl DifficultyTable {
    /// Creates a table from explicit per-wave entries.
    #[must_use]
    pub fn new(waves: Vec<WaveInfo>) -> Self {
        Self { waves }
    }

    /// The standard six-wave campaign.
    ///
    /// Waves two and four end in an area-advance objective; the final wave
    /// ends in the victory break.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            WaveInfo::new(
                Duration::from_millis(1250),
                [10, 0, 0, 0],
                1,
                WaveFinale::TimedBreak,
            ),
            WaveInfo::new(
                Duration::from_millis(1000),
                [14, 4, 0, 0],
                1,
                WaveFinale::AreaAdvance,
            ),
            WaveInfo::new(
                Duration::from_millis(1000),
                [12, 6, 2, 0],
                2,
                WaveFinale::TimedBreak,
            ),
            WaveInfo::new(
                Duration::from_millis(900),
                [12, 8, 3, 3],
                2,
                WaveFinale::AreaAdvance,
            ),
            WaveInfo::new(
                Duration::from_millis(800),
                [14, 10, 4, 4],
                2,
                WaveFinale::TimedBreak,
            ),
            WaveInfo::new(
                Duration::from_millis(700),
                [16, 12, 6, 6],
                3,
                WaveFinale::Victory,
            ),
        ])
    }

    /// Looks up a wave by its one-based number.
    #[must_use]
    pub fn wave(&self, number: u32) -> Option<&WaveInfo> {
        if number == 0 {
            return None;
        }
        self.waves.get(number as usize - 1)
    }

    /// Number of configured waves.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.waves.len() as u32
    }

    /// Reports whether the table holds no waves at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Largest per-kind spawn total across every wave.
    ///
    /// Pools sized from this bound can hold a wave's entire composition
    /// alive simultaneously, which makes pool exhaustion unreachable.
    #[must_use]
    pub fn peak_count(&self, kind: EnemyKind) -> u32 {
        self.waves
            .iter()
            .map(|wave| wave.count(kind))
            .max()
            .unwrap_or(0)
    }
}

/// Fixed pool capacities per entity kind, derived from the difficulty table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    capacities: [usize; KIND_COUNT],
}

impl PoolConfig {
    /// Default number of standard projectile slots held in reserve.
    pub const STANDARD_PROJECTILE_HEADROOM: usize = 128;
    /// Default number of piercing projectile slots held in reserve.
    pub const PIERCING_PROJECTILE_HEADROOM: usize = 64;

    /// Creates a configuration from explicit per-kind capacities.
    #[must_use]
    pub const fn from_capacities(capacities: [usize; KIND_COUNT]) -> Self {
        Self { capacities }
    }

    /// Sizes every pool for the worst-case concurrent population of the table.
    #[must_use]
    pub fn for_table(table: &DifficultyTable) -> Self {
        let mut capacities = [0usize; KIND_COUNT];
        capacities[EntityKind::Player.slot()] = 1;
        capacities[EntityKind::Background.slot()] = 1;
        for kind in EnemyKind::ALL {
            capacities[EntityKind::Enemy(kind).slot()] = table.peak_count(kind) as usize;
        }
        capacities[EntityKind::Projectile(ProjectileKind::Standard).slot()] =
            Self::STANDARD_PROJECTILE_HEADROOM;
        capacities[EntityKind::Projectile(ProjectileKind::Piercing).slot()] =
            Self::PIERCING_PROJECTILE_HEADROOM;
        Self { capacities }
    }

    /// Capacity reserved for the provided entity kind.
    #[must_use]
    pub const fn capacity(&self, kind: EntityKind) -> usize {
        self.capacities[kind.slot()]
    }

    /// Total number of entity slots across every pool.
    #[must_use]
    pub fn total(&self) -> usize {
        self.capacities.iter().sum()
    }
}

/// Base weapon parameters used to seed a [`Command::FireWeapon`] shot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Display name of the weapon.
    pub name: String,
    /// Base damage per projectile before modifiers.
    pub damage: f32,
    /// Base interval between shots in seconds on the virtual clock.
    pub fire_interval_seconds: f32,
    /// Projectile variant the weapon emits.
    pub projectile: ProjectileKind,
    /// Muzzle speed of emitted projectiles in world units per second.
    pub projectile_speed: f32,
    /// Number of distinct targets a piercing projectile survives.
    pub durability: u32,
}

impl WeaponSpec {
    /// The starter sidearm.
    #[must_use]
    pub fn pistol() -> Self {
        Self {
            name: "Pistol".to_owned(),
            damage: 2.0,
            fire_interval_seconds: 0.45,
            projectile: ProjectileKind::Standard,
            projectile_speed: 420.0,
            durability: 1,
        }
    }

    /// Rapid-firing rifle unlocked through progression.
    #[must_use]
    pub fn rifle() -> Self {
        Self {
            name: "Rifle".to_owned(),
            damage: 1.0,
            fire_interval_seconds: 0.15,
            projectile: ProjectileKind::Standard,
            projectile_speed: 520.0,
            durability: 1,
        }
    }

    /// Piercing shotgun slug unlocked through progression.
    #[must_use]
    pub fn shotgun() -> Self {
        Self {
            name: "Shotgun".to_owned(),
            damage: 3.0,
            fire_interval_seconds: 0.9,
            projectile: ProjectileKind::Piercing,
            projectile_speed: 380.0,
            durability: 3,
        }
    }
}

/// Base armor parameters worn by the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmorSpec {
    /// Fraction of incoming damage offered to the armor, clamped to [0, 1].
    pub resistance: f32,
    /// Maximum armor health before modifiers.
    pub max_health: f32,
    /// Armor health restored per second once the regen cooldown clears.
    pub regen_rate: f32,
    /// Seconds without damage required before regeneration resumes.
    pub regen_cooldown_seconds: f32,
    /// Whether the armor caps leftover damage at zero residual armor health.
    pub health_gate: bool,
}

impl ArmorSpec {
    /// Thin vest that soaks a little of everything.
    pub const LIGHT: ArmorSpec = ArmorSpec {
        resistance: 0.6,
        max_health: 2.0,
        regen_rate: 1.0,
        regen_cooldown_seconds: 1.0,
        health_gate: false,
    };

    /// Middle-of-the-road plate.
    pub const BALANCED: ArmorSpec = ArmorSpec {
        resistance: 0.75,
        max_health: 5.0,
        regen_rate: 1.25,
        regen_cooldown_seconds: 2.5,
        health_gate: false,
    };

    /// Slow-recovering plate that never forwards its uncovered absorption.
    pub const HEAVY: ArmorSpec = ArmorSpec {
        resistance: 0.9,
        max_health: 8.0,
        regen_rate: 0.75,
        regen_cooldown_seconds: 5.0,
        health_gate: true,
    };

    /// Full-absorption weave with a shallow health pool.
    pub const ADAPTIVE: ArmorSpec = ArmorSpec {
        resistance: 1.0,
        max_health: 2.0,
        regen_rate: 0.5,
        regen_cooldown_seconds: 2.0,
        health_gate: true,
    };
}

/// Persistent progression fields read at game start and written at game end.
///
/// The simulation treats the backing store as an opaque key-value record; no
/// I/O happens inside the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Purchased fire-rate upgrade level.
    pub firerate_level: u32,
    /// Purchased damage upgrade level.
    pub damage_level: u32,
    /// Purchased vitality upgrade level.
    pub vitality_level: u32,
    /// Best score recorded across previous runs.
    pub high_score: u32,
    /// Deepest wave reached across previous runs.
    pub high_wave: u32,
}

/// Result record produced once at game end for the caller to persist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Final score accumulated by the scheduler.
    pub score: u32,
    /// Wave number the run ended on.
    pub wave_number: u32,
    /// Whether the run ended in victory.
    pub victory: bool,
    /// Upgrade tokens awarded for the run.
    pub tokens_gained: u32,
}

impl RunReport {
    /// Computes the token payout for a finished run.
    #[must_use]
    pub const fn payout(score: u32, wave_number: u32) -> u32 {
        wave_number * 5 + score / 12 + 10
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle assigned to the enemy slot.
    pub id: EntityId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Current position of the enemy.
    pub position: WorldPoint,
    /// Remaining health of the enemy.
    pub health: f32,
}

/// Read-only snapshot describing all active enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of active enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Handle assigned to the projectile slot.
    pub id: EntityId,
    /// Variant of the projectile.
    pub kind: ProjectileKind,
    /// Faction the projectile fights for.
    pub faction: Faction,
    /// Current position of the projectile.
    pub position: WorldPoint,
    /// Damage applied per effective hit.
    pub damage: f32,
    /// Distinct targets a piercing projectile still survives.
    pub durability: u32,
    /// Targets this projectile has already damaged.
    pub hit_memory: Vec<EntityId>,
}

impl ProjectileSnapshot {
    /// Reports whether the projectile already damaged the target.
    #[must_use]
    pub fn already_hit(&self, target: EntityId) -> bool {
        self.hit_memory.contains(&target)
    }
}

/// Read-only snapshot describing all active projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether no projectile is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Handle assigned to the player slot.
    pub id: EntityId,
    /// Current position of the player.
    pub position: WorldPoint,
    /// Remaining player health.
    pub health: f32,
    /// Maximum player health after modifiers.
    pub max_health: f32,
    /// Remaining armor health, zero when no armor is worn.
    pub armor_health: f32,
}

/// Per-kind population counts captured from the pool arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolCensus {
    active: [usize; KIND_COUNT],
    capacity: [usize; KIND_COUNT],
    hostile_projectiles: usize,
}

impl PoolCensus {
    /// Creates a census from per-kind counts.
    #[must_use]
    pub const fn new(
        active: [usize; KIND_COUNT],
        capacity: [usize; KIND_COUNT],
        hostile_projectiles: usize,
    ) -> Self {
        Self {
            active,
            capacity,
            hostile_projectiles,
        }
    }

    /// Number of active instances of the kind.
    #[must_use]
    pub const fn active(&self, kind: EntityKind) -> usize {
        self.active[kind.slot()]
    }

    /// Number of inactive instances of the kind available to spawn.
    #[must_use]
    pub const fn idle(&self, kind: EntityKind) -> usize {
        self.capacity[kind.slot()] - self.active[kind.slot()]
    }

    /// Configured pool capacity of the kind.
    #[must_use]
    pub const fn capacity(&self, kind: EntityKind) -> usize {
        self.capacity[kind.slot()]
    }

    /// Total number of active enemies across every variant.
    #[must_use]
    pub fn active_enemies(&self) -> usize {
        EnemyKind::ALL
            .iter()
            .map(|kind| self.active(EntityKind::Enemy(*kind)))
            .sum()
    }

    /// Number of active entities hostile to the player.
    ///
    /// Enemy walkers plus enemy-faction projectiles; the break timer only
    /// runs while this is zero.
    #[must_use]
    pub fn hostiles(&self) -> usize {
        self.active_enemies() + self.hostile_projectiles
    }
}

/// Reasons an entity spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SpawnError {
    /// No inactive instance of the kind is available.
    ///
    /// Pools sized from the difficulty table make this unreachable; observing
    /// it indicates a configuration defect, not a runtime condition.
    #[error("no inactive {0:?} instance available")]
    PoolExhausted(EntityKind),
    /// The kind's pool was configured with zero capacity.
    #[error("entity kind {0:?} is not configured")]
    InvalidKind(EntityKind),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and every active entity by `dt`.
    Tick {
        /// Duration of simulated time elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the player's movement intent for subsequent ticks.
    SteerPlayer {
        /// Desired travel direction; normalised by the world, zero stops.
        direction: WorldPoint,
    },
    /// Requests a shot from the player's weapon toward the aim point.
    ///
    /// Dropped silently while the weapon cooldown has not cleared.
    FireWeapon {
        /// World point the shot travels toward.
        aim: WorldPoint,
    },
    /// Activates an enemy of the given kind at the given position.
    SpawnEnemy {
        /// Enemy variant to activate.
        kind: EnemyKind,
        /// Spawn position, normally on the ring outside the play area.
        position: WorldPoint,
    },
    /// Activates a projectile with explicit flight parameters.
    SpawnProjectile {
        /// Projectile variant to activate.
        kind: ProjectileKind,
        /// Faction the projectile fights for.
        faction: Faction,
        /// Spawn position of the projectile.
        position: WorldPoint,
        /// Velocity in world units per second.
        velocity: WorldPoint,
        /// Damage applied per effective hit.
        damage: f32,
        /// Distinct targets a piercing projectile survives.
        durability: u32,
    },
    /// Applies one projectile hit to one target.
    Strike {
        /// Projectile delivering the hit.
        projectile: EntityId,
        /// Entity receiving the hit.
        target: EntityId,
    },
    /// Deactivates the entity, returning its slot to the pool.
    Kill {
        /// Handle of the entity to deactivate.
        entity: EntityId,
    },
    /// Swaps the background to the provided area number.
    SwitchArea {
        /// Area to display behind the action.
        area: u32,
    },
    /// Freezes the virtual clock.
    PauseClock,
    /// Resumes the virtual clock.
    ResumeClock,
    /// Ends the run, broadcasting the terminal event exactly once.
    EndGame {
        /// Whether the run ended in victory.
        victory: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy was activated.
    EnemySpawned {
        /// Handle assigned to the enemy.
        entity: EntityId,
        /// Variant of the activated enemy.
        kind: EnemyKind,
        /// Position the enemy materialised at.
        position: WorldPoint,
    },
    /// Confirms that a projectile was activated.
    ProjectileSpawned {
        /// Handle assigned to the projectile.
        entity: EntityId,
        /// Variant of the activated projectile.
        kind: ProjectileKind,
        /// Faction the projectile fights for.
        faction: Faction,
    },
    /// Audio cue: the player's weapon discharged.
    ShotFired,
    /// Audio cue: a projectile hit connected.
    StrikeLanded {
        /// Projectile that delivered the hit.
        projectile: EntityId,
        /// Entity that received the hit.
        target: EntityId,
    },
    /// Reports that an enemy died and left the active set.
    EnemyKilled {
        /// Handle of the dead enemy.
        entity: EntityId,
        /// Variant of the dead enemy.
        kind: EnemyKind,
    },
    /// Reports that a projectile expired or was spent.
    ProjectileExpired {
        /// Handle of the expired projectile.
        entity: EntityId,
    },
    /// Reports the player's remaining health after taking damage.
    PlayerDamaged {
        /// Health remaining once armor absorption resolved.
        remaining_health: f32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied,
    /// Confirms that the background switched areas.
    AreaChanged {
        /// Area now displayed behind the action.
        area: u32,
    },
    /// Confirms that the virtual clock froze.
    ClockPaused,
    /// Confirms that the virtual clock resumed.
    ClockResumed,
    /// Terminal signal raised exactly once per run.
    GameEnded {
        /// Whether the run ended in victory.
        victory: bool,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Kind whose activation failed.
        kind: EntityKind,
        /// Specific reason the activation failed.
        reason: SpawnError,
    },
}
