#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reversible stat modifier engine for weapon and armor statistics.
//!
//! Modifiers fold additively into a `(multiplier, bonus)` pair per attribute
//! rather than being recomputed from a live list, so the order of application
//! and removal never changes the final effective value as long as every apply
//! is paired with exactly one structurally identical removal. Each modifier
//! kind maps to a pure fold and its exact algebraic inverse.

use std::time::Duration;

use stormz_core::{ArmorSpec, WeaponSpec};

/// Floor for interval-type divisors. Debuffs can push a folded multiplier to
/// zero or below; reads clamp here so the division stays finite.
const MIN_RATE_DIVISOR: f32 = 1e-3;

/// Handle identifying one applied modifier within a stats record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId(u32);

impl ModifierId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Closed set of weapon adjustments, one per `(attribute, fold)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponModifierKind {
    /// Adds to the damage multiplier.
    DamageMult,
    /// Adds flat damage after multiplication.
    DamageBonus,
    /// Adds to the fire-interval divisor, shortening the interval.
    FireIntervalMult,
    /// Subtracts flat seconds from the fire interval.
    FireIntervalBonus,
}

/// Closed set of armor adjustments, one per `(attribute, fold)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArmorModifierKind {
    /// Adds to the resistance multiplier.
    ResistanceMult,
    /// Adds flat resistance after multiplication.
    ResistanceBonus,
    /// Adds to the maximum-health multiplier.
    MaxHealthMult,
    /// Adds flat maximum health after multiplication.
    MaxHealthBonus,
    /// Adds to the regeneration-rate multiplier.
    RegenRateMult,
    /// Adds flat regeneration rate after multiplication.
    RegenRateBonus,
    /// Adds to the regen-cooldown divisor, shortening the cooldown.
    RegenCooldownMult,
    /// Subtracts flat seconds from the regen cooldown.
    RegenCooldownBonus,
}

/// One reversible numeric adjustment, optionally time limited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifier<K> {
    kind: K,
    value: f32,
    duration: Option<Duration>,
}

impl<K: Copy> Modifier<K> {
    /// Creates a modifier that expires after `duration` of virtual time.
    #[must_use]
    pub const fn timed(kind: K, value: f32, duration: Duration) -> Self {
        Self {
            kind,
            value,
            duration: Some(duration),
        }
    }

    /// Creates a modifier that persists until the stats record is reset.
    #[must_use]
    pub const fn permanent(kind: K, value: f32) -> Self {
        Self {
            kind,
            value,
            duration: None,
        }
    }

    /// Adjustment kind selecting the folded `(multiplier, bonus)` field.
    #[must_use]
    pub const fn kind(&self) -> K {
        self.kind
    }

    /// Magnitude folded into the selected field.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Declared lifetime on the owning unit's virtual clock, if any.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Weapon modifier alias used throughout the engine.
pub type WeaponModifier = Modifier<WeaponModifierKind>;
/// Armor modifier alias used throughout the engine.
pub type ArmorModifier = Modifier<ArmorModifierKind>;

#[derive(Clone, Copy, Debug)]
struct Applied<K> {
    id: ModifierId,
    modifier: Modifier<K>,
    applied_at: Duration,
}

impl<K> Applied<K> {
    fn is_expired(&self, now: Duration) -> bool {
        match self.modifier.duration {
            Some(duration) => now.saturating_sub(self.applied_at) >= duration,
            None => false,
        }
    }
}

/// Weapon statistics: base values plus folded modifier state.
#[derive(Clone, Debug)]
pub struct WeaponStats {
    spec: WeaponSpec,
    damage_mult: f32,
    damage_bonus: f32,
    fire_interval_mult: f32,
    fire_interval_bonus: f32,
    timed: Vec<Applied<WeaponModifierKind>>,
    permanent: Vec<WeaponModifier>,
    next_id: u32,
}

impl WeaponStats {
    /// Creates a stats record at base values from the weapon catalog entry.
    #[must_use]
    pub fn from_spec(spec: WeaponSpec) -> Self {
        Self {
            spec,
            damage_mult: 1.0,
            damage_bonus: 0.0,
            fire_interval_mult: 1.0,
            fire_interval_bonus: 0.0,
            timed: Vec::new(),
            permanent: Vec::new(),
            next_id: 0,
        }
    }

    /// Catalog entry the record was built from.
    #[must_use]
    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    /// Effective damage, rounded to the nearest integer at read time.
    #[must_use]
    pub fn damage(&self) -> f32 {
        (self.spec.damage * self.damage_mult + self.damage_bonus).round()
    }

    /// Effective interval between shots; real-valued, never rounded.
    ///
    /// The multiplier divides and the bonus subtracts, so a higher upgrade
    /// level always means a faster weapon. The divisor is floored so a
    /// slow-down debuff cannot make the division non-finite; the result is
    /// clamped at zero.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        let divisor = self.fire_interval_mult.max(MIN_RATE_DIVISOR);
        let seconds = self.spec.fire_interval_seconds / divisor - self.fire_interval_bonus;
        Duration::from_secs_f32(seconds.max(0.0))
    }

    /// Current damage multiplier, exposed for reversibility tests.
    #[must_use]
    pub const fn damage_mult(&self) -> f32 {
        self.damage_mult
    }

    /// Current fire-interval multiplier, exposed for reversibility tests.
    #[must_use]
    pub const fn fire_interval_mult(&self) -> f32 {
        self.fire_interval_mult
    }

    /// Folds the modifier in and registers it for expiry tracking.
    ///
    /// Permanent modifiers (no duration) are folded identically but live
    /// until [`WeaponStats::reset`].
    pub fn apply(&mut self, modifier: WeaponModifier, now: Duration) -> ModifierId {
        let id = ModifierId(self.next_id);
        self.next_id += 1;
        fold_weapon(self, modifier.kind, modifier.value);
        match modifier.duration {
            Some(_) => self.timed.push(Applied {
                id,
                modifier,
                applied_at: now,
            }),
            None => self.permanent.push(modifier),
        }
        id
    }

    /// Removes one applied modifier by handle, unfolding its effect.
    ///
    /// Returns `false` without touching any field when the handle is absent,
    /// so double removal never double-subtracts.
    pub fn remove(&mut self, id: ModifierId) -> bool {
        let Some(index) = self.timed.iter().position(|entry| entry.id == id) else {
            return false;
        };
        let entry = self.timed.remove(index);
        unfold_weapon(self, entry.modifier.kind, entry.modifier.value);
        true
    }

    /// Unfolds and drops every timed modifier whose lifetime has elapsed.
    pub fn tick(&mut self, now: Duration) {
        let mut index = 0;
        while index < self.timed.len() {
            if self.timed[index].is_expired(now) {
                let entry = self.timed.remove(index);
                unfold_weapon(self, entry.modifier.kind, entry.modifier.value);
            } else {
                index += 1;
            }
        }
    }

    /// Unfolds every timed modifier in insertion order.
    pub fn clear_timed(&mut self) {
        while !self.timed.is_empty() {
            let entry = self.timed.remove(0);
            unfold_weapon(self, entry.modifier.kind, entry.modifier.value);
        }
    }

    /// Returns the record to base values, dropping every modifier.
    pub fn reset(&mut self) {
        self.clear_timed();
        self.permanent.clear();
        self.damage_mult = 1.0;
        self.damage_bonus = 0.0;
        self.fire_interval_mult = 1.0;
        self.fire_interval_bonus = 0.0;
    }

    /// Number of timed modifiers currently applied.
    #[must_use]
    pub fn timed_len(&self) -> usize {
        self.timed.len()
    }
}

fn fold_weapon(stats: &mut WeaponStats, kind: WeaponModifierKind, value: f32) {
    match kind {
        WeaponModifierKind::DamageMult => stats.damage_mult += value,
        WeaponModifierKind::DamageBonus => stats.damage_bonus += value,
        WeaponModifierKind::FireIntervalMult => stats.fire_interval_mult += value,
        WeaponModifierKind::FireIntervalBonus => stats.fire_interval_bonus += value,
    }
}

fn unfold_weapon(stats: &mut WeaponStats, kind: WeaponModifierKind, value: f32) {
    match kind {
        WeaponModifierKind::DamageMult => stats.damage_mult -= value,
        WeaponModifierKind::DamageBonus => stats.damage_bonus -= value,
        WeaponModifierKind::FireIntervalMult => stats.fire_interval_mult -= value,
        WeaponModifierKind::FireIntervalBonus => stats.fire_interval_bonus -= value,
    }
}

/// Armor statistics: base values, folded modifier state, and current health.
#[derive(Clone, Debug)]
pub struct ArmorStats {
    spec: ArmorSpec,
    resistance_mult: f32,
    resistance_bonus: f32,
    max_health_mult: f32,
    max_health_bonus: f32,
    regen_rate_mult: f32,
    regen_rate_bonus: f32,
    regen_cooldown_mult: f32,
    regen_cooldown_bonus: f32,
    health: f32,
    timed: Vec<Applied<ArmorModifierKind>>,
    permanent: Vec<ArmorModifier>,
    next_id: u32,
}

impl ArmorStats {
    /// Creates a stats record at base values from the armor catalog entry.
    #[must_use]
    pub fn from_spec(spec: ArmorSpec) -> Self {
        Self {
            spec,
            resistance_mult: 1.0,
            resistance_bonus: 0.0,
            max_health_mult: 1.0,
            max_health_bonus: 0.0,
            regen_rate_mult: 1.0,
            regen_rate_bonus: 0.0,
            regen_cooldown_mult: 1.0,
            regen_cooldown_bonus: 0.0,
            health: spec.max_health,
            timed: Vec::new(),
            permanent: Vec::new(),
            next_id: 0,
        }
    }

    /// Effective damage fraction offered to the armor.
    #[must_use]
    pub fn resistance(&self) -> f32 {
        self.spec.resistance * self.resistance_mult + self.resistance_bonus
    }

    /// Effective maximum armor health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.spec.max_health * self.max_health_mult + self.max_health_bonus
    }

    /// Effective armor health regenerated per second.
    #[must_use]
    pub fn regen_rate(&self) -> f32 {
        self.spec.regen_rate * self.regen_rate_mult + self.regen_rate_bonus
    }

    /// Effective seconds without damage before regeneration resumes.
    ///
    /// The multiplier divides and the bonus subtracts; the divisor is floored
    /// against non-finite division and the result is clamped at zero.
    #[must_use]
    pub fn regen_cooldown(&self) -> Duration {
        let divisor = self.regen_cooldown_mult.max(MIN_RATE_DIVISOR);
        let seconds = self.spec.regen_cooldown_seconds / divisor - self.regen_cooldown_bonus;
        Duration::from_secs_f32(seconds.max(0.0))
    }

    /// Remaining armor health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Sets the remaining armor health, clamped to the effective maximum.
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health());
    }

    /// Current resistance multiplier, exposed for reversibility tests.
    #[must_use]
    pub const fn resistance_mult(&self) -> f32 {
        self.resistance_mult
    }

    /// Folds the modifier in and registers it for expiry tracking.
    pub fn apply(&mut self, modifier: ArmorModifier, now: Duration) -> ModifierId {
        let id = ModifierId(self.next_id);
        self.next_id += 1;
        fold_armor(self, modifier.kind, modifier.value);
        match modifier.duration {
            Some(_) => self.timed.push(Applied {
                id,
                modifier,
                applied_at: now,
            }),
            None => self.permanent.push(modifier),
        }
        id
    }

    /// Removes one applied modifier by handle, unfolding its effect.
    ///
    /// Absent handles are a silent no-op returning `false`.
    pub fn remove(&mut self, id: ModifierId) -> bool {
        let Some(index) = self.timed.iter().position(|entry| entry.id == id) else {
            return false;
        };
        let entry = self.timed.remove(index);
        unfold_armor(self, entry.modifier.kind, entry.modifier.value);
        true
    }

    /// Unfolds and drops every timed modifier whose lifetime has elapsed.
    pub fn tick(&mut self, now: Duration) {
        let mut index = 0;
        while index < self.timed.len() {
            if self.timed[index].is_expired(now) {
                let entry = self.timed.remove(index);
                unfold_armor(self, entry.modifier.kind, entry.modifier.value);
            } else {
                index += 1;
            }
        }
    }

    /// Returns the record to base values and refills armor health.
    pub fn reset(&mut self) {
        while !self.timed.is_empty() {
            let entry = self.timed.remove(0);
            unfold_armor(self, entry.modifier.kind, entry.modifier.value);
        }
        self.permanent.clear();
        self.resistance_mult = 1.0;
        self.resistance_bonus = 0.0;
        self.max_health_mult = 1.0;
        self.max_health_bonus = 0.0;
        self.regen_rate_mult = 1.0;
        self.regen_rate_bonus = 0.0;
        self.regen_cooldown_mult = 1.0;
        self.regen_cooldown_bonus = 0.0;
        self.health = self.spec.max_health;
    }
}

fn fold_armor(stats: &mut ArmorStats, kind: ArmorModifierKind, value: f32) {
    match kind {
        ArmorModifierKind::ResistanceMult => stats.resistance_mult += value,
        ArmorModifierKind::ResistanceBonus => stats.resistance_bonus += value,
        ArmorModifierKind::MaxHealthMult => stats.max_health_mult += value,
        ArmorModifierKind::MaxHealthBonus => stats.max_health_bonus += value,
        ArmorModifierKind::RegenRateMult => stats.regen_rate_mult += value,
        ArmorModifierKind::RegenRateBonus => stats.regen_rate_bonus += value,
        ArmorModifierKind::RegenCooldownMult => stats.regen_cooldown_mult += value,
        ArmorModifierKind::RegenCooldownBonus => stats.regen_cooldown_bonus += value,
    }
}

fn unfold_armor(stats: &mut ArmorStats, kind: ArmorModifierKind, value: f32) {
    match kind {
        ArmorModifierKind::ResistanceMult => stats.resistance_mult -= value,
        ArmorModifierKind::ResistanceBonus => stats.resistance_bonus -= value,
        ArmorModifierKind::MaxHealthMult => stats.max_health_mult -= value,
        ArmorModifierKind::MaxHealthBonus => stats.max_health_bonus -= value,
        ArmorModifierKind::RegenRateMult => stats.regen_rate_mult -= value,
        ArmorModifierKind::RegenRateBonus => stats.regen_rate_bonus -= value,
        ArmorModifierKind::RegenCooldownMult => stats.regen_cooldown_mult -= value,
        ArmorModifierKind::RegenCooldownBonus => stats.regen_cooldown_bonus -= value,
    }
}

/// Worn armor: stats plus the health-gate flag and the regen cooldown.
#[derive(Clone, Debug)]
pub struct Armor {
    stats: ArmorStats,
    health_gate: bool,
    last_damage_at: Option<Duration>,
}

impl Armor {
    /// Creates armor from the catalog entry, filled to maximum health.
    #[must_use]
    pub fn from_spec(spec: ArmorSpec) -> Self {
        Self {
            stats: ArmorStats::from_spec(spec),
            health_gate: spec.health_gate,
            last_damage_at: None,
        }
    }

    /// Read-only access to the underlying stats record.
    #[must_use]
    pub fn stats(&self) -> &ArmorStats {
        &self.stats
    }

    /// Mutable access to the underlying stats record.
    pub fn stats_mut(&mut self) -> &mut ArmorStats {
        &mut self.stats
    }

    /// Whether the armor caps leftover at zero residual armor health.
    #[must_use]
    pub const fn health_gate(&self) -> bool {
        self.health_gate
    }

    /// Offers incoming damage to the armor, returning the leftover that the
    /// wearer's own health must absorb.
    ///
    /// Absorption takes `resistance` (clamped to [0, 1]) of the damage.
    /// Armor with enough health soaks the whole absorbed portion.
    /// Health-gated armor drops to zero without forwarding the uncovered
    /// absorption; ungated armor forwards everything it cannot soak.
    pub fn take_damage(&mut self, damage: f32, now: Duration) -> f32 {
        if damage <= 0.0 {
            return 0.0;
        }
        self.last_damage_at = Some(now);
        if self.stats.health() <= 0.0 {
            return damage;
        }
        let resistance = self.stats.resistance().clamp(0.0, 1.0);
        let absorbed = damage * resistance;
        let mut leftover = damage - absorbed;
        let health = self.stats.health();
        if health >= absorbed {
            self.stats.health = health - absorbed;
        } else if self.health_gate {
            self.stats.health = 0.0;
        } else {
            leftover += absorbed - health;
            self.stats.health = 0.0;
        }
        leftover
    }

    /// Regenerates armor health once the cooldown has cleared.
    pub fn tick(&mut self, dt: Duration, now: Duration) {
        self.stats.tick(now);
        let cooled = match self.last_damage_at {
            Some(at) => now.saturating_sub(at) >= self.stats.regen_cooldown(),
            None => true,
        };
        if cooled {
            let restored = self.stats.health() + self.stats.regen_rate() * dt.as_secs_f32();
            self.stats.set_health(restored);
        }
    }

    /// Refills armor health to the effective maximum.
    pub fn refill(&mut self) {
        self.stats.set_health(self.stats.max_health());
    }
}
