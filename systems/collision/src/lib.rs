#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns projectile overlaps into strike commands.
//!
//! Each pass walks every active projectile against the pools its faction is
//! hostile to. A rectangle overlap acts as the cheap pre-filter; kinds marked
//! precise then confirm the contact against cached pixel masks. The resolver
//! never mutates state itself: every confirmed contact becomes a
//! [`Command::Strike`] for the world to execute.

use stormz_core::{
    Bounds, Command, EnemyView, EntityKind, Faction, PixelMask, PlayerSnapshot, ProjectileKind,
    ProjectileSnapshot, ProjectileView, WorldPoint, KIND_COUNT,
};

/// Collision resolver that queues strike commands for overlapping hostiles.
#[derive(Debug)]
pub struct CollisionResolver {
    masks: [Option<PixelMask>; KIND_COUNT],
    scratch: Vec<Command>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    /// Creates a resolver with the per-kind silhouette masks precomputed.
    #[must_use]
    pub fn new() -> Self {
        let mut masks: [Option<PixelMask>; KIND_COUNT] = Default::default();
        for kind in EntityKind::ALL {
            if kind.precise() {
                let (width, _) = kind.extent();
                masks[kind.slot()] = Some(PixelMask::disc(width as u32));
            }
        }
        Self {
            masks,
            scratch: Vec::new(),
        }
    }

    /// Emits `Command::Strike` entries for every confirmed hostile contact.
    ///
    /// A standard projectile yields at most one strike per pass; a piercing
    /// projectile yields one strike per overlapping target it has not already
    /// damaged.
    pub fn handle(
        &mut self,
        projectiles: ProjectileView,
        enemies: EnemyView,
        player: Option<PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        if projectiles.is_empty() {
            return;
        }

        self.scratch.clear();

        for shot in projectiles.iter() {
            let single_hit = shot.kind == ProjectileKind::Standard;
            let mut struck = false;

            if shot.faction.is_hostile_to(Faction::Enemy) {
                for enemy in enemies.iter() {
                    if single_hit && struck {
                        break;
                    }
                    if shot.already_hit(enemy.id) {
                        continue;
                    }
                    let enemy_kind = EntityKind::Enemy(enemy.kind);
                    if self.contact(shot, enemy_kind, enemy.position) {
                        self.scratch.push(Command::Strike {
                            projectile: shot.id,
                            target: enemy.id,
                        });
                        struck = true;
                    }
                }
            }

            if single_hit && struck {
                continue;
            }
            if let Some(player) = player {
                if shot.faction.is_hostile_to(Faction::Friendly)
                    && !shot.already_hit(player.id)
                    && self.contact(shot, EntityKind::Player, player.position)
                {
                    self.scratch.push(Command::Strike {
                        projectile: shot.id,
                        target: player.id,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Rectangle pre-filter followed by a mask check when both silhouettes
    /// are marked precise.
    fn contact(
        &self,
        shot: &ProjectileSnapshot,
        target_kind: EntityKind,
        target_position: WorldPoint,
    ) -> bool {
        let shot_kind = EntityKind::Projectile(shot.kind);
        let shot_bounds = bounds_of(shot_kind, shot.position);
        let target_bounds = bounds_of(target_kind, target_position);
        if !shot_bounds.overlaps(&target_bounds) {
            return false;
        }
        match (
            &self.masks[shot_kind.slot()],
            &self.masks[target_kind.slot()],
        ) {
            (Some(shot_mask), Some(target_mask)) => {
                shot_mask.overlaps(&shot_bounds, target_mask, &target_bounds)
            }
            _ => true,
        }
    }
}

fn bounds_of(kind: EntityKind, position: WorldPoint) -> Bounds {
    let (width, height) = kind.extent();
    Bounds::centered(position, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormz_core::{EnemyKind, EnemySnapshot, EntityId};

    fn enemy(id: u32, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EntityId::new(id),
            kind: EnemyKind::Basic,
            position: WorldPoint::new(x, y),
            health: 3.0,
        }
    }

    fn shot(
        id: u32,
        kind: ProjectileKind,
        faction: Faction,
        x: f32,
        y: f32,
        hit_memory: Vec<EntityId>,
    ) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: EntityId::new(id),
            kind,
            faction,
            position: WorldPoint::new(x, y),
            damage: 1.0,
            durability: 3,
            hit_memory,
        }
    }

    fn player_at(id: u32, x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            id: EntityId::new(id),
            position: WorldPoint::new(x, y),
            health: 5.0,
            max_health: 5.0,
            armor_health: 0.0,
        }
    }

    #[test]
    fn friendly_projectile_strikes_an_overlapping_enemy() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Standard,
                Faction::Friendly,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 102.0, 100.0)]),
            None,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::Strike {
                projectile: EntityId::new(10),
                target: EntityId::new(3),
            }]
        );
    }

    #[test]
    fn separated_entities_produce_no_strikes() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Standard,
                Faction::Friendly,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 400.0, 400.0)]),
            None,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn faction_table_blocks_friendly_fire() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        let player = player_at(0, 100.0, 100.0);
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Standard,
                Faction::Friendly,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::default(),
            Some(player),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn enemy_projectile_strikes_only_the_player() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        let player = player_at(0, 100.0, 100.0);
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Standard,
                Faction::Enemy,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 100.0, 100.0)]),
            Some(player),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::Strike {
                projectile: EntityId::new(10),
                target: EntityId::new(0),
            }]
        );
    }

    #[test]
    fn standard_projectile_emits_at_most_one_strike_per_pass() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Standard,
                Faction::Friendly,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 100.0, 100.0), enemy(4, 104.0, 100.0)]),
            None,
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn piercing_projectile_strikes_every_new_overlapping_target() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Piercing,
                Faction::Friendly,
                100.0,
                100.0,
                vec![EntityId::new(3)],
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 100.0, 100.0), enemy(4, 104.0, 100.0)]),
            None,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::Strike {
                projectile: EntityId::new(10),
                target: EntityId::new(4),
            }]
        );
    }

    #[test]
    fn mask_test_rejects_corner_only_rectangle_overlap() {
        // Two 50-unit discs whose rectangles overlap at the corner but whose
        // silhouettes stay 67 units apart centre to centre.
        let mut resolver = CollisionResolver::new();
        let player = player_at(0, 148.0, 148.0);
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![ProjectileSnapshot {
                id: EntityId::new(10),
                kind: ProjectileKind::Standard,
                faction: Faction::Enemy,
                position: WorldPoint::new(120.0, 120.0),
                damage: 1.0,
                durability: 1,
                hit_memory: Vec::new(),
            }]),
            EnemyView::default(),
            Some(player),
            &mut out,
        );
        // Rect filter passes (8x8 shot against the 50x50 player box), but the
        // shot's disc sits outside the player's disc.
        assert!(out.is_empty());
    }

    #[test]
    fn neutral_projectile_is_hostile_to_both_sides() {
        let mut resolver = CollisionResolver::new();
        let player = player_at(0, 300.0, 300.0);
        let mut out = Vec::new();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                10,
                ProjectileKind::Piercing,
                Faction::Neutral,
                100.0,
                100.0,
                Vec::new(),
            )]),
            EnemyView::from_snapshots(vec![enemy(3, 100.0, 100.0)]),
            Some(player),
            &mut out,
        );
        assert_eq!(out.len(), 1, "only the enemy overlaps here");
        out.clear();
        resolver.handle(
            ProjectileView::from_snapshots(vec![shot(
                11,
                ProjectileKind::Piercing,
                Faction::Neutral,
                300.0,
                300.0,
                Vec::new(),
            )]),
            EnemyView::default(),
            Some(player),
            &mut out,
        );
        assert_eq!(out.len(), 1, "the player is struck as well");
    }
}
