//! Resolver passes over mixed pools, checked through the public API only.

use stormz_core::{
    Command, EnemyKind, EnemySnapshot, EnemyView, EntityId, Faction, PlayerSnapshot,
    ProjectileKind, ProjectileSnapshot, ProjectileView, WorldPoint,
};
use stormz_system_collision::CollisionResolver;

fn enemy(id: u32, x: f32) -> EnemySnapshot {
    EnemySnapshot {
        id: EntityId::new(id),
        kind: EnemyKind::Basic,
        position: WorldPoint::new(x, 100.0),
        health: 3.0,
    }
}

fn shot(id: u32, kind: ProjectileKind, faction: Faction, x: f32) -> ProjectileSnapshot {
    ProjectileSnapshot {
        id: EntityId::new(id),
        kind,
        faction,
        position: WorldPoint::new(x, 100.0),
        damage: 1.0,
        durability: 3,
        hit_memory: Vec::new(),
    }
}

#[test]
fn a_crossfire_pass_resolves_both_directions_at_once() {
    let mut resolver = CollisionResolver::new();
    let player = PlayerSnapshot {
        id: EntityId::new(0),
        position: WorldPoint::new(500.0, 100.0),
        health: 5.0,
        max_health: 5.0,
        armor_health: 0.0,
    };
    let mut out = Vec::new();

    // A friendly bolt sits on an enemy while an enemy bolt sits on the
    // player; one pass emits one strike for each pairing and nothing for the
    // distant straggler.
    resolver.handle(
        ProjectileView::from_snapshots(vec![
            shot(10, ProjectileKind::Standard, Faction::Friendly, 100.0),
            shot(11, ProjectileKind::Standard, Faction::Enemy, 500.0),
        ]),
        EnemyView::from_snapshots(vec![enemy(3, 100.0), enemy(4, 800.0)]),
        Some(player),
        &mut out,
    );

    assert_eq!(
        out,
        vec![
            Command::Strike {
                projectile: EntityId::new(10),
                target: EntityId::new(3),
            },
            Command::Strike {
                projectile: EntityId::new(11),
                target: EntityId::new(0),
            },
        ]
    );
}

#[test]
fn repeated_passes_stay_deterministic_for_identical_views() {
    let mut resolver = CollisionResolver::new();
    let snapshots = || {
        ProjectileView::from_snapshots(vec![shot(
            10,
            ProjectileKind::Piercing,
            Faction::Friendly,
            100.0,
        )])
    };
    let enemies = || EnemyView::from_snapshots(vec![enemy(3, 100.0), enemy(4, 120.0)]);

    let mut first = Vec::new();
    resolver.handle(snapshots(), enemies(), None, &mut first);
    let mut second = Vec::new();
    resolver.handle(snapshots(), enemies(), None, &mut second);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2, "a piercing bolt strikes both fresh targets");
}
