use galaga_tui::game::physics::{check_collisions, is_colliding, is_out_of_bounds, Target};
use galaga_tui::game::{
    Entity, EntityId, GameObject, Missile, MissileKind, Playfield, MISSILE_HEIGHT, MISSILE_WIDTH,
};

fn body(x: f32, y: f32, w: f32, h: f32) -> GameObject {
    let mut b = GameObject::new(w, h);
    b.place(x, y);
    b
}

fn missile(id: u32, kind: MissileKind, x: f32, y: f32) -> Missile {
    Missile {
        id: EntityId(id),
        kind,
        body: body(x, y, MISSILE_WIDTH, MISSILE_HEIGHT),
    }
}

#[test]
fn overlap_is_symmetric() {
    let a = body(0.0, 0.0, 40.0, 30.0);
    let b = body(39.0, 29.0, 10.0, 10.0);
    let c = body(40.0, 0.0, 10.0, 10.0);
    assert!(is_colliding(&a, &b));
    assert!(is_colliding(&b, &a));
    assert!(!is_colliding(&a, &c));
    assert!(!is_colliding(&c, &a));
}

#[test]
fn player_fire_hits_enemies_only() {
    let enemy = body(100.0, 100.0, 40.0, 30.0);
    let player = body(100.0, 500.0, 50.0, 30.0);
    let targets = [
        Target {
            entity: Entity::Enemy(EntityId(1)),
            body: &enemy,
        },
        Target {
            entity: Entity::Player,
            body: &player,
        },
    ];
    let missiles = [
        missile(10, MissileKind::Player, 110.0, 105.0),
        missile(11, MissileKind::Enemy, 110.0, 110.0),
        missile(12, MissileKind::Enemy, 110.0, 505.0),
    ];

    let hits = check_collisions(&targets, &missiles);
    assert_eq!(
        hits,
        vec![
            Entity::Enemy(EntityId(1)),
            Entity::Missile(EntityId(10)),
            Entity::Player,
            Entity::Missile(EntityId(12)),
        ]
    );
}

#[test]
fn nuke_never_collides() {
    let enemy = body(100.0, 100.0, 40.0, 30.0);
    let targets = [Target {
        entity: Entity::Enemy(EntityId(1)),
        body: &enemy,
    }];
    let missiles = [missile(2, MissileKind::Nuke, 110.0, 105.0)];
    assert!(check_collisions(&targets, &missiles).is_empty());
}

#[test]
fn exits_depend_on_direction() {
    let field = Playfield::new(800.0, 600.0);
    assert!(is_out_of_bounds(&missile(1, MissileKind::Player, 100.0, -20.0), &field));
    assert!(!is_out_of_bounds(&missile(2, MissileKind::Player, 100.0, 590.0), &field));
    assert!(is_out_of_bounds(&missile(3, MissileKind::Enemy, 100.0, 601.0), &field));
    assert!(!is_out_of_bounds(&missile(4, MissileKind::Enemy, 100.0, -20.0), &field));
    assert!(!is_out_of_bounds(&missile(5, MissileKind::Nuke, 100.0, -50.0), &field));
}
