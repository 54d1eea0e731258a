//! Axis-aligned collision and playfield-exit tests. Stateless.

use super::missile::{Missile, MissileKind};
use super::object::{EntityId, GameObject, Playfield};

/// Anything physics can hand back for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Player,
    Enemy(EntityId),
    Missile(EntityId),
}

/// A ship as seen by the collision pass.
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    pub entity: Entity,
    pub body: &'a GameObject,
}

impl Target<'_> {
    fn is_enemy(&self) -> bool {
        matches!(self.entity, Entity::Enemy(_))
    }
}

pub fn is_colliding(a: &GameObject, b: &GameObject) -> bool {
    a.x() < b.right() && a.right() > b.x() && a.y() < b.bottom() && a.bottom() > b.y()
}

/// Every ship and missile involved in a hit this tick, each listed once.
///
/// A missile takes out at most the first ship it overlaps. Enemy ships
/// ignore enemy fire, and the nuke never collides; it detonates on its own.
pub fn check_collisions(ships: &[Target<'_>], missiles: &[Missile]) -> Vec<Entity> {
    let mut hits = Vec::new();
    for missile in missiles.iter().filter(|m| m.kind != MissileKind::Nuke) {
        let struck = ships
            .iter()
            .filter(|ship| !(ship.is_enemy() && missile.is_hostile()))
            .find(|ship| is_colliding(ship.body, &missile.body));

        if let Some(ship) = struck {
            push_unique(&mut hits, ship.entity);
            push_unique(&mut hits, Entity::Missile(missile.id));
        }
    }
    hits
}

fn push_unique(hits: &mut Vec<Entity>, entity: Entity) {
    if !hits.contains(&entity) {
        hits.push(entity);
    }
}

/// Player fire leaving through the top, enemy fire through the bottom, and
/// any missile drifting out past either side.
pub fn is_out_of_bounds(missile: &Missile, field: &Playfield) -> bool {
    let body = &missile.body;
    let sideways = body.right() < 0.0 || body.x() > field.width;
    match missile.kind {
        MissileKind::Player => body.y() < 0.0 || sideways,
        MissileKind::Enemy => body.y() > field.height || sideways,
        MissileKind::Nuke => false,
    }
}
