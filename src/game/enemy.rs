use std::collections::BTreeMap;

use rand::Rng;

use super::object::{IdAllocator, Playfield};
use super::ships::{EnemyShip, ShipFactory};
use super::{
    BONUS_BOUNCES, BONUS_SPEED, ENEMIES_PER_ROW, ENEMY_BASE_SPEED, FORMATION_BOTTOM_Y, ROW_SPACING,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RowMotion {
    direction: Direction,
    speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusState {
    Idle,
    Active {
        direction: Direction,
        bounces_left: u32,
    },
    Expired,
}

/// Formation movement, the bonus ship's bounce cycle and sprite animation.
pub struct EnemyManager {
    field: Playfield,
    rows: BTreeMap<usize, RowMotion>,
    bonus: BonusState,
}

impl EnemyManager {
    pub fn new(field: Playfield) -> Self {
        Self {
            field,
            rows: BTreeMap::new(),
            bonus: BonusState::Idle,
        }
    }

    /// Row motion for a level. Level 1 moves as one block; from level 2 the
    /// odd rows run against the even rows; from level 3 the odd rows double
    /// their speed and turn around once more.
    fn row_motion(row: usize, level: u32) -> RowMotion {
        let odd = row % 2 == 1;
        let mut direction = Direction::Left;
        let mut speed = ENEMY_BASE_SPEED * level as f32;
        if level >= 2 && odd {
            direction = direction.flipped();
        }
        if level >= 3 && odd {
            direction = direction.flipped();
            speed *= 2.0;
        }
        RowMotion { direction, speed }
    }

    /// Builds and places the formation for `level`, which is also the level
    /// multiplier. Row 0 is the bottom row.
    pub fn create_and_place_enemy_ships(
        &mut self,
        level: u32,
        ids: &mut IdAllocator,
    ) -> Vec<EnemyShip> {
        self.rows.clear();
        let mut ships = Vec::new();

        for (row, &count) in ENEMIES_PER_ROW.iter().enumerate() {
            let motion = Self::row_motion(row, level);
            self.rows.insert(row, motion);

            let spacing = self.field.width / (count as f32 + 1.0);
            let y = FORMATION_BOTTOM_Y - row as f32 * ROW_SPACING;
            for i in 0..count {
                let mut ship = ShipFactory::create_enemy_ship(ids.next_id(), row, level);
                ship.body.set_speed(motion.speed, 0.0);
                let x = (i as f32 + 1.0) * spacing - ship.body.width() / 2.0;
                ship.body.place(x, y);
                ships.push(ship);
            }
        }
        ships
    }

    pub fn row_direction(&self, row: usize) -> Option<Direction> {
        self.rows.get(&row).map(|m| m.direction)
    }

    pub fn row_speed(&self, row: usize) -> Option<f32> {
        self.rows.get(&row).map(|m| m.speed)
    }

    fn would_cross_edge(&self, ship: &EnemyShip, direction: Direction) -> bool {
        let next_x = ship.body.x() + direction.sign() * ship.body.speed_x();
        next_x < 0.0 || next_x + ship.body.width() > self.field.width
    }

    /// Advances every formation ship one step along its row. If any ship
    /// would leave the playfield, every row turns around before the step.
    /// Returns whether the formation turned.
    pub fn move_enemy_ships(&mut self, ships: &mut [EnemyShip]) -> bool {
        let turn = ships.iter().filter(|s| !s.is_bonus()).any(|ship| {
            self.rows
                .get(&ship.row)
                .is_some_and(|m| self.would_cross_edge(ship, m.direction))
        });
        if turn {
            for motion in self.rows.values_mut() {
                motion.direction = motion.direction.flipped();
            }
        }

        for ship in ships.iter_mut().filter(|s| !s.is_bonus()) {
            let Some(motion) = self.rows.get(&ship.row).copied() else { continue };
            // Rows running against each other can pin a ship at an edge for
            // a tick; it holds position rather than leave the field.
            if self.would_cross_edge(ship, motion.direction) {
                continue;
            }
            match motion.direction {
                Direction::Left => ship.body.move_left(),
                Direction::Right => ship.body.move_right(),
            }
        }
        turn
    }

    pub fn bonus_state(&self) -> BonusState {
        self.bonus
    }

    /// Creates the bonus ship at a random edge, heading into the field.
    pub fn create_special_ship<R: Rng>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> EnemyShip {
        let from_left = rng.gen_bool(0.5);
        let mut ship = ShipFactory::create_special_ship(ids.next_id(), &self.field, from_left);
        ship.body.set_speed(BONUS_SPEED, 0.0);
        let direction = if from_left { Direction::Right } else { Direction::Left };
        self.bonus = BonusState::Active {
            direction,
            bounces_left: BONUS_BOUNCES,
        };
        ship
    }

    /// Moves the bonus ship, if one is flying, bouncing it off either edge.
    pub fn move_bonus_ship(&mut self, ships: &mut [EnemyShip]) {
        let BonusState::Active { direction, bounces_left } = self.bonus else { return };
        let Some(ship) = ships.iter_mut().find(|s| s.is_bonus()) else { return };

        match direction {
            Direction::Left => ship.body.move_left(),
            Direction::Right => ship.body.move_right(),
        }

        let max_x = self.field.width - ship.body.width();
        let touched = if ship.body.x() <= 0.0 {
            let y = ship.body.y();
            ship.body.place(0.0, y);
            true
        } else if ship.body.x() >= max_x {
            let y = ship.body.y();
            ship.body.place(max_x, y);
            true
        } else {
            false
        };

        if touched {
            let bounces_left = bounces_left.saturating_sub(1);
            self.bonus = if bounces_left == 0 {
                BonusState::Expired
            } else {
                BonusState::Active {
                    direction: direction.flipped(),
                    bounces_left,
                }
            };
        }
    }

    /// True once the bonus ship has used up its bounces. The caller removes
    /// the ship and then calls [`reset_bonus`](Self::reset_bonus).
    pub fn check_bounce_counter(&self) -> bool {
        self.bonus == BonusState::Expired
    }

    pub fn reset_bonus(&mut self) {
        self.bonus = BonusState::Idle;
    }

    pub fn swap_sprites_animation(&self, ships: &mut [EnemyShip]) {
        for ship in ships.iter_mut().filter(|s| !s.is_bonus()) {
            ship.swap_frame();
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game::ships::SpriteFrame;
    use crate::game::{FIELD_HEIGHT, FIELD_WIDTH};

    fn setup(level: u32) -> (EnemyManager, Vec<EnemyShip>) {
        let mut em = EnemyManager::new(Playfield::new(FIELD_WIDTH, FIELD_HEIGHT));
        let mut ids = IdAllocator::default();
        let ships = em.create_and_place_enemy_ships(level, &mut ids);
        (em, ships)
    }

    #[test]
    fn formation_has_expected_shape() {
        let (_, ships) = setup(1);
        assert_eq!(ships.len(), ENEMIES_PER_ROW.iter().sum::<usize>());
        for ship in &ships {
            assert!(ship.body.x() >= 0.0 && ship.body.right() <= FIELD_WIDTH);
        }
        let top = ships.iter().filter(|s| s.row == 3).count();
        assert_eq!(top, 5);
    }

    #[test]
    fn level_tiers_set_row_motion() {
        let (em, _) = setup(1);
        for row in 0..4 {
            assert_eq!(em.row_direction(row), Some(Direction::Left));
            assert_eq!(em.row_speed(row), Some(ENEMY_BASE_SPEED));
        }

        let (em, _) = setup(2);
        assert_eq!(em.row_direction(0), Some(Direction::Left));
        assert_eq!(em.row_direction(1), Some(Direction::Right));
        assert_eq!(em.row_direction(2), Some(Direction::Left));
        assert_eq!(em.row_direction(3), Some(Direction::Right));

        let (em, _) = setup(3);
        assert_eq!(em.row_direction(1), Some(Direction::Left));
        assert_eq!(em.row_speed(0), Some(ENEMY_BASE_SPEED * 3.0));
        assert_eq!(em.row_speed(1), Some(ENEMY_BASE_SPEED * 6.0));
    }

    #[test]
    fn one_ship_at_edge_turns_every_row() {
        let (mut em, mut ships) = setup(2);
        let before: Vec<_> = (0..4).map(|r| em.row_direction(r).unwrap()).collect();

        // Push a single row-0 ship against the left wall.
        let idx = ships.iter().position(|s| s.row == 0).unwrap();
        let y = ships[idx].body.y();
        ships[idx].body.place(1.0, y);

        assert!(em.move_enemy_ships(&mut ships));
        for (row, dir) in before.iter().enumerate() {
            assert_eq!(em.row_direction(row), Some(dir.flipped()));
        }
    }

    #[test]
    fn formation_stays_in_bounds() {
        let (mut em, mut ships) = setup(3);
        for _ in 0..2_000 {
            em.move_enemy_ships(&mut ships);
            for ship in &ships {
                assert!(ship.body.x() >= 0.0, "ship left the field: {}", ship.body.x());
                assert!(ship.body.right() <= FIELD_WIDTH);
            }
        }
    }

    #[test]
    fn bonus_ship_expires_after_bounces() {
        let (mut em, mut ships) = setup(1);
        let mut ids = IdAllocator::default();
        let mut rng = StdRng::seed_from_u64(7);
        ships.push(em.create_special_ship(&mut ids, &mut rng));
        assert!(matches!(
            em.bonus_state(),
            BonusState::Active { bounces_left: BONUS_BOUNCES, .. }
        ));

        let mut ticks = 0;
        while !em.check_bounce_counter() {
            em.move_bonus_ship(&mut ships);
            ticks += 1;
            assert!(ticks < 10_000, "bonus ship never expired");
        }
        let bonus = ships.iter().find(|s| s.is_bonus()).unwrap();
        assert!(bonus.body.x() >= 0.0 && bonus.body.right() <= FIELD_WIDTH);

        em.reset_bonus();
        assert_eq!(em.bonus_state(), BonusState::Idle);
    }

    #[test]
    fn missing_bonus_ship_is_skipped() {
        let (mut em, mut ships) = setup(1);
        let mut ids = IdAllocator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let _gone = em.create_special_ship(&mut ids, &mut rng);
        let before: Vec<f32> = ships.iter().map(|s| s.body.x()).collect();
        em.move_bonus_ship(&mut ships);
        let after: Vec<f32> = ships.iter().map(|s| s.body.x()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn animation_skips_bonus_ship() {
        let (mut em, mut ships) = setup(1);
        let mut ids = IdAllocator::default();
        let mut rng = StdRng::seed_from_u64(3);
        ships.push(em.create_special_ship(&mut ids, &mut rng));

        em.swap_sprites_animation(&mut ships);
        for ship in &ships {
            let expected = if ship.is_bonus() {
                SpriteFrame::Primary
            } else {
                SpriteFrame::Alternate
            };
            assert_eq!(ship.frame, expected);
        }
    }
}
