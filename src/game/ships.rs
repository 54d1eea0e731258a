use super::object::{EntityId, GameObject, Playfield};
use super::{
    BONUS_HEIGHT, BONUS_WIDTH, BONUS_Y, ENEMY_BASE_SPEED, ENEMY_HEIGHT, ENEMY_WIDTH,
    PLAYER_HEIGHT, PLAYER_SPEED, PLAYER_WIDTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    One,   // bottom row, harmless
    Two,
    Three, // fires straight down
    Four,  // top row, aims at the player
    Bonus,
}

impl EnemyTier {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyTier::One,
            1 => EnemyTier::Two,
            2 => EnemyTier::Three,
            _ => EnemyTier::Four,
        }
    }

    /// Base score before the level multiplier. The bonus ship pays out in
    /// rewards instead of points.
    pub fn index(&self) -> u32 {
        match self {
            EnemyTier::One => 1,
            EnemyTier::Two => 2,
            EnemyTier::Three => 3,
            EnemyTier::Four => 4,
            EnemyTier::Bonus => 0,
        }
    }

    pub fn can_fire(&self) -> bool {
        matches!(self, EnemyTier::Three | EnemyTier::Four | EnemyTier::Bonus)
    }

    pub fn aims_at_player(&self) -> bool {
        matches!(self, EnemyTier::Four)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteFrame {
    Primary,
    Alternate,
}

impl SpriteFrame {
    pub fn toggled(self) -> Self {
        match self {
            SpriteFrame::Primary => SpriteFrame::Alternate,
            SpriteFrame::Alternate => SpriteFrame::Primary,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnemyShip {
    pub id: EntityId,
    pub tier: EnemyTier,
    pub row: usize,
    pub score_value: u32,
    pub frame: SpriteFrame,
    pub body: GameObject,
}

impl EnemyShip {
    pub fn is_bonus(&self) -> bool {
        self.tier == EnemyTier::Bonus
    }

    pub fn can_fire(&self) -> bool {
        self.tier.can_fire()
    }

    pub fn swap_frame(&mut self) {
        self.frame = self.frame.toggled();
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: GameObject,
    lives: u32,
}

impl Player {
    pub fn new(lives: u32) -> Self {
        let mut body = GameObject::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        body.set_speed(PLAYER_SPEED, 0.0);
        Self { body, lives }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn remove_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }
}

/// Builds enemy variants. Placement within the formation is the
/// [`EnemyManager`](super::EnemyManager)'s job.
pub struct ShipFactory;

impl ShipFactory {
    pub fn create_enemy_ship(id: EntityId, row: usize, level_multiplier: u32) -> EnemyShip {
        let tier = EnemyTier::for_row(row);
        let mut body = GameObject::new(ENEMY_WIDTH, ENEMY_HEIGHT);
        body.set_speed(ENEMY_BASE_SPEED * level_multiplier as f32, 0.0);
        EnemyShip {
            id,
            tier,
            row,
            score_value: tier.index() * level_multiplier,
            frame: SpriteFrame::Primary,
            body,
        }
    }

    /// The bonus ship starts parked at one edge with no speed of its own;
    /// its bounce state machine gives it motion once active.
    pub fn create_special_ship(id: EntityId, field: &Playfield, from_left: bool) -> EnemyShip {
        let mut body = GameObject::new(BONUS_WIDTH, BONUS_HEIGHT);
        let x = if from_left { 0.0 } else { field.width - BONUS_WIDTH };
        body.place(x, BONUS_Y);
        EnemyShip {
            id,
            tier: EnemyTier::Bonus,
            row: 0,
            score_value: 0,
            frame: SpriteFrame::Primary,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_map_to_tiers() {
        assert_eq!(EnemyTier::for_row(0), EnemyTier::One);
        assert_eq!(EnemyTier::for_row(1), EnemyTier::Two);
        assert_eq!(EnemyTier::for_row(2), EnemyTier::Three);
        assert_eq!(EnemyTier::for_row(3), EnemyTier::Four);
        assert_eq!(EnemyTier::for_row(7), EnemyTier::Four);
    }

    #[test]
    fn score_and_speed_scale_with_level() {
        let ship = ShipFactory::create_enemy_ship(EntityId(1), 2, 3);
        assert_eq!(ship.score_value, 9);
        assert_eq!(ship.body.speed_x(), ENEMY_BASE_SPEED * 3.0);
        assert!(ship.can_fire());

        let ship = ShipFactory::create_enemy_ship(EntityId(2), 1, 2);
        assert_eq!(ship.score_value, 4);
        assert!(!ship.can_fire());
    }

    #[test]
    fn special_ship_is_worthless_and_still() {
        let field = Playfield::new(800.0, 600.0);
        let left = ShipFactory::create_special_ship(EntityId(9), &field, true);
        assert!(left.is_bonus());
        assert!(left.can_fire());
        assert_eq!(left.score_value, 0);
        assert_eq!(left.body.speed_x(), 0.0);
        assert_eq!(left.body.x(), 0.0);

        let right = ShipFactory::create_special_ship(EntityId(10), &field, false);
        assert_eq!(right.body.right(), field.width);
    }

    #[test]
    fn frames_toggle() {
        let mut ship = ShipFactory::create_enemy_ship(EntityId(1), 0, 1);
        ship.swap_frame();
        assert_eq!(ship.frame, SpriteFrame::Alternate);
        ship.swap_frame();
        assert_eq!(ship.frame, SpriteFrame::Primary);
    }
}
