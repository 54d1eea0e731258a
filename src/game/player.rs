use super::object::Playfield;
use super::ships::Player;
use super::{BOUNDARY_MARGIN, PLAYER_OFFSET_FROM_BOTTOM};

/// Outcome of losing a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerFate {
    Respawned,
    Exhausted,
}

/// Owns the single live player instance and its life count.
pub struct PlayerManager {
    field: Playfield,
    player: Option<Player>,
    lives: u32,
}

impl PlayerManager {
    pub fn new(field: Playfield, lives: u32) -> Self {
        Self {
            field,
            player: None,
            lives,
        }
    }

    pub fn create_and_place_player(&mut self) {
        let mut player = Player::new(self.lives);
        let x = self.field.width / 2.0 - player.body.width() / 2.0;
        let y = self.field.height - player.body.height() - PLAYER_OFFSET_FROM_BOTTOM;
        player.body.place(x, y);
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn lives(&self) -> u32 {
        self.player.as_ref().map_or(self.lives, Player::lives)
    }

    fn min_x(&self) -> f32 {
        BOUNDARY_MARGIN
    }

    fn max_x(&self, player: &Player) -> f32 {
        self.field.width - player.body.width() - BOUNDARY_MARGIN
    }

    /// Steps left, or snaps onto the margin if a full step would overshoot.
    pub fn move_player_left(&mut self) {
        let min_x = self.min_x();
        let Some(player) = self.player.as_mut() else { return };
        if player.body.x() - player.body.speed_x() < min_x {
            let y = player.body.y();
            player.body.place(min_x, y);
        } else {
            player.body.move_left();
        }
    }

    pub fn move_player_right(&mut self) {
        let Some(max_x) = self.player.as_ref().map(|p| self.max_x(p)) else { return };
        let Some(player) = self.player.as_mut() else { return };
        if player.body.x() + player.body.speed_x() > max_x {
            let y = player.body.y();
            player.body.place(max_x, y);
        } else {
            player.body.move_right();
        }
    }

    /// Takes a life from the destroyed player and respawns a fresh ship at
    /// the start position while lives remain.
    pub fn check_player_lives(&mut self) -> PlayerFate {
        if let Some(mut destroyed) = self.player.take() {
            destroyed.remove_life();
            self.lives = destroyed.lives();
        }
        if self.lives > 0 {
            self.create_and_place_player();
            PlayerFate::Respawned
        } else {
            PlayerFate::Exhausted
        }
    }

    pub fn add_player_life(&mut self) {
        self.lives += 1;
        if let Some(player) = self.player.as_mut() {
            player.add_life();
        }
    }
}
