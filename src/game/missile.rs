use rand::Rng;

use super::object::{EntityId, GameObject, IdAllocator, Playfield};
use super::ships::EnemyShip;
use super::{
    ENEMY_FIRE_ODDS, ENEMY_MISSILE_SPEED, MISSILE_DELAY_LIMIT, MISSILE_HEIGHT, MISSILE_WIDTH,
    NUKE_HEIGHT, NUKE_SPEED, NUKE_WIDTH, PLAYER_MISSILE_LIMIT, PLAYER_MISSILE_SPEED,
    POWERED_DELAY_LIMIT, POWERED_MISSILE_LIMIT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissileKind {
    Player,
    Enemy,
    Nuke,
}

#[derive(Clone, Debug)]
pub struct Missile {
    pub id: EntityId,
    pub kind: MissileKind,
    pub body: GameObject,
}

impl Missile {
    /// Player and nuke missiles climb; enemy missiles fall, drifting sideways
    /// when they were aimed.
    pub fn advance(&mut self) {
        match self.kind {
            MissileKind::Player | MissileKind::Nuke => self.body.move_up(),
            MissileKind::Enemy => {
                self.body.move_down();
                self.body.move_right();
            }
        }
    }

    pub fn is_hostile(&self) -> bool {
        self.kind == MissileKind::Enemy
    }
}

/// Rate limiting and construction for every missile in play.
pub struct MissileManager {
    player_missile_count: u32,
    missile_limit: u32,
    delay_limit: u32,
    delay_ticker: u32,
    nuke_unlocked: bool,
    nuke_fired: bool,
}

impl Default for MissileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MissileManager {
    pub fn new() -> Self {
        Self {
            player_missile_count: 0,
            missile_limit: PLAYER_MISSILE_LIMIT,
            delay_limit: MISSILE_DELAY_LIMIT,
            // The first shot of a round is never delayed.
            delay_ticker: MISSILE_DELAY_LIMIT,
            nuke_unlocked: false,
            nuke_fired: false,
        }
    }

    pub fn player_missile_count(&self) -> u32 {
        self.player_missile_count
    }

    pub fn missile_limit(&self) -> u32 {
        self.missile_limit
    }

    pub fn delay_limit(&self) -> u32 {
        self.delay_limit
    }

    pub fn is_powered_up(&self) -> bool {
        self.missile_limit == POWERED_MISSILE_LIMIT
    }

    /// Fires from the nose of the player when both the in-flight ceiling and
    /// the shot delay allow it.
    pub fn fire_missile(&mut self, ids: &mut IdAllocator, player: &GameObject) -> Option<Missile> {
        if self.player_missile_count >= self.missile_limit || self.delay_ticker < self.delay_limit {
            return None;
        }
        self.player_missile_count += 1;
        self.delay_ticker = 0;

        let mut body = GameObject::new(MISSILE_WIDTH, MISSILE_HEIGHT);
        body.set_speed(0.0, PLAYER_MISSILE_SPEED);
        body.place(
            player.center_x() - MISSILE_WIDTH / 2.0,
            player.y() - MISSILE_HEIGHT,
        );
        Some(Missile {
            id: ids.next_id(),
            kind: MissileKind::Player,
            body,
        })
    }

    pub fn update_delay_tick(&mut self) {
        self.delay_ticker = self.delay_ticker.saturating_add(1);
    }

    /// Called whenever a player missile leaves play, by impact or by exit.
    pub fn player_missile_removed(&mut self) {
        self.player_missile_count = self.player_missile_count.saturating_sub(1);
    }

    pub fn apply_power_up(&mut self) {
        self.missile_limit = POWERED_MISSILE_LIMIT;
        self.delay_limit = POWERED_DELAY_LIMIT;
    }

    /// Forgets missiles that were cleared in bulk, e.g. between levels.
    pub fn clear_in_flight(&mut self) {
        self.player_missile_count = 0;
    }

    /// One roll per tick; the formation fires on a zero.
    pub fn enemy_fire_roll<R: Rng>(rng: &mut R) -> bool {
        rng.gen_range(0..ENEMY_FIRE_ODDS) == 0
    }

    /// Uniform pick among firing-capable ships in a single pass.
    pub fn select_firing_enemy<'a, R: Rng>(
        ships: &'a [EnemyShip],
        rng: &mut R,
    ) -> Option<&'a EnemyShip> {
        let mut selected = None;
        let mut eligible = 0u32;
        for ship in ships.iter().filter(|s| s.can_fire()) {
            eligible += 1;
            if rng.gen_range(0..eligible) == 0 {
                selected = Some(ship);
            }
        }
        selected
    }

    /// Builds a missile under `ship`. Top-tier ships aim once at `target`;
    /// everything else drops straight down.
    pub fn create_enemy_missile(
        id: EntityId,
        ship: &EnemyShip,
        target: Option<(f32, f32)>,
    ) -> Missile {
        let mut body = GameObject::new(MISSILE_WIDTH, MISSILE_HEIGHT);
        body.place(
            ship.body.center_x() - MISSILE_WIDTH / 2.0,
            ship.body.bottom(),
        );

        let (vx, vy) = match target {
            Some((tx, ty)) if ship.tier.aims_at_player() => {
                let dx = tx - ship.body.center_x();
                let dy = ty - ship.body.bottom();
                let len = (dx * dx + dy * dy).sqrt();
                // A target level with or above the muzzle degenerates to straight down.
                if len > f32::EPSILON && dy > 0.0 {
                    (dx / len * ENEMY_MISSILE_SPEED, dy / len * ENEMY_MISSILE_SPEED)
                } else {
                    (0.0, ENEMY_MISSILE_SPEED)
                }
            }
            _ => (0.0, ENEMY_MISSILE_SPEED),
        };
        body.set_speed(vx, vy);

        Missile {
            id,
            kind: MissileKind::Enemy,
            body,
        }
    }

    pub fn fire_enemy_missile<R: Rng>(
        &mut self,
        ids: &mut IdAllocator,
        ships: &[EnemyShip],
        target: Option<(f32, f32)>,
        rng: &mut R,
    ) -> Option<Missile> {
        if !Self::enemy_fire_roll(rng) {
            return None;
        }
        let ship = Self::select_firing_enemy(ships, rng)?;
        Some(Self::create_enemy_missile(ids.next_id(), ship, target))
    }

    pub fn move_missiles(&self, missiles: &mut [Missile]) {
        for missile in missiles.iter_mut() {
            missile.advance();
        }
    }

    pub fn unlock_nuke(&mut self) {
        self.nuke_unlocked = true;
    }

    pub fn nuke_available(&self) -> bool {
        self.nuke_unlocked && !self.nuke_fired
    }

    /// Re-arms the once-per-round nuke for a new level.
    pub fn reset_round(&mut self) {
        self.nuke_fired = false;
    }

    pub fn fire_nuke(&mut self, ids: &mut IdAllocator, player: &GameObject) -> Option<Missile> {
        if !self.nuke_available() {
            return None;
        }
        self.nuke_fired = true;

        let mut body = GameObject::new(NUKE_WIDTH, NUKE_HEIGHT);
        body.set_speed(0.0, NUKE_SPEED);
        body.place(player.center_x() - NUKE_WIDTH / 2.0, player.y() - NUKE_HEIGHT);
        Some(Missile {
            id: ids.next_id(),
            kind: MissileKind::Nuke,
            body,
        })
    }

    pub fn reached_detonation_line(missile: &Missile, field: &Playfield) -> bool {
        missile.kind == MissileKind::Nuke && missile.body.y() <= field.midline()
    }
}
