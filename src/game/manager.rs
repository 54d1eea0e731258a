use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::error::SetupError;

use super::effects::{Deferred, Explosion, NukeBlast, Scheduler};
use super::enemy::EnemyManager;
use super::missile::{Missile, MissileKind, MissileManager};
use super::object::{EntityId, IdAllocator, Playfield};
use super::physics::{self, Entity, Target};
use super::player::{PlayerFate, PlayerManager};
use super::ships::{EnemyShip, Player};
use super::{
    BONUS_SPAWN_ODDS, EXPLOSION_FRAMES, EXPLOSION_FRAME_TICKS, FIELD_HEIGHT, FIELD_WIDTH,
    LEVEL_BANNER_TICKS, LEVEL_CAP, NUKE_DETONATION_DELAY, NUKE_WIDTH, STARTING_LIVES,
};


/// Movement intent, sampled once at the top of each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub moving_left: bool,
    pub moving_right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    PlayerFire,
    EnemyFire,
    PlayerDestroyed,
    EnemyDestroyed,
    BonusSpawn,
    PowerUp,
    NukeExplosion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    LevelUp(u32),
    YouWin,
    YouLose,
}

/// Everything the host needs to hear about besides entity positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    ScoreChanged(u32),
    LivesChanged(u32),
    Banner(Banner),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    InRound,
    LevelTransition { ticks_left: u32 },
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameSettings {
    pub field: Playfield,
    pub level_cap: u32,
    pub starting_lives: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            field: Playfield::new(FIELD_WIDTH, FIELD_HEIGHT),
            level_cap: LEVEL_CAP,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SetupError> {
        let Playfield { width, height } = self.field;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SetupError::InvalidPlayfield { width, height });
        }
        Ok(())
    }
}

/// Runs one round: owns every entity and applies the consequences of
/// every collision, exit and timer.
pub struct GameManager<R: Rng = StdRng> {
    settings: GameSettings,
    rng: R,
    ids: IdAllocator,

    player_manager: PlayerManager,
    enemy_manager: EnemyManager,
    missile_manager: MissileManager,

    enemy_ships: Vec<EnemyShip>,
    missiles: Vec<Missile>,
    explosions: Vec<Explosion>,
    nuke_blast: Option<NukeBlast>,
    scheduler: Scheduler,
    next_explosion: u32,

    score: u32,
    level: u32,
    state: RoundState,
    bonus_spawned: bool,
    tick_count: u64,
    events: Vec<GameEvent>,
}

impl GameManager<StdRng> {
    pub fn new(settings: GameSettings, seed: Option<u64>) -> Result<Self, SetupError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }
}

impl<R: Rng> GameManager<R> {
    pub fn with_rng(settings: GameSettings, rng: R) -> Result<Self, SetupError> {
        settings.validate()?;
        let mut game = Self {
            settings,
            rng,
            ids: IdAllocator::default(),
            player_manager: PlayerManager::new(settings.field, settings.starting_lives),
            enemy_manager: EnemyManager::new(settings.field),
            missile_manager: MissileManager::new(),
            enemy_ships: Vec::new(),
            missiles: Vec::new(),
            explosions: Vec::new(),
            nuke_blast: None,
            scheduler: Scheduler::default(),
            next_explosion: 0,
            score: 0,
            level: 1,
            state: RoundState::InRound,
            bonus_spawned: false,
            tick_count: 0,
            events: Vec::new(),
        };
        game.initialize_game();
        Ok(game)
    }

    /// Throws the current round away and starts over at level 1 with the
    /// same settings. The RNG stream carries on.
    pub fn restart(&mut self) {
        let settings = self.settings;
        self.ids = IdAllocator::default();
        self.player_manager = PlayerManager::new(settings.field, settings.starting_lives);
        self.enemy_manager = EnemyManager::new(settings.field);
        self.missile_manager = MissileManager::new();
        self.missiles.clear();
        self.explosions.clear();
        self.nuke_blast = None;
        self.scheduler = Scheduler::default();
        self.score = 0;
        self.level = 1;
        self.state = RoundState::InRound;
        self.events.clear();
        self.initialize_game();
    }

    fn initialize_game(&mut self) {
        self.player_manager.create_and_place_player();
        self.initialize_level();
        info!(level = self.level, "round started");
    }

    fn initialize_level(&mut self) {
        self.enemy_ships = self
            .enemy_manager
            .create_and_place_enemy_ships(self.level, &mut self.ids);
        self.bonus_spawned = false;
        self.missile_manager.reset_round();
        self.events.push(GameEvent::LivesChanged(self.player_manager.lives()));
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn field(&self) -> Playfield {
        self.settings.field
    }

    pub fn player(&self) -> Option<&Player> {
        self.player_manager.player()
    }

    pub fn enemy_ships(&self) -> &[EnemyShip] {
        &self.enemy_ships
    }

    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn nuke_blast(&self) -> Option<&NukeBlast> {
        self.nuke_blast.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.player_manager.lives()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_round_over(&self) -> bool {
        matches!(self.state, RoundState::Won | RoundState::Lost)
    }

    pub fn is_powered_up(&self) -> bool {
        self.missile_manager.is_powered_up()
    }

    pub fn nuke_available(&self) -> bool {
        self.level >= self.settings.level_cap && self.missile_manager.nuke_available()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ───────────────────────────────────────────────────────

    pub fn fire_missile(&mut self) {
        if self.state != RoundState::InRound {
            return;
        }
        let Some(player) = self.player_manager.player() else { return };
        if let Some(missile) = self.missile_manager.fire_missile(&mut self.ids, &player.body) {
            self.missiles.push(missile);
            self.sound(SoundCue::PlayerFire);
        }
    }

    pub fn fire_nuke(&mut self) {
        if self.state != RoundState::InRound || self.level < self.settings.level_cap {
            return;
        }
        let Some(player) = self.player_manager.player() else { return };
        if let Some(nuke) = self.missile_manager.fire_nuke(&mut self.ids, &player.body) {
            debug!("nuke launched");
            self.missiles.push(nuke);
            self.sound(SoundCue::PlayerFire);
        }
    }

    // ── Tick ───────────────────────────────────────────────────────────

    pub fn tick(&mut self, input: Input) {
        self.tick_count += 1;
        self.run_continuations();
        self.expand_nuke_blast();

        match self.state {
            RoundState::InRound => {}
            RoundState::LevelTransition { ticks_left } => {
                self.state = if ticks_left <= 1 {
                    RoundState::InRound
                } else {
                    RoundState::LevelTransition {
                        ticks_left: ticks_left - 1,
                    }
                };
                return;
            }
            RoundState::Won | RoundState::Lost => return,
        }

        if input.moving_left {
            self.player_manager.move_player_left();
        }
        if input.moving_right {
            self.player_manager.move_player_right();
        }

        self.enemy_manager.move_enemy_ships(&mut self.enemy_ships);
        self.enemy_manager.move_bonus_ship(&mut self.enemy_ships);
        self.maybe_spawn_bonus_ship();
        self.enemy_fire_missiles();
        self.missile_manager.move_missiles(&mut self.missiles);
        self.missile_manager.update_delay_tick();
        self.enemy_manager.swap_sprites_animation(&mut self.enemy_ships);

        self.check_nuke_detonation();
        self.check_for_missile_out_of_bounds();
        self.check_for_collisions();
        self.check_bonus_expiry();
        self.check_for_end_game();
    }

    fn maybe_spawn_bonus_ship(&mut self) {
        if self.bonus_spawned || self.enemy_ships.iter().any(EnemyShip::is_bonus) {
            return;
        }
        if self.rng.gen_range(0..BONUS_SPAWN_ODDS) != 0 {
            return;
        }
        let ship = self
            .enemy_manager
            .create_special_ship(&mut self.ids, &mut self.rng);
        debug!(level = self.level, x = ship.body.x(), "bonus ship spawned");
        self.enemy_ships.push(ship);
        self.bonus_spawned = true;
        self.sound(SoundCue::BonusSpawn);
    }

    fn enemy_fire_missiles(&mut self) {
        let target = self
            .player_manager
            .player()
            .map(|p| (p.body.center_x(), p.body.center_y()));
        let fired = self.missile_manager.fire_enemy_missile(
            &mut self.ids,
            &self.enemy_ships,
            target,
            &mut self.rng,
        );
        if let Some(missile) = fired {
            self.missiles.push(missile);
            self.sound(SoundCue::EnemyFire);
        }
    }

    fn check_nuke_detonation(&mut self) {
        let field = self.settings.field;
        let Some(idx) = self
            .missiles
            .iter()
            .position(|m| MissileManager::reached_detonation_line(m, &field))
        else {
            return;
        };
        let nuke = self.missiles.remove(idx);
        self.nuke_blast = Some(NukeBlast {
            x: nuke.body.center_x(),
            y: field.midline(),
            radius: NUKE_WIDTH,
        });
        self.scheduler
            .schedule(self.tick_count, NUKE_DETONATION_DELAY, Deferred::NukeDetonate);
        self.sound(SoundCue::NukeExplosion);
        debug!(x = nuke.body.center_x(), "nuke reached detonation line");
    }

    fn expand_nuke_blast(&mut self) {
        let max_radius = self.settings.field.width / 2.0;
        if let Some(blast) = self.nuke_blast.as_mut() {
            blast.radius = (blast.radius + 8.0).min(max_radius);
        }
    }

    fn check_for_missile_out_of_bounds(&mut self) {
        let field = self.settings.field;
        let exits: Vec<Entity> = self
            .missiles
            .iter()
            .filter(|m| physics::is_out_of_bounds(m, &field))
            .map(|m| Entity::Missile(m.id))
            .collect();
        self.remove_objects(&exits);
    }

    fn check_for_collisions(&mut self) {
        let hits = {
            let mut targets = Vec::with_capacity(self.enemy_ships.len() + 1);
            if let Some(player) = self.player_manager.player() {
                targets.push(Target {
                    entity: Entity::Player,
                    body: &player.body,
                });
            }
            targets.extend(self.enemy_ships.iter().map(|ship| Target {
                entity: Entity::Enemy(ship.id),
                body: &ship.body,
            }));
            physics::check_collisions(&targets, &self.missiles)
        };
        self.remove_objects(&hits);
    }

    fn check_bonus_expiry(&mut self) {
        if !self.enemy_manager.check_bounce_counter() {
            return;
        }
        self.enemy_ships.retain(|s| !s.is_bonus());
        self.enemy_manager.reset_bonus();
        debug!("bonus ship ran out of bounces");
    }

    fn check_for_end_game(&mut self) {
        if self.player_manager.player().is_none() {
            self.state = RoundState::Lost;
            self.events.push(GameEvent::Banner(Banner::YouLose));
            info!(score = self.score, level = self.level, "round lost");
            return;
        }

        if self.enemy_ships.iter().any(|s| !s.is_bonus()) {
            return;
        }

        if self.level < self.settings.level_cap {
            self.advance_level();
        } else {
            self.state = RoundState::Won;
            self.events.push(GameEvent::Banner(Banner::YouWin));
            info!(score = self.score, level = self.level, "round won");
        }
    }

    fn advance_level(&mut self) {
        self.level += 1;
        // A bonus ship still in flight does not carry over.
        self.enemy_ships.clear();
        self.enemy_manager.reset_bonus();
        self.missiles.clear();
        self.missile_manager.clear_in_flight();
        self.initialize_level();
        self.state = RoundState::LevelTransition {
            ticks_left: LEVEL_BANNER_TICKS,
        };
        self.events.push(GameEvent::Banner(Banner::LevelUp(self.level)));
        info!(level = self.level, score = self.score, "level up");
    }

    // ── Removal ────────────────────────────────────────────────────────

    fn remove_objects(&mut self, objects: &[Entity]) {
        for &entity in objects {
            match entity {
                Entity::Player => self.destroy_player(),
                Entity::Enemy(id) => self.destroy_enemy(id),
                Entity::Missile(id) => self.remove_missile(id),
            }
        }
    }

    fn destroy_player(&mut self) {
        let Some(player) = self.player_manager.player() else { return };
        let (x, y) = (player.body.center_x(), player.body.center_y());
        self.spawn_explosion(x, y);

        let fate = self.player_manager.check_player_lives();
        self.sound(SoundCue::PlayerDestroyed);
        self.events
            .push(GameEvent::LivesChanged(self.player_manager.lives()));
        if fate == PlayerFate::Exhausted {
            debug!("player out of lives");
        }
    }

    fn destroy_enemy(&mut self, id: EntityId) {
        let Some(idx) = self.enemy_ships.iter().position(|s| s.id == id) else { return };
        let ship = self.enemy_ships.remove(idx);
        self.spawn_explosion(ship.body.center_x(), ship.body.center_y());
        self.sound(SoundCue::EnemyDestroyed);

        if ship.is_bonus() {
            self.enemy_manager.reset_bonus();
            self.award_bonus();
        } else {
            self.update_score(ship.score_value);
        }
    }

    /// Level 1 pays an extra life, level 2 an extra life and faster fire,
    /// the final level unlocks the nuke.
    fn award_bonus(&mut self) {
        match self.level {
            0 | 1 => {
                self.player_manager.add_player_life();
            }
            2 => {
                self.player_manager.add_player_life();
                self.missile_manager.apply_power_up();
            }
            _ => {
                self.missile_manager.unlock_nuke();
            }
        }
        self.events
            .push(GameEvent::LivesChanged(self.player_manager.lives()));
        self.sound(SoundCue::PowerUp);
        debug!(level = self.level, "bonus ship destroyed, reward granted");
    }

    fn remove_missile(&mut self, id: EntityId) {
        let Some(idx) = self.missiles.iter().position(|m| m.id == id) else { return };
        let missile = self.missiles.remove(idx);
        if missile.kind == MissileKind::Player {
            self.missile_manager.player_missile_removed();
        }
    }

    fn update_score(&mut self, value: u32) {
        self.score += value;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    // ── Timed visuals ──────────────────────────────────────────────────

    fn spawn_explosion(&mut self, x: f32, y: f32) {
        let id = self.next_explosion;
        self.next_explosion = self.next_explosion.wrapping_add(1);
        self.explosions.push(Explosion { id, x, y, frame: 0 });

        let now = self.tick_count;
        for frame in 1..EXPLOSION_FRAMES {
            self.scheduler.schedule(
                now,
                frame as u64 * EXPLOSION_FRAME_TICKS,
                Deferred::ExplosionFrame { id, frame },
            );
        }
        self.scheduler.schedule(
            now,
            EXPLOSION_FRAMES as u64 * EXPLOSION_FRAME_TICKS,
            Deferred::ExplosionDone { id },
        );
    }

    fn run_continuations(&mut self) {
        for action in self.scheduler.take_due(self.tick_count) {
            match action {
                Deferred::ExplosionFrame { id, frame } => {
                    if let Some(explosion) = self.explosions.iter_mut().find(|e| e.id == id) {
                        explosion.frame = frame;
                    }
                }
                Deferred::ExplosionDone { id } => {
                    self.explosions.retain(|e| e.id != id);
                }
                Deferred::NukeDetonate => self.detonate_nuke(),
            }
        }
    }

    /// Clears every enemy and enemy missile. Formation ships still score;
    /// a bonus ship caught in the blast pays no reward.
    fn detonate_nuke(&mut self) {
        if self.nuke_blast.take().is_none() || self.state != RoundState::InRound {
            return;
        }

        if self.enemy_ships.iter().any(EnemyShip::is_bonus) {
            self.enemy_ships.retain(|s| !s.is_bonus());
            self.enemy_manager.reset_bonus();
        }

        let mut doomed: Vec<Entity> = self
            .enemy_ships
            .iter()
            .map(|s| Entity::Enemy(s.id))
            .collect();
        doomed.extend(
            self.missiles
                .iter()
                .filter(|m| m.is_hostile())
                .map(|m| Entity::Missile(m.id)),
        );
        info!(enemies = self.enemy_ships.len(), "nuke detonated");
        self.remove_objects(&doomed);
    }

    fn sound(&mut self, cue: SoundCue) {
        trace!(?cue, "sound");
        self.events.push(GameEvent::Sound(cue));
    }
}
