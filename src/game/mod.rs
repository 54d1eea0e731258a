//! The arcade core: entities, the managers that own them, and the
//! orchestrator that drives them one fixed tick at a time.
//!
//! Nothing in here knows about terminals. The host feeds [`Input`] into
//! [`GameManager::tick`], forwards fire commands, reads entity state back for
//! drawing and drains [`GameEvent`]s for sounds, banners and status text.

pub mod effects;
pub mod enemy;
pub mod manager;
pub mod missile;
pub mod object;
pub mod physics;
pub mod player;
pub mod ships;

pub use effects::{Deferred, Explosion, NukeBlast, Scheduler};
pub use enemy::{BonusState, Direction, EnemyManager};
pub use manager::{Banner, GameEvent, GameManager, GameSettings, Input, RoundState, SoundCue};
pub use missile::{Missile, MissileKind, MissileManager};
pub use object::{EntityId, GameObject, IdAllocator, Playfield};
pub use physics::Entity;
pub use player::{PlayerFate, PlayerManager};
pub use ships::{EnemyShip, EnemyTier, Player, ShipFactory, SpriteFrame};

// Logical playfield, in model units. The UI scales this to the terminal.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

pub const LEVEL_CAP: u32 = 3;
pub const STARTING_LIVES: u32 = 3;

// Player
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 6.0;
pub const PLAYER_OFFSET_FROM_BOTTOM: f32 = 30.0;
pub const BOUNDARY_MARGIN: f32 = 3.0;

// Enemies
pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 30.0;
pub const ENEMY_BASE_SPEED: f32 = 3.0;
pub const ENEMIES_PER_ROW: [usize; 4] = [2, 3, 4, 5];
pub const FORMATION_BOTTOM_Y: f32 = 260.0;
pub const ROW_SPACING: f32 = 60.0;

// Bonus ship
pub const BONUS_WIDTH: f32 = 56.0;
pub const BONUS_HEIGHT: f32 = 24.0;
pub const BONUS_Y: f32 = 20.0;
pub const BONUS_SPEED: f32 = 8.0;
pub const BONUS_BOUNCES: u32 = 4;
pub const BONUS_SPAWN_ODDS: u32 = 150;

// Missiles
pub const MISSILE_WIDTH: f32 = 4.0;
pub const MISSILE_HEIGHT: f32 = 14.0;
pub const PLAYER_MISSILE_SPEED: f32 = 10.0;
pub const ENEMY_MISSILE_SPEED: f32 = 12.0;
pub const PLAYER_MISSILE_LIMIT: u32 = 3;
pub const POWERED_MISSILE_LIMIT: u32 = 6;
pub const MISSILE_DELAY_LIMIT: u32 = 10;
pub const POWERED_DELAY_LIMIT: u32 = 4;
pub const ENEMY_FIRE_ODDS: u32 = 30;

// Nuke
pub const NUKE_WIDTH: f32 = 12.0;
pub const NUKE_HEIGHT: f32 = 20.0;
pub const NUKE_SPEED: f32 = 4.0;
pub const NUKE_DETONATION_DELAY: u64 = 20;

// Timed visuals, in ticks
pub const EXPLOSION_FRAMES: u8 = 3;
pub const EXPLOSION_FRAME_TICKS: u64 = 2;
pub const LEVEL_BANNER_TICKS: u32 = 30;
