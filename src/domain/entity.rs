/// Entities: Player, Enemy (with boss brain), Projectile, Item, and the
/// decay-only effect pools (particles, floating texts, explosion rings).
///
/// Resource rules live here as small clamped mutators; everything that
/// needs world context (platforms, other entities) lives in `ai`,
/// `boss`, and the step pipeline.

use rand::Rng;

use super::body::Body;
use crate::config::PlayerConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn dir(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Frame input: movement is continuous (held key), actions are
/// edge-triggered (fresh press) so one press is one jump/swing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub dodge: bool,
    pub attack: bool,
    pub ultimate: bool,
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub hp: f32,
    pub max_hp: f32,
    /// Ultimate meter, 0..=100. Built by confirmed melee hits.
    pub energy: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub grounded: bool,
    /// 0 on ground, 1 after first jump, 2 after double jump.
    pub jump_count: u8,
    pub facing: Facing,
    pub attacking: bool,
    /// Frames the current swing hitbox stays live.
    pub attack_active: f32,
    pub attack_cooldown: f32,
    /// Enemy ids already damaged by the current swing.
    pub swing_hits: Vec<u32>,
    pub invincible: f32,
    pub dodge_cooldown: f32,
    /// Frames of doubled move speed after a dodge.
    pub dodge_speed: f32,
    /// Power buff frames: free mobility costs, full stamina, halved
    /// attack cooldown, 1.5x move speed.
    pub buff: f32,
    pub shield: bool,
}

impl Player {
    pub const WIDTH: f32 = 32.0;
    pub const HEIGHT: f32 = 32.0;

    pub fn new(x: f32, y: f32, cfg: &PlayerConfig) -> Self {
        Player {
            body: Body::new(x, y, Self::WIDTH, Self::HEIGHT),
            hp: cfg.max_hp,
            max_hp: cfg.max_hp,
            energy: 0.0,
            stamina: cfg.max_stamina,
            max_stamina: cfg.max_stamina,
            grounded: false,
            jump_count: 0,
            facing: Facing::Right,
            attacking: false,
            attack_active: 0.0,
            attack_cooldown: 0.0,
            swing_hits: Vec::new(),
            invincible: 0.0,
            dodge_cooldown: 0.0,
            dodge_speed: 0.0,
            buff: 0.0,
            shield: false,
        }
    }

    pub fn buffed(&self) -> bool {
        self.buff > 0.0
    }

    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(100.0);
    }

    pub fn add_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).clamp(0.0, self.max_stamina);
    }

    pub fn heal_fraction(&mut self, frac: f32) {
        self.hp = (self.hp + self.max_hp * frac).min(self.max_hp);
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    Walker,
    Flyer,
    Turret,
    Dasher,
    Elite,
    Heavy,
    Boss,
}

impl EnemyKind {
    pub fn score(self) -> u32 {
        match self {
            EnemyKind::Elite => 300,
            EnemyKind::Boss => 5000,
            _ => 100,
        }
    }

    /// Probability of dropping an item on death.
    pub fn drop_chance(self) -> f32 {
        match self {
            EnemyKind::Boss => 1.0,
            EnemyKind::Elite | EnemyKind::Heavy => 0.5,
            _ => 0.05,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BossKind {
    Assault,
    Bomber,
    Tank,
    Speed,
}

impl BossKind {
    pub const ALL: [BossKind; 4] =
        [BossKind::Assault, BossKind::Bomber, BossKind::Tank, BossKind::Speed];
}

/// Boss-only state riding on an `Enemy`.
///
/// Bosses rotate through 3 attack modes on a randomized 5-8 s timer;
/// each (subtype, mode) pair selects a fire pattern with its own
/// cooldown band. `timer` drives subtype movement cycles.
#[derive(Clone, Debug)]
pub struct BossBrain {
    pub kind: BossKind,
    pub mode: usize,
    pub mode_timer: f32,
    pub attack_cooldown: f32,
    /// Shots left in an in-flight timed burst, and frames to the next.
    pub burst_left: u32,
    pub burst_gap: f32,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub hp: f32,
    pub max_hp: f32,
    /// Base horizontal speed, px per frame.
    pub speed: f32,
    /// 0.0 = full knockback, 1.0 = immovable by melee.
    pub knockback_resist: f32,
    /// Kind-specific behavior clock (turret fire, dash cycle, ...).
    pub timer: f32,
    pub boss: Option<BossBrain>,
}

impl Enemy {
    /// Ambient enemy with kind-specific stats, scaled by the director's
    /// speed and hp multipliers.
    pub fn new<R: Rng>(
        id: u32,
        x: f32,
        y: f32,
        kind: EnemyKind,
        speed_mod: f32,
        hp_scale: f32,
        rng: &mut R,
    ) -> Self {
        let base_speed = (rng.gen::<f32>() * 0.375 + 0.375) * speed_mod;
        let (hp, w, h, speed, resist) = match kind {
            EnemyKind::Walker => (20.0, 35.0, 30.0, base_speed, 0.0),
            EnemyKind::Flyer => (20.0, 25.0, 25.0, base_speed, 0.0),
            EnemyKind::Turret => (40.0, 40.0, 40.0, 0.0, 0.0),
            EnemyKind::Dasher => (30.0, 35.0, 30.0, base_speed * 1.8, 0.0),
            EnemyKind::Elite => (60.0, 40.0, 45.0, base_speed * 1.2, 0.0),
            EnemyKind::Heavy => (100.0, 50.0, 50.0, base_speed * 0.6, 0.8),
            EnemyKind::Boss => unreachable!("bosses spawn via new_boss"),
        };
        let hp = hp * hp_scale;
        Enemy {
            id,
            kind,
            body: Body::new(x, y, w, h),
            hp,
            max_hp: hp,
            speed,
            knockback_resist: resist,
            timer: 0.0,
            boss: None,
        }
    }

    /// Boss enemy. `hp_scale` folds together the time and kill scaling
    /// computed by the director.
    pub fn new_boss<R: Rng>(
        id: u32,
        x: f32,
        y: f32,
        kind: BossKind,
        hp_scale: f32,
        name: String,
        rng: &mut R,
    ) -> Self {
        let hp = 1500.0 * hp_scale;
        Enemy {
            id,
            kind: EnemyKind::Boss,
            body: Body::new(x, y, 120.0, 140.0),
            hp,
            max_hp: hp,
            speed: 1.0,
            knockback_resist: 1.0,
            timer: 0.0,
            boss: Some(BossBrain {
                kind,
                mode: 0,
                mode_timer: rng.gen_range(300.0..480.0),
                attack_cooldown: 60.0,
                burst_left: 0,
                burst_gap: 0.0,
                name,
            }),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Projectiles & items
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
pub struct Projectile {
    pub body: Body,
    pub hostile: bool,
    pub ultimate: bool,
    /// Remaining lifetime in frames.
    pub life: f32,
    pub exploded: bool,
}

impl Projectile {
    pub fn hostile(x: f32, y: f32, vx: f32, vy: f32, size: f32) -> Self {
        let mut body = Body::new(x, y, size, size);
        body.vx = vx;
        body.vy = vy;
        Projectile { body, hostile: true, ultimate: false, life: 600.0, exploded: false }
    }

    pub fn ultimate(x: f32, y: f32, vx: f32) -> Self {
        let mut body = Body::new(x, y, 50.0, 50.0);
        body.vx = vx;
        Projectile { body, hostile: false, ultimate: true, life: 120.0, exploded: false }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Health,
    Energy,
    Boost,
    Shield,
}

/// Dropped pickup. Falls under half gravity and rests on platforms;
/// persists until collected.
#[derive(Clone, Copy, Debug)]
pub struct Item {
    pub body: Body,
    pub kind: ItemKind,
}

impl Item {
    pub const SIZE: f32 = 25.0;
    pub const GRAVITY: f32 = 0.5;

    pub fn new(x: f32, y: f32, kind: ItemKind) -> Self {
        let mut body = Body::new(x, y, Self::SIZE, Self::SIZE);
        body.vy = -8.0;
        Item { body, kind }
    }
}

// ══════════════════════════════════════════════════════════════
// Effects (cosmetic, decay-only)
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
}

impl Particle {
    /// Advance and report whether the particle is still alive.
    pub fn tick(&mut self, frame_mult: f32) -> bool {
        self.x += self.vx * frame_mult;
        self.y += self.vy * frame_mult;
        self.vy += 0.3 * frame_mult;
        self.life -= frame_mult;
        self.life > 0.0
    }
}

#[derive(Clone, Debug)]
pub struct FloatingText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub life: f32,
}

impl FloatingText {
    pub fn new(x: f32, y: f32, text: String) -> Self {
        FloatingText { x, y, text, life: 45.0 }
    }

    pub fn tick(&mut self, frame_mult: f32) -> bool {
        self.y -= 1.0 * frame_mult;
        self.life -= frame_mult;
        self.life > 0.0
    }
}

/// Expanding ring left by an ultimate detonation.
#[derive(Clone, Copy, Debug)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub max_radius: f32,
    pub life: f32,
}

impl Explosion {
    pub fn new(x: f32, y: f32, max_radius: f32) -> Self {
        Explosion { x, y, radius: 0.0, max_radius, life: 30.0 }
    }

    pub fn tick(&mut self, frame_mult: f32) -> bool {
        self.radius += (self.max_radius - self.radius) * 0.3 * frame_mult.min(1.0);
        self.life -= frame_mult;
        self.life > 0.0
    }
}
