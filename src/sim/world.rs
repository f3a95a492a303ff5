/// WorldState: the complete state of a running game.
///
/// ## Ownership
///
/// One flat struct owns everything the simulation touches: the player,
/// entity pools, static geometry, and the director/session counters.
/// The step pipeline takes `&mut WorldState`; the presentation layer
/// only ever sees an immutable `Snapshot`.
///
/// ## Session lifecycle
///
/// `start_run` regenerates geometry, resets every pool and counter, and
/// arms the first boss countdown. `end_run` flips the phase; pools are
/// left intact so the game-over screen can still show the battlefield.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::{
    BossKind, Enemy, EnemyKind, Explosion, Facing, FloatingText, Item, ItemKind, Particle, Player,
    Projectile,
};
use crate::domain::body::{Hazard, HazardKind, Platform};
use crate::sim::bossname::BossNameFetcher;
use crate::sim::level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct WorldState {
    pub cfg: GameConfig,
    pub phase: Phase,
    pub paused: bool,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub items: Vec<Item>,

    // ── Cosmetic pools ──
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub explosions: Vec<Explosion>,

    // ── Static geometry (regenerated per run) ──
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,

    // ── Director / session ──
    pub elapsed: f32,
    pub score: u32,
    pub kills: u32,
    pub boss_kills: u32,
    pub difficulty: u32,
    /// Elapsed seconds at which the next difficulty step fires.
    pub next_difficulty_at: f32,
    pub boss_countdown: f32,
    pub boss_ready: bool,
    pub boss_id: Option<u32>,
    pub last_boss_kind: Option<BossKind>,

    pub namer: BossNameFetcher,
    next_id: u32,
}

impl WorldState {
    pub fn new(cfg: GameConfig, namer: BossNameFetcher) -> Self {
        let player = Player::new(100.0, 300.0, &cfg.player);
        let next_difficulty_at = cfg.director.difficulty_interval_secs;
        let boss_countdown = cfg.director.boss_countdown_secs;
        WorldState {
            cfg,
            phase: Phase::Title,
            paused: false,
            player,
            enemies: vec![],
            projectiles: vec![],
            items: vec![],
            particles: vec![],
            texts: vec![],
            explosions: vec![],
            platforms: vec![],
            hazards: vec![],
            elapsed: 0.0,
            score: 0,
            kills: 0,
            boss_kills: 0,
            difficulty: 0,
            next_difficulty_at,
            boss_countdown,
            boss_ready: false,
            boss_id: None,
            last_boss_kind: None,
            namer,
            next_id: 1,
        }
    }

    /// Begin a fresh run: new geometry, reset player and pools, armed
    /// boss countdown with the first name fetch already in flight.
    pub fn start_run<R: Rng>(&mut self, rng: &mut R) {
        let geometry = level::generate(&self.cfg.world, rng);
        self.platforms = geometry.platforms;
        self.hazards = geometry.hazards;

        self.player = Player::new(100.0, 300.0, &self.cfg.player);
        self.enemies.clear();
        self.projectiles.clear();
        self.items.clear();
        self.particles.clear();
        self.texts.clear();
        self.explosions.clear();

        self.elapsed = 0.0;
        self.score = 0;
        self.kills = 0;
        self.boss_kills = 0;
        self.difficulty = 0;
        self.next_difficulty_at = self.cfg.director.difficulty_interval_secs;
        self.boss_countdown = self.cfg.director.boss_countdown_secs;
        self.boss_ready = false;
        self.boss_id = None;
        self.last_boss_kind = None;
        self.next_id = 1;

        self.namer.request(0);
        self.paused = false;
        self.phase = Phase::Playing;
    }

    pub fn end_run(&mut self) {
        self.phase = Phase::GameOver;
        self.paused = false;
    }

    pub fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Incoming player damage multiplier: +20% per difficulty level.
    pub fn difficulty_multiplier(&self) -> f32 {
        1.0 + self.difficulty as f32 * 0.2
    }

    pub fn boss(&self) -> Option<&Enemy> {
        let id = self.boss_id?;
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Ambient enemies, boss excluded (for the spawn cap).
    pub fn ambient_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.kind != EnemyKind::Boss).count()
    }
}

// ══════════════════════════════════════════════════════════════
// Snapshot — immutable render view
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct BossView {
    pub name: String,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum SpriteKind {
    Player { facing: Facing, attacking: bool, invincible: bool, shielded: bool },
    Enemy(EnemyKind),
    Shot,
    Ultimate,
    Item(ItemKind),
    Platform,
    Spring,
    Spike,
    Particle,
    Explosion,
}

#[derive(Clone, Copy, Debug)]
pub struct SpriteView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: SpriteKind,
}

#[derive(Clone, Debug)]
pub struct TextView {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub phase: Phase,
    pub paused: bool,
    pub hp: f32,
    pub max_hp: f32,
    pub energy: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub shield: bool,
    pub buffed: bool,
    pub dodge_ready: bool,
    pub ultimate_ready: bool,
    pub score: u32,
    pub kills: u32,
    pub survival_secs: f32,
    pub difficulty: u32,
    pub boss: Option<BossView>,
    /// Seconds until the next boss, when one is on the way.
    pub boss_countdown: Option<f32>,
    pub player_x: f32,
    pub player_y: f32,
    pub world_w: f32,
    pub world_h: f32,
    /// Sprites in painter's order: geometry first, player near the top.
    pub sprites: Vec<SpriteView>,
    pub texts: Vec<TextView>,
}

impl WorldState {
    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::with_capacity(
            self.platforms.len()
                + self.hazards.len()
                + self.items.len()
                + self.enemies.len()
                + self.projectiles.len()
                + self.particles.len()
                + self.explosions.len()
                + 1,
        );

        for p in &self.platforms {
            sprites.push(SpriteView { x: p.x, y: p.y, w: p.w, h: p.h, kind: SpriteKind::Platform });
        }
        for h in &self.hazards {
            let kind = match h.kind {
                HazardKind::Spring => SpriteKind::Spring,
                HazardKind::Spike => SpriteKind::Spike,
            };
            sprites.push(SpriteView { x: h.x, y: h.y, w: h.w, h: h.h, kind });
        }
        for i in &self.items {
            sprites.push(SpriteView {
                x: i.body.x,
                y: i.body.y,
                w: i.body.w,
                h: i.body.h,
                kind: SpriteKind::Item(i.kind),
            });
        }
        for e in &self.enemies {
            sprites.push(SpriteView {
                x: e.body.x,
                y: e.body.y,
                w: e.body.w,
                h: e.body.h,
                kind: SpriteKind::Enemy(e.kind),
            });
        }
        for p in &self.projectiles {
            let kind = if p.ultimate { SpriteKind::Ultimate } else { SpriteKind::Shot };
            sprites.push(SpriteView { x: p.body.x, y: p.body.y, w: p.body.w, h: p.body.h, kind });
        }
        sprites.push(SpriteView {
            x: self.player.body.x,
            y: self.player.body.y,
            w: self.player.body.w,
            h: self.player.body.h,
            kind: SpriteKind::Player {
                facing: self.player.facing,
                attacking: self.player.attacking,
                invincible: self.player.invincible > 0.0,
                shielded: self.player.shield,
            },
        });
        for p in &self.particles {
            sprites.push(SpriteView { x: p.x, y: p.y, w: 2.0, h: 2.0, kind: SpriteKind::Particle });
        }
        for ex in &self.explosions {
            sprites.push(SpriteView {
                x: ex.x - ex.radius,
                y: ex.y - ex.radius,
                w: ex.radius * 2.0,
                h: ex.radius * 2.0,
                kind: SpriteKind::Explosion,
            });
        }

        let texts = self
            .texts
            .iter()
            .map(|t| TextView { x: t.x, y: t.y, text: t.text.clone() })
            .collect();

        let boss = self.boss().and_then(|e| {
            e.boss.as_ref().map(|b| BossView { name: b.name.clone(), hp: e.hp, max_hp: e.max_hp })
        });

        Snapshot {
            phase: self.phase,
            paused: self.paused,
            hp: self.player.hp.max(0.0),
            max_hp: self.player.max_hp,
            energy: self.player.energy,
            stamina: self.player.stamina,
            max_stamina: self.player.max_stamina,
            shield: self.player.shield,
            buffed: self.player.buffed(),
            dodge_ready: self.player.dodge_cooldown <= 0.0,
            ultimate_ready: self.player.energy >= 99.0,
            score: self.score,
            kills: self.kills,
            survival_secs: self.elapsed,
            difficulty: self.difficulty,
            boss,
            boss_countdown: if self.boss_id.is_none() && self.boss_countdown > 0.0 {
                Some(self.boss_countdown)
            } else {
                None
            },
            player_x: self.player.body.center_x(),
            player_y: self.player.body.center_y(),
            world_w: self.cfg.world.width,
            world_h: self.cfg.world.height,
            sprites,
            texts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    pub fn test_world() -> WorldState {
        WorldState::new(GameConfig::default(), BossNameFetcher::new(None))
    }

    #[test]
    fn new_world_seeds_timers_from_config() {
        let w = test_world();
        assert_eq!(w.boss_countdown, w.cfg.director.boss_countdown_secs);
        assert_eq!(w.next_difficulty_at, w.cfg.director.difficulty_interval_secs);
        assert_eq!(w.phase, Phase::Title);
    }

    #[test]
    fn start_run_resets_session() {
        let mut w = test_world();
        let mut rng = thread_rng();
        w.start_run(&mut rng);
        w.score = 9000;
        w.kills = 12;
        w.elapsed = 100.0;
        w.difficulty = 3;
        w.player.hp = 1.0;
        w.start_run(&mut rng);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.score, 0);
        assert_eq!(w.kills, 0);
        assert_eq!(w.elapsed, 0.0);
        assert_eq!(w.difficulty, 0);
        assert_eq!(w.player.hp, w.player.max_hp);
        assert!(w.enemies.is_empty());
        assert!(!w.platforms.is_empty());
    }

    #[test]
    fn difficulty_multiplier_steps_by_20_percent() {
        let mut w = test_world();
        assert_eq!(w.difficulty_multiplier(), 1.0);
        w.difficulty = 5;
        assert!((w.difficulty_multiplier() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn snapshot_reports_boss_and_countdown_exclusively() {
        let mut w = test_world();
        w.start_run(&mut thread_rng());
        let snap = w.snapshot();
        assert!(snap.boss.is_none());
        assert!(snap.boss_countdown.is_some());

        let id = w.alloc_id();
        let boss = Enemy::new_boss(id, 500.0, 50.0, BossKind::Tank, 1.0, "RX-9".into(), &mut thread_rng());
        w.enemies.push(boss);
        w.boss_id = Some(id);
        let snap = w.snapshot();
        let view = snap.boss.expect("boss view");
        assert_eq!(view.name, "RX-9");
        assert_eq!(view.hp, 1500.0);
        assert!(snap.boss_countdown.is_none());
    }

    #[test]
    fn snapshot_sprite_counts_match_pools() {
        let mut w = test_world();
        w.start_run(&mut thread_rng());
        w.items.push(Item::new(300.0, 300.0, ItemKind::Boost));
        w.projectiles.push(Projectile::hostile(0.0, 0.0, 1.0, 0.0, 15.0));
        let snap = w.snapshot();
        let expected = w.platforms.len() + w.hazards.len() + 1 /* item */ + 1 /* shot */ + 1 /* player */;
        assert_eq!(snap.sprites.len(), expected);
    }
}
