/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// All tuning values are expressed in world pixels and 60 Hz frames;
/// the simulation rescales them with the per-step frame multiplier.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub director: DirectorConfig,
    pub world: WorldConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub gravity: f32,        // per-frame vy increment
    pub jump_force: f32,     // negative = up
    pub move_speed: f32,     // px per frame while held
    pub drag: f32,           // vx *= drag^frames
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub max_hp: f32,
    pub max_stamina: f32,
    pub stamina_regen: f32,        // per frame
    pub dodge_cost: f32,
    pub double_jump_cost: f32,
    pub dodge_cooldown: f32,       // frames
    pub dodge_invincible: f32,     // frames
    pub dodge_speed_frames: f32,   // frames of doubled move speed
    pub attack_active: f32,        // frames the swing hitbox is live
    pub attack_cooldown: f32,      // frames (halved under power buff)
    pub attack_range: f32,
    pub attack_damage: f32,
}

#[derive(Clone, Debug)]
pub struct DirectorConfig {
    pub base_spawn_chance: f32,      // per 60Hz frame, no boss active
    pub spawn_per_boss_kill: f32,    // chance added per defeated boss
    pub enemy_cap: usize,            // ambient enemies, boss excluded
    pub boss_countdown_secs: f32,
    pub difficulty_interval_secs: f32,
    pub difficulty_max: u32,
}

#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub attack: Vec<String>,
    pub dodge: Vec<String>,
    pub ultimate: Vec<String>,
    pub confirm: Vec<String>,
    pub pause: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    director: TomlDirector,
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_jump_force")]
    jump_force: f32,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_drag")]
    drag: f32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_max_hp")]
    max_hp: f32,
    #[serde(default = "default_max_stamina")]
    max_stamina: f32,
    #[serde(default = "default_stamina_regen")]
    stamina_regen: f32,
    #[serde(default = "default_dodge_cost")]
    dodge_cost: f32,
    #[serde(default = "default_double_jump_cost")]
    double_jump_cost: f32,
    #[serde(default = "default_dodge_cooldown")]
    dodge_cooldown: f32,
    #[serde(default = "default_dodge_invincible")]
    dodge_invincible: f32,
    #[serde(default = "default_dodge_speed_frames")]
    dodge_speed_frames: f32,
    #[serde(default = "default_attack_active")]
    attack_active: f32,
    #[serde(default = "default_attack_cooldown")]
    attack_cooldown: f32,
    #[serde(default = "default_attack_range")]
    attack_range: f32,
    #[serde(default = "default_attack_damage")]
    attack_damage: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDirector {
    #[serde(default = "default_base_spawn_chance")]
    base_spawn_chance: f32,
    #[serde(default = "default_spawn_per_boss_kill")]
    spawn_per_boss_kill: f32,
    #[serde(default = "default_enemy_cap")]
    enemy_cap: usize,
    #[serde(default = "default_boss_countdown")]
    boss_countdown_secs: f32,
    #[serde(default = "default_difficulty_interval")]
    difficulty_interval_secs: f32,
    #[serde(default = "default_difficulty_max")]
    difficulty_max: u32,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_world_width")]
    width: f32,
    #[serde(default = "default_world_height")]
    height: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_attack")]
    attack: Vec<String>,
    #[serde(default = "default_pad_dodge")]
    dodge: Vec<String>,
    #[serde(default = "default_pad_ultimate")]
    ultimate: Vec<String>,
    #[serde(default = "default_pad_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
}

// ── Defaults ──

fn default_gravity() -> f32 { 1.5 }
fn default_jump_force() -> f32 { -20.0 }
fn default_move_speed() -> f32 { 6.0 }
fn default_drag() -> f32 { 0.8 }

fn default_max_hp() -> f32 { 80.0 }
fn default_max_stamina() -> f32 { 100.0 }
fn default_stamina_regen() -> f32 { 0.15 }
fn default_dodge_cost() -> f32 { 40.0 }
fn default_double_jump_cost() -> f32 { 30.0 }
fn default_dodge_cooldown() -> f32 { 210.0 }     // 3.5s
fn default_dodge_invincible() -> f32 { 90.0 }    // 1.5s
fn default_dodge_speed_frames() -> f32 { 30.0 }
fn default_attack_active() -> f32 { 5.0 }
fn default_attack_cooldown() -> f32 { 72.0 }     // 1.2s
fn default_attack_range() -> f32 { 110.0 }
fn default_attack_damage() -> f32 { 35.0 }

fn default_base_spawn_chance() -> f32 { 0.00375 }
fn default_spawn_per_boss_kill() -> f32 { 0.005 }
fn default_enemy_cap() -> usize { 10 }
fn default_boss_countdown() -> f32 { 15.0 }
fn default_difficulty_interval() -> f32 { 30.0 }
fn default_difficulty_max() -> u32 { 5 }

fn default_world_width() -> f32 { 6000.0 }
fn default_world_height() -> f32 { 900.0 }

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_attack() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_pad_dodge() -> Vec<String> { vec!["R1".into(), "L1".into()] }
fn default_pad_ultimate() -> Vec<String> { vec!["Y".into()] }
fn default_pad_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            jump_force: default_jump_force(),
            move_speed: default_move_speed(),
            drag: default_drag(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            max_hp: default_max_hp(),
            max_stamina: default_max_stamina(),
            stamina_regen: default_stamina_regen(),
            dodge_cost: default_dodge_cost(),
            double_jump_cost: default_double_jump_cost(),
            dodge_cooldown: default_dodge_cooldown(),
            dodge_invincible: default_dodge_invincible(),
            dodge_speed_frames: default_dodge_speed_frames(),
            attack_active: default_attack_active(),
            attack_cooldown: default_attack_cooldown(),
            attack_range: default_attack_range(),
            attack_damage: default_attack_damage(),
        }
    }
}

impl Default for TomlDirector {
    fn default() -> Self {
        TomlDirector {
            base_spawn_chance: default_base_spawn_chance(),
            spawn_per_boss_kill: default_spawn_per_boss_kill(),
            enemy_cap: default_enemy_cap(),
            boss_countdown_secs: default_boss_countdown(),
            difficulty_interval_secs: default_difficulty_interval(),
            difficulty_max: default_difficulty_max(),
        }
    }
}

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            width: default_world_width(),
            height: default_world_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            attack: default_pad_attack(),
            dodge: default_pad_dodge(),
            ultimate: default_pad_ultimate(),
            confirm: default_pad_confirm(),
            pause: default_pad_pause(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        GameConfig {
            physics: PhysicsConfig {
                gravity: t.physics.gravity,
                jump_force: t.physics.jump_force,
                move_speed: t.physics.move_speed,
                drag: t.physics.drag,
            },
            player: PlayerConfig {
                max_hp: t.player.max_hp,
                max_stamina: t.player.max_stamina,
                stamina_regen: t.player.stamina_regen,
                dodge_cost: t.player.dodge_cost,
                double_jump_cost: t.player.double_jump_cost,
                dodge_cooldown: t.player.dodge_cooldown,
                dodge_invincible: t.player.dodge_invincible,
                dodge_speed_frames: t.player.dodge_speed_frames,
                attack_active: t.player.attack_active,
                attack_cooldown: t.player.attack_cooldown,
                attack_range: t.player.attack_range,
                attack_damage: t.player.attack_damage,
            },
            director: DirectorConfig {
                base_spawn_chance: t.director.base_spawn_chance,
                spawn_per_boss_kill: t.director.spawn_per_boss_kill,
                enemy_cap: t.director.enemy_cap,
                boss_countdown_secs: t.director.boss_countdown_secs,
                difficulty_interval_secs: t.director.difficulty_interval_secs,
                difficulty_max: t.director.difficulty_max,
            },
            world: WorldConfig {
                width: t.world.width,
                height: t.world.height,
            },
            gamepad: GamepadConfig {
                jump: t.gamepad.jump,
                attack: t.gamepad.attack,
                dodge: t.gamepad.dodge,
                ultimate: t.gamepad.ultimate,
                confirm: t.gamepad.confirm,
                pause: t.gamepad.pause,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/neonclaw → /usr/games/neonclaw
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/neonclaw)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/neonclaw");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/neonclaw)
    let sys = PathBuf::from("/usr/share/neonclaw");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_tuning() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.physics.gravity, 1.5);
        assert_eq!(cfg.physics.jump_force, -20.0);
        assert_eq!(cfg.player.max_hp, 80.0);
        assert_eq!(cfg.director.base_spawn_chance, 0.00375);
        assert_eq!(cfg.director.enemy_cap, 10);
        assert_eq!(cfg.world.width, 6000.0);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let t: TomlConfig = toml::from_str("[physics]\ngravity = 2.0\n").unwrap();
        let cfg = GameConfig::from_toml(t);
        assert_eq!(cfg.physics.gravity, 2.0);
        assert_eq!(cfg.physics.move_speed, 6.0);
        assert_eq!(cfg.player.dodge_cost, 40.0);
    }
}
