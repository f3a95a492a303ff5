/// The simulation step — one frame of game logic.
///
/// `step()` is the only mutation entry point. It clamps dt, derives the
/// 60 Hz frame multiplier, and runs a fixed pass order:
///
///   director (difficulty → boss cadence → ambient spawns)
///   player   (input → physics/landing → hazards)
///   enemies  (behaviors, boss sub-engine)
///   motion   (projectiles, items)
///   combat   (pickups → projectile hits → contact → melee → deaths)
///   effects  (cosmetic decay)
///
/// Damage passes skip entities already at hp <= 0; a single reap pass
/// at the end rolls loot, scores kills, clears the boss slot, and
/// removes bodies — so "dead enemies are gone next frame" holds by
/// construction.

use rand::Rng;

use crate::domain::ai::{self, EnemyCtx};
use crate::domain::body::{try_land, HazardKind};
use crate::domain::combat::{self, HitOutcome};
use crate::domain::entity::{
    EnemyKind, Explosion, Facing, FloatingText, FrameInput, Item, ItemKind, Particle, Projectile,
};
use crate::sim::director;
use crate::sim::event::GameEvent;
use crate::sim::world::{Phase, WorldState};

/// Hard cap on one frame's worth of simulated time (tab-switch hiccup
/// protection, same clamp the dt normalization is tested against).
pub const MAX_DT: f32 = 0.1;

/// Player fall-out line: this far below the world bottom respawns.
const FALL_OUT_MARGIN: f32 = 100.0;
const FALL_DAMAGE: f32 = 10.0;
const SPRING_IMPULSE: f32 = -22.5;
const SPRING_STAMINA: f32 = 15.0;
const SPIKE_DAMAGE: f32 = 10.0;
const SPIKE_KNOCK_UP: f32 = -10.0;
const SPIKE_GRACE: f32 = 30.0;
const CONTACT_DAMAGE: f32 = 10.0;
const PROJECTILE_DAMAGE: f32 = 15.0;
const ULTIMATE_SPEED: f32 = 12.5;
const ULTIMATE_COST_THRESHOLD: f32 = 99.0;
const MELEE_ENERGY: f32 = 12.5;

pub fn step<R: Rng>(
    world: &mut WorldState,
    input: &FrameInput,
    dt_secs: f32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if world.phase != Phase::Playing || world.paused {
        return events;
    }

    let dt = dt_secs.clamp(0.0, MAX_DT);
    let fm = dt * 60.0;
    world.elapsed += dt;

    director::resolve_difficulty(world, &mut events);
    director::resolve_boss(world, dt, rng, &mut events);
    director::resolve_spawns(world, fm, rng, &mut events);

    resolve_player_input(world, input, fm, &mut events);
    resolve_player_physics(world, fm, &mut events);
    resolve_hazards(world, &mut events);
    resolve_enemies(world, fm, rng, &mut events);
    resolve_projectile_motion(world, fm);
    resolve_item_motion(world, fm);

    resolve_item_pickup(world, &mut events);
    resolve_projectile_hits(world, rng, &mut events);
    resolve_contact(world, &mut events);
    resolve_melee(world, rng, &mut events);
    resolve_deaths(world, rng, &mut events);

    resolve_effects(world, fm);

    if world.player.hp <= 0.0 {
        world.end_run();
        events.push(GameEvent::RunEnded);
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player_input(
    world: &mut WorldState,
    input: &FrameInput,
    fm: f32,
    events: &mut Vec<GameEvent>,
) {
    let physics = world.cfg.physics.clone();
    let pcfg = world.cfg.player.clone();
    let p = &mut world.player;

    // held movement sets vx directly; drag only applies when idle
    let speed = physics.move_speed
        * if p.buffed() { 1.5 } else { 1.0 }
        * if p.dodge_speed > 0.0 { 2.0 } else { 1.0 };
    if input.move_left {
        p.body.vx = -speed;
        p.facing = Facing::Left;
    }
    if input.move_right {
        p.body.vx = speed;
        p.facing = Facing::Right;
    }
    if !input.move_left && !input.move_right {
        p.body.apply_drag(physics.drag, fm);
    }

    if input.jump {
        if p.grounded {
            p.body.vy = physics.jump_force;
            p.grounded = false;
            p.jump_count = 1;
            events.push(GameEvent::Jumped);
        } else if p.jump_count < 2 {
            if p.buffed() || p.stamina >= pcfg.double_jump_cost {
                if !p.buffed() {
                    p.stamina -= pcfg.double_jump_cost;
                }
                p.body.vy = physics.jump_force * 0.9;
                p.jump_count = 2;
                events.push(GameEvent::DoubleJumped);
            } else {
                events.push(GameEvent::NoStamina);
            }
        }
    }

    if input.dodge && p.dodge_cooldown <= 0.0 {
        if p.buffed() || p.stamina >= pcfg.dodge_cost {
            if !p.buffed() {
                p.stamina -= pcfg.dodge_cost;
            }
            p.dodge_cooldown = pcfg.dodge_cooldown;
            p.invincible = p.invincible.max(pcfg.dodge_invincible);
            p.dodge_speed = pcfg.dodge_speed_frames;
            events.push(GameEvent::Dodged);
        } else {
            events.push(GameEvent::NoStamina);
        }
    }

    if input.attack && !p.attacking && p.attack_cooldown <= 0.0 {
        p.attacking = true;
        p.attack_active = pcfg.attack_active;
        p.attack_cooldown = pcfg.attack_cooldown * if p.buffed() { 0.5 } else { 1.0 };
        p.swing_hits.clear();
        events.push(GameEvent::AttackSwung);
    }

    if input.ultimate && p.energy >= ULTIMATE_COST_THRESHOLD {
        p.energy = 0.0;
        let dir = p.facing.dir();
        let x = p.body.center_x() - 25.0 + dir * 30.0;
        let y = p.body.center_y() - 25.0;
        world.projectiles.push(Projectile::ultimate(x, y, dir * ULTIMATE_SPEED));
        events.push(GameEvent::UltimateFired);
    }
}

fn resolve_player_physics(world: &mut WorldState, fm: f32, events: &mut Vec<GameEvent>) {
    let gravity = world.cfg.physics.gravity;
    let regen = world.cfg.player.stamina_regen;
    let world_cfg = world.cfg.world.clone();
    let p = &mut world.player;

    // timers
    p.invincible = (p.invincible - fm).max(0.0);
    p.dodge_cooldown = (p.dodge_cooldown - fm).max(0.0);
    p.dodge_speed = (p.dodge_speed - fm).max(0.0);
    p.buff = (p.buff - fm).max(0.0);
    p.attack_cooldown = (p.attack_cooldown - fm).max(0.0);
    if p.attacking {
        p.attack_active -= fm;
        if p.attack_active <= 0.0 {
            p.attacking = false;
            p.swing_hits.clear();
        }
    }

    // stamina: the power buff pins it at max
    if p.buffed() {
        p.stamina = p.max_stamina;
    } else {
        p.add_stamina(regen * fm);
    }

    // motion + one-directional landing
    let prev_bottom = p.body.bottom();
    p.body.integrate(fm);
    p.body.vy += gravity * fm;
    p.body.clamp_x(&world_cfg);
    p.grounded = false;
    if try_land(&mut p.body, prev_bottom, &world.platforms, 5.0, 30.0) {
        p.grounded = true;
        p.jump_count = 0;
    }

    // fell out of the world: respawn at the top, pay for it
    if p.body.bottom() > world_cfg.height + FALL_OUT_MARGIN {
        p.body.y = 0.0;
        p.body.vy = 0.0;
        if p.shield {
            p.shield = false;
            events.push(GameEvent::ShieldBroken);
        } else {
            p.hp -= FALL_DAMAGE;
        }
        events.push(GameEvent::FellOut);
    }
}

fn resolve_hazards(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let hazards = world.hazards.clone();
    let p = &mut world.player;
    for h in &hazards {
        if !p.body.overlaps_rect(h.x, h.y, h.w, h.h) {
            continue;
        }
        match h.kind {
            HazardKind::Spring => {
                if p.body.vy >= 0.0 {
                    p.body.vy = SPRING_IMPULSE;
                    p.grounded = false;
                    p.jump_count = 1;
                    p.add_stamina(SPRING_STAMINA);
                    events.push(GameEvent::SpringBounced);
                }
            }
            HazardKind::Spike => {
                // spikes ignore difficulty scaling; short grace window
                match combat::hit_player(p, SPIKE_DAMAGE, 1.0, SPIKE_GRACE) {
                    HitOutcome::Damaged(_) => {
                        p.body.vy = SPIKE_KNOCK_UP;
                        events.push(GameEvent::SpikeHit);
                    }
                    HitOutcome::Blocked => {
                        p.body.vy = SPIKE_KNOCK_UP;
                        events.push(GameEvent::ShieldBroken);
                    }
                    HitOutcome::Ignored => {}
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies & motion
// ══════════════════════════════════════════════════════════════

fn resolve_enemies<R: Rng>(
    world: &mut WorldState,
    fm: f32,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let player_body = world.player.body;
    let pressure = world.difficulty;
    let WorldState { enemies, projectiles, platforms, cfg, .. } = world;
    let ctx = EnemyCtx {
        player: &player_body,
        platforms,
        world: &cfg.world,
        gravity: cfg.physics.gravity,
        pressure,
    };
    let mut fired = false;
    for e in enemies.iter_mut() {
        if e.hp <= 0.0 {
            continue;
        }
        if ai::update_enemy(e, &ctx, projectiles, fm, rng) {
            fired = true;
        }
    }
    if fired {
        events.push(GameEvent::EnemyFired);
    }
}

fn resolve_projectile_motion(world: &mut WorldState, fm: f32) {
    for p in &mut world.projectiles {
        p.body.integrate(fm);
        p.life -= fm;
    }
}

fn resolve_item_motion(world: &mut WorldState, fm: f32) {
    for item in &mut world.items {
        let prev_bottom = item.body.bottom();
        item.body.integrate(fm);
        item.body.vy += Item::GRAVITY * fm;
        try_land(&mut item.body, prev_bottom, &world.platforms, 0.0, 20.0);
    }
}

// ══════════════════════════════════════════════════════════════
// Combat resolution
// ══════════════════════════════════════════════════════════════

fn resolve_item_pickup(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let mut i = 0;
    while i < world.items.len() {
        if !world.items[i].body.overlaps(&world.player.body) {
            i += 1;
            continue;
        }
        let item = world.items.remove(i);
        let p = &mut world.player;
        match item.kind {
            ItemKind::Health => p.heal_fraction(0.25),
            ItemKind::Energy => {
                p.add_energy(35.0);
                p.add_stamina(50.0);
            }
            ItemKind::Boost => p.buff = 420.0,
            ItemKind::Shield => p.shield = true,
        }
        events.push(GameEvent::ItemCollected { kind: item.kind });
    }
}

fn resolve_projectile_hits<R: Rng>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    // ultimate detonation: loose box trigger against any living enemy
    let mut blasts = Vec::new();
    for p in &mut world.projectiles {
        if !p.ultimate || p.exploded {
            continue;
        }
        let (cx, cy) = (p.body.center_x(), p.body.center_y());
        let triggered = world.enemies.iter().any(|e| {
            e.hp > 0.0
                && (e.body.center_x() - cx).abs() < combat::ULTIMATE_TRIGGER_BOX
                && (e.body.center_y() - cy).abs() < combat::ULTIMATE_TRIGGER_BOX
        });
        if triggered {
            p.exploded = true;
            blasts.push((cx, cy));
        }
    }
    for (cx, cy) in blasts {
        world.explosions.push(Explosion::new(cx, cy, combat::ULTIMATE_RADIUS));
        events.push(GameEvent::UltimateExploded { x: cx, y: cy });
        for e in &mut world.enemies {
            if e.hp <= 0.0 {
                continue;
            }
            let dx = e.body.center_x() - cx;
            let dy = e.body.center_y() - cy;
            if (dx * dx + dy * dy).sqrt() >= combat::ULTIMATE_RADIUS {
                continue;
            }
            let rolled = combat::ultimate_damage_roll(rng);
            let applied = combat::ultimate_applied_damage(rolled, e);
            e.hp -= applied;
            e.body.vy = -15.0;
            e.body.x += if dx < 0.0 { -50.0 } else { 50.0 };
            world
                .texts
                .push(FloatingText::new(e.body.center_x(), e.body.y - 10.0, format!("{rolled:.0}")));
        }
    }
    world.projectiles.retain(|p| p.life > 0.0 && !p.exploded);

    // hostile shots vs player (shot persists; invincibility gates re-hits)
    let mult = world.difficulty_multiplier();
    let p = &mut world.player;
    for shot in &world.projectiles {
        if !shot.hostile || !shot.body.overlaps(&p.body) {
            continue;
        }
        match combat::hit_player(p, PROJECTILE_DAMAGE, mult, combat::POST_HIT_INVINCIBLE) {
            HitOutcome::Damaged(amount) => {
                events.push(GameEvent::PlayerHit { amount });
                break;
            }
            HitOutcome::Blocked => {
                events.push(GameEvent::ShieldBroken);
                break;
            }
            HitOutcome::Ignored => {}
        }
    }
}

fn resolve_contact(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let mult = world.difficulty_multiplier();
    let WorldState { enemies, player, .. } = world;
    for e in enemies.iter() {
        if e.hp <= 0.0 {
            continue;
        }
        // bosses get a forgiving hitbox
        let touching = if e.kind == EnemyKind::Boss {
            e.body.overlaps_inset(&player.body, 10.0)
        } else {
            e.body.overlaps(&player.body)
        };
        if !touching {
            continue;
        }
        let outcome = combat::hit_player(player, CONTACT_DAMAGE, mult, combat::POST_HIT_INVINCIBLE);
        match outcome {
            HitOutcome::Damaged(amount) => events.push(GameEvent::PlayerHit { amount }),
            HitOutcome::Blocked => events.push(GameEvent::ShieldBroken),
            HitOutcome::Ignored => continue,
        }
        // knock away from the enemy
        player.body.vy = -8.0;
        player.body.vx = if player.body.center_x() < e.body.center_x() { -15.0 } else { 15.0 };
        break;
    }
}

fn resolve_melee<R: Rng>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let range = world.cfg.player.attack_range;
    let damage = world.cfg.player.attack_damage;
    let WorldState { enemies, player, particles, .. } = world;
    if !player.attacking || player.attack_active <= 0.0 {
        return;
    }
    for e in enemies.iter_mut() {
        if e.hp <= 0.0 || player.swing_hits.contains(&e.id) {
            continue;
        }
        if !combat::melee_reaches(player, range, &e.body) {
            continue;
        }
        player.swing_hits.push(e.id);
        e.hp -= damage;
        e.body.vx = player.facing.dir() * 10.0 * (1.0 - e.knockback_resist);
        player.add_energy(MELEE_ENERGY);
        events.push(GameEvent::MeleeHit { x: e.body.center_x(), y: e.body.center_y() });
        for _ in 0..3 {
            particles.push(Particle {
                x: e.body.center_x(),
                y: e.body.center_y(),
                vx: (rng.gen::<f32>() - 0.5) * 6.0,
                vy: -rng.gen::<f32>() * 4.0,
                life: 20.0,
            });
        }
    }
}

fn resolve_deaths<R: Rng>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let mut i = 0;
    while i < world.enemies.len() {
        if world.enemies[i].hp > 0.0 {
            i += 1;
            continue;
        }
        let e = world.enemies.remove(i);
        world.kills += 1;
        world.score += e.kind.score();
        events.push(GameEvent::EnemyDied {
            kind: e.kind,
            x: e.body.center_x(),
            y: e.body.center_y(),
        });
        if let Some(kind) = combat::roll_drop(e.kind, rng) {
            world.items.push(Item::new(e.body.center_x(), e.body.center_y(), kind));
        }
        if e.kind == EnemyKind::Boss {
            world.boss_kills += 1;
            world.boss_id = None;
            world.boss_countdown = world.cfg.director.boss_countdown_secs;
            world.boss_ready = false;
            // prefetch the next boss's name while the countdown runs
            world.namer.request(world.boss_kills);
            events.push(GameEvent::BossDied);
        }
    }
}

fn resolve_effects(world: &mut WorldState, fm: f32) {
    world.particles.retain_mut(|p| p.tick(fm));
    world.texts.retain_mut(|t| t.tick(fm));
    world.explosions.retain_mut(|e| e.tick(fm));
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::body::{Hazard, Platform};
    use crate::domain::entity::{BossKind, Enemy};
    use crate::sim::bossname::BossNameFetcher;
    use rand::thread_rng;

    /// Playing world with a single flat floor and no hazards, so tests
    /// control exactly what the player can touch.
    fn arena() -> WorldState {
        let cfg = GameConfig::default();
        let mut w = WorldState::new(cfg, BossNameFetcher::new(None));
        w.start_run(&mut thread_rng());
        w.platforms = vec![Platform { x: -500.0, y: 860.0, w: 7000.0, h: 100.0 }];
        w.hazards = vec![];
        // park the player on the floor
        w.player.body.x = 1000.0;
        w.player.body.y = 860.0 - w.player.body.h;
        w.player.grounded = true;
        // keep the director quiet
        w.boss_countdown = 10_000.0;
        w.cfg.director.base_spawn_chance = 0.0;
        w.cfg.director.enemy_cap = 0;
        w
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn settle(w: &mut WorldState, frames: usize) {
        let mut rng = thread_rng();
        for _ in 0..frames {
            step(w, &idle(), 1.0 / 60.0, &mut rng);
        }
    }

    #[test]
    fn paused_world_does_not_advance() {
        let mut w = arena();
        w.elapsed = 5.0;
        w.paused = true;
        let events = step(&mut w, &idle(), 0.016, &mut thread_rng());
        assert!(events.is_empty());
        assert_eq!(w.elapsed, 5.0);
    }

    #[test]
    fn dt_is_clamped_to_100ms() {
        let mut w = arena();
        step(&mut w, &idle(), 10.0, &mut thread_rng());
        assert!((w.elapsed - MAX_DT).abs() < 1e-6);
    }

    #[test]
    fn double_jump_refused_without_stamina() {
        let mut w = arena();
        w.player.body.y = 500.0; // mid-air
        w.player.grounded = false;
        w.player.jump_count = 1;
        w.player.stamina = 20.0; // cost is 30
        let input = FrameInput { jump: true, ..Default::default() };
        let events = step(&mut w, &input, 1.0 / 60.0, &mut thread_rng());
        assert!(matches!(events.as_slice(), [GameEvent::NoStamina]));
        assert_eq!(w.player.jump_count, 1);
        // regen ticked, but no cost was paid
        assert!(w.player.stamina >= 20.0 && w.player.stamina < 21.0);
    }

    #[test]
    fn double_jump_spends_stamina_once() {
        let mut w = arena();
        w.player.body.y = 500.0; // mid-air
        w.player.grounded = false;
        w.player.jump_count = 1;
        w.player.stamina = 50.0;
        let input = FrameInput { jump: true, ..Default::default() };
        let events = step(&mut w, &input, 1.0 / 60.0, &mut thread_rng());
        assert!(matches!(events.as_slice(), [GameEvent::DoubleJumped]));
        assert_eq!(w.player.jump_count, 2);
        assert!(w.player.stamina < 21.0);
        assert!(w.player.body.vy < 0.0);
    }

    #[test]
    fn landing_resets_jumps_and_rests_on_top() {
        let mut w = arena();
        w.player.body.y = 700.0;
        w.player.body.vy = 8.0;
        w.player.grounded = false;
        w.player.jump_count = 2;
        settle(&mut w, 60);
        assert!(w.player.grounded);
        assert_eq!(w.player.jump_count, 0);
        assert_eq!(w.player.body.bottom(), 860.0);
    }

    #[test]
    fn health_pickup_heals_quarter_of_max() {
        let mut w = arena();
        w.player.hp = 10.0;
        w.items.push(Item::new(w.player.body.x, w.player.body.y, ItemKind::Health));
        let events = step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.hp, 30.0);
        assert!(w.items.is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ItemCollected { kind: ItemKind::Health })));
    }

    #[test]
    fn boost_pickup_pins_stamina_and_halves_attack_cooldown() {
        let mut w = arena();
        w.player.stamina = 5.0;
        w.items.push(Item::new(w.player.body.x, w.player.body.y, ItemKind::Boost));
        step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert!(w.player.buffed());
        // next frame the buff pins stamina to max
        let input = FrameInput { attack: true, ..Default::default() };
        step(&mut w, &input, 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.stamina, w.player.max_stamina);
        assert!(w.player.attack_cooldown <= 36.0);
    }

    #[test]
    fn ultimate_requires_full_meter() {
        let mut w = arena();
        w.player.energy = 98.0;
        let input = FrameInput { ultimate: true, ..Default::default() };
        step(&mut w, &input, 1.0 / 60.0, &mut thread_rng());
        assert!(w.projectiles.is_empty());
        assert_eq!(w.player.energy, 98.0);

        w.player.energy = 100.0;
        let events = step(&mut w, &input, 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.energy, 0.0);
        assert_eq!(w.projectiles.len(), 1);
        assert!(w.projectiles[0].ultimate);
        assert!(events.iter().any(|e| matches!(e, GameEvent::UltimateFired)));
    }

    #[test]
    fn ultimate_explosion_caps_boss_at_20_percent() {
        let mut w = arena();
        let mut rng = thread_rng();
        let id = w.alloc_id();
        let mut boss =
            Enemy::new_boss(id, 1200.0, 700.0, BossKind::Tank, 1.0, "RX".into(), &mut rng);
        boss.hp = 1000.0;
        boss.max_hp = 1000.0;
        boss.boss.as_mut().unwrap().attack_cooldown = 10_000.0;
        boss.boss.as_mut().unwrap().mode_timer = 10_000.0;
        w.enemies.push(boss);
        w.boss_id = Some(id);

        // detonate right on top of the boss
        let mut p = Projectile::ultimate(1200.0, 700.0, 0.0);
        p.body.vx = 0.0;
        w.projectiles.push(p);
        step(&mut w, &idle(), 1.0 / 60.0, &mut rng);

        let boss = w.boss().expect("boss survives the capped hit");
        assert_eq!(boss.hp, 800.0);
        assert!(w.projectiles.is_empty(), "spent ultimate is removed");
    }

    #[test]
    fn melee_hits_each_enemy_once_per_swing() {
        let mut w = arena();
        let mut rng = thread_rng();
        let mut e = Enemy::new(w.alloc_id(), 0.0, 0.0, EnemyKind::Heavy, 1.0, 1.0, &mut rng);
        e.body.x = w.player.body.x + 50.0;
        e.body.y = w.player.body.y;
        w.enemies.push(e);

        let swing = FrameInput { attack: true, ..Default::default() };
        step(&mut w, &swing, 1.0 / 60.0, &mut rng);
        let hp_after_first = w.enemies[0].hp;
        assert_eq!(hp_after_first, 65.0);
        assert_eq!(w.player.energy, 12.5);

        // remaining active frames of the same swing must not re-hit
        step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        assert_eq!(w.enemies[0].hp, hp_after_first);
        assert_eq!(w.player.energy, 12.5);
    }

    #[test]
    fn dead_enemy_is_gone_next_frame_and_scores() {
        let mut w = arena();
        let mut rng = thread_rng();
        let mut e = Enemy::new(w.alloc_id(), 0.0, 0.0, EnemyKind::Walker, 1.0, 1.0, &mut rng);
        e.body.x = w.player.body.x + 50.0;
        e.body.y = w.player.body.y;
        e.hp = 1.0;
        w.enemies.push(e);
        w.player.invincible = 10_000.0; // ignore the contact hit

        let swing = FrameInput { attack: true, ..Default::default() };
        let events = step(&mut w, &swing, 1.0 / 60.0, &mut rng);
        assert!(w.enemies.is_empty());
        assert_eq!(w.kills, 1);
        assert_eq!(w.score, 100);
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDied { .. })));
    }

    #[test]
    fn contact_damage_scales_and_grants_invincibility() {
        let mut w = arena();
        let mut rng = thread_rng();
        w.difficulty = 2; // x1.4
        let mut e = Enemy::new(w.alloc_id(), 0.0, 0.0, EnemyKind::Walker, 1.0, 1.0, &mut rng);
        e.body.x = w.player.body.x;
        e.body.y = w.player.body.y;
        e.speed = 0.0;
        w.enemies.push(e);

        let events = step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        assert_eq!(w.player.hp, 80.0 - 14.0);
        assert!(w.player.invincible > 0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { amount } if *amount == 14.0)));

        // while invincible, repeated contact is a no-op
        let hp = w.player.hp;
        step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        assert_eq!(w.player.hp, hp);
    }

    #[test]
    fn shield_absorbs_projectile_then_breaks() {
        let mut w = arena();
        let mut rng = thread_rng();
        w.player.shield = true;
        let shot =
            Projectile::hostile(w.player.body.x, w.player.body.y, 0.0, 0.0, 15.0);
        w.projectiles.push(shot);
        let events = step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        assert!(!w.player.shield);
        assert_eq!(w.player.hp, w.player.max_hp);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ShieldBroken)));
    }

    #[test]
    fn spring_launches_and_restores_stamina() {
        let mut w = arena();
        w.player.stamina = 40.0;
        w.hazards = vec![Hazard::new(w.player.body.x, 860.0 - 15.0, HazardKind::Spring)];
        let events = step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.body.vy, SPRING_IMPULSE);
        assert_eq!(w.player.jump_count, 1);
        assert!(w.player.stamina >= 55.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::SpringBounced)));
    }

    #[test]
    fn fall_out_respawns_with_damage_or_shield() {
        let mut w = arena();
        w.platforms.clear(); // nothing to land on
        w.player.body.y = 2000.0;
        step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.body.y, 0.0);
        assert_eq!(w.player.hp, 70.0);

        let mut w = arena();
        w.platforms.clear();
        w.player.body.y = 2000.0;
        w.player.shield = true;
        step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert_eq!(w.player.hp, 80.0);
        assert!(!w.player.shield);
    }

    #[test]
    fn run_ends_when_hp_reaches_zero() {
        let mut w = arena();
        w.player.hp = 5.0;
        w.platforms.clear();
        w.player.body.y = 2000.0; // fall-out damage finishes the run
        let mut events = vec![];
        for _ in 0..3 {
            events = step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
            if w.phase == Phase::GameOver {
                break;
            }
            w.player.body.y = 2000.0;
        }
        assert_eq!(w.phase, Phase::GameOver);
        assert!(matches!(events.last(), Some(GameEvent::RunEnded)));
        // a finished world refuses further steps
        let quiet = step(&mut w, &idle(), 1.0 / 60.0, &mut thread_rng());
        assert!(quiet.is_empty());
    }

    #[test]
    fn boss_kill_rearms_countdown_and_drops_loot() {
        let mut w = arena();
        let mut rng = thread_rng();
        let id = w.alloc_id();
        let mut boss =
            Enemy::new_boss(id, 2500.0, 700.0, BossKind::Speed, 1.0, "RX".into(), &mut rng);
        boss.hp = 0.0;
        w.enemies.push(boss);
        w.boss_id = Some(id);
        w.boss_countdown = 0.0;

        let events = step(&mut w, &idle(), 1.0 / 60.0, &mut rng);
        assert!(w.boss_id.is_none());
        assert_eq!(w.boss_kills, 1);
        assert_eq!(w.score, 5000);
        assert_eq!(w.boss_countdown, w.cfg.director.boss_countdown_secs);
        assert_eq!(w.items.len(), 1, "bosses always drop");
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossDied)));
    }
}
