/// Ambient enemy behaviors — one small state machine per kind.
///
///   WALKER / ELITE / HEAVY — ground patrol: accelerate toward the
///     player, decay when already moving, gravity + platform landing.
///   FLYER — gravity-free homing toward a point 50 px above the player.
///   TURRET — stationary, fires an aimed shot on a fixed interval.
///   DASHER — 3-phase cycle: creep closer, burst dash, recover.
///   BOSS — delegated to the boss sub-engine (`domain::boss`).
///
/// Enemies beyond the activity radius idle: no motion, no gravity, no
/// fire. Distances are center-to-center.

use rand::Rng;

use super::body::{try_land, Body, Platform};
use super::boss;
use super::entity::{Enemy, EnemyKind, Projectile};
use crate::config::WorldConfig;

/// Center distance beyond which a non-boss enemy stops updating.
pub const ACTIVITY_RADIUS: f32 = 1200.0;

const TURRET_FIRE_INTERVAL: f32 = 240.0;
const TURRET_SHOT_SPEED: f32 = 2.25;
const SHOT_SIZE: f32 = 15.0;

/// Shared read-only context for one enemy update pass.
pub struct EnemyCtx<'a> {
    pub player: &'a Body,
    pub platforms: &'a [Platform],
    pub world: &'a WorldConfig,
    pub gravity: f32,
    /// Difficulty level (0-5); tightens boss fire cooldowns and speeds
    /// the heavy shot.
    pub pressure: u32,
}

/// Advance one enemy by one frame. Pushes any projectiles it fires into
/// `out` and returns true if it fired (one audio cue per pass).
pub fn update_enemy<R: Rng>(
    e: &mut Enemy,
    ctx: &EnemyCtx,
    out: &mut Vec<Projectile>,
    frame_mult: f32,
    rng: &mut R,
) -> bool {
    if e.kind == EnemyKind::Boss {
        return boss::update_boss(e, ctx, out, frame_mult, rng);
    }

    let dx = ctx.player.center_x() - e.body.center_x();
    let dy = ctx.player.center_y() - e.body.center_y();
    if (dx * dx + dy * dy).sqrt() > ACTIVITY_RADIUS {
        return false;
    }

    let fired = match e.kind {
        EnemyKind::Walker | EnemyKind::Elite | EnemyKind::Heavy => {
            patrol(e, dx, ctx, frame_mult);
            false
        }
        EnemyKind::Flyer => {
            // ease toward a hover point above the player's head
            let target_y = ctx.player.y - 50.0;
            e.body.x += dx * 0.015 * e.speed * frame_mult;
            e.body.y += (target_y - e.body.y) * 0.015 * e.speed * frame_mult;
            false
        }
        EnemyKind::Turret => {
            e.timer += frame_mult;
            if e.timer >= TURRET_FIRE_INTERVAL {
                e.timer = 0.0;
                let angle = dy.atan2(dx);
                out.push(Projectile::hostile(
                    e.body.center_x(),
                    e.body.center_y(),
                    angle.cos() * TURRET_SHOT_SPEED,
                    angle.sin() * TURRET_SHOT_SPEED,
                    SHOT_SIZE,
                ));
                true
            } else {
                false
            }
        }
        EnemyKind::Dasher => {
            e.timer += frame_mult;
            if e.timer < 60.0 {
                // creep into dash range
                if dx.abs() > 200.0 {
                    e.body.x += dx.signum() * 2.0 * frame_mult;
                }
            } else if e.timer < 100.0 {
                e.body.x += dx.signum() * e.speed * 1.25 * frame_mult;
            } else {
                e.timer = 0.0;
            }
            fall(e, ctx, frame_mult);
            false
        }
        EnemyKind::Boss => unreachable!(),
    };
    e.body.clamp_x(ctx.world);
    fired
}

/// Ground patrol: kick off toward the player when stopped, otherwise
/// decay and re-kick when speed drops below cruise.
fn patrol(e: &mut Enemy, dx: f32, ctx: &EnemyCtx, frame_mult: f32) {
    if e.body.vx.abs() < 0.1 {
        e.body.vx = dx.signum() * e.speed;
    } else {
        e.body.vx *= 0.95_f32.powf(frame_mult);
        if e.body.vx.abs() < e.speed {
            e.body.vx = dx.signum() * e.speed;
        }
    }
    e.body.x += e.body.vx * frame_mult;
    fall(e, ctx, frame_mult);
}

/// Gravity + platform landing for ground enemies (tolerance band 20,
/// no edge inset).
fn fall(e: &mut Enemy, ctx: &EnemyCtx, frame_mult: f32) {
    let prev_bottom = e.body.bottom();
    e.body.y += e.body.vy * frame_mult;
    e.body.vy += ctx.gravity * frame_mult;
    try_land(&mut e.body, prev_bottom, ctx.platforms, 0.0, 20.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::thread_rng;

    fn ctx<'a>(
        player: &'a Body,
        platforms: &'a [Platform],
        world: &'a WorldConfig,
    ) -> EnemyCtx<'a> {
        EnemyCtx { player, platforms, world, gravity: 1.5, pressure: 0 }
    }

    fn world() -> WorldConfig {
        GameConfig::default().world
    }

    #[test]
    fn idle_beyond_activity_radius() {
        let mut rng = thread_rng();
        let player = Body::new(0.0, 0.0, 32.0, 32.0);
        let w = world();
        let mut e = Enemy::new(1, 3000.0, 100.0, EnemyKind::Walker, 1.0, 1.0, &mut rng);
        let before = e.body;
        let mut out = vec![];
        update_enemy(&mut e, &ctx(&player, &[], &w), &mut out, 1.0, &mut rng);
        assert_eq!(e.body.x, before.x);
        assert_eq!(e.body.y, before.y);
    }

    #[test]
    fn flyer_homes_toward_player() {
        let mut rng = thread_rng();
        let player = Body::new(500.0, 400.0, 32.0, 32.0);
        let w = world();
        let mut e = Enemy::new(1, 200.0, 100.0, EnemyKind::Flyer, 1.0, 1.0, &mut rng);
        let (x0, y0) = (e.body.x, e.body.y);
        let mut out = vec![];
        for _ in 0..30 {
            update_enemy(&mut e, &ctx(&player, &[], &w), &mut out, 1.0, &mut rng);
        }
        assert!(e.body.x > x0, "flyer should drift right toward player");
        assert!(e.body.y > y0, "flyer should descend toward hover point");
        assert!(out.is_empty());
    }

    #[test]
    fn turret_fires_on_interval_only() {
        let mut rng = thread_rng();
        let player = Body::new(300.0, 100.0, 32.0, 32.0);
        let w = world();
        let mut e = Enemy::new(1, 100.0, 100.0, EnemyKind::Turret, 1.0, 1.0, &mut rng);
        let c = ctx(&player, &[], &w);
        let mut out = vec![];
        let mut fired_frames = 0;
        for _ in 0..480 {
            if update_enemy(&mut e, &c, &mut out, 1.0, &mut rng) {
                fired_frames += 1;
            }
        }
        assert_eq!(fired_frames, 2);
        assert_eq!(out.len(), 2);
        assert!(out[0].hostile);
        // aimed shot travels toward the player (to the right)
        assert!(out[0].body.vx > 0.0);
        // turret never moves
        assert_eq!(e.body.x, 100.0);
    }

    #[test]
    fn knocked_back_walker_stays_inside_world_bounds() {
        let mut rng = thread_rng();
        let player = Body::new(600.0, 100.0, 32.0, 32.0);
        let w = world();
        let mut e = Enemy::new(1, 5.0, 100.0, EnemyKind::Walker, 1.0, 1.0, &mut rng);
        e.body.vx = -15.0; // fresh knockback toward the left edge
        let mut out = vec![];
        for _ in 0..10 {
            update_enemy(&mut e, &ctx(&player, &[], &w), &mut out, 1.0, &mut rng);
            assert!(e.body.x >= 0.0, "walker escaped the left bound: {}", e.body.x);
            assert!(e.body.right() <= w.width);
        }
    }

    #[test]
    fn walker_patrols_toward_player_and_lands() {
        let mut rng = thread_rng();
        let player = Body::new(600.0, 268.0, 32.0, 32.0);
        let w = world();
        let plats = [Platform { x: 0.0, y: 300.0, w: 1000.0, h: 20.0 }];
        let mut e = Enemy::new(1, 100.0, 200.0, EnemyKind::Walker, 1.0, 1.0, &mut rng);
        let c = EnemyCtx { player: &player, platforms: &plats, world: &w, gravity: 1.5, pressure: 0 };
        let mut out = vec![];
        for _ in 0..60 {
            update_enemy(&mut e, &c, &mut out, 1.0, &mut rng);
        }
        assert!(e.body.x > 100.0, "walker should close on the player");
        assert_eq!(e.body.bottom(), 300.0, "walker should rest on the platform");
    }
}
