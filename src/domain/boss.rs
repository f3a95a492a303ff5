/// Boss sub-engine.
///
/// A boss is an `Enemy` carrying a `BossBrain`. Each subtype has its own
/// movement rule; attacks come from a table of fire patterns indexed by
/// (subtype, mode). The mode rotates 0 → 1 → 2 → 0 on a randomized
/// 5-8 s timer that runs independently of the per-shot cooldown, so the
/// same subtype never settles into one rhythm.
///
/// Fire cooldowns are drawn from a per-pattern band, tightened by the
/// current difficulty level (the pressure value).

use rand::Rng;

use super::ai::EnemyCtx;
use super::body::try_land;
use super::entity::{BossBrain, BossKind, Enemy, Projectile};

const MODE_SWITCH_MIN: f32 = 300.0; // 5s
const MODE_SWITCH_MAX: f32 = 480.0; // 8s

const BOSS_SHOT_SIZE: f32 = 20.0;
const HEAVY_SHOT_SIZE: f32 = 70.0;
const BOMB_SIZE: f32 = 25.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FirePattern {
    /// 7-shot fan across a wide arc.
    SpreadFan,
    /// 4 aimed shots in quick succession.
    Burst,
    /// One slow, huge projectile.
    HeavyShot,
    /// 5-shot tight cone with speed jitter.
    ShotgunCone,
    /// 3 slow bombs dropped above the player.
    AreaDrop,
}

/// Attack-mode table: 3 distinct patterns per subtype.
pub fn pattern_for(kind: BossKind, mode: usize) -> FirePattern {
    use BossKind::*;
    use FirePattern::*;
    match (kind, mode % 3) {
        (Assault, 0) => SpreadFan,
        (Assault, 1) => Burst,
        (Assault, _) => ShotgunCone,
        (Bomber, 0) => AreaDrop,
        (Bomber, 1) => SpreadFan,
        (Bomber, _) => Burst,
        (Tank, 0) => HeavyShot,
        (Tank, 1) => ShotgunCone,
        (Tank, _) => AreaDrop,
        (Speed, 0) => ShotgunCone,
        (Speed, 1) => Burst,
        (Speed, _) => HeavyShot,
    }
}

/// Cooldown band (frames) for a pattern, tightened by pressure.
/// Never drops below 20 frames.
pub fn cooldown_band(pattern: FirePattern, pressure: u32) -> (f32, f32) {
    let (lo, hi) = match pattern {
        FirePattern::SpreadFan => (75.0, 95.0),
        FirePattern::Burst => (90.0, 130.0),
        FirePattern::HeavyShot => (130.0, 170.0),
        FirePattern::ShotgunCone => (85.0, 115.0),
        FirePattern::AreaDrop => (55.0, 75.0),
    };
    let cut = (pressure as f32 * 2.0).min(30.0);
    ((lo - cut).max(20.0), (hi - cut).max(21.0))
}

/// Advance a boss by one frame: mode rotation, subtype movement, firing.
/// Returns true if any shot left the barrel this frame.
pub fn update_boss<R: Rng>(
    e: &mut Enemy,
    ctx: &EnemyCtx,
    out: &mut Vec<Projectile>,
    frame_mult: f32,
    rng: &mut R,
) -> bool {
    let Some(mut brain) = e.boss.take() else {
        return false;
    };

    brain.mode_timer -= frame_mult;
    if brain.mode_timer <= 0.0 {
        brain.mode = (brain.mode + 1) % 3;
        brain.mode_timer = rng.gen_range(MODE_SWITCH_MIN..MODE_SWITCH_MAX);
        // a rotation cancels any in-flight burst
        brain.burst_left = 0;
    }

    fly(e, &brain, ctx, frame_mult);
    e.body.clamp_x(ctx.world);

    let fired = fire(e, &mut brain, ctx, out, frame_mult, rng);
    e.boss = Some(brain);
    fired
}

/// Subtype movement. Airborne subtypes ease toward a hover target;
/// ground subtypes take gravity and land on platforms.
fn fly(e: &mut Enemy, brain: &BossBrain, ctx: &EnemyCtx, frame_mult: f32) {
    let px = ctx.player.center_x();
    let dx = px - e.body.center_x();
    match brain.kind {
        BossKind::Assault => {
            // flank the player from whichever side it is already on
            let target_x = px + if e.body.center_x() > px { 300.0 } else { -300.0 };
            let target_y = ctx.world.height - 200.0;
            e.body.x += (target_x - e.body.x) * 0.02 * frame_mult;
            e.body.y += (target_y - e.body.y) * 0.05 * frame_mult;
        }
        BossKind::Bomber => {
            let target_y = ctx.world.height - 400.0;
            e.body.x += (px - e.body.center_x()) * 0.03 * frame_mult;
            e.body.y += (target_y - e.body.y) * 0.05 * frame_mult;
        }
        BossKind::Tank => {
            if dx.abs() > 400.0 {
                e.body.x += dx.signum() * 1.0 * frame_mult;
            }
            gravity_step(e, ctx, frame_mult);
        }
        BossKind::Speed => {
            e.timer += frame_mult;
            if e.timer < 30.0 {
                // telegraph: stand still before the dash
            } else if e.timer < 50.0 {
                e.body.x += dx.signum() * 8.0 * frame_mult;
            } else if e.timer < 110.0 {
                e.body.x += dx * 0.02 * frame_mult;
            } else {
                e.timer = 0.0;
            }
            gravity_step(e, ctx, frame_mult);
        }
    }
}

fn gravity_step(e: &mut Enemy, ctx: &EnemyCtx, frame_mult: f32) {
    let prev_bottom = e.body.bottom();
    e.body.y += e.body.vy * frame_mult;
    e.body.vy += ctx.gravity * frame_mult;
    try_land(&mut e.body, prev_bottom, ctx.platforms, 0.0, 20.0);
}

fn fire<R: Rng>(
    e: &Enemy,
    brain: &mut BossBrain,
    ctx: &EnemyCtx,
    out: &mut Vec<Projectile>,
    frame_mult: f32,
    rng: &mut R,
) -> bool {
    let (ox, oy) = (e.body.center_x(), e.body.center_y());
    let aim = (ctx.player.center_y() - oy).atan2(ctx.player.center_x() - ox);

    // an in-flight burst preempts the cooldown clock
    if brain.burst_left > 0 {
        brain.burst_gap -= frame_mult;
        if brain.burst_gap <= 0.0 {
            brain.burst_left -= 1;
            brain.burst_gap = 9.0;
            out.push(Projectile::hostile(
                ox,
                oy,
                aim.cos() * 2.4,
                aim.sin() * 2.4,
                BOSS_SHOT_SIZE,
            ));
            return true;
        }
        return false;
    }

    brain.attack_cooldown -= frame_mult;
    if brain.attack_cooldown > 0.0 {
        return false;
    }

    let pattern = pattern_for(brain.kind, brain.mode);
    match pattern {
        FirePattern::SpreadFan => {
            for i in -3..=3 {
                let a = aim + i as f32 * 0.15;
                out.push(Projectile::hostile(ox, oy, a.cos() * 2.1, a.sin() * 2.1, BOSS_SHOT_SIZE));
            }
        }
        FirePattern::Burst => {
            out.push(Projectile::hostile(ox, oy, aim.cos() * 2.4, aim.sin() * 2.4, BOSS_SHOT_SIZE));
            brain.burst_left = 3;
            brain.burst_gap = 9.0;
        }
        FirePattern::HeavyShot => {
            let speed = 1.4 + ctx.pressure as f32 * 0.0875;
            out.push(Projectile::hostile(
                ox,
                oy,
                aim.cos() * speed,
                aim.sin() * speed,
                HEAVY_SHOT_SIZE,
            ));
        }
        FirePattern::ShotgunCone => {
            for i in -2..=2 {
                let a = aim + i as f32 * 0.12;
                let speed = 2.2 + rng.gen::<f32>() * 0.4;
                out.push(Projectile::hostile(ox, oy, a.cos() * speed, a.sin() * speed, BOSS_SHOT_SIZE));
            }
        }
        FirePattern::AreaDrop => {
            for i in -1..=1 {
                let x = ctx.player.center_x() + i as f32 * 120.0;
                let vx = (rng.gen::<f32>() - 0.5) * 0.88;
                out.push(Projectile::hostile(x, e.body.y, vx, 2.1, BOMB_SIZE));
            }
        }
    }

    let (lo, hi) = cooldown_band(pattern, ctx.pressure);
    brain.attack_cooldown = rng.gen_range(lo..hi);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::body::{Body, Platform};
    use rand::thread_rng;

    fn boss(kind: BossKind) -> Enemy {
        let mut rng = thread_rng();
        Enemy::new_boss(99, 1000.0, 50.0, kind, 1.0, "TEST-MK1".into(), &mut rng)
    }

    fn run_frames(e: &mut Enemy, frames: usize) -> Vec<Projectile> {
        let mut rng = thread_rng();
        let cfg = GameConfig::default();
        let player = Body::new(800.0, 700.0, 32.0, 32.0);
        let plats = [Platform { x: -500.0, y: 860.0, w: 7000.0, h: 100.0 }];
        let ctx = EnemyCtx {
            player: &player,
            platforms: &plats,
            world: &cfg.world,
            gravity: 1.5,
            pressure: 0,
        };
        let mut out = vec![];
        for _ in 0..frames {
            update_boss(e, &ctx, &mut out, 1.0, &mut rng);
        }
        out
    }

    #[test]
    fn three_distinct_patterns_per_subtype() {
        for kind in BossKind::ALL {
            let p0 = pattern_for(kind, 0);
            let p1 = pattern_for(kind, 1);
            let p2 = pattern_for(kind, 2);
            assert_ne!(p0, p1);
            assert_ne!(p1, p2);
            assert_ne!(p0, p2);
            // mode index wraps
            assert_eq!(pattern_for(kind, 3), p0);
        }
    }

    #[test]
    fn mode_rotates_and_rearms_timer() {
        let mut e = boss(BossKind::Assault);
        let brain = e.boss.as_mut().unwrap();
        brain.mode_timer = 1.0;
        run_frames(&mut e, 2);
        let brain = e.boss.as_ref().unwrap();
        assert_eq!(brain.mode, 1);
        assert!(brain.mode_timer >= MODE_SWITCH_MIN - 2.0);
        assert!(brain.mode_timer <= MODE_SWITCH_MAX);
    }

    #[test]
    fn mode_timer_stays_in_5_to_8_second_band() {
        for _ in 0..50 {
            let mut e = boss(BossKind::Speed);
            e.boss.as_mut().unwrap().mode_timer = 0.5;
            run_frames(&mut e, 1);
            let t = e.boss.as_ref().unwrap().mode_timer;
            assert!((MODE_SWITCH_MIN - 1.0..=MODE_SWITCH_MAX).contains(&t));
        }
    }

    #[test]
    fn pressure_tightens_cooldowns_with_floor() {
        let (lo0, hi0) = cooldown_band(FirePattern::SpreadFan, 0);
        let (lo5, hi5) = cooldown_band(FirePattern::SpreadFan, 5);
        assert!(lo5 < lo0 && hi5 < hi0);
        // at the difficulty cap of 5 the cut is exactly 10 frames
        assert_eq!(lo0 - lo5, 10.0);
        let (lo_max, _) = cooldown_band(FirePattern::AreaDrop, 100);
        assert!(lo_max >= 20.0);
    }

    #[test]
    fn heavy_shot_speeds_up_with_difficulty() {
        let mut rng = thread_rng();
        let cfg = GameConfig::default();
        let player = Body::new(800.0, 700.0, 32.0, 32.0);
        let ctx = EnemyCtx {
            player: &player,
            platforms: &[],
            world: &cfg.world,
            gravity: 1.5,
            pressure: 5,
        };
        let mut e = boss(BossKind::Tank);
        {
            let brain = e.boss.as_mut().unwrap();
            brain.mode = 0; // HeavyShot
            brain.mode_timer = 10_000.0;
            brain.attack_cooldown = 1.0;
        }
        let mut out = vec![];
        for _ in 0..2 {
            update_boss(&mut e, &ctx, &mut out, 1.0, &mut rng);
        }
        assert_eq!(out.len(), 1);
        let speed = (out[0].body.vx.powi(2) + out[0].body.vy.powi(2)).sqrt();
        assert!((speed - 1.8375).abs() < 1e-3);
    }

    #[test]
    fn assault_fan_fires_seven_hostile_shots() {
        let mut e = boss(BossKind::Assault);
        {
            let brain = e.boss.as_mut().unwrap();
            brain.mode = 0;
            brain.mode_timer = 10_000.0;
            brain.attack_cooldown = 1.0;
        }
        let out = run_frames(&mut e, 2);
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|p| p.hostile && !p.ultimate));
    }

    #[test]
    fn burst_spreads_shots_over_frames() {
        let mut e = boss(BossKind::Speed);
        {
            let brain = e.boss.as_mut().unwrap();
            brain.mode = 1; // Burst
            brain.mode_timer = 10_000.0;
            brain.attack_cooldown = 1.0;
        }
        let out = run_frames(&mut e, 40);
        // opening shot plus 3 follow-ups, 9 frames apart
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn tank_lands_on_ground() {
        let mut e = boss(BossKind::Tank);
        run_frames(&mut e, 120);
        assert_eq!(e.body.bottom(), 860.0);
    }

    #[test]
    fn boss_stays_inside_world() {
        let mut e = boss(BossKind::Bomber);
        e.body.x = 5990.0;
        run_frames(&mut e, 60);
        assert!(e.body.right() <= 6000.0);
        assert!(e.body.x >= 0.0);
    }
}
