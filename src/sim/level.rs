/// One-shot level generation.
///
/// The world is a single endless strip: a continuous ground slab plus a
/// randomized run of floating platforms (with occasional higher step
/// platforms) and sparse spring/spike hazards on platforms and ground.
/// Geometry is generated once per run and never mutated afterwards.

use rand::Rng;

use crate::config::WorldConfig;
use crate::domain::body::{Hazard, HazardKind, Platform};

const GROUND_THICKNESS: f32 = 100.0;
const PLATFORM_THICKNESS: f32 = 20.0;
const GROUND_HAZARDS: usize = 7;

pub struct LevelGeometry {
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
}

/// Y of the walkable ground surface.
pub fn ground_y(world: &WorldConfig) -> f32 {
    world.height - 40.0
}

pub fn generate<R: Rng>(world: &WorldConfig, rng: &mut R) -> LevelGeometry {
    let mut platforms = Vec::new();
    let mut hazards = Vec::new();

    // ground slab, overhanging both edges so nothing slips past a seam
    platforms.push(Platform {
        x: -500.0,
        y: ground_y(world),
        w: world.width + 1000.0,
        h: GROUND_THICKNESS,
    });

    let mut x = 600.0;
    while x < world.width - 400.0 {
        let w = 150.0 + rng.gen::<f32>() * 200.0;
        let y = world.height - 150.0 - rng.gen::<f32>() * 200.0;
        platforms.push(Platform { x, y, w, h: PLATFORM_THICKNESS });

        // sparse hazards on platform tops
        if rng.gen::<f32>() < 0.15 {
            let kind = if rng.gen::<f32>() < 0.5 { HazardKind::Spring } else { HazardKind::Spike };
            let hx = x + rng.gen::<f32>() * (w - 40.0);
            let h = Hazard::new(hx, 0.0, kind);
            hazards.push(Hazard { y: y - h.h, ..h });
        }

        // occasional higher step above the run
        if rng.gen::<f32>() > 0.6 {
            platforms.push(Platform {
                x: x + w * 0.3,
                y: y - 140.0 - rng.gen::<f32>() * 60.0,
                w: 120.0,
                h: PLATFORM_THICKNESS,
            });
        }

        x += w + 100.0 + rng.gen::<f32>() * 150.0;
    }

    // ground-level hazards, away from the spawn area and world edges
    for _ in 0..GROUND_HAZARDS {
        let hx = 500.0 + rng.gen::<f32>() * (world.width - 1000.0);
        let kind = if rng.gen::<f32>() < 0.5 { HazardKind::Spring } else { HazardKind::Spike };
        let h = Hazard::new(hx, 0.0, kind);
        hazards.push(Hazard { y: ground_y(world) - h.h, ..h });
    }

    LevelGeometry { platforms, hazards }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::thread_rng;

    fn world() -> WorldConfig {
        GameConfig::default().world
    }

    #[test]
    fn ground_spans_whole_world() {
        let w = world();
        let lvl = generate(&w, &mut thread_rng());
        let ground = &lvl.platforms[0];
        assert!(ground.x <= 0.0);
        assert!(ground.x + ground.w >= w.width);
        assert_eq!(ground.y, w.height - 40.0);
    }

    #[test]
    fn platforms_sit_above_ground_inside_world() {
        let w = world();
        let lvl = generate(&w, &mut thread_rng());
        assert!(lvl.platforms.len() > 10, "a 6000px world should have many platforms");
        for p in &lvl.platforms[1..] {
            assert!(p.y < ground_y(&w));
            assert!(p.y > 0.0);
            assert!(p.x >= 0.0 && p.x < w.width);
        }
    }

    #[test]
    fn hazards_rest_on_a_surface() {
        let w = world();
        let lvl = generate(&w, &mut thread_rng());
        assert!(lvl.hazards.len() >= GROUND_HAZARDS);
        for h in &lvl.hazards {
            let foot = h.y + h.h;
            let supported = lvl
                .platforms
                .iter()
                .any(|p| (foot - p.y).abs() < 0.01 && h.x >= p.x && h.x + h.w <= p.x + p.w + 40.0);
            assert!(supported, "hazard at ({}, {}) floats in the air", h.x, h.y);
        }
    }
}
