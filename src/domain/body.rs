/// Kinematic physics layer — single source of truth.
///
/// ## Architecture
///
/// Everything that moves is a `Body`: a top-left-anchored AABB with a
/// velocity, in world pixels, y-down. Velocities are expressed per
/// nominal 60 Hz frame; callers pass the frame multiplier (`dt * 60`)
/// so a slow terminal frame advances the same world distance as three
/// fast ones.
///
/// ## Landing Specification
///
/// Platforms are one-directional: a body lands only when ALL of
///   - it is moving down (vy >= 0)
///   - its x-span overlaps the platform's (optionally inset, so a
///     1-pixel toe overlap does not count for the player)
///   - its bottom edge is inside the platform's capture band
///     `[top, top + height + tolerance]`
///   - its bottom edge BEFORE this frame's motion was at most 20 px
///     below the platform top (prevents tunneling from below or
///     snapping up onto a platform passed long ago)
/// On landing the body snaps to the platform top and vy zeroes.
/// Jumping up through a platform is always allowed.

use super::super::config::WorldConfig;

/// How far below a platform top the previous-frame bottom may be and
/// still count as "was above it".
const LAND_GRACE: f32 = 20.0;

#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body { x, y, w, h, vx: 0.0, vy: 0.0 }
    }

    #[inline]
    pub fn right(&self) -> f32 { self.x + self.w }

    #[inline]
    pub fn bottom(&self) -> f32 { self.y + self.h }

    #[inline]
    pub fn center_x(&self) -> f32 { self.x + self.w / 2.0 }

    #[inline]
    pub fn center_y(&self) -> f32 { self.y + self.h / 2.0 }

    /// Advance position by the current velocity, scaled to the frame.
    #[inline]
    pub fn integrate(&mut self, frame_mult: f32) {
        self.x += self.vx * frame_mult;
        self.y += self.vy * frame_mult;
    }

    /// Exponential horizontal decay with a stop snap so bodies do not
    /// drift forever at sub-pixel speeds.
    pub fn apply_drag(&mut self, drag: f32, frame_mult: f32) {
        self.vx *= drag.powf(frame_mult);
        if self.vx.abs() < 0.1 {
            self.vx = 0.0;
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlap with this body's AABB shrunk by `inset` on every side.
    /// Used for boss contact so a grazing pixel does not hurt.
    pub fn overlaps_inset(&self, other: &Body, inset: f32) -> bool {
        self.x + inset < other.right()
            && self.right() - inset > other.x
            && self.y + inset < other.bottom()
            && self.bottom() - inset > other.y
    }

    #[inline]
    pub fn overlaps_rect(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.x < x + w && self.right() > x && self.y < y + h && self.bottom() > y
    }

    /// Keep the body inside the horizontal world bounds.
    pub fn clamp_x(&mut self, world: &WorldConfig) {
        if self.x < 0.0 {
            self.x = 0.0;
        } else if self.right() > world.width {
            self.x = world.width - self.w;
        }
    }
}

/// Static platform geometry.
#[derive(Clone, Copy, Debug)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HazardKind {
    Spring,
    Spike,
}

/// Fixed hazard sitting on a platform or the ground.
#[derive(Clone, Copy, Debug)]
pub struct Hazard {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: HazardKind,
}

impl Hazard {
    pub fn new(x: f32, y: f32, kind: HazardKind) -> Self {
        let (w, h) = match kind {
            HazardKind::Spring => (40.0, 15.0),
            HazardKind::Spike => (40.0, 25.0),
        };
        Hazard { x, y, w, h, kind }
    }
}

/// One-directional platform landing (see module doc for the full rule).
///
/// `prev_bottom` is the body's bottom edge before this frame's vertical
/// motion. `inset` shrinks the x-overlap test (player uses 5, everything
/// else 0); `tolerance` widens the vertical capture band below the
/// platform top (player 30, enemies/items 20).
///
/// Returns true if the body landed this frame (y snapped, vy zeroed).
pub fn try_land(
    body: &mut Body,
    prev_bottom: f32,
    platforms: &[Platform],
    inset: f32,
    tolerance: f32,
) -> bool {
    if body.vy < 0.0 {
        return false;
    }
    for plat in platforms {
        let x_overlap =
            body.x + inset < plat.x + plat.w && body.right() - inset > plat.x;
        if !x_overlap {
            continue;
        }
        let bottom = body.bottom();
        if bottom >= plat.y
            && bottom <= plat.y + plat.h + tolerance
            && prev_bottom <= plat.y + LAND_GRACE
        {
            body.y = plat.y - body.h;
            body.vy = 0.0;
            return true;
        }
    }
    false
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldConfig {
        WorldConfig { width: 6000.0, height: 900.0 }
    }

    fn plat(x: f32, y: f32, w: f32) -> Platform {
        Platform { x, y, w, h: 20.0 }
    }

    // ── AABB ──

    #[test]
    fn overlap_basic() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(5.0, 5.0, 10.0, 10.0);
        let c = Body::new(20.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn overlap_touching_edges_do_not_count() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let b = Body::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn inset_shrinks_contact() {
        let a = Body::new(0.0, 0.0, 100.0, 100.0);
        let b = Body::new(95.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps_inset(&b, 10.0));
    }

    // ── Drag ──

    #[test]
    fn drag_decays_and_snaps() {
        let mut b = Body::new(0.0, 0.0, 10.0, 10.0);
        b.vx = 6.0;
        b.apply_drag(0.8, 1.0);
        assert!((b.vx - 4.8).abs() < 1e-4);
        b.vx = 0.11;
        b.apply_drag(0.8, 1.0);
        assert_eq!(b.vx, 0.0);
    }

    #[test]
    fn drag_frame_rate_consistent() {
        // one 2-frame step == two 1-frame steps
        let mut a = Body::new(0.0, 0.0, 1.0, 1.0);
        let mut b = a;
        a.vx = 6.0;
        b.vx = 6.0;
        a.apply_drag(0.8, 2.0);
        b.apply_drag(0.8, 1.0);
        b.apply_drag(0.8, 1.0);
        assert!((a.vx - b.vx).abs() < 1e-4);
    }

    // ── Landing ──

    #[test]
    fn lands_from_above() {
        let mut b = Body::new(10.0, 0.0, 32.0, 32.0);
        b.vy = 5.0;
        let prev_bottom = b.bottom();
        b.y += 80.0; // falls past platform top at 100
        let landed = try_land(&mut b, prev_bottom, &[plat(0.0, 100.0, 200.0)], 5.0, 30.0);
        assert!(landed);
        assert_eq!(b.y, 100.0 - 32.0);
        assert_eq!(b.vy, 0.0);
        assert_eq!(b.bottom(), 100.0);
    }

    #[test]
    fn never_lands_while_rising() {
        let mut b = Body::new(10.0, 70.0, 32.0, 32.0);
        b.vy = -10.0;
        let landed = try_land(&mut b, 130.0, &[plat(0.0, 100.0, 200.0)], 0.0, 30.0);
        assert!(!landed);
    }

    #[test]
    fn no_capture_from_below() {
        // body rises through, then falls while fully under the platform
        let mut b = Body::new(10.0, 130.0, 32.0, 32.0);
        b.vy = 4.0;
        let prev_bottom = b.bottom(); // 162, way below top at 100
        let landed = try_land(&mut b, prev_bottom, &[plat(0.0, 100.0, 200.0)], 0.0, 30.0);
        assert!(!landed);
    }

    #[test]
    fn fast_fall_does_not_tunnel_within_band() {
        // 20 px/frame fall crossing the platform top still lands because
        // the capture band is deeper than one frame of terminal velocity
        let mut b = Body::new(10.0, 50.0, 32.0, 32.0);
        b.vy = 20.0;
        let prev_bottom = b.bottom(); // 82
        b.integrate(1.0); // bottom now 102
        let landed = try_land(&mut b, prev_bottom, &[plat(0.0, 100.0, 200.0)], 0.0, 20.0);
        assert!(landed);
        assert_eq!(b.bottom(), 100.0);
    }

    #[test]
    fn toe_overlap_rejected_by_inset() {
        let mut b = Body::new(197.0, 70.0, 32.0, 32.0);
        b.vy = 2.0;
        // only 3 px of the body overlaps the platform's right edge
        let landed = try_land(&mut b, 98.0, &[plat(0.0, 100.0, 200.0)], 5.0, 30.0);
        assert!(!landed);
        let landed_no_inset = try_land(&mut b, 98.0, &[plat(0.0, 100.0, 200.0)], 0.0, 30.0);
        assert!(landed_no_inset);
    }

    #[test]
    fn landed_body_rests_exactly_on_top() {
        // the §8-style invariant: after landing, bottom == platform top
        let plats = [plat(0.0, 300.0, 500.0)];
        let mut b = Body::new(50.0, 250.0, 32.0, 32.0);
        b.vy = 18.0;
        for _ in 0..10 {
            let prev_bottom = b.bottom();
            b.integrate(1.0);
            if try_land(&mut b, prev_bottom, &plats, 5.0, 30.0) {
                assert_eq!(b.bottom(), 300.0);
                assert_eq!(b.vy, 0.0);
                return;
            }
            b.vy += 1.5;
        }
        panic!("body never landed");
    }

    // ── World clamp ──

    #[test]
    fn clamp_x_both_edges() {
        let w = world();
        let mut b = Body::new(-5.0, 0.0, 32.0, 32.0);
        b.clamp_x(&w);
        assert_eq!(b.x, 0.0);
        b.x = 5990.0;
        b.clamp_x(&w);
        assert_eq!(b.right(), 6000.0);
    }
}
