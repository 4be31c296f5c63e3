//! Per-frame body placement solver
//!
//! `solve` is a pure function of (transition sample, rollback offset,
//! viewport): identical inputs always produce identical placements. The
//! hit-test index and the renderer both consume the same returned snapshot,
//! so they can never disagree about where a body is.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ROLLBACK_EPSILON, ROLLBACK_HINT_THRESHOLD};
use crate::scene::config::{BodyId, TierConfig, TierTable, Viewport, MAX_TIER, TIER_NAMES};
use crate::scene::transition::TransitionSample;

/// Moon offset path length, in earth radii
const MOON_ORBIT_SCALE: f32 = 4.5;
/// Drawn moon radius as a fraction of the earth radius
const MOON_RADIUS_RATIO: f32 = 0.27;
/// Smallest drawn body radius in pixels
const MIN_BODY_RADIUS: f32 = 1.2;
/// Bodies below this blended alpha are dropped from the frame
const MIN_BODY_ALPHA: f32 = 0.02;

/// Earth surface colors for the vector fallback look
pub const EARTH_COLOR: [f32; 3] = [0.102, 0.478, 0.753];
/// Moon mid tone
pub const MOON_COLOR: [f32; 3] = [0.604, 0.596, 0.565];

/// Screen-space rendering and interaction data for one body, valid for one
/// frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: BodyId,
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Label fade, 0 when the body is too small to label
    pub label_alpha: f32,
    /// Whether this body is a pointer-strike candidate at all (final say
    /// belongs to the unlock predicate at hit-index build time)
    pub interactive: bool,
    pub color: [f32; 3],
    pub rings: bool,
}

/// Sun placement, with the optional horizontal clip boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPlacement {
    pub center: Vec2,
    pub radius: f32,
    pub glow_radius: f32,
    pub alpha: f32,
    /// Pixels left of this x coordinate are not drawn
    pub clip_x: Option<f32>,
}

/// Constellation marker placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentauriPlacement {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Which two tiers the rollback view currently sits between
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollbackHint {
    pub lo_tier: u8,
    pub hi_tier: u8,
    pub fraction: f32,
}

impl RollbackHint {
    /// Human-readable label: one tier name near either end of the blend,
    /// both names in between
    pub fn label(&self) -> String {
        let lo = TIER_NAMES[self.lo_tier as usize];
        let hi = TIER_NAMES[self.hi_tier as usize];
        if self.fraction < 0.15 {
            lo.to_string()
        } else if self.fraction > 0.85 {
            hi.to_string()
        } else {
            format!("{lo} \u{2192} {hi}")
        }
    }
}

/// Complete solver output for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlacements {
    /// Paint order: distant planets first, then the moon, earth topmost
    pub bodies: Vec<Placement>,
    pub sun: SunPlacement,
    pub centauri: CentauriPlacement,
    pub star_vis: f32,
    pub fog_center: Vec2,
    pub fog_radius: f32,
    pub fog_alpha: f32,
    pub galaxy_alpha: f32,
    /// Fractional tier this frame renders
    pub rendered_level: f32,
    /// Whole tier whose build slots are shown
    pub slot_view_level: u8,
    pub rollback_hint: Option<RollbackHint>,
    pub viewport: Viewport,
}

impl ScenePlacements {
    pub fn body(&self, id: BodyId) -> Option<&Placement> {
        self.bodies.iter().find(|p| p.id == id)
    }
}

/// Blend the two relevant tier configs and denormalize them against the
/// viewport.
///
/// While a transition is in flight (or the rollback offset is negligible)
/// the blend comes straight from the transition sample. Otherwise the
/// rollback offset picks the two neighboring tiers below the committed one
/// and the fractional part is the blend factor.
pub fn solve(
    table: &TierTable,
    sample: &TransitionSample,
    rollback_offset: f32,
    viewport: &Viewport,
) -> ScenePlacements {
    let (cfg, rendered_level) = if sample.in_flight || rollback_offset < ROLLBACK_EPSILON {
        let cfg = TierConfig::blend(&sample.from, table.get(sample.to_tier), sample.progress);
        (cfg, sample.rendered_level)
    } else {
        let effective = (sample.to_tier as f32 - rollback_offset).max(0.0);
        let lo = effective.floor();
        let hi = (lo + 1.0).min(MAX_TIER as f32);
        let cfg = TierConfig::blend(table.get(lo as u8), table.get(hi as u8), effective - lo);
        (cfg, effective)
    };

    let w = viewport.width;
    let m = viewport.min_dim();

    let earth_center = Vec2::new(cfg.earth.xf * w, viewport.safe_y(cfg.earth.yf));
    let earth_radius = cfg.earth.rf * m;

    let sun = SunPlacement {
        center: Vec2::new(cfg.sun.cx_w * w + cfg.sun.cx_m * m, viewport.safe_y(cfg.sun.yf)),
        radius: cfg.sun.rf * m,
        glow_radius: cfg.sun.glow_rf * m,
        alpha: cfg.sun.alpha,
        clip_x: cfg.sun.clip_xf.map(|c| c * w),
    };

    let centauri = CentauriPlacement {
        center: Vec2::new(cfg.centauri.xf * w, viewport.safe_y(cfg.centauri.yf)),
        radius: cfg.centauri.rf * m,
        alpha: cfg.centauri.alpha,
    };

    let mut bodies = Vec::with_capacity(cfg.bodies.len() + 2);
    for spec in &cfg.bodies {
        if spec.alpha < MIN_BODY_ALPHA {
            continue;
        }
        let radius = (spec.rf * m).max(MIN_BODY_RADIUS);
        let label_alpha = if radius >= 1.5 {
            spec.alpha * (radius / 4.0).min(1.0) * 0.7
        } else {
            0.0
        };
        bodies.push(Placement {
            id: spec.id,
            center: Vec2::new(spec.xf * w, viewport.safe_y(spec.yf)),
            radius,
            alpha: spec.alpha,
            label_alpha,
            interactive: spec.id.is_strikeable(),
            color: spec.color,
            rings: spec.rings,
        });
    }

    // The moon rides the earth: its offset path and size scale with the
    // earth radius, so it collapses along with the earth at high tiers
    if earth_radius > 1.0 {
        let moon_center = earth_center
            + Vec2::new(cfg.moon.dxf, cfg.moon.dyf) * earth_radius * MOON_ORBIT_SCALE;
        bodies.push(Placement {
            id: BodyId::Moon,
            center: moon_center,
            radius: (earth_radius * MOON_RADIUS_RATIO).max(MIN_BODY_RADIUS),
            alpha: 1.0,
            label_alpha: 0.0,
            interactive: true,
            color: MOON_COLOR,
            rings: false,
        });
    }

    if earth_radius >= 1.0 {
        bodies.push(Placement {
            id: BodyId::Earth,
            center: earth_center,
            radius: earth_radius,
            alpha: 1.0,
            label_alpha: 0.0,
            interactive: true,
            color: EARTH_COLOR,
            rings: false,
        });
    }

    let rollback_hint = if rollback_offset > ROLLBACK_HINT_THRESHOLD {
        let shown = (sample.to_tier as f32 - rollback_offset).max(0.0);
        let lo = shown.floor();
        Some(RollbackHint {
            lo_tier: lo as u8,
            hi_tier: ((lo as u8) + 1).min(MAX_TIER),
            fraction: shown - lo,
        })
    } else {
        None
    };

    ScenePlacements {
        bodies,
        sun,
        centauri,
        star_vis: cfg.star_vis,
        fog_center: earth_center,
        fog_radius: cfg.fog_rf * m,
        fog_alpha: cfg.fog_alpha,
        galaxy_alpha: ((cfg.galaxy - 0.3).max(0.0)) / 0.7 * 0.18,
        rendered_level,
        slot_view_level: (rendered_level.round().max(0.0) as u8).min(MAX_TIER),
        rollback_hint,
        viewport: *viewport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRANSITION_DURATION_MS;
    use crate::scene::config::TierTable;
    use crate::scene::transition::TransitionController;
    use proptest::prelude::*;

    fn settled_sample(table: &TierTable, tier: u8) -> TransitionSample {
        TransitionController::new(table, tier).sample(table, 0.0)
    }

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 800.0)
    }

    #[test]
    fn test_zero_offset_reproduces_committed_tier() {
        let table = TierTable::standard();
        let vp = viewport();
        for tier in 0..=MAX_TIER {
            let sample = settled_sample(&table, tier);
            let solved = solve(&table, &sample, 0.0, &vp);
            let cfg = table.get(tier);
            let earth = cfg.earth;
            let expected_r = earth.rf * vp.min_dim();
            if expected_r >= 1.0 {
                let placed = solved.body(BodyId::Earth).expect("earth placed");
                assert_eq!(placed.radius, expected_r);
                assert_eq!(placed.center.x, earth.xf * vp.width);
            }
            assert_eq!(solved.star_vis, cfg.star_vis);
            assert_eq!(solved.rendered_level, tier as f32);
        }
    }

    #[test]
    fn test_full_rollback_reproduces_tier_zero() {
        let table = TierTable::standard();
        let vp = viewport();
        let sample = settled_sample(&table, 3);
        let rolled = solve(&table, &sample, 3.0, &vp);
        let fresh = solve(&table, &settled_sample(&table, 0), 0.0, &vp);

        let rolled_earth = rolled.body(BodyId::Earth).expect("earth");
        let fresh_earth = fresh.body(BodyId::Earth).expect("earth");
        assert_eq!(rolled_earth.radius, fresh_earth.radius);
        assert_eq!(rolled_earth.center, fresh_earth.center);
        assert_eq!(rolled.star_vis, fresh.star_vis);
        assert_eq!(rolled.fog_alpha, fresh.fog_alpha);
    }

    #[test]
    fn test_transition_radius_between_endpoints_and_monotone() {
        let table = TierTable::standard();
        let vp = viewport();
        let mut tc = TransitionController::new(&table, 0);
        tc.request_tier(&table, 1, 0.0);

        let r0 = table.get(0).earth.rf * vp.min_dim();
        let r1 = table.get(1).earth.rf * vp.min_dim();

        let mid = solve(&table, &tc.sample(&table, 1500.0), 0.0, &vp);
        let mid_r = mid.body(BodyId::Earth).unwrap().radius;
        assert!(mid_r < r0 && mid_r > r1, "mid radius {mid_r} outside ({r1}, {r0})");

        // Strictly monotone toward the tier 1 radius as time advances
        let mut prev = mid_r;
        for ms in [2000.0, 2400.0, 2800.0, 2999.0] {
            let solved = solve(&table, &tc.sample(&table, ms), 0.0, &vp);
            let r = solved.body(BodyId::Earth).unwrap().radius;
            assert!(r < prev, "radius not shrinking at {ms}ms");
            prev = r;
        }
        let done = solve(
            &table,
            &tc.sample(&table, TRANSITION_DURATION_MS),
            0.0,
            &vp,
        );
        assert_eq!(done.body(BodyId::Earth).unwrap().radius, r1);
    }

    #[test]
    fn test_partial_rollback_fades_tier_one_body() {
        let table = TierTable::standard();
        let vp = viewport();
        // Rolled halfway between tier 0 and tier 1 from a committed tier 2:
        // venus exists at tier 1 but not tier 0
        let sample = settled_sample(&table, 2);
        let solved = solve(&table, &sample, 1.5, &vp);
        let venus = solved.body(BodyId::Venus).expect("venus fading in");
        assert!(venus.alpha > 0.0 && venus.alpha < 1.0);
        assert!((venus.alpha - 0.5).abs() < 1e-5);
        assert!((solved.rendered_level - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sun_clip_slides_in_during_first_ascent() {
        let table = TierTable::standard();
        let vp = viewport();
        let mut tc = TransitionController::new(&table, 0);
        tc.request_tier(&table, 1, 0.0);

        let early = solve(&table, &tc.sample(&table, 300.0), 0.0, &vp);
        let clip_early = early.sun.clip_x.expect("clip while blending");
        assert!(clip_early < 0.0);

        let done = solve(&table, &tc.sample(&table, 3000.0), 0.0, &vp);
        // Tier 1 clips exactly at the left screen edge
        assert_eq!(done.sun.clip_x, Some(0.0));
        // The clipped sun's center sits half a radius left of the boundary
        let expected_cx = -table.get(1).sun.rf * vp.min_dim() * 0.5;
        assert!((done.sun.center.x - expected_cx).abs() < 1e-3);
    }

    #[test]
    fn test_moon_rides_earth() {
        let table = TierTable::standard();
        let vp = viewport();
        let solved = solve(&table, &settled_sample(&table, 0), 0.0, &vp);
        let earth = solved.body(BodyId::Earth).unwrap();
        let moon = solved.body(BodyId::Moon).expect("moon at tier 0");
        assert!((moon.radius - earth.radius * MOON_RADIUS_RATIO).abs() < 1e-4);
        let expected = earth.center
            + Vec2::new(0.16, -0.06) * earth.radius * MOON_ORBIT_SCALE;
        assert!((moon.center - expected).length() < 1e-3);
        // Earth is painted last, so it wins overlap queries
        assert_eq!(solved.bodies.last().unwrap().id, BodyId::Earth);
    }

    #[test]
    fn test_earth_vanishes_at_top_tier() {
        let table = TierTable::standard();
        let vp = viewport();
        let solved = solve(&table, &settled_sample(&table, 4), 0.0, &vp);
        assert!(solved.body(BodyId::Earth).is_none());
        assert!(solved.body(BodyId::Moon).is_none());
        assert!(solved.galaxy_alpha > 0.17);
        assert!(solved.centauri.alpha > 0.9);
    }

    #[test]
    fn test_rollback_hint_threshold_and_label() {
        let table = TierTable::standard();
        let vp = viewport();
        let sample = settled_sample(&table, 2);

        assert!(solve(&table, &sample, 0.05, &vp).rollback_hint.is_none());

        let hint = solve(&table, &sample, 0.5, &vp)
            .rollback_hint
            .expect("hint shown");
        assert_eq!(hint.lo_tier, 1);
        assert_eq!(hint.hi_tier, 2);
        assert_eq!(hint.label(), "Earth-Moon \u{2192} Solar");

        let near_lo = solve(&table, &sample, 1.9, &vp).rollback_hint.unwrap();
        assert_eq!(near_lo.label(), "Planetary");
    }

    proptest! {
        #[test]
        fn prop_blend_stays_within_endpoint_envelope(t in 0.0f32..=1.0) {
            let table = TierTable::standard();
            let a = table.get(0);
            let b = table.get(1);
            let blended = TierConfig::blend(a, b, t);
            let (lo, hi) = if a.earth.rf <= b.earth.rf {
                (a.earth.rf, b.earth.rf)
            } else {
                (b.earth.rf, a.earth.rf)
            };
            prop_assert!(blended.earth.rf >= lo - 1e-6);
            prop_assert!(blended.earth.rf <= hi + 1e-6);
            prop_assert!(blended.star_vis >= a.star_vis.min(b.star_vis) - 1e-6);
            prop_assert!(blended.star_vis <= a.star_vis.max(b.star_vis) + 1e-6);
        }

        #[test]
        fn prop_solve_is_deterministic(offset in 0.0f32..=2.0) {
            let table = TierTable::standard();
            let vp = Viewport::new(1280.0, 800.0);
            let sample = TransitionController::new(&table, 2).sample(&table, 0.0);
            let x = solve(&table, &sample, offset, &vp);
            let y = solve(&table, &sample, offset, &vp);
            prop_assert_eq!(x, y);
        }
    }
}
