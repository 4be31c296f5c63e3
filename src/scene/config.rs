//! Tier layout data
//!
//! One `TierConfig` per civilization tier (0..=4). Each config is
//! self-contained and valid in isolation; a body missing from a tier's list
//! simply blends to alpha 0. `TierConfig::blend` is the core interpolation
//! primitive shared by the transition and rollback paths.

use serde::{Deserialize, Serialize};

use crate::consts::{UI_BOTTOM, UI_TOP};
use crate::lerp;

/// Number of civilization tiers
pub const TIER_COUNT: usize = 5;
/// Highest tier index
pub const MAX_TIER: u8 = 4;

/// Celestial body identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyId {
    Earth,
    Moon,
    Sun,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    /// Alpha Centauri constellation marker (tiers 3 and 4)
    Centauri,
}

impl BodyId {
    pub fn label(&self) -> &'static str {
        match self {
            BodyId::Earth => "Earth",
            BodyId::Moon => "Moon",
            BodyId::Sun => "Sun",
            BodyId::Mercury => "Mercury",
            BodyId::Venus => "Venus",
            BodyId::Mars => "Mars",
            BodyId::Jupiter => "Jupiter",
            BodyId::Saturn => "Saturn",
            BodyId::Uranus => "Uranus",
            BodyId::Neptune => "Neptune",
            BodyId::Centauri => "Alpha Centauri",
        }
    }

    /// Whether pointer strikes on this body can ever produce a hit region.
    /// The sun and the constellation are scenery only.
    pub fn is_strikeable(&self) -> bool {
        !matches!(self, BodyId::Sun | BodyId::Centauri)
    }
}

/// Build-slot content tags, with their fill colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    AutoFactory,
    RobotLegion,
    EnergyStation,
    ResearchCenter,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::AutoFactory => "Auto Factory",
            SlotKind::RobotLegion => "Robot Legion",
            SlotKind::EnergyStation => "Energy Station",
            SlotKind::ResearchCenter => "Research Center",
        }
    }

    pub fn fill_color(&self) -> [f32; 4] {
        match self {
            SlotKind::AutoFactory => [0.133, 0.773, 0.369, 0.95],
            SlotKind::RobotLegion => [0.231, 0.510, 0.965, 0.95],
            SlotKind::EnergyStation => [0.984, 0.749, 0.141, 0.96],
            SlotKind::ResearchCenter => [0.659, 0.333, 0.969, 0.96],
        }
    }
}

/// Short tier names for the rollback hint label
pub const TIER_NAMES: [&str; TIER_COUNT] = [
    "Planetary",
    "Earth-Moon",
    "Solar",
    "Interstellar",
    "Galactic",
];

/// Normalized earth anchor: screen-width fraction, safe-band fraction,
/// radius as a fraction of the min viewport dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarthSpec {
    pub xf: f32,
    pub yf: f32,
    pub rf: f32,
}

/// Moon offset path, relative to the earth anchor. The drawn moon radius is
/// derived from the earth radius, not from `rf`; `rf` only shapes how far
/// along the offset path the moon sits per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonSpec {
    pub dxf: f32,
    pub dyf: f32,
    pub rf: f32,
}

/// Sun placement, including the optional horizontal clip boundary used when
/// the sun pokes in from a screen edge.
///
/// The center x is stored as the two-coefficient form `cx_w * width +
/// cx_m * min_dim` so that clipped and unclipped states interpolate through
/// one continuous path (a clipped sun is anchored to its clip edge, an
/// unclipped one to its own center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunSpec {
    pub yf: f32,
    pub rf: f32,
    pub glow_rf: f32,
    pub alpha: f32,
    /// Horizontal clip boundary as a width fraction; pixels left of it are
    /// not drawn. Negative values place the boundary off-screen.
    pub clip_xf: Option<f32>,
    pub cx_w: f32,
    pub cx_m: f32,
}

impl SunSpec {
    /// Sun centered at a plain width fraction, no clipping
    pub fn anchored(xf: f32, yf: f32, rf: f32, glow_rf: f32, alpha: f32) -> Self {
        Self {
            yf,
            rf,
            glow_rf,
            alpha,
            clip_xf: None,
            cx_w: xf,
            cx_m: 0.0,
        }
    }

    /// Sun half-hidden behind a vertical clip boundary; its center sits half
    /// a radius left of the boundary
    pub fn clipped(clip_xf: f32, yf: f32, rf: f32, glow_rf: f32, alpha: f32) -> Self {
        Self {
            yf,
            rf,
            glow_rf,
            alpha,
            clip_xf: Some(clip_xf),
            cx_w: clip_xf,
            cx_m: -rf * 0.5,
        }
    }
}

/// Constellation marker placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentauriSpec {
    pub xf: f32,
    pub yf: f32,
    pub rf: f32,
    pub alpha: f32,
}

/// A planet entry in a tier's body list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub id: BodyId,
    pub xf: f32,
    pub yf: f32,
    pub rf: f32,
    pub alpha: f32,
    pub color: [f32; 3],
    pub rings: bool,
}

impl BodySpec {
    pub fn new(id: BodyId, xf: f32, yf: f32, rf: f32, color: [f32; 3]) -> Self {
        Self {
            id,
            xf,
            yf,
            rf,
            alpha: 1.0,
            color,
            rings: false,
        }
    }

    pub fn with_rings(mut self) -> Self {
        self.rings = true;
        self
    }
}

/// Fixed back-to-front paint order for list bodies. Moon and earth are
/// painted after these, so earth ends up topmost.
pub const DRAW_ORDER: [BodyId; 7] = [
    BodyId::Neptune,
    BodyId::Uranus,
    BodyId::Saturn,
    BodyId::Jupiter,
    BodyId::Mars,
    BodyId::Venus,
    BodyId::Mercury,
];

/// Complete scene description for one tier (or one blend of two tiers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Starfield visibility factor
    pub star_vis: f32,
    /// Fog radius as a fraction of the min viewport dimension
    pub fog_rf: f32,
    pub fog_alpha: f32,
    /// Galaxy background strength; tier tables use 0 or 1, blends are
    /// fractional
    pub galaxy: f32,
    pub earth: EarthSpec,
    pub moon: MoonSpec,
    pub sun: SunSpec,
    pub centauri: CentauriSpec,
    pub bodies: Vec<BodySpec>,
}

impl TierConfig {
    pub fn body(&self, id: BodyId) -> Option<&BodySpec> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Interpolate two configs into a new, equally valid config.
    ///
    /// Every scalar field is exact at both endpoints. A body present on
    /// only one side keeps that side's geometry and fades through alpha,
    /// so bodies never pop in or out. A clip boundary present on only one
    /// side slides to or from off-screen left; at the endpoint it lands on
    /// `Some(-1.0)` rather than `None`, which draws identically.
    pub fn blend(a: &TierConfig, b: &TierConfig, t: f32) -> TierConfig {
        let clip_xf = match (a.sun.clip_xf, b.sun.clip_xf) {
            (Some(ca), Some(cb)) => Some(lerp(ca, cb, t)),
            // Boundary slides out to the left edge of a full screen width
            (Some(ca), None) => Some(lerp(ca, -1.0, t)),
            // Boundary slides in from off-screen left
            (None, Some(cb)) => Some(lerp(-1.0, cb, t)),
            (None, None) => None,
        };

        let mut bodies = Vec::with_capacity(DRAW_ORDER.len());
        for id in DRAW_ORDER {
            let fa = a.body(id);
            let fb = b.body(id);
            let (fa, fb) = match (fa, fb) {
                (None, None) => continue,
                pair => pair,
            };
            // The absent side borrows the present side's geometry so the
            // body holds position while fading
            let xa = fa.or(fb).map(|s| s.xf).unwrap_or(0.0);
            let xb = fb.or(fa).map(|s| s.xf).unwrap_or(0.0);
            let ya = fa.or(fb).map(|s| s.yf).unwrap_or(0.0);
            let yb = fb.or(fa).map(|s| s.yf).unwrap_or(0.0);
            let ra = fa.or(fb).map(|s| s.rf).unwrap_or(0.0);
            let rb = fb.or(fa).map(|s| s.rf).unwrap_or(0.0);
            let aa = fa.map(|s| s.alpha).unwrap_or(0.0);
            let ab = fb.map(|s| s.alpha).unwrap_or(0.0);
            let style = match fb.or(fa) {
                Some(s) => s,
                None => continue,
            };
            bodies.push(BodySpec {
                id,
                xf: lerp(xa, xb, t),
                yf: lerp(ya, yb, t),
                rf: lerp(ra, rb, t),
                alpha: lerp(aa, ab, t),
                color: style.color,
                rings: style.rings,
            });
        }

        TierConfig {
            star_vis: lerp(a.star_vis, b.star_vis, t),
            fog_rf: lerp(a.fog_rf, b.fog_rf, t),
            fog_alpha: lerp(a.fog_alpha, b.fog_alpha, t),
            galaxy: lerp(a.galaxy, b.galaxy, t),
            earth: EarthSpec {
                xf: lerp(a.earth.xf, b.earth.xf, t),
                yf: lerp(a.earth.yf, b.earth.yf, t),
                rf: lerp(a.earth.rf, b.earth.rf, t),
            },
            moon: MoonSpec {
                dxf: lerp(a.moon.dxf, b.moon.dxf, t),
                dyf: lerp(a.moon.dyf, b.moon.dyf, t),
                rf: lerp(a.moon.rf, b.moon.rf, t),
            },
            sun: SunSpec {
                yf: lerp(a.sun.yf, b.sun.yf, t),
                rf: lerp(a.sun.rf, b.sun.rf, t),
                glow_rf: lerp(a.sun.glow_rf, b.sun.glow_rf, t),
                alpha: lerp(a.sun.alpha, b.sun.alpha, t),
                clip_xf,
                cx_w: lerp(a.sun.cx_w, b.sun.cx_w, t),
                cx_m: lerp(a.sun.cx_m, b.sun.cx_m, t),
            },
            centauri: CentauriSpec {
                xf: lerp(a.centauri.xf, b.centauri.xf, t),
                yf: lerp(a.centauri.yf, b.centauri.yf, t),
                rf: lerp(a.centauri.rf, b.centauri.rf, t),
                alpha: lerp(a.centauri.alpha, b.centauri.alpha, t),
            },
            bodies,
        }
    }
}

/// Planet base colors
pub mod palette {
    pub const MERCURY: [f32; 3] = [0.710, 0.702, 0.675];
    pub const VENUS: [f32; 3] = [0.910, 0.784, 0.478];
    pub const MARS: [f32; 3] = [0.757, 0.267, 0.055];
    pub const JUPITER: [f32; 3] = [0.784, 0.545, 0.227];
    pub const SATURN: [f32; 3] = [0.894, 0.820, 0.569];
    pub const URANUS: [f32; 3] = [0.490, 0.910, 0.910];
    pub const NEPTUNE: [f32; 3] = [0.247, 0.329, 0.729];
}

/// The five-tier layout table, immutable after construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    tiers: Vec<TierConfig>,
}

impl TierTable {
    /// The standard solar-system progression:
    /// 0 planetary, 1 earth-moon, 2 solar, 3 interstellar, 4 galactic.
    pub fn standard() -> Self {
        use palette::*;
        use BodyId::*;

        let tiers = vec![
            // Tier 0: a huge earth fills the view
            TierConfig {
                star_vis: 0.10,
                fog_rf: 0.22,
                fog_alpha: 0.95,
                galaxy: 0.0,
                earth: EarthSpec { xf: 0.5, yf: 0.50, rf: 0.42 },
                moon: MoonSpec { dxf: 0.16, dyf: -0.06, rf: 0.10 },
                sun: SunSpec::anchored(0.5, -1.0, 0.0, 0.0, 0.0),
                centauri: CentauriSpec { xf: 0.64, yf: 0.50, rf: 0.0, alpha: 0.0 },
                bodies: vec![],
            },
            // Tier 1: earth drops low, the sun pokes in from the left edge
            TierConfig {
                star_vis: 0.55,
                fog_rf: 0.65,
                fog_alpha: 0.75,
                galaxy: 0.0,
                earth: EarthSpec { xf: 0.5, yf: 0.78, rf: 0.09 },
                moon: MoonSpec { dxf: 0.30, dyf: -0.14, rf: 0.28 },
                sun: SunSpec::clipped(0.0, 0.42, 0.35, 0.38, 1.0),
                centauri: CentauriSpec { xf: 0.64, yf: 0.48, rf: 0.0, alpha: 0.0 },
                bodies: vec![
                    BodySpec::new(Venus, 0.28, 0.30, 0.011, VENUS),
                    BodySpec::new(Mercury, 0.68, 0.50, 0.007, MERCURY),
                ],
            },
            // Tier 2: the sun dominates the center
            TierConfig {
                star_vis: 0.75,
                fog_rf: 1.5,
                fog_alpha: 0.0,
                galaxy: 0.0,
                earth: EarthSpec { xf: 0.5, yf: 0.90, rf: 0.016 },
                moon: MoonSpec { dxf: 0.20, dyf: -0.18, rf: 0.28 },
                sun: SunSpec::anchored(0.50, 0.35, 0.46, 0.56, 1.0),
                centauri: CentauriSpec { xf: 0.64, yf: 0.46, rf: 0.0, alpha: 0.0 },
                bodies: vec![
                    BodySpec::new(Mercury, 0.15, 0.74, 0.005, MERCURY),
                    BodySpec::new(Venus, 0.26, 0.65, 0.008, VENUS),
                    BodySpec::new(Mars, 0.82, 0.70, 0.012, MARS),
                    BodySpec::new(Jupiter, 0.88, 0.44, 0.028, JUPITER),
                    BodySpec::new(Saturn, 0.12, 0.38, 0.022, SATURN).with_rings(),
                ],
            },
            // Tier 3: the whole system shrinks to a tight cluster
            TierConfig {
                star_vis: 1.0,
                fog_rf: 0.0,
                fog_alpha: 0.0,
                galaxy: 0.0,
                earth: EarthSpec { xf: 0.5, yf: 0.52, rf: 0.0020 },
                moon: MoonSpec { dxf: 0.22, dyf: -0.18, rf: 0.22 },
                sun: SunSpec::anchored(0.50, 0.50, 0.016, 0.08, 1.0),
                centauri: CentauriSpec { xf: 0.62, yf: 0.49, rf: 0.012, alpha: 1.0 },
                bodies: vec![
                    BodySpec::new(Mercury, 0.511, 0.507, 0.0011, MERCURY),
                    BodySpec::new(Venus, 0.488, 0.511, 0.0013, VENUS),
                    BodySpec::new(Mars, 0.516, 0.491, 0.0024, MARS),
                    BodySpec::new(Jupiter, 0.530, 0.479, 0.0040, JUPITER),
                    BodySpec::new(Saturn, 0.464, 0.476, 0.0034, SATURN).with_rings(),
                    BodySpec::new(Uranus, 0.536, 0.520, 0.0020, URANUS),
                    BodySpec::new(Neptune, 0.460, 0.526, 0.0020, NEPTUNE),
                ],
            },
            // Tier 4: a lone sun against the galaxy band
            TierConfig {
                star_vis: 1.0,
                fog_rf: 0.0,
                fog_alpha: 0.0,
                galaxy: 1.0,
                earth: EarthSpec { xf: 0.5, yf: 0.50, rf: 0.0 },
                moon: MoonSpec { dxf: 0.0, dyf: 0.0, rf: 0.0 },
                sun: SunSpec::anchored(0.50, 0.50, 0.002, 0.018, 1.0),
                centauri: CentauriSpec { xf: 0.57, yf: 0.50, rf: 0.004, alpha: 1.0 },
                bodies: vec![],
            },
        ];

        Self { tiers }
    }

    /// Config for a tier, clamped to the valid range
    pub fn get(&self, tier: u8) -> &TierConfig {
        let idx = (tier as usize).min(self.tiers.len() - 1);
        &self.tiers[idx]
    }

    pub fn max_tier(&self) -> u8 {
        (self.tiers.len() - 1) as u8
    }
}

/// Viewport geometry with the reserved vertical UI bands.
///
/// Normalized yf coordinates map into the safe band between the bands, so
/// the same tier data produces a sane layout at any viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_margins(width, height, UI_TOP, UI_BOTTOM)
    }

    pub fn with_margins(width: f32, height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            width,
            height,
            top_margin,
            bottom_margin,
        }
    }

    #[inline]
    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Map a safe-band fraction to a screen y coordinate
    #[inline]
    pub fn safe_y(&self, yf: f32) -> f32 {
        let band = self.height - self.top_margin - self.bottom_margin;
        self.top_margin + yf * band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = TierTable::standard();
        assert_eq!(table.max_tier(), MAX_TIER);
        assert!(table.get(0).bodies.is_empty());
        assert_eq!(table.get(2).bodies.len(), 5);
        // Out-of-range tiers clamp
        assert_eq!(table.get(9), table.get(MAX_TIER));
    }

    #[test]
    fn test_blend_exact_at_endpoints() {
        let table = TierTable::standard();
        let a = table.get(1);
        let b = table.get(2);
        let at_zero = TierConfig::blend(a, b, 0.0);
        let at_one = TierConfig::blend(a, b, 1.0);
        assert_eq!(at_zero.earth, a.earth);
        assert_eq!(at_zero.sun.rf, a.sun.rf);
        assert_eq!(at_one.earth, b.earth);
        assert_eq!(at_one.sun.rf, b.sun.rf);
        assert_eq!(at_one.star_vis, b.star_vis);
        // Tier 2 bodies all land at full alpha
        for body in &at_one.bodies {
            let target = b.body(body.id).expect("body present at tier 2");
            assert_eq!(body.alpha, target.alpha);
            assert_eq!(body.rf, target.rf);
        }
    }

    #[test]
    fn test_blend_absent_body_fades() {
        let table = TierTable::standard();
        // Mars exists at tier 2 but not at tier 1
        let mid = TierConfig::blend(table.get(1), table.get(2), 0.25);
        let mars = mid.body(BodyId::Mars).expect("mars in blend union");
        assert!((mars.alpha - 0.25).abs() < 1e-6);
        // Geometry borrowed from the present side
        let t2_mars = table.get(2).body(BodyId::Mars).unwrap();
        assert_eq!(mars.xf, t2_mars.xf);
        assert_eq!(mars.rf, t2_mars.rf);
    }

    #[test]
    fn test_blend_clip_boundary_cases() {
        let table = TierTable::standard();
        // Tier 0 has no clip, tier 1 clips at the left edge: boundary
        // slides in from off-screen left
        let entering = TierConfig::blend(table.get(0), table.get(1), 0.5);
        assert_eq!(entering.sun.clip_xf, Some(-0.5));
        // Tier 1 to tier 2: boundary slides back out
        let exiting = TierConfig::blend(table.get(1), table.get(2), 0.5);
        assert_eq!(exiting.sun.clip_xf, Some(-0.5));
        // Fully arrived: no residue of the clip in either direction
        let done = TierConfig::blend(table.get(1), table.get(2), 1.0);
        assert_eq!(done.sun.clip_xf, Some(-1.0));
        assert_eq!(done.sun.cx_w, table.get(2).sun.cx_w);
    }

    #[test]
    fn test_safe_band_mapping() {
        let vp = Viewport::new(1000.0, 800.0);
        assert_eq!(vp.safe_y(0.0), UI_TOP);
        assert_eq!(vp.safe_y(1.0), 800.0 - UI_BOTTOM);
        assert_eq!(vp.min_dim(), 800.0);
    }
}
