//! Per-frame scene tessellation
//!
//! Turns the solved placements, effect pools and slot regions into one
//! triangle list, painted back to front in the same order the scene is
//! conceptually layered: stars, sun, constellation, planets, moon, earth,
//! slots, galaxy band, fog, vignette, hit markers, particles.

use glam::Vec2;

use crate::effects::EffectsManager;
use crate::scene::config::BodyId;
use crate::scene::hit_test::{HitTestIndex, RegionPayload};
use crate::scene::placement::{Placement, ScenePlacements, SunPlacement};
use crate::settings::Settings;

use super::shapes::{
    circle, clamp_left, ellipse, ellipse_ring, fade_circle, glow, gradient_ring, polyline, ring,
    shaded_circle, vertical_gradient_quad,
};
use super::starfield::Starfield;
use super::vertex::{colors, Vertex};

/// Relative star positions of the constellation polyline
const CENTAURI_STARS: [(f32, f32, f32); 5] = [
    (-0.9, -0.3, 1.1),
    (-0.25, -0.55, 0.8),
    (0.3, -0.1, 1.0),
    (-0.05, 0.45, 0.9),
    (0.78, 0.15, 1.2),
];

/// Continent blobs for the vector earth: (dx, dy, rw, rh) in earth radii
const EARTH_BLOBS: [(f32, f32, f32, f32); 4] = [
    (0.12, -0.28, 0.22, 0.18),
    (-0.28, -0.08, 0.18, 0.28),
    (0.04, 0.32, 0.14, 0.12),
    (-0.08, -0.42, 0.12, 0.10),
];

fn shade(color: [f32; 3], amount: f32) -> [f32; 4] {
    [
        (color[0] + amount).clamp(0.0, 1.0),
        (color[1] + amount).clamp(0.0, 1.0),
        (color[2] + amount).clamp(0.0, 1.0),
        1.0,
    ]
}

fn with_alpha(color: [f32; 3], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

fn scale_alpha(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * factor]
}

pub struct SceneDrawer {
    starfield: Starfield,
    vertices: Vec<Vertex>,
}

impl SceneDrawer {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let (bright, dim) = settings.quality.star_counts();
        Self {
            starfield: Starfield::new(seed, bright, dim),
            vertices: Vec::with_capacity(16 * 1024),
        }
    }

    /// Tessellate one frame. The returned slice is valid until the next
    /// call.
    pub fn draw(
        &mut self,
        placements: &ScenePlacements,
        effects: &EffectsManager,
        hit_index: &HitTestIndex,
        now_ms: f64,
        settings: &Settings,
    ) -> &[Vertex] {
        let out = &mut self.vertices;
        out.clear();
        let vp = placements.viewport;
        let segments = settings.quality.glow_segments();

        if settings.starfield {
            if !settings.reduced_motion {
                self.starfield.advance();
            }
            self.starfield
                .vertices(out, placements.star_vis, vp.width, vp.height);
        }

        draw_sun(out, &placements.sun, placements.rendered_level, segments);
        draw_centauri(out, placements, segments);

        for body in &placements.bodies {
            match body.id {
                BodyId::Earth => draw_earth(out, body, segments),
                BodyId::Moon => draw_moon(out, body, segments),
                _ => draw_planet(out, body, segments),
            }
        }

        draw_slots(out, hit_index);
        draw_galaxy_band(out, placements);
        draw_fog(out, placements, segments);
        draw_vignette(out, placements, segments);
        draw_markers(out, effects, placements, now_ms, segments);
        if settings.particles {
            draw_particles(out, effects);
        }

        &self.vertices
    }
}

fn draw_sun(out: &mut Vec<Vertex>, sun: &SunPlacement, rendered_level: f32, segments: u32) {
    if sun.alpha <= 0.01 {
        return;
    }
    // Near the solar tier the sun fills the frame; dim the glow and shift
    // it warm so it does not wash out the planets
    let level2_blend = (1.0 - ((rendered_level - 2.0).abs() / 0.55).min(1.0)).max(0.0);
    let dim = 1.0 - level2_blend * 0.48;
    let warm = level2_blend > 0.15;

    let start = out.len();
    let shells = if warm {
        &colors::SUN_GLOW_WARM
    } else {
        &colors::SUN_GLOW
    };
    let shell_params = [(5.0, 0.04), (3.0, 0.07), (1.5, 0.16), (1.0, 0.32)];
    for (i, (scale, alpha)) in shell_params.iter().enumerate() {
        glow(
            out,
            sun.center,
            sun.radius,
            sun.glow_radius * scale,
            shells[i],
            alpha * dim * sun.alpha,
            segments,
        );
    }

    let (core, mid, edge) = if warm {
        (colors::SUN_CORE_WARM, colors::SUN_MID_WARM, colors::SUN_EDGE_WARM)
    } else {
        (colors::SUN_CORE, colors::SUN_MID, colors::SUN_EDGE)
    };
    let radius = sun.radius.max(1.5);
    fade_circle(
        out,
        sun.center,
        radius,
        with_alpha(core, sun.alpha),
        with_alpha(edge, sun.alpha),
        segments,
    );
    // Bright inner kernel over the fade, offset like a lit sphere
    shaded_circle(
        out,
        sun.center,
        radius * 0.55,
        with_alpha(core, sun.alpha),
        with_alpha(mid, 0.0),
        segments,
    );

    if let Some(clip_x) = sun.clip_x {
        clamp_left(out, start, clip_x);
    }
}

fn draw_centauri(out: &mut Vec<Vertex>, placements: &ScenePlacements, segments: u32) {
    let ct = &placements.centauri;
    if ct.alpha <= 0.02 || ct.radius <= 0.8 {
        return;
    }
    let points: Vec<Vec2> = CENTAURI_STARS
        .iter()
        .map(|(x, y, _)| ct.center + Vec2::new(x * ct.radius, y * ct.radius))
        .collect();
    polyline(
        out,
        &points,
        (ct.radius * 0.08).max(1.0),
        scale_alpha(colors::CENTAURI_LINE, ct.alpha),
    );
    for (x, y, s) in CENTAURI_STARS {
        let pos = ct.center + Vec2::new(x * ct.radius, y * ct.radius);
        let sr = (ct.radius * 0.12 * s).max(1.4);
        glow(
            out,
            pos,
            sr * 0.6,
            sr * 3.6,
            colors::CENTAURI_GLOW,
            0.38 * ct.alpha,
            segments / 2,
        );
        circle(out, pos, sr, scale_alpha(colors::CENTAURI_STAR, ct.alpha), 12);
    }
}

fn draw_planet(out: &mut Vec<Vertex>, body: &Placement, segments: u32) {
    glow(
        out,
        body.center,
        body.radius,
        body.radius * 3.5,
        body.color,
        0.3 * body.alpha,
        segments / 2,
    );
    glow(
        out,
        body.center,
        body.radius,
        body.radius * 1.8,
        body.color,
        0.45 * body.alpha,
        segments / 2,
    );
    if body.radius > 2.5 {
        shaded_circle(
            out,
            body.center,
            body.radius,
            scale_alpha(shade(body.color, 0.4), body.alpha),
            scale_alpha(shade(body.color, -0.4), body.alpha),
            segments,
        );
    } else {
        circle(
            out,
            body.center,
            body.radius,
            with_alpha(body.color, body.alpha),
            12,
        );
    }
    if body.rings && body.radius > 3.0 {
        ellipse_ring(
            out,
            body.center,
            body.radius * 2.4,
            body.radius * 0.5,
            0.3,
            body.radius * 0.5,
            scale_alpha(colors::SATURN_RING, body.alpha * 0.5),
            segments,
        );
    }
}

fn draw_moon(out: &mut Vec<Vertex>, moon: &Placement, segments: u32) {
    if moon.radius <= 0.8 {
        return;
    }
    glow(
        out,
        moon.center,
        moon.radius,
        moon.radius * 2.2,
        colors::MOON_GLOW,
        0.18,
        segments / 2,
    );
    shaded_circle(
        out,
        moon.center,
        moon.radius,
        with_alpha(colors::MOON_LIGHT, 1.0),
        with_alpha(colors::MOON_DARK, 1.0),
        segments,
    );
}

fn draw_earth(out: &mut Vec<Vertex>, earth: &Placement, segments: u32) {
    // Thin atmosphere halo, then the broader glow
    gradient_ring(
        out,
        earth.center,
        earth.radius * 0.9,
        earth.radius * 1.4,
        [0.353, 0.706, 1.0, 0.12],
        [0.353, 0.706, 1.0, 0.0],
        segments,
    );
    glow(
        out,
        earth.center,
        earth.radius,
        earth.radius * 2.2,
        colors::EARTH_GLOW,
        0.22,
        segments,
    );
    shaded_circle(
        out,
        earth.center,
        earth.radius,
        with_alpha(colors::EARTH_LIGHT, 1.0),
        with_alpha(colors::EARTH_DARK, 1.0),
        segments,
    );
    if earth.radius > 22.0 {
        for (dx, dy, rw, rh) in EARTH_BLOBS {
            ellipse(
                out,
                earth.center + Vec2::new(dx * earth.radius, dy * earth.radius),
                rw * earth.radius,
                rh * earth.radius,
                dx,
                with_alpha(colors::EARTH_LAND, 0.22),
                16,
            );
        }
    }
}

fn draw_slots(out: &mut Vec<Vertex>, hit_index: &HitTestIndex) {
    for slot in hit_index.slot_regions() {
        let RegionPayload::Slot(kind) = slot.payload else {
            continue;
        };
        let fill = kind.map(|k| k.fill_color()).unwrap_or(colors::SLOT_EMPTY);
        circle(out, slot.center, slot.radius, fill, 24);
        let rim = if kind.is_some() {
            colors::SLOT_RING
        } else {
            colors::SLOT_RING_EMPTY
        };
        ring(out, slot.center, slot.radius, slot.radius + 2.0, rim, 24);
    }
}

fn draw_galaxy_band(out: &mut Vec<Vertex>, placements: &ScenePlacements) {
    let alpha = placements.galaxy_alpha;
    if alpha <= 0.0 {
        return;
    }
    let vp = placements.viewport;
    let y0 = vp.height * 0.2;
    let y1 = vp.height * 0.75;
    let stops = [
        (0.0, [0.0, 0.0, 0.0, 0.0]),
        (0.3, colors::GALAXY_EDGE),
        (0.5, colors::GALAXY_CORE),
        (0.7, colors::GALAXY_EDGE),
        (1.0, [0.0, 0.0, 0.0, 0.0]),
    ];
    for pair in stops.windows(2) {
        let (t_a, c_a) = pair[0];
        let (t_b, c_b) = pair[1];
        vertical_gradient_quad(
            out,
            0.0,
            y0 + (y1 - y0) * t_a,
            vp.width,
            y0 + (y1 - y0) * t_b,
            scale_alpha(c_a, alpha),
            scale_alpha(c_b, alpha),
        );
    }
}

fn draw_fog(out: &mut Vec<Vertex>, placements: &ScenePlacements, segments: u32) {
    if placements.fog_alpha <= 0.02 || placements.fog_radius <= 0.0 {
        return;
    }
    let vp = placements.viewport;
    let center = placements.fog_center;
    let dark = with_alpha(colors::FOG, placements.fog_alpha);
    let clear = with_alpha(colors::FOG, 0.0);
    gradient_ring(
        out,
        center,
        placements.fog_radius * 0.3,
        placements.fog_radius * 2.0,
        clear,
        dark,
        segments,
    );
    // Solid cover from the gradient edge to past the farthest corner
    let corner = Vec2::new(
        center.x.max(vp.width - center.x),
        center.y.max(vp.height - center.y),
    )
    .length();
    if corner > placements.fog_radius * 2.0 {
        ring(
            out,
            center,
            placements.fog_radius * 2.0,
            corner + 2.0,
            dark,
            segments,
        );
    }
}

fn draw_vignette(out: &mut Vec<Vertex>, placements: &ScenePlacements, segments: u32) {
    let vp = placements.viewport;
    let center = Vec2::new(vp.width / 2.0, vp.height / 2.0);
    gradient_ring(
        out,
        center,
        vp.min_dim() * 0.25,
        vp.width.max(vp.height) * 0.85,
        with_alpha(colors::VIGNETTE, 0.0),
        with_alpha(colors::VIGNETTE, 0.5),
        segments,
    );
}

fn draw_markers(
    out: &mut Vec<Vertex>,
    effects: &EffectsManager,
    placements: &ScenePlacements,
    now_ms: f64,
    segments: u32,
) {
    for marker in effects.markers() {
        let Some(frame) = marker.resolve(now_ms, placements) else {
            continue;
        };
        let line_width = (frame.body_radius * 0.08 * frame.alpha + 0.8).max(1.5);
        ring(
            out,
            frame.center,
            frame.ring_radius - line_width * 0.5,
            frame.ring_radius + line_width * 0.5,
            with_alpha(colors::MARKER_RING, 0.58 * frame.alpha),
            segments / 2,
        );
        fade_circle(
            out,
            frame.center,
            frame.flash_radius,
            [1.0, 1.0, 1.0, 0.71 * frame.alpha],
            with_alpha(colors::MARKER_FLASH, 0.0),
            segments / 2,
        );
    }
}

fn draw_particles(out: &mut Vec<Vertex>, effects: &EffectsManager) {
    for p in effects.particles() {
        circle(out, p.pos, p.size(), with_alpha(p.color(), p.alpha()), 8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::{TierTable, Viewport};
    use crate::scene::placement::solve;
    use crate::scene::sources::ProgressionSource;
    use crate::scene::transition::TransitionController;

    struct AllUnlocked;
    impl ProgressionSource for AllUnlocked {
        fn committed_tier(&self) -> u8 {
            0
        }
        fn is_unlocked(&self, _body: BodyId) -> bool {
            true
        }
    }

    fn frame_at(tier: u8) -> (ScenePlacements, HitTestIndex) {
        let table = TierTable::standard();
        let sample = TransitionController::new(&table, tier).sample(&table, 0.0);
        let placements = solve(&table, &sample, 0.0, &Viewport::new(1280.0, 800.0));
        let mut index = HitTestIndex::new();
        index.rebuild(&placements, &AllUnlocked, None, false);
        (placements, index)
    }

    #[test]
    fn test_draw_produces_geometry_every_tier() {
        let settings = Settings::default();
        let mut drawer = SceneDrawer::new(3, &settings);
        let effects = EffectsManager::new(3);
        for tier in 0..=4 {
            let (placements, index) = frame_at(tier);
            let verts = drawer.draw(&placements, &effects, &index, 0.0, &settings);
            assert!(!verts.is_empty(), "tier {tier} drew nothing");
            assert_eq!(verts.len() % 3, 0, "triangle list misaligned at tier {tier}");
        }
    }

    #[test]
    fn test_clipped_sun_stays_right_of_boundary() {
        let settings = Settings::default();
        let mut drawer = SceneDrawer::new(3, &settings);
        let effects = EffectsManager::new(3);
        let (placements, index) = frame_at(1);
        let clip_x = placements.sun.clip_x.expect("tier 1 sun clips");

        let mut out = Vec::new();
        draw_sun(&mut out, &placements.sun, 1.0, 32);
        assert!(out.iter().all(|v| v.position[0] >= clip_x));

        // And the full frame still tessellates
        let verts = drawer.draw(&placements, &effects, &index, 0.0, &settings);
        assert!(!verts.is_empty());
    }

    #[test]
    fn test_disabled_particles_are_not_drawn() {
        let mut settings = Settings::default();
        let (placements, index) = frame_at(0);
        let mut effects = EffectsManager::new(3);
        effects.spawn_particles(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 0);

        let mut drawer = SceneDrawer::new(3, &settings);
        let with = drawer.draw(&placements, &effects, &index, 0.0, &settings).len();
        settings.particles = false;
        let without = drawer.draw(&placements, &effects, &index, 0.0, &settings).len();
        assert!(without < with);
    }
}
