//! Time-bounded visual effects
//!
//! Three independent pools advanced once per frame on the same monotonic
//! clock as the scene: resource particles, body-anchored hit markers, and a
//! single screen shake impulse. Every lifetime is an absolute expiry
//! compared against the injected clock (markers, shake) or a frame count
//! (particles), and every pool is capacity-bounded: too many effects means
//! dropped spawns, never unbounded growth.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{
    HIT_MARKER_DURATION_MS, MAX_HIT_MARKERS, MAX_PARTICLES, PARTICLE_LIFETIME_FRAMES, SHAKE_DECAY,
};
use crate::scene::config::{BodyId, MAX_TIER};
use crate::scene::placement::ScenePlacements;

/// Particle tint per civilization tier
pub const TIER_COLORS: [[f32; 3]; 5] = [
    [0.984, 0.749, 0.141],
    [0.0, 0.851, 1.0],
    [0.659, 0.333, 0.969],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// A resource mote flying from a strike point toward the counter
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tier: u8,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }

    pub fn size(&self) -> f32 {
        3.0 + self.tier as f32 * 0.5
    }

    pub fn color(&self) -> [f32; 3] {
        TIER_COLORS[(self.tier.min(MAX_TIER)) as usize]
    }
}

/// An impact flash pinned to a body, tracking it as the camera interpolates
#[derive(Debug, Clone, Copy)]
pub struct HitMarker {
    pub body: BodyId,
    /// Strike offset from the body center at spawn time
    pub offset: Vec2,
    /// Body radius at spawn time, for offset rescaling
    pub spawn_radius: f32,
    pub born_ms: f64,
    pub duration_ms: f64,
    pub amount: u64,
}

/// Per-frame resolved marker geometry
#[derive(Debug, Clone, Copy)]
pub struct MarkerFrame {
    pub center: Vec2,
    pub body_radius: f32,
    pub ring_radius: f32,
    pub flash_radius: f32,
    pub alpha: f32,
    pub amount: u64,
    /// Label anchor above the body
    pub label_pos: Vec2,
}

impl HitMarker {
    /// Resolve against the body's live placement. The original offset
    /// scales with how much the body's radius changed since spawn, so the
    /// marker stays visually attached through tier blends.
    pub fn resolve(&self, now_ms: f64, placements: &ScenePlacements) -> Option<MarkerFrame> {
        let body = placements.body(self.body)?;
        let t = ((now_ms - self.born_ms) / self.duration_ms) as f32;
        if !(0.0..1.0).contains(&t) {
            return None;
        }
        let scale = body.radius / self.spawn_radius.max(1.0);
        let center = body.center + self.offset * scale;
        Some(MarkerFrame {
            center,
            body_radius: body.radius,
            ring_radius: body.radius * (0.35 + 0.85 * t),
            flash_radius: (body.radius * (0.32 + 0.28 * t)).max(2.0),
            alpha: 1.0 - t,
            amount: self.amount,
            label_pos: Vec2::new(center.x, center.y - body.radius * (0.75 + 0.35 * t)),
        })
    }
}

/// Screen shake: a single magnitude with an absolute expiry. Triggers
/// max-merge rather than stack, so the strongest or latest impulse wins.
#[derive(Debug, Clone, Copy, Default)]
struct ShakeImpulse {
    magnitude: f32,
    until_ms: f64,
}

#[derive(Debug, Clone)]
pub struct EffectsManager {
    particles: Vec<Particle>,
    markers: Vec<HitMarker>,
    shake: ShakeImpulse,
    shake_offset: Vec2,
    rng: Pcg32,
}

impl EffectsManager {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            markers: Vec::with_capacity(MAX_HIT_MARKERS),
            shake: ShakeImpulse::default(),
            shake_offset: Vec2::ZERO,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn a burst aimed at a fixed target point. Burst size grows with
    /// the tier. Once the pool is over capacity the whole burst is dropped:
    /// missed sparkle beats unbounded render cost.
    pub fn spawn_particles(&mut self, from: Vec2, to: Vec2, tier: u8) {
        if self.particles.len() > MAX_PARTICLES {
            return;
        }
        let count = 1 + (tier as usize * 3) / 10;
        let vel = (to - from) / PARTICLE_LIFETIME_FRAMES as f32;
        for _ in 0..count {
            self.particles.push(Particle {
                pos: from,
                vel,
                tier,
                life: PARTICLE_LIFETIME_FRAMES,
                max_life: PARTICLE_LIFETIME_FRAMES,
            });
        }
    }

    /// Pin an impact marker to a body at the strike point. Ignored when the
    /// body has no placement this frame; oldest marker evicted at capacity.
    pub fn spawn_marker(
        &mut self,
        body: BodyId,
        at: Vec2,
        amount: u64,
        now_ms: f64,
        placements: &ScenePlacements,
    ) {
        let Some(p) = placements.body(body) else {
            return;
        };
        if self.markers.len() >= MAX_HIT_MARKERS {
            self.markers.remove(0);
        }
        self.markers.push(HitMarker {
            body,
            offset: at - p.center,
            spawn_radius: p.radius.max(10.0),
            born_ms: now_ms,
            duration_ms: HIT_MARKER_DURATION_MS,
            amount,
        });
    }

    pub fn trigger_shake(&mut self, magnitude: f32, duration_ms: f64, now_ms: f64) {
        self.shake.magnitude = self.shake.magnitude.max(magnitude);
        self.shake.until_ms = self.shake.until_ms.max(now_ms + duration_ms);
    }

    /// Advance all pools by one frame
    pub fn advance(&mut self, now_ms: f64, placements: &ScenePlacements) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);

        self.markers.retain(|m| {
            now_ms - m.born_ms < m.duration_ms && placements.body(m.body).is_some()
        });

        if now_ms < self.shake.until_ms && self.shake.magnitude > 0.0 {
            let mag = self.shake.magnitude;
            self.shake_offset = Vec2::new(
                self.rng.random_range(-1.0..1.0) * mag,
                self.rng.random_range(-1.0..1.0) * mag,
            );
            self.shake.magnitude *= SHAKE_DECAY;
        } else {
            self.shake_offset = Vec2::ZERO;
            self.shake.magnitude = 0.0;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn markers(&self) -> &[HitMarker] {
        &self.markers
    }

    /// Randomized displacement to apply to the whole scene this frame
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::{TierTable, Viewport};
    use crate::scene::placement::solve;
    use crate::scene::transition::TransitionController;

    fn placements_at(tier: u8) -> ScenePlacements {
        let table = TierTable::standard();
        let sample = TransitionController::new(&table, tier).sample(&table, 0.0);
        solve(&table, &sample, 0.0, &Viewport::new(1280.0, 800.0))
    }

    #[test]
    fn test_particle_lifetime_in_frames() {
        let placements = placements_at(0);
        let mut fx = EffectsManager::new(7);
        fx.spawn_particles(Vec2::new(100.0, 100.0), Vec2::new(600.0, 40.0), 0);
        assert_eq!(fx.particles().len(), 1);

        for _ in 0..49 {
            fx.advance(0.0, &placements);
        }
        assert_eq!(fx.particles().len(), 1, "alive at frame 49");

        fx.advance(0.0, &placements);
        fx.advance(0.0, &placements);
        assert!(fx.particles().is_empty(), "gone by frame 51");
    }

    #[test]
    fn test_particle_flies_toward_target() {
        let placements = placements_at(0);
        let mut fx = EffectsManager::new(7);
        let from = Vec2::new(100.0, 500.0);
        let to = Vec2::new(600.0, 40.0);
        fx.spawn_particles(from, to, 2);
        for _ in 0..PARTICLE_LIFETIME_FRAMES - 1 {
            fx.advance(0.0, &placements);
        }
        let p = fx.particles()[0];
        // One step short of the target after life - 1 integrations
        assert!((p.pos - to).length() < (to - from).length() / 40.0);
    }

    #[test]
    fn test_burst_size_scales_with_tier() {
        let mut fx = EffectsManager::new(7);
        fx.spawn_particles(Vec2::ZERO, Vec2::ONE, 0);
        assert_eq!(fx.particles().len(), 1);
        fx.spawn_particles(Vec2::ZERO, Vec2::ONE, 4);
        assert_eq!(fx.particles().len(), 3, "tier 4 bursts carry 2 motes");
    }

    #[test]
    fn test_particle_ceiling_drops_whole_burst() {
        let mut fx = EffectsManager::new(7);
        for _ in 0..=MAX_PARTICLES {
            fx.spawn_particles(Vec2::ZERO, Vec2::ONE, 0);
        }
        let at_cap = fx.particles().len();
        fx.spawn_particles(Vec2::ZERO, Vec2::ONE, 4);
        assert_eq!(fx.particles().len(), at_cap, "burst over the ceiling is dropped");
    }

    #[test]
    fn test_marker_tracks_live_placement() {
        let table = TierTable::standard();
        let vp = Viewport::new(1280.0, 800.0);
        let mut tc = TransitionController::new(&table, 0);
        let start = solve(&table, &tc.sample(&table, 0.0), 0.0, &vp);
        let earth0 = *start.body(BodyId::Earth).unwrap();

        let mut fx = EffectsManager::new(7);
        let strike = earth0.center + Vec2::new(earth0.radius * 0.5, 0.0);
        fx.spawn_marker(BodyId::Earth, strike, 12, 0.0, &start);

        // Mid-transition the earth shrinks; the marker offset shrinks with
        // the radius ratio
        tc.request_tier(&table, 1, 0.0);
        let mid = solve(&table, &tc.sample(&table, 100.0), 0.0, &vp);
        let earth_mid = *mid.body(BodyId::Earth).unwrap();

        let frame = fx.markers()[0].resolve(100.0, &mid).expect("resolvable");
        let expected = earth_mid.center
            + (strike - earth0.center) * (earth_mid.radius / earth0.radius);
        assert!((frame.center - expected).length() < 1e-3);
        assert!(frame.alpha > 0.0 && frame.alpha < 1.0);
    }

    #[test]
    fn test_marker_dies_with_its_anchor() {
        let start = placements_at(0);
        let mut fx = EffectsManager::new(7);
        let earth = start.body(BodyId::Earth).unwrap();
        fx.spawn_marker(BodyId::Earth, earth.center, 5, 0.0, &start);
        assert_eq!(fx.markers().len(), 1);

        // At tier 4 the earth has no placement at all
        let empty = placements_at(4);
        fx.advance(10.0, &empty);
        assert!(fx.markers().is_empty());
    }

    #[test]
    fn test_marker_expires_by_clock() {
        let placements = placements_at(0);
        let mut fx = EffectsManager::new(7);
        let earth = placements.body(BodyId::Earth).unwrap();
        fx.spawn_marker(BodyId::Earth, earth.center, 5, 1000.0, &placements);

        fx.advance(1000.0 + HIT_MARKER_DURATION_MS - 1.0, &placements);
        assert_eq!(fx.markers().len(), 1);
        fx.advance(1000.0 + HIT_MARKER_DURATION_MS, &placements);
        assert!(fx.markers().is_empty());
    }

    #[test]
    fn test_marker_pool_evicts_oldest() {
        let placements = placements_at(0);
        let mut fx = EffectsManager::new(7);
        let earth = placements.body(BodyId::Earth).unwrap();
        for i in 0..MAX_HIT_MARKERS + 3 {
            fx.spawn_marker(BodyId::Earth, earth.center, i as u64, i as f64, &placements);
        }
        assert_eq!(fx.markers().len(), MAX_HIT_MARKERS);
        assert_eq!(fx.markers()[0].amount, 3, "three oldest evicted");
    }

    #[test]
    fn test_shake_max_merges_and_expires() {
        let placements = placements_at(0);
        let mut fx = EffectsManager::new(7);
        fx.trigger_shake(6.0, 90.0, 0.0);
        fx.trigger_shake(3.0, 30.0, 0.0);

        fx.advance(10.0, &placements);
        let off = fx.shake_offset();
        assert!(off.x.abs() <= 6.0 && off.y.abs() <= 6.0);
        assert!(off != Vec2::ZERO);

        fx.advance(91.0, &placements);
        assert_eq!(fx.shake_offset(), Vec2::ZERO);
        // A later trigger starts fresh rather than inheriting decay
        fx.trigger_shake(4.0, 50.0, 100.0);
        fx.advance(110.0, &placements);
        assert!(fx.shake_offset() != Vec2::ZERO);
    }

    #[test]
    fn test_shake_is_deterministic_per_seed() {
        let placements = placements_at(0);
        let mut a = EffectsManager::new(42);
        let mut b = EffectsManager::new(42);
        a.trigger_shake(6.0, 90.0, 0.0);
        b.trigger_shake(6.0, 90.0, 0.0);
        for i in 0..5 {
            a.advance(i as f64 * 16.0, &placements);
            b.advance(i as f64 * 16.0, &placements);
            assert_eq!(a.shake_offset(), b.shake_offset());
        }
    }
}
