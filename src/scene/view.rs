//! Scale view orchestrator
//!
//! Owns the controllers, the solver output, the hit index and the effect
//! pools, and advances them in a fixed order once per frame:
//! sample transition and rollback, solve placements, rebuild the hit index,
//! hand the snapshot to the renderer, advance effects. Pointer queries run
//! between frames against the most recently built index, so input and
//! rendering always agree on geometry.

use glam::Vec2;

use crate::consts::TIER_ADVANCE_LOCK_MS;
use crate::effects::EffectsManager;
use crate::scene::config::{BodyId, TierTable, Viewport};
use crate::scene::hit_test::{HitTestIndex, HotRegion};
use crate::scene::placement::{solve, Placement, ScenePlacements};
use crate::scene::rollback::RollbackController;
use crate::scene::sources::{ProgressionSource, SlotSource};
use crate::scene::transition::TransitionController;

pub struct ScaleView {
    table: TierTable,
    transition: TransitionController,
    rollback: RollbackController,
    hit_index: HitTestIndex,
    effects: EffectsManager,
    placements: ScenePlacements,
    committed_tier: u8,
    coarse_pointer: bool,
}

impl ScaleView {
    pub fn new(table: TierTable, initial_tier: u8, coarse_pointer: bool, effects_seed: u64) -> Self {
        let initial_tier = initial_tier.min(table.max_tier());
        let mut transition = TransitionController::new(&table, initial_tier);
        let placements = solve(
            &table,
            &transition.sample(&table, 0.0),
            0.0,
            &Viewport::new(1280.0, 800.0),
        );
        Self {
            table,
            transition,
            rollback: RollbackController::new(),
            hit_index: HitTestIndex::new(),
            effects: EffectsManager::new(effects_seed),
            placements,
            committed_tier: initial_tier,
            coarse_pointer,
        }
    }

    /// Committed tier as last observed
    pub fn committed_tier(&self) -> u8 {
        self.committed_tier
    }

    /// Progression notified us of a tier change. Starts the eased scene
    /// transition; an advance also locks the rollback camera so it cannot
    /// be pulled straight back into the level just left.
    pub fn on_tier_changed(&mut self, new_tier: u8, now_ms: f64) {
        let new_tier = new_tier.min(self.table.max_tier());
        if new_tier == self.committed_tier {
            return;
        }
        if new_tier > self.committed_tier {
            self.rollback.lock(now_ms, TIER_ADVANCE_LOCK_MS);
        }
        log::info!("committed tier {} -> {}", self.committed_tier, new_tier);
        self.committed_tier = new_tier;
        self.transition.request_tier(&self.table, new_tier, now_ms);
    }

    /// Advance one frame and return the placements the renderer should
    /// draw. Fixed sequence: controllers, solver, hit index, effects.
    pub fn frame(
        &mut self,
        now_ms: f64,
        viewport: &Viewport,
        progression: &dyn ProgressionSource,
        slots: Option<&dyn SlotSource>,
    ) -> &ScenePlacements {
        self.on_tier_changed(progression.committed_tier(), now_ms);

        let sample = self.transition.sample(&self.table, now_ms);
        self.rollback.tick(sample.in_flight);

        self.placements = solve(&self.table, &sample, self.rollback.offset(), viewport);
        self.hit_index
            .rebuild(&self.placements, progression, slots, self.coarse_pointer);
        self.effects.advance(now_ms, &self.placements);
        &self.placements
    }

    /// Resolve a pointer-down against the most recently built index
    pub fn pointer_down(&self, point: Vec2) -> Option<HotRegion> {
        self.hit_index.query_point(point).copied()
    }

    /// Current screen placement of a body, for overlay subsystems
    pub fn body_placement(&self, id: BodyId) -> Option<Placement> {
        self.placements.body(id).copied()
    }

    /// Wheel / pinch input: positive pulls further back in time
    pub fn nudge_rollback(&mut self, delta: f32, now_ms: f64) {
        self.rollback
            .nudge_target(delta, self.committed_tier as f32, now_ms);
    }

    /// Double-activation gesture: return to the committed tier
    pub fn reset_rollback(&mut self) {
        self.rollback.reset();
    }

    /// Hold the camera at the committed tier for a while (used by story
    /// beats and dialogs that want the viewer's attention)
    pub fn lock_rollback(&mut self, now_ms: f64, duration_ms: f64) {
        self.rollback.lock(now_ms, duration_ms);
    }

    pub fn rollback_offset(&self) -> f32 {
        self.rollback.offset()
    }

    pub fn spawn_particles(&mut self, from: Vec2, to: Vec2) {
        self.effects.spawn_particles(from, to, self.committed_tier);
    }

    pub fn spawn_marker(&mut self, body: BodyId, at: Vec2, amount: u64, now_ms: f64) {
        let placements = &self.placements;
        self.effects.spawn_marker(body, at, amount, now_ms, placements);
    }

    pub fn trigger_shake(&mut self, magnitude: f32, duration_ms: f64, now_ms: f64) {
        self.effects.trigger_shake(magnitude, duration_ms, now_ms);
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.effects.shake_offset()
    }

    pub fn placements(&self) -> &ScenePlacements {
        &self.placements
    }

    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    pub fn hit_index(&self) -> &HitTestIndex {
        &self.hit_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRANSITION_DURATION_MS;
    use crate::scene::config::SlotKind;
    use crate::scene::hit_test::RegionPayload;

    struct Game {
        tier: u8,
    }

    impl ProgressionSource for Game {
        fn committed_tier(&self) -> u8 {
            self.tier
        }
        fn is_unlocked(&self, _body: BodyId) -> bool {
            true
        }
    }

    struct OneEarthSlot;
    impl SlotSource for OneEarthSlot {
        fn assignments(&self, body: BodyId) -> Vec<Option<SlotKind>> {
            if body == BodyId::Earth {
                vec![Some(SlotKind::EnergyStation)]
            } else {
                Vec::new()
            }
        }
        fn is_host_unlocked(&self, _body: BodyId) -> bool {
            true
        }
    }

    fn view() -> ScaleView {
        ScaleView::new(TierTable::standard(), 0, false, 1234)
    }

    #[test]
    fn test_tier_advance_blends_home_body_radius() {
        let mut view = view();
        let vp = Viewport::new(1280.0, 800.0);
        let game = Game { tier: 0 };

        view.frame(0.0, &vp, &game, None);
        let r0 = view.body_placement(BodyId::Earth).unwrap().radius;

        let game = Game { tier: 1 };
        view.frame(16.0, &vp, &game, None);

        // Half way through: strictly between the endpoint radii
        view.frame(16.0 + 1500.0, &vp, &game, None);
        let mid = view.body_placement(BodyId::Earth).unwrap().radius;
        let table = TierTable::standard();
        let r1 = table.get(1).earth.rf * vp.min_dim();
        assert!(mid < r0 && mid > r1);

        // Monotone approach to the tier 1 radius
        let mut prev = mid;
        for ms in [2100.0, 2600.0, 2900.0] {
            view.frame(16.0 + ms, &vp, &game, None);
            let r = view.body_placement(BodyId::Earth).unwrap().radius;
            assert!(r < prev);
            prev = r;
        }

        view.frame(16.0 + TRANSITION_DURATION_MS, &vp, &game, None);
        assert_eq!(view.body_placement(BodyId::Earth).unwrap().radius, r1);
    }

    #[test]
    fn test_rollback_preview_converges_without_changing_tier() {
        let mut view = view();
        let vp = Viewport::new(1280.0, 800.0);
        let game = Game { tier: 2 };

        // Settle the double transition to tier 2
        let mut now = 0.0;
        for _ in 0..400 {
            now += 16.0;
            view.frame(now, &vp, &game, None);
        }
        assert_eq!(view.committed_tier(), 2);

        // Pull back one and a half tiers; the lock from the tier advance
        // has long expired
        view.nudge_rollback(1.5, now);
        for _ in 0..400 {
            now += 16.0;
            view.frame(now, &vp, &game, None);
        }
        assert!((view.rollback_offset() - 1.5).abs() < 1e-3);
        assert_eq!(view.committed_tier(), 2, "game state untouched");

        // A body present only from tier 1 renders partially faded
        let venus = view.body_placement(BodyId::Venus).expect("venus visible");
        assert!(venus.alpha > 0.0 && venus.alpha < 1.0);
    }

    #[test]
    fn test_tier_advance_locks_rollback() {
        let mut view = view();
        let vp = Viewport::new(1280.0, 800.0);

        view.frame(0.0, &vp, &Game { tier: 1 }, None);
        // Locked: pulling back right after the advance does nothing
        view.nudge_rollback(1.0, 100.0);
        for i in 0..10 {
            view.frame(100.0 + i as f64 * 16.0, &vp, &Game { tier: 1 }, None);
        }
        assert!(view.rollback_offset() < 0.05);

        // After the lock expires the same gesture works
        let later = 100.0 + TIER_ADVANCE_LOCK_MS + TRANSITION_DURATION_MS;
        view.nudge_rollback(1.0, later);
        let mut now = later;
        for _ in 0..200 {
            now += 16.0;
            view.frame(now, &vp, &Game { tier: 1 }, None);
        }
        assert!(view.rollback_offset() > 0.9);
    }

    #[test]
    fn test_pointer_dispatch_after_frame() {
        let mut view = view();
        let vp = Viewport::new(1280.0, 800.0);
        let game = Game { tier: 0 };
        view.frame(0.0, &vp, &game, Some(&OneEarthSlot));

        let earth = view.body_placement(BodyId::Earth).unwrap();
        // The lone spiral slot sits near the disc center and wins priority
        let slot_hit = view.pointer_down(view.hit_index().slot_regions()[0].center);
        assert!(matches!(
            slot_hit.unwrap().payload,
            RegionPayload::Slot(Some(SlotKind::EnergyStation))
        ));

        // A point near the rim hits the body itself
        let rim = earth.center + Vec2::new(earth.radius * 0.95, 0.0);
        let body_hit = view.pointer_down(rim).expect("earth hit");
        assert_eq!(body_hit.owner, BodyId::Earth);
        assert_eq!(body_hit.payload, RegionPayload::Body);

        // Far corner hits nothing
        assert!(view.pointer_down(Vec2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_marker_spawned_via_view_follows_body() {
        let mut view = view();
        let vp = Viewport::new(1280.0, 800.0);
        let game = Game { tier: 0 };
        view.frame(0.0, &vp, &game, None);

        let earth = view.body_placement(BodyId::Earth).unwrap();
        view.spawn_marker(BodyId::Earth, earth.center, 42, 0.0);
        assert_eq!(view.effects().markers().len(), 1);

        view.frame(100.0, &vp, &game, None);
        let frame = view.effects().markers()[0]
            .resolve(100.0, view.placements())
            .expect("marker alive at 100ms");
        assert_eq!(frame.amount, 42);
    }
}
