//! Deterministic scene core
//!
//! Everything needed to turn (committed tier, rollback offset, clock,
//! viewport) into concrete screen-space placements and hit regions.
//! This module must stay pure and platform-free:
//! - Explicit clock parameters only (no global time reads)
//! - Immutable tier layout data shared by reference
//! - Placements and hit regions rebuilt from scratch every frame
//! - No rendering or DOM dependencies

pub mod config;
pub mod placement;
pub mod rollback;
pub mod sources;
pub mod transition;
pub mod view;

pub use config::{BodyId, BodySpec, SlotKind, TierConfig, TierTable, Viewport, MAX_TIER, TIER_COUNT};
pub use hit_test::{HitTestIndex, HotRegion, RegionPayload};
pub use placement::{
    solve, CentauriPlacement, Placement, RollbackHint, ScenePlacements, SunPlacement,
};
pub use rollback::RollbackController;
pub use sources::{ProgressionSource, SlotSource};
pub use transition::{TransitionController, TransitionSample};
pub use view::ScaleView;
