//! External collaborator interfaces
//!
//! The scene core reads progression state through these traits instead of
//! probing for globals. An absent collaborator is a typed `None`, never a
//! runtime lookup.

use crate::scene::config::{BodyId, SlotKind};

/// Read-only view of game progression, consulted once per frame
pub trait ProgressionSource {
    /// Current committed civilization tier
    fn committed_tier(&self) -> u8;

    /// Whether a body accepts pointer strikes. Locked bodies are drawn but
    /// never hit-testable.
    fn is_unlocked(&self, body: BodyId) -> bool;

    /// External per-body yield multiplier for strike gains
    fn click_multiplier(&self, body: BodyId) -> f32 {
        let _ = body;
        1.0
    }
}

/// Optional provider of build-slot assignments, rendered as hotspots around
/// their host body
pub trait SlotSource {
    /// Ordered slot contents for a body; `None` entries are open slots
    fn assignments(&self, body: BodyId) -> Vec<Option<SlotKind>>;

    /// Whether the host body's slots are available at all
    fn is_host_unlocked(&self, body: BodyId) -> bool;
}
