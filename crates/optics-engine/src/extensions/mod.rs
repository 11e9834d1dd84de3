// extensions/mod.rs
//
// Optional animation helpers. The session works without them; hosts opt in by
// ticking them from their frame loop.

pub mod easing;
pub mod sweep;

pub use easing::{ease, lerp, Easing};
pub use sweep::{ObjectSweep, DEFAULT_SWEEP_SECONDS};
