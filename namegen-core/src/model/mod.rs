//! Statistical name model.
//!
//! - Weighted bags of tokens and the scaling transform (`bag`)
//! - The transition model and its two-phase build (`chain`)
//! - Name generation over a frozen chain (`sampler`)
//! - Per-call generation settings (`options`)

/// Weighted multisets: raw counters during learning, frozen scaled bags afterwards.
pub mod bag;

/// Transition model of a variant (`ChainBuilder` -> `Chain`).
///
/// Handles name ingestion, transition counting, parallel learning and freezing.
pub mod chain;

/// Draws names from a frozen `Chain` with an injected random source.
pub mod sampler;

/// Generation settings: duplicate avoidance and the missing-context policy.
pub mod options;
