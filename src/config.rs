//! The configuration record spec §6 requires: the default boxed-buffer
//! capacity and the buffer growth function. No file, env, or CLI surface
//! backs this — spec is explicit that the engine has none — so this is a
//! plain `Copy` struct, the way the teacher crate keeps small fixed
//! tunables (e.g. the `epsilon` field of `build.rs`'s `Config`) as
//! literal struct fields rather than a parsed/dynamic configuration
//! layer.

/// Fixed-point growth factor used by [`EngineConfig::grow`], expressed as
/// a ratio so the growth policy needs no floating point at call sites.
/// 1.6 sits inside spec's required φ ≥ 1.5 range.
const GROWTH_NUMERATOR: usize = 8;
const GROWTH_DENOMINATOR: usize = 5;

/// Tunables the array engine consults when sizing buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default capacity for the boxed scratch buffer the builder starts
    /// in before its first `finish` (spec §6: `ARRAY_UNINITIALIZED_SIZE`).
    pub uninitialized_size: usize,
}

impl EngineConfig {
    /// `ARRAY_UNINITIALIZED_SIZE` default, per spec §6.
    pub const DEFAULT: EngineConfig = EngineConfig {
        uninitialized_size: 16,
    };

    /// `capacity(currentSize, requiredSize)` from spec §6: the next
    /// buffer size to allocate when a write falls outside the current
    /// capacity. Guarantees the result is at least `required`, and grows
    /// geometrically by the configured factor otherwise, giving
    /// amortised O(1) push as spec §4.1 requires.
    pub fn grow(self, current: usize, required: usize) -> usize {
        let geometric = current
            .saturating_mul(GROWTH_NUMERATOR)
            .saturating_div(GROWTH_DENOMINATOR)
            .max(current + 1);
        geometric.max(required)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
