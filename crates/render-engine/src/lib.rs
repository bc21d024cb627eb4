// =============================================================================
// Render Engine
// =============================================================================
//
// Host-facing layer over the `render-core` DSP primitives. The engine owns
// all sample memory (the host addresses it through opaque handles), a
// fixed-capacity scratch arena shared by the modulation expander and the
// PCM adapters, and the registry of stable operation names that is handed
// to the host bridge at startup.
//
// The engine is single-threaded by contract: one call at a time, each
// running to completion on the caller's thread. Nothing here locks.
//
// ## Module Organization
//
// - `pool` - Handle-addressed sample memory
// - `scratch` - Process-wide scratch arena (not reentrant)
// - `registry` - Operation name table
// - `engine` - Typed entry points, one per operation
// - `dispatch` - JSON tuple dispatch for untyped host bridges

pub mod dispatch;
pub mod engine;
pub mod pool;
pub mod registry;
pub mod scratch;

pub use engine::Engine;
pub use pool::{Handle, NULL_HANDLE};
pub use registry::{operations, Op};

/// One-shot startup: build an engine (which fills the lookup tables and
/// sets the thread's denormal mode) and hand the registry table to the
/// host bridge. The table is static; the names in it never change.
pub fn init() -> (Engine, &'static [Op]) {
    (Engine::new(), registry::operations())
}

// Settings records cross the host boundary as-is; re-export them so a
// bridge only needs this crate.
pub use render_core::{
    BiquadCoefs, CurvePoint, DelaySettings, OnePoleCoefs, OnePoleState, Sample, WavetableSettings,
};
