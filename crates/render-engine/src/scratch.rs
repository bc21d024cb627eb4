//! Fixed-capacity scratch arena.
//!
//! The modulation expander and the PCM adapters stage data through this
//! arena instead of allocating per block. Calls are serialized by the
//! engine's single-threaded contract, so the arena needs no locking, but
//! any operation that uses it is not reentrant.

use render_core::Sample;

/// Samples per scratch lane; also the PCM chunk size in frames.
pub const SCRATCH_SAMPLES: usize = 16384;

pub struct Scratch {
    curve: Box<[Sample]>,
    pcm: Box<[i16]>,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            curve: vec![0.0; SCRATCH_SAMPLES].into_boxed_slice(),
            pcm: vec![0; SCRATCH_SAMPLES].into_boxed_slice(),
        }
    }

    /// Float lane used for expanded modulation curves.
    pub fn curve_mut(&mut self) -> &mut [Sample] {
        &mut self.curve
    }

    /// Integer lane used for 16-bit PCM staging.
    pub fn pcm_mut(&mut self) -> &mut [i16] {
        &mut self.pcm
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}
