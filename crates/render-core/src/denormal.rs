//! Processor-level denormal suppression.
//!
//! The filters zap their inputs sample by sample; on top of that the engine
//! parks the thread's MXCSR in flush-to-zero/denormals-are-zero at startup,
//! so recursive tails from foreign DSP sharing the thread cannot stall the
//! pipeline either. The per-sample zap is what capture comparisons observe
//! and stays in place regardless of the processor mode.

/// FTZ and DAZ set, every exception masked.
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse"))]
const MXCSR_FLUSH_TO_ZERO: u32 = 0x9fc0;

/// Put the calling thread's floating-point unit in flush-to-zero mode.
///
/// Per-thread, idempotent, and a no-op on targets without an SSE control
/// register.
#[inline]
pub fn prevent_denormals() {
    #[cfg(all(target_arch = "x86_64", target_feature = "sse"))]
    #[allow(deprecated)]
    unsafe {
        core::arch::x86_64::_mm_setcsr(MXCSR_FLUSH_TO_ZERO);
    }

    #[cfg(all(target_arch = "x86", target_feature = "sse"))]
    #[allow(deprecated)]
    unsafe {
        core::arch::x86::_mm_setcsr(MXCSR_FLUSH_TO_ZERO);
    }
}
