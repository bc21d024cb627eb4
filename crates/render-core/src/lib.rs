// =============================================================================
// Render Core Library
// =============================================================================
//
// Buffer-level DSP primitives for the 44.1 kHz block render engine. All
// operations work on interleaved f32 sample slices, run to completion on the
// caller's thread, and allocate nothing on the processing path. State that
// must survive between blocks (filter delay lines, oscillator phase, echo
// rings) is owned by the caller and passed in by mutable reference.
//
// ## Module Organization
//
// - `common` - Shared types (Sample), interpolation kernels, rate constants
// - `tables` - Precomputed note-to-frequency and dB-to-gain lookup tables
// - `curve` - Control-point segment expansion for block-rate modulation
// - `buffer_ops` - Fill, copy, gain, mix, pan-mix, multiply
// - `convert` - Rate and channel normalization to 44.1 kHz stereo
// - Oscillators: looping wavetable scan, curve-driven one-shot scan
// - Filters: direct-form I biquad, one-pole
// - Effects: feedback delay, dB envelope, overdrive/clip/normalize
// - `pcm` - Raw float and 16-bit PCM byte adapters
// - `denormal` - Optional processor-level denormal suppression

pub mod buffer_ops;
pub mod common;
pub mod convert;
pub mod curve;
pub mod denormal;
pub mod effects;
pub mod filters;
pub mod oscillators;
pub mod pcm;
pub mod tables;

// Re-export common types at crate root for convenience
pub use common::{cubic, lerp, Sample, TARGET_RATE};
pub use curve::CurvePoint;
pub use effects::delay::DelaySettings;
pub use filters::biquad::BiquadCoefs;
pub use filters::one_pole::{OnePoleCoefs, OnePoleState};
pub use oscillators::wavetable::WavetableSettings;
pub use tables::{db_to_power, note_to_freq, shift_to_freq};
