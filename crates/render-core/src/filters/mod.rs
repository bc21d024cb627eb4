pub mod biquad;
pub mod one_pole;

pub use biquad::{biquad, BiquadCoefs};
pub use one_pole::{one_pole, OnePoleCoefs, OnePoleState};
