pub mod wavetable;

pub use wavetable::{wave_mod_in, wavetable_in, WavetableSettings};
