//! Process-wide perceptual lookup tables.
//!
//! Two 8192-entry tables cover the full MIDI note range at 64 steps per
//! semitone and the gain range -128..+128 dB at 32 steps per dB. Both are
//! sized so that no interpolation is needed at lookup time. They are filled
//! once and read-only afterwards; [`warm`] forces the fill at startup so no
//! block ever pays for it.

use crate::common::Sample;
use lazy_static::lazy_static;

/// Entries per table: 128 notes x 64 steps, 256 dB x 32 steps.
pub const TABLE_LEN: usize = 8192;

lazy_static! {
    /// `NOTE_TO_FREQ[i]` is the frequency in Hz of MIDI note `i / 64`.
    /// Concert A: note 69 = 440 Hz.
    static ref NOTE_TO_FREQ: [Sample; TABLE_LEN] = {
        let mut table = [0.0; TABLE_LEN];
        for (i, slot) in table.iter_mut().enumerate() {
            let note = i as f64 / 64.0;
            *slot = (440.0 * 2.0_f64.powf((note - 69.0) / 12.0)) as Sample;
        }
        table
    };

    /// `DB_TO_POWER[i]` is the linear amplitude factor of `i / 32 - 128` dB.
    static ref DB_TO_POWER: [Sample; TABLE_LEN] = {
        let mut table = [0.0; TABLE_LEN];
        for (i, slot) in table.iter_mut().enumerate() {
            let db = i as f64 / 32.0 - 128.0;
            *slot = 10.0_f64.powf(db / 20.0) as Sample;
        }
        table
    };
}

/// Force both tables to be built now.
pub fn warm() {
    let _ = NOTE_TO_FREQ[0];
    let _ = DB_TO_POWER[0];
}

/// Frequency in Hz for a (fractional) MIDI note number.
///
/// Notes outside `[0, 128)` index outside the table and panic; range checks
/// belong to the layer above the block loop.
#[inline]
pub fn note_to_freq(note: Sample) -> Sample {
    NOTE_TO_FREQ[(note * 64.0) as usize]
}

/// Linear amplitude factor for a decibel gain in `[-128, +128)`.
#[inline]
pub fn db_to_power(db_gain: Sample) -> Sample {
    DB_TO_POWER[((db_gain * 32.0) as i32 + 4096) as usize]
}

/// Frequency ratio for a semitone shift: 1.0 at 0, 2.0 at +12.
#[inline]
pub fn shift_to_freq(shift: Sample) -> Sample {
    NOTE_TO_FREQ[((69.0 + shift) * 64.0) as usize] * (1.0 / 440.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32, tolerance: f32) {
        assert!(
            (actual - expected).abs() <= tolerance * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn note_table_matches_formula() {
        warm();
        for k in (0..TABLE_LEN).step_by(7) {
            let expected = (440.0 * 2.0_f64.powf((k as f64 / 64.0 - 69.0) / 12.0)) as f32;
            assert_close(NOTE_TO_FREQ[k], expected, 1.0e-4);
        }
    }

    #[test]
    fn power_table_matches_formula() {
        for k in (0..TABLE_LEN).step_by(7) {
            let expected = 10.0_f64.powf((k as f64 / 32.0 - 128.0) / 20.0) as f32;
            assert_close(DB_TO_POWER[k], expected, 1.0e-4);
        }
    }

    #[test]
    fn concert_pitch_and_octave() {
        assert_close(note_to_freq(69.0), 440.0, 1.0e-4);
        assert_close(note_to_freq(81.0), 880.0, 1.0e-4);
        assert_close(note_to_freq(57.0), 220.0, 1.0e-4);
    }

    #[test]
    fn unity_and_half_gain() {
        assert_close(db_to_power(0.0), 1.0, 1.0e-4);
        assert_close(db_to_power(-6.0), 0.5012, 1.0e-3);
        assert_close(db_to_power(-20.0), 0.1, 1.0e-4);
    }

    #[test]
    fn shift_ratios() {
        assert_close(shift_to_freq(0.0), 1.0, 1.0e-4);
        assert_close(shift_to_freq(12.0), 2.0, 1.0e-4);
        assert_close(shift_to_freq(-12.0), 0.5, 1.0e-4);
    }
}
