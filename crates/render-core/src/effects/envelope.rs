//! Gain envelope driven by a dB modulation curve.

use crate::common::Sample;
use crate::curve::{expand_curve, CurvePoint};
use crate::tables::db_to_power;

/// Apply a dB-valued curve segment to the buffer.
///
/// The segment is expanded into `scratch` (one value per sample in `buf`,
/// so a stereo block sweeps the curve across interleaved samples) and each
/// sample is scaled by the linear gain of its curve value. `scratch` must
/// be at least as long as `buf`; curve values must stay inside the
/// -128..+128 dB table range.
pub fn envelope(buf: &mut [Sample], point: &CurvePoint, scratch: &mut [Sample]) {
    let curve = &mut scratch[..buf.len()];
    expand_curve(point, curve);
    for (slot, &db) in buf.iter_mut().zip(curve.iter()) {
        *slot *= db_to_power(db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_zero_curve_is_unity_gain() {
        let mut buf = [0.5, -0.25, 1.0, -1.0];
        let mut scratch = [0.0; 8];
        envelope(&mut buf, &CurvePoint::constant(0.0), &mut scratch);
        assert_eq!(buf, [0.5, -0.25, 1.0, -1.0]);
    }

    #[test]
    fn constant_attenuation_tracks_the_table() {
        let mut buf = [1.0; 4];
        let mut scratch = [0.0; 4];
        envelope(&mut buf, &CurvePoint::constant(-6.0), &mut scratch);
        let gain = db_to_power(-6.0);
        assert!(buf.iter().all(|&v| v == gain));
        assert!((gain - 0.5012).abs() < 1.0e-3);
    }

    #[test]
    fn fade_out_is_monotone() {
        let mut buf = [1.0; 64];
        let mut scratch = [0.0; 64];
        envelope(&mut buf, &CurvePoint::line(0.0, -60.0), &mut scratch);
        for pair in buf.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert_eq!(buf[0], 1.0);
        assert!(buf[63] < 0.01);
    }
}
