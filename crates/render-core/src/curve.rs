//! Block-rate modulation curves.
//!
//! Modulation shapes are authored as cubic segments, roughly one control
//! point per block, and expanded into a per-sample curve right before use.

use crate::common::{cubic, lerp, Sample};
use serde::{Deserialize, Serialize};

/// One segment of a modulation spline.
///
/// `y1` and `y2` are the segment endpoints; `y0` and `y3` are the neighbor
/// points that bend the curve. Field names are part of the host contract.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct CurvePoint {
    pub y0: f64,
    pub y1: f64,
    pub y2: f64,
    pub y3: f64,
}

impl CurvePoint {
    /// A segment that holds a single value.
    pub fn constant(value: f64) -> Self {
        Self {
            y0: value,
            y1: value,
            y2: value,
            y3: value,
        }
    }

    /// A straight segment from `from` to `to`.
    pub fn line(from: f64, to: f64) -> Self {
        Self {
            y0: from,
            y1: from,
            y2: to,
            y3: to,
        }
    }
}

/// Expand `point` into `out`, one curve value per output sample.
///
/// Degenerate segments take cheaper paths: an all-zero segment is a fill,
/// an all-equal segment is a constant fill, and a segment whose neighbors
/// coincide with its endpoints is a straight line.
pub fn expand_curve(point: &CurvePoint, out: &mut [Sample]) {
    if out.is_empty() {
        return;
    }
    let y0 = point.y0 as Sample;
    let y1 = point.y1 as Sample;
    let y2 = point.y2 as Sample;
    let y3 = point.y3 as Sample;
    let incr = 1.0 / out.len() as Sample;

    if y0 == 0.0 && y1 == 0.0 && y2 == 0.0 && y3 == 0.0 {
        out.fill(0.0);
    } else if y0 == y1 && y1 == y2 && y2 == y3 {
        out.fill(y1);
    } else if y0 == y1 && y2 == y3 {
        let mut p = 0.0;
        for slot in out.iter_mut() {
            *slot = lerp(y1, y2, p);
            p += incr;
        }
    } else {
        let mut p = 0.0;
        for slot in out.iter_mut() {
            *slot = cubic(y0, y1, y2, y3, p);
            p += incr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_segment_fills_zero() {
        let mut out = [1.0; 64];
        expand_curve(&CurvePoint::constant(0.0), &mut out);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn constant_segment_fills_value() {
        let mut out = [0.0; 64];
        expand_curve(&CurvePoint::constant(-12.0), &mut out);
        assert!(out.iter().all(|&v| v == -12.0));
    }

    #[test]
    fn linear_segment_steps_evenly() {
        let mut out = [0.0; 4];
        expand_curve(&CurvePoint::line(0.0, 1.0), &mut out);
        assert_eq!(out, [0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn cubic_segment_starts_at_y1() {
        let point = CurvePoint {
            y0: -1.0,
            y1: 0.0,
            y2: 1.0,
            y3: 3.0,
        };
        let mut out = [0.0; 8];
        expand_curve(&point, &mut out);
        assert_eq!(out[0], 0.0);
        // the curve bends, so the midpoint is off the straight line
        assert!((out[4] - 0.5).abs() > 1.0e-3);
    }
}
