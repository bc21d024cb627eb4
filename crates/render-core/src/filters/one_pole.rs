//! One-pole IIR section.

use crate::common::{zap, Sample};
use serde::{Deserialize, Serialize};

/// Coefficients for the recurrence `y = a0*x + a1*x' + b1*y'`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct OnePoleCoefs {
    pub a0: f64,
    pub a1: f64,
    pub b1: f64,
}

/// Previous input and output per channel, read before the block and written
/// back after it. Mono voices use the left pair only.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct OnePoleState {
    pub lx: Sample,
    pub ly: Sample,
    pub rx: Sample,
    pub ry: Sample,
}

/// Filter `buf` in place through a one-pole section.
pub fn one_pole(
    buf: &mut [Sample],
    channels: usize,
    coefs: &OnePoleCoefs,
    state: &mut OnePoleState,
) {
    let a0 = coefs.a0 as Sample;
    let a1 = coefs.a1 as Sample;
    let b1 = coefs.b1 as Sample;

    if channels == 1 {
        let mut x1 = state.lx;
        let mut y1 = state.ly;
        for slot in buf.iter_mut() {
            let x = zap(*slot);
            let y = x * a0 + x1 * a1 + y1 * b1;
            x1 = x;
            y1 = y;
            *slot = y;
        }
        state.lx = x1;
        state.ly = y1;
    } else {
        let mut lx1 = state.lx;
        let mut ly1 = state.ly;
        let mut rx1 = state.rx;
        let mut ry1 = state.ry;
        for frame in buf.chunks_exact_mut(2) {
            let lx = zap(frame[0]);
            let ly = lx * a0 + lx1 * a1 + ly1 * b1;
            lx1 = lx;
            ly1 = ly;
            frame[0] = ly;

            let rx = zap(frame[1]);
            let ry = rx * a0 + rx1 * a1 + ry1 * b1;
            rx1 = rx;
            ry1 = ry;
            frame[1] = ry;
        }
        state.lx = lx1;
        state.ly = ly1;
        state.rx = rx1;
        state.ry = ry1;
    }
}
