//! Typed entry points over the pool and scratch arena.
//!
//! One method per registry operation. Methods fetch the block slices from
//! the pool, validate just enough to keep slice access in bounds, and hand
//! off to the `render-core` primitives; numerical validation stays with the
//! host. Every method runs to completion on the caller's thread.

use crate::pool::{BufferPool, Handle};
use crate::scratch::Scratch;
use render_core::buffer_ops;
use render_core::convert;
use render_core::denormal;
use render_core::effects::{delay as delay_fx, envelope as envelope_fx, shape};
use render_core::filters::{biquad as biquad_filter, one_pole as one_pole_filter};
use render_core::oscillators::wavetable;
use render_core::pcm;
use render_core::tables;
use render_core::{
    BiquadCoefs, CurvePoint, DelaySettings, OnePoleCoefs, OnePoleState, Sample, WavetableSettings,
};

pub struct Engine {
    pool: BufferPool,
    scratch: Scratch,
}

fn invalid(handle: Handle) -> String {
    format!("invalid buffer handle {handle}")
}

/// Borrow two distinct live buffers, naming the offending handle on failure.
fn pair<'a>(
    pool: &'a mut BufferPool,
    a: Handle,
    b: Handle,
) -> Result<(&'a mut [Sample], &'a mut [Sample]), String> {
    if pool.slice(a).is_none() {
        return Err(invalid(a));
    }
    if pool.slice(b).is_none() {
        return Err(invalid(b));
    }
    pool.pair_mut(a, b)
        .ok_or_else(|| format!("handles {a} and {b} alias the same buffer"))
}

fn block<'a>(buf: &'a [Sample], len: usize, handle: Handle) -> Result<&'a [Sample], String> {
    buf.get(..len)
        .ok_or_else(|| format!("buffer {handle} holds {} samples, need {len}", buf.len()))
}

fn block_mut<'a>(
    buf: &'a mut [Sample],
    len: usize,
    handle: Handle,
) -> Result<&'a mut [Sample], String> {
    let have = buf.len();
    buf.get_mut(..len)
        .ok_or_else(|| format!("buffer {handle} holds {have} samples, need {len}"))
}

impl Engine {
    /// Build an engine: fill the process-wide lookup tables, so the first
    /// block never pays the initialization cost, and put the calling
    /// thread's floating-point unit in flush-to-zero mode. The filters keep
    /// their per-sample zap on top, so observable output does not depend on
    /// the processor mode.
    pub fn new() -> Self {
        tables::warm();
        denormal::prevent_denormals();
        Self {
            pool: BufferPool::new(),
            scratch: Scratch::new(),
        }
    }

    // ---- memory ----------------------------------------------------------

    pub fn allocate_sample_memory(&mut self, frames: usize, channels: usize, zero: bool) -> Handle {
        self.pool.allocate(frames, channels, zero)
    }

    /// Grow the buffer behind `handle`. `old_frames` is the host's record of
    /// the previous size and is not consulted; the pool knows the real
    /// length. Returns the (unchanged) handle, or the null handle if
    /// `handle` does not resolve.
    pub fn reallocate_sample_memory(
        &mut self,
        handle: Handle,
        _old_frames: usize,
        new_frames: usize,
        channels: usize,
    ) -> Handle {
        self.pool.reallocate(handle, new_frames, channels)
    }

    pub fn deallocate_sample_memory(&mut self, handle: Handle) -> Result<(), String> {
        if self.pool.deallocate(handle) {
            Ok(())
        } else {
            Err(invalid(handle))
        }
    }

    // ---- buffer primitives ----------------------------------------------

    pub fn set_samples(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        value: f64,
    ) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        buffer_ops::set_samples(block_mut(buf, frames * channels, buffer)?, value as Sample);
        Ok(())
    }

    pub fn copy(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
    ) -> Result<(), String> {
        let (dst, src) = pair(&mut self.pool, buffer, source)?;
        let len = frames * channels;
        buffer_ops::copy_samples(block_mut(dst, len, buffer)?, block(src, len, source)?);
        Ok(())
    }

    pub fn change_gain(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        left_gain: f64,
        right_gain: f64,
    ) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        buffer_ops::change_gain(
            block_mut(buf, frames * channels, buffer)?,
            channels,
            left_gain as Sample,
            right_gain as Sample,
        );
        Ok(())
    }

    /// Mix `source` into `buffer`. `source_offset` is in samples and stands
    /// in for the offset pointers the host bridge used to pass.
    #[allow(clippy::too_many_arguments)]
    pub fn mix_in(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
        left_gain: f64,
        right_gain: f64,
        source_offset: usize,
    ) -> Result<(), String> {
        let (dst, src) = pair(&mut self.pool, buffer, source)?;
        let len = frames * channels;
        let src = source_offset
            .checked_add(len)
            .and_then(|end| src.get(source_offset..end))
            .ok_or_else(|| format!("source {source} too short at offset {source_offset}"))?;
        buffer_ops::mix_in(
            block_mut(dst, len, buffer)?,
            src,
            channels,
            left_gain as Sample,
            right_gain as Sample,
        );
        Ok(())
    }

    pub fn mix_in_pan(
        &mut self,
        buffer: Handle,
        source: Handle,
        frames: usize,
        left_gain: f64,
        right_gain: f64,
    ) -> Result<(), String> {
        let (dst, src) = pair(&mut self.pool, buffer, source)?;
        buffer_ops::mix_in_pan(
            block_mut(dst, frames * 2, buffer)?,
            block(src, frames, source)?,
            left_gain as Sample,
            right_gain as Sample,
        );
        Ok(())
    }

    pub fn multiply_in(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
        gain: f64,
    ) -> Result<(), String> {
        let (dst, src) = pair(&mut self.pool, buffer, source)?;
        let len = frames * channels;
        buffer_ops::multiply_in(
            block_mut(dst, len, buffer)?,
            block(src, len, source)?,
            gain as Sample,
        );
        Ok(())
    }

    // ---- conversion ------------------------------------------------------

    /// Normalize `source` (described by `channels`/`frames`/`rate`) into
    /// `buffer` as 44.1 kHz stereo. Half-rate sources emit `2 * frames`
    /// stereo frames, full-rate sources `frames`.
    pub fn standardize(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
        rate: u32,
    ) -> Result<(), String> {
        let (dst, src) = pair(&mut self.pool, buffer, source)?;
        let out_len = if rate == 22_050 { frames * 4 } else { frames * 2 };
        convert::standardize(
            block_mut(dst, out_len, buffer)?,
            block(src, frames * channels, source)?,
            channels,
            rate,
        );
        Ok(())
    }

    // ---- oscillators -----------------------------------------------------

    pub fn wavetable_in(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
        settings: &mut WavetableSettings,
    ) -> Result<(), String> {
        let (dst, table) = pair(&mut self.pool, buffer, source)?;
        wavetable::wavetable_in(
            block_mut(dst, frames * channels, buffer)?,
            table,
            channels,
            settings,
        );
        Ok(())
    }

    /// Curve-driven one-shot scan. Returns the number of frames written.
    pub fn wave_mod_in(
        &mut self,
        buffer: Handle,
        source: Handle,
        channels: usize,
        frames: usize,
        settings: &mut WavetableSettings,
        pitch: Handle,
    ) -> Result<usize, String> {
        let mut dst = self.pool.take(buffer).ok_or_else(|| invalid(buffer))?;
        let result = (|| {
            let table = self.pool.slice(source).ok_or_else(|| invalid(source))?;
            let curve = self.pool.slice(pitch).ok_or_else(|| invalid(pitch))?;
            let out = block_mut(&mut dst, frames * channels, buffer)?;
            Ok(wavetable::wave_mod_in(out, table, channels, settings, curve))
        })();
        self.pool.put_back(buffer, dst);
        result
    }

    // ---- filters and effects --------------------------------------------

    /// Feedback echo. `ring` must hold at least `settings.length + 1`
    /// samples and is rotated so its element 0 is the oldest delayed sample
    /// when the call returns.
    pub fn delay(
        &mut self,
        buffer: Handle,
        ring: Handle,
        channels: usize,
        frames: usize,
        settings: &DelaySettings,
    ) -> Result<(), String> {
        let (buf, ring_buf) = pair(&mut self.pool, buffer, ring)?;
        if ring_buf.len() <= settings.length {
            return Err(format!(
                "ring {ring} holds {} samples, need {}",
                ring_buf.len(),
                settings.length + 1
            ));
        }
        delay_fx::delay(block_mut(buf, frames * channels, buffer)?, ring_buf, settings);
        Ok(())
    }

    /// Direct-form I biquad. `state` is a sample buffer of at least
    /// `4 * channels` samples laid out as documented by the filter.
    pub fn biquad(
        &mut self,
        buffer: Handle,
        state: Handle,
        channels: usize,
        frames: usize,
        coefs: &BiquadCoefs,
    ) -> Result<(), String> {
        let (buf, state_buf) = pair(&mut self.pool, buffer, state)?;
        if state_buf.len() < channels * 4 {
            return Err(format!(
                "state {state} holds {} samples, need {}",
                state_buf.len(),
                channels * 4
            ));
        }
        biquad_filter::biquad(
            block_mut(buf, frames * channels, buffer)?,
            state_buf,
            channels,
            coefs,
        );
        Ok(())
    }

    pub fn one_pole(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        coefs: &OnePoleCoefs,
        state: &mut OnePoleState,
    ) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        one_pole_filter::one_pole(
            block_mut(buf, frames * channels, buffer)?,
            channels,
            coefs,
            state,
        );
        Ok(())
    }

    pub fn envelope(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        point: &CurvePoint,
    ) -> Result<(), String> {
        let len = frames * channels;
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        let buf = block_mut(buf, len, buffer)?;
        let scratch = self.scratch.curve_mut();
        if len > scratch.len() {
            return Err(format!("block of {len} samples exceeds scratch capacity"));
        }
        envelope_fx::envelope(buf, point, scratch);
        Ok(())
    }

    pub fn overdrive(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
    ) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        shape::overdrive(block_mut(buf, frames * channels, buffer)?);
        Ok(())
    }

    pub fn clip(&mut self, buffer: Handle, channels: usize, frames: usize) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        shape::clip(block_mut(buf, frames * channels, buffer)?);
        Ok(())
    }

    pub fn normalize(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        desired: f64,
    ) -> Result<(), String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        shape::normalize(block_mut(buf, frames * channels, buffer)?, desired as Sample);
        Ok(())
    }

    // ---- byte adapters ---------------------------------------------------

    /// Append the block as raw little-endian f32 bytes.
    pub fn write_bytes(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), String> {
        let buf = self.pool.slice(buffer).ok_or_else(|| invalid(buffer))?;
        pcm::write_f32_bytes(block(buf, frames * channels, buffer)?, out)
            .map_err(|err| format!("write failed: {err}"))
    }

    /// Append the block as 16-bit PCM, the WAV body format.
    pub fn write_wav_bytes(
        &mut self,
        buffer: Handle,
        channels: usize,
        frames: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), String> {
        let buf = self.pool.slice(buffer).ok_or_else(|| invalid(buffer))?;
        let buf = block(buf, frames * channels, buffer)?;
        pcm::write_i16_bytes(buf, out, self.scratch.pcm_mut())
            .map_err(|err| format!("write failed: {err}"))
    }

    /// Fill the block from 16-bit PCM bytes. Returns the number of bytes
    /// consumed from `src`.
    pub fn read_wav_bytes(
        &mut self,
        buffer: Handle,
        src: &[u8],
        bit_depth: u32,
        channels: usize,
        frames: usize,
    ) -> Result<usize, String> {
        let buf = self.pool.slice_mut(buffer).ok_or_else(|| invalid(buffer))?;
        let buf = block_mut(buf, frames * channels, buffer)?;
        let mut reader = src;
        pcm::read_i16_bytes(buf, &mut reader, bit_depth, self.scratch.pcm_mut())
            .map_err(|err| format!("read failed: {err}"))?;
        Ok(src.len() - reader.len())
    }

    // ---- introspection ---------------------------------------------------

    /// Length in samples of the buffer behind `handle`, if it is live.
    pub fn buffer_len(&self, handle: Handle) -> Option<usize> {
        self.pool.slice(handle).map(|buf| buf.len())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::NULL_HANDLE;

    #[test]
    fn operations_on_bogus_handles_fail_cleanly() {
        let mut engine = Engine::new();
        assert!(engine.set_samples(7, 1, 4, 0.5).is_err());
        assert!(engine.deallocate_sample_memory(NULL_HANDLE).is_err());
        assert_eq!(engine.reallocate_sample_memory(9, 2, 4, 1), NULL_HANDLE);
    }

    #[test]
    fn undersized_blocks_are_rejected_not_panicked() {
        let mut engine = Engine::new();
        let small = engine.allocate_sample_memory(2, 1, true);
        assert!(engine.set_samples(small, 1, 2, 0.5).is_ok());
        assert!(engine.set_samples(small, 2, 4, 1.0).is_err());
    }

    #[test]
    fn aliasing_handles_are_rejected() {
        let mut engine = Engine::new();
        let buf = engine.allocate_sample_memory(4, 1, true);
        assert!(engine.copy(buf, buf, 1, 4).is_err());
    }
}
