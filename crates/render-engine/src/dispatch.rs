//! Name-keyed dispatch for host bridges that marshal untyped payloads.
//!
//! A bridge that cannot link against the typed [`Engine`] methods can drive
//! the engine with JSON tuples instead: the operation name from the
//! registry, a positional argument array mirroring the typed signatures,
//! and a byte channel. Settings records travel as JSON objects and are
//! deserialized into the `render-core` records, so their field names are
//! checked at the boundary. Operations that mutate a record (wavetable
//! phase, one-pole state) return the updated fields in the reply value.
//!
//! The byte channel stands in for the host's byte stream: the write
//! adapters append to it, `readWavBytes` consumes from its front.

use crate::engine::Engine;
use crate::pool::Handle;
use crate::registry::Op;
use render_core::{
    BiquadCoefs, CurvePoint, DelaySettings, OnePoleCoefs, OnePoleState, WavetableSettings,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn arg<'a>(args: &'a [Value], index: usize, op: &str) -> Result<&'a Value, String> {
    args.get(index)
        .ok_or_else(|| format!("{op}: missing argument {index}"))
}

fn size(args: &[Value], index: usize, op: &str) -> Result<usize, String> {
    arg(args, index, op)?
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| format!("{op}: argument {index} must be an unsigned integer"))
}

fn handle(args: &[Value], index: usize, op: &str) -> Result<Handle, String> {
    Ok(size(args, index, op)? as Handle)
}

fn number(args: &[Value], index: usize, op: &str) -> Result<f64, String> {
    arg(args, index, op)?
        .as_f64()
        .ok_or_else(|| format!("{op}: argument {index} must be a number"))
}

fn flag(args: &[Value], index: usize, op: &str) -> Result<bool, String> {
    let value = arg(args, index, op)?;
    value
        .as_bool()
        .or_else(|| value.as_i64().map(|n| n != 0))
        .ok_or_else(|| format!("{op}: argument {index} must be a flag"))
}

fn record<T: DeserializeOwned>(args: &[Value], index: usize, op: &str) -> Result<T, String> {
    serde_json::from_value(arg(args, index, op)?.clone())
        .map_err(|err| format!("{op}: bad settings record: {err}"))
}

impl Engine {
    /// Execute one registry operation from an untyped payload.
    ///
    /// `args` is a positional array; `bytes` is the host byte channel used
    /// by the PCM adapters. Replies are the allocator handle, the mutated
    /// record fields, or status 0.
    pub fn invoke(
        &mut self,
        name: &str,
        args: &Value,
        bytes: &mut Vec<u8>,
    ) -> Result<Value, String> {
        let op = Op::from_name(name).ok_or_else(|| format!("unknown operation {name}"))?;
        let empty = Vec::new();
        let args = args.as_array().unwrap_or(&empty).as_slice();

        match op {
            Op::AllocateSampleMemory => {
                let frames = size(args, 0, name)?;
                let channels = size(args, 1, name)?;
                let zero = flag(args, 2, name)?;
                Ok(json!(self.allocate_sample_memory(frames, channels, zero)))
            }
            Op::ReallocateSampleMemory => {
                let buffer = handle(args, 0, name)?;
                let old_frames = size(args, 1, name)?;
                let new_frames = size(args, 2, name)?;
                let channels = size(args, 3, name)?;
                Ok(json!(self.reallocate_sample_memory(
                    buffer, old_frames, new_frames, channels
                )))
            }
            Op::DeallocateSampleMemory => {
                self.deallocate_sample_memory(handle(args, 0, name)?)?;
                Ok(json!(0))
            }
            Op::SetSamples => {
                self.set_samples(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    number(args, 3, name)?,
                )?;
                Ok(json!(0))
            }
            Op::Copy => {
                self.copy(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                )?;
                Ok(json!(0))
            }
            Op::ChangeGain => {
                self.change_gain(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    number(args, 3, name)?,
                    number(args, 4, name)?,
                )?;
                Ok(json!(0))
            }
            Op::MixIn => {
                let source_offset = if args.len() > 6 { size(args, 6, name)? } else { 0 };
                self.mix_in(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    number(args, 4, name)?,
                    number(args, 5, name)?,
                    source_offset,
                )?;
                Ok(json!(0))
            }
            Op::MixInPan => {
                self.mix_in_pan(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    number(args, 3, name)?,
                    number(args, 4, name)?,
                )?;
                Ok(json!(0))
            }
            Op::MultiplyIn => {
                self.multiply_in(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    number(args, 4, name)?,
                )?;
                Ok(json!(0))
            }
            Op::Standardize => {
                self.standardize(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    size(args, 4, name)? as u32,
                )?;
                Ok(json!(0))
            }
            Op::WavetableIn => {
                let mut settings: WavetableSettings = record(args, 4, name)?;
                self.wavetable_in(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    &mut settings,
                )?;
                Ok(json!({ "phase": settings.phase }))
            }
            Op::WaveModIn => {
                let mut settings: WavetableSettings = record(args, 4, name)?;
                let frames = self.wave_mod_in(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    &mut settings,
                    handle(args, 5, name)?,
                )?;
                Ok(json!({ "phase": settings.phase, "frames": frames }))
            }
            Op::Delay => {
                let settings: DelaySettings = record(args, 4, name)?;
                self.delay(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    &settings,
                )?;
                Ok(json!(0))
            }
            Op::Biquad => {
                let coefs: BiquadCoefs = record(args, 4, name)?;
                self.biquad(
                    handle(args, 0, name)?,
                    handle(args, 1, name)?,
                    size(args, 2, name)?,
                    size(args, 3, name)?,
                    &coefs,
                )?;
                Ok(json!(0))
            }
            Op::OnePole => {
                let coefs: OnePoleCoefs = record(args, 3, name)?;
                let mut state: OnePoleState = record(args, 4, name)?;
                self.one_pole(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    &coefs,
                    &mut state,
                )?;
                serde_json::to_value(state).map_err(|err| format!("{name}: {err}"))
            }
            Op::Envelope => {
                let point: CurvePoint = record(args, 3, name)?;
                self.envelope(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    &point,
                )?;
                Ok(json!(0))
            }
            Op::Overdrive => {
                self.overdrive(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                )?;
                Ok(json!(0))
            }
            Op::Clip => {
                self.clip(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                )?;
                Ok(json!(0))
            }
            Op::Normalize => {
                self.normalize(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    number(args, 3, name)?,
                )?;
                Ok(json!(0))
            }
            Op::WriteBytes => {
                self.write_bytes(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    bytes,
                )?;
                Ok(json!(0))
            }
            Op::WriteWavBytes => {
                self.write_wav_bytes(
                    handle(args, 0, name)?,
                    size(args, 1, name)?,
                    size(args, 2, name)?,
                    bytes,
                )?;
                Ok(json!(0))
            }
            Op::ReadWavBytes => {
                let buffer = handle(args, 0, name)?;
                let bit_depth = size(args, 1, name)? as u32;
                let channels = size(args, 2, name)?;
                let frames = size(args, 3, name)?;
                let consumed = {
                    let src = bytes.as_slice();
                    self.read_wav_bytes(buffer, src, bit_depth, channels, frames)?
                };
                bytes.drain(..consumed);
                Ok(json!(consumed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operations_are_rejected() {
        let mut engine = Engine::new();
        let mut bytes = Vec::new();
        let err = engine.invoke("reverb", &json!([]), &mut bytes).unwrap_err();
        assert!(err.contains("unknown operation"));
    }

    #[test]
    fn malformed_records_name_the_operation() {
        let mut engine = Engine::new();
        let mut bytes = Vec::new();
        let buffer = engine.allocate_sample_memory(4, 1, true);
        let err = engine
            .invoke(
                "delay",
                &json!([buffer, buffer, 1, 4, { "wrong": true }]),
                &mut bytes,
            )
            .unwrap_err();
        assert!(err.contains("delay"));
    }

    #[test]
    fn allocation_reply_is_the_handle() {
        let mut engine = Engine::new();
        let mut bytes = Vec::new();
        let reply = engine
            .invoke("allocateSampleMemory", &json!([16, 2, 1]), &mut bytes)
            .unwrap();
        let handle = reply.as_u64().unwrap() as Handle;
        assert!(handle != 0);
        assert_eq!(engine.buffer_len(handle), Some(32));
    }
}
