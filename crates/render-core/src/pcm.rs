//! PCM byte adapters.
//!
//! The engine hands finished blocks to the host as bytes: either raw 32-bit
//! little-endian floats, or 16-bit signed PCM for WAV bodies (the container
//! header is assembled elsewhere). Conversion runs in chunks through a
//! caller-provided i16 scratch so one host write covers many frames; the
//! adapters are therefore not reentrant over a shared scratch.

use crate::common::Sample;
use std::io::{Read, Write};

/// Append `src` to `out` as raw little-endian f32 bytes.
pub fn write_f32_bytes<W: Write>(src: &[Sample], out: &mut W) -> std::io::Result<()> {
    for &sample in src {
        out.write_all(&sample.to_le_bytes())?;
    }
    Ok(())
}

/// Append `src` to `out` as 16-bit signed little-endian PCM.
///
/// Each float is mapped with `(s * 32768 + 0.5) as i16`; saturation is the
/// caller's job (run `clip` first). Frames are staged through `scratch` in
/// chunks of at most its length.
pub fn write_i16_bytes<W: Write>(
    src: &[Sample],
    out: &mut W,
    scratch: &mut [i16],
) -> std::io::Result<()> {
    for chunk in src.chunks(scratch.len()) {
        let staged = &mut scratch[..chunk.len()];
        for (slot, &sample) in staged.iter_mut().zip(chunk) {
            *slot = (sample * 32768.0 + 0.5) as i16;
        }
        for &value in staged.iter() {
            out.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Fill `dst` from 16-bit signed little-endian PCM in `src`.
///
/// Each sample is scaled by `2^-bit_depth`; the usual depth for normalized
/// int16 is 15. Reads are chunked through `scratch` like the writer.
pub fn read_i16_bytes<R: Read>(
    dst: &mut [Sample],
    src: &mut R,
    bit_depth: u32,
    scratch: &mut [i16],
) -> std::io::Result<()> {
    let divisor = 1.0 / 2.0_f32.powi(bit_depth as i32);
    for chunk in dst.chunks_mut(scratch.len()) {
        let staged = &mut scratch[..chunk.len()];
        let mut bytes = [0u8; 2];
        for slot in staged.iter_mut() {
            src.read_exact(&mut bytes)?;
            *slot = i16::from_le_bytes(bytes);
        }
        for (slot, &value) in chunk.iter_mut().zip(staged.iter()) {
            *slot = value as Sample * divisor;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_float_bytes_round_trip() {
        let src = [0.5f32, -1.0, 0.25, 1.0e-7];
        let mut bytes = Vec::new();
        write_f32_bytes(&src, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 16);
        for (i, &sample) in src.iter().enumerate() {
            let mut word = [0u8; 4];
            word.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            assert_eq!(f32::from_le_bytes(word), sample);
        }
    }

    #[test]
    fn i16_round_trip_stays_within_one_step() {
        let src: Vec<f32> = (-100..=100).map(|i| i as f32 / 100.0).collect();
        let mut scratch = [0i16; 16];
        let mut bytes = Vec::new();
        write_i16_bytes(&src, &mut bytes, &mut scratch).unwrap();

        let mut decoded = vec![0.0f32; src.len()];
        read_i16_bytes(&mut decoded, &mut bytes.as_slice(), 15, &mut scratch).unwrap();

        let step = 1.0 / 32768.0;
        for (&a, &b) in src.iter().zip(decoded.iter()) {
            assert!((a - b).abs() <= step, "{a} vs {b}");
        }
    }

    #[test]
    fn encoding_matches_an_independent_wav_writer() {
        let src = [0.0f32, 0.25, -0.25, 0.9, -0.9];
        let mut scratch = [0i16; 16384];
        let mut bytes = Vec::new();
        write_i16_bytes(&src, &mut bytes, &mut scratch).unwrap();

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &sample in &src {
                writer
                    .write_sample((sample * 32768.0 + 0.5) as i16)
                    .unwrap();
            }
            writer.finalize().unwrap();
        }
        let wav = cursor.into_inner();
        // the data chunk is the last src.len() * 2 bytes of the container
        let body = &wav[wav.len() - src.len() * 2..];
        assert_eq!(body, bytes.as_slice());
    }

    #[test]
    fn chunking_does_not_change_the_stream() {
        let src: Vec<f32> = (0..1000).map(|i| ((i * 37) % 200) as f32 / 100.0 - 1.0).collect();
        let mut small = [0i16; 7];
        let mut big = [0i16; 16384];
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_i16_bytes(&src, &mut a, &mut small).unwrap();
        write_i16_bytes(&src, &mut b, &mut big).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn read_scales_by_the_supplied_depth() {
        let bytes: Vec<u8> = [16384i16, -16384, 32767]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut dst = [0.0f32; 3];
        let mut scratch = [0i16; 4];
        read_i16_bytes(&mut dst, &mut bytes.as_slice(), 15, &mut scratch).unwrap();
        assert_eq!(dst[0], 0.5);
        assert_eq!(dst[1], -0.5);
        assert!((dst[2] - 1.0).abs() < 1.0e-4);
    }
}
