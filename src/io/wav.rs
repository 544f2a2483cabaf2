//! WAV reading and writing on top of `hound`.

use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::core::types::{sample_range, AudioBuffer};
use crate::error::PitchShiftError;

/// Bit depth that floating-point WAV data is converted to.
const FLOAT_TARGET_BITS: u16 = 16;

/// Reads a WAV stream into integer PCM.
///
/// Integer files keep their bit depth. 32-bit float files are scaled from
/// `[-1, 1]` onto the 16-bit integer range.
pub fn read_wav<R: Read>(reader: R) -> Result<AudioBuffer, PitchShiftError> {
    let reader = hound::WavReader::new(reader)?;
    decode(reader)
}

/// Reads a WAV file from disk.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioBuffer, PitchShiftError> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => PitchShiftError::Io(format!("{}: {}", path.display(), io)),
        other => PitchShiftError::from(other),
    })?;
    decode(reader)
}

fn decode<R: Read>(mut reader: hound::WavReader<R>) -> Result<AudioBuffer, PitchShiftError> {
    let spec = reader.spec();
    log::debug!(
        "wav: {} ch, {} Hz, {}-bit {:?}, {} samples",
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format,
        reader.len()
    );

    match spec.sample_format {
        hound::SampleFormat::Int => {
            let data = reader
                .samples::<i32>()
                .collect::<Result<Vec<i32>, hound::Error>>()?;
            AudioBuffer::new(data, spec.channels, spec.sample_rate, spec.bits_per_sample)
        }
        hound::SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(PitchShiftError::UnsupportedFormat(format!(
                    "{}-bit float WAV",
                    spec.bits_per_sample
                )));
            }
            let (min, max) = sample_range(FLOAT_TARGET_BITS);
            let data = reader
                .samples::<f32>()
                .map(|s| {
                    s.map(|v| {
                        let scaled = v as f64 * max as f64;
                        if scaled.is_nan() {
                            0
                        } else {
                            scaled.clamp(min as f64, max as f64) as i32
                        }
                    })
                })
                .collect::<Result<Vec<i32>, hound::Error>>()?;
            AudioBuffer::new(data, spec.channels, spec.sample_rate, FLOAT_TARGET_BITS)
        }
    }
}

fn wav_spec(buffer: &AudioBuffer) -> hound::WavSpec {
    hound::WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: buffer.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Writes integer PCM at the buffer's bit depth, clamping out-of-range samples.
pub fn write_wav<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> Result<(), PitchShiftError> {
    let writer = hound::WavWriter::new(writer, wav_spec(buffer))?;
    write_samples(writer, buffer)
}

/// Writes a WAV file to disk.
pub fn write_wav_file(path: impl AsRef<Path>, buffer: &AudioBuffer) -> Result<(), PitchShiftError> {
    let path = path.as_ref();
    let writer = hound::WavWriter::create(path, wav_spec(buffer)).map_err(|e| match e {
        hound::Error::IoError(io) => PitchShiftError::Io(format!("{}: {}", path.display(), io)),
        other => PitchShiftError::from(other),
    })?;
    write_samples(writer, buffer)
}

fn write_samples<W: Write + Seek>(
    mut writer: hound::WavWriter<W>,
    buffer: &AudioBuffer,
) -> Result<(), PitchShiftError> {
    let (min, max) = sample_range(buffer.bits_per_sample);
    for &sample in &buffer.data {
        let clamped = (sample as i64).clamp(min, max) as i32;
        writer.write_sample(clamped)?;
    }
    writer.finalize()?;
    Ok(())
}
