use crate::error::PitchShiftError;

/// A single mono sample on the integer PCM scale (an `i16` sample of 1000 is `1000.0`).
pub type Sample = f64;

/// Integer PCM audio as read from, or written to, a container.
///
/// Samples are interleaved: `[L0, R0, L1, R1, ...]` for stereo,
/// `[s0, s1, s2, ...]` for mono.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Raw interleaved sample data.
    pub data: Vec<i32>,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth of each integer sample (8, 16, 24 or 32).
    pub bits_per_sample: u16,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    ///
    /// # Errors
    /// Returns `PitchShiftError::UnsupportedFormat` if the channel count is zero,
    /// the sample rate is zero, the bit depth is not one of 8/16/24/32, or the
    /// data length is not a multiple of the channel count.
    pub fn new(
        data: Vec<i32>,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self, PitchShiftError> {
        if channels == 0 {
            return Err(PitchShiftError::UnsupportedFormat(
                "audio must have at least one channel".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(PitchShiftError::UnsupportedFormat(
                "sample rate must be greater than 0".to_string(),
            ));
        }
        if !matches!(bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(PitchShiftError::UnsupportedFormat(format!(
                "unsupported bit depth: {}",
                bits_per_sample
            )));
        }
        if data.len() % channels as usize != 0 {
            return Err(PitchShiftError::UnsupportedFormat(format!(
                "{} samples do not divide into {} channels",
                data.len(),
                channels
            )));
        }
        Ok(Self {
            data,
            channels,
            sample_rate,
            bits_per_sample,
        })
    }

    /// Create a mono buffer from floating-point samples, clamping each one to
    /// the integer range of `bits_per_sample` and truncating toward zero.
    pub fn from_mono_samples(
        samples: &[Sample],
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self, PitchShiftError> {
        let (min, max) = sample_range(bits_per_sample);
        let data = samples
            .iter()
            .map(|&s| {
                if s.is_nan() {
                    0
                } else {
                    s.clamp(min as f64, max as f64) as i32
                }
            })
            .collect();
        AudioBuffer::new(data, 1, sample_rate, bits_per_sample)
    }

    /// Number of frames in the buffer (total samples / channels).
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels as usize
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extracts one channel as a mono signal on the integer PCM scale.
    ///
    /// # Errors
    /// Returns `PitchShiftError::ChannelOutOfRange` if `channel` does not exist.
    pub fn channel(&self, channel: usize) -> Result<Vec<Sample>, PitchShiftError> {
        let num_ch = self.channels as usize;
        if channel >= num_ch {
            return Err(PitchShiftError::ChannelOutOfRange {
                channel,
                channels: num_ch,
            });
        }
        Ok(self
            .data
            .iter()
            .skip(channel)
            .step_by(num_ch)
            .map(|&s| s as Sample)
            .collect())
    }
}

/// Inclusive integer range of a signed PCM sample with the given bit depth.
pub fn sample_range(bits_per_sample: u16) -> (i64, i64) {
    let bits = bits_per_sample.clamp(2, 32) as u32;
    let max = (1i64 << (bits - 1)) - 1;
    (-max - 1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(AudioBuffer::new(vec![0; 4], 0, 44100, 16).is_err());
        assert!(AudioBuffer::new(vec![0; 4], 2, 0, 16).is_err());
        assert!(AudioBuffer::new(vec![0; 4], 2, 44100, 12).is_err());
        assert!(AudioBuffer::new(vec![0; 3], 2, 44100, 16).is_err());
        assert!(AudioBuffer::new(vec![0; 4], 2, 44100, 16).is_ok());
    }

    #[test]
    fn test_channel_selection() {
        let buf = AudioBuffer::new(vec![1, -1, 2, -2, 3, -3], 2, 44100, 16).unwrap();
        assert_eq!(buf.num_frames(), 3);
        assert_eq!(buf.channel(0).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(buf.channel(1).unwrap(), vec![-1.0, -2.0, -3.0]);
        assert_eq!(
            buf.channel(2),
            Err(PitchShiftError::ChannelOutOfRange {
                channel: 2,
                channels: 2
            })
        );
    }

    #[test]
    fn test_from_mono_clamps_and_truncates() {
        let buf =
            AudioBuffer::from_mono_samples(&[40000.0, -40000.0, 1.9, -1.9, f64::NAN], 8000, 16)
                .unwrap();
        assert_eq!(buf.data, vec![32767, -32768, 1, -1, 0]);
        assert_eq!(buf.channels, 1);
    }

    #[test]
    fn test_sample_range() {
        assert_eq!(sample_range(8), (-128, 127));
        assert_eq!(sample_range(16), (-32768, 32767));
        assert_eq!(sample_range(24), (-8_388_608, 8_388_607));
        assert_eq!(sample_range(32), (i32::MIN as i64, i32::MAX as i64));
    }

    #[test]
    fn test_duration() {
        let buf = AudioBuffer::new(vec![0; 88200], 2, 44100, 16).unwrap();
        assert!((buf.duration_secs() - 1.0).abs() < 1e-12);
        assert!(!buf.is_empty());
    }
}
