//! Peak envelope of a signal, rendered as text for the debug view.

/// Pre-computed waveform peaks.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformPeaks {
    /// Positive peaks per bucket.
    pub pos: Vec<f64>,
    /// Negative peaks per bucket.
    pub neg: Vec<f64>,
}

impl WaveformPeaks {
    /// Compute per-bucket peaks of a mono signal. `num_buckets` controls resolution.
    pub fn compute(samples: &[f64], num_buckets: usize) -> Self {
        if samples.is_empty() || num_buckets == 0 {
            return WaveformPeaks {
                pos: vec![0.0; num_buckets],
                neg: vec![0.0; num_buckets],
            };
        }

        let mut pos = Vec::with_capacity(num_buckets);
        let mut neg = Vec::with_capacity(num_buckets);

        let samples_per_bucket = samples.len() as f64 / num_buckets as f64;

        for i in 0..num_buckets {
            let start = (i as f64 * samples_per_bucket) as usize;
            let end = (((i + 1) as f64 * samples_per_bucket) as usize).min(samples.len());

            let (min_val, max_val) = samples[start..end]
                .iter()
                .fold((0.0f64, 0.0f64), |(lo, hi), &s| (lo.min(s), hi.max(s)));

            pos.push(max_val);
            neg.push(min_val);
        }

        WaveformPeaks { pos, neg }
    }

    /// Largest absolute peak across all buckets.
    pub fn max_abs(&self) -> f64 {
        self.pos
            .iter()
            .chain(self.neg.iter())
            .fold(0.0f64, |m, &v| m.max(v.abs()))
    }

    /// Renders the envelope as `height` text rows, one column per bucket.
    ///
    /// Peaks are scaled to the loudest bucket; the centre row marks zero.
    pub fn render_ascii(&self, height: usize) -> String {
        let height = height.max(3) | 1;
        let center = height / 2;
        let scale = self.max_abs();
        let mut rows = vec![vec![' '; self.pos.len()]; height];

        for (col, (&hi, &lo)) in self.pos.iter().zip(self.neg.iter()).enumerate() {
            rows[center][col] = '-';
            if scale <= 0.0 {
                continue;
            }
            let top = center - ((hi / scale) * center as f64).round() as usize;
            let bottom = center + ((-lo / scale) * center as f64).round() as usize;
            for row in rows.iter_mut().take(bottom + 1).skip(top) {
                row[col] = '#';
            }
        }

        rows.into_iter()
            .map(|r| r.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_peaks() {
        let samples = vec![1.0, -2.0, 0.5, 3.0, -1.0, 0.0];
        let peaks = WaveformPeaks::compute(&samples, 2);
        assert_eq!(peaks.pos, vec![1.0, 3.0]);
        assert_eq!(peaks.neg, vec![-2.0, -1.0]);
        assert_eq!(peaks.max_abs(), 3.0);
    }

    #[test]
    fn test_compute_empty() {
        let peaks = WaveformPeaks::compute(&[], 4);
        assert_eq!(peaks.pos, vec![0.0; 4]);
        assert_eq!(peaks.max_abs(), 0.0);
    }

    #[test]
    fn test_render_dimensions() {
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.05).sin()).collect();
        let peaks = WaveformPeaks::compute(&samples, 40);
        let text = peaks.render_ascii(9);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|l| l.chars().count() == 40));
        assert!(text.contains('#'));
    }

    #[test]
    fn test_render_silence_is_flat() {
        let peaks = WaveformPeaks::compute(&[0.0; 100], 10);
        let text = peaks.render_ascii(5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "----------");
        assert!(!text.contains('#'));
    }
}
