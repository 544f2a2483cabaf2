//! Restores the source duration of a time-stretched resynthesis and mixes it
//! with the dry signal.

use crate::core::params::Hops;
use crate::core::resample::resample_linear_span;
use crate::error::PitchShiftError;

/// Number of samples to resynthesize for an input of `input_len` samples.
///
/// Without resampling this is the stretched length `ceil(input_len * HOP_OUT / HOP)`.
/// With resampling one more synthesis hop of overlap-add tail is kept, so the
/// grid of [`normalize_duration`] ends exactly at the stretched length.
pub fn synthesis_len(hops: Hops, input_len: usize, resample: bool) -> usize {
    let stretched = hops.stretched_len(input_len);
    if resample {
        stretched + hops.synthesis
    } else {
        stretched
    }
}

/// Resamples `stretched` to `target_len` samples.
///
/// The grid spans `[0, len(stretched) - hop_out]`; the last synthesis hop is
/// the tail of the final frame and is dropped.
pub fn normalize_duration(stretched: &[f64], target_len: usize, hop_out: usize) -> Vec<f64> {
    let span_end = stretched.len().saturating_sub(hop_out.max(1)) as f64;
    resample_linear_span(stretched, span_end, target_len)
}

/// Dry/wet crossfade: `processed * blend + original * (1 - blend)`.
///
/// `blend` is not clamped; values outside `[0, 1]` amplify or invert the mix.
pub fn blend(processed: &[f64], original: &[f64], blend: f64) -> Result<Vec<f64>, PitchShiftError> {
    if processed.len() != original.len() {
        return Err(PitchShiftError::LengthMismatch {
            expected: original.len(),
            found: processed.len(),
        });
    }
    Ok(processed
        .iter()
        .zip(original.iter())
        .map(|(&wet, &dry)| wet * blend + dry * (1.0 - blend))
        .collect())
}

/// Final stage of a pitch shift.
///
/// With `resample`, `stretched` is brought back to `original.len()` samples
/// and blended. Without it, `stretched` is returned unchanged and no blend is
/// applied.
pub fn finalize(
    stretched: Vec<f64>,
    original: &[f64],
    hops: Hops,
    resample: bool,
    blend_amount: f64,
) -> Result<Vec<f64>, PitchShiftError> {
    if !resample {
        if blend_amount != 1.0 {
            log::warn!(
                "blend {} ignored: no-resample output ({} samples) cannot be mixed with the {}-sample source",
                blend_amount,
                stretched.len(),
                original.len()
            );
        }
        return Ok(stretched);
    }

    let resampled = normalize_duration(&stretched, original.len(), hops.synthesis);
    log::debug!(
        "resampled {} -> {} samples (stretch {:.4})",
        stretched.len(),
        resampled.len(),
        hops.stretch_factor()
    );
    blend(&resampled, original, blend_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_len_keeps_tail_for_resampling() {
        let hops = Hops { analysis: 256, synthesis: 512 };
        assert_eq!(synthesis_len(hops, 1000, false), 2000);
        assert_eq!(synthesis_len(hops, 1000, true), 2512);
        // The resampling grid then ends at the stretched length
        let span_end = synthesis_len(hops, 1000, true) - hops.synthesis;
        assert_eq!(span_end, hops.stretched_len(1000));
    }

    #[test]
    fn test_normalize_duration_equal_hops_tracks_input() {
        // Stretched signal at HOP == HOP_OUT plus one hop of tail
        let ramp: Vec<f64> = (0..1100).map(|i| i as f64).collect();
        let out = normalize_duration(&ramp, 1000, 100);
        assert_eq!(out.len(), 1000);
        // Grid is linspace(0, 1000, 1000): drift stays under one sample
        for (n, &v) in out.iter().enumerate() {
            assert!((v - n as f64).abs() <= 1.0 + 1e-9, "n={n}: {v}");
        }
    }

    #[test]
    fn test_normalize_duration_length() {
        let stretched: Vec<f64> = (0..2000).map(|i| i as f64).collect();
        let out = normalize_duration(&stretched, 1000, 512);
        assert_eq!(out.len(), 1000);
        assert_eq!(out[0], 0.0);
        // Grid ends at len - hop_out
        assert!((out[999] - 1488.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_duration_short_input() {
        let out = normalize_duration(&[3.0, 4.0], 5, 512);
        assert_eq!(out, vec![3.0; 5]);
        assert_eq!(normalize_duration(&[], 3, 4), vec![0.0; 3]);
    }

    #[test]
    fn test_blend_boundaries() {
        let wet = vec![1.0, 2.0, 3.0];
        let dry = vec![-1.0, 0.5, 10.0];
        assert_eq!(blend(&wet, &dry, 0.0).unwrap(), dry);
        assert_eq!(blend(&wet, &dry, 1.0).unwrap(), wet);
        let half = blend(&wet, &dry, 0.5).unwrap();
        assert_eq!(half, vec![0.0, 1.25, 6.5]);
    }

    #[test]
    fn test_blend_not_clamped() {
        let out = blend(&[2.0], &[1.0], 2.0).unwrap();
        assert_eq!(out, vec![3.0]);
        let out = blend(&[2.0], &[1.0], -1.0).unwrap();
        assert_eq!(out, vec![0.0]);
    }

    #[test]
    fn test_blend_length_mismatch() {
        assert_eq!(
            blend(&[1.0], &[1.0, 2.0], 0.5),
            Err(PitchShiftError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_finalize_no_resample_passthrough() {
        let stretched = vec![1.0; 300];
        let hops = Hops { analysis: 100, synthesis: 150 };
        let out = finalize(stretched.clone(), &[0.0; 200], hops, false, 0.3).unwrap();
        assert_eq!(out, stretched);
    }

    #[test]
    fn test_finalize_resample_matches_source_length() {
        let stretched: Vec<f64> = (0..300).map(|i| (i as f64 * 0.01).sin()).collect();
        let original = vec![0.0; 200];
        let hops = Hops { analysis: 100, synthesis: 150 };
        let out = finalize(stretched, &original, hops, true, 0.0).unwrap();
        assert_eq!(out, original);
    }
}
