//! Linear-interpolation resampling onto a uniform grid.

/// Samples `input` at `output_len` evenly spaced positions in `[0, span_end]`.
///
/// Equivalent to evaluating the piecewise-linear interpolant of `input` on a
/// `linspace(0, span_end, output_len)` grid. `span_end` is clamped into the
/// valid index range of `input`.
pub fn resample_linear_span(input: &[f64], span_end: f64, output_len: usize) -> Vec<f64> {
    if output_len == 0 {
        return vec![];
    }
    if input.is_empty() {
        return vec![0.0; output_len];
    }
    if input.len() == 1 {
        return vec![input[0]; output_len];
    }

    let last = (input.len() - 1) as f64;
    let span_end = if span_end.is_finite() {
        span_end.clamp(0.0, last)
    } else {
        last
    };
    let step = if output_len > 1 {
        span_end / (output_len - 1) as f64
    } else {
        0.0
    };

    let mut output = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let pos = (i as f64 * step).min(last);
        let idx = pos as usize;
        let frac = pos - idx as f64;

        if idx + 1 < input.len() {
            output.push(input[idx] * (1.0 - frac) + input[idx + 1] * frac);
        } else {
            output.push(input[input.len() - 1]);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_span_identity() {
        let input: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        let output = resample_linear_span(&input, 99.0, 100);
        assert_eq!(output.len(), 100);
        for (a, b) in input.iter().zip(output.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_full_span_upsample() {
        let input = vec![0.0, 1.0, 0.0];
        let output = resample_linear_span(&input, 2.0, 5);
        assert_eq!(output, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_span_shorter_than_input() {
        // Only the first half of a ramp is sampled
        let input: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let output = resample_linear_span(&input, 5.0, 11);
        assert_eq!(output.len(), 11);
        assert!((output[0] - 0.0).abs() < 1e-12);
        assert!((output[10] - 5.0).abs() < 1e-12);
        assert!((output[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_span_clamped_to_input() {
        let input = vec![1.0, 2.0, 3.0];
        let output = resample_linear_span(&input, 100.0, 3);
        assert_eq!(output, vec![1.0, 2.0, 3.0]);
        let output = resample_linear_span(&input, -4.0, 2);
        assert_eq!(output, vec![1.0, 1.0]);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample_linear_span(&[1.0, 2.0], 1.0, 0).is_empty());
        assert_eq!(resample_linear_span(&[], 0.0, 3), vec![0.0; 3]);
        assert_eq!(resample_linear_span(&[7.0], 0.0, 2), vec![7.0, 7.0]);
    }
}
