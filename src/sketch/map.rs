//! Logarithmic value remapping.

/// Substitute for any argument that is exactly zero, keeps `ln` finite
pub const ZERO_EPSILON: f64 = 1e-16;

/// Substitute for an empty input domain, keeps the division finite
pub const SPAN_EPSILON: f64 = 1e-12;

/// Remap `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The position of `value` is measured linearly in the input domain but
/// applied in log-space of the output range, so equal steps of input give
/// equal *ratios* of output. This compresses loudness into a perceptually
/// flatter brightness/size response.
///
/// Arguments exactly equal to `0.0` are replaced by [`ZERO_EPSILON`] and an
/// input span of exactly `0.0` by [`SPAN_EPSILON`]. Every colour and size in
/// the cell visualizations depends on these substitutions.
pub fn log_map(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let [value, in_min, in_max, out_min, out_max] =
        [value, in_min, in_max, out_min, out_max].map(nonzero);

    let min_log = out_min.ln();
    let max_log = out_max.ln();

    let mut span = in_max - in_min;
    if span == 0.0 {
        span = SPAN_EPSILON;
    }

    let scale = (max_log - min_log) / span;
    (min_log + scale * (value - in_min)).exp()
}

fn nonzero(x: f64) -> f64 {
    if x == 0.0 {
        ZERO_EPSILON
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps * b.abs().max(1.0)
    }

    #[test]
    fn test_endpoints() {
        assert!(approx(log_map(0.0, 0.0, 1.0, 1.0, 100.0), 1.0, 1e-9));
        assert!(approx(log_map(1.0, 0.0, 1.0, 1.0, 100.0), 100.0, 1e-9));
        assert!(approx(log_map(0.5, 0.0, 1.0, 1.0, 100.0), 10.0, 1e-9));
    }

    #[test]
    fn test_monotonic_increasing() {
        let mut prev = f64::NEG_INFINITY;
        for step in 0..=100 {
            let v = step as f64 / 100.0;
            let out = log_map(v, 0.0, 1.0, 40.0, 220.0);
            assert!(out > prev, "not increasing at v={}", v);
            prev = out;
        }
    }

    #[test]
    fn test_decreasing_output_range() {
        // The cell mappings run from a large value down to zero
        let cell = 100.0;
        let quiet = log_map(0.1, 0.0, 1.0, cell, 0.0);
        let loud = log_map(0.9, 0.0, 1.0, cell, 0.0);
        assert!(quiet > loud);
        assert!(log_map(1.0, 0.0, 1.0, cell, 0.0) < 1e-12);
    }

    #[test]
    fn test_zero_arguments_stay_finite() {
        assert!(log_map(0.0, 0.0, 0.0, 0.0, 0.0).is_finite());
        assert!(log_map(0.0, 0.0, 1.0, 0.0, 1.0).is_finite());
        assert!(log_map(0.3, 0.0, 1.0, 100.0, 0.0).is_finite());
    }

    #[test]
    fn test_empty_domain_uses_span_epsilon() {
        // in_min == in_max: value equal to the bound maps to out_min
        assert!(approx(log_map(0.5, 0.5, 0.5, 2.0, 8.0), 2.0, 1e-9));
        assert!(log_map(0.5, 0.5, 0.5, 2.0, 8.0).is_finite());
    }

    #[test]
    fn test_zero_value_is_substituted() {
        let cell = 100.0;
        assert_eq!(
            log_map(0.0, 0.0, 1.0, cell, 0.0),
            log_map(ZERO_EPSILON, 0.0, 1.0, cell, 0.0)
        );
        assert!(approx(log_map(0.0, 0.0, 1.0, cell, 0.0), cell, 1e-9));
    }

    #[test]
    fn test_extrapolates_outside_domain() {
        let above = log_map(2.0, 0.0, 1.0, 1.0, 10.0);
        assert!(approx(above, 100.0, 1e-9));
        let below = log_map(-1.0, 0.0, 1.0, 1.0, 10.0);
        assert!(approx(below, 0.1, 1e-9));
    }
}
