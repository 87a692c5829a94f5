//! DECIMAL precision and scale derivation
//!
//! Every rule works on `(precision, scale)` pairs and clamps its result to the
//! configured maxima. Integer digits are kept in preference to fractional
//! digits: when the total would exceed the maximum precision, scale is
//! truncated (down to 0).

use crate::TypeSystemConfig;

/// A DECIMAL's precision and scale
pub type PrecisionScale = (u32, u32);

fn int_digits((p, s): PrecisionScale) -> u32 {
    p.saturating_sub(s)
}

/// Least restrictive DECIMAL able to hold values of both operands
pub fn widen(config: &TypeSystemConfig, a: PrecisionScale, b: PrecisionScale) -> PrecisionScale {
    let max_p = config.max_numeric_precision;
    let int = int_digits(a).max(int_digits(b)).min(max_p);
    let scale = a.1.max(b.1).min(max_p - int).min(config.max_numeric_scale);
    (int.saturating_add(scale), scale)
}

/// Result type of `a + b` and `a - b`
pub fn sum(config: &TypeSystemConfig, a: PrecisionScale, b: PrecisionScale) -> PrecisionScale {
    let max_p = config.max_numeric_precision;
    let scale = a.1.max(b.1).min(config.max_numeric_scale).min(max_p);
    let precision = int_digits(a)
        .max(int_digits(b))
        .saturating_add(scale)
        .saturating_add(1)
        .min(max_p);
    (precision, scale)
}

/// Result type of `a * b`
pub fn product(config: &TypeSystemConfig, a: PrecisionScale, b: PrecisionScale) -> PrecisionScale {
    let precision = a.0.saturating_add(b.0).min(config.max_numeric_precision);
    let scale = a.1.saturating_add(b.1).min(config.max_numeric_scale).min(precision);
    (precision, scale)
}

/// Result type of `a / b`
pub fn quotient(config: &TypeSystemConfig, a: PrecisionScale, b: PrecisionScale) -> PrecisionScale {
    let max_p = config.max_numeric_precision;
    let int = int_digits(a).saturating_add(b.1).min(max_p);
    let scale = 6u32
        .max(a.1.saturating_add(b.0).saturating_add(1))
        .min(max_p - int)
        .min(config.max_numeric_scale);
    (int.saturating_add(scale), scale)
}

/// Result type of `MOD(a, b)`
pub fn modulus(config: &TypeSystemConfig, a: PrecisionScale, b: PrecisionScale) -> PrecisionScale {
    let max_p = config.max_numeric_precision;
    let scale = a.1.max(b.1).min(config.max_numeric_scale).min(max_p);
    let precision = int_digits(a).min(int_digits(b)).saturating_add(scale).min(max_p);
    (precision, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((5, 4), (7, 1), (10, 4))]
    #[case((5, 4), (10, 0), (14, 4))]
    #[case((5, 4), (19, 0), (19, 0))]
    #[case((19, 0), (5, 4), (19, 0))]
    #[case((3, 0), (5, 2), (5, 2))]
    #[case((19, 19), (19, 0), (19, 0))]
    #[case((10, 9), (10, 2), (17, 9))]
    fn test_widen(
        #[case] a: PrecisionScale,
        #[case] b: PrecisionScale,
        #[case] expected: PrecisionScale,
    ) {
        assert_eq!(widen(&TypeSystemConfig::default(), a, b), expected);
    }

    #[rstest]
    #[case((19, 19), (19, 19), (19, 19))]
    #[case((3, 1), (2, 1), (4, 1))]
    #[case((19, 0), (19, 0), (19, 0))]
    #[case((5, 2), (10, 0), (13, 2))]
    fn test_sum(#[case] a: PrecisionScale, #[case] b: PrecisionScale, #[case] expected: PrecisionScale) {
        assert_eq!(sum(&TypeSystemConfig::default(), a, b), expected);
    }

    #[rstest]
    #[case((3, 1), (2, 1), (5, 2))]
    #[case((19, 19), (10, 0), (19, 19))]
    #[case((10, 5), (10, 5), (19, 10))]
    fn test_product(
        #[case] a: PrecisionScale,
        #[case] b: PrecisionScale,
        #[case] expected: PrecisionScale,
    ) {
        assert_eq!(product(&TypeSystemConfig::default(), a, b), expected);
    }

    #[rstest]
    #[case((19, 19), (19, 19), (19, 0))]
    #[case((19, 19), (2, 1), (19, 18))]
    #[case((3, 1), (19, 19), (19, 0))]
    #[case((3, 1), (2, 1), (9, 6))]
    fn test_quotient(
        #[case] a: PrecisionScale,
        #[case] b: PrecisionScale,
        #[case] expected: PrecisionScale,
    ) {
        assert_eq!(quotient(&TypeSystemConfig::default(), a, b), expected);
    }

    #[rstest]
    #[case((10, 0), (19, 19), (19, 19))]
    #[case((5, 2), (3, 0), (5, 2))]
    fn test_modulus(
        #[case] a: PrecisionScale,
        #[case] b: PrecisionScale,
        #[case] expected: PrecisionScale,
    ) {
        assert_eq!(modulus(&TypeSystemConfig::default(), a, b), expected);
    }

    #[test]
    fn test_widen_respects_configured_maximum() {
        let config = TypeSystemConfig {
            max_numeric_precision: 38,
            max_numeric_scale: 38,
            ..TypeSystemConfig::default()
        };
        assert_eq!(widen(&config, (5, 4), (19, 0)), (23, 4));
    }

    #[test]
    fn test_extreme_precision_saturates() {
        let config = TypeSystemConfig {
            max_numeric_precision: u32::MAX,
            max_numeric_scale: u32::MAX,
            ..TypeSystemConfig::default()
        };
        let huge = (3_000_000_000, 0);
        let scaled = (u32::MAX, u32::MAX - 1);
        assert_eq!(product(&config, huge, huge), (u32::MAX, 0));
        assert_eq!(sum(&config, huge, huge), (3_000_000_001, 0));
        assert_eq!(sum(&config, scaled, huge), (u32::MAX, u32::MAX - 1));
        assert_eq!(quotient(&config, huge, scaled), (u32::MAX, 0));
        assert_eq!(modulus(&config, scaled, huge), (u32::MAX, u32::MAX - 1));
        assert_eq!(widen(&config, huge, scaled), (u32::MAX, u32::MAX - 3_000_000_000));
    }
}
