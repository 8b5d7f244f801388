/// Floating point type used for every numeric field.
pub type Real = f64;

/// A finite value in `[0, 1]`.
pub fn is_fraction(value: Real) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// True when `value` is above `limit` by more than `tolerance`.
///
/// Sums of fractions read from text rarely land exactly on their limit, so
/// checks against 1 go through here rather than a bare `>`.
pub fn exceeds(value: Real, limit: Real, tolerance: Real) -> bool {
    value - limit > tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions() {
        assert!(is_fraction(0.0));
        assert!(is_fraction(1.0));
        assert!(!is_fraction(-0.01));
        assert!(!is_fraction(1.5));
        assert!(!is_fraction(Real::NAN));
    }

    #[test]
    fn exceeds_ignores_rounding_noise() {
        assert!(!exceeds(0.1 + 0.2 + 0.7, 1.0, 1e-9));
        assert!(exceeds(1.05, 1.0, 1e-9));
        assert!(!exceeds(1.05, 1.0, 0.1));
        assert!(!exceeds(0.95, 1.0, 0.0));
    }
}
