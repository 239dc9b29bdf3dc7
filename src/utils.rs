//! Log-space helpers shared by model construction and decoding.

/// Natural logarithm of a validated (finite, non-negative) probability.
///
/// `0.0` maps to negative infinity; no NaN can be produced from validated
/// input.
#[inline]
pub fn ln_prob(p: f64) -> f64 {
    if p == 0.0 {
        f64::NEG_INFINITY
    } else {
        p.ln()
    }
}

/// True if `p` may appear in a probability table.
#[inline]
pub fn is_valid_probability(p: f64) -> bool {
    p.is_finite() && p >= 0.0
}

/// Index and value of the first strict maximum.
///
/// The running best starts at negative infinity and is only replaced on a
/// strictly greater candidate, so ties resolve to the earliest index and an
/// all `-inf` input yields `None`.
#[inline]
pub fn first_argmax<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut best = f64::NEG_INFINITY;
    let mut arg = None;
    for (i, v) in values.into_iter().enumerate() {
        if v > best {
            best = v;
            arg = Some(i);
        }
    }
    arg.map(|i| (i, best))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_negative_infinity() {
        assert_eq!(ln_prob(0.0), f64::NEG_INFINITY);
        assert_eq!(ln_prob(1.0), 0.0);
        assert!((ln_prob(0.5) - 0.5f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn rejects_non_finite_and_negative() {
        assert!(is_valid_probability(0.0));
        assert!(is_valid_probability(1.5));
        assert!(!is_valid_probability(-0.1));
        assert!(!is_valid_probability(f64::NAN));
        assert!(!is_valid_probability(f64::INFINITY));
    }

    #[test]
    fn ties_resolve_to_first_index() {
        assert_eq!(first_argmax([-1.0, -0.5, -0.5]), Some((1, -0.5)));
        assert_eq!(first_argmax([-2.0, -2.0]), Some((0, -2.0)));
    }

    #[test]
    fn all_negative_infinity_has_no_argmax() {
        assert_eq!(first_argmax([f64::NEG_INFINITY; 3]), None);
        assert_eq!(first_argmax(std::iter::empty()), None);
    }
}
