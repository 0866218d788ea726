//! Linear interpolation over sequences with missing entries.

/// Fills interior gaps of a numeric sequence by linear interpolation.
///
/// Every missing position that has a known value on both sides is replaced
/// by the value on the straight line between those two anchors. Missing runs
/// at the start or end of the sequence have only one anchor and are left
/// missing; no extrapolation is performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSequenceInterpolator;

impl LinearSequenceInterpolator {
    /// Interpolate the interior missing runs of `seq`.
    ///
    /// The output has the same length as the input and the same value at
    /// every known position. Sequences with fewer than two known values are
    /// returned unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lex_imputation::LinearSequenceInterpolator;
    ///
    /// let filled = LinearSequenceInterpolator::interpolate(&[Some(1.0), None, None, Some(4.0)]);
    /// assert_eq!(filled, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    /// ```
    pub fn interpolate(seq: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut out = seq.to_vec();

        let known: Vec<(usize, f64)> = seq
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| value.map(|v| (idx, v)))
            .collect();

        if known.len() < 2 {
            return out;
        }

        for pair in known.windows(2) {
            let (i, v_i) = pair[0];
            let (j, v_j) = pair[1];
            if j - i < 2 {
                continue;
            }

            let span = (j - i) as f64;
            for (k, slot) in out.iter_mut().enumerate().take(j).skip(i + 1) {
                *slot = Some(v_i + (v_j - v_i) * (k - i) as f64 / span);
            }
        }

        out
    }

    /// Number of missing positions in `seq` that have an anchor on both sides.
    pub fn count_interpolable(seq: &[Option<f64>]) -> usize {
        let first_known = seq.iter().position(Option::is_some);
        let last_known = seq.iter().rposition(Option::is_some);

        match (first_known, last_known) {
            (Some(first), Some(last)) if last > first => {
                seq[first..=last].iter().filter(|v| v.is_none()).count()
            }
            _ => 0,
        }
    }
}
