//! Rolling indicator derivation.
//!
//! Two indicators per country, each derived independently from the selected
//! table (per-country computations share nothing and could be parallelized,
//! though the current pass is a single thread):
//! - [`incidence::incidence_7d`]: 7-day trailing mean of daily cases per
//!   100,000 inhabitants, partial windows allowed.
//! - [`growth::growth_factor_7d`]: ratio of a trailing week's case sum to
//!   the week before it, full windows only.
//!
//! A country failing an indicator's requirements contributes no rows; it is
//! never an error. An empty output is an empty vector of fully-typed points,
//! never a schema-less table.

pub mod growth;
pub mod incidence;

#[cfg(test)]
pub mod tests;

pub use growth::growth_factor_7d;
pub use incidence::incidence_7d;

/// Trailing rolling mean over `window` values, requiring at least one
/// usable observation. Non-finite inputs are excluded from the window
/// rather than poisoning it; a window with no usable observation yields
/// NaN but still yields a value, so output length equals input length.
pub(crate) fn rolling_mean_min1(values: &[f64], window: usize) -> Vec<f64> {
    let mut means = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let mut sum = 0.0;
        let mut count = 0usize;
        for &v in &values[start..=i] {
            if v.is_finite() {
                sum += v;
                count += 1;
            }
        }
        means.push(if count > 0 { sum / count as f64 } else { f64::NAN });
    }
    means
}
