//! Pure numeric reductions over observation values.

/// Arithmetic mean, or `None` for an empty slice or a non-finite result.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.is_finite().then_some(mean)
}

/// Last `size` values, or `None` when fewer are available.
pub fn trailing_window(values: &[f64], size: usize) -> Option<&[f64]> {
    let start = values.len().checked_sub(size)?;
    Some(&values[start..])
}

/// `(last - first) / first`. `None` when the window has fewer than two points or starts at zero.
pub fn total_return(values: &[f64]) -> Option<f64> {
    let (first, last) = match values {
        [first, .., last] => (*first, *last),
        _ => return None,
    };
    if first == 0.0 {
        return None;
    }
    let total = (last - first) / first;
    total.is_finite().then_some(total)
}

/// Geometric annualization: `(1 + total)^(1 / years) - 1`.
pub fn annualize(total: f64, years: f64) -> Option<f64> {
    if years <= 0.0 {
        return None;
    }
    let annual = (1.0 + total).powf(1.0 / years) - 1.0;
    annual.is_finite().then_some(annual)
}

/// Published percentages (e.g. `4.25`) to decimal fractions (`0.0425`).
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}
