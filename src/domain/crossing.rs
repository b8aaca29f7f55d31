//! Edge-triggered crossing detection.
//!
//! Each function is a pairwise scan over (previous, current) rows. Index 0 is
//! always `false` and any NaN in the compared pair yields `false`.

/// `a[i] > b[i] && a[i-1] <= b[i-1]`
pub fn crossed_above_series(a: &[f64], b: &[f64]) -> Vec<bool> {
    scan(a, b, |prev_a, prev_b, cur_a, cur_b| {
        cur_a > cur_b && prev_a <= prev_b
    })
}

/// `a[i] < b[i] && a[i-1] >= b[i-1]`
pub fn crossed_below_series(a: &[f64], b: &[f64]) -> Vec<bool> {
    scan(a, b, |prev_a, prev_b, cur_a, cur_b| {
        cur_a < cur_b && prev_a >= prev_b
    })
}

pub fn crossed_above(series: &[f64], threshold: f64) -> Vec<bool> {
    crossed_above_series(series, &vec![threshold; series.len()])
}

pub fn crossed_below(series: &[f64], threshold: f64) -> Vec<bool> {
    crossed_below_series(series, &vec![threshold; series.len()])
}

fn scan(a: &[f64], b: &[f64], crossed: impl Fn(f64, f64, f64, f64) -> bool) -> Vec<bool> {
    let n = a.len().min(b.len());
    let mut out = vec![false; a.len()];
    for i in 1..n {
        let window = [a[i - 1], b[i - 1], a[i], b[i]];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = crossed(a[i - 1], b[i - 1], a[i], b[i]);
    }
    out
}
