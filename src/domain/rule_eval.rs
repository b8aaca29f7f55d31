//! Rule evaluation over a whole indicator frame.
//!
//! # Evaluation Semantics
//!
//! - Every rule yields one flag per row.
//! - Comparisons involving NaN are `false`.
//! - `CROSS_ABOVE`/`CROSS_BELOW` are `false` at row 0 (see `crossing`).
//! - `Previous(x)` reads row i-1 and is NaN at row 0.
//! - `AND` is the row-wise conjunction of its children.

use crate::domain::crossing::{crossed_above_series, crossed_below_series};
use crate::domain::frame::IndicatorFrame;
use crate::domain::rule::{Operand, Rule};

pub fn evaluate(rule: &Rule, frame: &IndicatorFrame) -> Vec<bool> {
    match rule {
        Rule::CrossAbove { left, right } => crossed_above_series(
            &resolve_operand(left, frame),
            &resolve_operand(right, frame),
        ),
        Rule::CrossBelow { left, right } => crossed_below_series(
            &resolve_operand(left, frame),
            &resolve_operand(right, frame),
        ),
        Rule::Above { left, right } => compare(left, right, frame, |l, r| l > r),
        Rule::Below { left, right } => compare(left, right, frame, |l, r| l < r),
        Rule::AtMost { left, right } => compare(left, right, frame, |l, r| l <= r),
        Rule::And(rules) => {
            let mut out = vec![true; frame.len()];
            for r in rules {
                for (acc, flag) in out.iter_mut().zip(evaluate(r, frame)) {
                    *acc = *acc && flag;
                }
            }
            out
        }
    }
}

/// Operand values for every row of the frame.
pub fn resolve_operand(operand: &Operand, frame: &IndicatorFrame) -> Vec<f64> {
    let candles = &frame.candles;
    match operand {
        Operand::Open => candles.iter().map(|c| c.open).collect(),
        Operand::High => candles.iter().map(|c| c.high).collect(),
        Operand::Low => candles.iter().map(|c| c.low).collect(),
        Operand::Close => candles.iter().map(|c| c.close).collect(),
        Operand::Volume => candles.iter().map(|c| c.volume).collect(),
        Operand::Constant(v) => vec![*v; frame.len()],
        Operand::Column(column) => match frame.column(*column) {
            Some(values) => values.to_vec(),
            None => vec![f64::NAN; frame.len()],
        },
        Operand::Previous(inner) => {
            let current = resolve_operand(inner, frame);
            let mut shifted = vec![f64::NAN; current.len()];
            if current.len() > 1 {
                shifted[1..].copy_from_slice(&current[..current.len() - 1]);
            }
            shifted
        }
    }
}

// NaN on either side compares false.
fn compare(
    left: &Operand,
    right: &Operand,
    frame: &IndicatorFrame,
    op: impl Fn(f64, f64) -> bool,
) -> Vec<bool> {
    resolve_operand(left, frame)
        .into_iter()
        .zip(resolve_operand(right, frame))
        .map(|(l, r)| op(l, r))
        .collect()
}
