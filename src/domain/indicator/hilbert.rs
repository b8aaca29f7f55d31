//! Hilbert Transform SineWave (dominant cycle phase).
//!
//! Price is smoothed with a 4-bar WMA (4,3,2,1)/10. The smoothed series is
//! passed through the quadrature FIR
//!     H(x)[t] = (a*x[t] + b*x[t-2] - b*x[t-4] - a*x[t-6]) * (0.075*P + 0.54)
//! to get in-phase/quadrature components, whose homodyne product yields the
//! dominant cycle period P (clamped to [6, 50], rate limited to ±50%/-33%).
//! The phase is the arctangent of a DFT of the smoothed price over the
//! smoothed period. Outputs: sine = sin(phase), lead_sine = sin(phase + 45°).
//!
//! The first 37 candles only prime the WMA; outputs are valid from candle 63.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, Candle};

pub const LOOKBACK: usize = 63;
const HILBERT_START: usize = 37;
const A: f64 = 0.0962;
const B: f64 = 0.5769;

pub fn calculate_ht_sine(candles: &[Candle]) -> IndicatorSeries {
    let (sine, lead_sine) = ht_sine_raw(&closes(candles));

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let valid = sine[i].is_finite() && lead_sine[i].is_finite();
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid,
                value: IndicatorValue::Sine {
                    sine: if valid { sine[i] } else { 0.0 },
                    lead_sine: if valid { lead_sine[i] } else { 0.0 },
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::HtSine,
        values,
    }
}

/// Per-candle state of the quadrature filters; indices before the filter
/// start read as zero.
struct Quadrature {
    start: usize,
    smooth: Vec<f64>,
    detrender: Vec<f64>,
    q1: Vec<f64>,
    i1: Vec<f64>,
}

impl Quadrature {
    fn new(n: usize, start: usize) -> Self {
        Self {
            start,
            smooth: vec![0.0; n],
            detrender: vec![0.0; n],
            q1: vec![0.0; n],
            i1: vec![0.0; n],
        }
    }

    fn at(&self, series: &[f64], t: usize, lag: usize) -> f64 {
        if t < self.start + lag {
            0.0
        } else {
            series[t - lag]
        }
    }

    fn hilbert(&self, series: &[f64], t: usize, adjust: f64) -> f64 {
        (A * self.at(series, t, 0) + B * self.at(series, t, 2)
            - B * self.at(series, t, 4)
            - A * self.at(series, t, 6))
            * adjust
    }
}

fn ht_sine_raw(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = prices.len();
    let mut sine = vec![f64::NAN; n];
    let mut lead_sine = vec![f64::NAN; n];
    if n <= LOOKBACK {
        return (sine, lead_sine);
    }

    let rad2deg = 180.0 / std::f64::consts::PI;
    let deg2rad = 1.0 / rad2deg;

    let mut q = Quadrature::new(n, HILBERT_START);
    let mut period = 0.0_f64;
    let mut smooth_period = 0.0_f64;
    let mut dc_phase = 0.0_f64;
    let (mut prev_i2, mut prev_q2) = (0.0_f64, 0.0_f64);
    let (mut re, mut im) = (0.0_f64, 0.0_f64);

    for t in HILBERT_START..n {
        let adjust = 0.075 * period + 0.54;

        q.smooth[t] =
            (4.0 * prices[t] + 3.0 * prices[t - 1] + 2.0 * prices[t - 2] + prices[t - 3]) / 10.0;
        q.detrender[t] = q.hilbert(&q.smooth, t, adjust);
        q.q1[t] = q.hilbert(&q.detrender, t, adjust);
        q.i1[t] = q.at(&q.detrender, t, 3);
        let j_i = q.hilbert(&q.i1, t, adjust);
        let j_q = q.hilbert(&q.q1, t, adjust);

        let q2 = 0.2 * (q.q1[t] + j_i) + 0.8 * prev_q2;
        let i2 = 0.2 * (q.i1[t] - j_q) + 0.8 * prev_i2;

        re = 0.2 * (i2 * prev_i2 + q2 * prev_q2) + 0.8 * re;
        im = 0.2 * (i2 * prev_q2 - q2 * prev_i2) + 0.8 * im;
        prev_q2 = q2;
        prev_i2 = i2;

        let prior = period;
        if im != 0.0 && re != 0.0 {
            period = 360.0 / ((im / re).atan() * rad2deg);
        }
        period = period.min(1.5 * prior).max(0.67 * prior).clamp(6.0, 50.0);
        period = 0.2 * period + 0.8 * prior;
        smooth_period = 0.33 * period + 0.67 * smooth_period;

        let dc_period = (smooth_period + 0.5) as usize;
        let mut real_part = 0.0;
        let mut imag_part = 0.0;
        for i in 0..dc_period.min(t + 1 - HILBERT_START) {
            let angle = i as f64 * 2.0 * std::f64::consts::PI / dc_period as f64;
            let price = q.smooth[t - i];
            real_part += angle.sin() * price;
            imag_part += angle.cos() * price;
        }

        if imag_part.abs() > 0.0 {
            dc_phase = (real_part / imag_part).atan() * rad2deg;
        } else if real_part < 0.0 {
            dc_phase -= 90.0;
        } else if real_part > 0.0 {
            dc_phase += 90.0;
        }
        dc_phase += 90.0;
        dc_phase += 360.0 / smooth_period;
        if imag_part < 0.0 {
            dc_phase += 180.0;
        }
        if dc_phase > 315.0 {
            dc_phase -= 360.0;
        }

        if t >= LOOKBACK {
            sine[t] = (dc_phase * deg2rad).sin();
            lead_sine[t] = ((dc_phase + 45.0) * deg2rad).sin();
        }
    }

    (sine, lead_sine)
}
