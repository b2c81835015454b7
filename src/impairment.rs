//! Deterministic channel impairments for IQ captures
//!
//! Synthesizes a degraded copy of a clean capture to exercise demodulator
//! robustness. Two transforms, applied in this order:
//!
//! 1. **Carrier frequency offset** in FFT bins: sample `n` is rotated by
//!    `2π · cfo_bins · (n mod N) / N`. The phase restarts every symbol
//!    (`N = 2^SF · OSR` samples), so the offset is relative to one symbol's
//!    bin spacing rather than accumulated over the capture.
//! 2. **Timing offset** in samples, rounded half-to-even to an integer `k`.
//!    A positive `k` drops the first `k` samples and pads zeros at the end, a
//!    negative `k` pads zeros at the front and drops the tail. The shift is
//!    not circular: samples shifted out are gone.
//!
//! With no offsets the output is an exact copy of the input, which lets the
//! un-impaired vector be checksummed against the baseline.

use crate::error::{HarnessError, Result};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Supported spreading factors
pub const SF_RANGE: std::ops::RangeInclusive<u32> = 5..=12;

/// Symbol length in samples: `2^SF * OSR`
pub fn symbol_len(sf: u32, osr: u32) -> Result<usize> {
    if !SF_RANGE.contains(&sf) {
        return Err(HarnessError::InvalidParameter(format!(
            "spreading factor must be in {}..={}, got {}",
            SF_RANGE.start(),
            SF_RANGE.end(),
            sf
        )));
    }
    if osr == 0 {
        return Err(HarnessError::InvalidParameter(
            "oversampling ratio must be >= 1".to_string(),
        ));
    }
    Ok((1usize << sf) * osr as usize)
}

/// Offsets to apply; an absent offset is zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Impairment {
    /// Carrier frequency offset in (fractional) FFT bins
    pub cfo_bins: Option<f64>,
    /// Timing offset in (fractional) samples
    pub time_offset: Option<f64>,
}

impl Impairment {
    pub fn new(cfo_bins: Option<f64>, time_offset: Option<f64>) -> Self {
        Self {
            cfo_bins,
            time_offset,
        }
    }

    pub fn cfo(&self) -> f64 {
        self.cfo_bins.unwrap_or(0.0)
    }

    /// Integer sample shift, rounding half to even
    pub fn shift_samples(&self) -> i64 {
        self.time_offset.unwrap_or(0.0).round_ties_even() as i64
    }

    pub fn is_identity(&self) -> bool {
        self.cfo() == 0.0 && self.time_offset.unwrap_or(0.0) == 0.0
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cfo().is_finite() {
            return Err(HarnessError::InvalidParameter(format!(
                "cfo_bins must be finite, got {}",
                self.cfo()
            )));
        }
        let offset = self.time_offset.unwrap_or(0.0);
        if !offset.is_finite() {
            return Err(HarnessError::InvalidParameter(format!(
                "time_offset must be finite, got {}",
                offset
            )));
        }
        Ok(())
    }
}

/// Apply `impairment` to `samples`, returning a new sequence of equal length
pub fn inject(
    samples: &[Complex64],
    symbol_len: usize,
    impairment: &Impairment,
) -> Result<Vec<Complex64>> {
    impairment.validate()?;
    if symbol_len == 0 {
        return Err(HarnessError::InvalidParameter(
            "symbol length must be non-zero".to_string(),
        ));
    }
    if samples.len() % symbol_len != 0 {
        tracing::warn!(
            "IQ capture of {} samples is not a whole number of {}-sample symbols",
            samples.len(),
            symbol_len
        );
    }

    let mut out = samples.to_vec();

    let cfo = impairment.cfo();
    if cfo != 0.0 {
        rotate(&mut out, symbol_len, cfo);
    }

    let k = impairment.shift_samples();
    if k != 0 {
        out = shift(out, k);
    }

    Ok(out)
}

fn rotate(samples: &mut [Complex64], symbol_len: usize, cfo_bins: f64) {
    for (n, s) in samples.iter_mut().enumerate() {
        let phase = 2.0 * PI * cfo_bins * (n % symbol_len) as f64 / symbol_len as f64;
        *s *= Complex64::new(phase.cos(), phase.sin());
    }
}

/// Zero-padded, non-circular shift by `k` samples
fn shift(samples: Vec<Complex64>, k: i64) -> Vec<Complex64> {
    let len = samples.len();
    let zero = Complex64::new(0.0, 0.0);
    let k_abs = usize::try_from(k.unsigned_abs()).unwrap_or(usize::MAX);
    if k_abs >= len {
        return vec![zero; len];
    }

    let mut out = Vec::with_capacity(len);
    if k > 0 {
        out.extend_from_slice(&samples[k_abs..]);
        out.resize(len, zero);
    } else {
        out.resize(k_abs, zero);
        out.extend_from_slice(&samples[..len - k_abs]);
    }
    out
}
