use rustfft::{FftNum, FftPlanner};

use num_complex::Complex;
use num_traits::{Float, FloatConst, NumAssign};

use crate::error::{DpError, Result};

pub fn fft<T>(in_data: &[Complex<T>]) -> Vec<Complex<T>>
where
    T: Float + FloatConst + NumAssign + FftNum,
{
    let mut output = Vec::from(in_data);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(in_data.len());
    fft.process(&mut output);
    output
}

/// `numpy.roll`: element `i` moves to `(i + shift) % len`
pub fn roll<T: Copy>(in_data: &[T], shift: usize) -> Result<Vec<T>> {
    let n = in_data.len();
    if shift >= n {
        return Err(DpError::InvalidInput(format!(
            "cannot shift {} samples by {}",
            n, shift
        )));
    }
    let mut result = Vec::with_capacity(n);
    result.extend_from_slice(&in_data[n - shift..]);
    result.extend_from_slice(&in_data[..n - shift]);
    Ok(result)
}

/// arithmetic mean, `None` for an empty slice
pub fn mean(in_data: &[Complex<f64>]) -> Option<Complex<f64>> {
    if in_data.is_empty() {
        None
    } else {
        Some(in_data.iter().sum::<Complex<f64>>() / in_data.len() as f64)
    }
}
