//! Direct form FIR filter with optional decimation, the equivalent of
//! `lfilter(b, 1, x)` with the history carried between calls

use std::{
    iter::Sum,
    ops::{Add, Mul},
};

use crate::error::{DpError, Result};

#[derive(Clone)]
pub struct Filter<T, U> {
    /// reversed coefficients, i.e., impulse response read backwards
    pub coeff_rev: Vec<T>,
    /// the last `tap - 1` input samples
    pub initial_state: Vec<U>,
    /// samples to drop before the next decimated output
    skip: usize,
}

impl<T, U> Filter<T, U>
where
    T: Copy,
    U: Copy + Add<U, Output = U> + Mul<T, Output = U> + Sum + Default,
{
    pub fn new(mut coeff: Vec<T>) -> Result<Self> {
        if coeff.is_empty() {
            return Err(DpError::InvalidInput(
                "a FIR filter needs at least one tap".to_string(),
            ));
        }
        coeff.reverse();
        let tap = coeff.len();
        Ok(Filter {
            coeff_rev: coeff,
            initial_state: vec![<U as Default>::default(); tap - 1],
            skip: 0,
        })
    }

    pub fn with_initial_state(mut self, initial_state: Vec<U>) -> Result<Self> {
        if initial_state.len() != self.coeff_rev.len() - 1 {
            return Err(DpError::InvalidInput(format!(
                "initial state has {} samples, the filter needs {}",
                initial_state.len(),
                self.coeff_rev.len() - 1
            )));
        }
        self.initial_state = initial_state;
        Ok(self)
    }

    pub fn tap(&self) -> usize {
        self.coeff_rev.len()
    }

    /// filter a signal, one output per input sample
    pub fn filter(&mut self, signal: &[U]) -> Vec<U> {
        let tap = self.coeff_rev.len();
        let output_length = signal.len();

        self.initial_state.reserve(signal.len());
        self.initial_state.extend_from_slice(signal);

        let result = self
            .initial_state
            .windows(tap)
            .map(|x| x.iter().zip(&self.coeff_rev).map(|(&a, &b)| a * b).sum())
            .collect::<Vec<_>>();

        self.keep_history();
        debug_assert_eq!(result.len(), output_length);
        result
    }

    /// filter a signal and keep every `step`-th output, starting with the
    /// first one, i.e. `lfilter(b, 1, x)[::step]`; the decimation phase
    /// continues across calls
    pub fn filter_decimate(&mut self, signal: &[U], step: usize) -> Result<Vec<U>> {
        if step == 0 {
            return Err(DpError::InvalidInput(
                "decimation factor must be positive".to_string(),
            ));
        }
        let tap = self.coeff_rev.len();
        let n = signal.len();

        self.initial_state.reserve(n);
        self.initial_state.extend_from_slice(signal);

        let result = self
            .initial_state
            .windows(tap)
            .skip(self.skip)
            .step_by(step)
            .map(|x| x.iter().zip(&self.coeff_rev).map(|(&a, &b)| a * b).sum())
            .collect::<Vec<U>>();

        self.keep_history();
        self.skip = self.skip + result.len() * step - n;
        Ok(result)
    }

    fn keep_history(&mut self) {
        let keep = self.coeff_rev.len() - 1;
        let drop = self.initial_state.len() - keep;
        self.initial_state.drain(..drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn impulse_response() {
        let mut ft = Filter::<f64, f64>::new(vec![1.0, 2.0, 3.0]).unwrap();
        let y = ft.filter(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(y, vec![1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn state_is_carried_between_calls() {
        let coeff = vec![0.5, -1.0, 0.25, 2.0];
        let signal: Vec<_> = (0..37).map(|i| (i as f64 * 0.3).sin()).collect();
        let whole = Filter::<f64, f64>::new(coeff.clone()).unwrap().filter(&signal);

        let mut ft = Filter::<f64, f64>::new(coeff).unwrap();
        let mut pieces = ft.filter(&signal[..10]);
        pieces.extend(ft.filter(&signal[10..11]));
        pieces.extend(ft.filter(&signal[11..]));
        assert_eq!(whole, pieces);
    }

    #[test]
    fn decimation_keeps_every_step_th_output() {
        let coeff = vec![1.0, 1.0, 1.0];
        let signal: Vec<_> = (0..20).map(|i| i as f64).collect();
        let full = Filter::<f64, f64>::new(coeff.clone()).unwrap().filter(&signal);
        let expected: Vec<_> = full.iter().cloned().step_by(3).collect();

        let mut ft = Filter::<f64, f64>::new(coeff).unwrap();
        let once = ft.filter_decimate(&signal, 3).unwrap();
        assert_eq!(once, expected);

        // same answer when fed in awkward chunks
        let mut ft = Filter::<f64, f64>::new(vec![1.0, 1.0, 1.0]).unwrap();
        let mut chunked = Vec::new();
        for chunk in signal.chunks(4) {
            chunked.extend(ft.filter_decimate(chunk, 3).unwrap());
        }
        assert_eq!(chunked, expected);
    }

    #[test]
    fn complex_signal_real_taps() {
        let mut ft = Filter::<f64, Complex<f64>>::new(vec![2.0]).unwrap();
        let y = ft.filter(&[Complex::new(1.0, -1.0)]);
        assert_eq!(y, vec![Complex::new(2.0, -2.0)]);
    }

    #[test]
    fn degenerate_arguments_fail() {
        assert!(Filter::<f64, f64>::new(vec![]).is_err());
        let mut ft = Filter::<f64, f64>::new(vec![1.0]).unwrap();
        assert!(ft.filter_decimate(&[1.0], 0).is_err());
        assert!(Filter::<f64, f64>::new(vec![1.0, 2.0])
            .unwrap()
            .with_initial_state(vec![])
            .is_err());
    }
}
