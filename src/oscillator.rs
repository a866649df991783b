//! digital oscillators: a free running complex tone generator and the DP
//! numerically controlled oscillator used to tune to baseband

use num_complex::Complex;
use num_traits::{Float, FloatConst};

use crate::{codec::freq_to_word, error::Result};

/// Complex oscillator
pub struct COscillator<T> {
    /// current phase
    phi: T,
    /// phase difference between points
    dphi_dpt: T,
}

impl<T> COscillator<T>
where
    T: Float,
{
    /// constructor
    pub fn new(phi: T, dphi_dpt: T) -> COscillator<T> {
        COscillator { phi, dphi_dpt }
    }

    /// get the next value
    pub fn get(&mut self) -> Complex<T> {
        let y = (Complex::<T>::new(T::zero(), T::one()) * self.phi).exp();
        self.phi = self.phi + self.dphi_dpt;
        y
    }
}

impl<T> COscillator<T>
where
    T: Float + FloatConst,
{
    /// oscillator producing a tone of `freq` when sampled at `sample_rate`
    pub fn with_freq(freq: T, sample_rate: T) -> COscillator<T> {
        let two = T::one() + T::one();
        COscillator::new(T::zero(), two * T::PI() * freq / sample_rate)
    }
}

/// Numerically controlled oscillator driven by the 32-bit DP tuning word.
///
/// The phase at a time tag `t` (counted in periods of the sampling clock) is
/// `word * t mod 2^32` cycles, so it stays exact for time tags since the
/// UNIX epoch where `freq * t / fS` in floating point would not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nco {
    word: u32,
}

impl Nco {
    pub fn new(freq: f64) -> Result<Nco> {
        Ok(Nco {
            word: freq_to_word(freq)?,
        })
    }

    pub fn word(&self) -> u32 {
        self.word
    }

    /// phase in cycles, in [0, 1)
    pub fn phase(&self, time_tag: i64) -> f64 {
        let acc = (self.word as u64).wrapping_mul(time_tag as u64) as u32;
        acc as f64 / 4294967296.0
    }

    /// `exp(-2 pi i f t / fS)`, the factor that moves `f` to 0 Hz
    pub fn mixer(&self, time_tag: i64) -> Complex<f64> {
        Complex::from_polar(1.0, -2.0 * f64::PI() * self.phase(time_tag))
    }
}
