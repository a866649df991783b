//! Simple test signals at DP output rates: complex noise plus a tone on
//! each polarization, for checking a TBN or DRX data path end to end.

use ndarray::{Array1, Array2};
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    error::{DpError, Result},
    mode::{FilterPack, Mode},
    oscillator::COscillator,
};

/// full scale of the 8-bit TBN samples
pub const TBN_MAX_VALUE: f64 = 127.0;

/// full scale of the 4-bit DRX samples
pub const DRX_MAX_VALUE: f64 = 7.0;

#[derive(Debug, Clone)]
pub struct BasicSignal {
    pub sample_rate: f64,
    /// time tags in periods of the sampling clock
    pub time: Array1<i64>,
    /// one row per (tuning, polarization), X before Y
    pub data: Array2<Complex<f64>>,
}

/// Generate `nsamples` of the basic test signal.
///
/// TBN: X carries a tone at +rate/4 and Y one at -rate/4. DRX tuning 1
/// is the same; tuning 2 has -rate/3 on X and +rate/3 on Y. The noise has
/// a standard deviation of `noise_strength` times full scale in both the
/// real and imaginary parts.
pub fn basic_signal<G: Rng>(
    mode: Mode,
    filter: u8,
    nsamples: usize,
    ntuning: usize,
    noise_strength: f64,
    rng: &mut G,
) -> Result<BasicSignal> {
    let pack = FilterPack::lookup(mode, filter)?;
    let sample_rate = pack.sample_rate();

    let (max_value, tones) = match mode {
        Mode::Tbn => (TBN_MAX_VALUE, vec![0.25, -0.25]),
        Mode::Drx => match ntuning {
            1 => (DRX_MAX_VALUE, vec![0.25, -0.25]),
            2 => (DRX_MAX_VALUE, vec![0.25, -0.25, -1.0 / 3.0, 1.0 / 3.0]),
            n => {
                return Err(DpError::InvalidConfiguration(format!(
                    "DRX has one or two tunings, not {}",
                    n
                )))
            }
        },
    };

    let noise = Normal::new(0.0, max_value * noise_strength).map_err(|e| {
        DpError::InvalidInput(format!("noise strength {}: {}", noise_strength, e))
    })?;

    let mut data = Array2::<Complex<f64>>::zeros((tones.len(), nsamples));
    for (mut row, &tone) in data.outer_iter_mut().zip(&tones) {
        let mut osc = COscillator::<f64>::with_freq(tone * sample_rate, sample_rate);
        for x in row.iter_mut() {
            let n = Complex::new(noise.sample(rng), noise.sample(rng));
            *x = n + osc.get() * max_value;
        }
    }

    let time = Array1::from_iter((0..nsamples).map(|i| (i * pack.total_d) as i64));
    log::debug!(
        "{} samples of {} filter {} at {} Hz, {} streams",
        nsamples,
        mode,
        filter,
        sample_rate,
        tones.len()
    );

    Ok(BasicSignal {
        sample_rate,
        time,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn tbn_tones_without_noise() {
        let mut rng = StdRng::seed_from_u64(1);
        let sig = basic_signal(Mode::Tbn, 7, 8, 1, 0.0, &mut rng).unwrap();
        assert_eq!(sig.sample_rate, 100e3);
        assert_eq!(sig.data.dim(), (2, 8));
        assert_eq!(sig.time[3], 3 * 1960);
        // +rate/4 advances a quarter turn per sample, -rate/4 goes the other way
        assert_abs_diff_eq!(sig.data[[0, 1]].im, 127.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sig.data[[1, 1]].im, -127.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sig.data[[0, 2]].re, -127.0, epsilon = 1e-9);
    }

    #[test]
    fn drx_second_tuning() {
        let mut rng = StdRng::seed_from_u64(2);
        let sig = basic_signal(Mode::Drx, 6, 6, 2, 0.0, &mut rng).unwrap();
        assert_eq!(sig.data.dim(), (4, 6));
        // a third of a turn per sample, backwards on X and forwards on Y
        let third = 2.0 * std::f64::consts::PI / 3.0;
        assert_abs_diff_eq!(sig.data[[2, 1]].arg(), -third, epsilon = 1e-9);
        assert_abs_diff_eq!(sig.data[[3, 1]].arg(), third, epsilon = 1e-9);
        assert_abs_diff_eq!(sig.data[[3, 1]].norm(), 7.0, epsilon = 1e-9);
        assert!(basic_signal(Mode::Drx, 6, 6, 3, 0.0, &mut rng).is_err());
    }

    #[test]
    fn noise_level_and_seeding() {
        let sig = basic_signal(Mode::Tbn, 5, 20_000, 1, 0.1, &mut StdRng::seed_from_u64(3)).unwrap();
        let again = basic_signal(Mode::Tbn, 5, 20_000, 1, 0.1, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(sig.data, again.data);

        let clean = basic_signal(Mode::Tbn, 5, 20_000, 1, 0.0, &mut StdRng::seed_from_u64(3)).unwrap();
        let residual = &sig.data - &clean.data;
        let var = residual.iter().map(|c| c.norm_sqr()).sum::<f64>() / residual.len() as f64;
        // two components of (12.7)^2 each
        assert_abs_diff_eq!(var, 2.0 * 12.7 * 12.7, epsilon = 20.0);
    }

    #[test]
    fn unsupported_filter() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(basic_signal(Mode::Tbn, 3, 10, 1, 0.1, &mut rng).is_err());
        assert!(basic_signal(Mode::Drx, 7, 10, 1, -1.0, &mut rng).is_err());
    }
}
