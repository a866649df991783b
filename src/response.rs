//! Magnitude response of the cascaded CIC + FIR channel filters, for
//! inspecting the filter shape of a mode at a given output sample rate.

use itertools_num::linspace;
use num_complex::Complex;
use num_traits::FloatConst;

use crate::{
    constants::FS,
    error::{DpError, Result},
    interp::CubicSpline,
    mode::Mode,
    utils::fft,
};

/// default number of frequency points per side
pub const DEFAULT_NPTS: usize = 1000;

/// Normalized power response, mirrored to negative frequencies and
/// interpolated with a cubic spline
#[derive(Debug, Clone)]
pub struct FilterResponse {
    mode: Mode,
    sample_rate: f64,
    freqs: Vec<f64>,
    response: Vec<f64>,
    spline: CubicSpline,
}

/// shape of a TBN filter for the given output sample rate
pub fn tbn_filter(sample_rate: f64, npts: usize) -> Result<FilterResponse> {
    FilterResponse::new(Mode::Tbn, sample_rate, npts)
}

/// shape of a DRX filter for the given output sample rate
pub fn drx_filter(sample_rate: f64, npts: usize) -> Result<FilterResponse> {
    FilterResponse::new(Mode::Drx, sample_rate, npts)
}

impl FilterResponse {
    pub fn new(mode: Mode, sample_rate: f64, npts: usize) -> Result<FilterResponse> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(DpError::InvalidInput(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if npts < 2 {
            return Err(DpError::InvalidInput(format!(
                "need at least two points for the response, got {}",
                npts
            )));
        }

        let decimation = match mode {
            Mode::Tbn => FS / sample_rate / 10.0,
            Mode::Drx => FS / sample_rate,
        };
        let decimation_cic = decimation / 2.0;

        // CIC part, the 0/0 at DC replaced by its limit
        let (order, r) = mode.cic_shape();
        let w_cic = linspace(0.0, f64::PI() / decimation_cic / 2.0, npts)
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    (2.0 * r).powi(order)
                } else {
                    ((h * r).sin() / (h / 2.0).sin()).powi(order)
                }
            });

        // FIR part, on the freqz grid pi*k/npts
        let w_fir = fir_magnitude(mode.fir(), npts);

        let w: Vec<f64> = w_cic
            .zip(w_fir.iter())
            .map(|(c, &f)| (c.abs() * f).powi(2))
            .collect();
        let h: Vec<f64> = (0..npts)
            .map(|k| k as f64 / npts as f64 * FS / decimation)
            .collect();

        let peak = w.iter().cloned().fold(0.0, f64::max);
        if !(peak > 0.0 && peak.is_finite()) {
            return Err(DpError::InvalidInput(format!(
                "degenerate {} response at {} Hz",
                mode, sample_rate
            )));
        }

        let freqs: Vec<f64> = h
            .iter()
            .rev()
            .map(|&x| -x)
            .chain(h.iter().skip(1).cloned())
            .collect();
        let response: Vec<f64> = w
            .iter()
            .rev()
            .chain(w.iter().skip(1))
            .map(|&x| x / peak)
            .collect();
        let spline = CubicSpline::new(freqs.clone(), response.clone())?;

        Ok(FilterResponse {
            mode,
            sample_rate,
            freqs,
            response,
            spline,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// frequency grid in Hz, symmetric about 0
    pub fn frequencies(&self) -> &[f64] {
        &self.freqs
    }

    /// normalized power response on [`Self::frequencies`]
    pub fn response(&self) -> &[f64] {
        &self.response
    }

    /// interpolated response at `freq` Hz, `None` outside the computed band
    pub fn eval(&self, freq: f64) -> Option<f64> {
        self.spline.eval(freq)
    }
}

/// |H(e^{i w})| of a FIR at w = pi*k/npts, k = 0..npts.  Sampling the DTFT
/// at 2*npts points is the FFT of the taps folded modulo 2*npts.
fn fir_magnitude(taps: &[f64], npts: usize) -> Vec<f64> {
    let n_fft = 2 * npts;
    let mut folded = vec![Complex::<f64>::new(0.0, 0.0); n_fft];
    for (i, &b) in taps.iter().enumerate() {
        folded[i % n_fft].re += b;
    }
    fft(&folded).iter().take(npts).map(|x| x.norm()).collect()
}
