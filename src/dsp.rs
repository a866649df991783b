//! The DP channel chain for a single input: NCO mix to baseband, DC
//! removal, CIC decimation and FIR decimation.

use ndarray::{Array2, ArrayView1, ArrayView2};
use num_complex::Complex;

use crate::{
    error::{DpError, Result},
    executor::Executor,
    filter::Filter,
    mode::FilterPack,
    oscillator::Nco,
    traits::ToComplex,
    utils::mean,
};

/// Run one stream through the filter pack.
///
/// `time` holds the time tags of the samples in periods of the sampling
/// clock. The result has `ceil(ceil(n / cicD) / firD)` samples at
/// `pack.sample_rate()`.
pub fn process_stream<R>(
    time: &[i64],
    data: &[R],
    pack: &FilterPack,
    central_freq: f64,
) -> Result<Vec<Complex<f64>>>
where
    R: ToComplex,
{
    if time.len() != data.len() {
        return Err(DpError::InvalidInput(format!(
            "{} time tags for {} samples",
            time.len(),
            data.len()
        )));
    }
    if data.is_empty() {
        return Err(DpError::InvalidInput("empty input stream".to_string()));
    }

    let nco = Nco::new(central_freq)?;
    let mut mixed: Vec<Complex<f64>> = time
        .iter()
        .zip(data)
        .map(|(&t, x)| x.to_complex() * nco.mixer(t))
        .collect();
    if let Some(dc) = mean(&mixed) {
        mixed.iter_mut().for_each(|x| *x -= dc);
    }

    let cic_taps: Vec<f64> = pack.cic.iter().map(|&c| c as f64).collect();
    let mut cic = Filter::<f64, Complex<f64>>::new(cic_taps)?;
    let cic_d = pack.cic_d as f64;
    let stage1: Vec<Complex<f64>> = cic
        .filter_decimate(&mixed, pack.cic_d)?
        .into_iter()
        .map(|x| x / cic_d)
        .collect();

    let mut fir = Filter::<f64, Complex<f64>>::new(pack.fir.to_vec())?;
    fir.filter_decimate(&stage1, pack.fir_d)
}

/// Run every row of `data` (inputs x time) through the filter pack on the
/// executor's workers; all rows share the time tags.
pub fn process_batch<R>(
    executor: &Executor,
    time: ArrayView1<i64>,
    data: ArrayView2<R>,
    pack: &FilterPack,
    central_freq: f64,
) -> Result<Array2<Complex<f64>>>
where
    R: ToComplex + Sync,
{
    let (ninputs, nsamples) = data.dim();
    if time.len() != nsamples {
        return Err(DpError::InvalidInput(format!(
            "{} time tags for {} samples per input",
            time.len(),
            nsamples
        )));
    }
    let time = time.to_vec();

    let rows = executor.run(ninputs, |i| {
        let row = data.row(i).to_vec();
        process_stream(&time, &row, pack, central_freq)
    })?;

    let nout = rows.first().map_or(0, |r| r.len());
    let flat: Vec<Complex<f64>> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((ninputs, nout), flat)
        .map_err(|e| DpError::InvalidInput(format!("cannot assemble batch output: {}", e)))
}
