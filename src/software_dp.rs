//! A software stand-in for the DP system: holds the configuration and the
//! delay FIRs and runs the channel filters or the beamformer over captured
//! wideband data.

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex;

use crate::{
    antenna::AntennaInfo,
    beamformer::{self, BeamSteering},
    delay_fir::{DelayFirBank, DelayFirUpdate},
    dsp,
    error::Result,
    executor::Executor,
    mode::{DpConfig, Mode},
    response::FilterResponse,
    traits::{ToComplex, ToReal},
};

#[derive(Debug)]
pub struct SoftwareDp {
    config: DpConfig,
    delay_firs: DelayFirBank,
    executor: Executor,
}

impl SoftwareDp {
    /// a DP using all available cores
    pub fn new(mode: Mode, filter: u8, central_freq: f64) -> Result<SoftwareDp> {
        SoftwareDp::with_workers(mode, filter, central_freq, 0)
    }

    /// `workers == 0` uses all available cores, 1 processes serially
    pub fn with_workers(
        mode: Mode,
        filter: u8,
        central_freq: f64,
        workers: usize,
    ) -> Result<SoftwareDp> {
        let config = DpConfig::new(mode, filter, central_freq)?;
        let executor = Executor::new(workers)?;
        Ok(SoftwareDp {
            config,
            delay_firs: DelayFirBank::new(),
            executor,
        })
    }

    pub fn config(&self) -> &DpConfig {
        &self.config
    }

    pub fn delay_firs(&self) -> &DelayFirBank {
        &self.delay_firs
    }

    pub fn workers(&self) -> usize {
        self.executor.workers()
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.config.set_mode(mode)?;
        log::info!("{}", self);
        Ok(())
    }

    pub fn set_filter(&mut self, filter: u8) -> Result<()> {
        self.config.set_filter(filter)?;
        log::info!("{}", self);
        Ok(())
    }

    pub fn reconfigure(&mut self, mode: Mode, filter: u8) -> Result<()> {
        self.config.reconfigure(mode, filter)?;
        log::info!("{}", self);
        Ok(())
    }

    pub fn set_central_freq(&mut self, central_freq: f64) -> Result<()> {
        self.config.set_central_freq(central_freq)?;
        log::info!("{}", self);
        Ok(())
    }

    pub fn set_delay_firs(&mut self, update: DelayFirUpdate) -> Result<()> {
        log::info!("delay FIR update: {}", describe(&update));
        self.delay_firs.apply(update)
    }

    /// output sample rate of the current filter, in Hz
    pub fn sample_rate(&self) -> f64 {
        self.config.filter_pack().sample_rate()
    }

    /// filter a single input with the current mode, filter and tuning
    pub fn apply_filter<R: ToComplex>(
        &self,
        time: &[i64],
        data: &[R],
    ) -> Result<Vec<Complex<f64>>> {
        dsp::process_stream(
            time,
            data,
            self.config.filter_pack(),
            self.config.central_freq(),
        )
    }

    /// filter every row of `data` (inputs x time) in parallel
    pub fn apply_filter_batch<R: ToComplex + Sync>(
        &self,
        time: ArrayView1<i64>,
        data: ArrayView2<R>,
    ) -> Result<Array2<Complex<f64>>> {
        dsp::process_batch(
            &self.executor,
            time,
            data,
            self.config.filter_pack(),
            self.config.central_freq(),
        )
    }

    /// form the X and Y beams with the current delay FIRs
    pub fn form_beam<A, S>(
        &self,
        antennas: &[A],
        data: ArrayView2<S>,
        steering: &BeamSteering,
    ) -> Result<(Array1<f64>, Array1<f64>)>
    where
        A: AntennaInfo + Sync,
        S: ToReal + Sync,
    {
        beamformer::form_beam(&self.executor, &self.delay_firs, antennas, data, steering)
    }

    /// response curve of the current filter
    pub fn filter_response(&self, npts: usize) -> Result<FilterResponse> {
        FilterResponse::new(self.config.mode(), self.sample_rate(), npts)
    }
}

impl fmt::Display for SoftwareDp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Software DP: {} with filter {} at {:.3} MHz",
            self.config.mode(),
            self.config.filter(),
            self.config.central_freq() / 1e6
        )
    }
}

fn describe(update: &DelayFirUpdate) -> String {
    match update {
        DelayFirUpdate::Reset => "reset to defaults".to_string(),
        DelayFirUpdate::All(_) => "all channels".to_string(),
        DelayFirUpdate::Channel(ch, _) => format!("channel {}", ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DpError;

    #[test]
    fn display() {
        let dp = SoftwareDp::with_workers(Mode::Drx, 7, 74e6, 1).unwrap();
        assert_eq!(dp.to_string(), "Software DP: DRX with filter 7 at 74.000 MHz");
    }

    #[test]
    fn configuration_errors_leave_state_alone() {
        let mut dp = SoftwareDp::with_workers(Mode::Tbn, 7, 38e6, 1).unwrap();
        assert!(matches!(
            dp.set_central_freq(95e6),
            Err(DpError::InvalidConfiguration(_))
        ));
        assert!(dp.set_filter(3).is_err());
        assert_eq!(dp.to_string(), "Software DP: TBN with filter 7 at 38.000 MHz");
        assert_eq!(dp.sample_rate(), 100e3);

        dp.reconfigure(Mode::Drx, 4).unwrap();
        assert_eq!(dp.sample_rate(), 2e6);
        assert!(SoftwareDp::new(Mode::Drx, 2, 74e6).is_err());
    }

    #[test]
    fn response_follows_the_current_filter() {
        let dp = SoftwareDp::with_workers(Mode::Drx, 7, 74e6, 1).unwrap();
        let resp = dp.filter_response(200).unwrap();
        assert_eq!(resp.mode(), Mode::Drx);
        assert_eq!(resp.sample_rate(), 19.6e6);
        assert!(resp.eval(0.0).unwrap() > 0.9);
    }

    #[test]
    fn delay_fir_updates() {
        let mut dp = SoftwareDp::with_workers(Mode::Drx, 7, 74e6, 1).unwrap();
        dp.set_delay_firs(DelayFirUpdate::from_channel(3, vec![vec![1, 2]]).unwrap())
            .unwrap();
        assert_eq!(dp.delay_firs().filter(3, 0).unwrap(), &[1, 2]);
        dp.set_delay_firs(DelayFirUpdate::Reset).unwrap();
        assert_eq!(dp.delay_firs().num_sets(), 1);
    }
}
