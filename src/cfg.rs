//! This module contains a set of cfg structs, from which actual working structs are constructed
//! It is convient to generate working structs from cfg files on disks

use serde::{Deserialize, Serialize};

use crate::{
    antenna::Antenna,
    beamformer::{BeamGain, BeamSteering},
    delay_fir::DelayFirUpdate,
    error::{DpError, Result},
    mode::Mode,
    software_dp::SoftwareDp,
};

/// cfg to generate a software DP
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DpCfg {
    pub mode: Mode,
    /// filter code, valid codes depend on the mode
    pub filter: u8,
    /// tuning in Hz
    pub central_freq: f64,
    /// worker threads, 0 for all cores
    #[serde(default)]
    pub workers: usize,
}

/// cfg of a beam, one antenna and one delay per data row
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct BeamCfg {
    pub antennas: Vec<Antenna>,
    /// delay of each input in ns
    pub delays_ns: Vec<f64>,
    /// one [XofX, XofY, YofX, YofY] row per stand
    pub gains: Vec<[f64; 4]>,
}

/// replacement delay FIRs; channel -1 resets, 0 sets all channels
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DelayFirCfg {
    pub channel: i32,
    #[serde(default)]
    pub coeffs: Vec<Vec<i32>>,
}

/// everything the rsdp tool reads
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RunCfg {
    pub dp: DpCfg,
    #[serde(default)]
    pub beam: Option<BeamCfg>,
    #[serde(default)]
    pub delay_firs: Vec<DelayFirCfg>,
}

pub fn cfg2dp(cfg: &DpCfg) -> Result<SoftwareDp> {
    SoftwareDp::with_workers(cfg.mode, cfg.filter, cfg.central_freq, cfg.workers)
}

pub fn cfg2beam(cfg: &BeamCfg) -> Result<(Vec<Antenna>, BeamSteering)> {
    if cfg.delays_ns.len() != cfg.antennas.len() {
        return Err(DpError::InvalidConfiguration(format!(
            "{} delays for {} antennas",
            cfg.delays_ns.len(),
            cfg.antennas.len()
        )));
    }
    let gains = cfg.gains.iter().map(|&g| BeamGain::from(g)).collect();
    let steering = BeamSteering::from_delays_ns(&cfg.delays_ns, gains)?;
    Ok((cfg.antennas.clone(), steering))
}

pub fn cfg2delay_fir(cfg: &DelayFirCfg) -> Result<DelayFirUpdate> {
    DelayFirUpdate::from_channel(cfg.channel, cfg.coeffs.clone())
}

/// build the DP and apply the delay FIR updates in order
pub fn cfg2run(cfg: &RunCfg) -> Result<SoftwareDp> {
    let mut dp = cfg2dp(&cfg.dp)?;
    for update in &cfg.delay_firs {
        dp.set_delay_firs(cfg2delay_fir(update)?)?;
    }
    Ok(dp)
}
