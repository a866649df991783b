//! DP observing modes, the filter packs they select and the validated
//! {mode, filter, tuning} configuration

use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::{
    coeff::{cic_impulse, DRX_FIR, TBN_FIR},
    constants::{FS, MAX_TUNING_FREQ, MIN_TUNING_FREQ},
    error::{DpError, Result},
};

/// DP output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// transient buffer narrowband
    Tbn,
    /// digital receiver
    Drx,
}

impl Mode {
    /// filter codes supported for this mode
    pub fn filter_codes(self) -> &'static [u8] {
        match self {
            Mode::Tbn => &[5, 6, 7],
            Mode::Drx => &[3, 4, 5, 6, 7],
        }
    }

    pub fn supports(self, filter: u8) -> bool {
        self.filter_codes().contains(&filter)
    }

    /// (order, differential delay) of the CIC used for the response curve
    pub(crate) fn cic_shape(self) -> (i32, f64) {
        match self {
            Mode::Tbn => (2, 98.0),
            Mode::Drx => (5, 5.0),
        }
    }

    pub(crate) fn fir(self) -> &'static [f64] {
        match self {
            Mode::Tbn => &TBN_FIR,
            Mode::Drx => &DRX_FIR,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Tbn => write!(f, "TBN"),
            Mode::Drx => write!(f, "DRX"),
        }
    }
}

impl FromStr for Mode {
    type Err = DpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TBN" => Ok(Mode::Tbn),
            "DRX" => Ok(Mode::Drx),
            _ => Err(DpError::InvalidConfiguration(format!(
                "unknown mode '{}'",
                s
            ))),
        }
    }
}

/// Coefficients and decimation factors for one (mode, filter code) pair
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPack {
    pub mode: Mode,
    pub filter: u8,
    /// CIC impulse response
    pub cic: Vec<i64>,
    /// CIC decimation factor
    pub cic_d: usize,
    /// channel FIR taps
    pub fir: &'static [f64],
    /// FIR decimation factor
    pub fir_d: usize,
    /// overall decimation, `cic_d * fir_d`
    pub total_d: usize,
}

/// (mode, filter, CIC order, cicD, firD, totalD) as documented for DP
const FILTER_TABLE: [(Mode, u8, usize, usize, usize, usize); 8] = [
    (Mode::Tbn, 7, 2, 98, 20, 1960),
    (Mode::Tbn, 6, 2, 196, 20, 3920),
    (Mode::Tbn, 5, 2, 392, 20, 7840),
    (Mode::Drx, 7, 5, 5, 2, 10),
    (Mode::Drx, 6, 5, 10, 2, 20),
    (Mode::Drx, 5, 5, 20, 2, 40),
    (Mode::Drx, 4, 5, 49, 2, 98),
    (Mode::Drx, 3, 5, 98, 2, 196),
];

fn filter_packs() -> &'static [FilterPack] {
    static PACKS: OnceLock<Vec<FilterPack>> = OnceLock::new();
    PACKS.get_or_init(|| {
        FILTER_TABLE
            .iter()
            .map(|&(mode, filter, order, cic_d, fir_d, total_d)| {
                debug_assert_eq!(cic_d * fir_d, total_d);
                FilterPack {
                    mode,
                    filter,
                    cic: cic_impulse(order, cic_d),
                    cic_d,
                    fir: mode.fir(),
                    fir_d,
                    total_d,
                }
            })
            .collect()
    })
}

impl FilterPack {
    /// select the filter pack for a mode and filter code
    pub fn lookup(mode: Mode, filter: u8) -> Result<&'static FilterPack> {
        filter_packs()
            .iter()
            .find(|p| p.mode == mode && p.filter == filter)
            .ok_or_else(|| {
                DpError::InvalidConfiguration(format!(
                    "unknown or unsupported filter for {}, '{}'",
                    mode, filter
                ))
            })
    }

    /// output sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        FS / self.total_d as f64
    }
}

/// Validated DP configuration. Every setter checks its field before
/// touching the state, so readers never see a half applied change.
#[derive(Debug, Clone, PartialEq)]
pub struct DpConfig {
    pack: &'static FilterPack,
    central_freq: f64,
}

impl Default for DpConfig {
    fn default() -> Self {
        DpConfig {
            pack: &filter_packs()[3],
            central_freq: 74e6,
        }
    }
}

impl DpConfig {
    pub fn new(mode: Mode, filter: u8, central_freq: f64) -> Result<DpConfig> {
        let pack = FilterPack::lookup(mode, filter)?;
        check_tuning(central_freq)?;
        Ok(DpConfig { pack, central_freq })
    }

    pub fn mode(&self) -> Mode {
        self.pack.mode
    }

    pub fn filter(&self) -> u8 {
        self.pack.filter
    }

    pub fn central_freq(&self) -> f64 {
        self.central_freq
    }

    /// change the mode, the current filter code has to be valid for it
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.pack = FilterPack::lookup(mode, self.pack.filter)?;
        Ok(())
    }

    /// change the filter code for the current mode
    pub fn set_filter(&mut self, filter: u8) -> Result<()> {
        self.pack = FilterPack::lookup(self.pack.mode, filter)?;
        Ok(())
    }

    /// change mode and filter code together
    pub fn reconfigure(&mut self, mode: Mode, filter: u8) -> Result<()> {
        self.pack = FilterPack::lookup(mode, filter)?;
        Ok(())
    }

    /// change the tuning frequency, in Hz
    pub fn set_central_freq(&mut self, central_freq: f64) -> Result<()> {
        check_tuning(central_freq)?;
        self.central_freq = central_freq;
        Ok(())
    }

    pub fn filter_pack(&self) -> &'static FilterPack {
        self.pack
    }
}

fn check_tuning(central_freq: f64) -> Result<()> {
    if !(MIN_TUNING_FREQ..=MAX_TUNING_FREQ).contains(&central_freq) {
        return Err(DpError::InvalidConfiguration(format!(
            "central frequency of {:.2} MHz outside the DP tuning range",
            central_freq / 1e6
        )));
    }
    Ok(())
}
