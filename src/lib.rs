//! software model of the DP back end: TBN/DRX channel filters and the
//! delay-and-sum beamformer

pub mod antenna;
pub mod beamformer;
pub mod cfg;
pub mod codec;
pub mod coeff;
pub mod constants;
pub mod delay_fir;
pub mod dsp;
pub mod error;
pub mod executor;
pub mod filter;
pub mod interp;
pub mod mode;
pub mod oscillator;
pub mod response;
pub mod simulation;
pub mod software_dp;
pub mod traits;
pub mod utils;

pub use error::{DpError, Result};
pub use mode::{DpConfig, FilterPack, Mode};
pub use software_dp::SoftwareDp;
