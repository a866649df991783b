//! The bits of station metadata the beamformer needs about an input

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    X,
    Y,
}

/// Read only view of an antenna, supplied by whatever holds the station
/// description
pub trait AntennaInfo {
    /// 1-based digitizer channel
    fn digitizer(&self) -> usize;

    fn pol(&self) -> Polarization;

    /// stand the channel belongs to, channels 2n-1 and 2n sit on stand n
    fn stand(&self) -> usize {
        let ch = self.digitizer();
        ch / 2 + ch % 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antenna {
    pub digitizer: usize,
    pub pol: Polarization,
}

impl Antenna {
    pub fn new(digitizer: usize, pol: Polarization) -> Antenna {
        Antenna { digitizer, pol }
    }
}

impl AntennaInfo for Antenna {
    fn digitizer(&self) -> usize {
        self.digitizer
    }

    fn pol(&self) -> Polarization {
        self.pol
    }
}
