//! Values from the DP interface control document

/// sampling rate of the digitizers, in Hz
pub const FS: f64 = 196.0e6;

/// slot duration, in seconds
pub const T: f64 = 1.0;

/// sub-slot duration, in seconds
pub const T2: f64 = 0.010;

/// maximum UDP packet size, in bytes
pub const N_MAX: usize = 8192;

/// number of digitizer channels, two per stand
pub const NUM_CHANNELS: usize = 520;

/// lowest tuning accepted by DP, in Hz
pub const MIN_TUNING_FREQ: f64 = 10.0e6;

/// highest tuning accepted by DP, in Hz
pub const MAX_TUNING_FREQ: f64 = 88.0e6;

/// full scale of the 16-bit fixed point gain and delay FIR coefficients
pub const FIXED_POINT_SCALE: f64 = 32767.0;
