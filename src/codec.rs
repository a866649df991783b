//! Conversions between physical quantities and the fixed point words DP
//! consumes: 32-bit tuning words, packed FIFO/FIR delays and beam gains.
//!
//! The delay and gain words are 16-bit values stored big endian, i.e. the
//! returned integer is the byte swapped version of the packed value.

use crate::{
    constants::{FIXED_POINT_SCALE, FS},
    error::{DpError, Result},
};

const TWO_POW_32: f64 = 4294967296.0;

/// number of fine delay steps per sample
pub const FINE_STEPS: u16 = 16;

/// largest coarse (FIFO) delay representable in the 12-bit field
pub const MAX_COARSE_DELAY: u16 = 4095;

/// Convert a frequency in Hz to the closest DP tuning word
pub fn freq_to_word(freq: f64) -> Result<u32> {
    if !freq.is_finite() || freq < 0.0 {
        return Err(DpError::InvalidInput(format!(
            "cannot convert {} Hz to a tuning word",
            freq
        )));
    }
    let word = (freq * TWO_POW_32 / FS).round();
    if word > u32::MAX as f64 {
        return Err(DpError::InvalidInput(format!(
            "{:.3} MHz is above the sampling rate",
            freq / 1e6
        )));
    }
    Ok(word as u32)
}

/// Convert a DP tuning word to a frequency in Hz
pub fn word_to_freq(word: u32) -> f64 {
    word as f64 * FS / TWO_POW_32
}

/// Convert a delay in ns into the packed 12.4 coarse/fine word DP expects
pub fn delay_to_dpd(delay: f64) -> Result<u16> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(DpError::InvalidInput(format!(
            "cannot encode a delay of {} ns",
            delay
        )));
    }
    // FIFO delays are ~5.1 ns, FIR delays ~0.3 ns
    let sample = (delay * FS * FINE_STEPS as f64 / 1e9).round();
    let coarse = (sample / FINE_STEPS as f64).floor();
    if coarse > MAX_COARSE_DELAY as f64 {
        return Err(DpError::InvalidInput(format!(
            "delay of {:.3} ns needs {} FIFO samples, at most {} fit",
            delay, coarse, MAX_COARSE_DELAY
        )));
    }
    let sample = sample as u16;
    let coarse = sample / FINE_STEPS;
    let fine = sample % FINE_STEPS;
    let combined = (coarse << 4) | fine;
    Ok(combined.swap_bytes())
}

/// Unpack a DP delay word into its coarse (whole sample) and fine (1/16
/// sample) parts
pub fn split_dpd(combined: u16) -> (u16, u16) {
    let combined = combined.swap_bytes();
    let fine = combined & 15;
    let coarse = (combined >> 4) & MAX_COARSE_DELAY;
    (coarse, fine)
}

/// Convert a DP delay word back to a delay in ns
pub fn dpd_to_delay(combined: u16) -> f64 {
    let (coarse, fine) = split_dpd(combined);
    (coarse as f64 + fine as f64 / FINE_STEPS as f64) / FS * 1e9
}

/// Convert a gain in [0, 1] into the DP 16-bit fixed point gain word
pub fn gain_to_dpg(gain: f64) -> Result<u16> {
    if !(0.0..=1.0).contains(&gain) {
        return Err(DpError::InvalidInput(format!(
            "gain {} is outside of [0, 1]",
            gain
        )));
    }
    let combined = (FIXED_POINT_SCALE * gain).round() as u16;
    Ok(combined.swap_bytes())
}

/// Convert a DP gain word back to a gain in [0, 1]
pub fn dpg_to_gain(combined: u16) -> f64 {
    combined.swap_bytes() as f64 / FIXED_POINT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tuning_word_round_trip() {
        let lsb = FS / TWO_POW_32;
        for &f in &[0.0, 10.0e6, 38.1e6, 49.0e6, 74.0e6, 74.0e6 + 0.37, 88.0e6] {
            let word = freq_to_word(f).unwrap();
            assert!((word_to_freq(word) - f).abs() <= lsb);
        }
        assert_eq!(freq_to_word(FS / 4.0).unwrap(), 1 << 30);
    }

    #[test]
    fn tuning_word_rejects_bad_frequencies() {
        assert!(freq_to_word(-1.0).is_err());
        assert!(freq_to_word(f64::NAN).is_err());
        assert!(freq_to_word(FS * 1.5).is_err());
    }

    #[test]
    fn delay_word_is_big_endian() {
        // one whole sample and 3/16 of the next
        let delay = (1.0 + 3.0 / 16.0) / FS * 1e9;
        let dpd = delay_to_dpd(delay).unwrap();
        assert_eq!(dpd, 0x1300);
        assert_eq!(split_dpd(dpd), (1, 3));
        assert_abs_diff_eq!(dpd_to_delay(dpd), delay, epsilon = 1e-9);
    }

    #[test]
    fn delay_round_trip() {
        let step = 1e9 / FS / 16.0;
        for i in 0..200 {
            let d = i as f64 * 97.3;
            let back = dpd_to_delay(delay_to_dpd(d).unwrap());
            assert!((back - d).abs() <= step, "{} -> {}", d, back);
        }
    }

    #[test]
    fn delay_outside_fifo_is_rejected() {
        let too_long = (MAX_COARSE_DELAY as f64 + 1.0) / FS * 1e9;
        assert!(delay_to_dpd(too_long).is_err());
        assert!(delay_to_dpd(-5.0).is_err());
    }

    #[test]
    fn gain_round_trip() {
        for i in 0..=100 {
            let g = i as f64 / 100.0;
            let back = dpg_to_gain(gain_to_dpg(g).unwrap());
            assert!((back - g).abs() <= 1.0 / 32768.0);
        }
        assert_eq!(gain_to_dpg(1.0).unwrap(), 0xff7f);
        assert!(gain_to_dpg(1.5).is_err());
    }
}
