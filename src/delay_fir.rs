//! Beamformer fractional delay FIRs and their per-channel assignment.
//!
//! Every digitizer channel points into a small arena of coefficient sets.
//! Slot 0 always holds the hardware defaults; overrides are added as new
//! slots, and slots no channel refers to anymore are dropped.

use std::sync::Arc;

use crate::{
    coeff::DELAY_FIRS,
    constants::NUM_CHANNELS,
    error::{DpError, Result},
};

/// One coefficient list per fractional delay phase, all of the same length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayFirSet {
    phases: Vec<Vec<i32>>,
}

impl DelayFirSet {
    pub fn new(phases: Vec<Vec<i32>>) -> Result<DelayFirSet> {
        let ntaps = match phases.first() {
            Some(p) => p.len(),
            None => {
                return Err(DpError::MalformedCoefficients(
                    "no delay FIR phases given".to_string(),
                ))
            }
        };
        if ntaps == 0 {
            return Err(DpError::MalformedCoefficients(
                "delay FIR phases have no taps".to_string(),
            ));
        }
        if let Some(i) = phases.iter().position(|p| p.len() != ntaps) {
            return Err(DpError::MalformedCoefficients(format!(
                "phase {} has {} taps, phase 0 has {}",
                i,
                phases[i].len(),
                ntaps
            )));
        }
        Ok(DelayFirSet { phases })
    }

    /// the coefficients DP boots with
    pub fn hardware_default() -> DelayFirSet {
        DelayFirSet {
            phases: DELAY_FIRS.iter().map(|p| p.to_vec()).collect(),
        }
    }

    pub fn num_phases(&self) -> usize {
        self.phases.len()
    }

    pub fn num_taps(&self) -> usize {
        self.phases[0].len()
    }

    pub fn phase(&self, phase: usize) -> Result<&[i32]> {
        self.phases.get(phase).map(|p| p.as_slice()).ok_or_else(|| {
            DpError::InvalidInput(format!(
                "fine delay {} selects a missing FIR phase, {} available",
                phase,
                self.phases.len()
            ))
        })
    }
}

/// A change to the delay FIR assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayFirUpdate {
    /// back to the hardware defaults everywhere
    Reset,
    /// the same set for every channel
    All(DelayFirSet),
    /// one channel, 1-based
    Channel(usize, DelayFirSet),
}

impl DelayFirUpdate {
    /// DP channel convention: -1 resets, 0 addresses every channel and
    /// 1..=520 a single one. The coefficients are ignored for a reset.
    pub fn from_channel(channel: i32, coeffs: Vec<Vec<i32>>) -> Result<DelayFirUpdate> {
        match channel {
            -1 => Ok(DelayFirUpdate::Reset),
            0 => Ok(DelayFirUpdate::All(DelayFirSet::new(coeffs)?)),
            c if c >= 1 && c as usize <= NUM_CHANNELS => Ok(DelayFirUpdate::Channel(
                c as usize,
                DelayFirSet::new(coeffs)?,
            )),
            c => Err(DpError::InvalidConfiguration(format!(
                "no digitizer channel {}",
                c
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DelayFirBank {
    sets: Vec<Arc<DelayFirSet>>,
    /// index into `sets` for each channel
    assignment: Vec<usize>,
}

impl Default for DelayFirBank {
    fn default() -> Self {
        DelayFirBank {
            sets: vec![Arc::new(DelayFirSet::hardware_default())],
            assignment: vec![0; NUM_CHANNELS],
        }
    }
}

impl DelayFirBank {
    pub fn new() -> DelayFirBank {
        DelayFirBank::default()
    }

    pub fn reset(&mut self) {
        self.sets.truncate(1);
        self.assignment.iter_mut().for_each(|a| *a = 0);
    }

    pub fn set_all(&mut self, set: DelayFirSet) {
        self.sets.truncate(1);
        self.sets.push(Arc::new(set));
        self.assignment.iter_mut().for_each(|a| *a = 1);
    }

    pub fn set_channel(&mut self, channel: usize, set: DelayFirSet) -> Result<()> {
        let idx = channel_index(channel)?;
        self.sets.push(Arc::new(set));
        self.assignment[idx] = self.sets.len() - 1;
        self.compact();
        Ok(())
    }

    pub fn apply(&mut self, update: DelayFirUpdate) -> Result<()> {
        match update {
            DelayFirUpdate::Reset => self.reset(),
            DelayFirUpdate::All(set) => self.set_all(set),
            DelayFirUpdate::Channel(channel, set) => self.set_channel(channel, set)?,
        }
        Ok(())
    }

    /// coefficient set used by a 1-based channel
    pub fn for_channel(&self, channel: usize) -> Result<&DelayFirSet> {
        let idx = channel_index(channel)?;
        Ok(&self.sets[self.assignment[idx]])
    }

    /// taps of one phase for one channel
    pub fn filter(&self, channel: usize, phase: usize) -> Result<&[i32]> {
        self.for_channel(channel)?.phase(phase)
    }

    /// number of distinct coefficient sets held, the default included
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    fn compact(&mut self) {
        let mut used = vec![false; self.sets.len()];
        used[0] = true;
        for &a in &self.assignment {
            used[a] = true;
        }
        if used.iter().all(|&u| u) {
            return;
        }
        let mut remap = vec![0; self.sets.len()];
        let mut kept = Vec::with_capacity(self.sets.len());
        for (i, set) in self.sets.drain(..).enumerate() {
            if used[i] {
                remap[i] = kept.len();
                kept.push(set);
            }
        }
        self.sets = kept;
        self.assignment.iter_mut().for_each(|a| *a = remap[*a]);
    }
}

fn channel_index(channel: usize) -> Result<usize> {
    if channel == 0 || channel > NUM_CHANNELS {
        return Err(DpError::InvalidInput(format!(
            "digitizer channel {} outside 1..={}",
            channel, NUM_CHANNELS
        )));
    }
    Ok(channel - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeff::{DELAY_FIR_GROUP_DELAY, DELAY_FIR_PHASES, DELAY_FIR_TAPS};

    fn identity(ntaps: usize) -> DelayFirSet {
        let mut taps = vec![0; ntaps];
        taps[0] = 32767;
        DelayFirSet::new(vec![taps; 2]).unwrap()
    }

    #[test]
    fn defaults_everywhere() {
        let bank = DelayFirBank::new();
        assert_eq!(bank.num_sets(), 1);
        let set = bank.for_channel(520).unwrap();
        assert_eq!(set.num_phases(), DELAY_FIR_PHASES);
        assert_eq!(set.num_taps(), DELAY_FIR_TAPS);
        assert_eq!(bank.filter(1, 0).unwrap()[DELAY_FIR_GROUP_DELAY], 32767);
        assert!(bank.for_channel(0).is_err());
        assert!(bank.for_channel(521).is_err());
        assert!(bank.filter(1, 16).is_err());
    }

    #[test]
    fn malformed_sets_are_rejected() {
        assert!(matches!(
            DelayFirSet::new(vec![]),
            Err(DpError::MalformedCoefficients(_))
        ));
        assert!(matches!(
            DelayFirSet::new(vec![vec![], vec![]]),
            Err(DpError::MalformedCoefficients(_))
        ));
        assert!(matches!(
            DelayFirSet::new(vec![vec![1, 2], vec![3]]),
            Err(DpError::MalformedCoefficients(_))
        ));
    }

    #[test]
    fn channel_overrides_do_not_leak() {
        let mut bank = DelayFirBank::new();
        bank.set_channel(7, identity(4)).unwrap();
        assert_eq!(bank.for_channel(7).unwrap(), &identity(4));
        assert_eq!(bank.for_channel(8).unwrap(), &DelayFirSet::hardware_default());

        // replacing the same channel again does not grow the arena
        bank.set_channel(7, identity(5)).unwrap();
        assert_eq!(bank.num_sets(), 2);
        assert_eq!(bank.for_channel(7).unwrap().num_taps(), 5);

        bank.set_all(identity(3));
        assert_eq!(bank.num_sets(), 2);
        assert_eq!(bank.for_channel(8).unwrap().num_taps(), 3);

        bank.set_channel(1, identity(6)).unwrap();
        bank.reset();
        assert_eq!(bank.num_sets(), 1);
        assert_eq!(bank.for_channel(1).unwrap(), &DelayFirSet::hardware_default());
    }

    #[test]
    fn channel_convention() {
        let coeffs = vec![vec![1, 0], vec![0, 1]];
        assert_eq!(
            DelayFirUpdate::from_channel(-1, vec![]).unwrap(),
            DelayFirUpdate::Reset
        );
        assert!(matches!(
            DelayFirUpdate::from_channel(0, coeffs.clone()).unwrap(),
            DelayFirUpdate::All(_)
        ));
        assert!(matches!(
            DelayFirUpdate::from_channel(520, coeffs.clone()).unwrap(),
            DelayFirUpdate::Channel(520, _)
        ));
        assert!(matches!(
            DelayFirUpdate::from_channel(521, coeffs.clone()),
            Err(DpError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            DelayFirUpdate::from_channel(-2, coeffs),
            Err(DpError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            DelayFirUpdate::from_channel(3, vec![]),
            Err(DpError::MalformedCoefficients(_))
        ));

        let mut bank = DelayFirBank::new();
        bank.apply(DelayFirUpdate::from_channel(2, vec![vec![9]]).unwrap())
            .unwrap();
        assert_eq!(bank.filter(2, 0).unwrap(), &[9]);
    }
}
