//! Delay-and-sum beamforming of wideband inputs into an X and a Y beam.
//!
//! Each input is delayed by a whole number of samples (a circular FIFO),
//! then by a fraction of a sample through one phase of its channel's delay
//! FIR, weighted by its stand's gain row and summed.

use ndarray::{Array1, ArrayView2};

use crate::{
    antenna::{AntennaInfo, Polarization},
    codec::{delay_to_dpd, split_dpd},
    constants::FIXED_POINT_SCALE,
    delay_fir::DelayFirBank,
    error::{DpError, Result},
    executor::Executor,
    filter::Filter,
    traits::ToReal,
    utils::roll,
};

/// How one stand's inputs feed the two beams. An X input contributes
/// `x_of_x` to beam X and `x_of_y` to beam Y; a Y input `y_of_x` and `y_of_y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BeamGain {
    pub x_of_x: f64,
    pub x_of_y: f64,
    pub y_of_x: f64,
    pub y_of_y: f64,
}

impl BeamGain {
    pub fn new(x_of_x: f64, x_of_y: f64, y_of_x: f64, y_of_y: f64) -> BeamGain {
        BeamGain {
            x_of_x,
            x_of_y,
            y_of_x,
            y_of_y,
        }
    }

    /// a row summing to zero leaves the stand out of the beam
    pub fn is_excluded(&self) -> bool {
        self.x_of_x + self.x_of_y + self.y_of_x + self.y_of_y == 0.0
    }

    /// (to beam X, to beam Y) weights for an input of polarization `pol`
    pub fn weights(&self, pol: Polarization) -> (f64, f64) {
        match pol {
            Polarization::X => (self.x_of_x, self.x_of_y),
            Polarization::Y => (self.y_of_x, self.y_of_y),
        }
    }
}

impl From<[f64; 4]> for BeamGain {
    fn from(g: [f64; 4]) -> Self {
        BeamGain::new(g[0], g[1], g[2], g[3])
    }
}

/// Per input coarse (FIFO, whole sample) and fine (delay FIR phase) delays,
/// and one gain row per pair of inputs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeamSteering {
    pub coarse_delays: Vec<usize>,
    pub fine_delays: Vec<usize>,
    pub gains: Vec<BeamGain>,
}

impl BeamSteering {
    /// quantize per input delays in ns the way DP does
    pub fn from_delays_ns(delays_ns: &[f64], gains: Vec<BeamGain>) -> Result<BeamSteering> {
        let mut coarse_delays = Vec::with_capacity(delays_ns.len());
        let mut fine_delays = Vec::with_capacity(delays_ns.len());
        for &d in delays_ns {
            let (coarse, fine) = split_dpd(delay_to_dpd(d)?);
            coarse_delays.push(coarse as usize);
            fine_delays.push(fine as usize);
        }
        Ok(BeamSteering {
            coarse_delays,
            fine_delays,
            gains,
        })
    }
}

/// Form the two beams from `data` (inputs x time); `antennas[i]` describes
/// row `i`. The outputs lose the first `max(coarse delay)` samples of the
/// contributing inputs.
pub fn form_beam<A, S>(
    executor: &Executor,
    bank: &DelayFirBank,
    antennas: &[A],
    data: ArrayView2<S>,
    steering: &BeamSteering,
) -> Result<(Array1<f64>, Array1<f64>)>
where
    A: AntennaInfo + Sync,
    S: ToReal + Sync,
{
    let (ninputs, nsamples) = data.dim();
    check_shapes(antennas.len(), ninputs, steering)?;

    let contributions = executor.run(ninputs, |i| {
        let gain = steering.gains[i / 2];
        if gain.is_excluded() {
            return Ok(None);
        }
        let ant = &antennas[i];
        let coarse = steering.coarse_delays[i];
        let taps = bank.filter(ant.digitizer(), steering.fine_delays[i])?;
        let stream = delay_stream(data.row(i).to_vec(), coarse, taps)?;
        let (wx, wy) = gain.weights(ant.pol());
        Ok(Some((coarse, wx, wy, stream)))
    })?;

    let mut beam_x = Array1::<f64>::zeros(nsamples);
    let mut beam_y = Array1::<f64>::zeros(nsamples);
    let mut to_cut = 0;
    let mut nused = 0;
    for (i, c) in contributions.into_iter().enumerate() {
        match c {
            Some((coarse, wx, wy, stream)) => {
                to_cut = to_cut.max(coarse);
                nused += 1;
                beam_x
                    .iter_mut()
                    .zip(&stream)
                    .for_each(|(b, &s)| *b += wx * s);
                beam_y
                    .iter_mut()
                    .zip(&stream)
                    .for_each(|(b, &s)| *b += wy * s);
            }
            None => log::warn!("input {} has a zero gain row, left out of the beam", i),
        }
    }
    log::debug!(
        "beam from {} of {} inputs, trimming {} samples",
        nused,
        ninputs,
        to_cut
    );

    Ok((
        beam_x.slice_move(ndarray::s![to_cut..]),
        beam_y.slice_move(ndarray::s![to_cut..]),
    ))
}

/// FIFO delay by circular shift, then the fractional delay FIR
fn delay_stream<S: ToReal>(row: Vec<S>, coarse: usize, taps: &[i32]) -> Result<Vec<f64>> {
    let shifted = roll(&row, coarse)?;
    let signal: Vec<f64> = shifted.iter().map(|x| x.to_real()).collect();
    let mut fir = Filter::<f64, f64>::new(taps.iter().map(|&t| t as f64).collect())?;
    Ok(fir
        .filter(&signal)
        .into_iter()
        .map(|y| y / FIXED_POINT_SCALE)
        .collect())
}

fn check_shapes(nantennas: usize, ninputs: usize, steering: &BeamSteering) -> Result<()> {
    if nantennas != ninputs {
        return Err(DpError::InvalidInput(format!(
            "{} antennas for {} inputs",
            nantennas, ninputs
        )));
    }
    if steering.coarse_delays.len() != ninputs || steering.fine_delays.len() != ninputs {
        return Err(DpError::InvalidInput(format!(
            "{} coarse and {} fine delays for {} inputs",
            steering.coarse_delays.len(),
            steering.fine_delays.len(),
            ninputs
        )));
    }
    let npairs = (ninputs + 1) / 2;
    if steering.gains.len() < npairs {
        return Err(DpError::InvalidInput(format!(
            "{} gain rows for {} input pairs",
            steering.gains.len(),
            npairs
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        antenna::Antenna,
        coeff::DELAY_FIR_GROUP_DELAY,
        codec::FINE_STEPS,
        constants::FS,
        delay_fir::DelayFirSet,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{s, Array2};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn pass_through_bank() -> DelayFirBank {
        let mut taps = vec![0; 8];
        taps[0] = 32767;
        let mut bank = DelayFirBank::new();
        bank.set_all(DelayFirSet::new(vec![taps; 16]).unwrap());
        bank
    }

    fn random_data(ninputs: usize, nsamples: usize) -> Array2<i16> {
        let mut rng = StdRng::seed_from_u64(7);
        Array2::from_shape_fn((ninputs, nsamples), |_| rng.gen_range(-2048..2048))
    }

    fn antennas(n: usize) -> Vec<Antenna> {
        (1..=n)
            .map(|ch| {
                let pol = if ch % 2 == 1 {
                    Polarization::X
                } else {
                    Polarization::Y
                };
                Antenna::new(ch, pol)
            })
            .collect()
    }

    #[test]
    fn single_x_input_goes_to_beam_x() {
        let data = random_data(1, 256);
        let steering = BeamSteering {
            coarse_delays: vec![0],
            fine_delays: vec![0],
            gains: vec![BeamGain::new(1.0, 0.0, 0.0, 0.0)],
        };
        let (bx, by) = form_beam(
            &Executor::serial().unwrap(),
            &pass_through_bank(),
            &antennas(1),
            data.view(),
            &steering,
        )
        .unwrap();
        assert_eq!(bx.len(), 256);
        for (b, &x) in bx.iter().zip(data.row(0)) {
            assert_abs_diff_eq!(*b, x as f64, epsilon = 1e-9);
        }
        assert!(by.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn default_fir_phase_zero_is_a_pure_delay() {
        let data = random_data(1, 128);
        let steering = BeamSteering {
            coarse_delays: vec![0],
            fine_delays: vec![0],
            gains: vec![BeamGain::new(1.0, 0.0, 0.0, 0.0)],
        };
        let (bx, _) = form_beam(
            &Executor::serial().unwrap(),
            &DelayFirBank::new(),
            &antennas(1),
            data.view(),
            &steering,
        )
        .unwrap();
        let d = DELAY_FIR_GROUP_DELAY;
        assert!(bx.slice(s![..d]).iter().all(|&x| x == 0.0));
        for (b, &x) in bx.slice(s![d..]).iter().zip(data.row(0)) {
            assert_abs_diff_eq!(*b, x as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn coarse_delay_shifts_and_trims() {
        let data = random_data(2, 100);
        let steering = BeamSteering {
            coarse_delays: vec![3, 0],
            fine_delays: vec![0, 0],
            gains: vec![BeamGain::new(1.0, 0.0, 0.0, 1.0)],
        };
        let (bx, by) = form_beam(
            &Executor::serial().unwrap(),
            &pass_through_bank(),
            &antennas(2),
            data.view(),
            &steering,
        )
        .unwrap();
        assert_eq!(bx.len(), 97);
        assert_eq!(by.len(), 97);
        // X was delayed by 3: output sample k is input sample k
        for (b, &x) in bx.iter().zip(data.row(0)) {
            assert_abs_diff_eq!(*b, x as f64, epsilon = 1e-9);
        }
        for (b, &y) in by.iter().zip(data.row(1).slice(s![3..])) {
            assert_abs_diff_eq!(*b, y as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_gain_row_is_the_same_as_leaving_the_stand_out() {
        let data = random_data(4, 200);
        let gains = vec![
            BeamGain::new(0.5, 0.25, 0.75, 1.0),
            BeamGain::new(0.0, 0.0, 0.0, 0.0),
        ];
        let steering = BeamSteering {
            coarse_delays: vec![1, 2, 50, 60],
            fine_delays: vec![3, 4, 5, 6],
            gains: gains.clone(),
        };
        let bank = DelayFirBank::new();
        let ex = Executor::new(2).unwrap();
        let all = form_beam(&ex, &bank, &antennas(4), data.view(), &steering).unwrap();

        let subset = BeamSteering {
            coarse_delays: vec![1, 2],
            fine_delays: vec![3, 4],
            gains: vec![gains[0]],
        };
        let some = form_beam(
            &ex,
            &bank,
            &antennas(2),
            data.slice(s![..2, ..]),
            &subset,
        )
        .unwrap();
        // trimming only counts contributing inputs
        assert_eq!(all.0.len(), 198);
        assert_eq!(all.0, some.0);
        assert_eq!(all.1, some.1);
    }

    #[test]
    fn parallel_beam_equals_serial() {
        let data = random_data(8, 512);
        let delays: Vec<f64> = (0..8).map(|i| i as f64 * 7.3).collect();
        let gains = vec![BeamGain::new(1.0, 0.0, 0.0, 1.0); 4];
        let steering = BeamSteering::from_delays_ns(&delays, gains).unwrap();
        let bank = DelayFirBank::new();
        let ants = antennas(8);

        let (sx, sy) = form_beam(&Executor::serial().unwrap(), &bank, &ants, data.view(), &steering)
            .unwrap();
        let (px, py) = form_beam(&Executor::new(4).unwrap(), &bank, &ants, data.view(), &steering)
            .unwrap();
        assert_eq!(sx.len(), px.len());
        for (a, b) in sx.iter().zip(px.iter()).chain(sy.iter().zip(py.iter())) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn steering_from_delays() {
        let sample_ns = 1e9 / FS;
        let st = BeamSteering::from_delays_ns(
            &[0.0, 10.0 * sample_ns, (3.0 + 5.0 / FINE_STEPS as f64) * sample_ns],
            vec![BeamGain::default(); 2],
        )
        .unwrap();
        assert_eq!(st.coarse_delays, vec![0, 10, 3]);
        assert_eq!(st.fine_delays, vec![0, 0, 5]);
        assert!(BeamSteering::from_delays_ns(&[-1.0], vec![]).is_err());
    }

    #[test]
    fn bad_requests() {
        let data = random_data(2, 10);
        let bank = DelayFirBank::new();
        let ex = Executor::serial().unwrap();
        let good = BeamSteering {
            coarse_delays: vec![0, 0],
            fine_delays: vec![0, 0],
            gains: vec![BeamGain::new(1.0, 0.0, 0.0, 1.0)],
        };

        assert!(matches!(
            form_beam(&ex, &bank, &antennas(1), data.view(), &good),
            Err(DpError::InvalidInput(_))
        ));

        let no_gains = BeamSteering {
            gains: vec![],
            ..good.clone()
        };
        assert!(matches!(
            form_beam(&ex, &bank, &antennas(2), data.view(), &no_gains),
            Err(DpError::InvalidInput(_))
        ));

        let too_far = BeamSteering {
            coarse_delays: vec![0, 10],
            ..good.clone()
        };
        assert!(matches!(
            form_beam(&ex, &bank, &antennas(2), data.view(), &too_far),
            Err(DpError::ProcessingFailure { task: 1, .. })
        ));

        let bad_phase = BeamSteering {
            fine_delays: vec![16, 0],
            ..good
        };
        assert!(matches!(
            form_beam(&ex, &bank, &antennas(2), data.view(), &bad_phase),
            Err(DpError::ProcessingFailure { task: 0, .. })
        ));
    }
}
