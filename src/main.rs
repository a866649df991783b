use std::fs::File;

use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use ndarray::{Array, Array1, Array2, Dimension, IxDyn, Ix1, Ix2};
use ndarray_npy::{NpzReader, NpzWriter};
use serde_yaml::from_reader;

use rsdp::cfg::{cfg2beam, cfg2run, RunCfg};

fn read_array<D: Dimension, T: ndarray_npy::ReadableElement>(
    npz: &mut NpzReader<File>,
    name: &str,
) -> Result<Array<T, D>> {
    let arr: Array<T, IxDyn> = match npz.by_name(&format!("{}.npy", name)) {
        Ok(a) => a,
        Err(_) => npz
            .by_name(name)
            .with_context(|| format!("array '{}' not found in input", name))?,
    };
    arr.into_dimensionality::<D>()
        .with_context(|| format!("array '{}' has the wrong number of dimensions", name))
}

pub fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("rsdp")
        .about("run captured wideband samples through a software DP")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("config file")
                .required(true),
        )
        .arg(
            Arg::new("infile")
                .short('i')
                .long("in")
                .takes_value(true)
                .value_name("input npz with time and data")
                .required(true),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("out")
                .takes_value(true)
                .value_name("output name")
                .required(true),
        )
        .get_matches();

    let cfg_name = matches.get_one::<String>("cfg").context("no cfg")?;
    let cfg: RunCfg = from_reader(File::open(cfg_name)?)
        .with_context(|| format!("cannot parse {}", cfg_name))?;
    let dp = cfg2run(&cfg)?;
    log::info!("{} using {} workers", dp, dp.workers());

    let in_name = matches.get_one::<String>("infile").context("no input")?;
    let mut npz = NpzReader::new(File::open(in_name)?)?;
    let data: Array<f64, IxDyn> = read_array(&mut npz, "data")?;

    let out_name = matches.get_one::<String>("outfile").context("no output")?;
    let mut out = NpzWriter::new(File::create(out_name)?);

    if let Some(beam) = &cfg.beam {
        let data: Array2<f64> = data
            .into_dimensionality::<Ix2>()
            .context("beamforming needs 2-D data")?;
        let (antennas, steering) = cfg2beam(beam)?;
        let (beam_x, beam_y) = dp.form_beam(&antennas, data.view(), &steering)?;
        out.add_array("beam_x", &beam_x)?;
        out.add_array("beam_y", &beam_y)?;
    } else {
        let time: Array1<i64> = read_array::<Ix1, i64>(&mut npz, "time")?;
        match data.ndim() {
            1 => {
                let data = data.into_dimensionality::<Ix1>()?;
                let filtered = dp.apply_filter(&time.to_vec(), &data.to_vec())?;
                out.add_array("data", &Array1::from_vec(filtered))?;
            }
            2 => {
                let data = data.into_dimensionality::<Ix2>()?;
                let filtered = dp.apply_filter_batch(time.view(), data.view())?;
                out.add_array("data", &filtered)?;
            }
            n => bail!("data has to be 1-D or 2-D, got {} dimensions", n),
        }
        out.add_array("sample_rate", &ndarray::arr0(dp.sample_rate()))?;
    }
    out.finish()?;
    Ok(())
}
