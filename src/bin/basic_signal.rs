extern crate rsdp;

use std::fs::File;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use ndarray_npy::NpzWriter;
use rand::{rngs::StdRng, SeedableRng};

use rsdp::{mode::Mode, simulation::basic_signal};

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing {}", name))
}

pub fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("basic_signal")
        .about("noise plus tones at a DP output rate")
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .takes_value(true)
                .value_name("TBN or DRX")
                .required(true),
        )
        .arg(
            Arg::new("filter")
                .short('f')
                .long("filter")
                .takes_value(true)
                .value_name("filter code")
                .required(true),
        )
        .arg(
            Arg::new("nsamples")
                .short('n')
                .long("nsamples")
                .takes_value(true)
                .value_name("samples per stream")
                .default_value("4096"),
        )
        .arg(
            Arg::new("ntuning")
                .short('t')
                .long("ntuning")
                .takes_value(true)
                .value_name("DRX tunings")
                .default_value("2"),
        )
        .arg(
            Arg::new("noise")
                .long("noise")
                .takes_value(true)
                .value_name("noise strength")
                .default_value("0.1"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .value_name("rng seed")
                .default_value("0"),
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

    let mode: Mode = arg(&matches, "mode")?.parse()?;
    let filter: u8 = arg(&matches, "filter")?.parse()?;
    let nsamples: usize = arg(&matches, "nsamples")?.parse()?;
    let ntuning: usize = arg(&matches, "ntuning")?.parse()?;
    let noise: f64 = arg(&matches, "noise")?.parse()?;
    let seed: u64 = arg(&matches, "seed")?.parse()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let sig = basic_signal(mode, filter, nsamples, ntuning, noise, &mut rng)?;

    let mut npz = NpzWriter::new(File::create(arg(&matches, "outfile")?)?);
    npz.add_array("time", &sig.time)?;
    npz.add_array("data", &sig.data)?;
    npz.add_array("sample_rate", &ndarray::arr0(sig.sample_rate))?;
    npz.finish()?;
    Ok(())
}
