extern crate rsdp;

use std::fs::File;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use ndarray::Array1;
use ndarray_npy::NpzWriter;

use rsdp::{
    mode::{FilterPack, Mode},
    response::{FilterResponse, DEFAULT_NPTS},
};

pub fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("filter_response")
        .about("power response of a DP channel filter")
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
            Arg::new("npts")
                .short('n')
                .long("npts")
                .takes_value(true)
                .value_name("points per side")
                .required(false),
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

    let mode: Mode = matches.get_one::<String>("mode").context("no mode")?.parse()?;
    let filter: u8 = matches
        .get_one::<String>("filter")
        .context("no filter")?
        .parse()
        .context("filter code has to be an integer")?;
    let npts = match matches.get_one::<String>("npts") {
        Some(n) => n.parse::<usize>().context("npts has to be an integer")?,
        None => DEFAULT_NPTS,
    };

    let pack = FilterPack::lookup(mode, filter)?;
    let resp = FilterResponse::new(mode, pack.sample_rate(), npts)?;
    log::info!(
        "{} filter {} at {} Hz, {} points",
        mode,
        filter,
        pack.sample_rate(),
        resp.frequencies().len()
    );

    let out_name = matches.get_one::<String>("outfile").context("no output")?;
    let mut npz = NpzWriter::new(File::create(out_name)?);
    npz.add_array("freq", &Array1::from(resp.frequencies().to_vec()))?;
    npz.add_array("response", &Array1::from(resp.response().to_vec()))?;
    npz.finish()?;
    Ok(())
}
