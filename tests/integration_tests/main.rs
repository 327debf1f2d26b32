// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod cli_args;
mod correct;
mod no_stderr;

use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use fitsio::{
    images::{ImageDescription, ImageType},
    FitsFile,
};
use ndarray::prelude::*;
use num_complex::Complex;

fn faraday_correct() -> Command {
    Command::cargo_bin("faraday_correct").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// The FITS axis types of the test cubes. Frequency is FITS axis 3, so the
/// array shape is [STOKES, FREQ, DEC, RA].
const CTYPES: [(usize, &str); 4] = [
    (1, "RA---SIN"),
    (2, "DEC--SIN"),
    (3, "FREQ"),
    (4, "STOKES"),
];

struct Files {
    q: PathBuf,
    u: PathBuf,
    prediction: PathBuf,
    q_data: ArrayD<f64>,
    u_data: ArrayD<f64>,
}

/// Write Q and U cubes with `num_chans` channels and a prediction file with the
/// supplied modulation into `dir`.
fn make_inputs(dir: &Path, num_chans: usize, theta: &[Complex<f64>]) -> Files {
    let q_data = Array::from_shape_fn((1, num_chans, 3, 4), |(_, f, d, r)| {
        1.0 + f as f64 - 0.25 * d as f64 + 0.1 * r as f64
    })
    .into_dyn();
    let u_data = q_data.mapv(|v| 0.5 - v);
    let q = dir.join("q.fits");
    let u = dir.join("u.fits");
    write_cube(&q, &q_data);
    write_cube(&u, &u_data);

    let prediction = dir.join("prediction.txt");
    let mut f = std::fs::File::create(&prediction).unwrap();
    writeln!(f, "# freq [Hz]   re   im").unwrap();
    for (i, t) in theta.iter().enumerate() {
        writeln!(f, "{} {} {}", 150e6 + i as f64 * 1.28e6, t.re, t.im).unwrap();
    }

    Files {
        q,
        u,
        prediction,
        q_data,
        u_data,
    }
}

fn write_cube(path: &Path, data: &ArrayD<f64>) {
    let image_description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: data.shape(),
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&image_description)
        .open()
        .unwrap();
    let hdu = fptr.primary_hdu().unwrap();
    for (i, t) in CTYPES {
        hdu.write_key(&mut fptr, &format!("CTYPE{i}"), t).unwrap();
    }
    hdu.write_key(&mut fptr, "BUNIT", "JY/BEAM").unwrap();
    let flat: Vec<f64> = data.iter().copied().collect();
    hdu.write_image(&mut fptr, &flat).unwrap();
}

/// Read the data of a FITS cube, in array order.
fn read_cube(path: &Path) -> ArrayD<f64> {
    let mut fptr = FitsFile::open(path).unwrap();
    let hdu = fptr.primary_hdu().unwrap();
    let shape = match &hdu.info {
        fitsio::hdu::HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => panic!("not an image"),
    };
    let flat: Vec<f64> = hdu.read_image(&mut fptr).unwrap();
    ArrayD::from_shape_vec(IxDyn(&shape), flat).unwrap()
}
