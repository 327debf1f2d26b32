// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading ionospheric modulation predictions.
//!
//! A prediction file is a plain-text table with one row per frequency channel
//! and three whitespace-separated columns: the channel frequency \[Hz\], and the
//! real and imaginary parts of the predicted ionospheric modulation. Blank lines
//! are ignored, as is anything following a `#`.

mod error;

pub use error::PredictionError;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;
use num_complex::Complex;
use vec1::Vec1;

/// The predicted ionospheric modulation for each channel of a cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The frequency of each channel \[Hz\].
    pub freqs: Vec1<f64>,

    /// The complex modulation of each channel. Always the same length as
    /// `freqs`.
    pub theta: Vec1<Complex<f64>>,
}

impl Prediction {
    /// Read a prediction file.
    pub fn read<P: AsRef<Path>>(file: P) -> Result<Prediction, PredictionError> {
        let file = file.as_ref();
        debug!("Reading ionospheric prediction from {}", file.display());
        let mut buf = BufReader::new(File::open(file)?);
        Self::parse(&mut buf)
    }

    /// Parse a buffer containing a prediction table.
    pub fn parse<T: BufRead>(buf: &mut T) -> Result<Prediction, PredictionError> {
        let mut freqs = vec![];
        let mut theta = vec![];

        let mut line = String::new();
        let mut line_num: u32 = 0;
        while buf.read_line(&mut line)? > 0 {
            line_num += 1;

            let contents = match line.split_once('#') {
                Some((before, _)) => before,
                None => line.as_str(),
            };
            let items: Vec<&str> = contents.split_ascii_whitespace().collect();
            match items.as_slice() {
                [] => (),
                [freq, re, im] => {
                    let parse_float = |string: &str| -> Result<f64, PredictionError> {
                        string.parse().map_err(|_| PredictionError::ParseFloat {
                            line_num,
                            string: string.to_string(),
                        })
                    };
                    freqs.push(parse_float(freq)?);
                    theta.push(Complex::new(parse_float(re)?, parse_float(im)?));
                }
                _ => {
                    return Err(PredictionError::WrongNumberOfColumns {
                        line_num,
                        num_columns: items.len(),
                    })
                }
            }

            line.clear();
        }

        let freqs = Vec1::try_from_vec(freqs).map_err(|_| PredictionError::Empty)?;
        let theta = Vec1::try_from_vec(theta).map_err(|_| PredictionError::Empty)?;
        debug!(
            "Read {} channels of ionospheric prediction ({} Hz to {} Hz)",
            freqs.len(),
            freqs.first(),
            freqs.last()
        );
        Ok(Prediction { freqs, theta })
    }

    /// The number of channels in this prediction.
    pub fn num_chans(&self) -> usize {
        self.theta.len()
    }
}
