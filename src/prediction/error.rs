// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading ionospheric prediction files.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Prediction file line {line_num}: expected 3 columns (frequency, real, imaginary), but found {num_columns}")]
    WrongNumberOfColumns { line_num: u32, num_columns: usize },

    #[error("Prediction file line {line_num}: couldn't parse '{string}' as a number")]
    ParseFloat { line_num: u32, string: String },

    #[error("The prediction file doesn't contain any channels")]
    Empty,

    #[error("Couldn't read the prediction file: {0}")]
    IO(#[from] std::io::Error),
}
