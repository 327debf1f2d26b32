// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all faraday_correct-related errors. This should be the
//! *only* error enum that is publicly visible.

use thiserror::Error;

use crate::{
    apply::ApplyError,
    io::{fits::FitsError, CubeIoError},
};

/// The *only* publicly visible error from faraday_correct.
#[derive(Error, Debug)]
pub enum FaradayCorrectError {
    /// One of the input files doesn't exist.
    #[error("{0}")]
    InputNotFound(String),

    /// The Q cube, U cube and prediction don't agree with each other.
    #[error("{0}\n\nThe Q and U cubes must have the same dimensions, and the prediction file must have one line per frequency channel")]
    Consistency(String),

    /// An error reading the prediction file.
    #[error("{0}\n\nEach non-comment line of the prediction file must be: <frequency [Hz]> <real> <imaginary>")]
    Prediction(String),

    /// An error from cfitsio.
    #[error("{0}")]
    Cfitsio(String),

    /// An error writing an output file.
    #[error("{0}")]
    Output(String),

    /// A generic error that can't be clarified further with documentation,
    /// e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<ApplyError> for FaradayCorrectError {
    fn from(e: ApplyError) -> Self {
        let s = e.to_string();
        match e {
            ApplyError::ShapeMismatch { .. } | ApplyError::ChannelCountMismatch { .. } => {
                Self::Consistency(s)
            }
            ApplyError::Correct(_) => Self::Consistency(s),
            ApplyError::Prediction(_) => Self::Prediction(s),
            ApplyError::CubeIo(e) => Self::from(e),
            ApplyError::Axis(_) => Self::Generic(s),
        }
    }
}

impl From<CubeIoError> for FaradayCorrectError {
    fn from(e: CubeIoError) -> Self {
        let s = e.to_string();
        match e {
            CubeIoError::OutputExists(_) => Self::Output(format!(
                "{s}\n\nUse --overwrite to replace existing output files"
            )),
            CubeIoError::BadShape { .. } => Self::Generic(s),
            CubeIoError::Fits(FitsError::Create { .. }) => Self::Output(s),
            CubeIoError::Fits(_) => Self::Cfitsio(s),
        }
    }
}
