// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{axes::AxisError, correct::CorrectError, io::CubeIoError, prediction::PredictionError};

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("The Q and U cubes don't have the same dimensions (Q: {q:?}, U: {u:?})")]
    ShapeMismatch { q: Vec<usize>, u: Vec<usize> },

    #[error("The prediction file has {prediction} channels, but the cubes have {cube}")]
    ChannelCountMismatch { cube: usize, prediction: usize },

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    CubeIo(#[from] CubeIoError),

    #[error(transparent)]
    Axis(#[from] AxisError),

    #[error(transparent)]
    Correct(#[from] CorrectError),
}
