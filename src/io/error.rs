// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::fits::FitsError;

#[derive(Error, Debug)]
pub enum CubeIoError {
    #[error("Cannot write to '{0}'; it already exists and overwriting wasn't requested")]
    OutputExists(PathBuf),

    #[error("The image in '{file}' has shape {shape:?}, but {num_elements} values were read")]
    BadShape {
        file: PathBuf,
        shape: Vec<usize>,
        num_elements: usize,
    },

    #[error(transparent)]
    Fits(#[from] FitsError),
}
