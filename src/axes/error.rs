// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxisError {
    #[error("Frequency axis {freq_axis} can't be moved; the header declares {naxis} axes but the data has {ndim}")]
    OutOfRange {
        freq_axis: usize,
        naxis: usize,
        ndim: usize,
    },
}
