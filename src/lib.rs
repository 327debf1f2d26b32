// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Correct Stokes Q and U image cubes for ionospheric Faraday rotation.
 */

pub mod apply;
pub mod axes;
mod cli;
pub mod correct;
pub mod io;
pub mod prediction;

// Re-exports.
pub use apply::{apply_correction, apply_correction_with, ApplyError, ApplyOptions};
pub use cli::{FaradayCorrect, FaradayCorrectError};
pub use correct::correct_cubes;
pub use prediction::Prediction;
