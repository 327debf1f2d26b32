// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Given Stokes Q and U cubes and an ionospheric prediction, remove the
//! ionospheric Faraday rotation and write out the corrected cubes.

mod error;

pub use error::ApplyError;

use std::path::Path;

use log::{debug, info, warn};

use crate::{
    axes::{to_canonical, to_native},
    correct::{correct_cubes, zero_modulation_channels},
    io::{CubeReader, CubeStore, FitsStore},
    prediction::Prediction,
};

/// Added to the history of every corrected cube.
pub const HISTORY_NOTE: &str = "Corrected for ionospheric Faraday rotation";

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Replace output files that already exist.
    pub overwrite: bool,

    /// Read everything and check that it's consistent, but don't correct or
    /// write anything.
    pub dry_run: bool,
}

/// Correct the FITS cubes `q_file` and `u_file` with the prediction in
/// `prediction_file`, writing the results to `q_out` and `u_out`. The header of
/// the Q cube is used for both outputs.
///
/// Nothing is written if the inputs are inconsistent. The two outputs are
/// written one after the other, so if writing U fails (e.g. it exists and
/// `overwrite` is false), Q will already have been written.
pub fn apply_correction(
    q_file: &Path,
    u_file: &Path,
    prediction_file: &Path,
    q_out: &Path,
    u_out: &Path,
    overwrite: bool,
) -> Result<(), ApplyError> {
    apply_correction_with(
        &FitsStore,
        q_file,
        u_file,
        prediction_file,
        q_out,
        u_out,
        ApplyOptions {
            overwrite,
            dry_run: false,
        },
    )
}

/// The same as [`apply_correction`], but cubes are read from and written to
/// the supplied store.
pub fn apply_correction_with<S: CubeStore>(
    store: &S,
    q_file: &Path,
    u_file: &Path,
    prediction_file: &Path,
    q_out: &Path,
    u_out: &Path,
    options: ApplyOptions,
) -> Result<(), ApplyError> {
    let prediction = Prediction::read(prediction_file)?;
    info!(
        "Read {} channels of ionospheric prediction from {}",
        prediction.num_chans(),
        prediction_file.display()
    );

    // Only the Q header is used; U's is ignored.
    let mut q_cube = store.open(q_file)?;
    let mut u_cube = store.open(u_file)?;
    let mut header = q_cube.read_header()?;
    let q = q_cube.read_array()?;
    let u = u_cube.read_array()?;
    drop(q_cube);
    drop(u_cube);
    info!("Read Q cube {} with shape {:?}", q_file.display(), q.shape());
    info!("Read U cube {} with shape {:?}", u_file.display(), u.shape());

    if q.shape() != u.shape() {
        return Err(ApplyError::ShapeMismatch {
            q: q.shape().to_vec(),
            u: u.shape().to_vec(),
        });
    }

    let naxis = header.naxis;
    let freq_axis = header.frequency_axis();
    match freq_axis {
        0 => warn!("Couldn't find a frequency axis in the Q header; assuming axis {naxis} is frequency"),
        _ => debug!("Frequency is FITS axis {freq_axis} of {naxis}"),
    }
    let q = to_canonical(q.view(), freq_axis, naxis)?;
    let u = to_canonical(u.view(), freq_axis, naxis)?;

    let num_chans = q.shape().first().copied().unwrap_or(0);
    if num_chans != prediction.num_chans() {
        return Err(ApplyError::ChannelCountMismatch {
            cube: num_chans,
            prediction: prediction.num_chans(),
        });
    }

    let zero_chans = zero_modulation_channels(&prediction.theta);
    if !zero_chans.is_empty() {
        warn!("The predicted modulation is zero for channels {zero_chans:?}; corrected values in these channels will be infinite or NaN");
    }

    if options.dry_run {
        info!("Dry run; not correcting or writing anything");
        return Ok(());
    }

    let (q_corr, u_corr) = correct_cubes(q, u, &prediction.theta)?;
    let q_corr = to_native(q_corr, freq_axis, naxis)?;
    let u_corr = to_native(u_corr, freq_axis, naxis)?;

    header.add_history(format!(
        "{HISTORY_NOTE} using {} v{}.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    store.write(q_out, q_corr.view(), &header, options.overwrite)?;
    info!("Wrote corrected Q to {}", q_out.display());
    store.write(u_out, u_corr.view(), &header, options.overwrite)?;
    info!("Wrote corrected U to {}", u_out.display());

    Ok(())
}
