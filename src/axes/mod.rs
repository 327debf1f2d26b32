// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the frequency axis of an image cube, and moving it between the
//! cube's native layout and the "canonical" frequency-first layout.
//!
//! FITS numbers its axes from 1 (NAXIS1 is the fastest-varying axis), whereas
//! the arrays we read have their axes in the reverse order (the last array axis
//! is NAXIS1). So FITS axis `n` of a cube with `NAXIS = N` is array axis
//! `N - n`.

mod error;

pub use error::AxisError;

use std::collections::BTreeMap;

use log::trace;
use ndarray::{ArrayBase, IxDyn, RawData};

/// Find the FITS axis number (1-based) of the frequency axis, given the number
/// of axes (`NAXIS`) and the axis types (`CTYPEn`, keyed by `n`). An axis is a
/// frequency axis if its type contains "FREQ" (case-insensitive); this catches
/// "FREQ", "OBSFREQ", "Frequency" etc.
///
/// Returns 0 if no frequency axis could be found. Axes without a type are
/// skipped. If more than one axis matches, the highest-numbered one is used.
pub fn find_frequency_axis(naxis: usize, axis_types: &BTreeMap<usize, String>) -> usize {
    let mut freq_axis = 0;
    for i in 1..=naxis {
        match axis_types.get(&i) {
            Some(t) if t.to_uppercase().contains("FREQ") => {
                trace!("CTYPE{i} ({t}) looks like a frequency axis");
                freq_axis = i;
            }
            Some(_) | None => (),
        }
    }
    freq_axis
}

/// Move the frequency axis of a natively-ordered array to the first array
/// axis. `freq_axis` is the FITS axis number from [`find_frequency_axis`] and
/// `naxis` is the number of FITS axes.
///
/// If `freq_axis` is 0 (no frequency axis found) or `naxis` (the frequency axis
/// is already first), the array is returned as is. Only the strides of the
/// array change; no data is copied.
pub fn to_canonical<S: RawData>(
    array: ArrayBase<S, IxDyn>,
    freq_axis: usize,
    naxis: usize,
) -> Result<ArrayBase<S, IxDyn>, AxisError> {
    if freq_axis == 0 || freq_axis == naxis {
        return Ok(array);
    }
    let from = array_axis(freq_axis, naxis, array.ndim())?;
    Ok(move_axis(array, from, 0))
}

/// The inverse of [`to_canonical`]; move the first array axis back to where
/// the frequency axis lives natively.
pub fn to_native<S: RawData>(
    array: ArrayBase<S, IxDyn>,
    freq_axis: usize,
    naxis: usize,
) -> Result<ArrayBase<S, IxDyn>, AxisError> {
    if freq_axis == 0 {
        return Ok(array);
    }
    let to = array_axis(freq_axis, naxis, array.ndim())?;
    Ok(move_axis(array, 0, to))
}

/// Convert a 1-based FITS axis number into an array axis index.
fn array_axis(freq_axis: usize, naxis: usize, ndim: usize) -> Result<usize, AxisError> {
    if freq_axis > naxis || naxis > ndim {
        return Err(AxisError::OutOfRange {
            freq_axis,
            naxis,
            ndim,
        });
    }
    Ok(naxis - freq_axis)
}

/// Move array axis `from` to position `to`, keeping the relative order of all
/// other axes.
fn move_axis<S: RawData>(array: ArrayBase<S, IxDyn>, from: usize, to: usize) -> ArrayBase<S, IxDyn> {
    let mut order: Vec<usize> = (0..array.ndim()).collect();
    let axis = order.remove(from);
    order.insert(to, axis);
    array.permuted_axes(order)
}
