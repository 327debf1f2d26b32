// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Removing the ionospheric modulation from Stokes Q and U.
//!
//! The complex polarisation P = Q + iU of every pixel is divided by the
//! predicted ionospheric modulation of its channel. This derotates the
//! polarisation angle and undoes the depolarisation, which also amplifies the
//! noise wherever |theta| is small. A modulation of exactly zero gives
//! non-finite output; this is left for the user to deal with.


use ndarray::{prelude::*, Zip};
use num_complex::Complex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrectError {
    #[error("Q and U have different shapes (Q: {q:?}, U: {u:?})")]
    ShapeMismatch { q: Vec<usize>, u: Vec<usize> },

    #[error("The cubes have {cube} channels on their first axis, but there are {prediction} channels of modulation")]
    ChannelCountMismatch { cube: usize, prediction: usize },
}

/// Correct Stokes Q and U cubes for ionospheric modulation. The cubes must have
/// the same shape, with frequency on the first axis (i.e. the canonical layout;
/// see [`crate::axes::to_canonical`]), and `theta` must have one value per
/// channel. Any number of other axes is supported.
///
/// The returned corrected Q and U are new arrays in standard layout with the
/// same shape as the inputs.
pub fn correct_cubes(
    q: ArrayViewD<f64>,
    u: ArrayViewD<f64>,
    theta: &[Complex<f64>],
) -> Result<(ArrayD<f64>, ArrayD<f64>), CorrectError> {
    if q.shape() != u.shape() {
        return Err(CorrectError::ShapeMismatch {
            q: q.shape().to_vec(),
            u: u.shape().to_vec(),
        });
    }
    let num_chans = q.shape().first().copied().unwrap_or(0);
    if q.ndim() == 0 || num_chans != theta.len() {
        return Err(CorrectError::ChannelCountMismatch {
            cube: num_chans,
            prediction: theta.len(),
        });
    }

    // Give theta as many axes as the cubes, all but the first being length 1,
    // so that it broadcasts across every non-frequency axis.
    let mut theta_shape = vec![1; q.ndim()];
    theta_shape[0] = theta.len();
    let theta = ArrayView1::from(theta)
        .into_shape_with_order(IxDyn(&theta_shape))
        .expect("theta is contiguous and has the same number of elements");
    let theta = theta
        .broadcast(q.raw_dim())
        .expect("theta's shape is compatible with the cubes");

    let mut q_corr = ArrayD::zeros(q.raw_dim());
    let mut u_corr = ArrayD::zeros(u.raw_dim());
    Zip::from(&mut q_corr)
        .and(&mut u_corr)
        .and(&q)
        .and(&u)
        .and(&theta)
        .for_each(|q_corr, u_corr, &q, &u, &theta| {
            let p = Complex::new(q, u) / theta;
            *q_corr = p.re;
            *u_corr = p.im;
        });

    Ok((q_corr, u_corr))
}

/// Get the indices of channels whose modulation is exactly zero. Corrected data
/// in these channels will be infinite or NaN.
pub fn zero_modulation_channels(theta: &[Complex<f64>]) -> Vec<usize> {
    theta
        .iter()
        .enumerate()
        .filter(|(_, t)| t.re == 0.0 && t.im == 0.0)
        .map(|(i, _)| i)
        .collect()
}
