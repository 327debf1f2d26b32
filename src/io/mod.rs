// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing image cubes.
//!
//! The correction only needs a handful of things from a cube container: open a
//! cube, read its header and its data, and write a new cube with a header.
//! These are described by [`CubeStore`] and [`CubeReader`]; [`FitsStore`] is
//! the implementation used by the binary.

mod error;
pub mod fits;

pub use error::CubeIoError;
pub use fits::{FitsCube, FitsStore};

use std::{collections::BTreeMap, path::Path};

use ndarray::{ArrayD, ArrayViewD};

use crate::axes::find_frequency_axis;

/// The parts of a cube's header that are used or carried through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubeHeader {
    /// The declared number of axes (`NAXIS`).
    pub naxis: usize,

    /// The type of each axis (`CTYPEn`) keyed by its 1-based FITS axis number.
    /// Axes without a type are absent.
    pub axis_types: BTreeMap<usize, String>,

    /// Raw header records (80-character FITS cards) to be carried through to
    /// any cube written with this header. Records describing the data layout
    /// are regenerated by the writer rather than copied.
    pub records: Vec<String>,

    /// New HISTORY lines to be appended when this header is written.
    pub history: Vec<String>,
}

impl CubeHeader {
    /// The 1-based FITS axis number of the frequency axis, or 0 if there isn't
    /// one.
    pub fn frequency_axis(&self) -> usize {
        find_frequency_axis(self.naxis, &self.axis_types)
    }

    pub fn add_history<S: Into<String>>(&mut self, line: S) {
        self.history.push(line.into());
    }
}

/// A cube that has been opened for reading.
pub trait CubeReader {
    /// Read the header of the cube.
    fn read_header(&mut self) -> Result<CubeHeader, CubeIoError>;

    /// Read all of the cube's data. The array axes are in the reverse of the
    /// header's axis order.
    fn read_array(&mut self) -> Result<ArrayD<f64>, CubeIoError>;
}

/// Somewhere cubes can be read from and written to.
pub trait CubeStore {
    type Reader: CubeReader;

    /// Open a cube for reading.
    fn open(&self, path: &Path) -> Result<Self::Reader, CubeIoError>;

    /// Write a cube with the given header. If something already exists at
    /// `path` and `overwrite` is false, [`CubeIoError::OutputExists`] must be
    /// returned and the existing thing left alone.
    fn write(
        &self,
        path: &Path,
        data: ArrayViewD<f64>,
        header: &CubeHeader,
        overwrite: bool,
    ) -> Result<(), CubeIoError>;
}
