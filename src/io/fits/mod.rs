// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image cubes stored in the primary HDU of FITS files.

mod error;

pub use error::FitsError;

use std::{
    collections::BTreeMap,
    ffi::{c_char, CStr, CString},
    fmt::Display,
    panic::Location,
    path::Path,
};

use fitsio::{
    errors::check_status as fits_check_status,
    hdu::{FitsHdu, HduInfo},
    images::{ImageDescription, ImageType},
    FitsFile,
};
use log::{debug, trace};
use ndarray::{ArrayD, ArrayViewD, IxDyn};

use super::{CubeHeader, CubeIoError, CubeReader, CubeStore};

/// Keywords that describe the layout of a HDU. These are generated by cfitsio
/// when a cube is written, so they're never copied from another header.
/// Checksums are dropped as they would no longer be valid.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "SIMPLE", "BITPIX", "EXTEND", "PCOUNT", "GCOUNT", "BSCALE", "BZERO", "BLANK", "CHECKSUM",
    "DATASUM", "END",
];

/// Reads and writes cubes as FITS files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitsStore;

impl CubeStore for FitsStore {
    type Reader = FitsCube;

    fn open(&self, path: &Path) -> Result<FitsCube, CubeIoError> {
        FitsCube::open(path)
    }

    fn write(
        &self,
        path: &Path,
        data: ArrayViewD<f64>,
        header: &CubeHeader,
        overwrite: bool,
    ) -> Result<(), CubeIoError> {
        write_cube(path, data, header, overwrite)
    }
}

/// An open FITS image cube. The image itself isn't read until
/// [`CubeReader::read_array`] is called.
pub struct FitsCube {
    fptr: FitsFile,
    hdu: FitsHdu,
}

impl FitsCube {
    pub fn open(path: &Path) -> Result<FitsCube, CubeIoError> {
        trace!("Opening {}", path.display());
        let mut fptr = fits_open(path)?;
        let hdu = fits_open_hdu(&mut fptr, 0)?;
        Ok(FitsCube { fptr, hdu })
    }

    /// Read a header keyword, if it exists.
    pub fn read_header_field<T: std::str::FromStr>(
        &mut self,
        keyword: &str,
    ) -> Result<Option<T>, CubeIoError> {
        Ok(fits_get_optional_key(&mut self.fptr, &self.hdu, keyword)?)
    }
}

impl CubeReader for FitsCube {
    fn read_header(&mut self) -> Result<CubeHeader, CubeIoError> {
        let naxis: usize = fits_get_required_key(&mut self.fptr, &self.hdu, "NAXIS")?;

        let mut axis_types = BTreeMap::new();
        for i in 1..=naxis {
            let key = format!("CTYPE{i}");
            // Axis types are only used to find the frequency axis; one that
            // can't be read is treated like one that doesn't exist.
            match fits_get_optional_key::<String>(&mut self.fptr, &self.hdu, &key) {
                Ok(Some(t)) => {
                    axis_types.insert(i, t);
                }
                Ok(None) => (),
                Err(e) => debug!("Ignoring unreadable {key}: {e}"),
            }
        }

        let records = fits_get_header_records(&mut self.fptr, &self.hdu)?;

        Ok(CubeHeader {
            naxis,
            axis_types,
            records,
            history: vec![],
        })
    }

    fn read_array(&mut self) -> Result<ArrayD<f64>, CubeIoError> {
        let shape = fits_get_image_shape(&self.fptr, &self.hdu)?.clone();
        let data = fits_get_image_f64(&mut self.fptr, &self.hdu)?;
        let num_elements = data.len();
        ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|_| CubeIoError::BadShape {
            file: self.fptr.file_path().to_path_buf(),
            shape,
            num_elements,
        })
    }
}

/// Write a cube as the primary image of a new FITS file. The image is always
/// written in double precision. All non-structural records in the header are
/// copied, followed by the header's new history lines.
///
/// If the file already exists, it is only replaced when `overwrite` is true;
/// otherwise it's left untouched and an error is returned.
pub fn write_cube(
    path: &Path,
    data: ArrayViewD<f64>,
    header: &CubeHeader,
    overwrite: bool,
) -> Result<(), CubeIoError> {
    if path.exists() && !overwrite {
        return Err(CubeIoError::OutputExists(path.to_path_buf()));
    }

    debug!("Writing {:?} cube to {}", data.shape(), path.display());
    let (mut fptr, hdu) = fits_create_image(path, data.shape(), overwrite)?;
    // cfitsio writes some boilerplate comments into new headers; don't double
    // them up.
    let new_records = fits_get_header_records(&mut fptr, &hdu)?;
    for record in header
        .records
        .iter()
        .filter(|r| !is_structural(record_keyword(r)) && !new_records.contains(*r))
    {
        fits_write_record(&mut fptr, &hdu, record)?;
    }
    for line in &header.history {
        fits_write_history(&mut fptr, &hdu, line)?;
    }

    // Logical order is C order, and the image shape is the reverse of the FITS
    // axis order, so this is the order FITS wants.
    let data: Vec<f64> = data.iter().copied().collect();
    fits_write_image(&mut fptr, &hdu, &data)?;
    Ok(())
}

/// The keyword of a header record; the first 8 characters, without padding.
fn record_keyword(record: &str) -> &str {
    let end = record
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(record.len());
    record[..end].trim_end()
}

fn is_structural(keyword: &str) -> bool {
    STRUCTURAL_KEYWORDS.contains(&keyword)
        || keyword
            .strip_prefix("NAXIS")
            .map(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
}

/// Open a fits file.
#[track_caller]
pub(crate) fn fits_open<P: AsRef<Path>>(file: P) -> Result<FitsFile, FitsError> {
    let caller = Location::caller();
    FitsFile::open(file.as_ref()).map_err(|e| FitsError::Open {
        fits_error: Box::new(e),
        fits_filename: file.as_ref().to_path_buf().into_boxed_path(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })
}

/// Open a fits file's HDU.
#[track_caller]
pub(crate) fn fits_open_hdu<T: fitsio::hdu::DescribesHdu + Display + Copy>(
    fits_fptr: &mut FitsFile,
    hdu_description: T,
) -> Result<FitsHdu, FitsError> {
    let caller = Location::caller();
    fits_fptr.hdu(hdu_description).map_err(|e| FitsError::Fitsio {
        fits_error: Box::new(e),
        fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: format!("{hdu_description}").into_boxed_str(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })
}

/// Make a [`FitsError::Fitsio`] for the given HDU.
fn fitsio_error(
    fits_error: fitsio::errors::Error,
    fits_fptr: &FitsFile,
    hdu: &FitsHdu,
    caller: &'static Location<'static>,
) -> FitsError {
    FitsError::Fitsio {
        fits_error: Box::new(fits_error),
        fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
        hdu_description: format!("{}", hdu.number + 1).into_boxed_str(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    }
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword that may
/// or may not exist, pull out the value of the keyword, parsing it into the
/// desired type.
#[track_caller]
pub(crate) fn fits_get_optional_key<T: std::str::FromStr>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<Option<T>, FitsError> {
    let caller = Location::caller();
    let unparsed_value: String = match hdu.read_key(fits_fptr, keyword) {
        Ok(key_value) => key_value,
        Err(e) => match &e {
            // 202 is "keyword not found", 204 is "keyword has no value".
            fitsio::errors::Error::Fits(fe) if matches!(fe.status, 202 | 204) => return Ok(None),
            _ => return Err(fitsio_error(e, fits_fptr, hdu, caller)),
        },
    };

    match unparsed_value.parse() {
        Ok(parsed_value) => Ok(Some(parsed_value)),
        Err(_) => Err(FitsError::Parse {
            key: keyword.to_string().into_boxed_str(),
            fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_num: hdu.number + 1,
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }),
    }
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword, pull out
/// the value of the keyword, parsing it into the desired type.
#[track_caller]
pub(crate) fn fits_get_required_key<T: std::str::FromStr>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &str,
) -> Result<T, FitsError> {
    let caller = Location::caller();
    match fits_get_optional_key(fits_fptr, hdu, keyword) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(FitsError::MissingKey {
            key: keyword.to_string().into_boxed_str(),
            fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
            hdu_num: hdu.number + 1,
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }),
        Err(error) => Err(error),
    }
}

/// Get the shape of the image on the supplied FITS file pointer and HDU. The
/// axes are in the reverse of the FITS order, i.e. NAXIS1 is last.
#[track_caller]
pub(crate) fn fits_get_image_shape<'a>(
    fits_fptr: &FitsFile,
    hdu: &'a FitsHdu,
) -> Result<&'a Vec<usize>, FitsError> {
    match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => Ok(shape),
        _ => {
            let caller = Location::caller();
            Err(FitsError::NotImage {
                fits_filename: fits_fptr.file_path().to_path_buf().into_boxed_path(),
                hdu_num: hdu.number + 1,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            })
        }
    }
}

/// Given a FITS file pointer and a HDU, read the associated image as
/// double-precision floats. Pixels flagged as undefined (e.g. by BLANK in an
/// integer image) are read as NaN.
#[track_caller]
pub(crate) fn fits_get_image_f64(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
) -> Result<Vec<f64>, FitsError> {
    let caller = Location::caller();
    let num_elements: usize = fits_get_image_shape(fits_fptr, hdu)?.iter().product();
    // Make sure the HDU is the current one before using cfitsio directly.
    fits_open_hdu(fits_fptr, hdu.number)?;

    let mut data = vec![0.0; num_elements];
    if num_elements == 0 {
        return Ok(data);
    }
    unsafe {
        let mut status = 0;
        let mut any_null = 0;
        // ffgpvd = fits_read_img_dbl
        fitsio_sys::ffgpvd(
            fits_fptr.as_raw(),
            0,
            1,
            num_elements as i64,
            f64::NAN,
            data.as_mut_ptr(),
            &mut any_null,
            &mut status,
        );
        fits_check_status(status).map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))?;
        if any_null != 0 {
            debug!(
                "{} has undefined pixels; they were read as NaN",
                fits_fptr.file_path().display()
            );
        }
    }
    Ok(data)
}

/// Get every record (80-character "card") in the header of a HDU, excluding
/// the END record.
#[track_caller]
pub(crate) fn fits_get_header_records(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
) -> Result<Vec<String>, FitsError> {
    let caller = Location::caller();
    // Make sure the HDU is the current one before using cfitsio directly.
    fits_open_hdu(fits_fptr, hdu.number)?;

    let records = unsafe {
        let mut status = 0;
        let mut num_records = 0;
        // ffghsp = fits_get_hdrspace
        fitsio_sys::ffghsp(
            fits_fptr.as_raw(),
            &mut num_records,
            std::ptr::null_mut(),
            &mut status,
        );
        fits_check_status(status).map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))?;

        let mut records = Vec::with_capacity(num_records as usize);
        // FLEN_CARD is 81.
        let mut card = [0 as c_char; 81];
        for i in 1..=num_records {
            // ffgrec = fits_read_record
            fitsio_sys::ffgrec(fits_fptr.as_raw(), i, card.as_mut_ptr(), &mut status);
            fits_check_status(status).map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))?;
            records.push(CStr::from_ptr(card.as_ptr()).to_string_lossy().into_owned());
        }
        records
    };

    Ok(records)
}

/// Create a new FITS file whose primary HDU is a double-precision image with
/// the given shape (in array order, i.e. the reverse of FITS order).
#[track_caller]
pub(crate) fn fits_create_image(
    file: &Path,
    shape: &[usize],
    overwrite: bool,
) -> Result<(FitsFile, FitsHdu), FitsError> {
    let caller = Location::caller();
    let image_description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: shape,
    };
    let mut new_file = FitsFile::create(file).with_custom_primary(&image_description);
    if overwrite {
        new_file = new_file.overwrite();
    }
    let mut fptr = new_file.open().map_err(|e| FitsError::Create {
        fits_error: Box::new(e),
        fits_filename: file.to_path_buf().into_boxed_path(),
        source_file: caller.file(),
        source_line: caller.line(),
        source_column: caller.column(),
    })?;
    let hdu = fits_open_hdu(&mut fptr, 0)?;
    Ok((fptr, hdu))
}

/// Append a verbatim header record to a HDU.
#[track_caller]
pub(crate) fn fits_write_record(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    record: &str,
) -> Result<(), FitsError> {
    let caller = Location::caller();
    let record = CString::new(record)
        .map_err(|e| fitsio_error(e.into(), fits_fptr, hdu, caller))?;
    unsafe {
        let mut status = 0;
        // ffprec = fits_write_record
        fitsio_sys::ffprec(fits_fptr.as_raw(), record.as_ptr(), &mut status);
        fits_check_status(status).map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))?;
    }
    Ok(())
}

/// Append a HISTORY record to a HDU.
#[track_caller]
pub(crate) fn fits_write_history(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    history: &str,
) -> Result<(), FitsError> {
    let caller = Location::caller();
    let history = CString::new(history)
        .map_err(|e| fitsio_error(e.into(), fits_fptr, hdu, caller))?;
    unsafe {
        let mut status = 0;
        // ffphis = fits_write_history
        fitsio_sys::ffphis(fits_fptr.as_raw(), history.as_ptr(), &mut status);
        fits_check_status(status).map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))?;
    }
    Ok(())
}

/// Given a FITS file pointer and a HDU, write the image.
#[track_caller]
pub(crate) fn fits_write_image<T: fitsio::images::WriteImage>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    data: &[T],
) -> Result<(), FitsError> {
    let caller = Location::caller();
    fits_get_image_shape(fits_fptr, hdu)?;
    hdu.write_image(fits_fptr, data)
        .map_err(|e| fitsio_error(e, fits_fptr, hdu, caller))
}
