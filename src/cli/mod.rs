// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code.
//!
//! Only 3 things should be public in this module: `FaradayCorrect`,
//! `FaradayCorrect::run`, and `FaradayCorrectError`.

mod error;

pub use error::FaradayCorrectError;

use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::{debug, info};

use crate::{
    apply::{apply_correction_with, ApplyOptions},
    io::FitsStore,
};

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Correct Stokes Q and U image cubes for ionospheric Faraday rotation.

Q + iU of each pixel is divided by the predicted complex modulation of its
frequency channel, and the corrected cubes are written to new FITS files."#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(infer_long_args = true)]
pub struct FaradayCorrect {
    /// The Stokes Q FITS cube to be corrected. Its header is used for both
    /// outputs.
    #[clap(name = "FITS_Q", parse(from_os_str))]
    fits_q: PathBuf,

    /// The Stokes U FITS cube to be corrected. It must have the same
    /// dimensions as the Q cube.
    #[clap(name = "FITS_U", parse(from_os_str))]
    fits_u: PathBuf,

    /// A text file with one line per frequency channel: the frequency [Hz],
    /// and the real and imaginary parts of the predicted ionospheric
    /// modulation. Text after '#' is ignored.
    #[clap(name = "PREDICTION_FILE", parse(from_os_str))]
    prediction_file: PathBuf,

    /// The path to write the corrected Q cube.
    #[clap(name = "OUT_Q", parse(from_os_str))]
    out_q: PathBuf,

    /// The path to write the corrected U cube.
    #[clap(name = "OUT_U", parse(from_os_str))]
    out_u: PathBuf,

    /// Overwrite the output files if they already exist.
    #[clap(short, long)]
    overwrite: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only verify that the inputs are consistent and print out high-level
    /// information.
    #[clap(long)]
    dry_run: bool,
}

impl FaradayCorrect {
    pub fn run(self) -> Result<(), FaradayCorrectError> {
        let FaradayCorrect {
            fits_q,
            fits_u,
            prediction_file,
            out_q,
            out_u,
            overwrite,
            verbosity,
            dry_run,
        } = self;

        // Set up logging.
        setup_logging(verbosity).expect("Failed to initialise logging.");

        // Print the version and build-time information.
        info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        display_build_info();

        check_inputs_exist([&fits_q, &fits_u, &prediction_file])?;
        debug!("Q cube:     {}", fits_q.display());
        debug!("U cube:     {}", fits_u.display());
        debug!("Prediction: {}", prediction_file.display());

        apply_correction_with(
            &FitsStore,
            &fits_q,
            &fits_u,
            &prediction_file,
            &out_q,
            &out_u,
            ApplyOptions { overwrite, dry_run },
        )?;

        info!("Faraday correction complete.");
        Ok(())
    }
}

/// Fail on the first path that doesn't exist.
fn check_inputs_exist<'a, I: IntoIterator<Item = &'a PathBuf>>(
    paths: I,
) -> Result<(), FaradayCorrectError> {
    for path in paths {
        if !path.exists() {
            return Err(FaradayCorrectError::InputNotFound(format!(
                "Input file '{}' does not exist",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}
