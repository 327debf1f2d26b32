// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface.

use num_complex::Complex;
use tempfile::TempDir;

use crate::{faraday_correct, get_cmd_output, make_inputs};

#[test]
fn test_help_is_correct() {
    let mut stdouts = vec![];

    // First with --help
    let cmd = faraday_correct().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    // Then with -h
    let cmd = faraday_correct().arg("-h").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    for stdout in stdouts {
        assert!(stdout.contains("ionospheric Faraday rotation"));
        for arg in ["FITS_Q", "FITS_U", "PREDICTION_FILE", "OUT_Q", "OUT_U"] {
            assert!(stdout.contains(arg), "{arg} missing from help");
        }
        assert!(stdout.contains("--overwrite"));
    }
}

#[test]
fn test_missing_arguments() {
    let cmd = faraday_correct().args(["q.fits", "u.fits"]).ok();
    assert!(cmd.is_err());
}

#[test]
fn test_missing_input_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 2, &[Complex::new(1.0, 0.0); 2]);
    let missing = tmp_dir.path().join("nothing.fits");
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&missing)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("does not exist"), "{stderr}");
    assert!(stderr.contains("nothing.fits"), "{stderr}");
    assert!(!q_out.exists());
    assert!(!u_out.exists());
}
