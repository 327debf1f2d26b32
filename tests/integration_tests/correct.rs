// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run the binary on small cubes and check the outputs.

use approx::assert_abs_diff_eq;
use num_complex::Complex;
use tempfile::TempDir;

use crate::{faraday_correct, get_cmd_output, make_inputs, read_cube};

#[test]
fn test_identity_prediction_leaves_cubes_alone() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 3, &[Complex::new(1.0, 0.0); 3]);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    assert_eq!(read_cube(&q_out), files.q_data);
    assert_eq!(read_cube(&u_out), files.u_data);
}

#[test]
fn test_rotation_is_removed() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let theta = [Complex::from_polar(0.8, 0.4), Complex::from_polar(1.0, -1.2)];
    let files = make_inputs(tmp_dir.path(), 2, &theta);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .arg("-v")
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let q_corr = read_cube(&q_out);
    let u_corr = read_cube(&u_out);
    assert_eq!(q_corr.shape(), files.q_data.shape());
    for (idx, &q) in files.q_data.indexed_iter() {
        let u = files.u_data[&idx];
        // The channel is the second array axis.
        let p = Complex::new(q, u) / theta[idx[1]];
        assert_abs_diff_eq!(q_corr[&idx], p.re, epsilon = 1e-12);
        assert_abs_diff_eq!(u_corr[&idx], p.im, epsilon = 1e-12);
    }
}

#[test]
fn test_channel_mismatch_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 3, &[Complex::new(1.0, 0.0); 2]);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("2 channels"), "{stderr}");
    assert!(!q_out.exists());
    assert!(!u_out.exists());
}

#[test]
fn test_existing_output_needs_overwrite() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 2, &[Complex::new(2.0, 0.0); 2]);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");
    std::fs::write(&q_out, b"precious").unwrap();

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--overwrite"), "{stderr}");
    assert_eq!(std::fs::read(&q_out).unwrap(), b"precious");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .arg("--overwrite")
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert_eq!(read_cube(&q_out), files.q_data.mapv(|v| v / 2.0));
    assert_eq!(read_cube(&u_out), files.u_data.mapv(|v| v / 2.0));
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 2, &[Complex::new(1.0, 0.0); 2]);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .arg("--dry-run")
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!q_out.exists());
    assert!(!u_out.exists());
}
