// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use num_complex::Complex;
use tempfile::TempDir;

use crate::{faraday_correct, get_cmd_output, make_inputs};

#[test]
fn test_correct_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let files = make_inputs(tmp_dir.path(), 2, &[Complex::new(0.0, 1.0); 2]);
    let q_out = tmp_dir.path().join("q_corr.fits");
    let u_out = tmp_dir.path().join("u_corr.fits");

    let cmd = faraday_correct()
        .arg(&files.q)
        .arg(&files.u)
        .arg(&files.prediction)
        .arg(&q_out)
        .arg(&u_out)
        .ok();
    assert!(
        cmd.is_ok(),
        "faraday_correct failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Faraday correction complete"));
}
