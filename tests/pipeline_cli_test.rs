//! Integration tests for the pipeline commands.
//!
//! Real scientific tools are never present on a test machine, so these
//! tests drive the planning surface through --dry-run, plus one real
//! execution against a stub worker binary.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn icaclean() -> Command {
    Command::new(cargo_bin("icaclean"))
}

/// Lay out a prepared ICA directory the way melodic leaves it.
fn fixture_ica(root: &Path) -> std::path::PathBuf {
    let ica = root.join("rest.ica");
    let mel = ica.join("filtered_func_data.ica");
    fs::create_dir_all(&mel).unwrap();
    fs::write(ica.join("filtered_func_data.nii.gz"), b"").unwrap();
    fs::write(ica.join("mask.nii.gz"), b"").unwrap();
    fs::write(mel.join("melodic_mix"), b"").unwrap();
    fs::write(mel.join("melodic_IC.nii.gz"), b"").unwrap();
    ica
}

fn with_training(root: &Path) {
    let dir = root.join("training_files");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Standard.RData"), b"").unwrap();
}

#[test]
fn prepare_dry_run_prints_the_plan() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("rest.nii.gz"), b"")?;

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args([
        "--dry-run", "prepare", "rest.nii.gz", "--out", "out.ica", "--tr", "0.72",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Plan: highpass"))
        .stdout(predicate::str::contains("-bptf 1388.8889 -1"))
        .stdout(predicate::str::contains("Plan: melodic"))
        .stdout(predicate::str::contains("dry-run mode"));

    assert!(!temp.path().join("out.ica").exists());
    Ok(())
}

#[test]
fn prepare_multi_run_plans_a_merge() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("run1.nii.gz"), b"")?;
    fs::write(temp.path().join("run2.nii.gz"), b"")?;

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args([
        "--dry-run",
        "prepare",
        "run1.nii.gz",
        "run2.nii.gz",
        "--out",
        "concat.ica",
        "--tr",
        "0.8",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fslmerge"))
        .stdout(predicate::str::contains("concat_func_data.nii.gz"));
    Ok(())
}

#[test]
fn prepare_rejects_missing_input() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args([
        "--dry-run", "prepare", "absent.nii.gz", "--out", "out.ica", "--tr", "0.72",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn extract_dry_run_plans_the_worker() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fixture_ica(temp.path());

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "extract", "rest.ica"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("icaclean-worker features"))
        .stdout(predicate::str::contains("expect"))
        .stdout(predicate::str::contains("features.csv"));
    Ok(())
}

#[test]
fn classify_requires_extracted_features() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fixture_ica(temp.path());
    with_training(temp.path());

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "classify", "rest.ica"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("features.csv"));
    Ok(())
}

#[test]
fn classify_dry_run_names_the_label_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let ica = fixture_ica(temp.path());
    with_training(temp.path());
    fs::create_dir_all(ica.join("fix"))?;
    fs::write(ica.join("fix").join("features.csv"), b"")?;

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "classify", "rest.ica", "--threshold", "30"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fix4melview_Standard_thr30.txt"));
    Ok(())
}

#[test]
fn apply_requires_a_label_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fixture_ica(temp.path());
    with_training(temp.path());

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "apply", "rest.ica"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("label file"));
    Ok(())
}

#[test]
fn apply_dry_run_installs_canonical_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let ica = fixture_ica(temp.path());
    with_training(temp.path());
    fs::write(ica.join("fix4melview_Standard_thr20.txt"), b"")?;

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "apply", "rest.ica", "-A", "-m"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--aggressive"))
        .stdout(predicate::str::contains("--motion"))
        .stdout(predicate::str::contains("filtered_func_data_clean.nii.gz"));
    Ok(())
}

#[test]
fn run_dry_run_chains_all_stages() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fixture_ica(temp.path());
    with_training(temp.path());

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "run", "rest.ica"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Plan: features"))
        .stdout(predicate::str::contains("Plan: classify"))
        .stdout(predicate::str::contains("Plan: cleanup"));
    Ok(())
}

#[test]
fn dry_runs_are_not_recorded_in_history() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fixture_ica(temp.path());

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.args(["--dry-run", "extract", "rest.ica"]);
    cmd.assert().success();

    let mut history = icaclean();
    history.current_dir(temp.path());
    history.arg("history");
    history
        .assert()
        .success()
        .stdout(predicate::str::contains("No runs recorded."));
    Ok(())
}

/// End-to-end execution against a stub worker that writes the expected
/// output, then a history check.
#[cfg(unix)]
#[test]
fn extract_executes_and_records_history() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new()?;
    let ica = fixture_ica(temp.path());

    // stub worker: `icaclean-worker features <ica_dir>` writes features.csv
    let bin = temp.path().join("bin");
    fs::create_dir_all(&bin)?;
    let worker = bin.join("icaclean-worker");
    fs::write(
        &worker,
        "#!/bin/sh\nif [ \"$1\" = features ]; then touch \"$2/fix/features.csv\"; fi\n",
    )?;
    let mut perms = fs::metadata(&worker)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&worker, perms)?;

    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.env("PATH", &path);
    cmd.args(["extract", "rest.ica"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("extract complete"));

    assert!(ica.join("fix").join("features.csv").exists());

    let mut history = icaclean();
    history.current_dir(temp.path());
    history.arg("history");
    history
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("ok"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn failed_runs_are_recorded_as_failures() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new()?;
    fixture_ica(temp.path());

    // stub worker that produces nothing: the expect step must fail
    let bin = temp.path().join("bin");
    fs::create_dir_all(&bin)?;
    let worker = bin.join("icaclean-worker");
    fs::write(&worker, "#!/bin/sh\nexit 0\n")?;
    let mut perms = fs::metadata(&worker)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&worker, perms)?;

    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );

    let mut cmd = icaclean();
    cmd.current_dir(temp.path());
    cmd.env("PATH", &path);
    cmd.args(["extract", "rest.ica"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("was not produced"));

    let mut history = icaclean();
    history.current_dir(temp.path());
    history.arg("history");
    history
        .assert()
        .success()
        .stdout(predicate::str::contains("fail"));
    Ok(())
}
