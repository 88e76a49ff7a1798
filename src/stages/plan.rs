//! Stage builders.
//!
//! Each builder validates its inputs, resolves the tools it needs, and
//! returns fully planned stages. The argument sequences passed to the
//! external tools are fixed; only paths and numeric parameters vary.

use std::path::{Path, PathBuf};

use crate::detection::{resolve_tool_or_name, Tool};
use crate::error::{IcacleanError, Result};
use crate::exec::ToolInvocation;
use crate::naming::{highpass_name, merged_func, parse_threshold, training_stem, IcaDir};
use crate::settings::{MatlabMode, Settings};

use super::{Stage, Step};

/// Options for the cleanup stage.
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    /// Regress out the full noise-component timecourses.
    pub aggressive: bool,
    /// Also regress motion confounds.
    pub motion: bool,
    /// Highpass the motion confounds first, sigma in seconds.
    pub motion_highpass: Option<f64>,
    /// Export the denoised image to CIFTI via wb_command.
    pub cifti: bool,
}

/// Plan the `prepare` phase: highpass each run, merge multi-run input,
/// assemble the ICA-directory layout, and run melodic.
pub fn prepare_stages(
    settings: &Settings,
    dry_run: bool,
    inputs: &[PathBuf],
    out: &Path,
    tr: f64,
    sigma: f64,
) -> Result<Vec<Stage>> {
    if inputs.is_empty() {
        return Err(IcacleanError::InvalidInput {
            message: "prepare needs at least one input image".into(),
        });
    }
    for input in inputs {
        if !input.is_file() {
            return Err(IcacleanError::InvalidInput {
                message: format!("input image {} does not exist", input.display()),
            });
        }
    }
    if !tr.is_finite() || tr <= 0.0 {
        return Err(IcacleanError::InvalidInput {
            message: format!("repetition time must be positive, got {}", tr),
        });
    }

    let fslmaths = resolve_tool_or_name(Tool::FslMaths, settings, dry_run)?;
    let melodic = resolve_tool_or_name(Tool::Melodic, settings, dry_run)?;

    let ica = IcaDir::at(out);

    // fslmaths -bptf takes the cutoff as a sigma in volumes
    let sigma_vols = format!("{:.4}", sigma / (2.0 * tr));

    let mut highpass = Stage::new("highpass", format!("temporal highpass (sigma {}s)", sigma));
    let hp_files: Vec<PathBuf> = inputs.iter().map(|i| highpass_name(i, sigma)).collect();
    for (input, hp) in inputs.iter().zip(&hp_files) {
        highpass = highpass
            .invoke(ToolInvocation::new(
                fslmaths.clone(),
                vec![
                    input.display().to_string(),
                    "-bptf".into(),
                    sigma_vols.clone(),
                    "-1".into(),
                    hp.display().to_string(),
                ],
            ))
            .step(Step::Expect(hp.clone()));
    }

    let mut assemble = Stage::new("assemble", "install the functional image in place")
        .step(Step::EnsureDir(out.to_path_buf()));
    if hp_files.len() == 1 {
        assemble = assemble.step(Step::Rename {
            from: hp_files[0].clone(),
            to: ica.func(),
        });
    } else {
        let fslmerge = resolve_tool_or_name(Tool::FslMerge, settings, dry_run)?;
        let merged = merged_func(out);
        let mut args = vec!["-tr".to_string(), merged.display().to_string()];
        args.extend(hp_files.iter().map(|p| p.display().to_string()));
        args.push(tr.to_string());
        assemble = assemble.invoke(ToolInvocation::new(fslmerge, args));
        for hp in &hp_files {
            assemble = assemble.step(Step::Remove(hp.clone()));
        }
        assemble = assemble.step(Step::Rename {
            from: merged,
            to: ica.func(),
        });
    }

    let melodic_stage = Stage::new("melodic", "spatial ICA decomposition")
        .invoke(ToolInvocation::new(
            melodic,
            vec![
                "-i".into(),
                ica.func().display().to_string(),
                "-o".into(),
                ica.melodic_dir().display().to_string(),
                "--nobet".into(),
                "--report".into(),
                format!("--tr={}", tr),
            ],
        ))
        .step(Step::Copy {
            from: ica.melodic_dir().join("mask.nii.gz"),
            to: ica.mask(),
        })
        .step(Step::Expect(ica.melodic_mix()));

    Ok(vec![highpass, assemble, melodic_stage])
}

/// Plan feature extraction over a prepared ICA directory.
pub fn features_stage(settings: &Settings, dry_run: bool, ica: &IcaDir) -> Result<Stage> {
    ica.require_melodic_inputs()?;
    let worker = resolve_tool_or_name(Tool::Worker, settings, dry_run)?;

    Ok(Stage::new("features", "extract component features")
        .step(Step::EnsureDir(ica.features_dir()))
        .invoke(worker_invocation(
            settings,
            &worker,
            "features",
            &[ica.root().display().to_string()],
        ))
        .step(Step::Expect(ica.features_csv())))
}

/// Plan classification of extracted features.
pub fn classify_stage(
    settings: &Settings,
    dry_run: bool,
    ica: &IcaDir,
    training: &Path,
    threshold: u32,
) -> Result<Stage> {
    let threshold = parse_threshold(threshold)?;
    if !training.is_file() {
        return Err(IcacleanError::InvalidInput {
            message: format!("training file {} does not exist", training.display()),
        });
    }

    let worker = resolve_tool_or_name(Tool::Worker, settings, dry_run)?;
    let label_file = ica.label_file(&training_stem(training), threshold);

    Ok(Stage::new("classify", "label noise components")
        .invoke(worker_invocation(
            settings,
            &worker,
            "classify",
            &[
                ica.features_csv().display().to_string(),
                training.display().to_string(),
                threshold.to_string(),
            ],
        ))
        .step(Step::Expect(label_file)))
}

/// Plan the cleanup phase: regression worker, output installation, and
/// optional CIFTI export.
pub fn apply_stages(
    settings: &Settings,
    dry_run: bool,
    ica: &IcaDir,
    labels: &Path,
    opts: &CleanupOptions,
) -> Result<Vec<Stage>> {
    let worker = resolve_tool_or_name(Tool::Worker, settings, dry_run)?;

    let mut worker_args = vec![
        ica.root().display().to_string(),
        labels.display().to_string(),
    ];
    if opts.aggressive {
        worker_args.push("--aggressive".into());
    }
    if opts.motion || opts.motion_highpass.is_some() {
        worker_args.push("--motion".into());
        if let Some(sigma) = opts.motion_highpass {
            worker_args.push("--motion-highpass".into());
            worker_args.push(sigma.to_string());
        }
    }

    let cleanup = Stage::new("cleanup", "regress out noise components")
        .invoke(worker_invocation(settings, &worker, "cleanup", &worker_args))
        .step(Step::Expect(ica.scratch_clean()))
        .step(Step::Rename {
            from: ica.scratch_clean(),
            to: ica.clean_output(),
        })
        .step(Step::Rename {
            from: ica.scratch_clean_vn(),
            to: ica.clean_vn_output(),
        });

    let mut stages = vec![cleanup];

    if opts.cifti {
        if !ica.atlas_template().is_file() {
            return Err(IcacleanError::InvalidInput {
                message: format!(
                    "CIFTI export needs the template {}",
                    ica.atlas_template().display()
                ),
            });
        }
        let wb = resolve_tool_or_name(Tool::WbCommand, settings, dry_run)?;
        stages.push(
            Stage::new("cifti-export", "convert the denoised image to CIFTI")
                .invoke(ToolInvocation::new(
                    wb,
                    vec![
                        "-cifti-convert".into(),
                        "-from-nifti".into(),
                        ica.clean_output().display().to_string(),
                        ica.atlas_template().display().to_string(),
                        ica.clean_cifti_output().display().to_string(),
                    ],
                ))
                .step(Step::Expect(ica.clean_cifti_output())),
        );
    }

    Ok(stages)
}

/// Resolve a training file: an existing path is used as given, a bare
/// name is looked up under `<root>/training_files/`.
pub fn resolve_training(root: &Path, settings: &Settings, explicit: Option<&str>) -> Result<PathBuf> {
    let name = explicit.unwrap_or(&settings.default_training);

    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Ok(direct);
    }

    let bundled = root.join("training_files").join(name);
    if bundled.is_file() {
        return Ok(bundled);
    }

    Err(IcacleanError::InvalidInput {
        message: format!(
            "training file '{}' not found (looked at {} and {})",
            name,
            direct.display(),
            bundled.display()
        ),
    })
}

/// Build a worker invocation for the configured launch mode.
fn worker_invocation(
    settings: &Settings,
    worker: &Path,
    op: &str,
    args: &[String],
) -> ToolInvocation {
    match settings.matlab_mode {
        MatlabMode::Compiled => {
            let mut full = vec![op.to_string()];
            full.extend(args.iter().cloned());
            ToolInvocation::new(worker, full)
        }
        MatlabMode::Matlab => ToolInvocation::new(
            worker,
            vec![
                "-nodisplay".into(),
                "-nosplash".into(),
                "-batch".into(),
                worker_expr(op, args),
            ],
        ),
        MatlabMode::Octave => ToolInvocation::new(
            worker,
            vec!["--no-gui".into(), "--eval".into(), worker_expr(op, args)],
        ),
    }
}

/// MATLAB/Octave expression invoking a worker function.
fn worker_expr(op: &str, args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| format!("'{}'", a)).collect();
    format!("icaclean_{}({})", op, quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture_ica(temp: &TempDir) -> IcaDir {
        let root = temp.path().join("rest.ica");
        let mel = root.join(crate::naming::MELODIC_DIR_NAME);
        fs::create_dir_all(&mel).unwrap();
        fs::write(root.join(crate::naming::FUNC_NAME), b"").unwrap();
        fs::write(root.join("mask.nii.gz"), b"").unwrap();
        fs::write(mel.join("melodic_mix"), b"").unwrap();
        fs::write(mel.join("melodic_IC.nii.gz"), b"").unwrap();
        IcaDir::open(&root).unwrap()
    }

    fn with_features(ica: &IcaDir) {
        fs::create_dir_all(ica.features_dir()).unwrap();
        fs::write(ica.features_csv(), b"").unwrap();
    }

    #[test]
    fn prepare_single_run_renames_into_place() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("rest.nii.gz");
        fs::write(&input, b"").unwrap();
        let out = temp.path().join("rest.ica");

        let stages = prepare_stages(
            &Settings::default(),
            true,
            &[input.clone()],
            &out,
            0.72,
            2000.0,
        )
        .unwrap();

        let names: Vec<_> = stages.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["highpass", "assemble", "melodic"]);

        // single-run assemble renames rather than merges
        let descriptions: Vec<String> = stages[1].steps.iter().map(|s| s.describe()).collect();
        assert!(descriptions.iter().any(|d| d.starts_with("mv ")));
        assert!(!descriptions.iter().any(|d| d.contains("fslmerge")));
    }

    #[test]
    fn prepare_multi_run_merges_and_removes_intermediates() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("run1.nii.gz");
        let b = temp.path().join("run2.nii.gz");
        fs::write(&a, b"").unwrap();
        fs::write(&b, b"").unwrap();

        let stages = prepare_stages(
            &Settings::default(),
            true,
            &[a, b],
            &temp.path().join("concat.ica"),
            0.8,
            2000.0,
        )
        .unwrap();

        let assemble: Vec<String> = stages[1].steps.iter().map(|s| s.describe()).collect();
        assert!(assemble.iter().any(|d| d.contains("fslmerge")));
        assert!(assemble.iter().filter(|d| d.starts_with("rm ")).count() == 2);
    }

    #[test]
    fn prepare_converts_sigma_to_volumes() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("rest.nii.gz");
        fs::write(&input, b"").unwrap();

        let stages = prepare_stages(
            &Settings::default(),
            true,
            &[input],
            &temp.path().join("o.ica"),
            0.72,
            2000.0,
        )
        .unwrap();

        // 2000 / (2 * 0.72) = 1388.8889
        let highpass = stages[0].steps[0].describe();
        assert!(highpass.contains("-bptf 1388.8889 -1"), "{}", highpass);
    }

    #[test]
    fn prepare_rejects_missing_input() {
        let temp = TempDir::new().unwrap();
        let err = prepare_stages(
            &Settings::default(),
            true,
            &[temp.path().join("absent.nii.gz")],
            &temp.path().join("o.ica"),
            0.72,
            2000.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn prepare_rejects_nonpositive_tr() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("rest.nii.gz");
        fs::write(&input, b"").unwrap();
        let err = prepare_stages(
            &Settings::default(),
            true,
            &[input],
            &temp.path().join("o.ica"),
            0.0,
            2000.0,
        )
        .unwrap_err();
        assert!(err.to_string().contains("repetition time"));
    }

    #[test]
    fn features_stage_requires_melodic_inputs() {
        let temp = TempDir::new().unwrap();
        let bare = temp.path().join("bare.ica");
        fs::create_dir_all(&bare).unwrap();
        let ica = IcaDir::open(&bare).unwrap();
        assert!(features_stage(&Settings::default(), true, &ica).is_err());
    }

    #[test]
    fn features_stage_plans_worker_and_output_check() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        let stage = features_stage(&Settings::default(), true, &ica).unwrap();
        let steps: Vec<String> = stage.steps.iter().map(|s| s.describe()).collect();
        assert!(steps.iter().any(|d| d.contains("icaclean-worker features")));
        assert!(steps.iter().any(|d| d.contains("expect")
            && d.contains("features.csv")));
    }

    #[test]
    fn classify_stage_expects_the_label_file() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        with_features(&ica);
        let training = temp.path().join("Standard.RData");
        fs::write(&training, b"").unwrap();

        let stage = classify_stage(&Settings::default(), true, &ica, &training, 20).unwrap();
        let last = stage.steps.last().unwrap().describe();
        assert!(last.contains("fix4melview_Standard_thr20.txt"), "{}", last);
    }

    #[test]
    fn classify_stage_rejects_out_of_range_threshold() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        with_features(&ica);
        let training = temp.path().join("Standard.RData");
        fs::write(&training, b"").unwrap();
        assert!(classify_stage(&Settings::default(), true, &ica, &training, 101).is_err());
    }

    #[test]
    fn apply_stages_install_canonical_outputs() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        let labels = ica.label_file("Standard", 20);
        fs::write(&labels, b"").unwrap();

        let stages = apply_stages(
            &Settings::default(),
            true,
            &ica,
            &labels,
            &CleanupOptions::default(),
        )
        .unwrap();
        assert_eq!(stages.len(), 1);
        let steps: Vec<String> = stages[0].steps.iter().map(|s| s.describe()).collect();
        assert!(steps
            .iter()
            .any(|d| d.contains("filtered_func_data_clean.nii.gz")));
    }

    #[test]
    fn aggressive_and_motion_flags_reach_the_worker() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        let labels = ica.label_file("Standard", 20);
        fs::write(&labels, b"").unwrap();

        let opts = CleanupOptions {
            aggressive: true,
            motion: true,
            motion_highpass: Some(100.0),
            cifti: false,
        };
        let stages = apply_stages(&Settings::default(), true, &ica, &labels, &opts).unwrap();
        let invocation = stages[0].steps[0].describe();
        assert!(invocation.contains("--aggressive"));
        assert!(invocation.contains("--motion-highpass 100"));
    }

    #[test]
    fn cifti_export_requires_the_template() {
        let temp = TempDir::new().unwrap();
        let ica = fixture_ica(&temp);
        let labels = ica.label_file("Standard", 20);
        fs::write(&labels, b"").unwrap();

        let opts = CleanupOptions {
            cifti: true,
            ..CleanupOptions::default()
        };
        let err = apply_stages(&Settings::default(), true, &ica, &labels, &opts).unwrap_err();
        assert!(err.to_string().contains("Atlas.dtseries.nii"));

        fs::write(ica.atlas_template(), b"").unwrap();
        let stages = apply_stages(&Settings::default(), true, &ica, &labels, &opts).unwrap();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1].name, "cifti-export");
    }

    #[test]
    fn resolve_training_prefers_existing_path() {
        let temp = TempDir::new().unwrap();
        let direct = temp.path().join("mine.RData");
        fs::write(&direct, b"").unwrap();
        let resolved = resolve_training(
            temp.path(),
            &Settings::default(),
            Some(direct.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(resolved, direct);
    }

    #[test]
    fn resolve_training_falls_back_to_bundled_directory() {
        let temp = TempDir::new().unwrap();
        let bundled = temp.path().join("training_files");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("Standard.RData"), b"").unwrap();

        let resolved = resolve_training(temp.path(), &Settings::default(), None).unwrap();
        assert!(resolved.ends_with("training_files/Standard.RData"));
    }

    #[test]
    fn resolve_training_reports_both_locations() {
        let temp = TempDir::new().unwrap();
        let err = resolve_training(temp.path(), &Settings::default(), Some("Nope.RData"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Nope.RData"));
        assert!(msg.contains("training_files"));
    }

    #[test]
    fn matlab_mode_wraps_ops_in_batch_expressions() {
        let settings = Settings {
            matlab_mode: MatlabMode::Matlab,
            ..Settings::default()
        };
        let inv = worker_invocation(
            &settings,
            Path::new("matlab"),
            "features",
            &["/data/rest.ica".to_string()],
        );
        assert!(inv.args.contains(&"-batch".to_string()));
        assert!(inv
            .args
            .iter()
            .any(|a| a == "icaclean_features('/data/rest.ica')"));
    }
}
