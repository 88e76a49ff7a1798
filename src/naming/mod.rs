//! Pipeline file-naming conventions.
//!
//! The pipeline's stages communicate purely through files with fixed
//! names inside an ICA directory. This module is the single encoding of
//! that contract: every path a stage reads or writes is constructed
//! here, never inline. No function in this module performs I/O beyond
//! existence checks in the `require_*` validators.

use std::path::{Path, PathBuf};

use crate::error::{IcacleanError, Result};

/// Name of the 4D functional image inside an ICA directory.
pub const FUNC_NAME: &str = "filtered_func_data.nii.gz";

/// Name of the melodic output subdirectory.
pub const MELODIC_DIR_NAME: &str = "filtered_func_data.ica";

/// A melodic ICA directory whose layout has been checked.
///
/// Construction only verifies the directory exists; stage-specific
/// inputs are checked by the `require_*` methods so each subcommand can
/// report exactly what it is missing.
#[derive(Debug, Clone)]
pub struct IcaDir {
    root: PathBuf,
}

impl IcaDir {
    /// Wrap an existing directory.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(IcacleanError::InvalidInput {
                message: format!("ICA directory {} does not exist", path.display()),
            });
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Wrap a directory that a stage is about to create.
    pub fn at(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The 4D functional image the pipeline operates on.
    pub fn func(&self) -> PathBuf {
        self.root.join(FUNC_NAME)
    }

    /// Brain mask at the ICA-directory root.
    pub fn mask(&self) -> PathBuf {
        self.root.join("mask.nii.gz")
    }

    /// Melodic output subdirectory.
    pub fn melodic_dir(&self) -> PathBuf {
        self.root.join(MELODIC_DIR_NAME)
    }

    /// Component timecourse matrix written by melodic.
    pub fn melodic_mix(&self) -> PathBuf {
        self.melodic_dir().join("melodic_mix")
    }

    /// Spatial component maps written by melodic.
    pub fn melodic_ic(&self) -> PathBuf {
        self.melodic_dir().join("melodic_IC.nii.gz")
    }

    /// Motion parameter file from motion correction.
    pub fn motion_params(&self) -> PathBuf {
        self.root.join("mc").join("prefiltered_func_data_mcf.par")
    }

    /// Directory holding extracted features.
    pub fn features_dir(&self) -> PathBuf {
        self.root.join("fix")
    }

    /// Feature matrix written by the extraction worker.
    pub fn features_csv(&self) -> PathBuf {
        self.features_dir().join("features.csv")
    }

    /// Component label file for a training set and threshold.
    pub fn label_file(&self, training_stem: &str, threshold: u32) -> PathBuf {
        self.root
            .join(format!("fix4melview_{}_thr{}.txt", training_stem, threshold))
    }

    /// Denoised output image.
    pub fn clean_output(&self) -> PathBuf {
        self.root.join("filtered_func_data_clean.nii.gz")
    }

    /// Variance-normalized denoised output.
    pub fn clean_vn_output(&self) -> PathBuf {
        self.root.join("filtered_func_data_clean_vn.nii.gz")
    }

    /// CIFTI export of the denoised output.
    pub fn clean_cifti_output(&self) -> PathBuf {
        self.root.join("filtered_func_data_clean.dtseries.nii")
    }

    /// CIFTI template the export conversion maps onto.
    pub fn atlas_template(&self) -> PathBuf {
        self.root.join("Atlas.dtseries.nii")
    }

    /// Scratch path the cleanup worker writes before installation.
    pub fn scratch_clean(&self) -> PathBuf {
        self.features_dir().join("clean.nii.gz")
    }

    /// Scratch path for the variance-normalized cleanup output.
    pub fn scratch_clean_vn(&self) -> PathBuf {
        self.features_dir().join("clean_vn.nii.gz")
    }

    /// Validate the inputs feature extraction needs.
    pub fn require_melodic_inputs(&self) -> Result<()> {
        self.require(&[
            self.func(),
            self.mask(),
            self.melodic_mix(),
            self.melodic_ic(),
        ])
    }

    /// Validate that extraction has run.
    pub fn require_features(&self) -> Result<()> {
        self.require(&[self.features_csv()])
    }

    fn require(&self, paths: &[PathBuf]) -> Result<()> {
        let missing: Vec<String> = paths
            .iter()
            .filter(|p| !p.exists())
            .map(|p| p.display().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IcacleanError::InvalidInput {
                message: format!(
                    "{} is missing required file(s): {}",
                    self.root.display(),
                    missing.join(", ")
                ),
            })
        }
    }
}

/// Stem used to name label files after their training data.
///
/// `/opt/training_files/Standard.RData` → `Standard`.
pub fn training_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.strip_suffix(".RData").unwrap_or(name).to_string()
}

/// Name of a highpass-filtered image derived from its input.
///
/// `rest.nii.gz` with sigma 2000 → `rest_hp2000.nii.gz`.
pub fn highpass_name(input: &Path, sigma: f64) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(".nii.gz")
        .or_else(|| name.strip_suffix(".nii"))
        .unwrap_or(name);
    let hp_name = format!("{}_hp{}.nii.gz", stem, sigma);
    input.with_file_name(hp_name)
}

/// Merged functional image name for multi-run prepare.
pub fn merged_func(out_dir: &Path) -> PathBuf {
    out_dir.join("concat_func_data.nii.gz")
}

/// Validate a classification threshold.
pub fn parse_threshold(value: u32) -> Result<u32> {
    if value > 100 {
        return Err(IcacleanError::InvalidInput {
            message: format!("threshold must be 0-100, got {}", value),
        });
    }
    Ok(value)
}
