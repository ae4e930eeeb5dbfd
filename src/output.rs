//
// output.rs
// Dicom-Anonymizer-rs
//
// Decides where each anonymized file is written: back in place, or into an output directory named by SOP Instance UID.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::dicom_access::{ElementAccess, SOP_INSTANCE_UID};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} has no SOPInstanceUID after anonymization", path.display())]
    MissingSopInstanceUid { path: PathBuf },

    #[error("SOPInstanceUID {uid:?} cannot be used as a file name")]
    UnsafeSopInstanceUid { uid: String },
}

#[derive(Debug, Clone, Default)]
pub struct OutputLayout {
    directory: Option<PathBuf>,
}

impl OutputLayout {
    /// Files are overwritten where they were found.
    pub fn in_place() -> Self {
        Self { directory: None }
    }

    /// Files are written to `directory` as `<SOPInstanceUID>.dcm`.
    pub fn into_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Create the output directory and its parents. Call once per run.
    pub fn prepare(&self) -> Result<(), OutputError> {
        if let Some(dir) = &self.directory {
            fs::create_dir_all(dir).map_err(|source| OutputError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn resolve<D: ElementAccess>(
        &self,
        original: &Path,
        dataset: &D,
    ) -> Result<PathBuf, OutputError> {
        let Some(dir) = &self.directory else {
            return Ok(original.to_path_buf());
        };

        let uid = dataset
            .element_str(SOP_INSTANCE_UID)
            .map(|uid| uid.trim_end_matches(['\0', ' ']).to_string())
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| OutputError::MissingSopInstanceUid {
                path: original.to_path_buf(),
            })?;

        let filename = format!("{}.dcm", uid);
        // Guard against path traversal: the name must be a single plain component.
        let mut components = Path::new(&filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(dir.join(filename)),
            _ => Err(OutputError::UnsafeSopInstanceUid { uid }),
        }
    }
}
