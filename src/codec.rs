//
// codec.rs
// Dicom-Anonymizer-rs
//
// Reads and writes DICOM Part 10 files behind a narrow trait so the batch layer can be driven by test doubles.
//
// Thales Matheus Mendonça Santos - November 2025

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dicom::dictionary_std::{tags, StandardDataDictionary};
use dicom::object::file::ReadPreamble;
use dicom::object::{
    meta, DefaultDicomObject, FileDicomObject, FileMetaTableBuilder, OpenFileOptions, ReadError,
};
use thiserror::Error;

use crate::dicom_access::{ElementAccess, SOP_INSTANCE_UID};

#[derive(Debug, Error)]
pub enum CodecError {
    /// The file does not have the structure of a DICOM file. Recoverable per file.
    #[error("{} is not a DICOM file: {reason}", path.display())]
    NotDicom { path: PathBuf, reason: String },

    /// The file starts like DICOM but its content could not be decoded.
    #[error("Could not parse DICOM file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Capability set of a container codec.
pub trait Codec {
    type Dataset: ElementAccess;

    /// Parse `path`. With `strict` unset the 128-byte preamble is optional.
    fn read(&self, path: &Path, strict: bool) -> Result<Self::Dataset, CodecError>;

    /// Persist `dataset` to `path`. When `preserve_layout` is unset the file is
    /// serialized from scratch instead of mirroring the original encoding.
    fn write(
        &self,
        path: &Path,
        dataset: &Self::Dataset,
        preserve_layout: bool,
    ) -> Result<(), CodecError>;
}

/// Codec backed by the `dicom` crate family.
#[derive(Debug, Default, Clone, Copy)]
pub struct DicomCodec;

impl Codec for DicomCodec {
    type Dataset = DefaultDicomObject;

    fn read(&self, path: &Path, strict: bool) -> Result<DefaultDicomObject, CodecError> {
        let preamble = if strict {
            ReadPreamble::Always
        } else {
            ReadPreamble::Auto
        };

        OpenFileOptions::new()
            .read_preamble(preamble)
            .open_file(path)
            .map_err(|err| classify_read_error(path, err))
    }

    fn write(
        &self,
        path: &Path,
        dataset: &DefaultDicomObject,
        preserve_layout: bool,
    ) -> Result<(), CodecError> {
        let write_err = |reason: String| CodecError::Write {
            path: path.to_path_buf(),
            reason,
        };

        if preserve_layout {
            return dataset
                .write_to_file(path)
                .map_err(|e| write_err(e.to_string()));
        }

        let fresh = rebuild_with_fresh_meta(dataset).map_err(write_err)?;
        fresh
            .write_to_file(path)
            .map_err(|e| write_err(e.to_string()))
    }
}

/// Only a missing `DICM` marker, or a file too short to hold one, means "not
/// DICOM". Damaged DICOM content and I/O failures are reported as such.
fn classify_read_error(path: &Path, err: ReadError) -> CodecError {
    let path = path.to_path_buf();
    match err {
        ReadError::OpenFile { source, .. } => CodecError::Io { path, source },
        // Preamble detection and skipping are the only reads that raise ReadFile.
        ReadError::ReadFile { source, .. } | ReadError::ReadPreambleBytes { source, .. }
            if source.kind() == ErrorKind::UnexpectedEof =>
        {
            CodecError::NotDicom {
                path,
                reason: source.to_string(),
            }
        }
        ReadError::ReadFile { source, .. } | ReadError::ReadPreambleBytes { source, .. } => {
            CodecError::Io { path, source }
        }
        ReadError::ParseMetaDataSet {
            source: source @ (meta::Error::NotDicom { .. } | meta::Error::ReadMagicCode { .. }),
            ..
        } => CodecError::NotDicom {
            path,
            reason: source.to_string(),
        },
        other => CodecError::Parse {
            path,
            reason: other.to_string(),
        },
    }
}

/// Regenerate the file meta group so it agrees with the (possibly rewritten)
/// SOP attributes of the dataset.
fn rebuild_with_fresh_meta(dataset: &DefaultDicomObject) -> Result<DefaultDicomObject, String> {
    let file_meta_in = dataset.meta();

    let sop_class_uid = dataset
        .element_str(tags::SOP_CLASS_UID)
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(file_meta_in.media_storage_sop_class_uid()));
    let sop_instance_uid = dataset
        .element_str(SOP_INSTANCE_UID)
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(file_meta_in.media_storage_sop_instance_uid()));

    let file_meta = FileMetaTableBuilder::new()
        .transfer_syntax(file_meta_in.transfer_syntax())
        .media_storage_sop_class_uid(sop_class_uid.as_ref())
        .media_storage_sop_instance_uid(sop_instance_uid.as_ref())
        .build()
        .map_err(|e| e.to_string())?;

    let mut file_obj =
        FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, file_meta);
    for elem in dataset.clone().into_inner() {
        file_obj.put(elem);
    }
    Ok(file_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::{DataElement, PrimitiveValue, VR};
    use dicom::object::InMemDicomObject;
    use dicom::transfer_syntax::entries::EXPLICIT_VR_LITTLE_ENDIAN;
    use std::fs;
    use tempfile::tempdir;

    fn write_sample(path: &Path) {
        let mut obj = InMemDicomObject::new_empty_with_dict(StandardDataDictionary);
        obj.put(DataElement::new(
            tags::PATIENT_ID,
            VR::LO,
            PrimitiveValue::from("MRN-SECRET"),
        ));
        obj.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from("1.2.826.0.1.3680043.2.1125.1"),
        ));
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PrimitiveValue::from(vec![0_u8; 64]),
        ));

        let meta = FileMetaTableBuilder::new()
            .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
            .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1125.1")
            .build()
            .expect("meta");
        let mut file_obj =
            FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
        for elem in obj {
            file_obj.put(elem);
        }
        file_obj.write_to_file(path).expect("write sample");
    }

    #[test]
    fn plain_text_is_reported_as_not_dicom() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        fs::write(&path, "definitely not a medical image").expect("write");

        let err = DicomCodec.read(&path, false).unwrap_err();
        assert!(matches!(err, CodecError::NotDicom { .. }), "{err:?}");
    }

    #[test]
    fn empty_file_is_reported_as_not_dicom() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("empty.dcm");
        fs::write(&path, b"").expect("write");

        let err = DicomCodec.read(&path, false).unwrap_err();
        assert!(matches!(err, CodecError::NotDicom { .. }), "{err:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = DicomCodec
            .read(&dir.path().join("gone.dcm"), false)
            .unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }), "{err:?}");
    }

    #[test]
    fn large_file_without_marker_is_not_dicom() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("photo.jpg");
        fs::write(&path, vec![0xAB_u8; 4096]).expect("write");

        let err = DicomCodec.read(&path, false).unwrap_err();
        assert!(matches!(err, CodecError::NotDicom { .. }), "{err:?}");
    }

    #[test]
    fn truncated_dicom_is_a_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cut.dcm");
        write_sample(&path);
        DicomCodec.read(&path, false).expect("intact file reads");

        let bytes = fs::read(&path).expect("read back");
        fs::write(&path, &bytes[..bytes.len() - 40]).expect("truncate");

        let err = DicomCodec.read(&path, false).unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }), "{err:?}");
    }
}
