use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::DefaultDicomObject;

pub const SOP_INSTANCE_UID: Tag = tags::SOP_INSTANCE_UID;
pub const ACCESSION_NUMBER: Tag = tags::ACCESSION_NUMBER;
pub const PATIENT_ID: Tag = tags::PATIENT_ID;
pub const PATIENT_NAME: Tag = tags::PATIENT_NAME;

/// Small helper trait to pull string values from different dataset shapes.
pub trait ElementAccess {
    fn element_str(&self, tag: Tag) -> Option<String>;

    /// Textual value of `tag`, or an empty string when it is absent.
    fn text_or_empty(&self, tag: Tag) -> String {
        self.element_str(tag).unwrap_or_default()
    }
}

impl ElementAccess for DefaultDicomObject {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
    }
}
