use anyhow::Result;
use dicom::core::value::PrimitiveValue;
use dicom::core::{DataElement, Tag, VR};
use dicom::dictionary_std::tags;
use dicom::object::DefaultDicomObject;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::dicom_access::{ElementAccess, ACCESSION_NUMBER, PATIENT_ID, PATIENT_NAME};

/// Total width of generated IDs, prefix and suffix included.
const ID_WIDTH: usize = 16;
/// Fewest random characters kept in an ID, however long the prefix and suffix are.
const MIN_ID_RANDOM_CHARS: usize = 4;

/// Something that rewrites the identifying fields of a dataset in place.
pub trait Anonymizer<D> {
    fn anonymize(&mut self, dataset: &mut D) -> Result<()>;
}

/// Replaces identifying attributes of DICOM objects with pseudonyms derived from
/// a run seed, so every file of a study maps to the same anonymized study.
pub struct DicomAnonymizer {
    id_prefix: String,
    id_suffix: String,
    seed: String,
}

impl DicomAnonymizer {
    /// Without a seed a random one is drawn, so pseudonyms differ between runs.
    pub fn new(
        id_prefix: impl Into<String>,
        id_suffix: impl Into<String>,
        seed: Option<String>,
    ) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            id_suffix: id_suffix.into(),
            seed: seed.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    fn digest(&self, field: Tag, original: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update([0u8]);
        hasher.update(field.group().to_be_bytes());
        hasher.update(field.element().to_be_bytes());
        hasher.update([0u8]);
        hasher.update(original.as_bytes());
        hasher.finalize().into()
    }

    fn pseudonym_id(&self, field: Tag, original: &str) -> String {
        let random_chars = ID_WIDTH
            .saturating_sub(self.id_prefix.len() + self.id_suffix.len())
            .max(MIN_ID_RANDOM_CHARS);
        let hash = hex::encode_upper(self.digest(field, original));
        format!("{}{}{}", self.id_prefix, &hash[..random_chars], self.id_suffix)
    }

    fn pseudonym_name(&self, original: &str) -> String {
        let hash = hex::encode_upper(self.digest(PATIENT_NAME, original));
        format!("ANON^{}", &hash[..8])
    }

    fn pseudonym_uid(&self, field: Tag, original: &str) -> String {
        // 2.25 root: UID made of a single 128-bit integer.
        let digest = self.digest(field, original);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        format!("2.25.{}", u128::from_be_bytes(bytes))
    }
}

impl Anonymizer<DefaultDicomObject> for DicomAnonymizer {
    fn anonymize(&mut self, obj: &mut DefaultDicomObject) -> Result<()> {
        let mut replacements: Vec<(Tag, VR, String)> = Vec::new();

        for tag in [PATIENT_ID, ACCESSION_NUMBER] {
            if let Some(original) = obj.element_str(tag) {
                let vr = if tag == ACCESSION_NUMBER { VR::SH } else { VR::LO };
                replacements.push((tag, vr, self.pseudonym_id(tag, &original)));
            }
        }

        if let Some(original) = obj.element_str(PATIENT_NAME) {
            replacements.push((PATIENT_NAME, VR::PN, self.pseudonym_name(&original)));
        }

        for tag in [
            tags::STUDY_INSTANCE_UID,
            tags::SERIES_INSTANCE_UID,
            tags::SOP_INSTANCE_UID,
            tags::FRAME_OF_REFERENCE_UID,
        ] {
            if let Some(original) = obj.element_str(tag) {
                replacements.push((tag, VR::UI, self.pseudonym_uid(tag, &original)));
            }
        }

        for (tag, vr) in [
            (tags::INSTITUTION_NAME, VR::LO),
            (tags::REFERRING_PHYSICIAN_NAME, VR::PN),
        ] {
            if obj.element(tag).is_ok() {
                replacements.push((tag, vr, "ANONYMIZED".to_string()));
            }
        }

        for (tag, vr, value) in replacements {
            obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
        }

        obj.remove_element(tags::PATIENT_BIRTH_DATE);

        Ok(())
    }
}
