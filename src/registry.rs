use std::collections::hash_set;
use std::collections::HashSet;

use crate::dicom_access::{ElementAccess, ACCESSION_NUMBER, PATIENT_ID, PATIENT_NAME};

/// Identifying triple of an anonymized study, as reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConvertedStudy {
    pub accession_number: String,
    pub patient_id: String,
    pub patient_name: String,
}

impl ConvertedStudy {
    pub fn new(
        accession_number: impl Into<String>,
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
    ) -> Self {
        Self {
            accession_number: accession_number.into(),
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
        }
    }

    /// Absent fields read as empty strings.
    pub fn from_dataset<D: ElementAccess>(dataset: &D) -> Self {
        Self {
            accession_number: dataset.text_or_empty(ACCESSION_NUMBER),
            patient_id: dataset.text_or_empty(PATIENT_ID),
            patient_name: dataset.text_or_empty(PATIENT_NAME),
        }
    }
}

/// Set of converted studies; files of the same study collapse to one entry.
#[derive(Debug, Clone, Default)]
pub struct StudyRegistry {
    studies: HashSet<ConvertedStudy>,
}

impl StudyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an equal study was already registered.
    pub fn insert(&mut self, study: ConvertedStudy) -> bool {
        self.studies.insert(study)
    }

    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    pub fn contains(&self, study: &ConvertedStudy) -> bool {
        self.studies.contains(study)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, ConvertedStudy> {
        self.studies.iter()
    }

    /// Studies ordered by patient ID, then accession number.
    pub fn sorted(&self) -> Vec<&ConvertedStudy> {
        let mut studies: Vec<_> = self.studies.iter().collect();
        studies.sort_by(|a, b| {
            (&a.patient_id, &a.accession_number, &a.patient_name).cmp(&(
                &b.patient_id,
                &b.accession_number,
                &b.patient_name,
            ))
        });
        studies
    }
}

impl<'a> IntoIterator for &'a StudyRegistry {
    type Item = &'a ConvertedStudy;
    type IntoIter = hash_set::Iter<'a, ConvertedStudy>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ConvertedStudy> for StudyRegistry {
    fn from_iter<I: IntoIterator<Item = ConvertedStudy>>(iter: I) -> Self {
        Self {
            studies: iter.into_iter().collect(),
        }
    }
}
