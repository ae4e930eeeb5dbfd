use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::anonymize::Anonymizer;
use crate::codec::{Codec, CodecError};
use crate::output::OutputLayout;
use crate::registry::{ConvertedStudy, StudyRegistry};
use crate::sources;

/// Drives a whole run: expands sources, anonymizes each DICOM file found and
/// collects the resulting studies.
pub struct BatchProcessor<C, A> {
    codec: C,
    anonymizer: A,
    output: OutputLayout,
}

enum Outcome {
    Converted(ConvertedStudy),
    Skipped,
}

impl<C, A> BatchProcessor<C, A>
where
    C: Codec,
    A: Anonymizer<C::Dataset>,
{
    pub fn new(codec: C, anonymizer: A, output: OutputLayout) -> Self {
        Self {
            codec,
            anonymizer,
            output,
        }
    }

    /// Files that are not DICOM are logged and skipped. Any other failure stops
    /// the run; files written before it stay written.
    pub fn run<S: AsRef<str>>(&mut self, sources: &[S]) -> Result<StudyRegistry> {
        self.output.prepare()?;

        let mut registry = StudyRegistry::new();
        let (mut converted, mut skipped) = (0usize, 0usize);

        for source in sources {
            let source = source.as_ref();
            debug!("Expanding source {:?}", source);

            for path in sources::expand(source) {
                match self.process_file(&path)? {
                    Outcome::Converted(study) => {
                        converted += 1;
                        registry.insert(study);
                    }
                    Outcome::Skipped => skipped += 1,
                }
            }
        }

        info!(
            "Anonymized {} file(s) in {} study(ies), skipped {} non-DICOM file(s)",
            converted,
            registry.len(),
            skipped
        );
        Ok(registry)
    }

    fn process_file(&mut self, path: &Path) -> Result<Outcome> {
        let mut dataset = match self.codec.read(path, false) {
            Ok(dataset) => dataset,
            Err(CodecError::NotDicom { .. }) => {
                info!("File {} appears not to be DICOM. Skipping.", path.display());
                return Ok(Outcome::Skipped);
            }
            Err(err) => return Err(err.into()),
        };

        self.anonymizer
            .anonymize(&mut dataset)
            .with_context(|| format!("Failed to anonymize {}", path.display()))?;

        let output_path = self.output.resolve(path, &dataset)?;
        self.codec.write(&output_path, &dataset, false)?;
        debug!("Wrote {} -> {}", path.display(), output_path.display());

        Ok(Outcome::Converted(ConvertedStudy::from_dataset(&dataset)))
    }
}
