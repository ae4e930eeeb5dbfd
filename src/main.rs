//
// main.rs
// Dicom-Anonymizer-rs
//
// Binary entry point that hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom_anonymizer::cli;

fn main() -> anyhow::Result<()> {
    // Fatal errors bubble up here and terminate with a non-zero status.
    cli::run()
}
