//
// lib.rs
// Dicom-Anonymizer-rs
//
// Exposes the crate's modules and re-exports the CLI entry point for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Public surface of the library: the batch pipeline plus its pluggable codec and anonymizer.
pub mod anonymize;
pub mod batch;
pub mod cli;
pub mod codec;
pub mod dicom_access;
pub mod logging;
pub mod output;
pub mod registry;
pub mod report;
pub mod sources;

pub use batch::BatchProcessor;
pub use cli::{run as run_cli, Cli};
pub use registry::{ConvertedStudy, StudyRegistry};
