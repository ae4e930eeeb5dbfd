//
// cli.rs
// Dicom-Anonymizer-rs
//
// Defines the CLI surface with Clap, wires the DICOM codec and anonymizer into the batch processor and prints the summary.
//
// Thales Matheus Mendonça Santos - November 2025

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::anonymize::DicomAnonymizer;
use crate::batch::BatchProcessor;
use crate::codec::DicomCodec;
use crate::logging::{self, LogLevel};
use crate::output::OutputLayout;
use crate::report;

/// Anonymize one or more DICOM files' headers (not pixel data).
#[derive(Parser, Debug)]
#[command(name = "dicom-anonymizer", version)]
#[command(about = "Anonymize one or more DICOM files' headers (not pixel data)", long_about = None)]
pub struct Cli {
    /// Files, directories or globs (e.g. "*.dcm") to anonymize. Directories are
    /// recursed and every file found within is anonymized.
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<String>,

    /// Short string prepended to each ID field, such as PatientID and
    /// AccessionNumber. Longer prefixes leave fewer random characters.
    #[arg(short = 'p', long, default_value = "")]
    pub id_prefix: String,

    /// Short string appended to each ID field. May be combined with --id-prefix.
    #[arg(short = 's', long, default_value = "")]
    pub id_suffix: String,

    /// Write anonymized files to this directory instead of in place. It is
    /// created if necessary.
    #[arg(short, long)]
    pub output_directory: Option<PathBuf>,

    /// Suppress the summary of anonymized studies.
    #[arg(short, long)]
    pub quiet: bool,

    /// One of DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[arg(long, value_name = "LEVEL", default_value_t = LogLevel::Warning)]
    pub log_level: LogLevel,

    /// Seed for generated values, mainly for reproducible tests. Omit it so
    /// every run draws its own.
    #[arg(long)]
    pub seed: Option<String>,
}

impl Cli {
    fn output_layout(&self) -> OutputLayout {
        match &self.output_directory {
            Some(dir) => OutputLayout::into_directory(dir),
            None => OutputLayout::in_place(),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once; clap exits on --version, --help and bad input.
    let cli = Cli::parse();
    execute(&cli, &mut io::stdout().lock())
}

/// Run the whole batch described by `cli`, printing the summary table to `out`.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    let subscriber = logging::subscriber(cli.log_level);
    tracing::subscriber::with_default(subscriber, || -> anyhow::Result<()> {
        let anonymizer =
            DicomAnonymizer::new(&cli.id_prefix, &cli.id_suffix, cli.seed.clone());
        let mut processor = BatchProcessor::new(DicomCodec, anonymizer, cli.output_layout());

        let registry = processor.run(cli.sources.as_slice())?;
        report::write_summary(out, &registry, cli.quiet).context("Failed to print summary")?;
        Ok(())
    })
}
