//! The two phrase-list runs: printing every row, and converting the whole
//! list to a JSON document.
//!
//! Paths and encodings are passed in through [`PrintConfig`] and
//! [`ConvertConfig`]; their defaults match the stock `jp_en_100.csv` layout.

use std::path::PathBuf;

use log::info;

use crate::{
    core::{
        job::{Job, JobBuilder},
        step::{Step, StepBuilder},
    },
    item::csv::{CsvItemReaderBuilder, Encoding, PhraseColumns},
    phrase::{LevelMode, PhraseProcessor},
    BatchError,
};

#[cfg(feature = "console")]
use crate::item::console::ConsoleItemWriter;
#[cfg(feature = "json")]
use crate::{item::json::JsonItemWriterBuilder, phrase::PhraseRecord};

/// Default input file of both runs.
pub const DEFAULT_INPUT: &str = "jp_en_100.csv";

/// Default destination of the conversion run.
pub const DEFAULT_OUTPUT: &str = "output.json";

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    pub read_count: usize,
    pub write_count: usize,
}

/// Configuration of [`print_phrases`].
#[derive(Debug, Clone)]
pub struct PrintConfig {
    pub input: PathBuf,
    pub encoding: Encoding,
    pub columns: PhraseColumns,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            encoding: Encoding::Utf8BomStrip,
            columns: PhraseColumns::default(),
        }
    }
}

/// Configuration of [`convert_phrases`].
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: Encoding,
    pub columns: PhraseColumns,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            encoding: Encoding::Utf8,
            columns: PhraseColumns::default(),
        }
    }
}

/// Prints every row of the input as a text-level record, one line each.
///
/// Rows are streamed: those before a failing row have already been written
/// to `out` when the error is returned.
#[cfg(feature = "console")]
pub fn print_phrases<W: std::io::Write>(
    config: &PrintConfig,
    out: W,
) -> Result<StepSummary, BatchError> {
    let reader = CsvItemReaderBuilder::new()
        .encoding(config.encoding)
        .columns(config.columns.clone())
        .from_path(&config.input)?;

    let processor = PhraseProcessor::new(LevelMode::Text);
    let writer = ConsoleItemWriter::new(out);

    let step = StepBuilder::new("print-phrases")
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(1)
        .build()?;

    run_single_step("print-phrases", &step)?;

    Ok(StepSummary {
        read_count: step.get_read_count(),
        write_count: step.get_write_count(),
    })
}

/// Converts the input into a JSON array of numeric-level records.
///
/// The output file is written once, after every row has been transformed;
/// on any error the destination is left untouched.
#[cfg(feature = "json")]
pub fn convert_phrases(config: &ConvertConfig) -> Result<StepSummary, BatchError> {
    let reader = CsvItemReaderBuilder::new()
        .encoding(config.encoding)
        .columns(config.columns.clone())
        .from_path(&config.input)?;

    let processor = PhraseProcessor::new(LevelMode::Numeric);
    let writer = JsonItemWriterBuilder::new()
        .indent(b"  ")
        .from_path::<PhraseRecord, _>(&config.output);

    let step = StepBuilder::new("convert-phrases")
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(100)
        .build()?;

    run_single_step("convert-phrases", &step)?;

    info!(
        "Converted {} phrases from {} to {}",
        step.get_write_count(),
        config.input.display(),
        config.output.display()
    );

    Ok(StepSummary {
        read_count: step.get_read_count(),
        write_count: step.get_write_count(),
    })
}

fn run_single_step(name: &str, step: &dyn Step) -> Result<(), BatchError> {
    let job = JobBuilder::new().name(name.to_string()).start(step).build();
    let execution = job.run()?;

    info!("Job {} done in {:?}", name, execution.duration);
    Ok(())
}
