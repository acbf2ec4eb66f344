use std::{
    cell::RefCell,
    io::{self, Stdout, Write},
};

use log::debug;
use serde::Serialize;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    phrase::PhraseRecord,
    BatchError,
};

/// Console rendering of a record, labelled 和文 (Japanese text),
/// 英文 (English text) and レベル (level).
#[derive(Serialize)]
struct ConsoleLine<'a> {
    #[serde(rename = "和文")]
    japanese: &'a str,
    #[serde(rename = "英文")]
    english: &'a str,
    #[serde(rename = "レベル")]
    level: String,
}

/// Writes every record as one JSON object per line.
///
/// The level is always rendered as text. Lines are written as soon as a
/// chunk arrives, so rows printed before a failing row stay printed.
pub struct ConsoleItemWriter<W: Write> {
    out: RefCell<W>,
}

impl ConsoleItemWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleItemWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> ItemWriter<PhraseRecord> for ConsoleItemWriter<W> {
    fn write(&self, items: &[PhraseRecord]) -> ItemWriterResult {
        let mut out = self.out.borrow_mut();

        for item in items {
            let line = ConsoleLine {
                japanese: &item.japanese,
                english: &item.english,
                level: item.level.to_string(),
            };
            debug!("Record:{:?}", item);

            serde_json::to_writer(&mut *out, &line)
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
            out.write_all(b"\n")
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        }

        Ok(())
    }

    fn flush(&self) -> ItemWriterResult {
        self.out
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}
