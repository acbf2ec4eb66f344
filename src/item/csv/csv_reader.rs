use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::{
    cell::RefCell,
    fmt,
    fs::File,
    io::{self, Chain, Cursor, Read},
    path::Path,
    str::FromStr,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
    phrase::PhraseRow,
};

/// UTF-8 byte-order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// The source with its first bytes, already inspected for a byte-order mark,
/// put back in front.
type PeekedSource<R> = Chain<Cursor<Vec<u8>>, R>;

/// Text encoding of the CSV source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Plain UTF-8. A leading byte-order mark is rejected.
    #[default]
    Utf8,
    /// UTF-8, discarding a leading byte-order mark when present.
    Utf8BomStrip,
}

impl FromStr for Encoding {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utf-8" => Ok(Encoding::Utf8),
            "utf-8-with-bom-strip" => Ok(Encoding::Utf8BomStrip),
            other => Err(BatchError::ItemReader(format!(
                "unsupported encoding '{}', expected 'utf-8' or 'utf-8-with-bom-strip'",
                other
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf-8"),
            Encoding::Utf8BomStrip => f.write_str("utf-8-with-bom-strip"),
        }
    }
}

/// Header names of the three required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseColumns {
    pub japanese: String,
    pub english: String,
    pub level: String,
}

impl Default for PhraseColumns {
    fn default() -> Self {
        Self {
            japanese: "Column1".to_string(),
            english: "Column2".to_string(),
            level: "Column3".to_string(),
        }
    }
}

/// Position of each required column, resolved once from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    japanese: usize,
    english: usize,
    level: usize,
}

/// A CSV item reader producing one [`PhraseRow`] per data row.
///
/// The header row is read when the reader is built and every required
/// column is resolved to its position, so a file missing a column fails
/// before any row is emitted. Rows are then decoded lazily, in file order.
///
/// The reader owns its source: dropping the reader releases the file handle,
/// whether or not iteration completed.
///
/// # Examples
///
/// ```
/// use phrase_batch::item::csv::csv_reader::CsvItemReaderBuilder;
/// use phrase_batch::core::item::ItemReader;
///
/// let data = "Column1,Column2,Column3\n犬,Dog,1\n猫,Cat,2\n";
///
/// let reader = CsvItemReaderBuilder::new()
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let row = reader.read().unwrap().unwrap();
/// assert_eq!(row.japanese, "犬");
/// assert_eq!(row.english, "Dog");
/// assert_eq!(row.level, "1");
/// assert_eq!(row.line, 2);
///
/// assert!(reader.read().unwrap().is_some());
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    records: RefCell<ByteRecordsIntoIter<PeekedSource<R>>>,
    columns: PhraseColumns,
    index: ColumnIndex,
}

impl<R: Read> ItemReader<PhraseRow> for CsvItemReader<R> {
    /// Reads the next row.
    ///
    /// # Returns
    /// - `Ok(Some(row))` if a row is successfully read
    /// - `Ok(None)` if there are no more rows to read
    /// - `Err(BatchError::Encoding)` if the row is not valid UTF-8
    /// - `Err(BatchError::MissingColumn)` if the row is too short
    /// - `Err(BatchError::ItemReader)` for any other parsing or I/O failure
    fn read(&self) -> ItemReaderResult<PhraseRow> {
        match self.records.borrow_mut().next() {
            Some(Ok(byte_record)) => self.to_row(byte_record).map(Some),
            Some(Err(error)) => Err(BatchError::ItemReader(error.to_string())),
            None => Ok(None),
        }
    }
}

impl<R> CsvItemReader<R> {
    fn to_row(&self, byte_record: ByteRecord) -> Result<PhraseRow, BatchError> {
        let line = byte_record.position().map_or(0, |pos| pos.line());

        let record = StringRecord::from_byte_record(byte_record).map_err(|error| {
            let field = error.utf8_error().field();
            BatchError::Encoding {
                line,
                message: format!("invalid UTF-8 in field {}", field + 1),
            }
        })?;

        let field = |index: usize, column: &str| {
            record
                .get(index)
                .map(str::to_owned)
                .ok_or_else(|| BatchError::MissingColumn {
                    column: column.to_owned(),
                    line,
                })
        };

        Ok(PhraseRow {
            line,
            japanese: field(self.index.japanese, &self.columns.japanese)?,
            english: field(self.index.english, &self.columns.english)?,
            level: field(self.index.level, &self.columns.level)?,
        })
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Encoding: plain UTF-8
/// - Delimiter: comma (,)
/// - Columns: `Column1`, `Column2`, `Column3`
///
/// Fields are not trimmed here; trimming belongs to the phrase transformation.
pub struct CsvItemReaderBuilder {
    encoding: Encoding,
    delimiter: u8,
    columns: PhraseColumns,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    /// Creates a new `CsvItemReaderBuilder` with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use phrase_batch::item::csv::csv_reader::CsvItemReaderBuilder;
    ///
    /// let builder = CsvItemReaderBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            encoding: Encoding::Utf8,
            delimiter: b',',
            columns: PhraseColumns::default(),
        }
    }

    /// Sets the text encoding of the source.
    ///
    /// # Parameters
    /// - `encoding`: [`Encoding::Utf8`] rejects a leading byte-order mark,
    ///   [`Encoding::Utf8BomStrip`] discards it
    ///
    /// # Returns
    /// The builder instance for method chaining
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the delimiter character for the CSV parsing.
    ///
    /// # Parameters
    /// - `delimiter`: The character to use as a field delimiter
    ///
    /// # Examples
    ///
    /// ```
    /// use phrase_batch::item::csv::csv_reader::CsvItemReaderBuilder;
    ///
    /// // Use tab as delimiter
    /// let builder = CsvItemReaderBuilder::new()
    ///     .delimiter(b'\t');
    /// ```
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Overrides the header names of the required columns.
    ///
    /// # Parameters
    /// - `columns`: header names of the Japanese, English and level columns
    ///
    /// # Returns
    /// The builder instance for method chaining
    pub fn columns(mut self, columns: PhraseColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Creates a `CsvItemReader` from any source implementing `Read`.
    ///
    /// The byte-order mark and the header row are handled here, so encoding
    /// and missing column problems in the header are reported immediately.
    pub fn from_reader<R: Read>(self, mut rdr: R) -> Result<CsvItemReader<R>, BatchError> {
        let mut prefix = read_prefix(&mut rdr)
            .map_err(|error| BatchError::ItemReader(error.to_string()))?;

        if prefix == UTF8_BOM {
            match self.encoding {
                Encoding::Utf8BomStrip => {
                    debug!("Skipping UTF-8 byte-order mark");
                    prefix.clear();
                }
                Encoding::Utf8 => {
                    return Err(BatchError::Encoding {
                        line: 1,
                        message: format!(
                            "unexpected byte-order mark for encoding {}, use {}",
                            Encoding::Utf8,
                            Encoding::Utf8BomStrip
                        ),
                    });
                }
            }
        }

        let source = Cursor::new(prefix).chain(rdr);

        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // short rows are reported as missing columns
            .from_reader(source);

        let headers = csv_reader
            .byte_headers()
            .map_err(|error| BatchError::ItemReader(error.to_string()))?
            .iter()
            .enumerate()
            .map(|(field, header)| {
                std::str::from_utf8(header)
                    .map(str::to_owned)
                    .map_err(|_| BatchError::Encoding {
                        line: 1,
                        message: format!("invalid UTF-8 in header field {}", field + 1),
                    })
            })
            .collect::<Result<Vec<String>, BatchError>>()?;

        let index = ColumnIndex {
            japanese: resolve(&headers, &self.columns.japanese)?,
            english: resolve(&headers, &self.columns.english)?,
            level: resolve(&headers, &self.columns.level)?,
        };

        debug!("Resolved CSV columns {:?} from headers {:?}", index, headers);

        Ok(CsvItemReader {
            records: RefCell::new(csv_reader.into_byte_records()),
            columns: self.columns,
            index,
        })
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Errors
    /// - `BatchError::FileNotFound` if the path does not exist
    /// - `BatchError::ItemReader` if the file cannot be opened otherwise
    /// - any error of [`CsvItemReaderBuilder::from_reader`]
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => BatchError::FileNotFound(path.to_path_buf()),
            _ => BatchError::ItemReader(format!("{}: {}", path.display(), error)),
        })?;

        self.from_reader(file)
    }
}

/// Reads up to the length of a byte-order mark, however many calls the
/// source needs to deliver it.
fn read_prefix<R: Read>(rdr: &mut R) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(UTF8_BOM.len());
    rdr.by_ref()
        .take(UTF8_BOM.len() as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Position of `column` among the headers. With duplicate names the last
/// one wins, as in Python's `csv.DictReader`.
fn resolve(headers: &[String], column: &str) -> Result<usize, BatchError> {
    headers
        .iter()
        .rposition(|header| header == column)
        .ok_or_else(|| BatchError::MissingColumn {
            column: column.to_owned(),
            line: 1,
        })
}
