/// CSV ingestion of phrase lists.
///
/// The reader resolves the three phrase columns by header name, handles the
/// optional UTF-8 byte-order mark according to the selected [`csv_reader::Encoding`],
/// and yields raw [`crate::phrase::PhraseRow`]s lazily, in file order.
///
/// # Examples
///
/// ```
/// use phrase_batch::item::csv::csv_reader::{CsvItemReaderBuilder, Encoding};
/// use phrase_batch::core::item::ItemReader;
///
/// let data = "\u{feff}Column1,Column2,Column3\n 犬 ,Dog,1\n";
///
/// let reader = CsvItemReaderBuilder::new()
///     .encoding(Encoding::Utf8BomStrip)
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let row = reader.read().unwrap().unwrap();
/// assert_eq!(row.japanese, " 犬 ");
/// ```
pub mod csv_reader;

pub use csv_reader::{CsvItemReader, CsvItemReaderBuilder, Encoding, PhraseColumns};
